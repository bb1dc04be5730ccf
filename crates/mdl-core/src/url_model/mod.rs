//! URL classification and output path derivation.
//!
//! Both are pure functions of the URL (plus optional title): the same entry
//! always maps to the same category and the same place under the downloads
//! root, which is what makes the skip-if-present check meaningful.

mod path;
mod sanitize;

pub use path::{host_dir, last_extension, path_segments, query_suffix, split_stem};
pub use sanitize::{fit_file_name, sanitize_component};

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// File stem used when the URL path yields no usable segment.
const DEFAULT_STEM: &str = "download";

/// Which handler an entry is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Direct file fetch over HTTP.
    Pdf,
    /// HLS manifest, converted to a single container file.
    Stream,
    /// Anything else, handed to the video-site extractor.
    VideoSite,
}

impl MediaKind {
    /// Video-site targets are directories the extractor fills; the others are files.
    pub fn target_is_dir(self) -> bool {
        matches!(self, MediaKind::VideoSite)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MediaKind::Pdf => "pdf",
            MediaKind::Stream => "stream",
            MediaKind::VideoSite => "video-site",
        };
        f.write_str(s)
    }
}

/// Classifies a URL. First match wins:
/// 1. last path segment has a `.pdf` extension
/// 2. `.m3u8` extension, or an HLS marker in the path or query
/// 3. everything else
pub fn classify(url: &Url) -> MediaKind {
    match last_extension(url).as_deref() {
        Some("pdf") => return MediaKind::Pdf,
        Some("m3u8") => return MediaKind::Stream,
        _ => {}
    }
    if has_hls_marker(url) {
        MediaKind::Stream
    } else {
        MediaKind::VideoSite
    }
}

fn has_hls_marker(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    let query = url.query().unwrap_or_default().to_ascii_lowercase();
    path.contains(".m3u8") || query.contains(".m3u8") || query.contains("=m3u8")
}

/// Derives the output location for `url` under `root`.
///
/// - `Pdf`: `root/host/<segments...>` (file, `.pdf` kept)
/// - `Stream`: `root/host/<segments...>` with the last extension replaced by `container_ext`
/// - `VideoSite`: directory `root/host/<segments...>`, last segment suffixed with the query
///
/// With a title, the title replaces the path below the host directory.
///
/// # Examples
///
/// - `https://example.com/docs/file.pdf` → `downloads/example.com/docs/file.pdf`
/// - `https://cdn.example.com/stream/index.m3u8` → `downloads/cdn.example.com/stream/index.mkv`
/// - `https://youtube.com/watch?v=abc123` → `downloads/youtube.com/watch_v=abc123`
pub fn derive_output_path(
    root: &Path,
    url: &Url,
    kind: MediaKind,
    title: Option<&str>,
    container_ext: &str,
) -> PathBuf {
    let mut out = root.join(host_dir(url));

    let title = title.map(sanitize_component).filter(|t| !t.is_empty());
    let mut segments = match &title {
        Some(_) => Vec::new(),
        None => path_segments(url),
    };
    let last = segments.pop();
    for dir in &segments {
        out.push(dir);
    }

    let name = match kind {
        MediaKind::Pdf => match (&title, last) {
            (Some(t), _) => fit_file_name(t, "pdf"),
            (None, Some(seg)) => match split_stem(&seg) {
                (stem, Some(ext)) if ext.eq_ignore_ascii_case("pdf") => fit_file_name(stem, ext),
                _ => fit_file_name(&seg, "pdf"),
            },
            (None, None) => fit_file_name(DEFAULT_STEM, "pdf"),
        },
        MediaKind::Stream => {
            let stem = match (&title, &last) {
                (Some(t), _) => t.clone(),
                (None, Some(seg)) => stream_stem(url, split_stem(seg).0),
                (None, None) => stream_stem(url, DEFAULT_STEM),
            };
            fit_file_name(&stem, container_ext)
        }
        MediaKind::VideoSite => match (title, last) {
            (Some(t), _) => t,
            (None, seg) => {
                let base = seg.unwrap_or_else(|| DEFAULT_STEM.to_string());
                match query_suffix(url) {
                    Some(q) => sanitize_component(&format!("{}_{}", base, q)),
                    None => base,
                }
            }
        },
    };
    out.push(name);
    out
}

/// Stem for a stream target. A manifest named only in the query gets the
/// query appended, so `play?src=a.m3u8` and `play?src=b.m3u8` stay apart.
fn stream_stem(url: &Url, base: &str) -> String {
    if last_extension(url).as_deref() == Some("m3u8") {
        return base.to_string();
    }
    match query_suffix(url) {
        Some(q) => sanitize_component(&format!("{}_{}", base, q)),
        None => base.to_string(),
    }
}
