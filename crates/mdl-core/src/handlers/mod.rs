//! The three media handlers and the seam the dispatcher calls them through.
//!
//! Each handler is a thin wrapper around an external collaborator: libcurl for
//! direct files, `ffmpeg` for HLS streams, `yt-dlp` for video-site links.
//! Handlers own the temp-file/rename step; the dispatcher owns directory
//! creation and the skip check.

mod ffmpeg;
mod http;
mod process;
mod ytdlp;

pub use ffmpeg::ffmpeg_args;
pub use http::fetch_to_file;
pub use ytdlp::ytdlp_args;

use crate::config::{HttpConfig, MdlConfig, StreamConfig, VideoConfig};
use crate::error::EntryError;
use std::path::Path;
use url::Url;

/// Operations the dispatcher routes entries to.
pub trait MediaHandlers {
    /// GET `url` and store the body at `target`. Returns bytes written.
    fn fetch_file(&self, url: &Url, target: &Path) -> Result<u64, EntryError>;

    /// Convert the stream behind the manifest `url` into one container file at `target`.
    fn convert_stream(&self, url: &Url, target: &Path) -> Result<(), EntryError>;

    /// Let the extractor resolve `url` and write the media into `target_dir`.
    fn extract_video(&self, url: &Url, target_dir: &Path) -> Result<(), EntryError>;
}

/// Production handlers backed by curl, ffmpeg and yt-dlp.
#[derive(Debug, Clone)]
pub struct ExternalHandlers {
    http: HttpConfig,
    stream: StreamConfig,
    video: VideoConfig,
}

impl ExternalHandlers {
    pub fn new(http: HttpConfig, stream: StreamConfig, video: VideoConfig) -> Self {
        Self {
            http,
            stream,
            video,
        }
    }

    pub fn from_config(cfg: &MdlConfig) -> Self {
        Self::new(cfg.http.clone(), cfg.stream.clone(), cfg.video.clone())
    }
}

impl MediaHandlers for ExternalHandlers {
    fn fetch_file(&self, url: &Url, target: &Path) -> Result<u64, EntryError> {
        http::fetch_to_file(url, target, &self.http)
    }

    fn convert_stream(&self, url: &Url, target: &Path) -> Result<(), EntryError> {
        ffmpeg::convert(url, target, &self.stream)
    }

    fn extract_video(&self, url: &Url, target_dir: &Path) -> Result<(), EntryError> {
        ytdlp::extract(url, target_dir, &self.video, &self.stream)
    }
}
