//! Host and path segment extraction from URLs.

use super::sanitize::sanitize_component;
use url::Url;

/// Directory name used when the URL has no host.
const UNKNOWN_HOST: &str = "unknown-host";

/// Sanitized host directory name, with a non-default port kept as `host_port`.
pub fn host_dir(url: &Url) -> String {
    let host = match url.host_str() {
        Some(h) if !h.is_empty() => h,
        _ => return UNKNOWN_HOST.to_string(),
    };
    let raw = match url.port() {
        Some(port) => format!("{}_{}", host, port),
        None => host.to_string(),
    };
    let s = sanitize_component(&raw);
    if s.is_empty() {
        UNKNOWN_HOST.to_string()
    } else {
        s
    }
}

/// Percent-decoded, sanitized path segments. Empty, `.` and `..` segments
/// (and anything that sanitizes to nothing) are dropped.
pub fn path_segments(url: &Url) -> Vec<String> {
    url.path()
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(|s| sanitize_component(&percent_decode(s)))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Sanitized query string, if the URL has a non-empty one.
pub fn query_suffix(url: &Url) -> Option<String> {
    let q = url.query()?;
    let s = sanitize_component(&percent_decode(q));
    (!s.is_empty()).then_some(s)
}

/// Lowercased extension of the last raw path segment, without the dot.
pub fn last_extension(url: &Url) -> Option<String> {
    let segment = url.path().rsplit('/').find(|s| !s.is_empty())?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Splits `name` into (stem, extension) at the last dot; a leading dot is not a separator.
pub fn split_stem(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

/// Percent-decode a URL component. Invalid escapes are kept literally;
/// invalid UTF-8 is replaced lossily.
pub(super) fn percent_decode(input: &str) -> String {
    let mut out = Vec::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(h << 4 | l);
                i += 3;
                continue;
            }
        }
        out.push(b);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
