//! Video-site links, delegated to yt-dlp.

use super::process::run_tool;
use crate::config::{StreamConfig, VideoConfig};
use crate::error::EntryError;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use url::Url;

/// Arguments for downloading `url` into `target_dir` using the configured template.
///
/// When ffmpeg is configured by explicit path (not a bare name resolved from
/// PATH), yt-dlp is pointed at it for merging.
pub fn ytdlp_args(
    url: &Url,
    target_dir: &Path,
    video: &VideoConfig,
    stream: &StreamConfig,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--no-playlist".into(),
        "--no-progress".into(),
        "-f".into(),
        video.format.as_str().into(),
        "-o".into(),
        target_dir.join(&video.output_template).into_os_string(),
    ];
    if stream.ffmpeg_path.components().count() > 1 {
        args.push("--ffmpeg-location".into());
        args.push(stream.ffmpeg_path.as_os_str().to_owned());
    }
    args.push(url.as_str().into());
    args
}

pub(super) fn extract(
    url: &Url,
    target_dir: &Path,
    video: &VideoConfig,
    stream: &StreamConfig,
) -> Result<(), EntryError> {
    let mut command = Command::new(&video.ytdlp_path);
    command.args(ytdlp_args(url, target_dir, video, stream));
    run_tool(command, "yt-dlp").map_err(EntryError::Extraction)
}
