//! HLS manifest → single Matroska file, via ffmpeg.

use super::process::run_tool;
use crate::config::StreamConfig;
use crate::error::EntryError;
use crate::storage;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use url::Url;

/// Arguments for converting `url` into `output` (always muxed as matroska).
pub fn ffmpeg_args(url: &Url, output: &Path, cfg: &StreamConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-hide_banner",
        "-loglevel",
        "error",
        "-nostdin",
        "-y",
        "-i",
        url.as_str(),
        "-c:v",
        cfg.video_codec.as_str(),
        "-c:a",
        cfg.audio_codec.as_str(),
        "-vf",
    ]
    .iter()
    .map(OsString::from)
    .collect();
    args.push(format!("scale=-2:{}", cfg.max_height).into());
    args.push("-f".into());
    args.push("matroska".into());
    args.push(output.as_os_str().to_owned());
    args
}

/// Runs ffmpeg into `target.part` and renames on success.
pub(super) fn convert(url: &Url, target: &Path, cfg: &StreamConfig) -> Result<(), EntryError> {
    let temp = storage::temp_path(target);
    let mut command = Command::new(&cfg.ffmpeg_path);
    command.args(ffmpeg_args(url, &temp, cfg));

    let result = run_tool(command, "ffmpeg")
        .map_err(EntryError::Conversion)
        .and_then(|()| {
            if !storage::file_is_complete(&temp) {
                return Err(EntryError::Conversion(
                    "ffmpeg reported success but produced no output".to_string(),
                ));
            }
            storage::finalize(&temp, target)
        });
    if result.is_err() {
        storage::discard(&temp);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_carry_codecs_scale_and_muxer() {
        let url = Url::parse("https://cdn.example.com/stream/index.m3u8").unwrap();
        let cfg = StreamConfig::default();
        let args = ffmpeg_args(&url, Path::new("/out/index.mkv.part"), &cfg);
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "-hide_banner",
                "-loglevel",
                "error",
                "-nostdin",
                "-y",
                "-i",
                "https://cdn.example.com/stream/index.m3u8",
                "-c:v",
                "libx264",
                "-c:a",
                "aac",
                "-vf",
                "scale=-2:480",
                "-f",
                "matroska",
                "/out/index.mkv.part",
            ]
        );
    }

    #[test]
    fn missing_ffmpeg_is_conversion_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = StreamConfig {
            ffmpeg_path: dir.path().join("no-ffmpeg"),
            ..StreamConfig::default()
        };
        let url = Url::parse("https://cdn.example.com/index.m3u8").unwrap();
        let target = dir.path().join("index.mkv");
        let err = convert(&url, &target, &cfg).unwrap_err();
        assert!(matches!(err, EntryError::Conversion(_)), "{err}");
        assert!(!target.exists());
        assert!(!storage::temp_path(&target).exists());
    }
}
