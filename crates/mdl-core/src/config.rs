use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// HTTP settings for direct file downloads (`[http]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Overall transfer timeout in seconds (0 = no limit).
    pub timeout_secs: u64,
    /// Abort when the transfer stays below this many bytes/sec...
    pub low_speed_limit: u32,
    /// ...for this many seconds.
    pub low_speed_time_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            low_speed_limit: 1024,
            low_speed_time_secs: 60,
            user_agent: concat!("mdl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Stream conversion settings (`[stream]`), passed to ffmpeg.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Path or name of the ffmpeg executable (looked up in PATH).
    pub ffmpeg_path: PathBuf,
    pub video_codec: String,
    pub audio_codec: String,
    /// Output height in pixels; width follows the aspect ratio.
    pub max_height: u32,
    /// Extension of the converted file. The muxer is always matroska.
    pub container_ext: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            max_height: 480,
            container_ext: "mkv".to_string(),
        }
    }
}

/// Video-site extractor settings (`[video]`), passed to yt-dlp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Path or name of the yt-dlp executable (looked up in PATH).
    pub ytdlp_path: PathBuf,
    /// yt-dlp format selector.
    pub format: String,
    /// yt-dlp output template, relative to the entry's target directory.
    pub output_template: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: PathBuf::from("yt-dlp"),
            format: "bv*[height<=480]+ba/b[height<=480]".to_string(),
            output_template: "%(title)s.%(ext)s".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/mdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MdlConfig {
    /// Root of the output tree. Relative paths resolve against the working directory.
    pub downloads_dir: PathBuf,
    /// Skip entries whose target already exists and is non-empty.
    pub skip_existing: bool,
    pub http: HttpConfig,
    pub stream: StreamConfig,
    pub video: VideoConfig,
}

impl Default for MdlConfig {
    fn default() -> Self {
        Self {
            downloads_dir: PathBuf::from("downloads"),
            skip_existing: true,
            http: HttpConfig::default(),
            stream: StreamConfig::default(),
            video: VideoConfig::default(),
        }
    }
}

impl MdlConfig {
    /// Pretty TOML, as written by `load_or_init`.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MdlConfig::default();
        let toml = default_cfg.to_toml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file. Missing keys take their defaults.
pub fn load_from_path(path: &Path) -> Result<MdlConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: MdlConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = MdlConfig::default();
        assert_eq!(cfg.downloads_dir, PathBuf::from("downloads"));
        assert!(cfg.skip_existing);
        assert_eq!(cfg.stream.max_height, 480);
        assert_eq!(cfg.stream.container_ext, "mkv");
        assert_eq!(cfg.http.connect_timeout_secs, 30);
        assert_eq!(cfg.video.format, "bv*[height<=480]+ba/b[height<=480]");
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = MdlConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: MdlConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.downloads_dir, cfg.downloads_dir);
        assert_eq!(parsed.stream.video_codec, cfg.stream.video_codec);
        assert_eq!(parsed.video.output_template, cfg.video.output_template);
        assert_eq!(parsed.http.user_agent, cfg.http.user_agent);
    }

    #[test]
    fn config_toml_partial_sections_take_defaults() {
        let toml = r#"
            downloads_dir = "/srv/media"
            skip_existing = false

            [stream]
            max_height = 720
        "#;
        let cfg: MdlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.downloads_dir, PathBuf::from("/srv/media"));
        assert!(!cfg.skip_existing);
        assert_eq!(cfg.stream.max_height, 720);
        assert_eq!(cfg.stream.video_codec, "libx264");
        assert_eq!(cfg.http.timeout_secs, 3600);
        assert_eq!(cfg.video.ytdlp_path, PathBuf::from("yt-dlp"));
    }

    #[test]
    fn config_empty_file_is_default() {
        let cfg: MdlConfig = toml::from_str("").unwrap();
        assert!(cfg.skip_existing);
        assert_eq!(cfg.stream.audio_codec, "aac");
    }

    #[test]
    fn load_from_path_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "skip_existing = \"maybe\"").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parse config"));
    }
}
