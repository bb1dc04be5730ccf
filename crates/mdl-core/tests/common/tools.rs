//! Fake `ffmpeg` / `yt-dlp` executables (POSIX shell scripts) for integration tests.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

static SPAWN_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that write and then execute scripts. A fork in a parallel
/// test while a script is still open for writing makes exec fail with ETXTBSY.
pub fn spawn_guard() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// ffmpeg stand-in: writes a few bytes to its last argument (the output file).
#[cfg(unix)]
pub fn fake_ffmpeg(dir: &Path) -> PathBuf {
    write_script(dir, "ffmpeg", "for last; do :; done\nprintf 'matroska' > \"$last\"")
}

/// ffmpeg stand-in that fails like a bad manifest would.
#[cfg(unix)]
pub fn failing_ffmpeg(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "ffmpeg-bad",
        "echo 'https://cdn.example.com/x.m3u8: Invalid data found when processing input' >&2\nexit 1",
    )
}

/// yt-dlp stand-in: logs its arguments to `args.log` next to the script and
/// writes a file into the directory of the `-o` template.
#[cfg(unix)]
pub fn fake_ytdlp(dir: &Path) -> PathBuf {
    let log = dir.join("args.log");
    let body = format!(
        r#"printf '%s\n' "$@" >> "{log}"
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
printf 'video' > "$(dirname "$out")/Fake Video.mp4""#,
        log = log.display()
    );
    write_script(dir, "yt-dlp", &body)
}

/// yt-dlp stand-in that rejects every URL.
#[cfg(unix)]
pub fn failing_ytdlp(dir: &Path) -> PathBuf {
    write_script(dir, "yt-dlp-bad", "echo 'ERROR: Unsupported URL' >&2\nexit 1")
}
