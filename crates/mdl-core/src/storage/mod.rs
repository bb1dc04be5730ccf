//! Output file lifecycle.
//!
//! Handlers write into `<target>.part` and only rename to the final name once
//! the transfer or conversion succeeded, so a file at the final path is always
//! complete. The skip check relies on that.

use crate::error::EntryError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Leftovers from interrupted handler runs that never count as finished output.
const LEFTOVER_MARKERS: [&str; 3] = [".part", ".ytdl", ".temp"];

/// Path for the temp file: appends `.part` to the final path (e.g. `file.pdf` → `file.pdf.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Creates `dir` and its parents. No error if it already exists.
pub fn ensure_dir(dir: &Path) -> Result<(), EntryError> {
    fs::create_dir_all(dir).map_err(|e| EntryError::fs(dir, e))
}

/// Creates the parent directory of `path`, if it has one.
pub fn ensure_parent(path: &Path) -> Result<(), EntryError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Renames the finished temp file to its final name.
pub fn finalize(temp: &Path, final_path: &Path) -> Result<(), EntryError> {
    fs::rename(temp, final_path).map_err(|e| EntryError::fs(final_path, e))
}

/// Removes a temp file after a failed attempt. A missing file is fine.
pub fn discard(temp: &Path) {
    match fs::remove_file(temp) {
        Ok(()) => tracing::debug!(path = %temp.display(), "removed partial output"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %temp.display(), "could not remove partial output: {}", e),
    }
}

/// True if `path` is a regular file with non-zero length.
pub fn file_is_complete(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

/// True if `dir` holds at least one non-empty regular file that is not a leftover.
pub fn dir_has_output(dir: &Path) -> bool {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return false,
    };
    entries.flatten().any(|entry| {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if LEFTOVER_MARKERS.iter().any(|m| name.contains(m)) {
            return false;
        }
        file_is_complete(&entry.path())
    })
}
