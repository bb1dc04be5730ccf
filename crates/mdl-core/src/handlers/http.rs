//! Direct file download: one HTTP GET streamed to disk via libcurl.

use crate::config::HttpConfig;
use crate::error::EntryError;
use crate::storage;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use url::Url;

const MAX_REDIRECTS: u32 = 10;

/// Downloads `url` with a single GET into `target`, via `target.part`.
/// Returns the number of bytes written.
///
/// Non-2xx responses become `HttpStatus`, transport failures `Network`, and
/// write failures `Filesystem`. On any error the temp file is removed.
pub fn fetch_to_file(url: &Url, target: &Path, cfg: &HttpConfig) -> Result<u64, EntryError> {
    let temp = storage::temp_path(target);
    let result = fetch_into(url, &temp, cfg).and_then(|written| {
        storage::finalize(&temp, target)?;
        Ok(written)
    });
    if result.is_err() {
        storage::discard(&temp);
    }
    result
}

fn fetch_into(url: &Url, temp: &Path, cfg: &HttpConfig) -> Result<u64, EntryError> {
    let file = File::create(temp).map_err(|e| EntryError::fs(temp, e))?;
    let mut out = BufWriter::new(file);
    let mut written: u64 = 0;
    let mut write_err: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url.as_str())?;
    easy.follow_location(true)?;
    // >= 400 ends the transfer before the error body is written.
    easy.fail_on_error(true)?;
    easy.max_redirections(MAX_REDIRECTS)?;
    easy.useragent(&cfg.user_agent)?;
    easy.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))?;
    easy.timeout(Duration::from_secs(cfg.timeout_secs))?;
    easy.low_speed_limit(cfg.low_speed_limit)?;
    easy.low_speed_time(Duration::from_secs(cfg.low_speed_time_secs))?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match out.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_err = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Err(EntryError::fs(temp, e));
    }
    if let Err(e) = performed {
        if e.is_http_returned_error() {
            return Err(EntryError::HttpStatus(easy.response_code()?));
        }
        return Err(e.into());
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(EntryError::HttpStatus(code));
    }

    let file = out
        .into_inner()
        .map_err(|e| EntryError::fs(temp, e.into_error()))?;
    file.sync_all().map_err(|e| EntryError::fs(temp, e))?;

    tracing::debug!(url = %url, bytes = written, "GET complete");
    Ok(written)
}
