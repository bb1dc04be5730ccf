//! URL list parsing.
//!
//! The input is plain text, one entry per line. A line is either a bare URL
//! or `Title: https://...`. Blank lines and `#` comments are ignored; any
//! other line without a usable http(s) URL becomes a malformed entry so it
//! shows up in the run tally.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use url::Url;

/// A parsed, well-formed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    /// 1-based line number in the input file.
    pub line: usize,
    pub url: Url,
    /// Text before the URL, if any (used as the output file stem).
    pub title: Option<String>,
}

/// One non-blank, non-comment input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Entry(UrlEntry),
    Malformed {
        line: usize,
        raw: String,
        reason: String,
    },
}

impl InputLine {
    pub fn line(&self) -> usize {
        match self {
            InputLine::Entry(e) => e.line,
            InputLine::Malformed { line, .. } => *line,
        }
    }

    /// The URL as written, or the raw line for malformed input.
    pub fn display_url(&self) -> &str {
        match self {
            InputLine::Entry(e) => e.url.as_str(),
            InputLine::Malformed { raw, .. } => raw,
        }
    }
}

/// Reads and parses a URL list file. Lines that are not valid UTF-8 become
/// malformed entries instead of failing the whole read.
pub fn read_url_list(path: &Path) -> Result<Vec<InputLine>> {
    let bytes = fs::read(path).with_context(|| format!("read URL list {}", path.display()))?;
    let lines = parse_url_bytes(&bytes);
    tracing::info!(
        file = %path.display(),
        entries = lines.len(),
        "parsed URL list"
    );
    Ok(lines)
}

/// Parses URL list text. Output order follows input order.
pub fn parse_url_list(text: &str) -> Vec<InputLine> {
    parse_url_bytes(text.as_bytes())
}

/// Like `parse_url_list`, for raw file contents.
pub fn parse_url_bytes(bytes: &[u8]) -> Vec<InputLine> {
    bytes
        .split(|&b| b == b'\n')
        .enumerate()
        .filter_map(|(idx, raw)| match std::str::from_utf8(raw) {
            Ok(text) => parse_line(idx + 1, text),
            Err(_) => {
                let lossy = String::from_utf8_lossy(raw);
                let trimmed = lossy.trim();
                (!trimmed.is_empty())
                    .then(|| malformed(idx + 1, trimmed, "line is not valid UTF-8".to_string()))
            }
        })
        .collect()
}

fn malformed(line: usize, raw: &str, reason: String) -> InputLine {
    tracing::warn!(line, input = %truncate(raw, 80), %reason, "skipping malformed line");
    InputLine::Malformed {
        line,
        raw: raw.to_string(),
        reason,
    }
}

fn parse_line(line: usize, raw: &str) -> Option<InputLine> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let Some(start) = find_url_start(trimmed) else {
        return Some(malformed(line, trimmed, "no http(s) URL found".to_string()));
    };
    let token = trimmed[start..]
        .split_whitespace()
        .next()
        .unwrap_or_default();

    let url = match Url::parse(token) {
        Ok(u) => u,
        Err(e) => return Some(malformed(line, trimmed, format!("invalid URL {:?}: {}", token, e))),
    };
    if url.host_str().map_or(true, str::is_empty) {
        return Some(malformed(line, trimmed, format!("URL has no host: {}", token)));
    }

    let title = trimmed[..start].trim().trim_end_matches(':').trim();
    let title = (!title.is_empty()).then(|| title.to_string());

    Some(InputLine::Entry(UrlEntry { line, url, title }))
}

/// Byte offset of the first `http://` or `https://` (ASCII case-insensitive).
fn find_url_start(s: &str) -> Option<usize> {
    let lower = s.to_ascii_lowercase();
    let http = lower.find("http://");
    let https = lower.find("https://");
    match (http, https) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
