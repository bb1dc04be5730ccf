//! Per-entry records, the end-of-run tally and the JSON report.

use crate::error::EntryError;
use crate::url_model::MediaKind;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Downloaded,
    /// Target already satisfied before the handler ran.
    Skipped,
    Failed {
        /// Error category (`network`, `filesystem`, ...).
        error: String,
        reason: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryRecord {
    /// 1-based input line.
    pub line: usize,
    /// Normalized URL, or the raw line for malformed input.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<MediaKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl EntryRecord {
    pub fn new(
        line: usize,
        url: String,
        kind: Option<MediaKind>,
        target: Option<PathBuf>,
        outcome: Outcome,
    ) -> Self {
        Self {
            line,
            url,
            kind,
            target,
            outcome,
            bytes: None,
            sha256: None,
        }
    }

    pub fn failed(
        line: usize,
        url: String,
        kind: Option<MediaKind>,
        target: Option<PathBuf>,
        err: &EntryError,
    ) -> Self {
        let outcome = Outcome::Failed {
            error: err.kind().to_string(),
            reason: err.to_string(),
        };
        Self::new(line, url, kind, target, outcome)
    }
}

/// Aggregated result of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub output_dir: PathBuf,
    pub entries: Vec<EntryRecord>,
}

impl RunSummary {
    pub fn from_records(entries: Vec<EntryRecord>, output_dir: PathBuf) -> Self {
        let mut downloaded = 0;
        let mut skipped = 0;
        let mut failed = 0;
        for e in &entries {
            match e.outcome {
                Outcome::Downloaded => downloaded += 1,
                Outcome::Skipped => skipped += 1,
                Outcome::Failed { .. } => failed += 1,
            }
        }
        Self {
            total: entries.len(),
            downloaded,
            skipped,
            failed,
            output_dir,
            entries,
        }
    }

    /// Downloaded plus already-satisfied entries.
    pub fn succeeded(&self) -> usize {
        self.downloaded + self.skipped
    }

    /// Human-readable tally printed at the end of `mdl run`.
    pub fn render(&self) -> String {
        let rule = "=".repeat(50);
        let mut s = String::new();
        let _ = writeln!(s, "{}", rule);
        let _ = writeln!(s, "DOWNLOAD SUMMARY");
        let _ = writeln!(s, "{}", rule);
        let _ = writeln!(s, "Total URLs processed: {}", self.total);
        let _ = writeln!(s, "Successful:           {}", self.succeeded());
        let _ = writeln!(s, "  already present:    {}", self.skipped);
        let _ = writeln!(s, "Failed:               {}", self.failed);
        let _ = writeln!(s, "Output directory:     {}", self.output_dir.display());
        if self.failed > 0 {
            let _ = writeln!(s);
            let _ = writeln!(s, "Failed entries:");
            for e in &self.entries {
                if let Outcome::Failed { reason, .. } = &e.outcome {
                    let _ = writeln!(s, "  line {}: {} ({})", e.line, e.url, reason);
                }
            }
        }
        s
    }

    pub fn print_summary(&self) {
        print!("{}", self.render());
    }
}

/// Writes the summary as pretty JSON, creating parent directories.
pub fn write_json_report(path: &Path, summary: &RunSummary) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create report dir {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote run report");
    Ok(())
}
