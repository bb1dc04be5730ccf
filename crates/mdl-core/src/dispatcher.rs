//! Classify-and-dispatch loop.
//!
//! Entries are processed one at a time, in input order. Every error stops at
//! the per-entry boundary and becomes a `Failed` record; the loop always
//! reaches the last line.

use crate::checksum;
use crate::config::MdlConfig;
use crate::error::EntryError;
use crate::handlers::MediaHandlers;
use crate::input::{InputLine, UrlEntry};
use crate::report::{EntryRecord, Outcome, RunSummary};
use crate::storage;
use crate::url_model::{self, MediaKind};
use std::path::PathBuf;

/// Settings the dispatcher needs; everything else lives in the handlers.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Root of the output tree (`downloads/` by default).
    pub downloads_root: PathBuf,
    /// Skip entries whose target is already satisfied.
    pub skip_existing: bool,
    /// Extension for converted streams.
    pub container_ext: String,
    /// Record SHA-256 of each downloaded file.
    pub checksum: bool,
}

impl DispatchConfig {
    pub fn from_config(cfg: &MdlConfig) -> Self {
        Self {
            downloads_root: cfg.downloads_dir.clone(),
            skip_existing: cfg.skip_existing,
            container_ext: cfg.stream.container_ext.clone(),
            checksum: false,
        }
    }
}

/// Where an entry goes and whether it is already there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    pub kind: MediaKind,
    pub target: PathBuf,
    pub satisfied: bool,
}

/// Callbacks for progress reporting during `run_with`. All methods default to no-ops.
pub trait RunObserver {
    fn entry_started(&mut self, _index: usize, _total: usize, _line: &InputLine) {}
    fn entry_finished(&mut self, _index: usize, _total: usize, _record: &EntryRecord) {}
}

impl RunObserver for () {}

pub struct Dispatcher<H> {
    config: DispatchConfig,
    handlers: H,
}

impl<H: MediaHandlers> Dispatcher<H> {
    pub fn new(config: DispatchConfig, handlers: H) -> Self {
        Self { config, handlers }
    }

    /// Category and output location of a well-formed entry.
    pub fn target_for(&self, entry: &UrlEntry) -> (MediaKind, PathBuf) {
        let kind = url_model::classify(&entry.url);
        let target = url_model::derive_output_path(
            &self.config.downloads_root,
            &entry.url,
            kind,
            entry.title.as_deref(),
            &self.config.container_ext,
        );
        (kind, target)
    }

    /// Dry-run view of an entry: no directories are created, nothing is fetched.
    pub fn plan(&self, entry: &UrlEntry) -> PlannedEntry {
        let (kind, target) = self.target_for(entry);
        let satisfied = is_satisfied(kind, &target);
        PlannedEntry {
            kind,
            target,
            satisfied,
        }
    }

    /// Processes all lines in order and returns the aggregated result.
    pub fn run(&self, lines: &[InputLine]) -> RunSummary {
        self.run_with(lines, &mut ())
    }

    pub fn run_with<O: RunObserver>(&self, lines: &[InputLine], observer: &mut O) -> RunSummary {
        let total = lines.len();
        let mut records = Vec::with_capacity(total);
        for (i, line) in lines.iter().enumerate() {
            observer.entry_started(i + 1, total, line);
            let record = self.process(line);
            observer.entry_finished(i + 1, total, &record);
            records.push(record);
        }
        let summary = RunSummary::from_records(records, self.config.downloads_root.clone());
        tracing::info!(
            total = summary.total,
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            failed = summary.failed,
            "run finished"
        );
        summary
    }

    /// Processes one line. Never panics on entry errors; they end up in the record.
    pub fn process(&self, line: &InputLine) -> EntryRecord {
        match line {
            InputLine::Malformed { line, raw, reason } => {
                let err = EntryError::MalformedInput {
                    line: *line,
                    reason: reason.clone(),
                };
                tracing::warn!(line = *line, input = %raw, "entry failed: {}", err);
                EntryRecord::failed(*line, raw.clone(), None, None, &err)
            }
            InputLine::Entry(entry) => self.process_entry(entry),
        }
    }

    fn process_entry(&self, entry: &UrlEntry) -> EntryRecord {
        let (kind, target) = self.target_for(entry);
        let url = entry.url.as_str();
        tracing::debug!(line = entry.line, %url, %kind, target = %target.display(), "dispatching");

        match self.dispatch(entry, kind, &target) {
            Ok(Dispatched::Skipped) => {
                tracing::info!(%url, target = %target.display(), "already present, skipping");
                EntryRecord::new(
                    entry.line,
                    url.to_string(),
                    Some(kind),
                    Some(target),
                    Outcome::Skipped,
                )
            }
            Ok(Dispatched::Done { bytes }) => {
                tracing::info!(%url, target = %target.display(), "downloaded");
                let mut record = EntryRecord::new(
                    entry.line,
                    url.to_string(),
                    Some(kind),
                    Some(target.clone()),
                    Outcome::Downloaded,
                );
                record.bytes = bytes;
                if self.config.checksum && !kind.target_is_dir() {
                    match checksum::sha256_path(&target) {
                        Ok(digest) => record.sha256 = Some(digest),
                        Err(e) => tracing::warn!(target = %target.display(), "checksum failed: {:#}", e),
                    }
                }
                record
            }
            Err(err) => {
                tracing::warn!(%url, kind = err.kind(), "entry failed: {}", err);
                EntryRecord::failed(entry.line, url.to_string(), Some(kind), Some(target), &err)
            }
        }
    }

    fn dispatch(
        &self,
        entry: &UrlEntry,
        kind: MediaKind,
        target: &std::path::Path,
    ) -> Result<Dispatched, EntryError> {
        if kind.target_is_dir() {
            storage::ensure_dir(target)?;
        } else {
            storage::ensure_parent(target)?;
        }

        if self.config.skip_existing && is_satisfied(kind, target) {
            return Ok(Dispatched::Skipped);
        }

        let bytes = match kind {
            MediaKind::Pdf => Some(self.handlers.fetch_file(&entry.url, target)?),
            MediaKind::Stream => {
                self.handlers.convert_stream(&entry.url, target)?;
                std::fs::metadata(target).ok().map(|m| m.len())
            }
            MediaKind::VideoSite => {
                self.handlers.extract_video(&entry.url, target)?;
                None
            }
        };
        Ok(Dispatched::Done { bytes })
    }
}

enum Dispatched {
    Skipped,
    Done { bytes: Option<u64> },
}

/// Skip policy: a file target must exist with non-zero length; a directory
/// target must hold at least one finished, non-empty file.
pub fn is_satisfied(kind: MediaKind, target: &std::path::Path) -> bool {
    if kind.target_is_dir() {
        storage::dir_has_output(target)
    } else {
        storage::file_is_complete(target)
    }
}
