//! `mdl run` – download every entry of a URL list.

use anyhow::{Context, Result};
use mdl_core::config::MdlConfig;
use mdl_core::dispatcher::{DispatchConfig, Dispatcher, RunObserver};
use mdl_core::handlers::ExternalHandlers;
use mdl_core::input::{self, InputLine};
use mdl_core::report::{self, EntryRecord, Outcome};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct RunOptions {
    pub file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub no_skip: bool,
    pub report: Option<PathBuf>,
    pub checksum: bool,
}

/// Prints one block per entry as the batch progresses.
struct ConsoleProgress;

impl RunObserver for ConsoleProgress {
    fn entry_started(&mut self, index: usize, total: usize, line: &InputLine) {
        println!();
        println!("[{}/{}] line {}: {}", index, total, line.line(), line.display_url());
    }

    fn entry_finished(&mut self, _index: usize, _total: usize, record: &EntryRecord) {
        let target = record
            .target
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        match &record.outcome {
            Outcome::Downloaded => println!("  saved: {}", target),
            Outcome::Skipped => println!("  already present: {}", target),
            Outcome::Failed { reason, .. } => println!("  FAILED: {}", reason),
        }
    }
}

pub fn run_batch(cfg: &MdlConfig, opts: RunOptions) -> Result<()> {
    let file = match opts.file {
        Some(f) => f,
        None => match prompt_for_file()? {
            Some(f) => f,
            None => {
                println!("No file provided. Exiting.");
                return Ok(());
            }
        },
    };

    let mut dispatch = DispatchConfig::from_config(cfg);
    if let Some(dir) = opts.output_dir {
        dispatch.downloads_root = dir;
    }
    if opts.no_skip {
        dispatch.skip_existing = false;
    }
    dispatch.checksum = opts.checksum;

    let lines = input::read_url_list(&file)?;
    println!("Found {} entries in {}", lines.len(), file.display());
    println!("Output directory: {}", dispatch.downloads_root.display());

    let dispatcher = Dispatcher::new(dispatch, ExternalHandlers::from_config(cfg));
    let summary = dispatcher.run_with(&lines, &mut ConsoleProgress);

    println!();
    summary.print_summary();

    if let Some(path) = opts.report {
        report::write_json_report(&path, &summary)?;
        println!("Report written to {}", path.display());
    }
    if summary.failed > 0 {
        tracing::warn!(failed = summary.failed, "run completed with failures");
    }
    Ok(())
}

/// Asks for the list path on stdin. Returns `None` on an empty answer or EOF.
fn prompt_for_file() -> Result<Option<PathBuf>> {
    print!("Enter the path to your .txt file containing URLs: ");
    io::stdout().flush().context("flush stdout")?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("read file path from stdin")?;
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
}
