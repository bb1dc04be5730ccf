//! `mdl plan` – dry run: classification and target path per line.

use anyhow::Result;
use mdl_core::config::MdlConfig;
use mdl_core::dispatcher::{DispatchConfig, Dispatcher};
use mdl_core::handlers::ExternalHandlers;
use mdl_core::input::{self, InputLine};
use std::path::{Path, PathBuf};

pub fn run_plan(cfg: &MdlConfig, file: &Path, output_dir: Option<PathBuf>) -> Result<()> {
    let mut dispatch = DispatchConfig::from_config(cfg);
    if let Some(dir) = output_dir {
        dispatch.downloads_root = dir;
    }
    let dispatcher = Dispatcher::new(dispatch, ExternalHandlers::from_config(cfg));

    let lines = input::read_url_list(file)?;
    if lines.is_empty() {
        println!("No entries in {}.", file.display());
        return Ok(());
    }

    println!("{:<6} {:<11} {:<8} {}", "LINE", "KIND", "STATE", "TARGET");
    for line in &lines {
        match line {
            InputLine::Entry(entry) => {
                let plan = dispatcher.plan(entry);
                let state = if plan.satisfied { "present" } else { "pending" };
                println!(
                    "{:<6} {:<11} {:<8} {}",
                    entry.line,
                    plan.kind.to_string(),
                    state,
                    plan.target.display()
                );
            }
            InputLine::Malformed { line, reason, .. } => {
                println!("{:<6} {:<11} {:<8} {}", line, "-", "invalid", reason);
            }
        }
    }
    Ok(())
}
