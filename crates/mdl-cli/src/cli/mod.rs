//! CLI for the MDL batch media downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mdl_core::config::{self, MdlConfig};
use std::path::PathBuf;

use commands::{run_batch, run_plan, run_show_config, RunOptions};

/// Top-level CLI for the MDL batch media downloader.
#[derive(Debug, Parser)]
#[command(name = "mdl")]
#[command(about = "MDL: download PDFs, HLS streams and video-site links from a URL list", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/mdl/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every URL in a list file, one per line.
    Run {
        /// Text file with one URL per line (`Title: URL` also accepted). Prompted for if omitted.
        file: Option<PathBuf>,

        /// Root of the output tree (overrides `downloads_dir` in config).
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Re-download even when the target already exists.
        #[arg(long)]
        no_skip: bool,

        /// Write a JSON report of every entry to this path.
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,

        /// Record SHA-256 of every downloaded file in the report.
        #[arg(long)]
        checksum: bool,
    },

    /// Show how each line would be classified and where it would be saved. Downloads nothing.
    Plan {
        /// Text file with one URL per line.
        file: PathBuf,

        /// Root of the output tree (overrides `downloads_dir` in config).
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Print the config file location and the effective configuration.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_ref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                file,
                output_dir,
                no_skip,
                report,
                checksum,
            } => {
                let opts = RunOptions {
                    file,
                    output_dir,
                    no_skip,
                    report,
                    checksum,
                };
                run_batch(&cfg, opts)?;
            }
            CliCommand::Plan { file, output_dir } => run_plan(&cfg, &file, output_dir)?,
            CliCommand::Config => run_show_config(&cfg, cli.config.as_deref())?,
        }

        Ok(())
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<MdlConfig> {
    match path {
        Some(p) => config::load_from_path(p),
        None => config::load_or_init(),
    }
}

#[cfg(test)]
mod tests;
