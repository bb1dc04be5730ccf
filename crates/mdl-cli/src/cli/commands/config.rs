//! `mdl config` – show where the config lives and what is in effect.

use anyhow::Result;
use mdl_core::config::{self, MdlConfig};
use std::path::Path;

pub fn run_show_config(cfg: &MdlConfig, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("# config file: {}", path.display());
    print!("{}", cfg.to_toml()?);
    Ok(())
}
