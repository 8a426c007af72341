//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};

use flatbind::Config;

pub mod completions;
pub mod generate;
pub mod inspect;

/// Global output settings.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub verbose: bool,
    pub color: bool,
}

/// Load `--config`, or `flatbind.toml` from the current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    Config::discover(explicit, &cwd)
}
