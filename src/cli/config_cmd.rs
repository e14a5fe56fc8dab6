//! Config CLI commands

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::storage::Config;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a default config file if none exists
    Init,
}

pub fn run(
    cmd: ConfigCommands,
    output: &Output,
    path: Option<&Path>,
    api_url: Option<String>,
) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(output, path, api_url),
        ConfigCommands::Init => init(output, path),
    }
}

fn show(output: &Output, path: Option<&Path>, api_url: Option<String>) -> Result<()> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::default(),
    }
    .with_api_url(api_url)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "path": path.map(|p| p.display().to_string()),
            "config": config,
        }));
    } else {
        match path {
            Some(path) => println!("# {}", path.display()),
            None => println!("# (no config directory available, using defaults)"),
        }
        print!("{}", config.to_toml()?);
    }

    Ok(())
}

fn init(output: &Output, path: Option<&Path>) -> Result<()> {
    let path = path.context("Could not determine config directory; pass --config PATH")?;

    if Config::init_file(path)? {
        output.success(&format!("Wrote config to {}", path.display()));
    } else {
        output.success(&format!("Config already exists at {}", path.display()));
    }

    Ok(())
}
