use crate::cli_args::ConfigArgs;
use crate::output::write_to_stdout;
use anyhow::{Context, Result};
use colored::*;
use log;
use repomerge_core::{AppError, Config};
use std::fs;

pub fn handle_config_command(args: ConfigArgs, quiet: bool) -> Result<()> {
    let default_toml = Config::default()
        .to_toml_string()
        .context("Failed to serialize default configuration")?;

    if !args.save {
        return write_to_stdout(&default_toml);
    }

    let project_root = Config::determine_project_root(args.project_root.as_ref())
        .context("Failed to determine project root")?;
    let save_path = Config::default_config_path(&project_root);

    if save_path.exists() && !args.force {
        anyhow::bail!(AppError::InvalidArgument(format!(
            "Config file '{}' already exists. Pass --force to overwrite it.",
            save_path.display()
        )));
    }

    if let Some(parent) = save_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(&save_path, default_toml)
        .with_context(|| format!("Failed to write config file {}", save_path.display()))?;
    log::info!("Default config saved to {}", save_path.display());

    if !quiet {
        println!(
            "{} Default config saved to: {}",
            "✅".green(),
            save_path.display().to_string().blue()
        );
    }
    Ok(())
}
