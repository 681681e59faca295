use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use colored::*;
use repomerge_core::AppError;
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

use crate::cli_args::{Cli, CompletionArgs};

pub fn handle_completion_command(args: &CompletionArgs, quiet: bool) -> Result<()> {
    let shell = args.shell.unwrap_or(Shell::Fish);
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    if !args.save {
        generate(shell, &mut command, bin_name, &mut io::stdout());
        return Ok(());
    }

    let (save_dir, filename) = completion_location(shell, &bin_name)?;
    let save_path = save_dir.join(&filename);

    if save_path.exists() && !args.force {
        anyhow::bail!(AppError::InvalidArgument(format!(
            "Completion file '{}' already exists. Pass --force to overwrite it.",
            save_path.display()
        )));
    }

    fs::create_dir_all(&save_dir)
        .with_context(|| format!("Failed to create directory {}", save_dir.display()))?;
    let mut file = File::create(&save_path)
        .with_context(|| format!("Failed to create file {}", save_path.display()))?;
    generate(shell, &mut command, bin_name, &mut file);

    if !quiet {
        println!(
            "{} {} completions saved to: {}",
            "✅".green(),
            shell.to_string().cyan(),
            save_path.display().to_string().blue()
        );
    }
    Ok(())
}

fn completion_location(shell: Shell, bin_name: &str) -> Result<(PathBuf, String)> {
    let location = match shell {
        Shell::Fish => dirs::config_dir()
            .map(|p| (p.join("fish").join("completions"), format!("{}.fish", bin_name))),
        Shell::Bash => dirs::data_local_dir().map(|p| {
            (
                p.join("bash-completion").join("completions"),
                bin_name.to_string(),
            )
        }),
        Shell::Zsh => dirs::data_local_dir()
            .map(|p| (p.join("zsh").join("site-functions"), format!("_{}", bin_name))),
        other => anyhow::bail!(AppError::InvalidArgument(format!(
            "Default save location not known for shell: {}",
            other
        ))),
    };
    location.ok_or_else(|| anyhow::anyhow!("Could not determine standard completion directory."))
}
