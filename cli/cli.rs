mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use log;
use std::path::Path;
use std::process;

use cli_args::{Cli, CombineOutputOpts, Commands, ProjectConfigOpts};
use repomerge_core::{AppError, Config};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = match e.downcast_ref::<AppError>() {
                Some(AppError::Config(_)) | Some(AppError::TomlParse(_)) => 1,
                Some(AppError::TomlSerialize(_)) | Some(AppError::JsonSerialize(_)) => 6,
                Some(AppError::Io(_))
                | Some(AppError::RootUnreadable { .. })
                | Some(AppError::FileRead { .. })
                | Some(AppError::FileWrite { .. })
                | Some(AppError::DirCreation { .. }) => 2,
                Some(AppError::EmptyUpload)
                | Some(AppError::InvalidUploadPath(_))
                | Some(AppError::UploadTooLarge { .. }) => 3,
                Some(AppError::InvalidArgument(_)) => 5,
                Some(_) => 1,
                None => 1,
            };

            if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }

            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            Cli::command().print_help()?;
        }
        Some(command) => match command {
            Commands::Combine(args) => {
                log::debug!("Executing 'combine' command...");
                commands::combine::handle_combine_command(args, quiet)?;
            }
            Commands::Pack(args) => {
                log::debug!("Executing 'pack' command...");
                commands::pack::handle_pack_command(args, quiet)?;
            }
            Commands::Tree(args) => {
                log::debug!("Executing 'tree' command...");
                commands::tree::handle_tree_command(args)?;
            }
            Commands::Plan(args) => {
                log::debug!("Executing 'plan' command...");
                commands::plan::handle_plan_command(args)?;
            }
            Commands::Config(args) => {
                log::debug!("Executing 'config' command...");
                commands::config::handle_config_command(args, quiet)?;
            }
            Commands::Completion(args) => {
                log::debug!("Executing 'completion' command...");
                commands::completion::handle_completion_command(&args, quiet)?;
            }
        },
    }
    Ok(())
}

/// Loads the config file for `project_root` (unless disabled) and applies
/// the project-level CLI overrides.
pub fn load_config_for_command(
    project_root: &Path,
    project_opts: &ProjectConfigOpts,
) -> Result<Config> {
    let config_path = Config::resolve_config_path(
        project_root,
        project_opts.config.as_ref(),
        project_opts.disable_config,
    )
    .context("Failed to resolve configuration path")?;

    let mut config = match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(name) = &project_opts.name {
        if name.trim().is_empty() {
            anyhow::bail!(AppError::InvalidArgument(
                "Repository name cannot be empty".to_string()
            ));
        }
        config.general.repo_name = Some(name.clone());
    }
    log::trace!("Effective config: {:?}", config);
    Ok(config)
}

pub fn apply_output_overrides(config: &mut Config, opts: &CombineOutputOpts) {
    if let Some(dir) = &opts.output_dir {
        config.output.output_dir = dir.clone();
    }
    if let Some(filename) = &opts.filename {
        config.output.filename = Some(filename.clone());
    }
    if opts.no_tree {
        config.output.include_tree = false;
    }
    if opts.tree {
        config.output.include_tree = true;
    }
}
