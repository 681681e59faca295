use crate::cli_args::{CombineArgs, CombineOutputOpts, FormatOutputOpts};
use crate::output::{print_data_or_text, write_to_stdout};
use crate::{apply_output_overrides, load_config_for_command};
use anyhow::{Context, Result};
use colored::*;
use log;
use repomerge_core::{CombineReport, Config, combine_files, render_tree, write_output};
use std::path::Path;

pub fn handle_combine_command(args: CombineArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let mut config = load_config_for_command(&project_root, &args.project_config)
        .context("Failed to load configuration for combine command")?;
    apply_output_overrides(&mut config, &args.output);

    let repo_name = config.get_effective_repo_name(&project_root);
    combine_and_report(
        &project_root,
        &repo_name,
        &config,
        &args.output,
        &args.format_output,
        quiet,
    )
}

/// Renders the tree, combines the files under `root` and either prints the
/// document or writes it to the configured output directory.
pub fn combine_and_report(
    root: &Path,
    repo_name: &str,
    config: &Config,
    output_opts: &CombineOutputOpts,
    format_opts: &FormatOutputOpts,
    quiet: bool,
) -> Result<()> {
    let file_tree = render_tree(root, repo_name)
        .with_context(|| format!("Failed to render tree for {}", root.display()))?;
    log::info!("Generated file tree:\n{}", file_tree);

    let combined = combine_files(root, repo_name, config)
        .with_context(|| format!("Failed to combine files under {}", root.display()))?;

    if output_opts.stdout {
        return write_to_stdout(&combined);
    }

    let filename = config.output_filename(repo_name);
    let output_path = write_output(&config.output.output_dir, &filename, &combined)
        .context("Failed to write combined output")?;

    let mut report = CombineReport::new(repo_name, &filename, file_tree, combined);
    report.output_path = Some(output_path.clone());

    let summary = format!(
        "{} {} combined into {}",
        "✅".green(),
        repo_name.cyan(),
        output_path.display().to_string().blue()
    );
    if quiet && format_opts.format.as_deref() != Some("json") {
        return Ok(());
    }
    print_data_or_text(&report, Some(summary), format_opts, "text")
}
