use crate::cli_args::PackArgs;
use crate::commands::combine::combine_and_report;
use crate::{apply_output_overrides, load_config_for_command};
use anyhow::{Context, Result};
use log;
use repomerge_core::{AppError, Config, UploadedFile, reconstruct};
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

pub fn handle_pack_command(args: PackArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    let mut config = load_config_for_command(&project_root, &args.project_config)
        .context("Failed to load configuration for pack command")?;
    apply_output_overrides(&mut config, &args.output);

    let base = match &args.base {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("Failed to read current directory")?,
    };
    let base = base
        .canonicalize()
        .with_context(|| format!("Failed to resolve base directory {}", base.display()))?;

    let uploads = collect_uploads(&args.files, &base)?;
    log::info!("Collected {} files to upload", uploads.len());

    // Removed on drop, whichever way this function exits.
    let workdir = tempfile::Builder::new()
        .prefix("repomerge-")
        .tempdir()
        .context("Failed to create temporary directory")?;
    log::info!(
        "Processing files in temporary directory: {}",
        workdir.path().display()
    );

    let reconstruction = reconstruct(&uploads, workdir.path(), &config)
        .context("Failed to reconstruct uploaded files")?;
    let repo_name = config
        .general
        .repo_name
        .clone()
        .unwrap_or(reconstruction.repo_name);

    combine_and_report(
        workdir.path(),
        &repo_name,
        &config,
        &args.output,
        &args.format_output,
        quiet,
    )
}

fn collect_uploads(inputs: &[PathBuf], base: &Path) -> Result<Vec<UploadedFile>> {
    let mut paths = Vec::new();
    for input in inputs {
        let absolute = input
            .canonicalize()
            .with_context(|| format!("Cannot access {}", input.display()))?;
        if absolute.is_dir() {
            expand_directory(&absolute, &mut paths);
        } else {
            paths.push(absolute);
        }
    }

    if paths.is_empty() {
        anyhow::bail!(AppError::EmptyUpload);
    }

    paths
        .into_iter()
        .map(|path| -> Result<UploadedFile> {
            let upload_path = upload_path_for(&path, base)?;
            let bytes =
                fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(UploadedFile::new(upload_path, bytes))
        })
        .collect()
}

fn expand_directory(dir: &Path, paths: &mut Vec<PathBuf>) {
    let walker = WalkDir::new(dir).follow_links(false).sort_by_file_name();
    for entry_result in walker {
        match entry_result {
            Ok(entry) => {
                if entry.file_type().is_file() {
                    paths.push(entry.into_path());
                } else if !entry.file_type().is_dir() {
                    log::debug!("Skipping non-regular file {}", entry.path().display());
                }
            }
            Err(e) => log::warn!("Skipping unreadable entry under {}: {}", dir.display(), e),
        }
    }
}

/// Relative path of `path` under `base`, `/`-separated as a browser would send it.
fn upload_path_for(path: &Path, base: &Path) -> Result<String> {
    let relative = pathdiff::diff_paths(path, base).ok_or_else(|| {
        AppError::InvalidArgument(format!(
            "Cannot express {} relative to {}",
            path.display(),
            base.display()
        ))
    })?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => anyhow::bail!(AppError::InvalidArgument(format!(
                "{} is outside the base directory {}",
                path.display(),
                base.display()
            ))),
        }
    }
    Ok(parts.join("/"))
}
