use crate::config::Config;
use crate::error::{AppError, Result};
use crate::filter::{FilterDecision, PathFilter};
use crate::tree::{self, TreeEntry};
use log;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const NO_FILES_MESSAGE: &str = "No files were found to combine.";

/// A file that passed the filter and is waiting to be read.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub language: String,
}

/// Outcome of reading one file. Failures are folded into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Failed(String),
}

impl FileContent {
    pub fn as_document_text(&self) -> String {
        match self {
            FileContent::Text(text) => text.clone(),
            FileContent::Failed(message) => format!("Error processing file: {}", message),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedPath {
    pub relative_path: String,
    pub is_dir: bool,
    #[serde(flatten)]
    pub decision: FilterDecision,
}

enum WalkItem {
    File { path: PathBuf, relative_path: PathBuf },
    Pruned { relative_path: PathBuf, name: String },
}

/// Depth-first walk in tree order. Excluded directories are reported and
/// never listed.
fn walk_pruned<F>(root: &Path, filter: &PathFilter, visit: &mut F) -> Result<()>
where
    F: FnMut(WalkItem),
{
    let children = tree::list_children(root).map_err(|e| AppError::RootUnreadable {
        path: root.to_path_buf(),
        source: e,
    })?;
    walk_children(children, Path::new(""), filter, visit);
    Ok(())
}

fn walk_children<F>(children: Vec<TreeEntry>, relative_dir: &Path, filter: &PathFilter, visit: &mut F)
where
    F: FnMut(WalkItem),
{
    for child in children {
        let relative_path = relative_dir.join(&child.name);
        if !child.is_dir {
            visit(WalkItem::File {
                path: child.path,
                relative_path,
            });
            continue;
        }

        if let Some(name) = filter.excluded_component(&relative_path) {
            log::trace!("Pruning excluded directory: {}", relative_path.display());
            let name = name.to_string();
            visit(WalkItem::Pruned {
                relative_path,
                name,
            });
            continue;
        }

        match tree::list_children(&child.path) {
            Ok(grandchildren) => walk_children(grandchildren, &relative_path, filter, visit),
            Err(e) => log::warn!("Cannot list directory {}: {}", child.path.display(), e),
        }
    }
}

/// Files under `root` that pass `filter`, in tree order.
pub fn collect_files(root: &Path, filter: &PathFilter) -> Result<Vec<FileEntry>> {
    log::debug!("Collecting files under {}", root.display());
    let mut files = Vec::new();
    walk_pruned(root, filter, &mut |item| {
        if let WalkItem::File {
            path,
            relative_path,
        } = item
        {
            if filter.should_include(&relative_path) {
                let file_name = relative_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                files.push(FileEntry {
                    language: filter.rules().language_tag(&file_name).to_string(),
                    path,
                    relative_path,
                });
            }
        }
    })?;
    log::info!("{} files selected for combining", files.len());
    Ok(files)
}

/// Every path the content walk visits, with the filter's verdict.
pub fn plan_directory(root: &Path, filter: &PathFilter) -> Result<Vec<PlannedPath>> {
    let mut planned = Vec::new();
    walk_pruned(root, filter, &mut |item| match item {
        WalkItem::File { relative_path, .. } => planned.push(PlannedPath {
            decision: filter.decide(&relative_path),
            relative_path: relative_path.to_string_lossy().into_owned(),
            is_dir: false,
        }),
        WalkItem::Pruned {
            relative_path,
            name,
        } => planned.push(PlannedPath {
            relative_path: relative_path.to_string_lossy().into_owned(),
            is_dir: true,
            decision: FilterDecision::ExcludedDirectory(name),
        }),
    })?;
    Ok(planned)
}

/// Strict UTF-8 first, then one byte per character (ISO-8859-1).
pub fn decode_text(bytes: Vec<u8>, path: &Path) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::warn!(
                "UTF-8 decoding failed for {}. Trying ISO-8859-1.",
                path.display()
            );
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

pub fn read_file_content<R>(path: &Path, reader: &R) -> FileContent
where
    R: Fn(&Path) -> io::Result<Vec<u8>>,
{
    match reader(path) {
        Ok(bytes) => FileContent::Text(decode_text(bytes, path)),
        Err(e) => {
            log::error!("Error processing file {}: {}", path.display(), e);
            FileContent::Failed(e.to_string())
        }
    }
}

pub fn format_file_block(relative_path: &Path, language: &str, content: &str) -> String {
    format!(
        "# {}\n\n```{}\n{}\n```\n\n",
        relative_path.display(),
        language,
        content
    )
}

pub fn empty_document(repo_name: &str) -> String {
    format!("# Repository: {}\n\n{}", repo_name, NO_FILES_MESSAGE)
}

/// Combines `root` using its directory name (or the configured override).
pub fn combine_directory(root: &Path, config: &Config) -> Result<String> {
    let repo_name = config.get_effective_repo_name(root);
    combine_files(root, &repo_name, config)
}

pub fn combine_files(root: &Path, repo_name: &str, config: &Config) -> Result<String> {
    combine_files_with_reader(root, repo_name, config, |path: &Path| fs::read(path))
}

/// Builds the combined document, reading file bytes through `reader`.
///
/// Reads run on the rayon pool; blocks keep the walk order regardless of
/// which read finishes first.
pub fn combine_files_with_reader<R>(
    root: &Path,
    repo_name: &str,
    config: &Config,
    reader: R,
) -> Result<String>
where
    R: Fn(&Path) -> io::Result<Vec<u8>> + Sync,
{
    let filter = config.path_filter_for(root, repo_name);
    let files = collect_files(root, &filter)?;

    if files.is_empty() {
        log::warn!("No files to process in {}", root.display());
        return Ok(empty_document(repo_name));
    }

    let mut document = format!("# Repository: {}\n\n", repo_name);
    if config.output.include_tree {
        let file_tree = tree::render_tree(root, repo_name)?;
        document.push_str(&format!("## File Tree\n\n```\n{}\n```\n\n", file_tree));
    }

    log::info!("Reading {} files...", files.len());
    let blocks: Vec<String> = files
        .par_iter()
        .map(|entry| {
            let content = read_file_content(&entry.path, &reader);
            format_file_block(
                &entry.relative_path,
                &entry.language,
                &content.as_document_text(),
            )
        })
        .collect();

    for block in blocks {
        document.push_str(&block);
    }
    log::info!("Combined {} files for {}", files.len(), repo_name);
    Ok(document)
}
