use crate::config::{Config, DEFAULT_REPO_NAME};
use crate::error::{AppError, Result};
use log;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One uploaded file: the path it was submitted under and its bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub path: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Reconstruction {
    pub root: PathBuf,
    pub repo_name: String,
    pub common_path: String,
    pub files_written: usize,
    pub total_bytes: u128,
}

/// Splits an upload path into normal components.
///
/// Both `/` and `\` separate components. Absolute paths, drive prefixes and
/// `..` that climbs above the path's own start are rejected.
pub fn normalize_upload_path(raw: &str) -> Result<Vec<String>> {
    let invalid = || AppError::InvalidUploadPath(raw.to_string());

    if raw.starts_with('/') || raw.starts_with('\\') || has_drive_prefix(raw) {
        return Err(invalid());
    }

    let mut components: Vec<String> = Vec::new();
    for part in raw.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                components.pop().ok_or_else(invalid)?;
            }
            name => components.push(name.to_string()),
        }
    }

    if components.is_empty() {
        return Err(invalid());
    }
    Ok(components)
}

fn has_drive_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Longest shared prefix of the parent directories of `paths`.
pub fn common_root(paths: &[Vec<String>]) -> Vec<String> {
    let mut parents = paths
        .iter()
        .map(|components| &components[..components.len().saturating_sub(1)]);

    let Some(first) = parents.next() else {
        return Vec::new();
    };
    let mut shared = first.len();
    for parent in parents {
        shared = shared.min(
            first
                .iter()
                .zip(parent.iter())
                .take_while(|(a, b)| a == b)
                .count(),
        );
    }
    first[..shared].to_vec()
}

/// Writes `files` under `destination`, stripping their common root.
///
/// Later uploads that normalise to the same path overwrite earlier ones.
pub fn reconstruct(
    files: &[UploadedFile],
    destination: &Path,
    config: &Config,
) -> Result<Reconstruction> {
    if files.is_empty() {
        return Err(AppError::EmptyUpload);
    }

    let total_bytes: u128 = files.iter().map(|f| f.bytes.len() as u128).sum();
    let limit = config.max_content_length()?;
    if total_bytes > limit {
        return Err(AppError::UploadTooLarge {
            size: total_bytes,
            limit,
        });
    }

    let normalized = files
        .iter()
        .map(|f| normalize_upload_path(&f.path))
        .collect::<Result<Vec<_>>>()?;

    let common = common_root(&normalized);
    let repo_name = common
        .last()
        .cloned()
        .unwrap_or_else(|| DEFAULT_REPO_NAME.to_string());
    let common_path = common.join("/");
    log::debug!("Common path: {}, Repo name: {}", common_path, repo_name);

    for (file, components) in files.iter().zip(&normalized) {
        let mut target = destination.to_path_buf();
        target.extend(&components[common.len()..]);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(&target, &file.bytes).map_err(|e| AppError::FileWrite {
            path: target.clone(),
            source: e,
        })?;
        log::trace!("Saved upload {} to {}", file.path, target.display());
    }

    log::info!(
        "Reconstructed {} uploads ({} bytes) under {}",
        files.len(),
        total_bytes,
        destination.display()
    );
    Ok(Reconstruction {
        root: destination.to_path_buf(),
        repo_name,
        common_path,
        files_written: files.len(),
        total_bytes,
    })
}
