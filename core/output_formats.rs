use crate::error::{AppError, Result};
use log;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SUCCESS_MESSAGE: &str = "Files combined successfully";

/// Summary handed back to whoever asked for the combine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombineReport {
    pub message: String,
    pub filename: String,
    pub file_tree: String,
    pub preview_content: String,
    pub repo_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
}

impl CombineReport {
    pub fn new(repo_name: &str, filename: &str, file_tree: String, content: String) -> Self {
        Self {
            message: SUCCESS_MESSAGE.to_string(),
            filename: filename.to_string(),
            file_tree,
            preview_content: content,
            repo_name: repo_name.to_string(),
            output_path: None,
        }
    }
}

pub fn serialize_report_to_json<T: Serialize>(report: &T, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(report).map_err(AppError::JsonSerialize)
    } else {
        serde_json::to_string(report).map_err(AppError::JsonSerialize)
    }
}

/// Writes the combined document to `output_dir/filename`, creating the
/// directory when needed. Returns the written path.
pub fn write_output(output_dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(|e| AppError::DirCreation {
        path: output_dir.to_path_buf(),
        source: e,
    })?;
    let output_path = output_dir.join(filename);
    fs::write(&output_path, content).map_err(|e| AppError::FileWrite {
        path: output_path.clone(),
        source: e,
    })?;
    log::info!("Combined output written to {}", output_path.display());
    Ok(output_path)
}
