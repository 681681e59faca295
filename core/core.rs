pub mod config;
pub mod error;
pub mod filter;
pub mod gather;
pub mod output_formats;
pub mod rules;
pub mod tree;
pub mod upload;

pub use config::Config;
pub use error::{AppError, Result};
pub use filter::{FilterDecision, PathFilter};
pub use gather::{
    FileContent, FileEntry, PlannedPath, collect_files, combine_directory, combine_files,
    combine_files_with_reader, plan_directory,
};
pub use output_formats::{CombineReport, write_output};
pub use rules::{ExtensionClass, ExtensionRules};
pub use tree::render_tree;
pub use upload::{Reconstruction, UploadedFile, reconstruct};
