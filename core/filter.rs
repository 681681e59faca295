use crate::rules::ExtensionRules;
use log;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Why a path was kept or dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "detail", rename_all = "snake_case")]
pub enum FilterDecision {
    Included,
    OutputFile,
    ExcludedDirectory(String),
    ExcludedExtension(String),
    NotAllowed(String),
}

impl FilterDecision {
    pub fn is_included(&self) -> bool {
        matches!(self, FilterDecision::Included)
    }
}

impl fmt::Display for FilterDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterDecision::Included => write!(f, "included"),
            FilterDecision::OutputFile => write!(f, "combined output file"),
            FilterDecision::ExcludedDirectory(name) => write!(f, "excluded directory '{}'", name),
            FilterDecision::ExcludedExtension(ext) => write!(f, "excluded extension '{}'", ext),
            FilterDecision::NotAllowed(ext) if ext.is_empty() => write!(f, "no extension"),
            FilterDecision::NotAllowed(ext) => write!(f, "extension '{}' not allowed", ext),
        }
    }
}

/// Combines the extension rules with the excluded directory names.
///
/// Only paths relative to the traversal root are inspected, so directories
/// above the root never cause an exclusion.
#[derive(Debug, Clone)]
pub struct PathFilter {
    rules: ExtensionRules,
    excluded_directories: HashSet<String>,
    skipped_files: HashSet<PathBuf>,
}

impl PathFilter {
    pub fn new<I, S>(rules: ExtensionRules, excluded_directories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rules,
            excluded_directories: excluded_directories
                .into_iter()
                .map(|name| name.as_ref().to_string())
                .collect(),
            skipped_files: HashSet::new(),
        }
    }

    /// Never include the file at `relative_path`, whatever its extension.
    pub fn skip_file(&mut self, relative_path: impl Into<PathBuf>) {
        self.skipped_files.insert(relative_path.into());
    }

    pub fn rules(&self) -> &ExtensionRules {
        &self.rules
    }

    /// First component of `relative_path` naming an excluded directory.
    pub fn excluded_component<'p>(&self, relative_path: &'p Path) -> Option<&'p str> {
        relative_path.components().find_map(|c| match c {
            Component::Normal(name) => name
                .to_str()
                .filter(|n| self.excluded_directories.contains(*n)),
            _ => None,
        })
    }

    pub fn decide(&self, relative_path: &Path) -> FilterDecision {
        if let Some(name) = self.excluded_component(relative_path) {
            return FilterDecision::ExcludedDirectory(name.to_string());
        }
        if self.skipped_files.contains(relative_path) {
            return FilterDecision::OutputFile;
        }

        let file_name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let class = self.rules.classify_file_name(&file_name);
        let extension = crate::rules::extension_of(&file_name)
            .unwrap_or("")
            .to_lowercase();

        if class.excluded {
            FilterDecision::ExcludedExtension(extension)
        } else if !class.allowed {
            FilterDecision::NotAllowed(extension)
        } else {
            FilterDecision::Included
        }
    }

    pub fn should_include(&self, relative_path: &Path) -> bool {
        let decision = self.decide(relative_path);
        log::trace!("{}: {}", relative_path.display(), decision);
        decision.is_included()
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new(
            ExtensionRules::default(),
            crate::rules::mapping::DEFAULT_EXCLUDED_DIRECTORIES.iter().copied(),
        )
    }
}
