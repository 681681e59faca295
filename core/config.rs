use crate::error::{AppError, Result};
use crate::filter::PathFilter;
use crate::rules::{ExtensionRules, mapping};
use byte_unit::Byte;
use log;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_DIR: &str = ".repomerge";
pub const DEFAULT_CONFIG_FILENAME: &str = "repomerge.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "uploads";
pub const DEFAULT_MAX_CONTENT_LENGTH: &str = "1000MB";
pub const DEFAULT_REPO_NAME: &str = "default_repo_name";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default)]
    pub repo_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_excluded_extensions")]
    pub excluded_extensions: Vec<String>,
    #[serde(default = "default_excluded_directories")]
    pub excluded_directories: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default = "default_true")]
    pub include_tree: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    #[serde(default = "default_max_content_length")]
    pub max_content_length: String,
}

fn default_true() -> bool {
    true
}
fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
fn default_allowed_extensions() -> Vec<String> {
    to_strings(mapping::DEFAULT_ALLOWED_EXTENSIONS)
}
fn default_excluded_extensions() -> Vec<String> {
    to_strings(mapping::DEFAULT_EXCLUDED_EXTENSIONS)
}
fn default_excluded_directories() -> Vec<String> {
    to_strings(mapping::DEFAULT_EXCLUDED_DIRECTORIES)
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}
fn default_max_content_length() -> String {
    DEFAULT_MAX_CONTENT_LENGTH.to_string()
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            excluded_extensions: default_excluded_extensions(),
            excluded_directories: default_excluded_directories(),
        }
    }
}
impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            filename: None,
            include_tree: default_true(),
        }
    }
}
impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_content_length: default_max_content_length(),
        }
    }
}

impl Config {
    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_to_resolve = match cli_project_root {
            Some(p) => {
                let p_str = p.to_string_lossy();
                PathBuf::from(shellexpand::tilde(&p_str).into_owned())
            }
            None => env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize project root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })
    }

    pub fn resolve_config_path(
        project_root: &Path,
        cli_config_file: Option<&String>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(p_str) => {
                let mut path = PathBuf::from(shellexpand::tilde(p_str).into_owned());
                if !path.exists() && path.extension().is_none() {
                    path.set_extension("toml");
                }
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(Some(path))
            }
            None => {
                let default_path = Self::default_config_path(project_root);
                if default_path.exists() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn default_config_path(project_root: &Path) -> PathBuf {
        project_root
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILENAME)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&toml_content).map_err(|e| match e {
            AppError::TomlParse(msg) => AppError::TomlParse(format!(
                "Error parsing config file '{}': {}",
                config_path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn from_toml_str(toml_content: &str) -> Result<Self> {
        toml::from_str::<Config>(toml_content).map_err(|e| {
            AppError::TomlParse(format!("{}. Check TOML syntax and structure.", e))
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn extension_rules(&self) -> ExtensionRules {
        ExtensionRules::new(
            &self.filters.allowed_extensions,
            &self.filters.excluded_extensions,
            self.languages.clone().into_iter().collect(),
        )
    }

    pub fn path_filter(&self) -> PathFilter {
        PathFilter::new(self.extension_rules(), &self.filters.excluded_directories)
    }

    /// Filter for combining `root` under `repo_name`. When the output file
    /// would land inside `root` it is skipped, so a rerun does not pick up
    /// the previous document.
    pub fn path_filter_for(&self, root: &Path, repo_name: &str) -> PathFilter {
        let mut filter = self.path_filter();
        if let Some(relative) = self.output_path_within(root, repo_name) {
            log::debug!("Skipping combined output at {}", relative.display());
            filter.skip_file(relative);
        }
        filter
    }

    /// Path of the output file relative to `root`, if it lies under it.
    /// A relative `output_dir` is taken from the current directory.
    pub fn output_path_within(&self, root: &Path, repo_name: &str) -> Option<PathBuf> {
        let output_dir = if self.output.output_dir.is_absolute() {
            self.output.output_dir.clone()
        } else {
            env::current_dir().ok()?.join(&self.output.output_dir)
        };
        let output_dir = output_dir.canonicalize().unwrap_or(output_dir);
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let relative = output_dir.strip_prefix(&root).ok()?;
        Some(relative.join(self.output_filename(repo_name)))
    }

    /// Upload size limit in bytes.
    pub fn max_content_length(&self) -> Result<u128> {
        let byte_value = Byte::from_str(&self.upload.max_content_length).map_err(|e| {
            AppError::Config(format!(
                "Invalid max_content_length '{}': {}. Use KB, MB, etc.",
                self.upload.max_content_length, e
            ))
        })?;
        let limit: u128 = byte_value.into();
        Ok(limit)
    }

    pub fn get_effective_repo_name(&self, project_root: &Path) -> String {
        self.general
            .repo_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| repo_name_from_path(project_root))
    }

    pub fn output_filename(&self, repo_name: &str) -> String {
        self.output
            .filename
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("{}.md", repo_name))
    }
}

pub fn repo_name_from_path(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_REPO_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_tables() {
        let config = Config::default();
        assert!(config.filters.allowed_extensions.contains(&"py".to_string()));
        assert!(config.filters.excluded_extensions.contains(&"min.js".to_string()));
        assert!(config.filters.excluded_directories.contains(&"node_modules".to_string()));
        assert!(config.output.include_tree);
        assert_eq!(config.output.output_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = Config::from_toml_str("").expect("empty config parses");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = Config::from_toml_str(
            r#"
            [filters]
            allowed_extensions = ["rs"]

            [languages]
            md = "markdown"
            "#,
        )
        .expect("config parses");
        assert_eq!(config.filters.allowed_extensions, vec!["rs".to_string()]);
        assert_eq!(
            config.filters.excluded_directories,
            default_excluded_directories()
        );
        assert_eq!(config.extension_rules().language_tag("a.md"), "markdown");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::from_toml_str("[output]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, AppError::TomlParse(_)));
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let text = config.to_toml_string().expect("serializes");
        assert_eq!(Config::from_toml_str(&text).expect("parses"), config);
    }

    #[test]
    fn max_content_length_parses_units() {
        let mut config = Config::default();
        assert_eq!(config.max_content_length().unwrap(), 1_000_000_000);
        config.upload.max_content_length = "2 KiB".to_string();
        assert_eq!(config.max_content_length().unwrap(), 2048);
        config.upload.max_content_length = "lots".to_string();
        assert!(matches!(
            config.max_content_length(),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn output_path_is_resolved_against_the_root() {
        let tmp = tempfile::TempDir::new().expect("tmp");
        let mut config = Config::default();
        config.output.output_dir = tmp.path().join("uploads");
        assert_eq!(
            config.output_path_within(tmp.path(), "repo"),
            Some(PathBuf::from("uploads/repo.md"))
        );
        config.output.output_dir = tmp.path().to_path_buf();
        config.output.filename = Some("out.md".to_string());
        assert_eq!(
            config.output_path_within(tmp.path(), "repo"),
            Some(PathBuf::from("out.md"))
        );

        let elsewhere = tempfile::TempDir::new().expect("tmp");
        config.output.output_dir = elsewhere.path().to_path_buf();
        assert_eq!(config.output_path_within(tmp.path(), "repo"), None);
    }

    #[test]
    fn repo_name_prefers_override_then_directory() {
        let mut config = Config::default();
        assert_eq!(
            config.get_effective_repo_name(Path::new("/work/my-repo")),
            "my-repo"
        );
        assert_eq!(config.get_effective_repo_name(Path::new("/")), DEFAULT_REPO_NAME);
        config.general.repo_name = Some("named".to_string());
        assert_eq!(config.get_effective_repo_name(Path::new("/work/x")), "named");
        assert_eq!(config.output_filename("named"), "named.md");
        config.output.filename = Some("combined_output.md".to_string());
        assert_eq!(config.output_filename("named"), "combined_output.md");
    }
}
