use log;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

pub mod mapping;

static BUILTIN_RULES: Lazy<ExtensionRules> = Lazy::new(|| {
    ExtensionRules::new(
        mapping::DEFAULT_ALLOWED_EXTENSIONS.iter().copied(),
        mapping::DEFAULT_EXCLUDED_EXTENSIONS.iter().copied(),
        HashMap::new(),
    )
});

/// Classification of a single extension against the allow and deny lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionClass<'a> {
    pub allowed: bool,
    pub excluded: bool,
    /// Fence tag for the combined document, empty when unknown.
    pub language: &'a str,
}

/// Allow-list, deny-list and language overrides. Built once and only read
/// afterwards, so a shared reference can be handed to every reader thread.
#[derive(Debug, Clone)]
pub struct ExtensionRules {
    allowed: HashSet<String>,
    excluded: HashSet<String>,
    languages: HashMap<String, String>,
}

impl ExtensionRules {
    pub fn new<A, E, S>(allowed: A, excluded: E, languages: HashMap<String, String>) -> Self
    where
        A: IntoIterator<Item = S>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed: HashSet<String> = allowed
            .into_iter()
            .map(|ext| ext.as_ref().to_lowercase())
            .collect();

        let excluded: HashSet<String> = excluded
            .into_iter()
            .map(|ext| ext.as_ref().to_lowercase())
            .collect();

        let languages = languages
            .into_iter()
            .map(|(ext, tag)| (ext.to_lowercase(), tag))
            .collect();

        log::trace!(
            "Extension rules built: {} allowed, {} excluded",
            allowed.len(),
            excluded.len()
        );

        Self {
            allowed,
            excluded,
            languages,
        }
    }

    /// The reference tables.
    pub fn builtin() -> &'static ExtensionRules {
        &BUILTIN_RULES
    }

    pub fn classify(&self, extension: &str) -> ExtensionClass<'_> {
        let ext = extension.to_lowercase();
        ExtensionClass {
            allowed: !ext.is_empty() && self.allowed.contains(&ext),
            excluded: self.excluded.contains(&ext),
            language: self.language_for(&ext),
        }
    }

    /// Classifies a bare file name (no directory components) by the text
    /// after its last dot.
    ///
    /// Names without a dot are never allowed; they are excluded only when the
    /// whole name appears in the deny-list.
    pub fn classify_file_name(&self, file_name: &str) -> ExtensionClass<'_> {
        match extension_of(file_name) {
            Some(ext) => self.classify(ext),
            None => ExtensionClass {
                allowed: false,
                excluded: self.excluded.contains(&file_name.to_lowercase()),
                language: "",
            },
        }
    }

    pub fn language_tag(&self, file_name: &str) -> &str {
        extension_of(file_name)
            .map(|ext| self.language_for(&ext.to_lowercase()))
            .unwrap_or("")
    }

    fn language_for(&self, lower_ext: &str) -> &str {
        if let Some(tag) = self.languages.get(lower_ext) {
            return tag;
        }
        mapping::language_for_extension(lower_ext).unwrap_or("")
    }
}

impl Default for ExtensionRules {
    fn default() -> Self {
        BUILTIN_RULES.clone()
    }
}

/// Text after the last dot, as written. `None` when the name has no dot.
pub fn extension_of(file_name: &str) -> Option<&str> {
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_extensions_are_case_insensitive() {
        let rules = ExtensionRules::builtin();
        let class = rules.classify("PY");
        assert!(class.allowed);
        assert!(!class.excluded);
        assert_eq!(class.language, "python");
    }

    #[test]
    fn deny_list_is_evaluated_independently() {
        let rules = ExtensionRules::new(["rs", "json"], ["json"], HashMap::new());
        let class = rules.classify("json");
        assert!(class.allowed);
        assert!(class.excluded);
    }

    #[test]
    fn names_without_dot_are_not_allowed() {
        let rules = ExtensionRules::builtin();
        let class = rules.classify_file_name("Makefile");
        assert!(!class.allowed);
        assert!(!class.excluded);
        assert_eq!(class.language, "");
    }

    #[test]
    fn bare_name_in_deny_list_is_excluded() {
        let rules = ExtensionRules::builtin();
        assert!(rules.classify_file_name("DS_Store").excluded);
    }

    #[test]
    fn dotfiles_use_text_after_the_dot() {
        let rules = ExtensionRules::builtin();
        let class = rules.classify_file_name(".env");
        assert!(!class.allowed);
        assert!(!class.excluded);
        assert!(rules.classify_file_name(".DS_Store").excluded);
    }

    #[test]
    fn only_the_last_extension_is_classified() {
        let rules = ExtensionRules::builtin();
        let class = rules.classify_file_name("vendor.min.js");
        assert!(class.allowed);
        assert!(!class.excluded);
        assert_eq!(class.language, "javascript");
        assert!(!rules.classify_file_name("site.MIN.css").excluded);
        assert!(rules.classify_file_name("bundle.js.map").excluded);
    }

    #[test]
    fn unknown_languages_are_untagged() {
        let rules = ExtensionRules::builtin();
        assert_eq!(rules.language_tag("notes.txt"), "");
        assert_eq!(rules.language_tag("README.md"), "");
        assert_eq!(rules.language_tag("lib.h"), "cpp");
        assert_eq!(rules.language_tag("Main.KT"), "kotlin");
    }

    #[test]
    fn language_overrides_take_precedence() {
        let mut languages = HashMap::new();
        languages.insert("MD".to_string(), "markdown".to_string());
        languages.insert("h".to_string(), "c".to_string());
        let rules = ExtensionRules::new(["md", "h"], Vec::<&str>::new(), languages);
        assert_eq!(rules.language_tag("README.md"), "markdown");
        assert_eq!(rules.language_tag("lib.h"), "c");
        assert_eq!(rules.language_tag("main.rs"), "rust");
    }

    #[test]
    fn trailing_dot_yields_empty_extension() {
        let rules = ExtensionRules::builtin();
        assert_eq!(extension_of("weird."), Some(""));
        assert!(!rules.classify_file_name("weird.").allowed);
    }
}
