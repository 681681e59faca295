use crate::error::{AppError, Result};
use log;
use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

#[derive(Debug)]
pub(crate) struct TreeEntry {
    pub(crate) name: String,
    pub(crate) path: PathBuf,
    pub(crate) is_dir: bool,
}

/// Sibling order shared by the tree and the content walk: directories
/// first, then case-insensitive name, then the raw name.
pub(crate) fn sibling_order(
    a_is_dir: bool,
    a_name: &str,
    b_is_dir: bool,
    b_name: &str,
) -> Ordering {
    b_is_dir
        .cmp(&a_is_dir)
        .then_with(|| a_name.to_lowercase().cmp(&b_name.to_lowercase()))
        .then_with(|| a_name.cmp(b_name))
}

/// Renders the full, unfiltered structure under `root`.
///
/// Directories whose name starts with a dot are listed but never opened;
/// dotfiles are listed like any other file. Fails only when `root` itself
/// cannot be listed.
pub fn render_tree(root: &Path, display_name: &str) -> Result<String> {
    log::debug!("Rendering tree for {}", root.display());
    let children = list_children(root).map_err(|e| AppError::RootUnreadable {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut lines = vec![format!("{}/", display_name)];
    render_children(children, "", &mut lines);
    log::debug!("Tree rendered with {} lines", lines.len());
    Ok(lines.join("\n"))
}

fn render_children(children: Vec<TreeEntry>, prefix: &str, lines: &mut Vec<String>) {
    let count = children.len();
    for (index, child) in children.into_iter().enumerate() {
        let is_last = index + 1 == count;
        let branch = if is_last { LAST_BRANCH } else { BRANCH };
        let suffix = if child.is_dir { "/" } else { "" };
        lines.push(format!("{}{}{}{}", prefix, branch, child.name, suffix));

        if !child.is_dir {
            continue;
        }
        if child.name.starts_with('.') {
            log::trace!("Not descending into hidden directory {}", child.path.display());
            continue;
        }

        let child_prefix = format!(
            "{}{}",
            prefix,
            if is_last { SPACE_INDENT } else { PIPE_INDENT }
        );
        match list_children(&child.path) {
            Ok(grandchildren) => render_children(grandchildren, &child_prefix, lines),
            Err(e) => log::warn!("Cannot list directory {}: {}", child.path.display(), e),
        }
    }
}

/// Immediate children of `dir`, sorted with [`sibling_order`]. Symlinks are
/// never followed.
pub(crate) fn list_children(dir: &Path) -> io::Result<Vec<TreeEntry>> {
    let mut children = Vec::new();
    for entry_result in fs::read_dir(dir)? {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Error reading entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let is_dir = entry.file_type().map_or(false, |ft| ft.is_dir());
        children.push(TreeEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
            is_dir,
        });
    }
    children.sort_by(|a, b| sibling_order(a.is_dir, &a.name, b.is_dir, &b.name));
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn renders_directories_first_with_branch_glyphs() {
        let tmp = TempDir::new().expect("tmp");
        touch(tmp.path(), "b.txt");
        touch(tmp.path(), "A.md");
        touch(tmp.path(), "src/main.rs");
        touch(tmp.path(), "src/util/mod.rs");
        touch(tmp.path(), "docs/guide.md");

        let tree = render_tree(tmp.path(), "repo").unwrap();
        let expected = [
            "repo/",
            "├── docs/",
            "│   └── guide.md",
            "├── src/",
            "│   ├── util/",
            "│   │   └── mod.rs",
            "│   └── main.rs",
            "├── A.md",
            "└── b.txt",
        ]
        .join("\n");
        assert_eq!(tree, expected);
    }

    #[test]
    fn hidden_directories_are_listed_but_not_opened() {
        let tmp = TempDir::new().expect("tmp");
        touch(tmp.path(), ".cache/blob/data.bin");
        touch(tmp.path(), ".cache/index");
        touch(tmp.path(), ".env");
        touch(tmp.path(), "main.py");

        let tree = render_tree(tmp.path(), "repo").unwrap();
        let expected = ["repo/", "├── .cache/", "├── .env", "└── main.py"].join("\n");
        assert_eq!(tree, expected);
    }

    #[test]
    fn excluded_directories_still_appear_in_tree() {
        let tmp = TempDir::new().expect("tmp");
        touch(tmp.path(), "node_modules/x.js");
        touch(tmp.path(), "img.png");

        let tree = render_tree(tmp.path(), "repo").unwrap();
        assert!(tree.contains("├── node_modules/\n│   └── x.js"));
        assert!(tree.ends_with("└── img.png"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let tmp = TempDir::new().expect("tmp");
        for name in ["zeta.rs", "Alpha.rs", "beta/one.rs", "Gamma/two.rs", "alpha.rs"] {
            touch(tmp.path(), name);
        }
        let first = render_tree(tmp.path(), "r").unwrap();
        let second = render_tree(tmp.path(), "r").unwrap();
        assert_eq!(first, second);
        let lines: Vec<&str> = first.lines().collect();
        assert_eq!(lines[1], "├── beta/");
        assert_eq!(lines[3], "├── Gamma/");
        assert_eq!(lines[5], "├── Alpha.rs");
        assert_eq!(lines[6], "├── alpha.rs");
        assert_eq!(lines[7], "└── zeta.rs");
    }

    #[test]
    fn empty_root_renders_only_display_name() {
        let tmp = TempDir::new().expect("tmp");
        assert_eq!(render_tree(tmp.path(), "empty").unwrap(), "empty/");
    }

    #[test]
    fn missing_root_is_a_structural_error() {
        let tmp = TempDir::new().expect("tmp");
        let err = render_tree(&tmp.path().join("missing"), "x").unwrap_err();
        assert!(matches!(err, AppError::RootUnreadable { .. }));
    }
}
