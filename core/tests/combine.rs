use repomerge_core::{
    AppError, Config, UploadedFile, combine_directory, combine_files, reconstruct, render_tree,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, bytes: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

fn without_tree() -> Config {
    let mut config = Config::default();
    config.output.include_tree = false;
    config
}

fn file_headers(doc: &str) -> Vec<&str> {
    doc.lines()
        .filter(|line| line.starts_with("# ") && !line.starts_with("# Repository: "))
        .collect()
}

#[test]
fn filters_excluded_directories_and_denied_extensions() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path().join("repo");
    write(&root, "a.py", b"print(1)");
    write(&root, "node_modules/x.js", b"module.exports = 1;");
    write(&root, "img.png", &[0x89, b'P', b'N', b'G']);

    let doc = combine_directory(&root, &without_tree()).unwrap();
    assert_eq!(
        doc,
        "# Repository: repo\n\n# a.py\n\n```python\nprint(1)\n```\n\n"
    );

    let with_tree = combine_directory(&root, &Config::default()).unwrap();
    assert_eq!(file_headers(&with_tree), vec!["# a.py"]);
    assert_eq!(with_tree.matches("```python").count(), 1);
    assert!(with_tree.contains("├── node_modules/"));
}

#[test]
fn empty_directory_produces_placeholder_document() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path().join("X");
    fs::create_dir_all(&root).unwrap();
    let doc = combine_directory(&root, &Config::default()).unwrap();
    assert_eq!(doc, "# Repository: X\n\nNo files were found to combine.");
}

#[test]
fn only_filtered_out_files_produce_placeholder_document() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path().join("assets");
    write(&root, "logo.svg", b"<svg/>");
    write(&root, "dist/app.js", b"x");
    let doc = combine_directory(&root, &Config::default()).unwrap();
    assert_eq!(doc, "# Repository: assets\n\nNo files were found to combine.");
}

#[test]
fn latin1_files_are_decoded_not_rejected() {
    let tmp = TempDir::new().expect("tmp");
    write(tmp.path(), "legacy.txt", &[b'r', 0xE9, b's', b'u', b'm', 0xE9]);

    let doc = combine_files(tmp.path(), "r", &without_tree()).unwrap();
    assert!(doc.contains("```\nrésumé\n```"));
    assert!(!doc.contains("Error processing file"));
}

#[cfg(unix)]
#[test]
fn unreadable_file_degrades_to_placeholder_block() {
    let tmp = TempDir::new().expect("tmp");
    write(tmp.path(), "a.py", b"a = 1");
    write(tmp.path(), "c.py", b"c = 3");
    std::os::unix::fs::symlink(tmp.path().join("gone.py"), tmp.path().join("b.py")).unwrap();

    let doc = combine_files(tmp.path(), "r", &without_tree()).unwrap();
    assert_eq!(file_headers(&doc), vec!["# a.py", "# b.py", "# c.py"]);
    let broken = doc
        .split("# b.py\n\n```python\n")
        .nth(1)
        .and_then(|rest| rest.split("\n```").next())
        .unwrap();
    let expected_message = fs::read(tmp.path().join("b.py")).unwrap_err().to_string();
    assert_eq!(broken, format!("Error processing file: {}", expected_message));
}

#[test]
fn document_blocks_follow_tree_order() {
    let tmp = TempDir::new().expect("tmp");
    write(tmp.path(), "main.go", b"package main");
    write(tmp.path(), "Web/index.html", b"<p>");
    write(tmp.path(), "api/handler.ts", b"export {}");
    write(tmp.path(), "README.md", b"Title");

    let doc = combine_files(tmp.path(), "r", &without_tree()).unwrap();
    assert_eq!(
        file_headers(&doc),
        vec!["# api/handler.ts", "# Web/index.html", "# main.go", "# README.md"]
    );
    assert!(doc.contains("# README.md\n\n```\nTitle\n```"));
}

#[test]
fn upload_pipeline_reconstructs_then_combines() {
    let work = TempDir::new().expect("tmp");
    let uploads = vec![
        UploadedFile::new("project/src/app.rs", "fn main() {}"),
        UploadedFile::new("project/.git/HEAD", "ref: refs/heads/main"),
        UploadedFile::new("project/package.json", "{}"),
    ];
    let result = reconstruct(&uploads, work.path(), &Config::default()).unwrap();
    assert_eq!(result.repo_name, "project");

    let tree = render_tree(work.path(), &result.repo_name).unwrap();
    assert_eq!(
        tree,
        "project/\n├── .git/\n├── src/\n│   └── app.rs\n└── package.json"
    );

    let doc = combine_files(work.path(), &result.repo_name, &Config::default()).unwrap();
    assert!(doc.starts_with("# Repository: project\n\n## File Tree\n\n```\nproject/\n"));
    assert_eq!(file_headers(&doc), vec!["# src/app.rs"]);
    assert!(doc.ends_with("# src/app.rs\n\n```rust\nfn main() {}\n```\n\n"));
}

#[test]
fn custom_tables_from_config_are_honoured() {
    let tmp = TempDir::new().expect("tmp");
    write(tmp.path(), "schema.sql", b"select 1;");
    write(tmp.path(), "notes.md", b"hello");
    write(tmp.path(), "vendor/lib.sql", b"select 2;");

    let mut config = Config::from_toml_str(
        r#"
        [filters]
        allowed_extensions = ["SQL", "md"]
        excluded_extensions = ["md"]
        excluded_directories = ["vendor"]

        [languages]
        sql = "postgresql"

        [output]
        include_tree = false
        "#,
    )
    .unwrap();
    let doc = combine_files(tmp.path(), "db", &config).unwrap();
    assert_eq!(
        doc,
        "# Repository: db\n\n# schema.sql\n\n```postgresql\nselect 1;\n```\n\n"
    );

    config.general.repo_name = Some("renamed".to_string());
    let named = combine_directory(tmp.path(), &config).unwrap();
    assert!(named.starts_with("# Repository: renamed\n\n"));
}

#[test]
fn missing_root_fails_the_whole_aggregation() {
    let tmp = TempDir::new().expect("tmp");
    let err = combine_files(&tmp.path().join("absent"), "r", &Config::default()).unwrap_err();
    assert!(matches!(err, AppError::RootUnreadable { .. }));
}

#[test]
fn minified_sources_get_their_own_block() {
    let tmp = TempDir::new().expect("tmp");
    write(tmp.path(), "site.min.css", b"body{}");
    write(tmp.path(), "static/app.min.js", b"f()");

    let doc = combine_files(tmp.path(), "web", &without_tree()).unwrap();
    assert_eq!(
        doc,
        "# Repository: web\n\n\
         # static/app.min.js\n\n```javascript\nf()\n```\n\n\
         # site.min.css\n\n```css\nbody{}\n```\n\n"
    );
}
