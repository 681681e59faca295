use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn repomerge() -> Command {
    Command::cargo_bin("repomerge").expect("Binary exists")
}

#[test]
fn combining_twice_does_not_nest_previous_output() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path().join("myrepo");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("a.py"), "print(1)").unwrap();

    for _ in 0..2 {
        repomerge()
            .current_dir(&root)
            .args(["-q", "combine"])
            .assert()
            .success();
    }

    let output = fs::read_to_string(root.join("uploads/myrepo.md")).unwrap();
    assert_eq!(output.matches("# Repository: myrepo").count(), 1);
    assert_eq!(output.matches("# a.py\n").count(), 1);
    assert!(!output.contains("# uploads/myrepo.md"));
}

#[test]
fn plan_marks_previous_output_file() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path().join("myrepo");
    fs::create_dir_all(root.join("uploads")).unwrap();
    fs::write(root.join("a.py"), "print(1)").unwrap();
    fs::write(root.join("uploads/myrepo.md"), "# Repository: myrepo").unwrap();

    repomerge()
        .current_dir(&root)
        .args(["plan", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"decision\": \"output_file\""));
}

#[test]
fn minified_assets_are_combined() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path().join("site");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("site.min.css"), "body{}").unwrap();

    repomerge()
        .current_dir(&root)
        .args(["-q", "combine", "--stdout", "--no-tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# site.min.css\n\n```css\nbody{}\n```"));
}
