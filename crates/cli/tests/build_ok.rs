use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn mystage(xdg: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mystage"));
    cmd.env("XDG_CONFIG_HOME", xdg);
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn build_stages_vault_and_writes_config() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("research_biology_md_local");
    let staging = tmp.path().join("_build_staging");
    write_file(
        &source.join("protein_lab/1_eln/Day 1.md"),
        "# Day 1\n\n![[Lab%20Notebook.stl]]\n",
    );
    write_file(&source.join("protein_lab/4_aux/Lab Notebook.stl"), "solid\n");

    mystage(tmp.path())
        .arg("build")
        .arg(&source)
        .arg("--staging")
        .arg(&staging)
        .assert()
        .success()
        .stdout(predicate::str::contains("Build preparation complete"))
        .stdout(predicate::str::contains("Files staged:        2"))
        .stdout(predicate::str::contains("Book:            research_biology_md"))
        .stdout(predicate::str::contains("myst start"));

    let doc = fs::read_to_string(staging.join("protein_lab/1_eln/Day_1.md")).unwrap();
    assert!(doc.contains("[📎 Lab Notebook.stl](../4_aux/Lab_Notebook.stl)"));
    assert!(staging.join("protein_lab/4_aux/Lab_Notebook.stl").is_file());
    assert!(staging.join("myst.yml").is_file());
    assert!(!source.join("myst.yml").exists());
}

#[test]
fn build_from_inside_vault_uses_sibling_staging() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("vault");
    write_file(&source.join("note.md"), "# Note\n");

    mystage(tmp.path()).current_dir(&source).arg("build").arg(".").assert().success();

    assert!(tmp.path().join("_build_staging/note.md").is_file());
    assert!(tmp.path().join("_build_staging/myst.yml").is_file());
    assert!(!source.join("_build_staging").exists());
}

#[test]
fn build_with_missing_reference_completes() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("vault");
    let staging = tmp.path().join("stage");
    write_file(&source.join("note.md"), "![[ghost.png]]\n");

    mystage(tmp.path())
        .arg("build")
        .arg(&source)
        .arg("--staging")
        .arg(&staging)
        .assert()
        .success()
        .stdout(predicate::str::contains("Broken embeds:       1"))
        .stdout(predicate::str::contains("note.md:1"))
        .stderr(predicate::str::contains("Missing file 'ghost.png' referenced from note.md"));

    let doc = fs::read_to_string(staging.join("note.md")).unwrap();
    assert!(doc.contains("⚠ missing: ghost.png"));
}

#[test]
fn build_strict_exits_with_two_on_broken_embeds() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("vault");
    write_file(&source.join("note.md"), "![[ghost.png]]\n");

    mystage(tmp.path())
        .arg("build")
        .arg(&source)
        .arg("--staging")
        .arg(tmp.path().join("stage"))
        .arg("--strict")
        .assert()
        .code(2);
}

#[test]
fn build_refuses_staging_inside_source() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("vault");
    write_file(&source.join("note.md"), "# hi\n");

    mystage(tmp.path())
        .arg("build")
        .arg(&source)
        .arg("--staging")
        .arg(source.join("_build"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("overlaps source"));

    assert!(!source.join("_build").exists());
}

#[test]
fn build_fails_on_missing_source() {
    let tmp = tempdir().unwrap();

    mystage(tmp.path())
        .arg("build")
        .arg(tmp.path().join("nope"))
        .arg("--staging")
        .arg(tmp.path().join("stage"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("vault root does not exist"));
}
