use std::fs;
use std::path::Path;
use std::process::Command;

use resxcodec::{Entry, ResxDocument, traits::Parser};
use tempfile::TempDir;

fn resxcodec_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("resxcodec"));
    cmd.env_remove("RESXCODEC_ACTIVE");
    cmd
}

fn write_resx(path: &Path, entries: &[Entry]) {
    let mut document = ResxDocument::empty().unwrap();
    document.replace_entries(entries).unwrap();
    document.write_to(path).unwrap();
}

fn names(path: &Path) -> Vec<String> {
    ResxDocument::read_from(path)
        .unwrap()
        .entries()
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect()
}

fn setup() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write_resx(
        &dir.join("Strings.resx"),
        &[Entry::new("A", "1"), Entry::new("B", "2")],
    );
    write_resx(&dir.join("Strings.de.resx"), &[Entry::new("A", "eins")]);
    write_resx(&dir.join("Strings.fr-CA.resx"), &[]);
    write_resx(&dir.join("Other.de.resx"), &[]);
    temp_dir
}

#[test]
fn test_sync_appends_missing_names() {
    let temp_dir = setup();
    let de = temp_dir.path().join("Strings.de.resx");

    let out = resxcodec_cmd()
        .args(["sync", "-i", de.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("added 1 (B)"));

    let entries = ResxDocument::read_from(&de).unwrap().entries().unwrap();
    assert_eq!(entries, vec![Entry::new("A", "eins"), Entry::new("B", "")]);
    assert_eq!(names(&temp_dir.path().join("Strings.resx")), vec!["A", "B"]);

    // nothing left to add: file is not rewritten
    let before = fs::read(&de).unwrap();
    let out = resxcodec_cmd()
        .args(["sync", "-i", de.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("up to date"));
    assert_eq!(fs::read(&de).unwrap(), before);
}

#[test]
fn test_sync_on_main_file_is_reported_as_info() {
    let temp_dir = setup();
    let main = temp_dir.path().join("Strings.resx");

    let out = resxcodec_cmd()
        .args(["sync", "-i", main.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("ℹ️"), "stderr: {}", stderr);
    assert!(stderr.contains("Strings.resx"));
}

#[test]
fn test_sync_without_main_resource_fails() {
    let temp_dir = setup();
    let orphan = temp_dir.path().join("Missing.ja.resx");
    write_resx(&orphan, &[]);

    let out = resxcodec_cmd()
        .args(["sync", "-i", orphan.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Main resource unavailable"));
}

#[test]
fn test_update_all() {
    let temp_dir = setup();
    let main = temp_dir.path().join("Strings.resx");

    let out = resxcodec_cmd()
        .args(["update-all", "-i", main.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Updated 2 of 2 locale files, 3 entries added"));

    assert_eq!(names(&temp_dir.path().join("Strings.de.resx")), vec!["A", "B"]);
    assert_eq!(names(&temp_dir.path().join("Strings.fr-CA.resx")), vec!["A", "B"]);
    assert!(names(&temp_dir.path().join("Other.de.resx")).is_empty());
}

#[test]
fn test_update_all_json_report() {
    let temp_dir = setup();
    let main = temp_dir.path().join("Strings.resx");

    let out = resxcodec_cmd()
        .args(["update-all", "-i", main.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let reports = report.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert!(reports[0]["path"].as_str().unwrap().ends_with("Strings.de.resx"));
    assert_eq!(reports[0]["appended"], serde_json::json!(["B"]));
    assert_eq!(reports[1]["appended"], serde_json::json!(["A", "B"]));
}

#[test]
fn test_update_all_continues_past_broken_sibling() {
    let temp_dir = setup();
    let main = temp_dir.path().join("Strings.resx");
    let broken = temp_dir.path().join("Strings.es.resx");
    fs::write(&broken, "<root>not a resx</root>").unwrap();

    let out = resxcodec_cmd()
        .args(["update-all", "-i", main.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Strings.es.resx"), "stderr: {}", stderr);
    assert!(stderr.contains("1 of 3 locale files could not be synced"));

    assert_eq!(names(&temp_dir.path().join("Strings.de.resx")), vec!["A", "B"]);
    assert_eq!(names(&temp_dir.path().join("Strings.fr-CA.resx")), vec!["A", "B"]);
    assert_eq!(fs::read_to_string(&broken).unwrap(), "<root>not a resx</root>");
}

#[test]
fn test_active_document_fallback() {
    let temp_dir = setup();
    let de = temp_dir.path().join("Strings.de.resx");

    let out = resxcodec_cmd()
        .current_dir(temp_dir.path())
        .args(["sync"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no active document"));
    assert_eq!(names(&de), vec!["A"]);

    let out = resxcodec_cmd()
        .current_dir(temp_dir.path())
        .env("RESXCODEC_ACTIVE", &de)
        .args(["sync"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(names(&de), vec!["A", "B"]);
}

#[test]
fn test_active_document_from_config_file() {
    let temp_dir = setup();
    fs::write(
        temp_dir.path().join("resxcodec.toml"),
        "active = \"Strings.resx\"\n",
    )
    .unwrap();

    let out = resxcodec_cmd()
        .current_dir(temp_dir.path())
        .args(["update-all"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(names(&temp_dir.path().join("Strings.fr-CA.resx")), vec!["A", "B"]);
}
