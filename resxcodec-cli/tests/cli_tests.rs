use std::fs;
use std::process::Command;

use indoc::indoc;
use resxcodec::{Entry, Message, ResxDocument, traits::Parser};
use tempfile::TempDir;

const STRINGS: &str = indoc! {r#"
    <?xml version="1.0" encoding="utf-8"?>
    <root>
      <resheader name="resmimetype">
        <value>text/microsoft-resx</value>
      </resheader>
      <data name="Greeting" xml:space="preserve">
        <value>Hello "world"</value>
        <comment>Shown on start</comment>
      </data>
      <data name="Count" xml:space="preserve">
        <value>11</value>
      </data>
    </root>
"#};

fn resxcodec_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("resxcodec"));
    cmd.env_remove("RESXCODEC_ACTIVE");
    cmd
}

fn entries(path: &std::path::Path) -> Vec<Entry> {
    ResxDocument::read_from(path).unwrap().entries().unwrap()
}

#[test]
fn test_new_set_remove() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("nested").join("Strings.resx");

    let out = resxcodec_cmd()
        .args(["new", "-o", file.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(entries(&file).is_empty());

    let out = resxcodec_cmd()
        .args(["new", "-o", file.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("already exists"));

    let out = resxcodec_cmd()
        .args([
            "set",
            "-i",
            file.to_str().unwrap(),
            "-k",
            "Title",
            "-v",
            "It's \"quoted\"",
            "-c",
            "Window title",
        ])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        entries(&file),
        vec![Entry::new("Title", "It's \"quoted\"").with_comment("Window title")]
    );
    let text = fs::read_to_string(&file).unwrap();
    assert!(text.contains("<value>It's \"quoted\"</value>"));

    let out = resxcodec_cmd()
        .args(["set", "-i", file.to_str().unwrap(), "-k", "Title", "-v", "Changed"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Updated"));
    assert_eq!(
        entries(&file),
        vec![Entry::new("Title", "Changed").with_comment("Window title")]
    );

    let out = resxcodec_cmd()
        .args(["remove", "-i", file.to_str().unwrap(), "-k", "Missing"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("nothing to remove"));

    let out = resxcodec_cmd()
        .args(["remove", "-i", file.to_str().unwrap(), "-k", "Title"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(entries(&file).is_empty());
}

#[test]
fn test_set_keeps_everything_outside_the_entries() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("Strings.resx");
    let crlf = STRINGS.replace('\n', "\r\n");
    fs::write(&file, &crlf).unwrap();

    let out = resxcodec_cmd()
        .args(["set", "-i", file.to_str().unwrap(), "-k", "New", "-v", "x"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let text = fs::read_to_string(&file).unwrap();
    let untouched = crlf.trim_end_matches("</root>\r\n");
    assert!(text.starts_with(untouched));
    assert!(text.ends_with(
        "  <data name=\"New\" xml:space=\"preserve\">\r\n    <value>x</value>\r\n  </data>\r\n</root>\r\n"
    ));
}

#[test]
fn test_view() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("Strings.resx");
    fs::write(&file, STRINGS).unwrap();

    let out = resxcodec_cmd()
        .args(["view", "-i", file.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Entries: 2"));
    assert!(stdout.contains("Entry 1: Greeting"));
    assert!(stdout.contains("Value: Hello \"world\""));
    assert!(stdout.contains("Comment: Shown on start"));
    assert!(stdout.contains("Line ending: LF"));
}

#[test]
fn test_view_truncates_using_config() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("Strings.resx");
    let config = temp_dir.path().join("resxcodec.toml");
    fs::write(&file, STRINGS).unwrap();
    fs::write(&config, "[view]\nmax_width = 8\n").unwrap();

    let out = resxcodec_cmd()
        .args([
            "view",
            "-i",
            file.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Value: Hello..."));

    let out = resxcodec_cmd()
        .args([
            "view",
            "-i",
            file.to_str().unwrap(),
            "--full",
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&out.stdout).contains("Value: Hello \"world\""));
}

#[test]
fn test_dump_and_apply() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("Strings.resx");
    fs::write(&file, STRINGS).unwrap();

    let out = resxcodec_cmd()
        .args(["dump", "-i", file.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success());
    let message = Message::from_json(String::from_utf8_lossy(&out.stdout).trim()).unwrap();
    assert_eq!(
        message,
        Message::update(vec![
            Entry::new("Greeting", "Hello \"world\"").with_comment("Shown on start"),
            Entry::new("Count", "11"),
        ])
    );

    let message_file = temp_dir.path().join("update.json");
    fs::write(
        &message_file,
        r#"{"type":"update","obj":[{"name":"Count","value":"12","comment":""}]}"#,
    )
    .unwrap();
    let out = resxcodec_cmd()
        .args([
            "apply",
            "-i",
            file.to_str().unwrap(),
            "-m",
            message_file.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(entries(&file), vec![Entry::new("Count", "12")]);
    assert!(!fs::read_to_string(&file).unwrap().contains("<comment"));
}

#[test]
fn test_apply_from_stdin() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("Strings.resx");
    fs::write(&file, STRINGS).unwrap();

    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("resxcodec"))
        .args(["apply", "-i", file.to_str().unwrap()])
        .write_stdin(r#"{"type":"update","obj":[{"name":"A","value":"1"},{"name":"B","value":"2"}]}"#)
        .assert()
        .success();
    assert_eq!(
        entries(&file),
        vec![Entry::new("A", "1"), Entry::new("B", "2")]
    );

    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("resxcodec"))
        .args(["apply", "-i", file.to_str().unwrap()])
        .write_stdin(r#"{"type":"delete"}"#)
        .assert()
        .failure();
    assert_eq!(entries(&file).len(), 2);
}

#[test]
fn test_check() {
    let temp_dir = TempDir::new().unwrap();
    let good = temp_dir.path().join("Good.resx");
    let lossy = temp_dir.path().join("Lossy.resx");
    fs::write(&good, STRINGS.replace('\n', "\r\n")).unwrap();
    fs::write(&lossy, STRINGS.replace("<value>11</value>", "<value />")).unwrap();

    let out = resxcodec_cmd()
        .args(["check", "-i", good.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success(), "stdout: {}", String::from_utf8_lossy(&out.stdout));
    assert!(String::from_utf8_lossy(&out.stdout).contains("2 entries, CRLF"));

    let out = resxcodec_cmd()
        .args(["check", "-i", good.to_str().unwrap(), lossy.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("rewriting would change line 11"));
    assert!(String::from_utf8_lossy(&out.stderr).contains("1 of 2 files failed"));
}

#[test]
fn test_malformed_document_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("Broken.resx");
    fs::write(&file, "<root><data name=\"x\"></root>").unwrap();

    let out = resxcodec_cmd()
        .args(["view", "-i", file.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("❌"));
}

#[test]
fn test_rejects_other_extensions() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("strings.xml");
    fs::write(&file, STRINGS).unwrap();

    let out = resxcodec_cmd()
        .args(["dump", "-i", file.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Unsupported file type"));
}

#[test]
fn test_watch_serves_initial_update_and_applies_ui_updates() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("Strings.resx");
    fs::write(&file, STRINGS).unwrap();

    let out = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("resxcodec"))
        .args(["watch", "-i", file.to_str().unwrap()])
        .write_stdin("{\"type\":\"update\",\"obj\":[{\"name\":\"Only\",\"value\":\"one\"}]}\n")
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    let first = stdout.lines().next().unwrap();
    assert_eq!(
        Message::from_json(first).unwrap(),
        Message::update(vec![
            Entry::new("Greeting", "Hello \"world\"").with_comment("Shown on start"),
            Entry::new("Count", "11"),
        ])
    );
    assert_eq!(entries(&file), vec![Entry::new("Only", "one")]);
}

#[test]
fn test_watch_serves_active_document_without_input() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("Strings.resx");
    fs::write(&file, STRINGS).unwrap();

    let out = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("resxcodec"))
        .current_dir(temp_dir.path())
        .env("RESXCODEC_ACTIVE", &file)
        .arg("watch")
        .write_stdin("{\"type\":\"update\",\"obj\":[{\"name\":\"Only\",\"value\":\"one\"}]}\n")
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(entries(&file), vec![Entry::new("Only", "one")]);

    let out = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("resxcodec"))
        .current_dir(temp_dir.path())
        .env_remove("RESXCODEC_ACTIVE")
        .arg("watch")
        .write_stdin("")
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no active document"));
}
