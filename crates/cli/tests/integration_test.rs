use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const DOCUMENT: &str = r#"{
  "type": "doc",
  "content": [
    { "type": "paragraph", "content": [{ "type": "text", "text": "It is so obviously wrong." }] }
  ]
}"#;

const HEADINGS: &str = r#"{
  "type": "doc",
  "content": [
    { "type": "heading", "attrs": { "level": 1 }, "content": [{ "type": "text", "text": "Title" }] },
    { "type": "heading", "attrs": { "level": 3 }, "content": [{ "type": "text", "text": "Deep" }] }
  ]
}"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn inkcheck(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_inkcheck"))
        .args(args)
        .env_remove("INKCHECK_AUTO_RUN")
        .env_remove("INKCHECK_SCANNERS")
        .env_remove("OPENAI_API_KEY")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute inkcheck")
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn json_stdout(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_check_reports_bad_words() {
    let temp_dir = TempDir::new().unwrap();
    let document = write(&temp_dir, "doc.json", DOCUMENT);

    let report = json_stdout(&inkcheck(&["check", path_str(&document), "--format", "json"]));
    let issues = report["issues"].as_array().unwrap();

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["message"], "Avoid 'obviously'");
    assert_eq!(issues[0]["from"], 10);
    assert_eq!(issues[0]["to"], 19);
    assert_eq!(issues[0]["severity"], "warning");
}

#[test]
fn test_check_honors_ignore_file() {
    let temp_dir = TempDir::new().unwrap();
    let document = write(&temp_dir, "doc.json", DOCUMENT);
    let ignore = write(
        &temp_dir,
        "ignore.json",
        r#"[{ "from": 10, "to": 19, "message": "Avoid 'obviously'" }]"#,
    );

    let report = json_stdout(&inkcheck(&[
        "check",
        path_str(&document),
        "--ignore",
        path_str(&ignore),
        "--format",
        "json",
    ]));

    assert_eq!(report["issues"].as_array().unwrap().len(), 0);
    assert_eq!(report["dismissed"].as_array().unwrap().len(), 1);
}

#[test]
fn test_check_with_natural_language_rule() {
    let temp_dir = TempDir::new().unwrap();
    let document = write(&temp_dir, "doc.json", DOCUMENT);
    let config = write(
        &temp_dir,
        "inkcheck.yaml",
        r#"
scanners:
  - heading-levels
natural_language:
  - id: no-absolutes
    rule: "Do not state opinions as absolute facts."
    severity: error
"#,
    );
    let mock = write(
        &temp_dir,
        "response.json",
        r#"{ "issues": [{ "message": "Stated as fact", "textMatch": "obviously wrong", "suggestion": "arguably wrong" }] }"#,
    );

    let report = json_stdout(&inkcheck(&[
        "check",
        path_str(&document),
        "--config",
        path_str(&config),
        "--mock-provider",
        path_str(&mock),
        "--format",
        "json",
    ]));
    let issues = report["issues"].as_array().unwrap();

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["message"], "Stated as fact");
    assert_eq!(issues[0]["severity"], "error");
    assert_eq!(issues[0]["fix"]["kind"], "replace_text");
    assert_eq!(issues[0]["fix"]["text"], "arguably wrong");
}

#[test]
fn test_natural_language_rule_needs_a_provider() {
    let temp_dir = TempDir::new().unwrap();
    let document = write(&temp_dir, "doc.json", DOCUMENT);
    let config = write(
        &temp_dir,
        "inkcheck.json",
        r#"{ "natural_language": [{ "id": "tone", "rule": "Be kind." }] }"#,
    );

    let output = inkcheck(&["check", path_str(&document), "--config", path_str(&config)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no analysis provider"));
}

#[test]
fn test_run_single_scanner() {
    let temp_dir = TempDir::new().unwrap();
    let document = write(&temp_dir, "headings.json", HEADINGS);

    let report = json_stdout(&inkcheck(&[
        "run",
        path_str(&document),
        "--scanner",
        "heading-levels",
        "--format",
        "json",
    ]));
    let issues = report["issues"].as_array().unwrap();

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["from"], 8);
    assert_eq!(issues[0]["to"], 12);
    assert_eq!(issues[0]["fix"]["pos"], 7);
    assert_eq!(issues[0]["fix"]["kind"], "set_node_attr");
}

#[test]
fn test_run_unknown_scanner_fails() {
    let temp_dir = TempDir::new().unwrap();
    let document = write(&temp_dir, "doc.json", DOCUMENT);

    let output = inkcheck(&["run", path_str(&document), "--scanner", "spelling"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid scanner reference"));
}

#[test]
fn test_scanners_lists_builtins() {
    let output = inkcheck(&["scanners"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in ["bad-words", "heading-levels", "repeated-words", "long-sentences"] {
        assert!(stdout.contains(id), "missing {id} in:\n{stdout}");
    }
}

#[test]
fn test_markdown_output() {
    let temp_dir = TempDir::new().unwrap();
    let document = write(&temp_dir, "doc.json", DOCUMENT);

    let output = inkcheck(&["check", path_str(&document), "--format", "markdown"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Annotation Report"));
    assert!(stdout.contains("- Warning: 1"));
}
