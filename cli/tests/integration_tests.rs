use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("docgram_cli_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.join(name);
        fs::write(&path, content).expect("failed to write fixture");
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

const NAVAL_FATE: &str = "Naval Fate.

Usage:
  naval_fate ship new <name>...
  naval_fate ship <name> move <x> <y> [--speed=<kn>]
  naval_fate ship shoot <x> <y>
  naval_fate mine (set|remove) <x> <y> [--moored|--drifting]
  naval_fate -h | --help
  naval_fate --version

Options:
  -h --help     Show this screen.
  --version     Show version.
  --speed=<kn>  Speed in knots [default: 10].
  --moored      Moored (anchored) mine.
  --drifting    Drifting mine.
";

fn docgram(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docgram"))
        .args(args)
        .output()
        .expect("failed to run docgram")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_prints_formal_usage_and_options() {
    let dir = TempDir::new("check_table");
    let doc = dir.write("naval.txt", NAVAL_FATE);

    let output = docgram(&["check", "--doc", doc.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Formal usage: ( ship new <name>... ) | ("));
    assert!(stdout.contains("--speed <arg>  [default: 10]"));
    assert!(stdout.contains("Bindings (15):"), "{stdout}");
}

#[test]
fn check_json_lists_slots() {
    let dir = TempDir::new("check_json");
    let doc = dir.write("naval.txt", NAVAL_FATE);

    let output = docgram(&["check", "--doc", doc.to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success());
    let report = stdout_json(&output);
    let slots = report["slots"].as_array().unwrap();
    let name = slots.iter().find(|s| s["name"] == "<name>").unwrap();
    assert_eq!(name["kind"], "argument");
    assert_eq!(name["default"], serde_json::json!([]));
}

#[test]
fn check_rejects_doc_without_usage() {
    let dir = TempDir::new("check_missing");
    let doc = dir.write("bad.txt", "Just some text.\n");

    let output = docgram(&["check", "--doc", doc.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"usage:\" (case-insensitive) not found"), "{stderr}");
}

#[test]
fn check_rejects_unmatched_bracket() {
    let dir = TempDir::new("check_unmatched");
    let doc = dir.write("bad.txt", "usage: prog [<a>\n");

    let output = docgram(&["check", "--doc", doc.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unmatched '['"));
}

// ---------------------------------------------------------------------------
// match
// ---------------------------------------------------------------------------

#[test]
fn match_prints_bindings() {
    let dir = TempDir::new("match_ok");
    let doc = dir.write("naval.txt", NAVAL_FATE);

    let output = docgram(&[
        "match",
        "--doc",
        doc.to_str().unwrap(),
        "--",
        "ship",
        "Guardian",
        "move",
        "150",
        "300",
        "--speed=15",
    ]);
    assert!(output.status.success());
    let bindings = stdout_json(&output);
    assert_eq!(bindings["ship"], true);
    assert_eq!(bindings["move"], true);
    assert_eq!(bindings["<name>"], serde_json::json!(["Guardian"]));
    assert_eq!(bindings["<x>"], "150");
    assert_eq!(bindings["--speed"], "15");
    assert_eq!(bindings["--drifting"], false);
}

#[test]
fn match_failure_exits_with_usage() {
    let dir = TempDir::new("match_fail");
    let doc = dir.write("naval.txt", NAVAL_FATE);

    let output = docgram(&["match", "--doc", doc.to_str().unwrap(), "--", "ship"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("arguments do not match any usage pattern"));
    assert!(stderr.contains("naval_fate ship new <name>..."));
    assert!(!stderr.contains("Show this screen."));
}

#[test]
fn match_full_usage_includes_options() {
    let dir = TempDir::new("match_full");
    let doc = dir.write("naval.txt", NAVAL_FATE);

    let output = docgram(&[
        "match",
        "--doc",
        doc.to_str().unwrap(),
        "--full-usage",
        "--",
        "ship",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Show this screen."));
}

#[test]
fn match_help_prints_usage() {
    let dir = TempDir::new("match_help");
    let doc = dir.write("naval.txt", NAVAL_FATE);

    let output = docgram(&["match", "--doc", doc.to_str().unwrap(), "--", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Usage:\n  naval_fate ship new <name>..."));
    assert!(!stdout.contains("Drifting mine."));

    let output = docgram(&[
        "match",
        "--doc",
        doc.to_str().unwrap(),
        "--full-usage",
        "--",
        "--help",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Naval Fate."));
    assert!(stdout.contains("Drifting mine."));
}

#[test]
fn match_version_string() {
    let dir = TempDir::new("match_version");
    let doc = dir.write("naval.txt", NAVAL_FATE);

    let output = docgram(&[
        "match",
        "--doc",
        doc.to_str().unwrap(),
        "--version-string",
        "Naval Fate 2.0",
        "--",
        "--version",
    ]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Naval Fate 2.0");
}

#[test]
fn match_ambiguous_prefix_fails() {
    let dir = TempDir::new("match_prefix");
    let doc = dir.write(
        "prog.txt",
        "usage: prog [--version] [--verbose]\n",
    );

    let output = docgram(&["match", "--doc", doc.to_str().unwrap(), "--", "--ver"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("--ver is not a unique prefix: --version, --verbose?")
    );
}

#[test]
fn match_reads_config_file() {
    let dir = TempDir::new("match_config");
    let doc = dir.write(
        "git.txt",
        "usage: git [--verbose] <command> [<args>...]\n",
    );
    let config = dir.write("options.yaml", "options_first: true\n");

    let output = docgram(&[
        "match",
        "--doc",
        doc.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--",
        "--verbose",
        "commit",
        "-m",
        "msg",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let bindings = stdout_json(&output);
    assert_eq!(bindings["--verbose"], true);
    assert_eq!(bindings["<command>"], "commit");
    assert_eq!(bindings["<args>"], serde_json::json!(["-m", "msg"]));
}

#[test]
fn match_rejects_broken_config() {
    let dir = TempDir::new("match_bad_config");
    let doc = dir.write("prog.txt", "usage: prog\n");
    let config = dir.write("options.yaml", "help: [1, 2]\n");

    let output = docgram(&[
        "match",
        "--doc",
        doc.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load config"));
}

// ---------------------------------------------------------------------------
// batch
// ---------------------------------------------------------------------------

#[test]
fn batch_keeps_input_order() {
    let dir = TempDir::new("batch_order");
    let doc = dir.write("naval.txt", NAVAL_FATE);
    let input = dir.write(
        "argv.txt",
        "# one vector per line\nship new 'Queen Mary' Titanic\n\nmine set 1 2 --drifting\nship\nship shoot 3 4\n",
    );

    let output = docgram(&[
        "batch",
        "--doc",
        doc.to_str().unwrap(),
        "--input",
        input.to_str().unwrap(),
        "--jobs",
        "2",
    ]);
    assert!(output.status.success());
    let responses = stdout_json(&output);
    let responses = responses.as_array().unwrap();
    assert_eq!(responses.len(), 4);

    assert_eq!(
        responses[0]["bindings"]["<name>"],
        serde_json::json!(["Queen Mary", "Titanic"])
    );
    assert_eq!(responses[1]["bindings"]["--drifting"], true);
    assert_eq!(responses[2]["success"], false);
    assert_eq!(responses[2]["error_status"], 1);
    assert_eq!(responses[3]["bindings"]["shoot"], true);

    assert!(String::from_utf8_lossy(&output.stderr).contains("1 of 4 argument vectors did not match"));
}

#[test]
fn batch_reports_bad_quoting() {
    let dir = TempDir::new("batch_quote");
    let doc = dir.write("prog.txt", "usage: prog <x>\n");
    let input = dir.write("argv.txt", "a\n'unterminated\n");

    let output = docgram(&[
        "batch",
        "--doc",
        doc.to_str().unwrap(),
        "--input",
        input.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 2:"));
}
