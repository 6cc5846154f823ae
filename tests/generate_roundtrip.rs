// Roundtrip test: bf generate emits code that, when fed to bf exec, prints the same text.
use predicates::prelude::*;

fn cargo_bin() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("bf").expect("bf binary");
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("bf-learn-tests-no-config"));
    cmd
}

fn generate(args: &[&str]) -> String {
    let assert = cargo_bin().arg("generate").args(args).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    // The CLI adds a trailing newline; strip it for reuse as code
    output.trim_end().to_string()
}

#[test]
fn compact_roundtrip() {
    let code = generate(&["--compact", "Hello, World!"]);
    assert!(code.contains('['), "compact output uses loops");
    cargo_bin()
        .args(["exec", "--json", &code])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""output": "Hello, World!""#));
}

#[test]
fn simple_roundtrip() {
    let code = generate(&["--simple", "ok"]);
    assert!(!code.contains('['));
    cargo_bin()
        .args(["exec", "--json", &code])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""output": "ok""#));
}

#[test]
fn default_prints_both_versions() {
    cargo_bin()
        .args(["generate", "Hi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated Brainfuck code:"))
        .stdout(predicate::str::contains("Optimized version:"));
}

#[test]
fn text_from_stdin() {
    let code = {
        let assert = cargo_bin().args(["generate", "--compact"]).write_stdin("piped").assert().success();
        String::from_utf8(assert.get_output().stdout.clone()).unwrap().trim_end().to_string()
    };
    cargo_bin()
        .args(["exec", &code])
        .assert()
        .success()
        .stdout(predicate::str::contains("Output: piped"));
}
