// Debugger and visualizer driven through pipes: stdin is not a TTY, so the
// debugger reads plain lines and the visualizer never clears the screen.
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::time::Duration;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("bf-learn-tests-no-config"));
    cmd
}

fn read_to_tempfile(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn debugger_steps_on_piped_commands() {
    let tf = read_to_tempfile("++.");
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .arg("debug").arg(tf.path())
        .write_stdin("n\nm\nn\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 0: + at position 0"))
        .stdout(predicate::str::contains("Memory snapshot:"))
        .stdout(predicate::str::contains("Step 2: . at position 2"))
        .stdout(predicate::str::contains("Program finished"));
}

#[test]
fn debugger_quits_on_eof() {
    let tf = read_to_tempfile("+++");
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .arg("debug").arg(tf.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 1").not());
}

#[test]
fn debugger_reports_runtime_errors() {
    let tf = read_to_tempfile("<");
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .arg("debug").arg(tf.path())
        .write_stdin("s\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Error: Memory underflow"));
}

#[test]
fn visualizer_draws_frames_then_summary() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .args(["visualize", "-s", "1", "+."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Brainfuck Execution Visualizer"))
        .stdout(predicate::str::contains("Memory Visualization:"))
        .stdout(predicate::str::contains("✓ Program completed successfully"));
}

#[test]
fn visualizer_zero_speed_only_summarizes() {
    cargo_bin()
        .timeout(Duration::from_secs(5))
        .args(["visualize", ",.", "-s", "0", "-i", "q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Brainfuck Execution Visualizer").not())
        .stdout(predicate::str::contains("Final output: q"));
}

#[test]
fn examples_list_and_run() {
    cargo_bin()
        .arg("examples")
        .assert()
        .success()
        .stdout(predicate::str::contains("hello-world"))
        .stdout(predicate::str::contains("countdown"));

    cargo_bin()
        .args(["examples", "uppercase", "-i", "abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Output: ABC"));
}

#[test]
fn unknown_example_is_a_usage_error() {
    cargo_bin()
        .args(["examples", "nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown example 'nope'"));
}
