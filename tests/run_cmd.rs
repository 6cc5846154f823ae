use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("bf-learn-tests-no-config"));
    cmd
}

fn hello_world() -> &'static str {
    "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>."
}

fn read_to_tempfile(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn run_file_prints_output() {
    let tf = read_to_tempfile(hello_world());
    cargo_bin()
        .arg("run").arg(tf.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Program executed successfully"))
        .stdout(predicate::str::contains("Output: Hello World!"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn comments_in_files_are_ignored() {
    let tf = read_to_tempfile("This prints A:\n++++++++[>++++++++<-]>+.  done!\n");
    cargo_bin()
        .arg("run").arg(tf.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Output: A"));
}

#[test]
fn input_flag_feeds_the_program() {
    let tf = read_to_tempfile(",[.,]");
    cargo_bin()
        .arg("run").arg(tf.path()).arg("-i").arg("echo me")
        .assert()
        .success()
        .stdout(predicate::str::contains("Output: echo me"));
}

#[test]
fn debug_flag_prints_iterations_and_memory() {
    let tf = read_to_tempfile("+++>++");
    cargo_bin()
        .arg("run").arg(tf.path()).arg("--debug")
        .assert()
        .success()
        .stdout(predicate::str::contains("Iterations: 6"))
        .stdout(predicate::str::contains("Final memory (first 20 cells):"))
        .stdout(predicate::str::contains("[3, 2, 0,"));
}

#[test]
fn visualize_flag_draws_the_tape() {
    let tf = read_to_tempfile("++++++++[>++++++++<-]>+");
    cargo_bin()
        .arg("run").arg(tf.path()).arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains("Memory Visualization:"))
        .stdout(predicate::str::contains("Pointer position: 1"))
        .stdout(predicate::str::contains("Non-zero cells: 1"));
}

#[test]
fn trace_flag_prints_table() {
    let tf = read_to_tempfile(">");
    cargo_bin()
        .arg("run").arg(tf.path()).arg("--trace")
        .assert()
        .success()
        .stdout(predicate::str::contains("STEP | IP").and(predicate::str::contains("Moved pointer head to index 1")));
}

#[test]
fn stats_flag_reports_loops() {
    let tf = read_to_tempfile("+++[->+<]");
    cargo_bin()
        .arg("run").arg(tf.path()).arg("--stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Execution Statistics:"))
        .stdout(predicate::str::contains("Loop 1: [3-8]"))
        .stdout(predicate::str::contains("Memory Heat Map:"))
        .stdout(predicate::str::contains("░░░ ▒▒▒ ░░░"));
}

#[test]
fn missing_file_is_an_error() {
    cargo_bin()
        .arg("run").arg("/definitely/not/here.bf")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read code file"));
}

#[test]
fn memory_size_flag_limits_the_tape() {
    let tf = read_to_tempfile(">>>");
    cargo_bin()
        .arg("--memory-size").arg("3").arg("run").arg(tf.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Memory overflow"));
}
