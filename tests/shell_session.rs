#![cfg(unix)]

use std::io::Write;
use std::process::{Command, Stdio};

/// Feed `lines` to the shell on stdin and collect everything it prints.
fn run_shell(lines: &[&str]) -> std::process::Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pipesh"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn pipesh");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        for line in lines {
            writeln!(stdin, "{line}").expect("write line");
        }
    }

    child.wait_with_output().expect("wait output")
}

#[test]
fn no_prompt_when_stdin_is_not_a_terminal() {
    let output = run_shell(&["echo hello"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hello\n");
}

#[test]
fn end_of_input_exits_with_last_status() {
    let output = run_shell(&["true", "sh -c 'exit 6'"]);
    assert_eq!(output.status.code(), Some(6));
}

#[test]
fn blank_lines_keep_last_status() {
    let output = run_shell(&["false", "", "   "]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn exit_builtin_stops_reading() {
    let output = run_shell(&["echo before", "exit 3", "echo after"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(3));
    assert!(stdout.contains("before"), "stdout was: {stdout}");
    assert!(!stdout.contains("after"), "stdout was: {stdout}");
}

#[test]
fn exit_without_argument_uses_previous_status() {
    let output = run_shell(&["false", "exit"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn shell_continues_after_errors() {
    let output = run_shell(&[
        "pipesh-definitely-not-a-real-command",
        "cat < /nonexistent/pipesh/input",
        "echo 'unterminated",
        "echo ALIVE",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("ALIVE"), "stdout was: {stdout}");
    assert!(stderr.contains("command not found"), "stderr was: {stderr}");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn pipeline_sigpipe_does_not_abort_shell() {
    // yes is killed by SIGPIPE once head exits; the shell itself must survive.
    let output = run_shell(&["yes | head -1", "echo ALIVE"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("y\n"), "stdout was: {stdout}");
    assert!(stdout.contains("ALIVE"), "stdout was: {stdout}");
    assert!(output.status.success(), "shell did not exit cleanly");
}

#[test]
fn cd_changes_directory_for_later_commands() {
    let dir = tempfile::tempdir().unwrap();
    let cd = format!("cd '{}'", dir.path().display());
    let output = run_shell(&[cd.as_str(), "echo marker > created.txt", "pwd"]);

    assert!(output.status.success());
    assert!(dir.path().join("created.txt").exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let canonical = dir.path().canonicalize().unwrap();
    assert!(
        stdout.trim_end().ends_with(&*canonical.file_name().unwrap().to_string_lossy()),
        "stdout was: {stdout}"
    );
}

#[test]
fn cd_to_missing_directory_fails() {
    let output = run_shell(&["cd /nonexistent/pipesh/dir"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("cd:"), "stderr was: {stderr}");
}

#[test]
fn export_is_visible_to_children() {
    let output = run_shell(&["export PIPESH_TEST_VAR=visible", "sh -c 'echo $PIPESH_TEST_VAR'"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "visible");
}

#[test]
fn unset_removes_variable() {
    let output = run_shell(&[
        "export PIPESH_TEST_VAR=visible",
        "unset PIPESH_TEST_VAR",
        "sh -c 'echo [$PIPESH_TEST_VAR]'",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "[]");
}

#[test]
fn type_reports_builtins() {
    let output = run_shell(&["type exit"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("exit is a shell builtin"), "stdout was: {stdout}");
}
