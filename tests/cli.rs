use assert_cmd::Command;
use predicates::prelude::*;

/// Drives the thin CLI shell end to end against the bundled `en`
/// fixture dictionary, exercising the same path `main.rs` takes.
#[test]
fn cli_assembles_and_prints_all_three_sections() {
    let mut cmd = Command::cargo_bin("crossword").unwrap();
    cmd.args(["en", "--num-words", "4", "--max-paths", "100", "--workers", "2", "--seed", "7"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Answer grid:"))
        .stdout(predicate::str::contains("Masked grid:"))
        .stdout(predicate::str::contains("Clues:"));
}

#[test]
fn cli_fails_with_nonzero_exit_on_unsupported_language() {
    let mut cmd = Command::cargo_bin("crossword").unwrap();
    cmd.arg("xx");

    cmd.assert().failure();
}
