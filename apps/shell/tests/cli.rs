use assert_cmd::Command;
use predicates::prelude::*;

fn bindery() -> Command {
    let mut cmd = Command::cargo_bin("bindery").expect("binary is built");
    cmd.current_dir(env!("CARGO_MANIFEST_DIR")).env("BINDERY__LOGGING__LEVEL", "warn");
    cmd
}

#[test]
fn validate_accepts_a_sound_product() {
    bindery()
        .args(["validate", "tests/data/notebook.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid: 3 group(s), base price 10.00 EUR"));
}

#[test]
fn validate_reports_cycles_and_fails() {
    bindery()
        .args(["validate", "tests/data/cyclic.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[cyclic_dependency]"));
}

#[test]
fn graph_indents_dependents_under_parents() {
    bindery()
        .args(["graph", "tests/data/notebook.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Tipo de Tapa\n  Textura (when Tipo de Tapa = Tapa Dura)\nNombre\n",
        ));
}

#[test]
fn simulate_replays_the_cascade() {
    bindery()
        .args(["simulate", "tests/data/notebook.json", "tests/data/events.json", "--quantity", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total: 10.20 EUR"))
        .stdout(predicate::str::contains("rejected [kind_mismatch]"))
        .stdout(predicate::str::contains("cleared: Textura"))
        .stdout(predicate::str::contains("checkout: ok, line total 19.00 EUR"));
}

#[test]
fn missing_product_file_is_an_error() {
    bindery()
        .args(["validate", "tests/data/nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
