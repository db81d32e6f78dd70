use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cli_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("synreg"))
}

const SMALL: &str = r#"{"kinds": [{"name": "A", "code": 2}, {"name": "B", "code": 3}]}"#;
const GROWN: &str = r#"{"kinds": [{"name": "A", "code": 2}, {"name": "B", "code": 3}, {"name": "C", "code": 1001}]}"#;

#[test]
fn validate_builtin_and_files() {
    cli_cmd()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 237 kinds"));

    let tmp = tempdir().expect("tempdir");
    let good = tmp.path().join("good.json");
    fs::write(&good, SMALL).unwrap();
    cli_cmd()
        .args(["validate", "--table", good.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 4 kinds"));

    let dup = tmp.path().join("dup.json");
    fs::write(&dup, r#"{"kinds": [{"name": "A", "code": 2}, {"name": "B", "code": 2}]}"#).unwrap();
    cli_cmd()
        .args(["validate", "--table", dup.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate code 2"));
}

#[test]
fn kinds_by_category() {
    cli_cmd()
        .args(["kinds", "--category", "collection"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1106\tArgumentList\tcollection (expr)"))
        .stdout(predicate::str::contains("IfStmt").not());
}

#[test]
fn encode_then_decode() {
    let tmp = tempdir().expect("tempdir");
    let table = tmp.path().join("kinds.json");
    let tree = tmp.path().join("tree.json");
    let stream = tmp.path().join("tree.synr");
    fs::write(&table, SMALL).unwrap();
    fs::write(&tree, r#"{"kind": "A", "children": [{"kind": "Token", "payload": "x"}, {"kind": "B"}]}"#).unwrap();

    cli_cmd()
        .args([
            "encode",
            "--table",
            table.to_str().unwrap(),
            "--input",
            tree.to_str().unwrap(),
            "--out",
            stream.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("encoded: 3 nodes, 22 bytes"));

    cli_cmd()
        .args(["decode", "--table", table.to_str().unwrap(), "--input", stream.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"kind":"A","children":[{"kind":"Token","payload":"x"},{"kind":"B"}]}"#));

    cli_cmd()
        .args(["decode", "--raw", "--table", table.to_str().unwrap(), "--input", stream.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"code":2,"#));

    // A grown table still reads the stream, with a warning.
    let grown = tmp.path().join("grown.json");
    fs::write(&grown, GROWN).unwrap();
    cli_cmd()
        .args(["decode", "--table", grown.to_str().unwrap(), "--input", stream.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("kind table differs"));
}

#[test]
fn evolve_checks_append_only() {
    let tmp = tempdir().expect("tempdir");
    let old = tmp.path().join("old.json");
    let new = tmp.path().join("new.json");
    fs::write(&old, SMALL).unwrap();
    fs::write(&new, GROWN).unwrap();

    cli_cmd()
        .args(["evolve", "--old", old.to_str().unwrap(), "--new", new.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 1 kinds appended"));

    cli_cmd()
        .args(["evolve", "--old", new.to_str().unwrap(), "--new", old.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("`C` was removed"));
}

#[test]
fn export_round_trips_the_checksum() {
    let tmp = tempdir().expect("tempdir");
    let out = tmp.path().join("builtin.json");

    let builtin = cli_cmd().arg("checksum").output().unwrap();
    assert!(builtin.status.success());

    cli_cmd()
        .args(["export", "--out", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("export: 237 kinds"));

    cli_cmd()
        .args(["checksum", "--table", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(String::from_utf8(builtin.stdout).unwrap());
}

#[cfg(unix)]
#[test]
fn table_generator_failures() {
    cli_cmd()
        .args(["validate", "--table-cmd", &format!("printf '%s' '{SMALL}'")])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 4 kinds"));

    cli_cmd()
        .args(["validate", "--table-cmd", "kill -9 $$"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("process terminated by signal 9"));

    cli_cmd()
        .args(["validate", "--table-cmd", "echo broken >&2; exit 3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("process exited with status 3: broken"));
}

#[test]
fn help_describes_every_command() {
    cli_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Print the table checksum as hex"))
        .stdout(predicate::str::contains("Check that NEW only appends to OLD"));
}
