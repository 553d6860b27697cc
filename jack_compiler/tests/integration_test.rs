//! End-to-end tests that drive the real `jack-compiler` binary.

use assert_cmd::Command;
use std::fs;
use std::io::Write;

fn write_jack(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn compiles_a_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let jack = write_jack(
        &dir,
        "Main.jack",
        "class Main { function void main() { do Output.printString(\"hi\"); return; } }",
    );

    Command::cargo_bin("jack-compiler")
        .unwrap()
        .arg(&jack)
        .assert()
        .success();

    let vm = fs::read_to_string(dir.path().join("Main.vm")).unwrap();
    assert!(vm.contains("function Main.main 0"));
    assert!(vm.contains("call Output.printString"));
}

#[test]
fn compiles_every_jack_file_in_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_jack(
        &dir,
        "Main.jack",
        "class Main { function void main() { do Helper.run(); return; } }",
    );
    write_jack(
        &dir,
        "Helper.jack",
        "class Helper { function void run() { return; } }",
    );

    Command::cargo_bin("jack-compiler")
        .unwrap()
        .arg(dir.path())
        .assert()
        .success();

    assert!(dir.path().join("Main.vm").exists());
    assert!(dir.path().join("Helper.vm").exists());
}

#[test]
fn constructor_compiles_to_alloc_and_pointer_set() {
    let dir = tempfile::tempdir().unwrap();
    let jack = write_jack(
        &dir,
        "Point.jack",
        "class Point { field int x, y; \
         constructor Point new(int ax, int ay) { let x = ax; let y = ay; return this; } \
         }",
    );

    Command::cargo_bin("jack-compiler")
        .unwrap()
        .arg(&jack)
        .assert()
        .success();

    let vm = fs::read_to_string(dir.path().join("Point.vm")).unwrap();
    assert!(vm.contains("function Point.new 0"));
    assert!(vm.contains("push constant 2"));
    assert!(vm.contains("call Memory.alloc 1"));
    assert!(vm.contains("pop pointer 0"));
}

#[test]
fn method_call_pushes_receiver_as_argument_zero() {
    let dir = tempfile::tempdir().unwrap();
    let jack = write_jack(
        &dir,
        "Main.jack",
        "class Main { \
         function void main() { var Point p; do p.move(1, 2); return; } \
         }",
    );

    Command::cargo_bin("jack-compiler")
        .unwrap()
        .arg(&jack)
        .assert()
        .success();

    let vm = fs::read_to_string(dir.path().join("Main.vm")).unwrap();
    assert!(vm.contains("call Point.move 3"));
    assert!(vm.contains("pop temp 0"));
}

#[test]
fn unknown_identifier_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let jack = write_jack(
        &dir,
        "Broken.jack",
        "class Broken { function void run() { let q = 1; return; } }",
    );

    Command::cargo_bin("jack-compiler")
        .unwrap()
        .arg(&jack)
        .assert()
        .failure();
}

#[test]
fn missing_input_file_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("Missing.jack");

    Command::cargo_bin("jack-compiler")
        .unwrap()
        .arg(&missing)
        .assert()
        .failure();
}

#[test]
fn unterminated_comment_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let jack = write_jack(&dir, "Bad.jack", "class Bad { /* never closes");

    Command::cargo_bin("jack-compiler")
        .unwrap()
        .arg(&jack)
        .assert()
        .failure();
}
