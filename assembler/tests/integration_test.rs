//! End-to-end tests that drive the real `hack-assembler` binary.

use assert_cmd::Command;
use std::fs;
use std::io::Write;

fn write_asm(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn assembles_add_two_constants() {
    let dir = tempfile::tempdir().unwrap();
    let asm = write_asm(&dir, "Add.asm", "@2\nD=A\n@3\nD=D+A\n@0\nM=D\n");

    Command::cargo_bin("hack-assembler")
        .unwrap()
        .arg(&asm)
        .assert()
        .success();

    let hack = fs::read_to_string(dir.path().join("Add.hack")).unwrap();
    let expected = "0000000000000010\n\
                    1110110000010000\n\
                    0000000000000011\n\
                    1110000010010000\n\
                    0000000000000000\n\
                    1110001100001000\n";
    assert_eq!(hack, expected);
}

#[test]
fn resolves_labels_and_variables() {
    let dir = tempfile::tempdir().unwrap();
    let asm = write_asm(
        &dir,
        "Loop.asm",
        "@i\nM=0\n(LOOP)\n@i\nM=M+1\n@LOOP\n0;JMP\n",
    );

    Command::cargo_bin("hack-assembler")
        .unwrap()
        .arg(&asm)
        .assert()
        .success();

    let hack = fs::read_to_string(dir.path().join("Loop.hack")).unwrap();
    let lines: Vec<&str> = hack.lines().collect();
    assert_eq!(lines.len(), 6);
    // `i` is the first user-defined variable and lands at RAM[16].
    assert_eq!(lines[0], "0000000000010000");
    // `LOOP` labels the instruction at ROM[2] (after the two `@i`/`M=0` instructions).
    assert_eq!(lines[4], "0000000000000010");
}

#[test]
fn honors_explicit_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let asm = write_asm(&dir, "Small.asm", "@0\nD=A\n");
    let out = dir.path().join("custom.hack");

    Command::cargo_bin("hack-assembler")
        .unwrap()
        .arg(&asm)
        .arg(&out)
        .assert()
        .success();

    assert!(out.exists());
}

#[test]
fn missing_input_file_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("Missing.asm");

    Command::cargo_bin("hack-assembler")
        .unwrap()
        .arg(&missing)
        .assert()
        .failure();
}
