//! Basic functionality integration tests for the smartcp CLI.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestFixture;
use predicates::prelude::*;
use std::fs;

const NUMBERED: &str = r#"
  - name: numbered
    arguments:
      n: [1, 2]
    input:
      path_format: "f{0}.txt"
      parameters: [{arg: n}]
    output:
      path_format: "g{0}.txt"
      parameters: [{arg: n}]
"#;

#[test]
fn test_copies_every_binding() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");
    fx.write_input("f2.txt", "two");
    let config = fx.write_config("config.yml", NUMBERED);

    let mut cmd = cargo_bin_cmd!("smartcp");
    cmd.arg(&config).assert().success().stdout("");

    fx.assert_file_content(&fx.output_path("g1.txt"), "one");
    fx.assert_file_content(&fx.output_path("g2.txt"), "two");
}

#[test]
fn test_missing_input_is_skipped() {
    let fx = TestFixture::new();
    fx.write_input("f2.txt", "two");
    let config = fx.write_config("config.yml", NUMBERED);

    let mut cmd = cargo_bin_cmd!("smartcp");
    cmd.arg(&config).assert().success();

    assert!(!fx.output_path("g1.txt").exists());
    fx.assert_file_content(&fx.output_path("g2.txt"), "two");
    assert_eq!(fx.count_files_recursive(fx.output.path()), 1);
}

#[test]
fn test_verbose_output() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");
    let config = fx.write_config("config.yml", NUMBERED);

    let mut cmd = cargo_bin_cmd!("smartcp");
    cmd.arg("-v")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Using {}",
            config.display()
        )))
        .stdout(predicate::str::contains("  Updating numbered"))
        .stdout(predicate::str::contains("\" -> \""))
        .stdout(predicate::str::contains("g1.txt"))
        .stdout(predicate::str::contains("Sync summary:"))
        .stdout(predicate::str::contains("Files copied:   1\n"))
        .stdout(predicate::str::contains("Missing inputs: 1\n"));
}

#[test]
fn test_second_run_reports_up_to_date() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");
    fx.write_input("f2.txt", "two");
    let config = fx.write_config("config.yml", NUMBERED);

    cargo_bin_cmd!("smartcp").arg(&config).assert().success();

    // Nothing left to copy; -v stays quiet about identical files
    cargo_bin_cmd!("smartcp")
        .arg("-v")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("->").not())
        .stdout(predicate::str::contains("Files copied:   0\n"));

    cargo_bin_cmd!("smartcp")
        .arg("-vv")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\" == \""))
        .stdout(predicate::str::contains("Up to date:     2\n"));
}

#[test]
fn test_changed_input_is_recopied() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "old");
    let config = fx.write_config("config.yml", NUMBERED);

    cargo_bin_cmd!("smartcp").arg(&config).assert().success();
    fx.write_input("f1.txt", "new contents");
    cargo_bin_cmd!("smartcp").arg(&config).assert().success();

    fx.assert_file_content(&fx.output_path("g1.txt"), "new contents");
}

#[test]
fn test_config_from_stdin() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");

    let mut cmd = cargo_bin_cmd!("smartcp");
    cmd.arg("-v")
        .write_stdin(fx.config_text(NUMBERED))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Using stdin"));

    fx.assert_file_content(&fx.output_path("g1.txt"), "one");
}

#[test]
fn test_dash_reads_stdin_between_files() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");
    fx.write_input("a.txt", "alpha");
    let first = fx.write_config("first.yml", NUMBERED);
    let last = fx.write_config(
        "last.yml",
        r#"
  - name: plain
    arguments: {}
    input: {path_format: a.txt}
    output: {path_format: b.txt}
"#,
    );

    let assert = cargo_bin_cmd!("smartcp")
        .arg("-v")
        .arg(&first)
        .arg("-")
        .arg(&last)
        .write_stdin(fx.config_text(NUMBERED))
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let first_at = stdout.find("first.yml").unwrap();
    let stdin_at = stdout.find("Using stdin").unwrap();
    let last_at = stdout.find("last.yml").unwrap();
    assert!(first_at < stdin_at && stdin_at < last_at, "{stdout}");

    fx.assert_file_content(&fx.output_path("g1.txt"), "one");
    fx.assert_file_content(&fx.output_path("b.txt"), "alpha");
}

#[test]
fn test_mapping_translates_values() {
    let fx = TestFixture::new();
    fx.write_input("src/english.txt", "hello");
    fx.write_input("src/french.txt", "bonjour");
    let config = fx.write_config(
        "config.yml",
        r#"
  - name: languages
    arguments:
      lang: [en, fr]
    input:
      path_format: "src/{}.txt"
      parameters:
        - mapping: {en: english, fr: french}
          key: {arg: lang}
    output:
      path_format: "dst/{0}/{0}.txt"
      parameters: [{arg: lang}]
"#,
    );
    fx.create_output_dir("dst/en");
    fx.create_output_dir("dst/fr");

    cargo_bin_cmd!("smartcp").arg(&config).assert().success();

    fx.assert_file_content(&fx.output_path("dst/en/en.txt"), "hello");
    fx.assert_file_content(&fx.output_path("dst/fr/fr.txt"), "bonjour");
}

#[test]
fn test_no_sync_still_copies() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");
    let config = fx.write_config("config.yml", NUMBERED);

    cargo_bin_cmd!("smartcp")
        .arg("--no-sync")
        .arg(&config)
        .assert()
        .success();

    fx.assert_file_content(&fx.output_path("g1.txt"), "one");
}

#[test]
fn test_binary_content_preserved() {
    let fx = TestFixture::new();
    let blob: Vec<u8> = (0..=255u8).cycle().take(300_000).collect();
    fs::write(fx.input.path().join("f1.txt"), &blob).unwrap();
    let config = fx.write_config("config.yml", NUMBERED);

    cargo_bin_cmd!("smartcp").arg(&config).assert().success();

    assert_eq!(fs::read(fx.output_path("g1.txt")).unwrap(), blob);
}

#[test]
fn test_help() {
    let mut cmd = cargo_bin_cmd!("smartcp");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--set"))
        .stdout(predicate::str::contains("Examples:"));
}

#[test]
fn test_version() {
    let mut cmd = cargo_bin_cmd!("smartcp");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("smartcp"));
}
