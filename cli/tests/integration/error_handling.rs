//! Error handling integration tests for the smartcp CLI.

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
fn test_missing_output_directory_aborts() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");
    let config = fx.configs.path().join("config.yml");
    fs::write(
        &config,
        format!(
            "input_base: {}\noutput_base: {}\nclients:\n{NUMBERED}",
            fx.input.path().display(),
            fx.output.path().join("nope/deeper").display()
        ),
    )
    .unwrap();

    cargo_bin_cmd!("smartcp")
        .arg("-v")
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\" /\\ \""))
        .stderr(predicate::str::starts_with("smartcp: There is no nope in"));

    assert_eq!(fx.count_files_recursive(fx.output.path()), 0);
}

#[test]
fn test_missing_config_file() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");
    let config = fx.write_config("config.yml", NUMBERED);
    let missing = fx.configs.path().join("missing.yml");

    // Later files are not processed after a failure
    cargo_bin_cmd!("smartcp")
        .arg(&missing)
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No such file or directory"))
        .stderr(predicate::str::contains("missing.yml"));

    assert!(!fx.output_path("g1.txt").exists());
}

#[test]
fn test_earlier_configs_keep_their_copies() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");
    let config = fx.write_config("config.yml", NUMBERED);
    let missing = fx.configs.path().join("missing.yml");

    cargo_bin_cmd!("smartcp")
        .arg(&config)
        .arg(&missing)
        .assert()
        .code(1);

    fx.assert_file_content(&fx.output_path("g1.txt"), "one");
}

#[test]
fn test_empty_config() {
    let fx = TestFixture::new();
    let config = fx.configs.path().join("empty.yml");
    fs::write(&config, "").unwrap();

    cargo_bin_cmd!("smartcp")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Empty config file"));
}

#[test]
fn test_invalid_yaml() {
    cargo_bin_cmd!("smartcp")
        .write_stdin("clients: [unterminated")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_missing_clients_key() {
    let fx = TestFixture::new();
    let config = fx.configs.path().join("config.yml");
    fs::write(&config, "input_base: /in\noutput_base: /out\n").unwrap();

    cargo_bin_cmd!("smartcp")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("clients"));
}

#[test]
fn test_unknown_label() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");
    let config = fx.write_config(
        "config.yml",
        r#"
  - name: typo
    arguments:
      n: [1]
    input:
      path_format: "f{0}.txt"
      parameters: [{arg: n}]
    output:
      path_format: "g{0}.txt"
      parameters: [{arg: m}]
"#,
    );

    cargo_bin_cmd!("smartcp")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown label `m'"));
}

#[test]
fn test_expression_without_shape_key() {
    let fx = TestFixture::new();
    let config = fx.write_config(
        "config.yml",
        r#"
  - name: broken
    arguments: {}
    input: {format: "a.txt"}
    output: {path_format: "b.txt"}
"#,
    );

    cargo_bin_cmd!("smartcp")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "should have `arg', `mapping' or `path_format'",
        ));
}

#[test]
fn test_template_index_out_of_range() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");
    let config = fx.write_config(
        "config.yml",
        r#"
  - name: overreach
    arguments:
      n: [1]
    input:
      path_format: "f{0}.txt"
      parameters: [{arg: n}]
    output:
      path_format: "g{1}.txt"
      parameters: [{arg: n}]
"#,
    );

    cargo_bin_cmd!("smartcp")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid path format"));

    assert_eq!(fx.count_files_recursive(fx.output.path()), 0);
}

#[test]
fn test_unknown_flag_is_a_usage_error() {
    cargo_bin_cmd!("smartcp")
        .arg("--frobnicate")
        .assert()
        .code(2);
}
