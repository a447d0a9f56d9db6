//! Integration tests for `--plan` output.

#[path = "../common/mod.rs"]
mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::TestFixture;
use predicates::prelude::*;
use rstest::rstest;

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

#[rstest]
#[case("--plan")]
#[case("-n")]
#[case("--dry-run")]
fn test_plan_writes_nothing(#[case] flag: &str) {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");
    fx.write_input("f2.txt", "two");
    let config = fx.write_config("config.yml", NUMBERED);

    cargo_bin_cmd!("smartcp")
        .args([flag, "-v"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("g1.txt"))
        .stdout(predicate::str::contains("g2.txt"))
        .stdout(predicate::str::contains("Plan summary:"))
        .stdout(predicate::str::contains("Files to copy:  2\n"))
        .stdout(predicate::str::contains("Bytes:          6 B\n"));

    assert_eq!(fx.count_files_recursive(fx.output.path()), 0);
}

#[test]
fn test_plan_skips_up_to_date_outputs() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");
    fx.write_input("f2.txt", "two");
    let config = fx.write_config("config.yml", NUMBERED);

    cargo_bin_cmd!("smartcp").arg(&config).assert().success();
    fx.write_input("f2.txt", "changed");

    cargo_bin_cmd!("smartcp")
        .args(["--plan", "-v"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("g1.txt").not())
        .stdout(predicate::str::contains("g2.txt"))
        .stdout(predicate::str::contains("Files to copy:  1\n"))
        .stdout(predicate::str::contains("Up to date:     1\n"));

    // The stale output is left alone
    fx.assert_file_content(&fx.output_path("g2.txt"), "two");
}

#[test]
fn test_plan_still_reports_missing_directories() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");
    let config = fx.write_config(
        "config.yml",
        r#"
  - name: nested
    arguments:
      n: [1]
    input:
      path_format: "f{0}.txt"
      parameters: [{arg: n}]
    output:
      path_format: "missing/g{0}.txt"
      parameters: [{arg: n}]
"#,
    );

    cargo_bin_cmd!("smartcp")
        .arg("--plan")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("There is no missing in"));
}

#[test]
fn test_plan_is_quiet_without_verbose() {
    let fx = TestFixture::new();
    fx.write_input("f1.txt", "one");
    let config = fx.write_config("config.yml", NUMBERED);

    cargo_bin_cmd!("smartcp")
        .arg("--plan")
        .arg(&config)
        .assert()
        .success()
        .stdout("");
}
