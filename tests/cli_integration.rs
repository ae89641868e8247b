//! Integration tests for the selma CLI.
//!
//! These tests run the binary with an isolated environment so that user
//! config files do not leak in.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for running selma with an isolated environment.
fn selma(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("selma").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("SELMA_CONFIG")
        .env_remove("SELMA_RESOURCE_PATH")
        .env_remove("SELMA_LOG");
    cmd
}

fn resource_dir(text: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("selma.properties"), text).unwrap();
    dir
}

#[test]
fn version_flag_works() {
    let home = TempDir::new().unwrap();
    selma(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_from_bundled_resource() {
    let home = TempDir::new().unwrap();
    selma(home.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "version:          {}",
            env!("CARGO_PKG_VERSION")
        )))
        .stderr(predicate::str::contains("-- Running Selma with build --"));
}

#[test]
fn version_json_from_resource_dir() {
    let home = TempDir::new().unwrap();
    let res = resource_dir(
        "selma.version=1.2.3\nselma.git.commit-full=abc123\nselma.git.desc=v1.2.3-rc1\n",
    );

    let output = selma(home.path())
        .args(["version", "--json", "--resource-dir"])
        .arg(res.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["version"], "1.2.3");
    assert_eq!(json["git_hash"], "abc123");
    assert_eq!(json["git_description"], "v1.2.3-rc1");

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("selma.version=1.2.3"));
}

#[test]
fn quiet_version_prints_only_version_and_no_dump() {
    let home = TempDir::new().unwrap();
    let res = resource_dir("selma.version=9.8.7\n");

    selma(home.path())
        .arg("-q")
        .arg("--resource-dir")
        .arg(res.path())
        .arg("version")
        .assert()
        .success()
        .stdout("9.8.7\n")
        .stderr(predicate::str::contains("Running Selma").not());
}

#[test]
fn missing_keys_show_fallbacks() {
    let home = TempDir::new().unwrap();
    let res = resource_dir("# nothing\n");

    selma(home.path())
        .arg("--resource-dir")
        .arg(res.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("V??.??"))
        .stdout(predicate::str::contains("UNKOWN GIT HASH"));
}

#[test]
fn config_file_adds_resource_dir_and_disables_banner() {
    let home = TempDir::new().unwrap();
    let res = resource_dir("selma.version=5.5.5\n");
    let config_dir = home.path().join(".selma");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            "resource_dirs = [{}]\nbuild_banner = false\n",
            toml_string(res.path())
        ),
    )
    .unwrap();

    selma(home.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("5.5.5"))
        .stderr(predicate::str::contains("Running Selma").not());
}

#[test]
fn invalid_config_fails() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bad.toml");
    std::fs::write(&config, "unknown_key = 1\n").unwrap();

    selma(home.path())
        .env("SELMA_CONFIG", &config)
        .arg("version")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn malformed_resource_fails_with_resource_name() {
    let home = TempDir::new().unwrap();
    let res = resource_dir("selma.version=\\uZZZZ\n");

    selma(home.path())
        .arg("--resource-dir")
        .arg(res.path())
        .arg("version")
        .assert()
        .failure()
        .stderr(predicate::str::contains("selma.properties"));
}

#[test]
fn latin1_resource_is_decoded() {
    let home = TempDir::new().unwrap();
    let res = TempDir::new().unwrap();
    std::fs::write(
        res.path().join("selma.properties"),
        b"selma.version=1.0\nselma.git.desc=caf\xe9\n",
    )
    .unwrap();

    selma(home.path())
        .args(["-q", "version", "--json", "--resource-dir"])
        .arg(res.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("caf\u{e9}"));
}

#[test]
fn properties_are_sorted() {
    let home = TempDir::new().unwrap();
    let res = resource_dir("zeta=1\nalpha=2\n");

    selma(home.path())
        .args(["-q", "properties", "--resource-dir"])
        .arg(res.path())
        .assert()
        .success()
        .stdout("alpha=2\nzeta=1\n");
}

#[test]
fn constants_work_without_resource() {
    let home = TempDir::new().unwrap();
    let res = resource_dir("selma.version=\\uZZZZ\n");

    // A broken resource does not matter: constants never load metadata.
    selma(home.path())
        .args(["constants", "--resource-dir"])
        .arg(res.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("SelmaGeneratedClass"))
        .stdout(predicate::str::contains("instanceCache"));
}

#[test]
fn constants_json() {
    let home = TempDir::new().unwrap();
    let output = selma(home.path())
        .args(["constants", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 12);
    assert_eq!(entries[1]["name"], "IN_VAR");
    assert_eq!(entries[1]["value"], "in");
}

#[test]
fn completion_generates_script() {
    let home = TempDir::new().unwrap();
    selma(home.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("selma"));
}

/// Quote a path as a TOML basic string.
fn toml_string(path: &Path) -> String {
    toml::Value::String(path.display().to_string()).to_string()
}
