use assert_cmd::Command;
use configmesh_npm::test_utils::ReleaseFixture;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `configmesh-npm` with a clean, isolated environment.
fn cmd(cache_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("configmesh-npm").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("CONFIGMESH_VERSION")
        .env_remove("CONFIGMESH_BASE_URL")
        .env_remove("CONFIGMESH_REGISTRY_URL")
        .env("XDG_CACHE_HOME", cache_home)
        .env("CONFIGMESH_NO_UPDATE_NOTICE", "1");
    cmd
}

#[test]
fn test_unsupported_platform_fails_install() {
    let home = tempdir().unwrap();
    let dest = tempdir().unwrap();

    cmd(home.path())
        .env("CONFIGMESH_PLATFORM", "windows")
        .env("CONFIGMESH_BASE_URL", "http://127.0.0.1:9/never-contacted")
        .args(["postinstall", "--dest"])
        .arg(dest.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unsupported platform: windows"));

    assert!(!dest.path().join("configmesh").exists());
}

#[test]
fn test_unsupported_arch_fails_install() {
    let home = tempdir().unwrap();
    let dest = tempdir().unwrap();

    cmd(home.path())
        .env("CONFIGMESH_PLATFORM", "linux")
        .env("CONFIGMESH_ARCH", "ia32")
        .args(["postinstall", "--dest"])
        .arg(dest.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported arch: ia32"));
}

#[test]
fn test_run_missing_binary() {
    let home = tempdir().unwrap();
    let bin_dir = tempdir().unwrap();

    cmd(home.path())
        .args(["run", "--bin-dir"])
        .arg(bin_dir.path())
        .args(["--", "status"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Binary not found:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_postinstall_then_run() {
    let server = MockServer::start().await;
    let release = ReleaseFixture::new("2.1.0", "linux", "amd64", b"#!/bin/sh\necho \"hello $1\"\nexit 4\n");
    Mock::given(method("GET"))
        .and(path(format!("/dl/{}", release.file_name)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(release.archive.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dl/checksums.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(release.manifest.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let base_url = format!("{}/dl", server.uri());

    cmd(home.path())
        .env("CONFIGMESH_PLATFORM", "linux")
        .env("CONFIGMESH_ARCH", "amd64")
        .env("CONFIGMESH_BASE_URL", &base_url)
        .args(["postinstall", "--version", "2.1.0", "--dest"])
        .arg(dest.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("postinstall: checksum OK"))
        .stderr(predicate::str::contains("postinstall: installed configmesh to"));

    // Idempotent: the mocks above allow exactly one download each.
    cmd(home.path())
        .env("CONFIGMESH_PLATFORM", "linux")
        .env("CONFIGMESH_ARCH", "amd64")
        .env("CONFIGMESH_BASE_URL", &base_url)
        .args(["postinstall", "--version", "2.1.0", "--dest"])
        .arg(dest.path())
        .assert()
        .success();

    if cfg!(unix) {
        cmd(home.path())
            .args(["run", "--bin-dir"])
            .arg(dest.path())
            .arg("world")
            .assert()
            .code(4)
            .stdout("hello world\n");
    }
}

#[cfg(target_os = "linux")]
#[tokio::test(flavor = "multi_thread")]
async fn test_update_check_and_cache_commands() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/configmesh/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"version": "v99.0.0"})))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();

    Command::cargo_bin("configmesh-npm")
        .unwrap()
        .env_remove("CI")
        .env_remove("NO_UPDATE_NOTIFIER")
        .env_remove("CONFIGMESH_NO_UPDATE_NOTICE")
        .env("XDG_CACHE_HOME", home.path())
        .env("CONFIGMESH_REGISTRY_URL", server.uri())
        .arg("update-check")
        .assert()
        .success()
        .stdout("")
        .stderr("");

    let raw = std::fs::read_to_string(home.path().join("configmesh/update.json")).unwrap();
    let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(record["latest"], "99.0.0");
    assert!(record["lastChecked"].as_u64().unwrap() > 0);

    cmd(home.path())
        .args(["cache", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("99.0.0"));

    cmd(home.path()).args(["cache", "clear"]).assert().success();
    assert!(!home.path().join("configmesh/update.json").exists());
}

#[cfg(target_os = "linux")]
#[test]
fn test_disabled_update_check_writes_nothing() {
    let home = tempdir().unwrap();

    Command::cargo_bin("configmesh-npm")
        .unwrap()
        .env("XDG_CACHE_HOME", home.path())
        .env("CI", "true")
        .env("CONFIGMESH_REGISTRY_URL", "http://127.0.0.1:9")
        .arg("update-check")
        .assert()
        .success();

    assert!(!home.path().join("configmesh/update.json").exists());
}
