use configmesh_npm::config::Settings;
use configmesh_npm::core::LauncherError;
use configmesh_npm::installer::{ChecksumStatus, InstallOutcome, Installer};
use configmesh_npm::test_utils::{ReleaseFixture, init_test_logging};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VERSION: &str = "1.4.0";

fn settings(server: &MockServer, platform: &str, arch: &str) -> Settings {
    Settings {
        base_url_override: Some(format!("{}/releases/{VERSION}", server.uri())),
        platform_override: Some(platform.to_string()),
        arch_override: Some(arch.to_string()),
        ..Settings::default()
    }
}

async fn serve_release(server: &MockServer, release: &ReleaseFixture, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/releases/{VERSION}/{}", release.file_name)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(release.archive.clone()))
        .expect(expected_hits)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/releases/{VERSION}/checksums.txt")))
        .respond_with(ResponseTemplate::new(200).set_body_string(release.manifest.clone()))
        .expect(expected_hits)
        .mount(server)
        .await;
}

fn installer(dest: &std::path::Path, settings: Settings) -> Installer {
    Installer::new(dest, settings).unwrap().with_version(VERSION)
}

#[tokio::test]
async fn test_second_install_makes_no_requests() {
    init_test_logging(None);
    let server = MockServer::start().await;
    let release = ReleaseFixture::new(VERSION, "linux", "amd64", b"\x7fELF fake");
    serve_release(&server, &release, 1).await;

    let dest = tempdir().unwrap();
    let installer = installer(dest.path(), settings(&server, "linux", "amd64"));

    let first = installer.install().await.unwrap();
    assert!(matches!(
        first,
        InstallOutcome::Installed {
            checksum: ChecksumStatus::Verified,
            ..
        }
    ));

    let second = installer.install().await.unwrap();
    assert_eq!(
        second,
        InstallOutcome::AlreadyInstalled {
            path: dest.path().join("configmesh")
        }
    );
    // `.expect(1)` on both mocks is verified when the server drops.
}

#[tokio::test]
async fn test_manifest_without_entry_still_installs() {
    let server = MockServer::start().await;
    let release = ReleaseFixture::new(VERSION, "darwin", "arm64", b"mach-o").without_manifest_entry();
    serve_release(&server, &release, 1).await;

    let dest = tempdir().unwrap();
    let outcome = installer(dest.path(), settings(&server, "darwin", "arm64")).install().await.unwrap();

    match outcome {
        InstallOutcome::Installed {
            artifact,
            checksum: ChecksumStatus::Skipped(reason),
            ..
        } => {
            assert_eq!(artifact, "configmesh_1.4.0_darwin_arm64.tar.gz");
            assert!(reason.contains("not in checksums manifest"), "{reason}");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(std::fs::read(dest.path().join("configmesh")).unwrap(), b"mach-o");
}

#[tokio::test]
async fn test_missing_manifest_still_installs() {
    let server = MockServer::start().await;
    let release = ReleaseFixture::new(VERSION, "linux", "arm64", b"bin");
    Mock::given(method("GET"))
        .and(path(format!("/releases/{VERSION}/{}", release.file_name)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(release.archive.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/releases/{VERSION}/checksums.txt")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dest = tempdir().unwrap();
    let outcome = installer(dest.path(), settings(&server, "linux", "arm64")).install().await.unwrap();

    assert!(matches!(
        outcome,
        InstallOutcome::Installed {
            checksum: ChecksumStatus::Skipped(_),
            ..
        }
    ));
    assert!(dest.path().join("configmesh").exists());
}

#[tokio::test]
async fn test_artifact_404_is_fatal_and_leaves_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(404)).mount(&server).await;

    let dest = tempdir().unwrap();
    let err = installer(dest.path(), settings(&server, "linux", "amd64")).install().await.unwrap_err();

    match err.downcast_ref::<LauncherError>() {
        Some(LauncherError::DownloadFailed {
            url,
            status,
        }) => {
            assert_eq!(*status, 404);
            assert!(url.ends_with("/releases/1.4.0/configmesh_1.4.0_linux_amd64.tar.gz"), "{url}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_release_host_redirect_is_followed() {
    let server = MockServer::start().await;
    let release = ReleaseFixture::new(VERSION, "linux", "amd64", b"bin");
    Mock::given(method("GET"))
        .and(path(format!("/releases/{VERSION}/{}", release.file_name)))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/cdn/artifact", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cdn/artifact"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(release.archive.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/releases/{VERSION}/checksums.txt")))
        .respond_with(ResponseTemplate::new(200).set_body_string(release.manifest.clone()))
        .mount(&server)
        .await;

    let dest = tempdir().unwrap();
    let outcome = installer(dest.path(), settings(&server, "linux", "amd64")).install().await.unwrap();
    assert!(matches!(
        outcome,
        InstallOutcome::Installed {
            checksum: ChecksumStatus::Verified,
            ..
        }
    ));
}

#[tokio::test]
async fn test_unsupported_platform_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let dest = tempdir().unwrap();
    let err = installer(dest.path(), settings(&server, "windows", "amd64")).install().await.unwrap_err();

    assert_eq!(err.to_string(), "Unsupported platform: windows");
}
