use configmesh_npm::config::Settings;
use configmesh_npm::update::{
    CacheRecord, NotifyOutcome, RefreshOutcome, UpdateCacheStore, UpdateNotifier, UpdateRefresher,
};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOW: u64 = 1_760_000_000_000;
const HOUR: u64 = 60 * 60 * 1000;

async fn registry(latest: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/configmesh/latest"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"name": "configmesh", "version": latest})),
        )
        .mount(&server)
        .await;
    server
}

fn notice(notifier: &UpdateNotifier, now: u64) -> (NotifyOutcome, String) {
    let mut out = Vec::new();
    let outcome = notifier.notify(now, &mut out);
    (outcome, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_refresh_then_notify_once_per_window() {
    let server = registry("2.0.0").await;
    let dir = tempdir().unwrap();
    let store = UpdateCacheStore::at(dir.path().join("configmesh/update.json"));
    let settings = Settings {
        registry_url: server.uri(),
        ..Settings::default()
    };

    let notifier = UpdateNotifier::new(store.clone(), &settings)
        .with_installed_version("1.9.0")
        .with_interactive(true);
    let refresher = UpdateRefresher::new(store.clone(), &settings).unwrap();

    // First run: nothing cached yet, so no notice but a refresh is due.
    assert_eq!(notice(&notifier, NOW).0, NotifyOutcome::NoLatest);
    assert!(refresher.needs_refresh(NOW));
    assert_eq!(
        refresher.refresh(NOW, &CancellationToken::new()).await,
        RefreshOutcome::Updated {
            latest: "2.0.0".to_string()
        }
    );

    // Second run: the cached version is newer.
    let (outcome, output) = notice(&notifier, NOW + HOUR);
    assert!(matches!(outcome, NotifyOutcome::Notified { .. }));
    assert!(output.contains("installed 1.9.0, latest 2.0.0"));
    assert!(!refresher.needs_refresh(NOW + HOUR));

    // Third run, same window: suppressed.
    assert_eq!(notice(&notifier, NOW + 2 * HOUR).0, NotifyOutcome::Suppressed);

    // A day after the notice: shown again, and the refresh is due again.
    assert!(matches!(notice(&notifier, NOW + 25 * HOUR).0, NotifyOutcome::Notified { .. }));
    assert!(refresher.needs_refresh(NOW + 25 * HOUR));

    let record = store.read().unwrap();
    assert_eq!(record.last_checked, NOW);
    assert_eq!(record.last_notified, NOW + 25 * HOUR);
}

#[tokio::test]
async fn test_zero_last_checked_always_refreshes() {
    let server = registry("1.0.1").await;
    let dir = tempdir().unwrap();
    let store = UpdateCacheStore::at(dir.path().join("update.json"));
    store
        .write(&CacheRecord {
            last_checked: 0,
            latest: "1.0.1".to_string(),
            last_notified: NOW,
            ..CacheRecord::default()
        })
        .unwrap();

    let settings = Settings {
        registry_url: server.uri(),
        ..Settings::default()
    };
    let refresher = UpdateRefresher::new(store.clone(), &settings).unwrap();

    assert!(refresher.needs_refresh(NOW));
    assert!(matches!(
        refresher.refresh(NOW, &CancellationToken::new()).await,
        RefreshOutcome::Updated { .. }
    ));
    assert_eq!(store.read().unwrap().last_notified, NOW);
}

#[tokio::test]
async fn test_unreachable_registry_is_absorbed() {
    let dir = tempdir().unwrap();
    let store = UpdateCacheStore::at(dir.path().join("update.json"));
    let settings = Settings {
        // Nothing listens on the discard port.
        registry_url: "http://127.0.0.1:9".to_string(),
        ..Settings::default()
    };
    let refresher = UpdateRefresher::new(store.clone(), &settings).unwrap();

    assert!(matches!(
        refresher.refresh(NOW, &CancellationToken::new()).await,
        RefreshOutcome::Failed { .. }
    ));
    assert_eq!(store.read(), None);
}
