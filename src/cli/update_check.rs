use crate::config::Settings;
use crate::update::{UpdateCacheStore, UpdateRefresher, now_millis};
use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Refresh the cached latest version (spawned in the background by `run`).
#[derive(Args, Debug, Clone, Default)]
pub struct UpdateCheckCommand {}

impl UpdateCheckCommand {
    /// One refresh attempt. Never fails; problems are only logged.
    pub async fn execute(self, settings: Settings) -> Result<()> {
        let refresher = match UpdateRefresher::new(UpdateCacheStore::default(), &settings) {
            Ok(refresher) => refresher,
            Err(e) => {
                debug!("Update check unavailable: {}", e);
                return Ok(());
            }
        };

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        let outcome = refresher.refresh(now_millis(), &cancel).await;
        debug!("Update check finished: {:?}", outcome);
        Ok(())
    }
}
