use crate::update::{CacheRecord, UpdateCacheStore, format_notice, is_stale, now_millis};
use crate::version::{is_newer, normalize};
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use colored::Colorize;

/// Inspect or reset the update-check cache.
#[derive(Args, Debug, Clone)]
pub struct CacheCommand {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheSubcommand {
    /// Show the cache location and its contents
    Show,
    /// Delete the cache so the next run checks again and may notify again
    Clear,
}

impl CacheCommand {
    pub async fn execute(self) -> Result<()> {
        self.execute_with_store(&UpdateCacheStore::default())
    }

    pub fn execute_with_store(self, store: &UpdateCacheStore) -> Result<()> {
        match self.command {
            CacheSubcommand::Show => show(store),
            CacheSubcommand::Clear => clear(store),
        }
    }
}

fn show(store: &UpdateCacheStore) -> Result<()> {
    let path = store.path()?;
    println!("{} {}", "Cache file:".bold(), path.display());

    let Some(record) = store.read() else {
        println!("{}", "No update check recorded yet".yellow());
        return Ok(());
    };

    println!("  Last checked:  {}", format_millis(record.last_checked));
    println!(
        "  Latest:        {}",
        if record.latest.is_empty() { "unknown".dimmed().to_string() } else { record.latest.clone() }
    );
    println!("  Last notified: {}", format_millis(record.last_notified));
    if is_stale(Some(&record), now_millis()) {
        println!("  {}", "Stale: the next run will check again".cyan());
    }
    if let Some(notice) = pending_notice(&record) {
        println!("  {}", notice.green());
    }
    Ok(())
}

fn clear(store: &UpdateCacheStore) -> Result<()> {
    let path = store.path()?;
    if store.clear()? {
        println!("{} {}", "Removed".green(), path.display());
    } else {
        println!("Nothing to remove at {}", path.display());
    }
    Ok(())
}

fn pending_notice(record: &CacheRecord) -> Option<String> {
    let installed = normalize(env!("CARGO_PKG_VERSION"));
    let latest = normalize(&record.latest);
    is_newer(&latest, &installed).then(|| format_notice(&installed, &latest))
}

fn format_millis(millis: u64) -> String {
    if millis == 0 {
        return "never".to_string();
    }
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(|| millis.to_string(), |at| at.to_rfc3339())
}
