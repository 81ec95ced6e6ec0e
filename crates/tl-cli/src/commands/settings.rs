//! Configuration inspection.

use std::io::Write;

use anyhow::{Context, Result};

use tl_core::Clock;
use tl_store::{Repository, RowStore};

use crate::Config;

pub fn show<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let store = if config.store_url.as_deref().is_some_and(|u| !u.trim().is_empty()) {
        "configured"
    } else {
        "not set (set store_url in config.toml or TL_STORE_URL)"
    };
    writeln!(writer, "Store endpoint:   {store}")?;
    writeln!(writer, "Data directory:   {}", config.data_dir.display())?;
    writeln!(writer, "Cache TTL:        {}s", config.cache_ttl_secs)?;
    writeln!(writer, "Request timeout:  {}s", config.request_timeout_secs)?;
    Ok(())
}

/// Lists trips straight from the store to prove the endpoint works.
pub async fn test_connection<W: Write, S: RowStore, C: Clock>(
    writer: &mut W,
    repo: &Repository<S, C>,
) -> Result<()> {
    let trips = repo
        .list_trips(true)
        .await
        .context("connection test failed")?;
    writeln!(writer, "Connected. {} trips in the store.", trips.len())?;
    Ok(())
}
