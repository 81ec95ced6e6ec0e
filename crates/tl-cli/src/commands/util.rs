//! Shared utilities for CLI commands.

use std::future::Future;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use tl_core::{SegmentType, SystemClock};
use tl_store::{HttpRowStore, Repository, RowCache};

use crate::Config;

/// Manual durations: `45`, `45m`, `1h`, `1.5h`, `1h 5m`, `1h5m`.
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+(?:\.\d+)?)\s*h)?\s*(?:(\d+(?:\.\d+)?)\s*m?)?$").unwrap()
});

/// Departure time of day, `HH:MM`.
static TIME_OF_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap());

/// Parses a manually entered duration into minutes.
pub fn parse_duration_minutes(s: &str) -> Result<f64> {
    let s = s.trim();
    let caps = DURATION_RE
        .captures(s)
        .filter(|_| !s.is_empty())
        .with_context(|| format!("invalid duration: {s}. Use minutes (45, 45m) or hours (1h, 1h 5m)"))?;

    let hours = caps
        .get(1)
        .map_or(Ok(0.0), |m| m.as_str().parse::<f64>())
        .context("failed to parse hours")?;
    let minutes = caps
        .get(2)
        .map_or(Ok(0.0), |m| m.as_str().parse::<f64>())
        .context("failed to parse minutes")?;
    Ok(hours.mul_add(60.0, minutes))
}

/// A `TYPE=DURATION` pair from `tl trip log --segment`.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentEntry {
    pub segment_type: SegmentType,
    pub minutes: f64,
}

/// clap value parser for [`SegmentEntry`].
pub fn parse_segment_entry(s: &str) -> Result<SegmentEntry, String> {
    let (tag, duration) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=DURATION, got {s}"))?;
    let segment_type = tag.trim().parse::<SegmentType>().map_err(|err| {
        let known: Vec<&str> = SegmentType::ALL.iter().map(|t| t.as_str()).collect();
        format!("{err} (expected one of: {})", known.join(", "))
    })?;
    let minutes = parse_duration_minutes(duration).map_err(|err| err.to_string())?;
    Ok(SegmentEntry {
        segment_type,
        minutes,
    })
}

/// clap value parser for `--time`.
pub fn parse_time_of_day(s: &str) -> Result<String, String> {
    if TIME_OF_DAY_RE.is_match(s) {
        Ok(s.to_string())
    } else {
        Err(format!("invalid time: {s}. Use HH:MM (e.g. 06:45)"))
    }
}

/// Runs a future to completion on a fresh runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    Ok(runtime.block_on(future))
}

/// Builds the store repository from configuration.
pub fn open_repository(config: &Config) -> Result<Repository<HttpRowStore>> {
    let store = HttpRowStore::new(config.store_url.as_deref(), config.request_timeout())
        .context("cannot reach the row store; set store_url in config.toml or TL_STORE_URL")?;
    Ok(Repository::with_cache(
        store,
        RowCache::new(SystemClock, config.cache_ttl()),
    ))
}

/// Formats a money amount without trailing decimals, as `$240`.
pub fn dollars(amount: f64) -> String {
    format!("${amount:.0}")
}
