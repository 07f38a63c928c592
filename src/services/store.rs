// src/services/store.rs
use chrono::{DateTime, Duration, Utc};
use log::info;
use reqwest::Client;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{DataSourceResult, LookbackPeriod};
use crate::services::quotes;
use crate::services::schedules::ScheduleRepository;

/// Default freshness window for cached quote series, in seconds. Matches the
/// refresh cadence of the dashboard frontend.
pub const DEFAULT_QUOTE_TTL_SECS: i64 = 30;

struct CachedSeries {
    fetched_at: DateTime<Utc>,
    result: DataSourceResult,
}

/// In-memory quote cache keyed by (symbol, period). Nothing here persists
/// across restarts; the dividend schedule table is the only reference data
/// and it is compiled in.
pub struct QuoteStore {
    client: Client,
    ttl: Duration,
    entries: RwLock<HashMap<(String, LookbackPeriod), CachedSeries>>,
}

impl QuoteStore {
    pub fn new(client: Client, ttl_secs: i64) -> Self {
        Self {
            client,
            ttl: Duration::seconds(ttl_secs),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached series for (symbol, period) if still fresh,
    /// otherwise fetch and cache a new one. Never fails: a failed fetch
    /// caches a synthetic series like any other result.
    pub async fn get_or_fetch(&self, symbol: &str, period: LookbackPeriod) -> DataSourceResult {
        let key = (symbol.to_string(), period);
        let now = Utc::now();

        {
            let entries = self.entries.read().await;
            if let Some(cached) = entries.get(&key) {
                if now - cached.fetched_at < self.ttl {
                    return cached.result.clone();
                }
            }
        }

        info!("Quote cache miss for {} ({}), fetching", symbol, period);
        let result = quotes::fetch_price_history(&self.client, symbol, period).await;

        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CachedSeries {
                fetched_at: now,
                result: result.clone(),
            },
        );
        result
    }
}

/// Everything the handlers need, shared behind an Arc.
pub struct AppState {
    pub schedules: ScheduleRepository,
    pub quotes: QuoteStore,
}

impl AppState {
    pub fn new(schedules: ScheduleRepository, quotes: QuoteStore) -> Self {
        Self { schedules, quotes }
    }
}
