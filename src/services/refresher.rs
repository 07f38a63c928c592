// src/services/refresher.rs
use log::info;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::models::LookbackPeriod;
use crate::services::store::AppState;

/// Handle for the periodic cache refresher. Dropping it stops the loop.
pub struct RefreshHandle {
    handle: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawn a task that re-warms the quote cache for every schedule symbol on a
/// fixed interval, so most requests are served from fresh cache entries. The
/// yield and alert computations stay pure; this loop only touches the cache.
pub fn spawn_refresh_task(state: Arc<AppState>, interval_secs: u64) -> RefreshHandle {
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            ticker.tick().await;
            let symbols = state.schedules.symbols();
            info!("Refreshing quote cache for {} tickers", symbols.len());
            for symbol in symbols {
                state
                    .quotes
                    .get_or_fetch(&symbol, LookbackPeriod::default())
                    .await;
            }
        }
    });

    RefreshHandle { handle }
}
