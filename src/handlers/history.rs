// src/handlers/history.rs
use log::info;
use serde::Serialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::metrics::PeriodQuery;
use crate::models::{PriceBar, YieldPoint};
use crate::services::store::AppState;
use crate::services::yields;

#[derive(Serialize)]
struct HistoryResponse {
    symbol: String,
    period: String,
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    synthetic_reason: Option<String>,
    prices: Vec<PriceBar>,
    /// Yield per bar; bars without a valid close are absent here even though
    /// they appear in `prices`.
    yields: Vec<YieldPoint>,
}

pub async fn get_yield_history(
    symbol: String,
    query: PeriodQuery,
    state: Arc<AppState>,
) -> Result<Json, Rejection> {
    let period = query.parse()?;
    info!("Handling request for {} history ({})", symbol, period);

    let schedule = state.schedules.get_or_default(&symbol);
    let result = state.quotes.get_or_fetch(&symbol, period).await;
    let yields = yields::compute_historical_yield(result.series(), &schedule);

    Ok(warp::reply::json(&HistoryResponse {
        symbol: schedule.symbol,
        period: period.to_string(),
        source: if result.is_synthetic() { "synthetic" } else { "live" },
        synthetic_reason: result.synthetic_reason().map(str::to_string),
        prices: result.series().to_vec(),
        yields,
    }))
}
