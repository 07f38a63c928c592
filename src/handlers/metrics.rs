// src/handlers/metrics.rs
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{LookbackPeriod, YieldMetrics};
use crate::services::store::AppState;
use crate::services::yields;

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

impl PeriodQuery {
    /// Parse the `period` query parameter, defaulting to one month.
    pub fn parse(&self) -> Result<LookbackPeriod, Rejection> {
        match &self.period {
            None => Ok(LookbackPeriod::default()),
            Some(raw) => raw.parse().map_err(|e: String| {
                warn!("Rejecting request with bad period: {}", e);
                warp::reject::custom(ApiError::bad_request(e))
            }),
        }
    }
}

#[derive(Serialize)]
struct TickerMetrics {
    symbol: String,
    name: String,
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    synthetic_reason: Option<String>,
    metrics: YieldMetrics,
}

#[derive(Serialize)]
struct MetricsResponse {
    as_of: DateTime<Utc>,
    period: String,
    tickers: Vec<TickerMetrics>,
    /// Symbols with no price data this cycle; excluded from `tickers`.
    unavailable: Vec<String>,
}

pub async fn get_yield_metrics(query: PeriodQuery, state: Arc<AppState>) -> Result<Json, Rejection> {
    let period = query.parse()?;
    info!("Handling request for yield metrics ({})", period);

    let mut tickers = Vec::with_capacity(state.schedules.len());
    let mut unavailable = Vec::new();

    for schedule in state.schedules.iter() {
        let result = state.quotes.get_or_fetch(&schedule.symbol, period).await;
        match yields::compute_current_yield(result.series(), schedule) {
            Some(metrics) => tickers.push(TickerMetrics {
                symbol: schedule.symbol.clone(),
                name: schedule.name.clone(),
                source: if result.is_synthetic() { "synthetic" } else { "live" },
                synthetic_reason: result.synthetic_reason().map(str::to_string),
                metrics,
            }),
            None => {
                warn!("No price data for {} this cycle", schedule.symbol);
                unavailable.push(schedule.symbol.clone());
            }
        }
    }

    Ok(warp::reply::json(&MetricsResponse {
        as_of: Utc::now(),
        period: period.to_string(),
        tickers,
        unavailable,
    }))
}

pub async fn get_ticker_metrics(
    symbol: String,
    query: PeriodQuery,
    state: Arc<AppState>,
) -> Result<Json, Rejection> {
    let period = query.parse()?;
    info!("Handling request for {} metrics ({})", symbol, period);

    // Unknown symbols fall back to a zero-rate schedule rather than a 404;
    // the quote may still be real even if the dividend table has no entry.
    let schedule = state.schedules.get_or_default(&symbol);
    let result = state.quotes.get_or_fetch(&symbol, period).await;

    let metrics = yields::compute_current_yield(result.series(), &schedule).ok_or_else(|| {
        warn!("No price data for {} this cycle", symbol);
        warp::reject::custom(ApiError::not_found(format!("no price data for {}", symbol)))
    })?;

    Ok(warp::reply::json(&TickerMetrics {
        symbol: schedule.symbol,
        name: schedule.name,
        source: if result.is_synthetic() { "synthetic" } else { "live" },
        synthetic_reason: result.synthetic_reason().map(str::to_string),
        metrics,
    }))
}
