// src/services/quotes.rs
//
// Market-data collaborator: pulls daily OHLCV history from Yahoo Finance's
// chart API. Downstream code never sees a fetch error — any failure or empty
// response is replaced by a synthetic random-walk series tagged with the
// reason, so the frontend can label it.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::{info, warn};
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::models::{DataSourceResult, LookbackPeriod, PriceBar};
use crate::BoxError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub fn build_client() -> Result<Client, BoxError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

/// Fetch daily price history for one ticker. Infallible by contract: fetch
/// problems degrade to synthetic data instead of propagating.
pub async fn fetch_price_history(
    client: &Client,
    symbol: &str,
    period: LookbackPeriod,
) -> DataSourceResult {
    match fetch_yahoo_history(client, symbol, period).await {
        Ok(series) if !series.is_empty() => {
            info!("Fetched {} live bars for {} ({})", series.len(), symbol, period);
            DataSourceResult::Live { series }
        }
        Ok(_) => {
            warn!("No data returned for {} ({}), substituting synthetic series", symbol, period);
            synthetic_result(symbol, period, "empty response from quote API")
        }
        Err(e) => {
            warn!("Quote fetch failed for {} ({}): {}", symbol, period, e);
            synthetic_result(symbol, period, &format!("fetch failed: {}", e))
        }
    }
}

#[derive(Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

async fn fetch_yahoo_history(
    client: &Client,
    symbol: &str,
    period: LookbackPeriod,
) -> Result<Vec<PriceBar>, BoxError> {
    let url = format!(
        "https://query1.finance.yahoo.com/v8/finance/chart/{}?range={}&interval=1d",
        symbol,
        period.as_str()
    );
    info!("Fetching quote history from URL: {}", url);

    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("quote API returned HTTP {}", status).into());
    }

    let body: ChartResponse = response.json().await?;
    if let Some(err) = body.chart.error {
        if !err.is_null() {
            return Err(format!("quote API error: {}", err).into());
        }
    }

    let result = body
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or("quote API returned no chart result")?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or("quote API returned no quote block")?;

    let closes = quote.close.unwrap_or_default();
    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut series = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        // Yahoo pads halted sessions with nulls; a bar without a close is
        // not a price and is skipped at ingestion.
        let close = match closes.get(i).copied().flatten() {
            Some(c) => c,
            None => continue,
        };
        let date = match DateTime::<Utc>::from_timestamp(*ts, 0) {
            Some(dt) => dt.date_naive(),
            None => continue,
        };
        series.push(PriceBar {
            date,
            open: opens.get(i).copied().flatten().unwrap_or(close),
            high: highs.get(i).copied().flatten().unwrap_or(close),
            low: lows.get(i).copied().flatten().unwrap_or(close),
            close,
            volume: volumes.get(i).copied().flatten().unwrap_or(0),
        });
    }

    Ok(series)
}

/// Base price for the synthetic walk, roughly where each series has traded.
fn synthetic_base_price(symbol: &str) -> f64 {
    match symbol {
        "STRK" => 95.0,
        "STRF" => 115.0,
        "STRD" => 85.0,
        "STRC" => 100.0,
        _ => 25.0,
    }
}

fn synthetic_result(symbol: &str, period: LookbackPeriod, reason: &str) -> DataSourceResult {
    DataSourceResult::Synthetic {
        series: synthetic_series(symbol, period),
        reason: reason.to_string(),
    }
}

/// Generate a daily random walk around the ticker's base price so the
/// dashboard still has something to draw when the quote API is down.
pub fn synthetic_series(symbol: &str, period: LookbackPeriod) -> Vec<PriceBar> {
    let mut rng = rand::thread_rng();
    let base = synthetic_base_price(symbol);
    let days = period.days();
    let end = Utc::now().date_naive();

    let mut price = base;
    let mut series = Vec::with_capacity(days as usize + 1);
    for offset in (0..=days).rev() {
        price = (price + rng.gen_range(-2.0..2.0)).max(0.01);
        series.push(PriceBar {
            date: end - ChronoDuration::days(offset),
            open: price * 0.99,
            high: price * 1.02,
            low: price * 0.98,
            close: price,
            volume: rng.gen_range(1_000..10_000),
        });
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_series_spans_period() {
        let series = synthetic_series("STRK", LookbackPeriod::OneMonth);
        assert_eq!(series.len() as i64, LookbackPeriod::OneMonth.days() + 1);
        assert_eq!(series.last().unwrap().date, Utc::now().date_naive());

        for window in series.windows(2) {
            assert!(window[0].date < window[1].date);
        }
    }

    #[test]
    fn test_synthetic_series_has_valid_prices() {
        let series = synthetic_series("STRF", LookbackPeriod::OneYear);
        for bar in &series {
            assert!(bar.close > 0.0);
            assert!(bar.low <= bar.high);
        }
        // The walk should stay in the neighborhood of the base price.
        let last = series.last().unwrap().close;
        assert!(last > 0.0 && last < 115.0 + 2.0 * 366.0);
    }

    #[test]
    fn test_synthetic_result_carries_reason() {
        let result = synthetic_result("STRD", LookbackPeriod::FiveDays, "fetch failed: timeout");
        assert!(result.is_synthetic());
        assert_eq!(result.synthetic_reason(), Some("fetch failed: timeout"));
        assert!(!result.series().is_empty());
    }
}
