// src/handlers/alerts.rs
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::ExDividendAlert;
use crate::services::alerts::{scan_upcoming_ex_dividends, DEFAULT_LOOKAHEAD_DAYS};
use crate::services::store::AppState;

#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    pub days: Option<i64>,
}

#[derive(Serialize)]
struct AlertsResponse {
    as_of: NaiveDate,
    lookahead_days: i64,
    alerts: Vec<ExDividendAlert>,
}

pub async fn get_ex_dividend_alerts(
    query: AlertQuery,
    state: Arc<AppState>,
) -> Result<Json, Rejection> {
    let lookahead_days = query.days.unwrap_or(DEFAULT_LOOKAHEAD_DAYS);
    if !(0..=365).contains(&lookahead_days) {
        warn!("Rejecting alert request with days={}", lookahead_days);
        return Err(warp::reject::custom(ApiError::bad_request(
            "days must be between 0 and 365",
        )));
    }

    let today = Utc::now().date_naive();
    info!("Scanning ex-dividend dates within {} days of {}", lookahead_days, today);

    let alerts = scan_upcoming_ex_dividends(today, &state.schedules, lookahead_days);

    Ok(warp::reply::json(&AlertsResponse {
        as_of: today,
        lookahead_days,
        alerts,
    }))
}
