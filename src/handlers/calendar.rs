// src/handlers/calendar.rs
use log::info;
use serde::Serialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::models::DividendSchedule;
use crate::services::store::AppState;

#[derive(Serialize)]
struct CalendarResponse {
    schedules: Vec<DividendSchedule>,
}

/// The static dividend calendar, in table order. Formatting is up to the
/// frontend; this is the raw reference data.
pub async fn get_dividend_calendar(state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request for the dividend calendar");

    Ok(warp::reply::json(&CalendarResponse {
        schedules: state.schedules.iter().cloned().collect(),
    }))
}
