// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;

use log::info;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::{
    alerts::{get_ex_dividend_alerts, AlertQuery},
    calendar::get_dividend_calendar,
    history::get_yield_history,
    metrics::{get_ticker_metrics, get_yield_metrics, PeriodQuery},
};
use crate::services::store::AppState;

// Map our custom rejections to JSON error bodies
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(state: Arc<AppState>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let metrics_route = warp::path!("api" / "v1" / "metrics")
        .and(warp::get())
        .and(warp::query::<PeriodQuery>())
        .and(state_filter.clone())
        .and_then(get_yield_metrics);

    let ticker_metrics_route = warp::path!("api" / "v1" / "metrics" / String)
        .and(warp::get())
        .and(warp::query::<PeriodQuery>())
        .and(state_filter.clone())
        .and_then(get_ticker_metrics);

    let history_route = warp::path!("api" / "v1" / "history" / String)
        .and(warp::get())
        .and(warp::query::<PeriodQuery>())
        .and(state_filter.clone())
        .and_then(get_yield_history);

    let alerts_route = warp::path!("api" / "v1" / "alerts")
        .and(warp::get())
        .and(warp::query::<AlertQuery>())
        .and(state_filter.clone())
        .and_then(get_ex_dividend_alerts);

    let calendar_route = warp::path!("api" / "v1" / "calendar")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_dividend_calendar);

    info!("All routes configured successfully.");

    metrics_route
        .or(ticker_metrics_route)
        .or(history_route)
        .or(alerts_route)
        .or(calendar_route)
        .recover(handle_rejection)
}
