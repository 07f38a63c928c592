use dotenv::dotenv;
use env_logger;
use log::{info, warn};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

mod handlers;
mod models;
mod routes;
mod services;

use services::quotes;
use services::refresher;
use services::schedules::ScheduleRepository;
use services::store::{AppState, QuoteStore, DEFAULT_QUOTE_TTL_SECS};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn env_i64(name: &str, default: i64) -> i64 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("${} is not a number, defaulting to {}", name, default);
            default
        }),
        Err(_) => default,
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let port_str = env::var("PORT").unwrap_or_else(|_| {
        warn!("$PORT not set, defaulting to 3030");
        "3030".to_string()
    });
    let port: u16 = port_str.parse().expect("PORT must be a number");
    info!("Using PORT: {}", port);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!("Will bind to: {}", addr);

    // Build shared state: dividend schedule table + quote cache
    let schedules = ScheduleRepository::builtin();
    schedules.log_inconsistencies();

    let client = quotes::build_client().expect("failed to build HTTP client");
    let ttl_secs = env_i64("QUOTE_CACHE_TTL_SECS", DEFAULT_QUOTE_TTL_SECS);
    let state = Arc::new(AppState::new(schedules, QuoteStore::new(client, ttl_secs)));

    // Periodic cache refresh, cancellable via the returned handle
    let refresh_secs = env_i64("REFRESH_INTERVAL_SECS", 30).max(1) as u64;
    let _refresher = refresher::spawn_refresh_task(state.clone(), refresh_secs);
    info!("Quote refresher running every {}s", refresh_secs);

    // Set up CORS
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    // Set up routes
    let api = routes::routes(state).with(cors);
    info!("Routes configured successfully with CORS.");

    // Start the server
    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
}
