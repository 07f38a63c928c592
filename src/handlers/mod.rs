pub mod alerts;
pub mod calendar;
pub mod error;
pub mod history;
pub mod metrics;
