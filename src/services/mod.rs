pub mod alerts;
pub mod quotes;
pub mod refresher;
pub mod schedules;
pub mod store;
pub mod yields;
