// src/services/alerts.rs
use chrono::NaiveDate;

use crate::models::ExDividendAlert;
use crate::services::schedules::ScheduleRepository;

/// Lookahead window used when the request does not specify one.
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 7;

/// Scan the schedule table for ex-dividend dates coming up within
/// `lookahead_days` of `today`, both ends inclusive.
///
/// `days_until` is a signed difference; a stale calendar entry in the past
/// goes negative and is skipped rather than reported. Output order is the
/// repository's insertion order, not urgency order — callers wanting
/// soonest-first sort by `days_until` themselves.
pub fn scan_upcoming_ex_dividends(
    today: NaiveDate,
    schedules: &ScheduleRepository,
    lookahead_days: i64,
) -> Vec<ExDividendAlert> {
    schedules
        .iter()
        .filter_map(|schedule| {
            let days_until = (schedule.next_ex_dividend_date - today).num_days();
            if (0..=lookahead_days).contains(&days_until) {
                Some(ExDividendAlert {
                    symbol: schedule.symbol.clone(),
                    ex_dividend_date: schedule.next_ex_dividend_date,
                    days_until,
                    dividend_amount: schedule.payment_amount(),
                })
            } else {
                None
            }
        })
        .collect()
}
