// src/services/schedules.rs
use chrono::NaiveDate;
use log::warn;

use crate::models::{DividendSchedule, PaymentFrequency};

/// Tolerance when comparing the stated quarterly payment against the amount
/// implied by the annual rate. A cent either way is data-entry noise.
const QUARTERLY_AMOUNT_TOLERANCE: f64 = 0.01;

/// Injectable lookup table of dividend schedules, keyed by ticker symbol.
///
/// Insertion order is part of the contract: the alert scanner reports
/// schedules in the order they were registered, so the backing store is a
/// plain Vec rather than a map.
#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    entries: Vec<DividendSchedule>,
}

impl ScheduleRepository {
    pub fn new(entries: Vec<DividendSchedule>) -> Self {
        Self { entries }
    }

    /// The built-in reference table for the four MSTR preferred series.
    ///
    /// Rates and par values come from company filings. Ex-dividend dates are
    /// hand-maintained and go stale between updates; the scanner tolerates
    /// that.
    pub fn builtin() -> Self {
        let date = |y, m, d| {
            NaiveDate::from_ymd_opt(y, m, d).expect("builtin calendar date is valid")
        };

        Self::new(vec![
            DividendSchedule {
                symbol: "STRK".to_string(),
                name: "MicroStrategy 8.00% Series A Perpetual Strike Preferred".to_string(),
                annual_rate: 8.0,
                par_value: 100.0,
                payment_frequency: PaymentFrequency::Quarterly,
                quarterly_dividend_amount: 2.00,
                last_ex_dividend_date: date(2026, 6, 15),
                next_ex_dividend_date: date(2026, 9, 15),
            },
            DividendSchedule {
                symbol: "STRF".to_string(),
                name: "MicroStrategy 10.00% Series A Perpetual Strife Preferred".to_string(),
                annual_rate: 10.0,
                par_value: 100.0,
                payment_frequency: PaymentFrequency::Quarterly,
                // Stated amount from the prospectus summary; does not match
                // annual_rate / 4 exactly. Flagged at startup, not corrected.
                quarterly_dividend_amount: 2.53,
                last_ex_dividend_date: date(2026, 6, 15),
                next_ex_dividend_date: date(2026, 9, 15),
            },
            DividendSchedule {
                symbol: "STRD".to_string(),
                name: "MicroStrategy 10.00% Series A Perpetual Stride Preferred".to_string(),
                annual_rate: 10.0,
                par_value: 100.0,
                payment_frequency: PaymentFrequency::Quarterly,
                quarterly_dividend_amount: 2.50,
                last_ex_dividend_date: date(2026, 6, 30),
                next_ex_dividend_date: date(2026, 9, 30),
            },
            DividendSchedule {
                symbol: "STRC".to_string(),
                name: "MicroStrategy 9.00% Series A Perpetual Stretch Preferred".to_string(),
                annual_rate: 9.0,
                par_value: 100.0,
                payment_frequency: PaymentFrequency::Monthly,
                // Hand-entered; the monthly payer's quarterly figure drifts
                // from rate * par / 400 as the variable rate resets.
                quarterly_dividend_amount: 2.31,
                last_ex_dividend_date: date(2026, 8, 15),
                next_ex_dividend_date: date(2026, 9, 15),
            },
        ])
    }

    pub fn get(&self, symbol: &str) -> Option<&DividendSchedule> {
        self.entries.iter().find(|s| s.symbol == symbol)
    }

    /// Lookup that never fails: unknown symbols degrade to a zero-rate,
    /// $100-par schedule so the caller renders a 0% yield instead of erroring.
    pub fn get_or_default(&self, symbol: &str) -> DividendSchedule {
        self.get(symbol).cloned().unwrap_or_else(|| DividendSchedule {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            annual_rate: 0.0,
            par_value: 100.0,
            payment_frequency: PaymentFrequency::Quarterly,
            quarterly_dividend_amount: 0.0,
            last_ex_dividend_date: NaiveDate::MIN,
            next_ex_dividend_date: NaiveDate::MIN,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &DividendSchedule> {
        self.entries.iter()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.entries.iter().map(|s| s.symbol.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Warn about records whose stated quarterly payment disagrees with the
    /// amount implied by the annual rate. The stated figure wins; this only
    /// surfaces the mismatch so someone can reconcile it against the filings.
    pub fn log_inconsistencies(&self) {
        for schedule in &self.entries {
            let implied = schedule.annual_dividend() / 4.0;
            let delta = (schedule.quarterly_dividend_amount - implied).abs();
            if delta > QUARTERLY_AMOUNT_TOLERANCE {
                warn!(
                    "{}: stated quarterly dividend ${:.2} differs from rate-implied ${:.2}",
                    schedule.symbol, schedule.quarterly_dividend_amount, implied
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_has_four_tickers() {
        let repo = ScheduleRepository::builtin();
        assert_eq!(repo.len(), 4);
        assert_eq!(repo.symbols(), vec!["STRK", "STRF", "STRD", "STRC"]);
    }

    #[test]
    fn test_get_known_symbol() {
        let repo = ScheduleRepository::builtin();
        let strk = repo.get("STRK").unwrap();
        assert!((strk.annual_rate - 8.0).abs() < 1e-9);
        assert!((strk.par_value - 100.0).abs() < 1e-9);
        assert!((strk.annual_dividend() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_symbol_degrades_to_zero_rate_default() {
        let repo = ScheduleRepository::builtin();
        assert!(repo.get("XYZ").is_none());

        let fallback = repo.get_or_default("XYZ");
        assert_eq!(fallback.symbol, "XYZ");
        assert!((fallback.annual_rate - 0.0).abs() < 1e-9);
        assert!((fallback.par_value - 100.0).abs() < 1e-9);
        assert!((fallback.annual_dividend() - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_iter_preserves_insertion_order() {
        let repo = ScheduleRepository::builtin();
        let order: Vec<&str> = repo.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(order, vec!["STRK", "STRF", "STRD", "STRC"]);
    }
}
