// src/services/yields.rs
//
// Yield math for preferred series: annual dividend over market price. Pure
// functions of the price series and the schedule; every refresh recomputes
// from scratch.

use crate::models::{DividendSchedule, PriceBar, YieldMetrics, YieldPoint};

/// Compute point-in-time yield figures from the latest close.
///
/// Returns `None` when the series is empty (the ticker had no data this
/// cycle). A latest close of zero or below yields a metrics record with
/// `current_yield` forced to 0 rather than a NaN/Inf from the division.
pub fn compute_current_yield(
    series: &[PriceBar],
    schedule: &DividendSchedule,
) -> Option<YieldMetrics> {
    let last = series.last()?;
    let current_price = last.close;
    let annual_dividend = schedule.annual_dividend();

    let current_yield = if current_price > 0.0 {
        (annual_dividend / current_price) * 100.0
    } else {
        0.0
    };

    Some(YieldMetrics {
        current_price,
        current_yield,
        annual_dividend,
        par_value: schedule.par_value,
        yield_at_par: schedule.annual_rate,
        premium_discount_pct: (current_price / schedule.par_value - 1.0) * 100.0,
    })
}

/// Compute the yield series over the full price history.
///
/// Bars whose close is not a valid price (zero or negative sentinel) are
/// dropped from the output entirely, unlike the point-in-time computation
/// which reports a zero yield for them. Order follows the input.
pub fn compute_historical_yield(
    series: &[PriceBar],
    schedule: &DividendSchedule,
) -> Vec<YieldPoint> {
    let annual_dividend = schedule.annual_dividend();

    series
        .iter()
        .filter(|bar| bar.close > 0.0)
        .map(|bar| YieldPoint {
            date: bar.date,
            yield_pct: (annual_dividend / bar.close) * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentFrequency;
    use chrono::NaiveDate;

    const TOLERANCE: f64 = 1e-9;

    fn schedule(rate: f64, par: f64) -> DividendSchedule {
        DividendSchedule {
            symbol: "STRK".to_string(),
            name: "Test Series".to_string(),
            annual_rate: rate,
            par_value: par,
            payment_frequency: PaymentFrequency::Quarterly,
            quarterly_dividend_amount: rate * par / 400.0,
            last_ex_dividend_date: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            next_ex_dividend_date: NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
        }
    }

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn test_current_yield_at_premium() {
        let metrics = compute_current_yield(&[bar(1, 114.91)], &schedule(8.0, 100.0)).unwrap();

        assert!((metrics.annual_dividend - 8.0).abs() < TOLERANCE);
        assert!((metrics.current_yield - 8.0 / 114.91 * 100.0).abs() < TOLERANCE);
        assert!((metrics.current_yield - 6.96).abs() < 0.005);
        assert!((metrics.premium_discount_pct - 14.91).abs() < TOLERANCE);
        assert!((metrics.yield_at_par - 8.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_current_yield_at_deep_discount() {
        let metrics = compute_current_yield(&[bar(1, 25.0)], &schedule(10.0, 100.0)).unwrap();

        assert!((metrics.annual_dividend - 10.0).abs() < TOLERANCE);
        assert!((metrics.current_yield - 40.0).abs() < TOLERANCE);
        assert!((metrics.premium_discount_pct + 75.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_empty_series_is_no_data() {
        assert!(compute_current_yield(&[], &schedule(8.0, 100.0)).is_none());
    }

    #[test]
    fn test_zero_close_guards_division() {
        let metrics = compute_current_yield(&[bar(1, 0.0)], &schedule(8.0, 100.0)).unwrap();

        assert_eq!(metrics.current_yield, 0.0);
        assert!(metrics.current_yield.is_finite());
        assert!((metrics.annual_dividend - 8.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_current_yield_uses_last_bar() {
        let series = vec![bar(1, 50.0), bar(2, 80.0), bar(3, 100.0)];
        let metrics = compute_current_yield(&series, &schedule(8.0, 100.0)).unwrap();

        assert!((metrics.current_price - 100.0).abs() < TOLERANCE);
        assert!((metrics.current_yield - 8.0).abs() < TOLERANCE);
        assert!((metrics.premium_discount_pct - 0.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_zero_rate_fallback_schedule_yields_zero() {
        let metrics = compute_current_yield(&[bar(1, 50.0)], &schedule(0.0, 100.0)).unwrap();
        assert!((metrics.current_yield - 0.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_historical_yield_per_point() {
        let series = vec![bar(1, 100.0), bar(2, 80.0), bar(3, 50.0)];
        let points = compute_historical_yield(&series, &schedule(8.0, 100.0));

        assert_eq!(points.len(), 3);
        assert!((points[0].yield_pct - 8.0).abs() < TOLERANCE);
        assert!((points[1].yield_pct - 10.0).abs() < TOLERANCE);
        assert!((points[2].yield_pct - 16.0).abs() < TOLERANCE);
        assert_eq!(points[0].date, series[0].date);
        assert_eq!(points[2].date, series[2].date);
    }

    #[test]
    fn test_historical_yield_drops_zero_closes() {
        let series = vec![bar(1, 100.0), bar(2, 0.0), bar(3, 50.0), bar(4, 0.0)];
        let points = compute_historical_yield(&series, &schedule(8.0, 100.0));

        assert_eq!(points.len(), series.len() - 2);
        assert_eq!(points[0].date, series[0].date);
        assert_eq!(points[1].date, series[2].date);
        assert!(points.iter().all(|p| p.yield_pct.is_finite()));
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let series = vec![bar(1, 114.91), bar(2, 0.0), bar(3, 97.3)];
        let sched = schedule(8.0, 100.0);

        assert_eq!(
            compute_current_yield(&series, &sched),
            compute_current_yield(&series, &sched)
        );
        assert_eq!(
            compute_historical_yield(&series, &sched),
            compute_historical_yield(&series, &sched)
        );
    }
}
