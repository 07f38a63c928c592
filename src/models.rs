// src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a preferred series pays its dividend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Monthly,
    Quarterly,
}

/// Static reference data for one preferred-stock series.
///
/// The ex-dividend dates are hand-maintained calendar entries, not derived
/// from `payment_frequency`. A stale `next_ex_dividend_date` shows up as a
/// negative day count in the alert scanner and simply produces no alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendSchedule {
    pub symbol: String,
    pub name: String,
    /// Annual dividend rate as a percentage of par (9.0 means 9%).
    pub annual_rate: f64,
    pub par_value: f64,
    pub payment_frequency: PaymentFrequency,
    /// Stated per-quarter payment. Kept as entered; may disagree with
    /// `annual_rate * par_value / 400` (see ScheduleRepository::log_inconsistencies).
    pub quarterly_dividend_amount: f64,
    pub last_ex_dividend_date: NaiveDate,
    pub next_ex_dividend_date: NaiveDate,
}

impl DividendSchedule {
    /// Annual dividend in dollars: par value times the stated rate.
    pub fn annual_dividend(&self) -> f64 {
        self.par_value * (self.annual_rate / 100.0)
    }

    /// Dollar amount of a single payment at this schedule's frequency.
    pub fn payment_amount(&self) -> f64 {
        match self.payment_frequency {
            PaymentFrequency::Quarterly => self.quarterly_dividend_amount,
            PaymentFrequency::Monthly => self.annual_dividend() / 12.0,
        }
    }
}

/// One daily OHLCV bar as supplied by the market-data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Price history for one ticker, tagged with where it came from.
///
/// The quote fetcher never surfaces an error: on any fetch failure it
/// substitutes a synthetic series and says so, so the presentation layer can
/// label the data instead of silently charting noise.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum DataSourceResult {
    Live { series: Vec<PriceBar> },
    Synthetic { series: Vec<PriceBar>, reason: String },
}

impl DataSourceResult {
    pub fn series(&self) -> &[PriceBar] {
        match self {
            DataSourceResult::Live { series } => series,
            DataSourceResult::Synthetic { series, .. } => series,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, DataSourceResult::Synthetic { .. })
    }

    pub fn synthetic_reason(&self) -> Option<&str> {
        match self {
            DataSourceResult::Live { .. } => None,
            DataSourceResult::Synthetic { reason, .. } => Some(reason.as_str()),
        }
    }
}

/// Point-in-time yield figures for one ticker, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldMetrics {
    pub current_price: f64,
    /// Annual dividend over current price, as a percentage. Zero when the
    /// latest close is not a valid price.
    pub current_yield: f64,
    pub annual_dividend: f64,
    pub par_value: f64,
    /// The stated rate: the yield realized buying exactly at par.
    pub yield_at_par: f64,
    /// Percentage deviation of the current price from par.
    pub premium_discount_pct: f64,
}

/// One point of a historical-yield series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldPoint {
    pub date: NaiveDate,
    pub yield_pct: f64,
}

/// An upcoming ex-dividend date within the scanner's lookahead window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExDividendAlert {
    pub symbol: String,
    pub ex_dividend_date: NaiveDate,
    /// Days from today to the ex-dividend date; 0 means today.
    pub days_until: i64,
    pub dividend_amount: f64,
}

/// Supported history lookback windows for the quote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookbackPeriod {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl LookbackPeriod {
    /// The range token Yahoo's chart API expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            LookbackPeriod::OneDay => "1d",
            LookbackPeriod::FiveDays => "5d",
            LookbackPeriod::OneMonth => "1mo",
            LookbackPeriod::ThreeMonths => "3mo",
            LookbackPeriod::SixMonths => "6mo",
            LookbackPeriod::OneYear => "1y",
        }
    }

    /// Approximate calendar-day span, used to size synthetic series.
    pub fn days(&self) -> i64 {
        match self {
            LookbackPeriod::OneDay => 1,
            LookbackPeriod::FiveDays => 5,
            LookbackPeriod::OneMonth => 30,
            LookbackPeriod::ThreeMonths => 90,
            LookbackPeriod::SixMonths => 180,
            LookbackPeriod::OneYear => 365,
        }
    }
}

impl Default for LookbackPeriod {
    fn default() -> Self {
        LookbackPeriod::OneMonth
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookbackPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(LookbackPeriod::OneDay),
            "5d" => Ok(LookbackPeriod::FiveDays),
            "1mo" => Ok(LookbackPeriod::OneMonth),
            "3mo" => Ok(LookbackPeriod::ThreeMonths),
            "6mo" => Ok(LookbackPeriod::SixMonths),
            "1y" => Ok(LookbackPeriod::OneYear),
            other => Err(format!("unsupported period '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_round_trip() {
        for s in ["1d", "5d", "1mo", "3mo", "6mo", "1y"] {
            let period: LookbackPeriod = s.parse().unwrap();
            assert_eq!(period.as_str(), s);
        }
        assert!("2y".parse::<LookbackPeriod>().is_err());
    }

    #[test]
    fn test_payment_amount_by_frequency() {
        let mut schedule = DividendSchedule {
            symbol: "STRK".to_string(),
            name: "Series A".to_string(),
            annual_rate: 8.0,
            par_value: 100.0,
            payment_frequency: PaymentFrequency::Quarterly,
            quarterly_dividend_amount: 2.0,
            last_ex_dividend_date: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            next_ex_dividend_date: NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
        };
        assert!((schedule.payment_amount() - 2.0).abs() < 1e-9);

        schedule.payment_frequency = PaymentFrequency::Monthly;
        schedule.annual_rate = 9.0;
        assert!((schedule.payment_amount() - 0.75).abs() < 1e-9);
    }
}
