//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while computing degree-days
//! - exported to JSON/CSV
//! - reloaded later for plotting

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Date format used on the wire (`start`/`end` query fields).
pub const API_DATE_FORMAT: &str = "%Y%m%d";
/// Date format shown to the user in tables and chart labels.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Inclusive query window. Construction guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::InputValidation(format!(
                "The start date ({}) must not be after the end date ({}).",
                start.format(DISPLAY_DATE_FORMAT),
                end.format(DISPLAY_DATE_FORMAT),
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// One calendar day of normalized temperature readings (°C).
///
/// `date` is `None` only when the date columns could not be reconstructed;
/// the row is still shown and still contributes to the running total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: Option<NaiveDate>,
    pub t2m_max: Option<f64>,
    pub t2m_min: Option<f64>,
}

/// A day plus its derived degree-days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: DailyRecord,
    /// Degree-days contributed by this day, never negative.
    pub gdd: f64,
    /// Running sum of `gdd` from the first record through this one.
    pub gdd_cumulative: f64,
}

impl EnrichedRecord {
    /// `DD/MM/YYYY`, or `-` when the date is unknown.
    pub fn display_date(&self) -> String {
        self.record
            .date
            .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_rejects_reversed_dates() {
        let err = DateRange::new(ymd(2024, 7, 9), ymd(2023, 4, 1)).unwrap_err();
        assert!(matches!(err, AppError::InputValidation(_)));
    }

    #[test]
    fn single_day_range_is_valid() {
        let range = DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 1)).unwrap();
        assert_eq!(range.num_days(), 1);
    }

    #[test]
    fn display_date_pads_day_and_month() {
        let rec = EnrichedRecord {
            record: DailyRecord {
                date: Some(ymd(2024, 12, 9)),
                t2m_max: None,
                t2m_min: None,
            },
            gdd: 0.0,
            gdd_cumulative: 0.0,
        };
        assert_eq!(rec.display_date(), "09/12/2024");
    }
}
