//! Calendar-date reconstruction from the `YEAR` / `MO` / `DY` columns.

use chrono::NaiveDate;

use crate::data::parse::ClimateTable;
use crate::domain::DISPLAY_DATE_FORMAT;
use crate::error::AppError;

pub const YEAR_COLUMN: &str = "YEAR";
pub const MONTH_COLUMN: &str = "MO";
pub const DAY_COLUMN: &str = "DY";

/// Build one date per table row.
///
/// All three columns must exist (`Schema` error otherwise). A row with a
/// missing or impossible component gets its own `DataFormat` error; the other
/// rows are unaffected.
pub fn reconstruct_dates(table: &ClimateTable) -> Result<Vec<Result<NaiveDate, AppError>>, AppError> {
    let missing: Vec<&str> = [YEAR_COLUMN, MONTH_COLUMN, DAY_COLUMN]
        .into_iter()
        .filter(|name| !table.has_column(name))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Schema(format!(
            "cannot build the date column without {}",
            missing.join(", ")
        )));
    }

    let years = table.require(YEAR_COLUMN)?;
    let months = table.require(MONTH_COLUMN)?;
    let days = table.require(DAY_COLUMN)?;

    let dates = years
        .iter()
        .zip(months)
        .zip(days)
        .enumerate()
        .map(|(idx, ((y, m), d))| match (y, m, d) {
            (Some(y), Some(m), Some(d)) => date_from_parts(*y, *m, *d).map_err(|msg| {
                AppError::DataFormat(format!("row {}: {msg}", idx + 1))
            }),
            _ => Err(AppError::DataFormat(format!(
                "row {}: year, month or day is missing",
                idx + 1
            ))),
        })
        .collect();
    Ok(dates)
}

/// Combine numeric parts into a date via the zero-padded `YYYY-MM-DD` form.
pub fn date_from_parts(year: f64, month: f64, day: f64) -> Result<NaiveDate, String> {
    let (Some(year), Some(month), Some(day)) = (whole(year), whole(month), whole(day)) else {
        return Err(format!("{year}-{month}-{day} is not made of whole numbers"));
    };
    let iso = format!("{year:04}-{month:02}-{day:02}");
    NaiveDate::parse_from_str(&iso, "%Y-%m-%d").map_err(|e| format!("invalid date '{iso}': {e}"))
}

/// `DD/MM/YYYY`.
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

fn whole(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v >= 0.0 {
        Some(v as i64)
    } else {
        None
    }
}
