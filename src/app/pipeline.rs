//! Shared degree-day pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate range -> fetch (cached) -> parse -> dates -> degree-days
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::NaiveDate;

use crate::config::SiteConfig;
use crate::data::{ClimateSource, ClimateTable, FetchCache, load_table, reconstruct_dates};
use crate::domain::{DailyRecord, DateRange, EnrichedRecord};
use crate::error::AppError;

pub const T2M_MAX_COLUMN: &str = "T2M_MAX";
pub const T2M_MIN_COLUMN: &str = "T2M_MIN";

/// All computed outputs of a single query.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub range: DateRange,
    pub table: ClimateTable,
    pub records: Vec<EnrichedRecord>,
    /// Non-fatal problems (date reconstruction) shown next to the results.
    pub warnings: Vec<AppError>,
}

/// Validate the dates, then fetch and compute.
///
/// A reversed range fails before `source` is touched.
pub fn run_query<S: ClimateSource + ?Sized>(
    source: &S,
    cache: &mut FetchCache,
    config: &SiteConfig,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<RunOutput, AppError> {
    let range = DateRange::new(start, end)?;
    let table = load_table(source, cache, &config.parameters_subset(), range)?;
    run_with_table(config, range, table)
}

/// Compute degree-days from an already-parsed table.
pub fn run_with_table(
    config: &SiteConfig,
    range: DateRange,
    table: ClimateTable,
) -> Result<RunOutput, AppError> {
    let t_max = table.require(T2M_MAX_COLUMN)?;
    let t_min = table.require(T2M_MIN_COLUMN)?;

    let mut warnings = Vec::new();
    let dates: Vec<Option<NaiveDate>> = match reconstruct_dates(&table) {
        Ok(dates) => dates
            .into_iter()
            .map(|date| {
                date.map_err(|err| {
                    log::debug!("{err}");
                    warnings.push(err);
                })
                .ok()
            })
            .collect(),
        Err(err) => {
            log::debug!("{err}");
            warnings.push(err);
            vec![None; table.row_count()]
        }
    };

    let mut records: Vec<DailyRecord> = dates
        .into_iter()
        .zip(t_max.iter().zip(t_min))
        .map(|(date, (&t2m_max, &t2m_min))| DailyRecord {
            date,
            t2m_max,
            t2m_min,
        })
        .collect();

    // Stable: rows that share a date keep response order.
    if records.iter().all(|r| r.date.is_some()) {
        records.sort_by_key(|r| r.date);
    }

    let records = crate::degree_days::accumulate(&records, config.base_temp_c);
    log::info!(
        "{} days, accumulated {:.2} degree-days",
        records.len(),
        crate::degree_days::total(&records)
    );

    Ok(RunOutput {
        range,
        table,
        records,
        warnings,
    })
}
