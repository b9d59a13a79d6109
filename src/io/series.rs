//! Read/write result JSON files.
//!
//! A result file is the portable form of one run: the site, the date range,
//! the base temperature and every enriched day. `gdd plot` re-renders the
//! chart from it without touching the network.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::app::pipeline::RunOutput;
use crate::config::SiteConfig;
use crate::domain::EnrichedRecord;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesFile {
    pub tool: String,
    pub latitude: f64,
    pub longitude: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub base_temp_c: f64,
    pub records: Vec<EnrichedRecord>,
}

impl SeriesFile {
    pub fn from_run(run: &RunOutput, config: &SiteConfig) -> Self {
        Self {
            tool: "gdd".to_string(),
            latitude: config.latitude,
            longitude: config.longitude,
            start: run.range.start(),
            end: run.range.end(),
            base_temp_c: config.base_temp_c,
            records: run.records.clone(),
        }
    }
}

/// Write a result JSON file.
pub fn write_series_json(path: &Path, series: &SeriesFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::Io(format!("Failed to create result JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, series)
        .map_err(|e| AppError::Io(format!("Failed to write result JSON: {e}")))?;

    Ok(())
}

/// Read a result JSON file.
pub fn read_series_json(path: &Path) -> Result<SeriesFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::Io(format!("Failed to open result JSON '{}': {e}", path.display())))?;
    let series: SeriesFile = serde_json::from_reader(file)
        .map_err(|e| AppError::DataFormat(format!("Invalid result JSON: {e}")))?;
    Ok(series)
}
