//! Export per-day results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use crate::domain::EnrichedRecord;
use crate::error::AppError;

/// Write `date,t2m_max,t2m_min,gdd,gdd_cumulative` rows (ISO dates, empty = missing).
pub fn write_results_csv(path: &Path, records: &[EnrichedRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::Io(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record(["date", "t2m_max", "t2m_min", "gdd", "gdd_cumulative"])
        .map_err(|e| AppError::Io(format!("Failed to write export CSV header: {e}")))?;

    let temp = |v: Option<f64>| v.map(|v| format!("{v:.2}")).unwrap_or_default();
    for r in records {
        writer
            .write_record([
                r.record.date.map(|d| d.to_string()).unwrap_or_default(),
                temp(r.record.t2m_max),
                temp(r.record.t2m_min),
                format!("{:.4}", r.gdd),
                format!("{:.4}", r.gdd_cumulative),
            ])
            .map_err(|e| AppError::Io(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::Io(format!("Failed to flush export CSV '{}': {e}", path.display())))?;

    log::info!("wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::DailyRecord;

    #[test]
    fn writes_header_and_blank_missing_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gdd.csv");
        let records = vec![
            EnrichedRecord {
                record: DailyRecord {
                    date: NaiveDate::from_ymd_opt(2023, 4, 1),
                    t2m_max: Some(30.0),
                    t2m_min: Some(20.0),
                },
                gdd: 5.0,
                gdd_cumulative: 5.0,
            },
            EnrichedRecord {
                record: DailyRecord {
                    date: NaiveDate::from_ymd_opt(2023, 4, 2),
                    t2m_max: None,
                    t2m_min: Some(18.0),
                },
                gdd: 0.0,
                gdd_cumulative: 5.0,
            },
        ];

        write_results_csv(&path, &records).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "date,t2m_max,t2m_min,gdd,gdd_cumulative\n\
2023-04-01,30.00,20.00,5.0000,5.0000\n\
2023-04-02,,18.00,0.0000,5.0000\n"
        );
    }

    #[test]
    fn undated_rows_export_with_a_blank_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gdd.csv");
        let records = vec![EnrichedRecord {
            record: DailyRecord {
                date: None,
                t2m_max: Some(30.0),
                t2m_min: Some(20.0),
            },
            gdd: 5.0,
            gdd_cumulative: 5.0,
        }];

        write_results_csv(&path, &records).unwrap();
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "");
        assert_eq!(&rows[0][4], "5.0000");
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("gdd.csv");
        let err = write_results_csv(&path, &[]).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
