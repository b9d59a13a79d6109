//! Parsing of the POWER `format=CSV` response body.
//!
//! The body is a free-form metadata block, a literal `-END HEADER-` line, and
//! then a plain comma-separated table whose first row holds column names:
//!
//! ```text
//! -BEGIN HEADER-
//! NASA/POWER ... Daily Data
//! ...
//! -END HEADER-
//! YEAR,MO,DY,T2M_MAX,T2M_MIN
//! 2023,4,1,30.12,19.87
//! ```
//!
//! Every cell is numeric. The API writes `-999` for a missing reading; those
//! cells (and empty ones) become `None` here so nothing downstream ever sees
//! the sentinel.

use std::collections::HashMap;

use crate::error::AppError;

pub const HEADER_DELIMITER: &str = "-END HEADER-";
/// Value the API uses for "no reading".
pub const MISSING_SENTINEL: f64 = -999.0;

/// Parsed data section, stored column-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    values: Vec<Vec<Option<f64>>>,
    rows: usize,
}

impl ClimateTable {
    /// Build a table from column names and row-major values.
    ///
    /// Sentinel values are normalized to `None` on the way in.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Option<f64>>>) -> Result<Self, AppError> {
        let columns: Vec<String> = columns.into_iter().map(|c| normalize_column_name(&c)).collect();
        let mut index = HashMap::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            if name.is_empty() {
                return Err(AppError::DataFormat(format!("column {} has an empty name", idx + 1)));
            }
            if index.insert(name.clone(), idx).is_some() {
                return Err(AppError::DataFormat(format!("duplicate column `{name}`")));
            }
        }

        let mut values = vec![Vec::with_capacity(rows.len()); columns.len()];
        let n_rows = rows.len();
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(AppError::DataFormat(format!(
                    "data row {} has {} fields, expected {}",
                    row_idx + 1,
                    row.len(),
                    columns.len()
                )));
            }
            for (col, cell) in values.iter_mut().zip(row) {
                col.push(cell.filter(|v| !is_sentinel(*v)));
            }
        }

        Ok(Self {
            columns,
            index,
            values,
            rows: n_rows,
        })
    }

    /// Column names in response order (upper-cased).
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(&normalize_column_name(name))
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        let idx = *self.index.get(&normalize_column_name(name))?;
        Some(&self.values[idx])
    }

    /// Like [`ClimateTable::column`], but a missing column is a schema error.
    pub fn require(&self, name: &str) -> Result<&[Option<f64>], AppError> {
        self.column(name)
            .ok_or_else(|| AppError::Schema(format!("`{}` not found in {:?}", name, self.columns)))
    }

    /// Values of one row, in column order.
    pub fn row(&self, idx: usize) -> Option<Vec<Option<f64>>> {
        if idx >= self.rows {
            return None;
        }
        Some(self.values.iter().map(|col| col[idx]).collect())
    }
}

/// Split the response at the header delimiter and parse the data section.
pub fn parse_power_csv(body: &str) -> Result<ClimateTable, AppError> {
    let data = split_data_section(body)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::DataFormat(format!("failed to read column names: {e}")))?
        .clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(AppError::DataFormat("data section has no column names".to_string()));
    }
    let columns: Vec<String> = headers.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: line 1 of the data section is the header row.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::DataFormat(format!("data line {line}: {e}")))?;
        let mut row = Vec::with_capacity(record.len());
        for (col, cell) in columns.iter().zip(record.iter()) {
            row.push(parse_cell(cell).map_err(|msg| {
                AppError::DataFormat(format!("data line {line}, column `{col}`: {msg}"))
            })?);
        }
        rows.push(row);
    }

    ClimateTable::from_rows(columns, rows)
}

/// Everything after the first `-END HEADER-`, trimmed.
pub fn split_data_section(body: &str) -> Result<&str, AppError> {
    let (_, data) = body.split_once(HEADER_DELIMITER).ok_or_else(|| {
        AppError::DataFormat(format!("response does not contain the `{HEADER_DELIMITER}` delimiter"))
    })?;
    let data = data.trim();
    if data.is_empty() {
        return Err(AppError::DataFormat("response has no data after the header".to_string()));
    }
    Ok(data)
}

fn parse_cell(raw: &str) -> Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let v = trimmed
        .parse::<f64>()
        .map_err(|_| format!("'{trimmed}' is not a number"))?;
    if !v.is_finite() || is_sentinel(v) {
        return Ok(None);
    }
    Ok(Some(v))
}

fn is_sentinel(v: f64) -> bool {
    v == MISSING_SENTINEL
}

fn normalize_column_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "-BEGIN HEADER-\n\
NASA/POWER CERES/MERRA2 Native Resolution Daily Data\n\
Dates (month/day/year): 04/01/2023 through 04/03/2023\n\
Location: Latitude  -22.8057   Longitude -50.4813\n\
T2M_MAX     MERRA-2 Temperature at 2 Meters Maximum (C)\n\
-END HEADER-\n\
YEAR,MO,DY,T2M_MAX,T2M_MIN\n\
2023,4,1,30.12,19.87\n\
2023,4,2,-999,18.5\n\
2023,4,3,29.0,-999.0\n";

    #[test]
    fn parses_data_after_header() {
        let table = parse_power_csv(SAMPLE).unwrap();
        assert_eq!(table.columns(), ["YEAR", "MO", "DY", "T2M_MAX", "T2M_MIN"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column("T2M_MAX").unwrap()[0], Some(30.12));
        assert_eq!(table.column("mo").unwrap(), &[Some(4.0), Some(4.0), Some(4.0)]);
    }

    #[test]
    fn sentinel_becomes_missing_in_every_column() {
        let table = parse_power_csv(SAMPLE).unwrap();
        assert_eq!(table.column("T2M_MAX").unwrap()[1], None);
        assert_eq!(table.column("T2M_MIN").unwrap()[2], None);
        for name in table.columns() {
            let col = table.column(name).unwrap();
            assert!(col.iter().flatten().all(|v| *v != MISSING_SENTINEL));
        }
    }

    #[test]
    fn missing_delimiter_is_a_format_error() {
        let err = parse_power_csv("YEAR,MO,DY\n2023,4,1\n").unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
    }

    #[test]
    fn empty_data_section_is_a_format_error() {
        let err = parse_power_csv("-BEGIN HEADER-\n-END HEADER-\n\n").unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)));
    }

    #[test]
    fn ragged_row_is_a_format_error() {
        let body = "-END HEADER-\nYEAR,MO,DY\n2023,4\n";
        let err = parse_power_csv(body).unwrap_err();
        assert!(matches!(err, AppError::DataFormat(_)), "{err:?}");
    }

    #[test]
    fn non_numeric_cell_is_a_format_error() {
        let body = "-END HEADER-\nYEAR,MO,DY,T2M_MAX\n2023,4,1,hot\n";
        let err = parse_power_csv(body).unwrap_err();
        assert!(err.to_string().contains("T2M_MAX"));
    }

    #[test]
    fn require_reports_schema_error() {
        let table = parse_power_csv("-END HEADER-\nYEAR,MO,DY\n2023,4,1\n").unwrap();
        let err = table.require("T2M_MAX").unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));
    }

    #[test]
    fn header_only_table_has_no_rows() {
        let table = parse_power_csv("-END HEADER-\nYEAR,MO,DY,T2M_MAX,T2M_MIN\n").unwrap();
        assert_eq!(table.row_count(), 0);
        assert!(table.has_column("T2M_MIN"));
        assert_eq!(table.row(0), None);
    }
}
