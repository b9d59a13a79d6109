//! Reporting utilities: the tabular projection and the chart series.

use chrono::NaiveDate;

use crate::domain::EnrichedRecord;

pub mod format;

pub use format::*;

/// One display row: `[display_date, t2m_max, t2m_min, gdd, gdd_cumulative]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub display_date: String,
    pub t2m_max: Option<f64>,
    pub t2m_min: Option<f64>,
    pub gdd: f64,
    pub gdd_cumulative: f64,
}

/// Parallel x/y sequences for the accumulated degree-day line chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub dates: Vec<NaiveDate>,
    pub gdd_cumulative: Vec<f64>,
}

impl ChartSeries {
    /// `(days since first date, value)` pairs for numeric plotting.
    pub fn points(&self) -> Vec<(f64, f64)> {
        let Some(&origin) = self.dates.first() else {
            return Vec::new();
        };
        self.dates
            .iter()
            .zip(&self.gdd_cumulative)
            .map(|(d, &y)| ((*d - origin).num_days() as f64, y))
            .collect()
    }
}

pub fn table_rows(records: &[EnrichedRecord]) -> Vec<TableRow> {
    records
        .iter()
        .map(|r| TableRow {
            display_date: r.display_date(),
            t2m_max: r.record.t2m_max,
            t2m_min: r.record.t2m_min,
            gdd: r.gdd,
            gdd_cumulative: r.gdd_cumulative,
        })
        .collect()
}

/// Chart series over the records that have a date.
pub fn chart_series(records: &[EnrichedRecord]) -> ChartSeries {
    let mut series = ChartSeries::default();
    for r in records {
        if let Some(date) = r.record.date {
            series.dates.push(date);
            series.gdd_cumulative.push(r.gdd_cumulative);
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DailyRecord;

    fn rec(date: Option<NaiveDate>, gdd: f64, cum: f64) -> EnrichedRecord {
        EnrichedRecord {
            record: DailyRecord {
                date,
                t2m_max: Some(30.0),
                t2m_min: None,
            },
            gdd,
            gdd_cumulative: cum,
        }
    }

    #[test]
    fn table_rows_keep_order_and_columns() {
        let d = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
        let rows = table_rows(&[rec(Some(d), 5.0, 5.0), rec(None, 0.0, 5.0)]);
        assert_eq!(rows[0].display_date, "01/04/2023");
        assert_eq!(rows[0].t2m_max, Some(30.0));
        assert_eq!(rows[0].t2m_min, None);
        assert_eq!(rows[1].display_date, "-");
        assert_eq!(rows[1].gdd_cumulative, 5.0);
    }

    #[test]
    fn chart_points_are_day_offsets() {
        let d0 = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2023, 4, 3).unwrap();
        let series = chart_series(&[rec(Some(d0), 1.0, 1.0), rec(None, 1.0, 2.0), rec(Some(d2), 2.0, 4.0)]);
        assert_eq!(series.dates.len(), 2);
        assert_eq!(series.points(), vec![(0.0, 1.0), (2.0, 4.0)]);
    }
}
