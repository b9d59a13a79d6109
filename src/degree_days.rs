//! Growing-degree-day derivation.
//!
//! For one day: `max(((t_max + t_min) / 2) - base, 0)`, with a missing
//! temperature counting as zero. The cumulative value is a running sum over
//! the records in the order given; callers pass them sorted by date.

use crate::domain::{DailyRecord, EnrichedRecord};

/// Degree-days contributed by a single day.
pub fn daily_gdd(record: &DailyRecord, base_temp_c: f64) -> f64 {
    let raw = match (record.t2m_max, record.t2m_min) {
        (Some(max), Some(min)) => ((max + min) / 2.0) - base_temp_c,
        _ => 0.0,
    };
    // `f64::max` also maps a NaN `raw` to 0.
    raw.max(0.0)
}

/// Attach `gdd` and `gdd_cumulative` to every record.
pub fn accumulate(records: &[DailyRecord], base_temp_c: f64) -> Vec<EnrichedRecord> {
    records
        .iter()
        .scan(0.0_f64, |total, record| {
            let gdd = daily_gdd(record, base_temp_c);
            *total += gdd;
            Some(EnrichedRecord {
                record: record.clone(),
                gdd,
                gdd_cumulative: *total,
            })
        })
        .collect()
}

/// Final accumulated value, `0` for an empty series.
pub fn total(records: &[EnrichedRecord]) -> f64 {
    records.last().map(|r| r.gdd_cumulative).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BASE_TEMP_C;

    fn day(max: Option<f64>, min: Option<f64>) -> DailyRecord {
        DailyRecord {
            date: None,
            t2m_max: max,
            t2m_min: min,
        }
    }

    fn gdds(out: &[EnrichedRecord]) -> Vec<f64> {
        out.iter().map(|r| r.gdd).collect()
    }

    fn cumulative(out: &[EnrichedRecord]) -> Vec<f64> {
        out.iter().map(|r| r.gdd_cumulative).collect()
    }

    #[test]
    fn days_at_or_below_base_contribute_nothing() {
        let records = vec![
            day(Some(25.0), Some(15.0)),
            day(Some(30.0), Some(10.0)),
            day(None, Some(18.0)),
        ];
        let out = accumulate(&records, DEFAULT_BASE_TEMP_C);
        assert_eq!(gdds(&out), vec![0.0, 0.0, 0.0]);
        assert_eq!(cumulative(&out), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn warm_days_accumulate() {
        let records = vec![day(Some(30.0), Some(20.0)), day(Some(32.0), Some(22.0))];
        let out = accumulate(&records, DEFAULT_BASE_TEMP_C);
        assert_eq!(gdds(&out), vec![5.0, 6.0]);
        assert_eq!(cumulative(&out), vec![5.0, 11.0]);
        assert_eq!(total(&out), 11.0);
    }

    #[test]
    fn cold_day_is_clamped_not_subtracted() {
        let records = vec![day(Some(30.0), Some(20.0)), day(Some(10.0), Some(0.0))];
        let out = accumulate(&records, DEFAULT_BASE_TEMP_C);
        assert_eq!(gdds(&out), vec![5.0, 0.0]);
        assert_eq!(cumulative(&out), vec![5.0, 5.0]);
    }

    #[test]
    fn missing_reading_keeps_running_total() {
        let records = vec![
            day(Some(30.0), Some(20.0)),
            day(Some(40.0), None),
            day(Some(24.0), Some(20.0)),
        ];
        let out = accumulate(&records, DEFAULT_BASE_TEMP_C);
        assert_eq!(out.len(), 3);
        assert_eq!(out[1].gdd, 0.0);
        assert_eq!(out[1].gdd_cumulative, out[0].gdd_cumulative);
        assert_eq!(cumulative(&out), vec![5.0, 5.0, 7.0]);
    }

    #[test]
    fn invariants_hold_for_mixed_series() {
        let temps = [
            (Some(31.2), Some(19.9)),
            (Some(12.0), Some(-3.5)),
            (None, None),
            (Some(35.5), Some(24.1)),
            (Some(20.0), Some(20.0)),
            (Some(28.7), None),
            (Some(33.3), Some(21.0)),
        ];
        let records: Vec<DailyRecord> = temps.iter().map(|&(max, min)| day(max, min)).collect();
        let out = accumulate(&records, DEFAULT_BASE_TEMP_C);

        assert!(out.iter().all(|r| r.gdd >= 0.0));
        assert_eq!(out[0].gdd_cumulative, out[0].gdd);
        for pair in out.windows(2) {
            assert!(pair[1].gdd_cumulative >= pair[0].gdd_cumulative);
        }
    }

    #[test]
    fn base_temperature_is_configurable() {
        let records = vec![day(Some(20.0), Some(10.0))];
        let out = accumulate(&records, 10.0);
        assert_eq!(out[0].gdd, 5.0);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(accumulate(&[], DEFAULT_BASE_TEMP_C).is_empty());
        assert_eq!(total(&[]), 0.0);
    }
}
