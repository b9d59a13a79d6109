//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the degree-day code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::RunOutput;
use crate::config::SiteConfig;
use crate::data::ClimateTable;
use crate::data::display_date;
use crate::report::TableRow;

/// Rows shown by the structure preview.
pub const PREVIEW_ROWS: usize = 5;

/// Site, range, dataset size, total and any non-fatal warnings.
pub fn format_run_summary(run: &RunOutput, config: &SiteConfig) -> String {
    let mut out = String::new();

    out.push_str("=== gdd - accumulated degree-days ===\n");
    out.push_str(&format!(
        "Site: lat={:.6} lon={:.6} | parameters: {}\n",
        config.latitude,
        config.longitude,
        config.parameters_subset()
    ));
    out.push_str(&format!(
        "Range: {} .. {} ({} days requested)\n",
        display_date(run.range.start()),
        display_date(run.range.end()),
        run.range.num_days()
    ));
    out.push_str(&format!(
        "Rows: {} | base temperature: {:.1} °C\n",
        run.records.len(),
        config.base_temp_c
    ));
    out.push_str(&format!(
        "Accumulated: {:.2} degree-days\n",
        crate::degree_days::total(&run.records)
    ));

    for warning in &run.warnings {
        out.push_str(&format!("warning: {warning}\n"));
    }

    out
}

/// Fixed-width table of the display projection.
pub fn format_table(rows: &[TableRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<10}  {:>8}  {:>8}  {:>8}  {:>10}\n",
        "DATE", "T2M_MAX", "T2M_MIN", "GDD", "GDD_ACUM"
    ));
    for r in rows {
        out.push_str(&format!(
            "{:<10}  {:>8}  {:>8}  {:>8.2}  {:>10.2}\n",
            r.display_date,
            fmt_opt(r.t2m_max),
            fmt_opt(r.t2m_min),
            r.gdd,
            r.gdd_cumulative
        ));
    }
    out
}

/// Column list and the first rows of the parsed table, as received.
pub fn format_structure(table: &ClimateTable) -> String {
    let mut out = String::new();
    out.push_str("Dataset structure:\n");
    out.push_str(&format!("Columns: {}\n", table.columns().join(", ")));

    let header: Vec<String> = table.columns().iter().map(|c| format!("{c:>8}")).collect();
    out.push_str(&header.join(" "));
    out.push('\n');

    for idx in 0..table.row_count().min(PREVIEW_ROWS) {
        let Some(row) = table.row(idx) else { break };
        let cells: Vec<String> = row.into_iter().map(|v| format!("{:>8}", fmt_opt(v))).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string())
}
