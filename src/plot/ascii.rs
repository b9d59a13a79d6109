//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - one marker per day: `o`
//! - segments between consecutive days: `-`

use crate::data::display_date;
use crate::report::ChartSeries;

pub const X_LABEL: &str = "date";
pub const Y_LABEL: &str = "accumulated degree-days";

/// Render the accumulated degree-day series.
pub fn render_ascii_chart(series: &ChartSeries, width: usize, height: usize) -> String {
    let (Some(first), Some(last)) = (series.dates.first(), series.dates.last()) else {
        return "Plot: no dated rows to chart\n".to_string();
    };

    let width = width.max(10);
    let height = height.max(5);

    let points = series.points();
    let x_max = points.last().map(|&(x, _)| x).unwrap_or(0.0);
    let (x_min, x_max) = if x_max > 0.0 { (0.0, x_max) } else { (0.0, 1.0) };

    let (y_min, y_max) = y_range(&points);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    let cells: Vec<(usize, usize)> = points
        .iter()
        .map(|&(x, y)| (map_x(x, x_min, x_max, width), map_y(y, y_min, y_max, height)))
        .collect();

    // Segments first so markers overlay them.
    for pair in cells.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        draw_line(&mut grid, x0, y0, x1, y1, '-');
    }
    for &(x, y) in &cells {
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {X_LABEL}=[{}, {}] | {Y_LABEL}=[{y_min:.2}, {y_max:.2}]\n",
        display_date(*first),
        display_date(*last),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn y_range(points: &[(f64, f64)]) -> (f64, f64) {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if !(min_y.is_finite() && max_y.is_finite()) {
        return (0.0, 1.0);
    }
    if max_y > min_y {
        (min_y, max_y)
    } else {
        // Flat series (e.g. a cold period): centre it.
        (min_y - 1.0, max_y + 1.0)
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let d0 = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
        let series = ChartSeries {
            dates: vec![d0, d0 + Duration::days(4), d0 + Duration::days(9)],
            gdd_cumulative: vec![0.0, 2.0, 10.0],
        };

        let txt = render_ascii_chart(&series, 10, 5);
        let expected = concat!(
            "Plot: date=[01/04/2023, 10/04/2023] | accumulated degree-days=[-0.50, 10.50]\n",
            "         o\n",
            "       -- \n",
            "     --   \n",
            "  --o     \n",
            "o-        \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_renders_a_notice() {
        let txt = render_ascii_chart(&ChartSeries::default(), 40, 10);
        assert_eq!(txt, "Plot: no dated rows to chart\n");
    }

    #[test]
    fn single_point_does_not_panic() {
        let d0 = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
        let series = ChartSeries {
            dates: vec![d0],
            gdd_cumulative: vec![0.0],
        };
        let txt = render_ascii_chart(&series, 12, 6);
        assert_eq!(txt.lines().count(), 7);
        let markers: usize = txt.lines().skip(1).map(|l| l.matches('o').count()).sum();
        assert_eq!(markers, 1);
    }
}
