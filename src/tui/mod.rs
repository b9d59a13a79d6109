//! Ratatui-based terminal UI.
//!
//! The TUI provides start/end date fields, renders the accumulated degree-day
//! chart, and shows the per-day table. Errors are shown inline in the footer;
//! they never close the UI.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Row, Table},
};

use crate::app::pipeline::{self, RunOutput};
use crate::config::SiteConfig;
use crate::data::{CacheKey, FetchCache, PowerClient, display_date};
use crate::domain::DateRange;
use crate::error::AppError;
use crate::plot::ascii::{X_LABEL, Y_LABEL};
use crate::report::{TableRow, chart_series, table_rows};

mod plotters_chart;

use plotters_chart::GddPlottersChart;

const FIELD_START: usize = 0;
const FIELD_END: usize = 1;
const PAGE: usize = 10;

/// Start the TUI.
pub fn run(config: SiteConfig, start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    let client = PowerClient::new(config.clone())?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::Terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, client, start, end);
    app.refresh();
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
///
/// Logging is muted while the guard lives: stderr shares the tty with the
/// alternate screen, so any log line would land on top of the frame.
struct TerminalGuard {
    _log: MutedLog,
}

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::Terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::Terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self { _log: MutedLog::new() })
    }
}

/// Turns the global log filter off, restoring the previous level on drop.
struct MutedLog {
    previous: log::LevelFilter,
}

impl MutedLog {
    fn new() -> Self {
        let previous = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        Self { previous }
    }
}

impl Drop for MutedLog {
    fn drop(&mut self) {
        log::set_max_level(self.previous);
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: SiteConfig,
    client: PowerClient,
    cache: FetchCache,
    start: NaiveDate,
    end: NaiveDate,
    selected_field: usize,
    editing: bool,
    date_input: String,
    table_offset: usize,
    status: String,
    error: Option<AppError>,
    run: Option<RunOutput>,
}

impl App {
    fn new(config: SiteConfig, client: PowerClient, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            config,
            client,
            cache: FetchCache::new(),
            start,
            end,
            selected_field: FIELD_START,
            editing: false,
            date_input: String::new(),
            table_offset: 0,
            status: String::new(),
            error: None,
            run: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::Terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::Terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::Terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing {
            self.handle_date_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected_field = FIELD_START,
            KeyCode::Down => self.selected_field = FIELD_END,
            KeyCode::Left => self.shift_selected(-1),
            KeyCode::Right => self.shift_selected(1),
            KeyCode::Enter => {
                self.editing = true;
                self.date_input = self.selected_date().format("%Y-%m-%d").to_string();
                self.status = "Editing date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string();
            }
            KeyCode::Char('r') => {
                if let Ok(range) = DateRange::new(self.start, self.end) {
                    self.cache
                        .invalidate(&CacheKey::new(self.config.parameters_subset(), range));
                }
                self.refresh();
            }
            KeyCode::Char('c') => {
                self.cache.clear();
                self.status = "Cache cleared.".to_string();
            }
            KeyCode::PageDown | KeyCode::Char('j') => {
                self.table_offset = self.table_offset.saturating_add(PAGE).min(self.max_offset());
            }
            KeyCode::PageUp | KeyCode::Char('k') => {
                self.table_offset = self.table_offset.saturating_sub(PAGE);
            }
            KeyCode::Home => self.table_offset = 0,
            KeyCode::End => self.table_offset = self.max_offset(),
            _ => {}
        }

        false
    }

    fn handle_date_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                self.apply_date_input();
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' {
                    self.date_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn selected_date(&self) -> NaiveDate {
        if self.selected_field == FIELD_START { self.start } else { self.end }
    }

    fn set_selected_date(&mut self, date: NaiveDate) {
        if self.selected_field == FIELD_START {
            self.start = date;
        } else {
            self.end = date;
        }
    }

    fn shift_selected(&mut self, days: i64) {
        let Some(date) = self
            .selected_date()
            .checked_add_signed(chrono::Duration::days(days))
        else {
            return;
        };
        self.set_selected_date(date);
        self.refresh();
    }

    fn apply_date_input(&mut self) {
        let trimmed = self.date_input.trim();
        match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => {
                self.set_selected_date(date);
                self.refresh();
            }
            Err(e) => {
                self.status = format!("Invalid date '{trimmed}': {e}");
            }
        }
    }

    /// Re-run the pipeline for the current range. Failures stay on screen.
    fn refresh(&mut self) {
        let fetches_before = self.cache.misses();
        match pipeline::run_query(&self.client, &mut self.cache, &self.config, self.start, self.end) {
            Ok(run) => {
                let cached = self.cache.misses() == fetches_before;
                self.status = format!(
                    "{} days loaded{} | cache: {} entries, {} hits",
                    run.records.len(),
                    if cached { " (cached)" } else { "" },
                    self.cache.len(),
                    self.cache.hits(),
                );
                self.table_offset = 0;
                self.error = None;
                self.run = Some(run);
            }
            Err(err) => {
                log::debug!("refresh failed: {err}");
                self.status = String::new();
                self.error = Some(err);
                self.run = None;
            }
        }
    }

    fn max_offset(&self) -> usize {
        self.run
            .as_ref()
            .map(|r| r.records.len().saturating_sub(1))
            .unwrap_or(0)
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("gdd", Style::default().fg(Color::Cyan)),
            Span::raw(" - accumulated degree-days"),
        ]));

        let total = self
            .run
            .as_ref()
            .map(|r| format!("{:.2}", crate::degree_days::total(&r.records)))
            .unwrap_or_else(|| "-".to_string());
        let n = self.run.as_ref().map(|r| r.records.len()).unwrap_or(0);

        lines.push(Line::from(Span::styled(
            format!(
                "lat {:.4} lon {:.4} | base {:.1} °C | {} .. {} | n={n} | total={total}",
                self.config.latitude,
                self.config.longitude,
                self.config.base_temp_c,
                display_date(self.start),
                display_date(self.end),
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(12)])
            .split(area);

        self.draw_chart(frame, chunks[0]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(28), Constraint::Min(0)])
            .split(chunks[1]);

        self.draw_settings(frame, bottom[0]);
        self.draw_table(frame, bottom[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Accumulated degree-days over time")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let series = self
            .run
            .as_ref()
            .map(|r| chart_series(&r.records))
            .unwrap_or_default();

        let Some(&origin) = series.dates.first() else {
            let msg = if self.error.is_some() { "No data." } else { "Waiting for data..." };
            frame.render_widget(Paragraph::new(msg).style(Style::default().fg(Color::Yellow)), inner);
            return;
        };

        let points = series.points();
        let (x_bounds, y_bounds) = chart_bounds(&points);
        let widget = GddPlottersChart {
            points: &points,
            origin,
            x_bounds,
            y_bounds,
            x_label: X_LABEL,
            y_label: Y_LABEL,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let field = |idx: usize, label: &str, date: NaiveDate| {
            if self.editing && self.selected_field == idx {
                ListItem::new(format!("{label}: {}_", self.date_input))
            } else {
                ListItem::new(format!("{label}: {}", display_date(date)))
            }
        };
        let items = vec![field(FIELD_START, "Start", self.start), field(FIELD_END, "End", self.end)];

        let list = List::new(items)
            .block(Block::default().title("Range").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Data").borders(Borders::ALL);
        let Some(run) = &self.run else {
            frame.render_widget(Paragraph::new("").block(block), area);
            return;
        };

        let visible = area.height.saturating_sub(3) as usize;
        let rows = table_rows(&run.records);
        let shown = rows
            .iter()
            .skip(self.table_offset)
            .take(visible)
            .map(table_row);

        let header = Row::new(["DATE", "T2M_MAX", "T2M_MIN", "GDD", "GDD_ACUM"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let widths = [
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
        ];
        let table = Table::new(shown, widths).header(header).block(block);
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ field  ←/→ ±1 day  Enter edit  r refetch  c clear cache  PgUp/PgDn scroll  q quit";
        let mut spans = vec![Span::styled(help, Style::default().fg(Color::Gray)), Span::raw(" | ")];

        if let Some(err) = &self.error {
            spans.push(Span::styled(err.to_string(), Style::default().fg(Color::Red)));
        } else {
            spans.push(Span::styled(&self.status, Style::default().fg(Color::Yellow)));
            if let Some(run) = &self.run {
                for warning in &run.warnings {
                    spans.push(Span::raw(" | "));
                    spans.push(Span::styled(warning.to_string(), Style::default().fg(Color::Red)));
                }
            }
        }

        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn table_row(r: &TableRow) -> Row<'static> {
    let opt = |v: Option<f64>| v.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string());
    Row::new(vec![
        r.display_date.clone(),
        opt(r.t2m_max),
        opt(r.t2m_min),
        format!("{:.2}", r.gdd),
        format!("{:.2}", r.gdd_cumulative),
    ])
}

/// X/Y bounds with a little headroom; degenerate ranges are widened.
fn chart_bounds(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let x_max = points.last().map(|&(x, _)| x).unwrap_or(0.0);
    let x_bounds = if x_max > 0.0 { [0.0, x_max] } else { [0.0, 1.0] };

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in points {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    (x_bounds, [y_min - pad, y_max + pad])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muted_log_restores_previous_level() {
        log::set_max_level(log::LevelFilter::Warn);
        {
            let _muted = MutedLog::new();
            assert_eq!(log::max_level(), log::LevelFilter::Off);
        }
        assert_eq!(log::max_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn clear_key_empties_the_cache_without_fetching() {
        let config = SiteConfig::default();
        let client = PowerClient::new(config.clone()).unwrap();
        let start = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 4, 2).unwrap();
        let mut app = App::new(config, client, start, end);

        let table = crate::data::parse_power_csv("-END HEADER-\nT2M_MAX,T2M_MIN\n30,20\n").unwrap();
        let range = DateRange::new(start, end).unwrap();
        app.cache.insert(CacheKey::new("T2M_MAX,T2M_MIN", range), table);

        assert!(!app.handle_key(KeyCode::Char('c')));
        assert!(app.cache.is_empty());
        assert_eq!(app.status, "Cache cleared.");
    }

    #[test]
    fn flat_series_still_gets_a_y_span() {
        let (x, y) = chart_bounds(&[(0.0, 0.0), (3.0, 0.0)]);
        assert_eq!(x, [0.0, 3.0]);
        assert!(y[1] > y[0]);
    }

    #[test]
    fn single_point_gets_an_x_span() {
        let (x, _) = chart_bounds(&[(0.0, 4.0)]);
        assert_eq!(x, [0.0, 1.0]);
    }
}
