//! Ratatui-based terminal dashboard.
//!
//! The TUI provides a settings panel for choosing countries, indicators and
//! a date range, renders one chart per indicator with one line per country,
//! and keeps a session-only list of theory-tagged notes. Provenance (real
//! vs synthetic data) is always visible in the legends and the status line.

use std::io;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Utc};
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
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::{ViewOutput, run_view};
use crate::cli::TuiArgs;
use crate::compare::ComparisonTable;
use crate::data::ProviderAdapter;
use crate::domain::{EventEntry, Note, TheoryTag, ViewConfig};
use crate::error::AppError;
use crate::registry::Registries;

mod plotters_chart;

use plotters_chart::{ChartSeries, MacroChart};

/// Legend colors, index-aligned with the Plotters palette in
/// `plotters_chart::PALETTE`.
const LEGEND_COLORS: [Color; 4] = [Color::Cyan, Color::Green, Color::Magenta, Color::Yellow];

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let registries = Registries::new();

    // Validate the initial selection before touching the terminal so a bad
    // key fails with a readable error instead of inside the alternate screen.
    registries.countries.lookup(&args.country)?;
    registries.countries.lookup(&args.versus)?;
    registries.indicators.lookup(&args.indicator)?;
    registries.indicators.lookup(&args.second_indicator)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(&registries, args);
    app.refresh();
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Charts,
    Compare,
    Events,
    Notes,
}

impl Tab {
    fn next(self) -> Tab {
        match self {
            Tab::Charts => Tab::Compare,
            Tab::Compare => Tab::Events,
            Tab::Events => Tab::Notes,
            Tab::Notes => Tab::Charts,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Charts => "Charts",
            Tab::Compare => "Compare",
            Tab::Events => "Events",
            Tab::Notes => "Notes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditMode {
    None,
    StartDate,
    EndDate,
    Note,
    Event,
}

/// In-progress event entry: date, free-form tag, short note. `field`
/// selects which of the three receives keystrokes.
#[derive(Debug, Clone, Default)]
struct EventDraft {
    date: String,
    tag: String,
    text: String,
    field: usize,
}

impl EventDraft {
    fn active_mut(&mut self) -> &mut String {
        match self.field {
            0 => &mut self.date,
            1 => &mut self.tag,
            _ => &mut self.text,
        }
    }
}

/// Settings list rows, top to bottom.
const FIELD_PRIMARY: usize = 0;
const FIELD_COMPARE: usize = 1;
const FIELD_INDICATOR: usize = 2;
const FIELD_SECOND: usize = 3;
const FIELD_START: usize = 4;
const FIELD_END: usize = 5;
const FIELD_COUNT: usize = 6;

struct App<'a> {
    registries: &'a Registries,
    adapter: ProviderAdapter<'a>,
    config: ViewConfig,
    view: Option<ViewOutput>,
    tab: Tab,
    selected_field: usize,
    edit: EditMode,
    date_input: String,
    note_draft: String,
    note_tag: TheoryTag,
    notes: Vec<Note>,
    event_draft: EventDraft,
    events: Vec<EventEntry>,
    status: String,
}

impl<'a> App<'a> {
    fn new(registries: &'a Registries, args: TuiArgs) -> Self {
        let (start, end) = crate::app::resolve_range(args.start, args.end);
        let config = ViewConfig {
            primary: args.country,
            compare: args.versus,
            indicator: args.indicator,
            second_indicator: args.second_indicator,
            start,
            end,
        };
        Self {
            registries,
            adapter: ProviderAdapter::new(registries),
            config,
            view: None,
            tab: Tab::Charts,
            selected_field: 0,
            edit: EditMode::None,
            date_input: String::new(),
            note_draft: String::new(),
            note_tag: TheoryTag::AdAs,
            notes: Vec::new(),
            event_draft: EventDraft::default(),
            events: Vec::new(),
            status: "Fetching data...".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
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

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match self.edit {
            EditMode::StartDate | EditMode::EndDate => {
                self.handle_date_edit(code);
                return false;
            }
            EditMode::Note => {
                self.handle_note_edit(code);
                return false;
            }
            EditMode::Event => {
                self.handle_event_edit(code);
                return false;
            }
            EditMode::None => {}
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab => {
                self.tab = self.tab.next();
                self.status = format!("{} tab", self.tab.title());
            }
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < FIELD_COUNT - 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => match self.selected_field {
                FIELD_START => {
                    self.edit = EditMode::StartDate;
                    self.date_input = self.config.start.to_string();
                    self.status =
                        "Editing start date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string();
                }
                FIELD_END => {
                    self.edit = EditMode::EndDate;
                    self.date_input = self.config.end.to_string();
                    self.status =
                        "Editing end date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string();
                }
                _ => {}
            },
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('n') => {
                self.edit = EditMode::Note;
                self.status =
                    "New note: type text, Tab cycles theory tag, Enter saves, Esc cancels."
                        .to_string();
            }
            KeyCode::Char('e') => {
                self.edit = EditMode::Event;
                self.event_draft = EventDraft {
                    date: self.config.end.to_string(),
                    ..EventDraft::default()
                };
                self.status =
                    "New event: Tab switches date/tag/note, Enter saves, Esc cancels.".to_string();
            }
            _ => {}
        }

        false
    }

    fn handle_date_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.edit = EditMode::None;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
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

    fn handle_note_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.edit = EditMode::None;
                self.note_draft.clear();
                self.status = "Note discarded.".to_string();
            }
            KeyCode::Tab => {
                self.note_tag = self.note_tag.next();
            }
            KeyCode::BackTab => {
                self.note_tag = self.note_tag.prev();
            }
            KeyCode::Enter => {
                let text = self.note_draft.trim().to_string();
                if text.is_empty() {
                    self.status = "Empty note not saved.".to_string();
                } else {
                    self.notes.push(Note {
                        saved_at: Utc::now(),
                        tag: self.note_tag,
                        text,
                    });
                    self.status = format!("Note saved ({} total).", self.notes.len());
                    self.tab = Tab::Notes;
                }
                self.edit = EditMode::None;
                self.note_draft.clear();
            }
            KeyCode::Backspace => {
                self.note_draft.pop();
            }
            KeyCode::Char(c) => {
                self.note_draft.push(c);
            }
            _ => {}
        }
    }

    fn handle_event_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.edit = EditMode::None;
                self.event_draft = EventDraft::default();
                self.status = "Event discarded.".to_string();
            }
            KeyCode::Tab => {
                self.event_draft.field = (self.event_draft.field + 1) % 3;
            }
            KeyCode::Enter => {
                let date = match NaiveDate::parse_from_str(self.event_draft.date.trim(), "%Y-%m-%d")
                {
                    Ok(d) => d,
                    Err(e) => {
                        self.status =
                            format!("Invalid event date '{}': {e}", self.event_draft.date.trim());
                        return;
                    }
                };
                let tag = self.event_draft.tag.trim();
                let tag = if tag.is_empty() { "—" } else { tag };
                // Newest first, as the list is read top-down.
                self.events.insert(
                    0,
                    EventEntry {
                        date,
                        tag: tag.to_string(),
                        text: self.event_draft.text.trim().to_string(),
                    },
                );
                self.status = format!("Event added ({} total).", self.events.len());
                self.edit = EditMode::None;
                self.event_draft = EventDraft::default();
                self.tab = Tab::Events;
            }
            KeyCode::Backspace => {
                self.event_draft.active_mut().pop();
            }
            KeyCode::Char(c) => {
                self.event_draft.active_mut().push(c);
            }
            _ => {}
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            FIELD_PRIMARY => {
                self.config.primary =
                    cycle_key(&self.registries.countries.keys(), &self.config.primary, delta);
                self.refresh();
            }
            FIELD_COMPARE => {
                self.config.compare =
                    cycle_key(&self.registries.countries.keys(), &self.config.compare, delta);
                self.refresh();
            }
            FIELD_INDICATOR => {
                self.config.indicator =
                    cycle_key(&self.registries.indicators.keys(), &self.config.indicator, delta);
                self.refresh();
            }
            FIELD_SECOND => {
                self.config.second_indicator = cycle_key(
                    &self.registries.indicators.keys(),
                    &self.config.second_indicator,
                    delta,
                );
                self.refresh();
            }
            _ => {}
        }
    }

    fn apply_date_input(&mut self) {
        let trimmed = self.date_input.trim();
        let parsed = match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(d) => d,
            Err(e) => {
                self.status = format!("Invalid date '{trimmed}': {e}");
                return;
            }
        };

        match self.edit {
            EditMode::StartDate if parsed > self.config.end => {
                self.status = format!("Start {parsed} is after end {}.", self.config.end);
                return;
            }
            EditMode::EndDate if parsed < self.config.start => {
                self.status = format!("End {parsed} is before start {}.", self.config.start);
                return;
            }
            EditMode::StartDate => self.config.start = parsed,
            EditMode::EndDate => self.config.end = parsed,
            _ => {}
        }
        self.edit = EditMode::None;
        self.refresh();
    }

    /// Recompute every table from scratch. Provider failures never surface
    /// as errors here; they become synthetic columns with a reason.
    fn refresh(&mut self) {
        match run_view(&self.adapter, &self.config) {
            Ok(view) => {
                self.status = provenance_summary(&view);
                self.view = Some(view);
            }
            Err(err) => {
                // Only registry/range errors can land here.
                self.status = format!("Refresh failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("macrot", Style::default().fg(Color::Cyan)),
            Span::raw(" — macro indicator tracker"),
            Span::styled(
                format!("   [{}]", self.tab.title()),
                Style::default().fg(Color::Yellow),
            ),
        ]));

        let primary_name = self.country_name(&self.config.primary);
        let compare_name = self.country_name(&self.config.compare);
        lines.push(Line::from(Span::styled(
            format!(
                "{primary_name} vs {compare_name} | {} + {} | {}..{}",
                self.config.indicator,
                self.config.second_indicator,
                self.config.start,
                self.config.end,
            ),
            Style::default().fg(Color::Gray),
        )));

        lines.push(Line::from(Span::styled(
            self.kpi_line(),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    /// Latest readings of the primary country's indicators, with a
    /// synthetic marker and the original's "12-period Δ" where defined.
    fn kpi_line(&self) -> String {
        let Some(view) = &self.view else {
            return "Waiting for data...".to_string();
        };

        let mut parts = Vec::new();
        for indicator_key in [&self.config.indicator, &self.config.second_indicator] {
            let Some(col) = view.charts.column_index(&self.config.primary, indicator_key) else {
                continue;
            };
            let column = &view.charts.columns[col];
            let mark = if column.is_synthetic { "*" } else { "" };
            let latest = view
                .charts
                .latest(col)
                .map(|(_, v)| format!("{v:.2}{}", column.unit))
                .unwrap_or_else(|| "—".to_string());
            let delta = view
                .charts
                .trailing_delta(col)
                .map(|d| format!(" (Δ12 {d:+.2})"))
                .unwrap_or_default();
            parts.push(format!("{indicator_key}{mark}: {latest}{delta}"));
        }
        if parts.is_empty() {
            "No data.".to_string()
        } else {
            parts.push("* = synthetic".to_string());
            parts.join(" | ")
        }
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(8)])
            .split(area);

        match self.tab {
            Tab::Charts => self.draw_charts_tab(frame, chunks[0]),
            Tab::Compare => self.draw_compare_tab(frame, chunks[0]),
            Tab::Events => self.draw_events_tab(frame, chunks[0]),
            Tab::Notes => self.draw_notes_tab(frame, chunks[0]),
        }
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_charts_tab(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let halves = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let (first, second) = match &self.view {
            Some(view) => (
                view.charts
                    .column_index(&self.config.primary, &self.config.indicator),
                view.charts
                    .column_index(&self.config.primary, &self.config.second_indicator),
            ),
            None => (None, None),
        };

        self.draw_chart(
            frame,
            halves[0],
            self.view.as_ref().map(|v| &v.charts),
            first.into_iter().collect(),
            &self.indicator_label(&self.config.indicator),
        );
        self.draw_chart(
            frame,
            halves[1],
            self.view.as_ref().map(|v| &v.charts),
            second.into_iter().collect(),
            &self.indicator_label(&self.config.second_indicator),
        );
    }

    fn draw_compare_tab(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = match &self.view {
            Some(view) if view.compare.columns.len() >= 2 => {
                match view.compare.correlation(0, 1) {
                    Some(r) => format!(
                        "{}: {} vs {} (corr {r:+.2})",
                        self.indicator_label(&self.config.indicator),
                        self.country_name(&self.config.primary),
                        self.country_name(&self.config.compare),
                    ),
                    None => format!(
                        "{}: {} vs {}",
                        self.indicator_label(&self.config.indicator),
                        self.country_name(&self.config.primary),
                        self.country_name(&self.config.compare),
                    ),
                }
            }
            _ => self.indicator_label(&self.config.indicator),
        };

        let cols = match &self.view {
            Some(view) => (0..view.compare.columns.len()).collect(),
            None => Vec::new(),
        };
        self.draw_chart(
            frame,
            area,
            self.view.as_ref().map(|v| &v.compare),
            cols,
            &title,
        );
    }

    fn draw_chart(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        table: Option<&ComparisonTable>,
        cols: Vec<usize>,
        title: &str,
    ) {
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(table) = table else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let Some((series, x_bounds, y_bounds)) = chart_series(table, &cols) else {
            let msg = Paragraph::new("No observations in range.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        // One line for the legend, the rest for the chart.
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let unit = cols
            .first()
            .and_then(|&c| table.columns.get(c))
            .map(|c| c.unit)
            .unwrap_or("");
        let widget = MacroChart {
            series: &series,
            x_bounds,
            y_bounds,
            y_label: unit.to_string(),
        };
        frame.render_widget(widget, chunks[0]);

        let mut spans: Vec<Span> = Vec::new();
        for (idx, s) in series.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw("   "));
            }
            let color = LEGEND_COLORS[idx % LEGEND_COLORS.len()];
            let provenance = if s.synthetic { " (synthetic)" } else { "" };
            spans.push(Span::styled(
                format!("── {}{provenance}", s.label),
                Style::default().fg(color),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), chunks[1]);
    }

    fn draw_events_tab(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Policy & shock events (session only)")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.events.is_empty() && self.edit != EditMode::Event {
            let msg = Paragraph::new("No events yet. Press 'e' to tag one (Fed, Oil, Fiscal, ...).")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let mut items: Vec<ListItem> = Vec::new();
        for event in &self.events {
            let header = Line::from(vec![
                Span::styled(
                    format!("[{}] ", event.tag),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(event.date.to_string(), Style::default().fg(Color::Gray)),
            ]);
            items.push(ListItem::new(Text::from(vec![
                header,
                Line::from(event.text.clone()),
            ])));
        }
        frame.render_widget(List::new(items), inner);
    }

    fn draw_notes_tab(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Theory-backed notes (session only)")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.notes.is_empty() && self.edit != EditMode::Note {
            let msg = Paragraph::new("No notes yet. Press 'n' to add one.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let mut items: Vec<ListItem> = Vec::new();
        for note in self.notes.iter().rev() {
            let header = Line::from(vec![
                Span::styled(
                    format!("[{}] ", note.tag.display_name()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    note.saved_at.format("%Y-%m-%d %H:%M UTC").to_string(),
                    Style::default().fg(Color::Gray),
                ),
            ]);
            items.push(ListItem::new(Text::from(vec![
                header,
                Line::from(note.text.clone()),
            ])));
        }
        frame.render_widget(List::new(items), inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items = vec![
            ListItem::new(format!(
                "Primary: {} ({})",
                self.country_name(&self.config.primary),
                self.config.primary
            )),
            ListItem::new(format!(
                "Compare: {} ({})",
                self.country_name(&self.config.compare),
                self.config.compare
            )),
            ListItem::new(format!("Indicator: {}", self.indicator_label(&self.config.indicator))),
            ListItem::new(format!(
                "Second: {}",
                self.indicator_label(&self.config.second_indicator)
            )),
            ListItem::new(format!("Start: {}", self.config.start)),
            ListItem::new(format!("End: {}", self.config.end)),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if let Some(edit_line) = self.edit_line() {
            let hint = Paragraph::new(edit_line)
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn edit_line(&self) -> Option<String> {
        match self.edit {
            EditMode::None => None,
            EditMode::StartDate => Some(format!("start date: {}_", self.date_input)),
            EditMode::EndDate => Some(format!("end date: {}_", self.date_input)),
            EditMode::Note => Some(format!(
                "[{}] {}_",
                self.note_tag.display_name(),
                self.note_draft
            )),
            EditMode::Event => {
                let draft = &self.event_draft;
                let mark = |field: usize| if draft.field == field { "_" } else { "" };
                Some(format!(
                    "event date[{}{}] tag[{}{}] note[{}{}]",
                    draft.date,
                    mark(0),
                    draft.tag,
                    mark(1),
                    draft.text,
                    mark(2),
                ))
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help =
            "Tab view  ↑/↓ select  ←/→ adjust  Enter edit date  n note  e event  r refresh  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(self.status.as_str(), Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn country_name(&self, key: &str) -> String {
        self.registries
            .countries
            .lookup(key)
            .map(|c| c.display_name.clone())
            .unwrap_or_else(|_| key.to_string())
    }

    fn indicator_label(&self, key: &str) -> String {
        self.registries
            .indicators
            .lookup(key)
            .map(|i| i.label.clone())
            .unwrap_or_else(|_| key.to_string())
    }
}

/// Status-line summary of how many series are live vs falling back, with
/// the first fallback reason spelled out.
fn provenance_summary(view: &ViewOutput) -> String {
    let columns = view.charts.columns.iter().chain(view.compare.columns.iter());
    let mut live = 0usize;
    let mut synthetic = 0usize;
    let mut reason: Option<&str> = None;
    for column in columns {
        if column.is_synthetic {
            synthetic += 1;
            if reason.is_none() {
                reason = column.fallback_reason.as_deref();
            }
        } else {
            live += 1;
        }
    }
    match (synthetic, reason) {
        (0, _) => format!("{live} live series."),
        (_, Some(reason)) => format!("{live} live, {synthetic} synthetic ({reason})."),
        (_, None) => format!("{live} live, {synthetic} synthetic."),
    }
}

/// Step through registry keys in order, wrapping at both ends.
fn cycle_key(keys: &[&str], current: &str, delta: i32) -> String {
    if keys.is_empty() {
        return current.to_string();
    }
    let pos = keys.iter().position(|k| *k == current).unwrap_or(0);
    let len = keys.len() as i32;
    let next = (pos as i32 + delta).rem_euclid(len) as usize;
    keys[next].to_string()
}

/// Build Plotters-ready series for the given table columns.
///
/// Dates map to `num_days_from_ce` on the x axis; missing cells are
/// skipped. Returns `None` when nothing is plottable.
fn chart_series(
    table: &ComparisonTable,
    cols: &[usize],
) -> Option<(Vec<ChartSeries>, [f64; 2], [f64; 2])> {
    if table.is_empty() {
        return None;
    }

    let mut series = Vec::with_capacity(cols.len());
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &col in cols {
        let column = table.columns.get(col)?;
        let mut points = Vec::with_capacity(table.dates.len());
        for (date, value) in table.dates.iter().zip(&column.values) {
            if let Some(v) = value {
                points.push((date.num_days_from_ce() as f64, *v));
                y_min = y_min.min(*v);
                y_max = y_max.max(*v);
            }
        }
        series.push(ChartSeries {
            label: table
                .columns
                .get(col)
                .map(|c| c.country_key.clone())
                .unwrap_or_default(),
            synthetic: column.is_synthetic,
            points,
        });
    }

    if !y_min.is_finite() || !y_max.is_finite() {
        return None;
    }
    if y_max <= y_min {
        y_min -= 0.5;
        y_max += 0.5;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    let x0 = table.dates.first()?.num_days_from_ce() as f64;
    let x1 = table.dates.last()?.num_days_from_ce() as f64;
    if x1 <= x0 {
        return None;
    }

    Some((series, [x0, x1], y_bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::SeriesColumn;

    fn test_app(registries: &Registries) -> App<'_> {
        App::new(
            registries,
            TuiArgs {
                country: "US".to_string(),
                versus: "DE".to_string(),
                indicator: "CPI".to_string(),
                second_indicator: "UNEMP".to_string(),
                start: NaiveDate::from_ymd_opt(2023, 6, 1),
                end: NaiveDate::from_ymd_opt(2024, 6, 1),
            },
        )
    }

    #[test]
    fn tab_cycle_visits_all_views() {
        let mut tab = Tab::Charts;
        let mut seen = vec![tab];
        for _ in 0..3 {
            tab = tab.next();
            seen.push(tab);
        }
        assert_eq!(seen, vec![Tab::Charts, Tab::Compare, Tab::Events, Tab::Notes]);
        assert_eq!(tab.next(), Tab::Charts);
    }

    #[test]
    fn event_entry_saves_newest_first_with_defaults() {
        let registries = Registries::new();
        let mut app = test_app(&registries);

        // Keep the prefilled date (range end) and empty tag; type the note.
        app.handle_key(KeyCode::Char('e'));
        assert_eq!(app.edit, EditMode::Event);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Tab);
        for c in "Brent spike".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.edit, EditMode::None);
        assert_eq!(app.tab, Tab::Events);
        assert_eq!(
            app.events,
            vec![EventEntry {
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                tag: "—".to_string(),
                text: "Brent spike".to_string(),
            }]
        );

        // A second entry lands on top of the list.
        app.handle_key(KeyCode::Char('e'));
        app.handle_key(KeyCode::Tab);
        for c in "Fed".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.events.len(), 2);
        assert_eq!(app.events[0].tag, "Fed");
    }

    #[test]
    fn invalid_event_date_keeps_the_editor_open() {
        let registries = Registries::new();
        let mut app = test_app(&registries);

        app.handle_key(KeyCode::Char('e'));
        for _ in 0..12 {
            app.handle_key(KeyCode::Backspace);
        }
        for c in "not-a-date".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.edit, EditMode::Event);
        assert!(app.events.is_empty());
        assert!(app.status.contains("Invalid event date"));
    }

    #[test]
    fn cycle_key_wraps_both_directions() {
        let keys = ["CPI", "GDP", "POLICY", "UNEMP"];
        assert_eq!(cycle_key(&keys, "CPI", 1), "GDP");
        assert_eq!(cycle_key(&keys, "CPI", -1), "UNEMP");
        assert_eq!(cycle_key(&keys, "UNEMP", 1), "CPI");
        // Unknown current key restarts from the front.
        assert_eq!(cycle_key(&keys, "M2", 1), "GDP");
    }

    #[test]
    fn chart_series_skips_missing_cells() {
        let dates: Vec<NaiveDate> = (1..=3)
            .map(|m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap())
            .collect();
        let table = ComparisonTable {
            dates,
            columns: vec![SeriesColumn {
                country_key: "TL".to_string(),
                indicator_key: "CPI".to_string(),
                label: "Testland — CPI".to_string(),
                unit: "%",
                is_synthetic: true,
                fallback_reason: None,
                values: vec![Some(1.0), None, Some(2.0)],
            }],
        };
        let (series, x_bounds, y_bounds) = chart_series(&table, &[0]).unwrap();
        assert_eq!(series[0].points.len(), 2);
        assert!(series[0].synthetic);
        assert!(x_bounds[1] > x_bounds[0]);
        assert!(y_bounds[0] < 1.0 && y_bounds[1] > 2.0);
    }
}
