use kbplayer::{
    history::History,
    session::Metrics,
    settings::Settings,
    view::format_time,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::ui::centered_rect;

const TEXT_PREVIEW_WIDTH: usize = 30;

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

fn hint_style() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

/// Cut `text` to at most `max` terminal columns, marking the cut with `…`
pub fn truncate_to_width(text: &str, max: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    let total: usize = flat.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return flat;
    }

    let mut out = String::new();
    let mut used = 0;
    for c in flat.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

pub struct SettingsDialog<'a> {
    settings: &'a Settings,
}

impl<'a> SettingsDialog<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }
}

impl Widget for SettingsDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let s = self.settings;
        let rows = vec![
            Row::new(vec![
                Cell::from("(l) Language"),
                Cell::from(s.language.label()),
            ]),
            Row::new(vec![
                Cell::from("(k) Key hints"),
                Cell::from(on_off(s.show_key_hints)),
            ]),
            Row::new(vec![
                Cell::from("(s) Pronunciation"),
                Cell::from(on_off(s.enable_sound)),
            ]),
            Row::new(vec![
                Cell::from("(b) Bold text"),
                Cell::from(on_off(s.bold_text)),
            ]),
            Row::new(vec![
                Cell::from("(+/-) Font size"),
                Cell::from(format!("{}px", s.font_size_px)),
            ]),
            Row::new(vec![
                Cell::from("(↑/↓) Input height"),
                Cell::from(format!("{}px", s.input_height_px)),
            ]),
        ];

        let rect = centered_rect(44, 11, area);
        Clear.render(rect, buf);
        let block = Block::default().borders(Borders::ALL).title("Settings");
        let inner = block.inner(rect);
        block.render(rect, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(1)
            .constraints([Constraint::Min(6), Constraint::Length(1)])
            .split(inner);

        Table::new(rows, [Constraint::Length(22), Constraint::Min(8)]).render(chunks[0], buf);
        Paragraph::new(Span::styled("(esc) close", hint_style()))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    }
}

pub struct CompletionDialog<'a> {
    metrics: &'a Metrics,
}

impl<'a> CompletionDialog<'a> {
    pub fn new(metrics: &'a Metrics) -> Self {
        Self { metrics }
    }
}

impl Widget for CompletionDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(Span::styled(
                "Challenge complete!",
                bold.fg(Color::Green),
            )),
            Line::default(),
            Line::from(vec![
                Span::raw("Time: "),
                Span::styled(format_time(self.metrics.elapsed_secs), bold),
            ]),
            Line::from(vec![
                Span::raw("APM: "),
                Span::styled(self.metrics.apm.to_string(), bold),
            ]),
            Line::from(vec![
                Span::raw("Max streak: "),
                Span::styled(self.metrics.max_streak.to_string(), bold),
            ]),
            Line::default(),
            Line::from(Span::styled(
                "(n)ext / (ctrl+h) history / (esc) close",
                hint_style(),
            )),
        ];

        let rect = centered_rect(46, lines.len() as u16 + 2, area);
        Clear.render(rect, buf);
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Result"))
            .render(rect, buf);
    }
}

pub struct HistoryDialog<'a> {
    history: &'a History,
}

impl<'a> HistoryDialog<'a> {
    pub fn new(history: &'a History) -> Self {
        Self { history }
    }
}

impl Widget for HistoryDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rect = centered_rect(area.width.saturating_sub(4), area.height.saturating_sub(2), area);
        Clear.render(rect, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("History ({})", self.history.len()));
        let inner = block.inner(rect);
        block.render(rect, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(1)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        if self.history.is_empty() {
            Paragraph::new("No history yet")
                .alignment(Alignment::Center)
                .render(chunks[0], buf);
        } else {
            let header = Row::new(vec![
                Cell::from("Date"),
                Cell::from("Lang"),
                Cell::from("Time"),
                Cell::from("APM"),
                Cell::from("Max streak"),
                Cell::from("Text"),
            ])
            .style(Style::default().add_modifier(Modifier::BOLD));

            let rows = self
                .history
                .records()
                .iter()
                .map(|record| {
                    Row::new(vec![
                        Cell::from(record.timestamp.clone()),
                        Cell::from(record.language.label()),
                        Cell::from(format_time(record.elapsed_secs)),
                        Cell::from(record.apm.to_string()),
                        Cell::from(record.max_streak.to_string()),
                        Cell::from(truncate_to_width(&record.text, TEXT_PREVIEW_WIDTH)),
                    ])
                })
                .collect::<Vec<Row>>();

            let widths = [
                Constraint::Length(24),
                Constraint::Length(8),
                Constraint::Length(6),
                Constraint::Length(5),
                Constraint::Length(10),
                Constraint::Min(10),
            ];
            Table::new(rows, widths)
                .header(header)
                .column_spacing(1)
                .render(chunks[0], buf);
        }

        Paragraph::new(Span::styled("(c)lear / (esc) close", hint_style()))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    }
}
