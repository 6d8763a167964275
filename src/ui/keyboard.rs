use kbplayer::view::KEYBOARD_ROWS;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// One line per keyboard row
pub const KEYBOARD_HEIGHT: u16 = KEYBOARD_ROWS.len() as u16;

/// On-screen keyboard with the next expected key highlighted
pub struct KeyboardView<'a> {
    pub highlighted: Option<&'a str>,
}

impl Widget for KeyboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let idle = Style::default().add_modifier(Modifier::DIM);
        let lit = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let lines = KEYBOARD_ROWS
            .iter()
            .map(|row| {
                let spans = row
                    .iter()
                    .flat_map(|key| {
                        let style = if self.highlighted == Some(*key) {
                            lit
                        } else {
                            idle
                        };
                        [Span::styled(format!("[{key}]"), style), Span::raw(" ")]
                    })
                    .collect::<Vec<Span>>();
                Line::from(spans)
            })
            .collect::<Vec<Line>>();

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
