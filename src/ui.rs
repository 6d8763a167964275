pub mod dialogs;
pub mod keyboard;
pub mod screen;

use kbplayer::{
    app::App,
    milestone::Tier,
    view::{CharState, SessionView},
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::keyboard::{KeyboardView, KEYBOARD_HEIGHT};
use crate::ui::screen::Screen;

const HORIZONTAL_MARGIN: u16 = 2;
/// Pixels of the input height setting per terminal row
const PX_PER_ROW: u32 = 25;

/// Draw the typing screen, the active dialog and any milestone banner
pub fn draw(app: &App, f: &mut Frame) {
    screen::TypingScreen.render(app, f);
    if let Some(overlay) = screen::overlay_screen(app.overlay()) {
        overlay.render(app, f);
    }
    if let Some(banner) = app.milestones.visible() {
        f.render_widget(MilestoneBanner(banner.message), f.area());
    }
}

pub fn tier_style(tier: Tier) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match tier {
        Tier::Amazing => bold.fg(Color::Magenta),
        Tier::Great => bold.fg(Color::Blue),
        Tier::Good => bold.fg(Color::Green),
        Tier::Normal => Style::default(),
    }
}

pub fn input_rows(input_height_px: u32) -> u16 {
    (input_height_px / PX_PER_ROW).max(1) as u16
}

/// Rectangle of `width` x `height` centered in `area`, clipped to it
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Main typing screen: metrics header, reference text, input box, keyboard
pub struct TypingView<'a> {
    pub app: &'a App,
}

impl Widget for TypingView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = SessionView::from_engine(&self.app.engine);
        let settings = self.app.engine.settings();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Length(1), // padding
                Constraint::Min(3),    // reference text
                Constraint::Length(input_rows(settings.input_height_px) + 2),
                Constraint::Length(KEYBOARD_HEIGHT),
                Constraint::Length(1), // legend
            ])
            .split(area);

        let title = Paragraph::new(Span::styled(
            "KBPlayer",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let header = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(10), Constraint::Min(0)])
            .split(chunks[0]);
        title.render(header[0], buf);

        let metrics = Paragraph::new(Line::from(vec![
            Span::raw("Time: "),
            Span::raw(view.elapsed.clone()),
            Span::raw("   APM: "),
            Span::styled(view.apm.to_string(), tier_style(view.apm_tier)),
            Span::raw("   Streak: "),
            Span::styled(view.streak.to_string(), tier_style(view.streak_tier)),
        ]))
        .alignment(Alignment::Right);
        metrics.render(header[1], buf);

        let base = if settings.bold_text {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let spans = view
            .chars
            .iter()
            .map(|c| {
                let mut style = match c.state {
                    CharState::Correct => base.fg(Color::Green),
                    CharState::Incorrect => base.fg(Color::Red),
                    CharState::Pending => base.add_modifier(Modifier::DIM),
                };
                if c.is_cursor {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                let shown = match (c.ch, c.state) {
                    (' ', CharState::Incorrect) => "·".to_string(),
                    ('\n', _) => "⏎".to_string(),
                    (ch, _) => ch.to_string(),
                };
                Span::styled(shown, style)
            })
            .collect::<Vec<Span>>();

        Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Text"))
            .wrap(Wrap { trim: false })
            .render(chunks[2], buf);

        let input_block = Block::default()
            .borders(Borders::ALL)
            .title(if view.is_completed { "Done" } else { "Input" });
        let input = if view.input.is_empty() {
            Paragraph::new(Span::styled(
                "Start typing here...",
                Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
            ))
        } else {
            Paragraph::new(view.input.clone()).style(base)
        };
        input
            .block(input_block)
            .wrap(Wrap { trim: false })
            .render(chunks[3], buf);

        KeyboardView {
            highlighted: view.highlighted_key.as_deref(),
        }
        .render(chunks[4], buf);

        Paragraph::new(Span::styled(
            "(tab) new text / (ctrl+s) settings / (ctrl+h) history / (esc) quit",
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .render(chunks[5], buf);
    }
}

/// Transient speed milestone, pinned near the bottom of the screen
pub struct MilestoneBanner(pub &'static str);

impl Widget for MilestoneBanner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (self.0.width() as u16).saturating_add(4);
        let height = 3;
        let mut rect = centered_rect(width, height, area);
        rect.y = area.y + area.height.saturating_sub(height + KEYBOARD_HEIGHT);

        Clear.render(rect, buf);
        Paragraph::new(self.0)
            .style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
            .render(rect, buf);
    }
}
