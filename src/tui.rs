use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::fmt;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

pub const ALERT_STYLE: Style = Style::new()
    .fg(Color::Red)
    .add_modifier(Modifier::BOLD);

pub const LABEL_STYLE: Style = Style::new().fg(Color::Cyan);

/// Formatted invoice total as a Span.
pub fn total_span(amount: f64, code: &str) -> Span<'static> {
    Span::styled(
        fmt::currency(amount, code),
        Style::new().fg(Color::Rgb(80, 220, 100)),
    )
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}
