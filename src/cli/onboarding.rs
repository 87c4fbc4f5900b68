use std::sync::OnceLock;

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use regex::Regex;

use crate::auth::Session;
use crate::error::{FacturaError, Result};
use crate::store::RecordStore;
use crate::tui::{ALERT_STYLE, FOOTER_STYLE, HEADER_STYLE, LABEL_STYLE, SELECTED_STYLE};

/// Telegram handles: optional `@`, then 5-32 letters, digits or underscores.
pub fn validate_handle(handle: &str) -> Result<()> {
    static HANDLE_RE: OnceLock<Regex> = OnceLock::new();
    let re = HANDLE_RE
        .get_or_init(|| Regex::new(r"^@?[A-Za-z0-9_]{5,32}$").expect("handle pattern"));
    if re.is_match(handle) {
        Ok(())
    } else {
        Err(FacturaError::InvalidHandle(format!(
            "\"{handle}\" (expected @name: 5-32 letters, digits or underscores)"
        )))
    }
}

struct Onboarding {
    handle: String,
    error: Option<String>,
}

impl Onboarding {
    fn draw(&self, frame: &mut Frame) {
        let areas = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1),
            Constraint::Length(2), // description
            Constraint::Length(1), // input
            Constraint::Length(1), // error
            Constraint::Fill(1),
            Constraint::Length(1), // keys
        ])
        .split(frame.area());

        frame.render_widget(
            Paragraph::new("Link your Telegram").style(HEADER_STYLE),
            areas[0],
        );
        frame.render_widget(
            Paragraph::new(
                "The bot needs your Telegram handle to associate the invoices you send it \
with this account.",
            ),
            areas[2],
        );

        let input = Line::from(vec![
            Span::styled("Telegram handle: ", LABEL_STYLE),
            Span::raw(self.handle.clone()),
            Span::styled(" ", SELECTED_STYLE),
        ]);
        frame.render_widget(Paragraph::new(input), areas[3]);

        if let Some(err) = &self.error {
            frame.render_widget(Paragraph::new(err.clone()).style(ALERT_STYLE), areas[4]);
        }

        frame.render_widget(
            Paragraph::new("Enter save and continue    Esc cancel").style(FOOTER_STYLE),
            areas[6],
        );
    }
}

/// One-time gate before the invoice views: merge the handle into the user's
/// profile. Returns whether the link completed.
pub fn run(store: &dyn RecordStore, session: &Session) -> Result<bool> {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();
    let mut form = Onboarding {
        handle: String::new(),
        error: None,
    };

    let result = loop {
        if let Err(e) = terminal.draw(|frame| form.draw(frame)) {
            break Err(e.into());
        }
        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
                {
                    break Ok(false);
                }
                match key.code {
                    KeyCode::Esc => break Ok(false),
                    KeyCode::Enter => {
                        let handle = form.handle.trim().to_string();
                        if let Err(e) = validate_handle(&handle) {
                            form.error = Some(e.to_string());
                            continue;
                        }
                        let fields = serde_json::json!({
                            "uid": session.uid,
                            "email": session.email,
                            "displayName": session.display_name,
                            "telegramId": handle,
                            "createdAt": Utc::now().timestamp_millis(),
                        });
                        match store.upsert_profile(&session.uid, &fields) {
                            Ok(()) => break Ok(true),
                            Err(e) => form.error = Some(format!("Could not save: {e}")),
                        }
                    }
                    KeyCode::Backspace => {
                        form.handle.pop();
                        form.error = None;
                    }
                    KeyCode::Char(c) => {
                        form.handle.push(c);
                        form.error = None;
                    }
                    _ => {}
                }
            }
            Ok(_) => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_handle_accepts_common_shapes() {
        assert!(validate_handle("@usuario").is_ok());
        assert!(validate_handle("usuario_99").is_ok());
    }

    #[test]
    fn test_validate_handle_rejects_bad_shapes() {
        assert!(validate_handle("").is_err());
        assert!(validate_handle("@abc").is_err()); // too short
        assert!(validate_handle("has spaces").is_err());
        assert!(validate_handle("name!").is_err());
    }
}
