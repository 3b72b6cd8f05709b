//! The status footer: transient messages, sync state, and key hints.

use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

use crate::app::{App, InputMode};

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = match &app.input_mode {
        InputMode::Search => Cow::Borrowed(" FILTER | ENTER keep | ESC clear"),
        InputMode::Memo { .. } => Cow::Borrowed(" MEMO EDIT | ENTER save | ESC cancel"),
        InputMode::AddSourceName { buffer } => Cow::Owned(format!(" ADD SOURCE — NAME: {}_", buffer)),
        InputMode::AddSourceUrl { name, buffer } => {
            Cow::Owned(format!(" ADD SOURCE [{}] — RSS URL: {}_", name, buffer))
        }
        InputMode::Normal => {
            if let Some((msg, _)) = &app.status_message {
                Cow::Owned(format!(" {}", msg))
            } else if app.refreshing {
                Cow::Borrowed(" HUB_SYNCING...")
            } else {
                Cow::Borrowed(" HUB_READY — [/]find [p]in [o]pen [r]efresh [?]help [q]uit")
            }
        }
    };

    let style = if app.status_message.is_some() {
        app.palette.status_accent
    } else {
        app.palette.status
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}
