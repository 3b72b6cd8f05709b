//! The scrolling market marquee.

use ratatui::{layout::Rect, widgets::Paragraph, Frame};

use crate::app::App;
use crate::util::marquee_window;

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let window = marquee_window(&app.ticker_text, app.ticker_offset, area.width as usize);
    f.render_widget(Paragraph::new(window).style(app.palette.ticker), area);
}
