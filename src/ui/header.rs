//! Header row: deck title, weather badge, CPU/RAM gauges, clock.

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Gauge width in cells.
const GAUGE_CELLS: usize = 8;

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(6)])
        .split(area);

    let mut spans = vec![
        Span::styled(" ◆ NEWSDECK ", app.palette.header_title),
        Span::styled(app.weather_badge.clone(), app.palette.weather),
        Span::raw("  "),
        Span::styled("CPU", app.palette.gauge_label),
    ];
    spans.extend(gauge_spans(app, app.cpu_pct));
    spans.push(Span::styled(" RAM", app.palette.gauge_label));
    spans.extend(gauge_spans(app, app.ram_pct));

    f.render_widget(Paragraph::new(Line::from(spans)), cols[0]);

    let clock = Local::now().format("%H:%M").to_string();
    f.render_widget(
        Paragraph::new(clock)
            .style(app.palette.clock)
            .alignment(Alignment::Right),
        cols[1],
    );
}

/// A thin filled/track gauge, e.g. `▰▰▰▱▱▱▱▱` for ~38%.
fn gauge_spans(app: &App, pct: u8) -> Vec<Span<'static>> {
    let filled = filled_cells(pct);
    vec![
        Span::raw(" "),
        Span::styled("▰".repeat(filled), app.palette.gauge_fill),
        Span::styled("▱".repeat(GAUGE_CELLS - filled), app.palette.gauge_track),
    ]
}

fn filled_cells(pct: u8) -> usize {
    ((pct.min(100) as usize * GAUGE_CELLS) + 50) / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_cells_spans_full_range() {
        assert_eq!(filled_cells(0), 0);
        assert_eq!(filled_cells(50), 4);
        assert_eq!(filled_cells(100), GAUGE_CELLS);
    }

    #[test]
    fn filled_cells_clamps_overrange() {
        assert_eq!(filled_cells(255), GAUGE_CELLS);
    }

    #[test]
    fn filled_cells_rounds_to_nearest() {
        // 38% of 8 cells = 3.04 -> 3
        assert_eq!(filled_cells(38), 3);
        // 44% of 8 cells = 3.52 -> 4
        assert_eq!(filled_cells(44), 4);
    }
}
