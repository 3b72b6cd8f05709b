//! Render dispatch and overall layout.
//!
//! Fixed-height chrome rows stack around the card list: header, memo,
//! search, source toggles on top; ticker marquee and status footer below.
//! Overlays (help, analysis) draw on top of everything.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};
use crate::theme::core;

use super::{cards, header, status, ticker};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 10;

pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-size frames before any layout math
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    // Dark core background under everything
    f.render_widget(
        Block::default().style(Style::default().bg(core::BG_MAIN)),
        area,
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // memo
            Constraint::Length(1), // search
            Constraint::Length(1), // source toggles
            Constraint::Min(0),    // cards
            Constraint::Length(1), // ticker
            Constraint::Length(1), // status
        ])
        .split(area);

    header::render(f, app, rows[0]);
    render_memo(f, app, rows[1]);
    render_search(f, app, rows[2]);
    render_sources(f, app, rows[3]);
    cards::render(f, app, rows[4]);
    ticker::render(f, app, rows[5]);
    status::render(f, app, rows[6]);

    if app.show_help {
        render_help_overlay(f, app);
    }
    if let Some(text) = app.analysis.clone() {
        render_analysis_overlay(f, app, &text);
    }
}

fn render_memo(f: &mut Frame, app: &App, area: Rect) {
    let text = match &app.input_mode {
        InputMode::Memo { buffer } => format!("{}_", buffer),
        _ => app.memo.clone(),
    };
    let line = Line::from(vec![
        Span::styled(" MEMO // ", app.palette.memo_label),
        Span::styled(text, app.palette.memo_text),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_search(f: &mut Frame, app: &App, area: Rect) {
    let text = if app.input_mode == InputMode::Search {
        format!("{}_", app.query)
    } else if app.query.is_empty() {
        "press / to filter".to_string()
    } else {
        app.query.clone()
    };
    let line = Line::from(vec![
        Span::styled(" FIND // ", app.palette.search_label),
        Span::styled(text, app.palette.search_text),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_sources(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for source in app.registry.sources() {
        let style = if app.registry.is_active(&source.name) {
            app.palette.source_on
        } else {
            app.palette.source_off
        };
        spans.push(Span::styled(format!(" {} ", source.name), style));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Centered overlay rect, clamped to the frame.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_help_overlay(f: &mut Frame, app: &App) {
    let overlay = centered_rect(f.area(), 46, 16);
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    let lines = vec![
        Line::from("j/k       navigate"),
        Line::from("Enter/o   open link (marks read)"),
        Line::from("p         pin / unpin"),
        Line::from("/         filter headlines"),
        Line::from("1-9       toggle source"),
        Line::from("a         add RSS source"),
        Line::from("r         refresh hub"),
        Line::from("t         cycle theme"),
        Line::from("m         edit memo"),
        Line::from("S         toggle sound"),
        Line::from("c         cinema mode"),
        Line::from("A         auto-startup"),
        Line::from("i         analyze headline"),
        Line::from("q         quit"),
    ];

    f.render_widget(Clear, overlay);
    f.render_widget(
        Paragraph::new(lines)
            .style(app.palette.overlay_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(app.palette.overlay_border)
                    .title(" KEYMAP "),
            ),
        overlay,
    );
}

fn render_analysis_overlay(f: &mut Frame, app: &App, text: &str) {
    let overlay = centered_rect(f.area(), 50, 9);
    if overlay.width < 20 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);
    f.render_widget(
        Paragraph::new(text.to_string())
            .style(app.palette.overlay_text)
            .wrap(ratatui::widgets::Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(app.palette.overlay_border)
                    .title(" AI ANALYSIS "),
            ),
        overlay,
    );
}
