//! The headline card list.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::util::truncate_to_width;

/// Format a publish time as a compact relative age.
pub(super) fn format_relative_time(published: Option<DateTime<Utc>>) -> String {
    let Some(ts) = published else {
        return String::new();
    };

    let diff = Utc::now().signed_duration_since(ts).num_seconds();

    // Future dates (malformed feeds)
    if diff < 0 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }
    ts.format("%b %d").to_string()
}

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    if app.visible.is_empty() {
        f.render_widget(
            Paragraph::new("NO DATA")
                .style(app.palette.empty_list)
                .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = app
        .visible
        .iter()
        .map(|entry| {
            let is_pinned = app.pinned.contains(&entry.link);
            let is_read = app.read.contains(&entry.link);

            let time_str = format_relative_time(entry.published);
            // tag + star + padding + time
            let reserved = entry.source.len() + time_str.len() + 8;
            let max_title = (area.width as usize).saturating_sub(reserved);
            let title = truncate_to_width(&entry.title, max_title).into_owned();

            let title_style = if is_read {
                app.palette.card_title_read
            } else {
                app.palette.card_title
            };

            let mut spans = vec![
                Span::raw(" "),
                Span::styled(format!(" {} ", entry.source), app.palette.card_source_tag),
                Span::raw(" "),
            ];
            if is_pinned {
                spans.push(Span::styled("★ ", app.palette.card_star_pinned));
            } else {
                spans.push(Span::styled("☆ ", app.palette.card_star));
            }
            spans.push(Span::styled(title, title_style));
            if !time_str.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", time_str),
                    app.palette.card_time,
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).highlight_style(app.palette.card_selected);

    let mut state = ListState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn missing_time_renders_empty() {
        assert_eq!(format_relative_time(None), "");
    }

    #[test]
    fn future_time_renders_now() {
        let future = Utc::now() + Duration::hours(2);
        assert_eq!(format_relative_time(Some(future)), "now");
    }

    #[test]
    fn recent_times_use_compact_units() {
        let now = Utc::now();
        assert_eq!(format_relative_time(Some(now - Duration::minutes(5))), "5m");
        assert_eq!(format_relative_time(Some(now - Duration::hours(3))), "3h");
        assert_eq!(format_relative_time(Some(now - Duration::days(2))), "2d");
    }

    #[test]
    fn old_times_fall_back_to_date() {
        let old = Utc::now() - Duration::days(30);
        let s = format_relative_time(Some(old));
        // "%b %d" — e.g. "Jul 07"
        assert!(s.contains(' '));
        assert!(!s.ends_with('d'));
    }
}
