//! Application of background task events to the UI state.

use crate::app::{canned_analysis, App, AppEvent};

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::EntriesFetched(entries) => {
            tracing::debug!(count = entries.len(), "Aggregation pass applied");
            app.apply_entries(entries);
        }

        AppEvent::TickerUpdated(line) => {
            // Restart the marquee only when the content actually changed,
            // so an unchanged line keeps scrolling smoothly across polls.
            if line != app.ticker_text {
                app.ticker_text = line;
                app.ticker_offset = 0;
            }
        }

        AppEvent::WeatherUpdated(badge) => {
            app.weather_badge = badge;
        }

        AppEvent::AnalysisReady { title } => {
            app.analysis = Some(canned_analysis(&title));
            app.status_message = None;
        }
    }
}
