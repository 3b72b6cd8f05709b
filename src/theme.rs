//! Theme system for the deck.
//!
//! A fixed dark core palette carries the chrome; an `AccentVariant` selects
//! which accent color is threaded through titles, gauges, pins, and the
//! ticker. Cycling the accent is the only theme mutation the UI exposes,
//! and the selected index persists in the settings document.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Core Colors
// ============================================================================

/// Fixed dark core, shared by every accent variant.
pub mod core {
    use ratatui::style::Color;

    pub const BG_MAIN: Color = Color::Rgb(0x0d, 0x11, 0x17);
    pub const BG_CARD: Color = Color::Rgb(0x16, 0x1b, 0x22);
    pub const BG_CARD_HOVER: Color = Color::Rgb(0x21, 0x26, 0x2d);
    pub const ACCENT_RED: Color = Color::Rgb(0xff, 0x7b, 0x72);
    pub const TEXT_MAIN: Color = Color::Rgb(0xc9, 0xd1, 0xd9);
    pub const TEXT_DIM: Color = Color::Rgb(0x8b, 0x94, 0x9e);
    pub const BORDER: Color = Color::Rgb(0x30, 0x36, 0x3d);
}

// ============================================================================
// Accent Variant
// ============================================================================

/// The three accent presets, cycled in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccentVariant {
    CyberCyan,
    MatrixGreen,
    NeonPink,
}

impl AccentVariant {
    pub const COUNT: usize = 3;

    /// Resolve a persisted theme index. Out-of-range values wrap rather
    /// than fail so a hand-edited settings file cannot break startup.
    pub fn from_index(idx: usize) -> Self {
        match idx % Self::COUNT {
            0 => Self::CyberCyan,
            1 => Self::MatrixGreen,
            _ => Self::NeonPink,
        }
    }

    /// The index persisted in the settings document.
    pub fn index(self) -> usize {
        match self {
            Self::CyberCyan => 0,
            Self::MatrixGreen => 1,
            Self::NeonPink => 2,
        }
    }

    /// Cycle to the next accent: cyan → green → pink → cyan.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Name shown in the status line when cycling.
    pub fn name(self) -> &'static str {
        match self {
            Self::CyberCyan => "CYBER_CYAN",
            Self::MatrixGreen => "MATRIX_GREEN",
            Self::NeonPink => "NEON_PINK",
        }
    }

    /// The accent color itself.
    pub fn color(self) -> Color {
        match self {
            Self::CyberCyan => Color::Rgb(0x58, 0xa6, 0xff),
            Self::MatrixGreen => Color::Rgb(0x3f, 0xb9, 0x50),
            Self::NeonPink => Color::Rgb(0xff, 0x79, 0xc6),
        }
    }

    /// Build the full semantic palette for this accent.
    pub fn palette(self) -> Palette {
        Palette::from_accent(self.color())
    }
}

// ============================================================================
// Palette — semantic roles to Style
// ============================================================================

/// Semantic styles for every UI element, derived from one accent color
/// over the fixed dark core.
#[derive(Debug, Clone)]
pub struct Palette {
    // -- Header --
    pub header_title: Style,
    pub weather: Style,
    pub clock: Style,
    pub gauge_label: Style,
    pub gauge_fill: Style,
    pub gauge_track: Style,

    // -- Memo / search --
    pub memo_label: Style,
    pub memo_text: Style,
    pub search_label: Style,
    pub search_text: Style,

    // -- Source toggle row --
    pub source_on: Style,
    pub source_off: Style,

    // -- Cards --
    pub card_source_tag: Style,
    pub card_title: Style,
    pub card_title_read: Style,
    pub card_selected: Style,
    pub card_star_pinned: Style,
    pub card_star: Style,
    pub card_time: Style,
    pub card_border_pinned: Style,
    pub empty_list: Style,

    // -- Ticker / status --
    pub ticker: Style,
    pub status: Style,
    pub status_accent: Style,

    // -- Overlays --
    pub overlay_border: Style,
    pub overlay_text: Style,
}

impl Palette {
    fn from_accent(accent: Color) -> Self {
        Self {
            header_title: Style::default()
                .fg(accent)
                .add_modifier(Modifier::BOLD),
            weather: Style::default().fg(core::TEXT_MAIN),
            clock: Style::default()
                .fg(core::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
            gauge_label: Style::default().fg(core::TEXT_DIM),
            gauge_fill: Style::default().fg(accent),
            gauge_track: Style::default().fg(core::BORDER),

            memo_label: Style::default()
                .fg(accent)
                .add_modifier(Modifier::BOLD),
            memo_text: Style::default().fg(core::TEXT_MAIN).bg(core::BG_CARD),
            search_label: Style::default().fg(core::TEXT_DIM),
            search_text: Style::default().fg(core::TEXT_MAIN).bg(core::BG_CARD),

            source_on: Style::default()
                .fg(core::BG_MAIN)
                .bg(accent)
                .add_modifier(Modifier::BOLD),
            source_off: Style::default()
                .fg(core::TEXT_DIM)
                .bg(core::BORDER),

            card_source_tag: Style::default().fg(core::BG_MAIN).bg(accent),
            card_title: Style::default()
                .fg(core::TEXT_MAIN)
                .add_modifier(Modifier::BOLD),
            card_title_read: Style::default().fg(core::TEXT_DIM),
            card_selected: Style::default()
                .fg(accent)
                .bg(core::BG_CARD_HOVER)
                .add_modifier(Modifier::BOLD),
            card_star_pinned: Style::default().fg(accent),
            card_star: Style::default().fg(core::TEXT_DIM),
            card_time: Style::default().fg(core::TEXT_DIM),
            card_border_pinned: Style::default().fg(accent),
            empty_list: Style::default().fg(core::TEXT_DIM),

            ticker: Style::default()
                .fg(accent)
                .bg(core::BG_CARD)
                .add_modifier(Modifier::BOLD),
            status: Style::default().fg(core::TEXT_DIM),
            status_accent: Style::default().fg(accent),

            overlay_border: Style::default().fg(accent),
            overlay_text: Style::default().fg(core::TEXT_MAIN),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
