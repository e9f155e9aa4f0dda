//! Colors, styles, and animation glyphs for the iriscan TUI.
//!
//! Dark-slate clinical palette: deep blue-gray
//! backgrounds with a cool blue primary.

use ratatui::style::{Color, Modifier, Style};

use crate::report::RiskLevel;

pub mod colors {
    use super::Color;

    // === Backgrounds (slate) ===
    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // slate-900
    pub const BG_PANEL: Color = Color::Rgb(30, 41, 59); // slate-800
    pub const BG_HIGHLIGHT: Color = Color::Rgb(51, 65, 85); // slate-700

    // === Foregrounds ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(241, 245, 249); // slate-100
    pub const TEXT_SECONDARY: Color = Color::Rgb(203, 213, 225); // slate-300
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // slate-500

    // === Primary/Brand ===
    pub const PRIMARY: Color = Color::Rgb(59, 130, 246); // blue-500
    pub const PRIMARY_DIM: Color = Color::Rgb(37, 99, 235); // blue-600

    // === Accents ===
    pub const GREEN: Color = Color::Rgb(74, 222, 128);
    pub const YELLOW: Color = Color::Rgb(250, 204, 21);
    pub const ORANGE: Color = Color::Rgb(251, 146, 60);
    pub const RED: Color = Color::Rgb(248, 113, 113);
    pub const PURPLE: Color = Color::Rgb(167, 139, 250);
}

pub mod styles {
    use super::{Color, Modifier, Style, colors};

    pub fn title() -> Style {
        Style::default()
            .fg(colors::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn subtitle() -> Style {
        Style::default().fg(colors::TEXT_MUTED)
    }

    pub fn accent() -> Style {
        Style::default()
            .fg(colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_highlight() -> Style {
        Style::default()
            .fg(colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn key_hint() -> Style {
        Style::default().fg(colors::TEXT_MUTED)
    }

    pub fn field_focused() -> Style {
        Style::default().fg(colors::PRIMARY)
    }

    pub fn field_blurred() -> Style {
        Style::default().fg(colors::TEXT_MUTED)
    }

    pub fn badge(bg: Color) -> Style {
        Style::default()
            .fg(colors::BG_DARK)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }
}

/// Badge/accent color for a risk level.
pub fn risk_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Low => colors::GREEN,
        RiskLevel::Moderate => colors::YELLOW,
        RiskLevel::High => colors::ORANGE,
        RiskLevel::Critical => colors::RED,
        RiskLevel::Unknown => colors::TEXT_MUTED,
    }
}

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner glyph for the given animation tick.
pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

const SCANLINE_FRAMES: [&str; 4] = ["▁▁▁▁▁▁", "▂▂▂▂▂▂", "▄▄▄▄▄▄", "▂▂▂▂▂▂"];

/// Sweeping scan-line glyph row for the viewfinder.
pub fn scanline_frame(tick: usize) -> &'static str {
    SCANLINE_FRAMES[(tick / 2) % SCANLINE_FRAMES.len()]
}
