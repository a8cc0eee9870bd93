//! Night-sky color palette and styles.
//!
//! Muted indigo tones with high-contrast text; risk colors are reserved for
//! the result page.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{AdviceTier, RiskLabel};

/// Night theme color palette.
pub struct NightTheme;

impl NightTheme {
    // === Primary Colors ===

    /// Indigo
    pub const PRIMARY: Color = Color::Rgb(99, 102, 241); // #6366F1

    /// Lavender for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(165, 180, 252); // #A5B4FC

    /// Deep indigo for the header bar
    pub const PRIMARY_DARK: Color = Color::Rgb(55, 48, 163); // #3730A3

    // === Secondary Colors ===

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Semantic Colors ===

    pub const SUCCESS: Color = Color::Rgb(52, 211, 153); // #34D399

    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24

    pub const DANGER: Color = Color::Rgb(248, 113, 113); // #F87171

    pub const INFO: Color = Color::Rgb(96, 165, 250); // #60A5FA

    // === Background Colors ===

    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    // === Text Colors ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC

    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8

    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    // === Preset Styles ===

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Style for the focused field
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn header() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::PRIMARY_DARK)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Bar color for the input chart
    #[must_use]
    pub fn bar() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn bar_value() -> Style {
        Style::default().fg(Self::BG_DARK).bg(Self::PRIMARY)
    }

    /// Style for a predicted class
    #[must_use]
    pub fn risk_label(label: RiskLabel) -> Style {
        match label {
            RiskLabel::Normal => Self::success(),
            RiskLabel::Insomnia => Self::danger(),
        }
    }

    /// Style for an advice tier badge
    #[must_use]
    pub fn advice_tier(tier: AdviceTier) -> Style {
        let base = match tier {
            AdviceTier::HighRisk => Self::danger(),
            AdviceTier::ModerateRisk | AdviceTier::LowRisk | AdviceTier::Fair => Self::warning(),
            AdviceTier::Good => Self::info(),
            AdviceTier::Excellent => Self::success(),
        };
        base.add_modifier(Modifier::BOLD)
    }
}

/// Inline logo for the header bar
pub const LOGO_SMALL: &str = "☾ Somnus";
