//! Theme and Colors
//!
//! AuraCalc's palette: an indigo accent over a dark background, with keypad
//! buttons colored by role.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Accent Palette
// ============================================================================

/// Signature indigo (titles, focus borders, the `=` key)
pub const AURA_INDIGO: Color = Color::Rgb(99, 102, 241);

/// Softer indigo for assistant text
pub const AURA_INDIGO_SOFT: Color = Color::Rgb(165, 180, 252);

// ============================================================================
// Keypad Colors
// ============================================================================

/// Digits and the decimal point
pub const KEY_NUMBER: Color = Color::Rgb(230, 230, 235);

/// Operators and parentheses
pub const KEY_OPERATOR: Color = Color::Rgb(129, 140, 248);

/// Clear and backspace
pub const KEY_ACTION: Color = Color::Rgb(251, 146, 60);

// ============================================================================
// UI Colors
// ============================================================================

/// User input green
pub const USER_GREEN: Color = Color::Rgb(130, 220, 130);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Notice yellow (rejected input)
pub const NOTICE_YELLOW: Color = Color::Rgb(250, 204, 21);

/// Border style for a panel, highlighted when it has focus
pub fn panel_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(AURA_INDIGO)
    } else {
        Style::default().fg(DIM_GRAY)
    }
}

/// Title style for panels
pub fn title() -> Style {
    Style::default()
        .fg(AURA_INDIGO)
        .add_modifier(Modifier::BOLD)
}
