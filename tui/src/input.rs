//! Input Translation
//!
//! Crossterm key events to core [`Key`]s, keypad button labels to
//! [`CalcEvent`]s, and the focus model of the screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

use auracalc_core::{CalcEvent, Key};

/// Keypad button labels, row by row
pub const KEYPAD: [[&str; 4]; 5] = [
    ["C", "(", ")", "÷"],
    ["7", "8", "9", "×"],
    ["4", "5", "6", "-"],
    ["1", "2", "3", "+"],
    ["0", ".", "⌫", "="],
];

/// Which panel receives keyboard input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    /// Keypad and display
    #[default]
    Keypad,
    /// Assistant / history side panel
    Side,
}

impl Focus {
    /// The other panel
    pub fn toggled(self) -> Self {
        match self {
            Self::Keypad => Self::Side,
            Self::Side => Self::Keypad,
        }
    }
}

/// Tabs of the side panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SideTab {
    /// Math assistant chat
    #[default]
    Assistant,
    /// Recent calculations
    History,
}

impl SideTab {
    /// Tab titles in display order
    pub const TITLES: [&'static str; 2] = ["Assistant", "History"];

    /// Position in [`SideTab::TITLES`]
    pub fn index(self) -> usize {
        match self {
            Self::Assistant => 0,
            Self::History => 1,
        }
    }

    /// The other tab
    pub fn toggled(self) -> Self {
        match self {
            Self::Assistant => Self::History,
            Self::History => Self::Assistant,
        }
    }
}

/// Translate a crossterm key into a core key
///
/// Control and Alt chords are not calculator input.
pub fn to_core_key(key: KeyEvent) -> Option<Key> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    match key.code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Esc => Some(Key::Escape),
        _ => None,
    }
}

/// Event for a clicked keypad button
pub fn keypad_event(label: &str) -> Option<CalcEvent> {
    match label {
        "C" => Some(CalcEvent::Clear),
        "⌫" => Some(CalcEvent::DeleteLast),
        "=" => Some(CalcEvent::Evaluate),
        _ => {
            let mut chars = label.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(CalcEvent::Append(c)),
                _ => None,
            }
        }
    }
}

/// Lay the keypad buttons out over `area`
///
/// Buttons are one row tall with a blank row between keypad rows when
/// there is room.
pub fn keypad_cells(area: Rect) -> Vec<(Rect, &'static str)> {
    let cols = KEYPAD[0].len() as u16;
    let rows = KEYPAD.len() as u16;
    if area.width < cols || area.height < rows {
        return Vec::new();
    }

    let cell_width = area.width / cols;
    let row_step = if area.height >= rows * 2 { 2 } else { 1 };

    let mut cells = Vec::with_capacity(KEYPAD.len() * KEYPAD[0].len());
    for (r, row) in KEYPAD.iter().enumerate() {
        for (c, label) in row.iter().enumerate() {
            let rect = Rect::new(
                area.x + c as u16 * cell_width,
                area.y + r as u16 * row_step,
                cell_width,
                1,
            );
            cells.push((rect, *label));
        }
    }
    cells
}

/// Label of the keypad button under a terminal position
pub fn hit_test(cells: &[(Rect, &'static str)], column: u16, row: u16) -> Option<&'static str> {
    cells
        .iter()
        .find(|(rect, _)| {
            column >= rect.x
                && column < rect.x + rect.width
                && row >= rect.y
                && row < rect.y + rect.height
        })
        .map(|(_, label)| *label)
}
