//! Keyboard Mapping
//!
//! Physical keys to calculator events. Surfaces translate their own key
//! type into [`Key`] and call [`map_key`].

use crate::buffer::{DIVIDE, MULTIPLY};
use crate::events::CalcEvent;

/// Framework-independent key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A printable character
    Char(char),
    /// Enter / Return
    Enter,
    /// Backspace
    Backspace,
    /// Escape
    Escape,
}

/// Map a key press to a keypad event
///
/// Digits, `.`, `+`, `-`, `^` and parentheses pass through, `*` and `/`
/// become `×` and `÷`, Enter and `=` evaluate, Backspace deletes and Escape
/// clears. Any other key maps to `None`.
pub fn map_key(key: Key) -> Option<CalcEvent> {
    match key {
        Key::Enter | Key::Char('=') => Some(CalcEvent::Evaluate),
        Key::Backspace => Some(CalcEvent::DeleteLast),
        Key::Escape => Some(CalcEvent::Clear),
        Key::Char('*') => Some(CalcEvent::Append(MULTIPLY)),
        Key::Char('/') => Some(CalcEvent::Append(DIVIDE)),
        Key::Char(c) if c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | '^' | '(' | ')') => {
            Some(CalcEvent::Append(c))
        }
        Key::Char(_) => None,
    }
}
