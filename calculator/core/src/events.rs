//! Surface Events
//!
//! Events sent from UI surfaces to the [`Calculator`](crate::Calculator).
//! Surfaces only report what the user did; the calculator decides what it
//! means.

use serde::{Deserialize, Serialize};

use crate::history::EntryId;

/// Events from a UI surface to the calculator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalcEvent {
    /// Keypad token pressed (digit, `.`, operator or parenthesis)
    Append(char),
    /// Backspace
    DeleteLast,
    /// Clear the display and expression label
    Clear,
    /// `=` pressed
    Evaluate,
    /// History entry picked
    SelectHistory(EntryId),
    /// Wipe the history log
    ClearHistory,
    /// Question typed into the assistant panel
    SubmitAssistant(String),
}
