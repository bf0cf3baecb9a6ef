//! Expression Buffer
//!
//! The live keypad input and its result annotation. The buffer is a small
//! state machine:
//!
//! ```text
//!            append                 evaluate (ok)
//!   Empty ──────────► Editing ──────────────────► Result
//!     ▲                  │  ▲                        │
//!     │ clear            │  └──── append (fresh) ────┤
//!     │                  │ evaluate (err)            │
//!     └──────────────── Error ◄──────────────────────┘
//! ```
//!
//! Appending from `Empty`, `Result` or `Error` starts a fresh input; only
//! `Editing` concatenates. A display of `"0"` is always `Empty`, so a typed
//! or backspaced-to zero is replaced by the next token. Malformed input is
//! accepted at append time and surfaces only when evaluated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::evaluator::{self, EvalError};

/// Display text of the empty buffer
pub const EMPTY_DISPLAY: &str = "0";

/// Display text after a failed evaluation
pub const ERROR_DISPLAY: &str = "Error";

/// Multiplication glyph shown on the display
pub const MULTIPLY: char = '×';

/// Division glyph shown on the display
pub const DIVIDE: char = '÷';

/// Errors from buffer input
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Character is not a keypad token
    #[error("{0:?} is not a calculator token")]
    InvalidToken(char),
}

/// Where the buffer is in its lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferState {
    /// Display shows the `"0"` placeholder
    #[default]
    Empty,
    /// User is typing an expression
    Editing,
    /// Display holds the result of a successful evaluation
    Result,
    /// Last evaluation failed
    Error,
}

/// A successful evaluation, ready to be recorded in history
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    /// Display content that was evaluated
    pub expression: String,
    /// Formatted result
    pub result: String,
}

/// Check whether a character can be typed into the buffer
pub fn is_token(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | MULTIPLY | DIVIDE | '^' | '(' | ')')
}

/// Keypad input buffer with its expression label
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpressionBuffer {
    display: String,
    expression_label: String,
    state: BufferState,
}

impl Default for ExpressionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionBuffer {
    /// Create an empty buffer showing `"0"`
    pub fn new() -> Self {
        Self {
            display: EMPTY_DISPLAY.to_string(),
            expression_label: String::new(),
            state: BufferState::Empty,
        }
    }

    /// Current display text (never empty)
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Expression that produced the current display, e.g. `"7+3 ="`
    pub fn expression_label(&self) -> &str {
        &self.expression_label
    }

    /// Current state
    pub fn state(&self) -> BufferState {
        self.state
    }

    /// Append a keypad token
    pub fn append(&mut self, token: char) -> Result<(), BufferError> {
        if !is_token(token) {
            return Err(BufferError::InvalidToken(token));
        }

        match self.state {
            BufferState::Editing => self.display.push(token),
            BufferState::Empty | BufferState::Result | BufferState::Error => {
                self.display.clear();
                self.display.push(token);
            }
        }
        self.settle();
        Ok(())
    }

    /// Remove the last character, falling back to `"0"`
    ///
    /// The `"Error"` sentinel is dropped whole rather than edited.
    pub fn delete_last(&mut self) {
        if matches!(self.state, BufferState::Empty | BufferState::Error)
            || self.display.chars().count() <= 1
        {
            self.reset_display();
            return;
        }

        self.display.pop();
        self.settle();
    }

    /// Reset display and label
    pub fn clear(&mut self) {
        self.reset_display();
        self.expression_label.clear();
    }

    /// Evaluate the current display
    ///
    /// On success the display becomes the result and the label the
    /// expression; on failure the display shows [`ERROR_DISPLAY`] and the
    /// label is left as it was.
    pub fn evaluate(&mut self) -> Result<Evaluation, EvalError> {
        let expression = self.display.clone();

        match evaluator::calculate(&expression) {
            Ok(result) => {
                tracing::debug!(expression = %expression, result = %result, "Evaluated expression");
                self.expression_label = format!("{expression} =");
                self.display.clone_from(&result);
                self.state = BufferState::Result;
                Ok(Evaluation { expression, result })
            }
            Err(e) => {
                tracing::debug!(expression = %expression, error = %e, "Evaluation failed");
                self.display = ERROR_DISPLAY.to_string();
                self.state = BufferState::Error;
                Err(e)
            }
        }
    }

    /// Put a previous result back on the display
    pub fn restore(&mut self, expression_label: String, display: String) {
        self.expression_label = expression_label;
        if display.is_empty() {
            self.reset_display();
        } else {
            self.display = display;
            self.state = BufferState::Result;
        }
    }

    /// A `"0"` display is the empty buffer, however it was reached
    fn settle(&mut self) {
        self.state = if self.display == EMPTY_DISPLAY {
            BufferState::Empty
        } else {
            BufferState::Editing
        };
    }

    fn reset_display(&mut self) {
        self.display = EMPTY_DISPLAY.to_string();
        self.state = BufferState::Empty;
    }
}
