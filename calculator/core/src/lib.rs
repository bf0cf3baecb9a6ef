//! AuraCalc Core - Headless Calculator Engine and Math Assistant
//!
//! This crate holds all calculator behavior, independent of any UI framework.
//! The terminal UI is one surface over it; tests drive it headless.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         UI Surfaces                           │
//! │        ┌─────────────┐              ┌──────────────────┐      │
//! │        │     TUI     │              │ Headless / Tests │      │
//! │        │  (ratatui)  │              │                  │      │
//! │        └──────┬──────┘              └────────┬─────────┘      │
//! │               └──────────────┬───────────────┘                │
//! │                   CalcEvent (up)                              │
//! │                   CalculatorSnapshot (down)                   │
//! └──────────────────────────────┼────────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┼────────────────────────────────┐
//! │                        AURACALC CORE                          │
//! │  ┌───────────────────────────┴──────────────────────────────┐ │
//! │  │                       Calculator                          │ │
//! │  │  ┌────────────┐  ┌─────────┐  ┌───────────┐  ┌─────────┐  │ │
//! │  │  │ Expression │  │ History │  │ Assistant │  │ Solver  │  │ │
//! │  │  │  Buffer    │  │   Log   │  │  Session  │  │  (LLM)  │  │ │
//! │  │  └─────┬──────┘  └─────────┘  └───────────┘  └─────────┘  │ │
//! │  │        │                                                  │ │
//! │  │  ┌─────┴──────┐                                           │ │
//! │  │  │ Evaluator  │                                           │ │
//! │  │  └────────────┘                                           │ │
//! │  └──────────────────────────────────────────────────────────┘ │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Calculator`]: Owns the buffer, history and assistant session
//! - [`CalcEvent`]: Events sent from UI surfaces to the calculator
//! - [`ExpressionBuffer`]: Display text and its Empty/Editing/Result/Error state
//! - [`HistoryLog`]: The 50 most recent successful evaluations, newest first
//! - [`AssistantSession`]: Chat transcript with at most one request in flight
//! - [`Solver`]: Turns an assistant question into reply text, never an error
//!
//! # Quick Start
//!
//! ```ignore
//! use auracalc_core::{backend::GeminiBackend, CalcEvent, Calculator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = auracalc_core::load_config()?;
//!     let backend = GeminiBackend::from_config(&config.assistant)?;
//!     let mut calc = Calculator::from_config(backend, &config.assistant);
//!
//!     for c in "12×3".chars() {
//!         calc.handle_event(CalcEvent::Append(c))?;
//!     }
//!     calc.handle_event(CalcEvent::Evaluate)?;
//!     assert_eq!(calc.snapshot().display, "36");
//!
//!     calc.handle_event(CalcEvent::SubmitAssistant("Derivative of x^2?".into()))?;
//!     calc.wait_for_assistant().await;
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`backend`]: LLM backend abstraction, Gemini client and the solver
//! - [`buffer`]: Expression buffer state machine
//! - [`calculator`]: Main Calculator struct
//! - [`config`]: TOML configuration with env and CLI overrides
//! - [`evaluator`]: Arithmetic parser and result formatting
//! - [`events`]: Events from UI surfaces to the calculator
//! - [`history`]: Bounded history log
//! - [`keymap`]: Physical keys to calculator events
//! - [`session`]: Assistant conversation
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod buffer;
pub mod calculator;
pub mod config;
pub mod evaluator;
pub mod events;
pub mod history;
pub mod keymap;
pub mod session;

// Re-exports for convenience
pub use backend::{GeminiBackend, LlmBackend, LlmRequest, LlmResponse, Solver};
pub use buffer::{BufferError, BufferState, Evaluation, ExpressionBuffer};
pub use calculator::{CalcError, Calculator, CalculatorSnapshot};
pub use evaluator::{calculate, format_number, EvalError};
pub use events::CalcEvent;
pub use history::{EntryId, HistoryEntry, HistoryLog, HISTORY_CAPACITY};
pub use keymap::{map_key, Key};
pub use session::{
    AssistantMessage, AssistantSession, MessageId, MessageRole, SessionState, SubmitError,
};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, AssistantConfig, AuraCalcConfig,
    AuraCalcToml, ConfigError, ConfigOverrides, ConfigSource,
};
