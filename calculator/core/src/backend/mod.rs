//! LLM Backend Integration
//!
//! Abstracted access to the hosted model behind the math assistant, plus the
//! [`Solver`] that turns any backend outcome into display text.
//!
//! # Available Backends
//!
//! - **Gemini**: Google `generateContent` API (default)
//!
//! # Usage
//!
//! ```ignore
//! use auracalc_core::backend::{GeminiBackend, Solver};
//! use auracalc_core::config::AssistantConfig;
//!
//! let config = AssistantConfig::default();
//! let solver = Solver::from_config(GeminiBackend::from_config(&config)?, &config);
//! let answer = solver.solve("What is 15% of 80?").await;
//! ```

mod gemini;
mod solver;
mod traits;

pub use gemini::{GeminiBackend, DEFAULT_BASE_URL};
pub use solver::{Solver, EMPTY_REPLY, FAILURE_REPLY, SYSTEM_INSTRUCTION};
pub use traits::{LlmBackend, LlmRequest, LlmResponse};
