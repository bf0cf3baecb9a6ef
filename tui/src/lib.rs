//! AuraCalc TUI - Terminal interface for AuraCalc
//!
//! A full-screen keypad calculator with a math assistant side panel. All
//! calculator behavior lives in `auracalc-core`; this crate only translates
//! terminal input into events and draws the core's state.
//!
//! # Architecture
//!
//! - **App**: Event loop, focus handling and rendering
//! - **Input**: Key translation and keypad layout
//! - **Widgets**: Bottom-anchored chat transcript
//! - **Theme**: Indigo palette and panel styles

pub mod app;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::App;
