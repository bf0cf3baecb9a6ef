//! Custom Widgets

mod chat_block;

pub use chat_block::{ChatBlock, ChatBlockState};
