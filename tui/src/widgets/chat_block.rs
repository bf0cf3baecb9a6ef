//! ChatBlock Widget
//!
//! A borderless, bottom-anchored transcript of the assistant conversation.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

use auracalc_core::{AssistantMessage, MessageRole};

use crate::theme::{AURA_INDIGO_SOFT, DIM_GRAY, USER_GREEN};

/// Shown under the transcript while a reply is in flight
pub const THINKING: &str = "Thinking...";

/// Scroll state for a chat block
#[derive(Debug, Default)]
pub struct ChatBlockState {
    /// Scroll offset (lines from bottom, 0 = latest)
    pub scroll_offset: usize,
    /// Total wrapped lines at the last render
    pub total_lines: usize,
}

impl ChatBlockState {
    /// Scroll towards older messages
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = (self.scroll_offset + lines).min(self.total_lines.saturating_sub(1));
    }

    /// Scroll towards newer messages
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Jump to the latest message
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }
}

/// Assistant transcript widget
pub struct ChatBlock<'a> {
    messages: &'a [AssistantMessage],
    thinking: bool,
}

impl<'a> ChatBlock<'a> {
    /// Create a transcript over the session's messages
    pub fn new(messages: &'a [AssistantMessage]) -> Self {
        Self {
            messages,
            thinking: false,
        }
    }

    /// Append the thinking indicator
    pub fn thinking(mut self, thinking: bool) -> Self {
        self.thinking = thinking;
        self
    }

    fn lines(&self, width: usize) -> Vec<(String, Style)> {
        let mut lines = Vec::new();

        for msg in self.messages {
            let (prefix, style) = match msg.role {
                MessageRole::User => ("You: ", Style::default().fg(USER_GREEN)),
                MessageRole::Assistant => ("Aura: ", Style::default().fg(AURA_INDIGO_SOFT)),
            };

            // Model answers are multi-line; keep their line breaks
            let content = format!("{prefix}{}", msg.content);
            for line in content.lines() {
                if line.is_empty() {
                    lines.push((String::new(), style));
                    continue;
                }
                for wrapped in wrap(line, width) {
                    lines.push((wrapped.into_owned(), style));
                }
            }
            lines.push((String::new(), Style::default()));
        }

        if self.thinking {
            lines.push((
                THINKING.to_string(),
                Style::default().fg(DIM_GRAY).add_modifier(Modifier::ITALIC),
            ));
        }

        lines
    }
}

impl StatefulWidget for ChatBlock<'_> {
    type State = ChatBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let lines = self.lines(area.width as usize);
        state.total_lines = lines.len();

        // Clamp scroll
        let height = area.height as usize;
        let max_scroll = state.total_lines.saturating_sub(height);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        let visible_end = state.total_lines - state.scroll_offset;
        let visible_start = visible_end.saturating_sub(height);

        for (i, (line, style)) in lines[visible_start..visible_end].iter().enumerate() {
            let y = area.y + i as u16;
            buf.set_stringn(area.x, y, line, area.width as usize, *style);
        }
    }
}
