//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin surface over the
//! calculator core:
//! - Event loop (keyboard, mouse)
//! - Translating input into `CalcEvent`s
//! - Polling the in-flight assistant request every frame
//! - Rendering the keypad, side panel and status bar

use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs};
use ratatui::{Frame, Terminal};

use auracalc_core::{map_key, CalcError, CalcEvent, Calculator, LlmBackend, SubmitError};

use crate::input::{hit_test, keypad_cells, keypad_event, to_core_key, Focus, SideTab};
use crate::theme::{
    self, AURA_INDIGO, DIM_GRAY, ERROR_RED, KEY_ACTION, KEY_NUMBER, KEY_OPERATOR, NOTICE_YELLOW,
    USER_GREEN,
};
use crate::widgets::{ChatBlock, ChatBlockState};

/// Keypad panel width (columns)
const KEYPAD_WIDTH: u16 = 36;

/// Assistant input box height (lines, including borders)
const INPUT_HEIGHT: u16 = 3;

/// Upper bound on how long a frame waits for input
const FRAME_TICK: Duration = Duration::from_millis(16);

/// Lines scrolled per PgUp/PgDn or wheel step in the chat
const SCROLL_STEP: usize = 3;

/// Shown in the empty assistant input
const INPUT_PLACEHOLDER: &str = "Ask a word problem...";

/// Shown when the history log is empty
const EMPTY_HISTORY: &str = "No recent calculations";

/// Main application state
pub struct App<B: LlmBackend> {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// The headless calculator
    calculator: Calculator<B>,
    /// Model name for the status bar
    model: String,

    // === Focus ===
    /// Panel receiving keyboard input
    focus: Focus,
    /// Visible side panel tab
    tab: SideTab,

    // === Input State ===
    /// Assistant question being typed
    assistant_input: String,
    /// Highlighted history row
    history_cursor: usize,
    /// Chat scroll state
    chat: ChatBlockState,
    /// Last rejected action, cleared on the next key
    notice: Option<String>,

    // === Layout ===
    /// Keypad buttons from the last render, for mouse hit testing
    keypad: Vec<(Rect, &'static str)>,
}

impl<B: LlmBackend + 'static> App<B> {
    /// Create a new App around a calculator
    pub fn new(calculator: Calculator<B>, model: impl Into<String>) -> Self {
        Self {
            running: true,
            calculator,
            model: model.into(),
            focus: Focus::default(),
            tab: SideTab::default(),
            assistant_input: String::new(),
            history_cursor: 0,
            chat: ChatBlockState::default(),
            notice: None,
            keypad: Vec::new(),
        }
    }

    /// The calculator behind this surface
    pub fn calculator(&self) -> &Calculator<B> {
        &self.calculator
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Panel receiving keyboard input
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Visible side panel tab
    pub fn tab(&self) -> SideTab {
        self.tab
    }

    /// Assistant question being typed
    pub fn assistant_input(&self) -> &str {
        &self.assistant_input
    }

    /// Last rejected action, if any
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Main event loop
    pub async fn run<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        // ~30 FPS is plenty for a calculator
        let frame_duration = Duration::from_millis(33);

        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    // Only handle Press events (not Release or Repeat)
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Some(Ok(Event::Mouse(mouse))) => self.handle_mouse(mouse),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                    None => {
                        tracing::info!("Terminal event stream closed");
                        self.running = false;
                    }
                },

                _ = tokio::time::sleep(FRAME_TICK) => {}
            }

            self.update();
            self.render(terminal)?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                tokio::time::sleep(frame_duration - elapsed).await;
            }
        }

        Ok(())
    }

    /// Pick up the assistant reply if it has arrived
    pub fn update(&mut self) {
        if self.calculator.poll_assistant() {
            self.chat.scroll_to_bottom();
        }
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.notice = None;

        match key.code {
            // Quit
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            // Move focus between keypad and side panel
            KeyCode::Tab => self.focus = self.focus.toggled(),

            // Switch side panel tab
            KeyCode::BackTab => {
                self.tab = self.tab.toggled();
                self.focus = Focus::Side;
            }

            _ => match (self.focus, self.tab) {
                (Focus::Keypad, _) => self.handle_keypad_key(key),
                (Focus::Side, SideTab::Assistant) => self.handle_assistant_key(key),
                (Focus::Side, SideTab::History) => self.handle_history_key(key),
            },
        }
    }

    fn handle_keypad_key(&mut self, key: KeyEvent) {
        if let Some(event) = to_core_key(key).and_then(map_key) {
            self.dispatch(event);
        }
    }

    fn handle_assistant_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let question = std::mem::take(&mut self.assistant_input);
                match self
                    .calculator
                    .handle_event(CalcEvent::SubmitAssistant(question.clone()))
                {
                    Ok(()) => self.chat.scroll_to_bottom(),
                    Err(e) => {
                        // Keep the text so it can be sent once the reply lands
                        self.assistant_input = question;
                        self.report(&e);
                    }
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.assistant_input.push(c);
            }
            KeyCode::Backspace => {
                self.assistant_input.pop();
            }
            KeyCode::PageUp | KeyCode::Up => self.chat.scroll_up(SCROLL_STEP),
            KeyCode::PageDown | KeyCode::Down => self.chat.scroll_down(SCROLL_STEP),
            KeyCode::Left | KeyCode::Right => self.tab = self.tab.toggled(),
            KeyCode::Esc => self.focus = Focus::Keypad,
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        let len = self.calculator.history().len();

        match key.code {
            KeyCode::Up => self.history_cursor = self.history_cursor.saturating_sub(1),
            KeyCode::Down if len > 0 => {
                self.history_cursor = (self.history_cursor + 1).min(len - 1);
            }
            KeyCode::Enter => {
                let selected = self
                    .calculator
                    .history()
                    .get_index(self.history_cursor)
                    .map(|entry| entry.id.clone());
                if let Some(id) = selected {
                    self.dispatch(CalcEvent::SelectHistory(id));
                    self.focus = Focus::Keypad;
                }
            }
            KeyCode::Delete => {
                self.dispatch(CalcEvent::ClearHistory);
                self.history_cursor = 0;
            }
            KeyCode::Left | KeyCode::Right => self.tab = self.tab.toggled(),
            KeyCode::Esc => self.focus = Focus::Keypad,
            _ => {}
        }
    }

    /// Handle mouse input
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(event) = hit_test(&self.keypad, mouse.column, mouse.row)
                    .and_then(keypad_event)
                {
                    self.notice = None;
                    self.focus = Focus::Keypad;
                    self.dispatch(event);
                }
            }
            MouseEventKind::ScrollUp if self.tab == SideTab::Assistant => {
                self.chat.scroll_up(SCROLL_STEP);
            }
            MouseEventKind::ScrollDown if self.tab == SideTab::Assistant => {
                self.chat.scroll_down(SCROLL_STEP);
            }
            _ => {}
        }
    }

    /// Send an event to the calculator, surfacing rejections
    fn dispatch(&mut self, event: CalcEvent) {
        if let Err(e) = self.calculator.handle_event(event) {
            self.report(&e);
        }
    }

    fn report(&mut self, error: &CalcError) {
        let notice = match error {
            CalcError::Submit(SubmitError::Busy) => "Still thinking about the last question".into(),
            CalcError::Submit(SubmitError::EmptyInput) => "Type a question first".into(),
            other => other.to_string(),
        };
        tracing::debug!(%notice, "Action rejected");
        self.notice = Some(notice);
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render the UI
    pub fn render<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    /// Draw one frame
    pub fn draw(&mut self, frame: &mut Frame) {
        let [header, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let [keypad, side] =
            Layout::horizontal([Constraint::Length(KEYPAD_WIDTH), Constraint::Min(20)])
                .areas(body);

        self.draw_header(frame, header);
        self.draw_keypad(frame, keypad);
        self.draw_side(frame, side);
        self.draw_status(frame, status);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(" AuraCalc ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("AI", theme::title()),
            Span::styled("  Scientific & Assistant", Style::default().fg(DIM_GRAY)),
        ]);
        frame.render_widget(Paragraph::new(title), area);
    }

    fn draw_keypad(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::panel_border(self.focus == Focus::Keypad));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [label, display, _, buttons] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(5),
        ])
        .areas(inner);

        let snapshot_label = self.calculator.buffer().expression_label();
        frame.render_widget(
            Paragraph::new(snapshot_label)
                .alignment(Alignment::Right)
                .style(Style::default().fg(DIM_GRAY)),
            label,
        );

        let display_text = self.calculator.buffer().display();
        let display_style = match self.calculator.buffer().state() {
            auracalc_core::BufferState::Error => Style::default().fg(ERROR_RED),
            _ => Style::default(),
        }
        .add_modifier(Modifier::BOLD);
        frame.render_widget(
            Paragraph::new(display_text)
                .alignment(Alignment::Right)
                .style(display_style),
            display,
        );

        self.keypad = keypad_cells(buttons);
        for (rect, label) in &self.keypad {
            let color = match *label {
                "C" | "⌫" => KEY_ACTION,
                "=" => AURA_INDIGO,
                l if l.chars().all(|c| c.is_ascii_digit() || c == '.') => KEY_NUMBER,
                _ => KEY_OPERATOR,
            };
            frame.render_widget(
                Paragraph::new(format!("[ {label} ]"))
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(color)),
                *rect,
            );
        }
    }

    fn draw_side(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::panel_border(self.focus == Focus::Side));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [tabs, content] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(inner);

        frame.render_widget(
            Tabs::new(SideTab::TITLES)
                .select(self.tab.index())
                .style(Style::default().fg(DIM_GRAY))
                .highlight_style(theme::title()),
            tabs,
        );

        match self.tab {
            SideTab::Assistant => self.draw_assistant(frame, content),
            SideTab::History => self.draw_history(frame, content),
        }
    }

    fn draw_assistant(&mut self, frame: &mut Frame, area: Rect) {
        let [chat, input] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(INPUT_HEIGHT)]).areas(area);

        let session = self.calculator.session();
        frame.render_stateful_widget(
            ChatBlock::new(session.messages()).thinking(session.is_pending()),
            chat,
            &mut self.chat,
        );

        let focused = self.focus == Focus::Side;
        let text = if self.assistant_input.is_empty() {
            Line::styled(INPUT_PLACEHOLDER, Style::default().fg(DIM_GRAY))
        } else if focused {
            Line::styled(format!("{}_", self.assistant_input), Style::default().fg(USER_GREEN))
        } else {
            Line::styled(self.assistant_input.as_str(), Style::default().fg(USER_GREEN))
        };
        frame.render_widget(
            Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme::panel_border(focused)),
            ),
            input,
        );
    }

    fn draw_history(&mut self, frame: &mut Frame, area: Rect) {
        let history = self.calculator.history();
        if history.is_empty() {
            frame.render_widget(
                Paragraph::new(EMPTY_HISTORY)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(DIM_GRAY).add_modifier(Modifier::ITALIC)),
                area,
            );
            return;
        }

        self.history_cursor = self.history_cursor.min(history.len() - 1);

        let items: Vec<ListItem> = history
            .iter()
            .map(|entry| {
                ListItem::new(vec![
                    Line::styled(entry.label(), Style::default().fg(DIM_GRAY)),
                    Line::styled(
                        entry.result.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            })
            .collect();

        let selected = (self.focus == Focus::Side).then_some(self.history_cursor);
        let mut state = ListState::default().with_selected(selected);
        frame.render_stateful_widget(
            List::new(items).highlight_style(Style::default().fg(AURA_INDIGO)),
            area,
            &mut state,
        );
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(notice) = &self.notice {
            Line::styled(format!(" {notice}"), Style::default().fg(NOTICE_YELLOW))
        } else {
            let hints = match (self.focus, self.tab) {
                (Focus::Keypad, _) => "Enter/= evaluate | Esc clear | Tab panel",
                (Focus::Side, SideTab::Assistant) => "Enter ask | PgUp/PgDn scroll | Tab keypad",
                (Focus::Side, SideTab::History) => "Enter restore | Del clear | Tab keypad",
            };
            let state = if self.calculator.is_pending() {
                "Thinking"
            } else {
                "Ready"
            };
            Line::styled(
                format!(" {state} | {hints} | Shift+Tab switch tab | Ctrl+C quit | {}", self.model),
                Style::default().fg(DIM_GRAY),
            )
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}
