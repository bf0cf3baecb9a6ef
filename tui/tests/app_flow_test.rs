//! App flow tests
//!
//! Drive the App with key events and a headless terminal, the way a user
//! would, against an instantly-answering backend.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use auracalc_core::{
    AssistantConfig, Calculator, LlmBackend, LlmRequest, LlmResponse, MessageRole,
};
use auracalc_tui::input::Focus;
use auracalc_tui::App;

/// Backend that answers immediately
struct InstantBackend;

#[async_trait::async_trait]
impl LlmBackend for InstantBackend {
    fn name(&self) -> &str {
        "Instant"
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse> {
        Ok(LlmResponse {
            content: format!("The answer to \"{}\" is 4.", request.prompt),
            model: request.model.clone(),
            tokens_used: Some(8),
            duration_ms: Some(1),
        })
    }
}

fn new_app() -> App<InstantBackend> {
    let config = AssistantConfig::default();
    App::new(
        Calculator::from_config(InstantBackend, &config),
        config.model.clone(),
    )
}

fn press(app: &mut App<InstantBackend>, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App<InstantBackend>, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn rendered(app: &mut App<InstantBackend>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(110, 32)).unwrap();
    app.render(&mut terminal).unwrap();
    let buffer = terminal.backend().buffer().clone();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

#[test]
fn test_question_reply_reaches_transcript() {
    tokio_test::block_on(async {
        let mut app = new_app();

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Side);
        type_text(&mut app, "What is 2+2?");
        press(&mut app, KeyCode::Enter);
        assert!(app.calculator().is_pending());
        assert!(rendered(&mut app).contains("Thinking..."));

        for _ in 0..100 {
            tokio::task::yield_now().await;
            app.update();
            if !app.calculator().is_pending() {
                break;
            }
        }

        assert!(!app.calculator().is_pending());
        let last = app.calculator().session().last_message().unwrap();
        assert_eq!(last.role, MessageRole::Assistant);
        assert_eq!(last.content, "The answer to \"What is 2+2?\" is 4.");

        let screen = rendered(&mut app);
        assert!(screen.contains("You: What is 2+2?"));
        assert!(!screen.contains("Thinking..."));
    });
}

#[test]
fn test_escape_clears_then_error_recovers() {
    let mut app = new_app();

    type_text(&mut app, "9/0");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.calculator().buffer().display(), "Error");
    assert!(rendered(&mut app).contains("Error"));

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.calculator().buffer().display(), "0");
    assert_eq!(app.calculator().buffer().expression_label(), "");

    type_text(&mut app, "(1+2)^2");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.calculator().buffer().display(), "9");
}

#[test]
fn test_backspace_edits_display() {
    let mut app = new_app();
    type_text(&mut app, "123");
    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.calculator().buffer().display(), "12");

    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.calculator().buffer().display(), "0");
}

#[test]
fn test_letters_are_ignored_on_keypad() {
    let mut app = new_app();
    type_text(&mut app, "a1b");
    assert_eq!(app.calculator().buffer().display(), "1");
    assert_eq!(app.notice(), None);
}
