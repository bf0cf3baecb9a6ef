//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep methods. The assistant
//! reply arrives over a channel; nothing needs to wait on a timer.
//! **Exception**: frame rate limiting in the TUI event loop.

use std::path::Path;

use architectural_enforcement::{assert_clean, scan};

fn is_sleep_call(code: &str) -> bool {
    code.contains("::sleep(") || code.contains(".sleep(")
}

/// Frame limiting mentions the frame budget within a few lines
fn is_frame_limiting_context(lines: &[(usize, String)], idx: usize) -> bool {
    let start = idx.saturating_sub(10);
    let end = (idx + 5).min(lines.len());
    lines[start..end].iter().any(|(_, code)| {
        let code = code.to_lowercase();
        code.contains("frame") || code.contains("fps")
    })
}

#[test]
fn test_no_sleep_in_calculator_core() {
    let violations = scan("calculator/core/src", |_, lines, idx| {
        is_sleep_call(&lines[idx].1)
    });
    assert_clean("no sleep() in the calculator core", &violations);
}

#[test]
fn test_tui_sleeps_only_for_frame_limiting() {
    let violations = scan("tui/src", |path: &Path, lines, idx| {
        is_sleep_call(&lines[idx].1)
            && !(path.ends_with("tui/src/app.rs") && is_frame_limiting_context(lines, idx))
    });
    assert_clean("TUI sleeps only to limit the frame rate", &violations);
}

#[test]
fn test_no_blocking_thread_sleep_anywhere() {
    for dir in ["calculator/core/src", "tui/src"] {
        let violations = scan(dir, |_, lines, idx| lines[idx].1.contains("thread::sleep"));
        assert_clean("no std::thread::sleep in async code", &violations);
    }
}
