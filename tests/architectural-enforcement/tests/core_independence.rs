//! Integration Test: Headless Core
//!
//! **Policy**: `auracalc-core` is pure calculator logic. It must not import
//! or depend on any UI framework, so any surface (or a test) can drive it.

use std::fs;

use architectural_enforcement::{assert_clean, scan, workspace_root};

const UI_CRATES: [&str; 4] = ["ratatui", "crossterm", "textwrap", "auracalc_tui"];

#[test]
fn test_core_source_has_no_ui_imports() {
    let violations = scan("calculator/core/src", |_, lines, idx| {
        let code = &lines[idx].1;
        UI_CRATES
            .iter()
            .any(|krate| code.contains(&format!("{krate}::")))
    });
    assert_clean("calculator core never imports UI crates", &violations);
}

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("calculator/core/Cargo.toml"))
        .expect("core manifest should be readable");

    for krate in ["ratatui", "crossterm", "auracalc-tui"] {
        assert!(
            !manifest
                .lines()
                .any(|line| line.trim_start().starts_with(krate)),
            "calculator/core/Cargo.toml must not depend on {krate}"
        );
    }
}

#[test]
fn test_core_does_not_print() {
    let violations = scan("calculator/core/src", |_, lines, idx| {
        let code = &lines[idx].1;
        code.contains("println!") || code.contains("eprintln!")
    });
    assert_clean("calculator core logs through tracing, never stdout", &violations);
}
