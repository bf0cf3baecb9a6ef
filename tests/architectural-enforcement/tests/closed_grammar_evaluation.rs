//! Integration Test: Closed-Grammar Evaluation
//!
//! **Policy**: Display text is only ever evaluated by the built-in
//! arithmetic parser. No process spawning, no scripting engines, no
//! expression-evaluation crates and no unsafe code in the core.

use std::fs;

use architectural_enforcement::{assert_clean, scan, workspace_root};

const EVAL_CRATES: [&str; 5] = ["evalexpr", "meval", "rhai", "mlua", "boa_engine"];

#[test]
fn test_core_never_spawns_processes() {
    let violations = scan("calculator/core/src", |_, lines, idx| {
        let code = &lines[idx].1;
        code.contains("Command::new") || code.contains("std::process")
    });
    assert_clean("calculator core never spawns processes", &violations);
}

#[test]
fn test_core_has_no_unsafe() {
    let violations = scan("calculator/core/src", |_, lines, idx| {
        lines[idx].1.contains("unsafe ")
    });
    assert_clean("calculator core has no unsafe code", &violations);
}

#[test]
fn test_no_expression_engine_dependencies() {
    for manifest in ["calculator/core/Cargo.toml", "tui/Cargo.toml"] {
        let content = fs::read_to_string(workspace_root().join(manifest))
            .expect("manifest should be readable");

        for krate in EVAL_CRATES {
            assert!(
                !content
                    .lines()
                    .any(|line| line.trim_start().starts_with(krate)),
                "{manifest} must not depend on {krate}"
            );
        }
    }
}

#[test]
fn test_evaluator_is_the_only_parser() {
    let evaluator = workspace_root().join("calculator/core/src/evaluator.rs");
    let content = fs::read_to_string(evaluator).expect("evaluator should exist");

    assert!(content.contains("struct Parser"));
    assert!(content.contains("fn tokenize"));
}
