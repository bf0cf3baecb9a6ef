//! Architectural Enforcement Integration Tests
//!
//! Source-scanning tests that keep the workspace honest:
//! - The calculator core never depends on a UI framework
//! - Expressions are only evaluated by the built-in parser
//! - No sleep() calls outside TUI frame limiting
//!
//! This library holds the shared scanning helpers; the checks themselves
//! live in `tests/`.

use std::fs;
use std::path::{Path, PathBuf};

/// A source line that broke a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File containing the line
    pub path: PathBuf,
    /// 1-based line number
    pub line_number: usize,
    /// The offending line, trimmed
    pub line: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line_number, self.line)
    }
}

/// Workspace root, independent of the directory tests run from
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// All `.rs` files below `dir` (relative to the workspace root)
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    if !path.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Production lines of a source file as `(line_number, code)`
///
/// Line comments are stripped and scanning stops at the first
/// `#[cfg(test)]`, since test modules sit at the bottom of each file.
pub fn production_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("#[cfg(test)]") {
            break;
        }
        if trimmed.starts_with("//") {
            continue;
        }

        let code = line.split("//").next().unwrap_or(line);
        lines.push((idx + 1, code.to_string()));
    }

    lines
}

/// Scan production code under `dir` for lines matching `is_violation`
///
/// `is_violation` receives the file path, every production line of the file
/// (for context checks) and the index of the line being judged.
pub fn scan<F>(dir: &str, is_violation: F) -> Vec<Violation>
where
    F: Fn(&Path, &[(usize, String)], usize) -> bool,
{
    let mut violations = Vec::new();

    for path in rust_files(dir) {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        let lines = production_lines(&content);

        for (idx, (line_number, code)) in lines.iter().enumerate() {
            if is_violation(&path, &lines, idx) {
                violations.push(Violation {
                    path: path.clone(),
                    line_number: *line_number,
                    line: code.trim().to_string(),
                });
            }
        }
    }

    violations
}

/// Panic with a readable report if any violations were found
pub fn assert_clean(rule: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\nArchitecture rule broken: {rule}\n");
    for violation in violations {
        eprintln!("  {violation}");
    }

    panic!("\nFound {} violation(s) of: {rule}", violations.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_tests() {
        let source = "fn a() {}\n// comment\nlet x = 1; // trailing\n#[cfg(test)]\nmod tests {}\n";
        let lines = production_lines(source);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (1, "fn a() {}".to_string()));
        assert_eq!(lines[1], (3, "let x = 1; ".to_string()));
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
        assert!(!rust_files("calculator/core/src").is_empty());
    }
}
