//! Shared CLI helpers — line printing and data paths.

use std::path::PathBuf;

use colored::Colorize;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing::debug;

use crate::dispatch::{LineKind, OutputLine};

/// Print one dispatched output line; error lines go out in red.
pub fn print_line(line: &OutputLine) {
    match line.kind {
        LineKind::Normal => println!("{}", line.text),
        LineKind::Error => println!("{}", line.text.red()),
    }
}

/// The WOPR data directory (`~/.wopr/`).
pub fn data_path() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wopr")
}

/// Path to the input history file.
pub fn history_path() -> PathBuf {
    data_path().join("history").join("cli_history")
}

/// Save input history to disk; failures are debug-level noise only.
pub fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
