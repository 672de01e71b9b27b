//! File-backed store for the conversation identifier.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Fixed session file name in the working directory.
pub const SESSION_FILE: &str = "wopr_session.json";

/// On-disk record. Exactly one field.
#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    session_id: String,
}

/// Failures involving a session file that exists but cannot be used.
///
/// An absent file is not an error; `load` reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not a valid record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Persists the single conversation identifier across process runs.
///
/// The identifier ties successive invocations to one server-side
/// conversation; whatever the service returns last wins.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store over `path`, defaulting to [`SESSION_FILE`] in the
    /// working directory.
    pub fn new(path: Option<PathBuf>) -> Self {
        SessionStore {
            path: path.unwrap_or_else(|| PathBuf::from(SESSION_FILE)),
        }
    }

    /// Read the persisted identifier.
    ///
    /// Absent file reads as `Ok(None)`. A file that exists but is unreadable
    /// or not a valid record is an `Err`; callers decide what that means
    /// (the dispatcher logs it and proceeds as if no identifier were
    /// stored).
    pub fn load(&self) -> Result<Option<String>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let record: SessionRecord = serde_json::from_str(&content)?;
        Ok(Some(record.session_id))
    }

    /// Overwrite the file with `session_id`. Total replacement, never a
    /// merge.
    pub fn save(&self, session_id: &str) -> Result<(), StoreError> {
        let record = SessionRecord {
            session_id: session_id.to_string(),
        };
        std::fs::write(&self.path, serde_json::to_string(&record)?)?;
        debug!(path = %self.path.display(), "saved session identifier");
        Ok(())
    }

    /// Delete the file. A missing file is a no-op, and removal failures are
    /// logged rather than returned, so callers can always clear.
    pub fn clear(&self) {
        if !self.path.exists() {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "cleared session file"),
            Err(e) => warn!(path = %self.path.display(), "failed to remove session file: {e}"),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(Some(dir.path().join(SESSION_FILE)))
    }

    #[test]
    fn load_absent_file_is_none() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();

        store_in(&dir).save("abc123").unwrap();

        // A fresh store over the same path observes the value.
        let loaded = store_in(&dir).load().unwrap();
        assert_eq!(loaded.as_deref(), Some("abc123"));
    }

    #[test]
    fn save_overwrites_previous_identifier() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.save("first").unwrap();
        store.save("second").unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        // Clearing a store with no file never fails.
        store.clear();
        store.clear();
        assert!(store.load().unwrap().is_none());

        store.save("abc").unwrap();
        store.clear();
        store.clear();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn malformed_file_is_reported_distinctly() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        std::fs::write(store.path(), "not json {{{").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        std::fs::write(store.path(), r#"{"token": "abc"}"#).unwrap();
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn file_format_on_disk() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.save("abc123").unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(raw, serde_json::json!({"session_id": "abc123"}));
    }
}
