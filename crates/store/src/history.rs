//! The capped, persisted chat history.

use std::path::{Path, PathBuf};

use nebula_protocol::ChatTurn;
use tracing::warn;

use crate::error::{Result, StoreError};

/// Default number of turns kept in history before the oldest are evicted.
pub const DEFAULT_HISTORY_CAP: usize = 10;

/// Directory name under the platform data dir.
const DATA_DIR: &str = "nebula";

/// File name of the persisted history.
const HISTORY_FILE: &str = "history.json";

/// Returns the default history file path.
///
/// This is typically `~/.local/share/nebula/history.json` on Linux.
///
/// # Errors
///
/// Returns an error if the platform data directory cannot be determined.
///
/// # Examples
///
/// ```no_run
/// use nebula_store::default_history_path;
///
/// let path = default_history_path().unwrap();
/// println!("history lives at {}", path.display());
/// ```
pub fn default_history_path() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join(DATA_DIR).join(HISTORY_FILE))
        .ok_or(StoreError::NoDataDirectory)
}

/// The ordered chat history for one session.
///
/// Turns are appended in conversation order; once the retention cap is
/// exceeded the oldest turns are dropped first. Every mutation rewrites
/// the backing file (when one is configured), tolerating write failures.
///
/// # Examples
///
/// ```
/// use nebula_protocol::ChatTurn;
/// use nebula_store::MessageStore;
///
/// let mut store = MessageStore::in_memory(2);
/// store.append(ChatTurn::user("one"));
/// store.append(ChatTurn::assistant("two"));
/// store.append(ChatTurn::user("three"));
///
/// // Oldest turn evicted, relative order preserved.
/// let texts: Vec<_> = store.all().iter().map(|t| t.text.as_str()).collect();
/// assert_eq!(texts, ["two", "three"]);
/// ```
#[derive(Debug)]
pub struct MessageStore {
    turns: Vec<ChatTurn>,
    cap: usize,
    path: Option<PathBuf>,
}

impl MessageStore {
    /// Creates a store with no backing file.
    ///
    /// Used in tests and as the fallback when no data directory exists.
    /// A cap of zero is treated as one: an append must always be
    /// observable.
    #[must_use]
    pub fn in_memory(cap: usize) -> Self {
        Self {
            turns: Vec::new(),
            cap: cap.max(1),
            path: None,
        }
    }

    /// Opens a store backed by the given file.
    ///
    /// The file is read once; absent or corrupt contents reset the store
    /// to an empty sequence (with a warning) rather than failing. When
    /// the loaded history exceeds `cap`, only the most recent `cap` turns
    /// are kept.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, cap: usize) -> Self {
        let path = path.into();
        let cap = cap.max(1);
        let turns = load_turns(&path, cap);
        Self {
            turns,
            cap,
            path: Some(path),
        }
    }

    /// Returns the retention cap.
    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Returns all retained turns in conversation order.
    #[must_use]
    pub fn all(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Returns the number of retained turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if no turns are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Appends a turn, evicting the oldest turns beyond the cap, then
    /// persists the sequence best-effort.
    pub fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
        if self.turns.len() > self.cap {
            let excess = self.turns.len() - self.cap;
            self.turns.drain(..excess);
        }
        self.persist();
    }

    /// Empties the store and its backing file.
    ///
    /// The store accepts new turns immediately afterwards.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.persist();
    }

    /// Writes the current sequence to the backing file, if any.
    ///
    /// Failures are logged and swallowed; the in-memory sequence remains
    /// authoritative.
    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };

        if let Some(parent) = path.parent().filter(|p| !p.exists()) {
            if let Err(err) = std::fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %err, "could not create history directory");
                return;
            }
        }

        let json = match serde_json::to_string_pretty(&self.turns) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "could not serialize history");
                return;
            }
        };

        if let Err(err) = std::fs::write(path, json) {
            warn!(path = %path.display(), error = %err, "could not persist history");
        }
    }
}

/// Reads turns from disk, tolerating absent or corrupt data.
fn load_turns(path: &Path, cap: usize) -> Vec<ChatTurn> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not read history, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<ChatTurn>>(&content) {
        Ok(mut turns) => {
            if turns.len() > cap {
                let excess = turns.len() - cap;
                turns.drain(..excess);
            }
            turns
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "corrupt history, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_protocol::ChatRole;
    use tempfile::TempDir;

    fn texts(store: &MessageStore) -> Vec<String> {
        store.all().iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn append_and_all_preserve_order() {
        let mut store = MessageStore::in_memory(10);
        store.append(ChatTurn::user("hello"));
        store.append(ChatTurn::assistant("hi there"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].role, ChatRole::User);
        assert_eq!(store.all()[1].role, ChatRole::Assistant);
    }

    #[test]
    fn eviction_keeps_most_recent_in_order() {
        let mut store = MessageStore::in_memory(3);
        for i in 0..7 {
            store.append(ChatTurn::user(format!("turn {i}")));
        }

        assert_eq!(texts(&store), ["turn 4", "turn 5", "turn 6"]);
    }

    #[test]
    fn zero_cap_is_clamped() {
        let mut store = MessageStore::in_memory(0);
        store.append(ChatTurn::user("kept"));

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_leaves_store_usable() {
        let mut store = MessageStore::in_memory(10);
        store.append(ChatTurn::user("before"));
        store.clear();

        assert!(store.is_empty());

        store.append(ChatTurn::user("after"));
        assert_eq!(texts(&store), ["after"]);
    }

    #[test]
    fn open_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = MessageStore::open(dir.path().join("history.json"), 10);

        assert!(store.is_empty());
    }

    #[test]
    fn persist_and_reload_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        let mut store = MessageStore::open(&path, 10);
        store.append(ChatTurn::user("hello"));
        store.append(ChatTurn::assistant("**hi**"));

        let reloaded = MessageStore::open(&path, 10);
        assert_eq!(texts(&reloaded), ["hello", "**hi**"]);
        assert_eq!(reloaded.all()[1].role, ChatRole::Assistant);
    }

    #[test]
    fn persist_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("history.json");

        let mut store = MessageStore::open(&path, 10);
        store.append(ChatTurn::user("hello"));

        assert!(path.exists());
    }

    #[test]
    fn corrupt_file_resets_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = MessageStore::open(&path, 10);
        assert!(store.is_empty());
    }

    #[test]
    fn reload_trims_to_cap() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        let mut store = MessageStore::open(&path, 20);
        for i in 0..6 {
            store.append(ChatTurn::user(format!("turn {i}")));
        }

        let reloaded = MessageStore::open(&path, 2);
        assert_eq!(texts(&reloaded), ["turn 4", "turn 5"]);
    }

    #[test]
    fn clear_empties_backing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        let mut store = MessageStore::open(&path, 10);
        store.append(ChatTurn::user("hello"));
        store.clear();

        let reloaded = MessageStore::open(&path, 10);
        assert!(reloaded.is_empty());
    }
}
