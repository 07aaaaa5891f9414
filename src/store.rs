//! Session state persistence
//!
//! All application state lives in a single JSON document with four namespaces
//! (`inputs`, `outputs`, `repo`, `cal`). Every save rewrites the whole
//! document synchronously; last write wins. A missing, empty, or unreadable
//! file loads as empty state rather than an error, so a fresh install and a
//! corrupted file behave identically.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

fn default_uid_counter() -> u64 {
    1
}

/// The `cal` namespace: the 10 staged calendar slots plus the persistent
/// event id counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalState {
    /// Monotonic calendar event id. Incremented after every materialized
    /// event, never reused, never decremented.
    #[serde(default = "default_uid_counter")]
    pub uid_counter: u64,
    /// Staged post slots, keyed `calpost_1` .. `calpost_10`.
    #[serde(flatten)]
    pub slots: BTreeMap<String, String>,
}

impl Default for CalState {
    fn default() -> Self {
        Self {
            uid_counter: default_uid_counter(),
            slots: BTreeMap::new(),
        }
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    /// User-entered planning inputs (`input_goals`, `input_keydates`, ...).
    #[serde(default)]
    pub inputs: BTreeMap<String, String>,
    /// Latest generation outputs (`postidea_1` .. `postidea_10` and titles).
    #[serde(default)]
    pub outputs: BTreeMap<String, String>,
    /// The idea vault, keyed `repopostidea_1` .. `repopostidea_40`.
    #[serde(default)]
    pub repo: BTreeMap<String, String>,
    /// Calendar staging slots and the event id counter.
    #[serde(default)]
    pub cal: CalState,
}

/// State backend. Injected into every component that persists anything so
/// tests can substitute [`MemoryStore`] for real file I/O.
pub trait StateStore: Send + Sync {
    fn load(&self) -> Result<PersistedState>;
    fn save(&self, state: &PersistedState) -> Result<()>;
}

/// File-backed store: one pretty-printed JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<PersistedState> {
        if !self.path.exists() {
            return Ok(PersistedState::default());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(PersistedState::default());
        }

        match serde_json::from_str(&contents) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!(
                    "Session file {} is not valid JSON ({}); starting from empty state",
                    self.path.display(),
                    e
                );
                Ok(PersistedState::default())
            }
        }
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create session data directory")?;
        }

        let contents =
            serde_json::to_string_pretty(state).context("Failed to serialize session state")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;
        debug!("Saved session state to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store sharing one state cell between clones. Used by tests and
/// anywhere a throwaway session is wanted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<PersistedState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<PersistedState> {
        Ok(self
            .state
            .lock()
            .expect("state lock poisoned")
            .clone())
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        *self.state.lock().expect("state lock poisoned") = state.clone();
        Ok(())
    }
}
