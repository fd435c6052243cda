//! Local persistence of the plan and the preset library.
//!
//! Storage is a string key/value [`Store`]. The browser build uses
//! `localStorage`; tests and the CLI use [`MemoryStore`]. Loading never
//! fails: a missing or unreadable entry yields `None` (or the default
//! library) and corruption is logged.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::HashMap;

use tracing::warn;

use crate::catalog::Library;
use crate::export::PlanFile;

/// Key of the saved plan.
pub const PLAN_KEY: &str = "roomplan.plan.v1";
/// Key of the preset library.
pub const LIBRARY_KEY: &str = "roomplan.library.v1";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value storage.
pub trait Store {
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// # Errors
    ///
    /// Returns an error if the backend rejects the write (e.g. quota).
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// The browser's `window.localStorage`.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// # Errors
    ///
    /// Returns [`PersistError::Unavailable`] outside a browser or when the
    /// user disabled storage.
    pub fn open() -> Result<Self, PersistError> {
        let window = web_sys::window().ok_or(PersistError::Unavailable)?;
        let storage = window
            .local_storage()
            .map_err(|e| PersistError::Storage(format!("{e:?}")))?
            .ok_or(PersistError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl Store for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.storage
            .get_item(key)
            .map_err(|e| PersistError::Storage(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PersistError::Storage(format!("{e:?}")))
    }
}

/// The saved plan, if one exists and can be read.
pub fn load_plan(store: &dyn Store) -> Option<PlanFile> {
    let raw = match store.get(PLAN_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(error = %e, "plan storage read failed");
            return None;
        }
    };
    match PlanFile::from_json(&raw) {
        Ok(plan) => Some(plan),
        Err(e) => {
            warn!(error = %e, "discarding unreadable saved plan");
            None
        }
    }
}

/// Persist the plan.
///
/// # Errors
///
/// Returns an error if serialization or the storage write fails.
pub fn save_plan(store: &mut dyn Store, plan: &PlanFile) -> Result<(), PersistError> {
    store.set(PLAN_KEY, &plan.to_json()?)
}

/// The saved preset library, or the built-in one.
pub fn load_library(store: &dyn Store) -> Library {
    match store.get(LIBRARY_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "discarding unreadable preset library");
            Library::default()
        }),
        Ok(None) => Library::default(),
        Err(e) => {
            warn!(error = %e, "library storage read failed");
            Library::default()
        }
    }
}

/// Persist the preset library.
///
/// # Errors
///
/// Returns an error if serialization or the storage write fails.
pub fn save_library(store: &mut dyn Store, library: &Library) -> Result<(), PersistError> {
    store.set(LIBRARY_KEY, &serde_json::to_string(library)?)
}
