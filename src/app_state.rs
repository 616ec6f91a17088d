//! Shared application state behind Tauri's managed-state mechanism.
//!
//! Holds the database path, the advisor client, and the chat send-window
//! size. A fresh connection is opened per command invocation; the advisor
//! client is shared read-mostly and swapped on settings changes.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use thiserror::Error;

use crate::advisor::context::clamp_window;
use crate::advisor::{AdvisorClient, AdvisorError, ChatBackend, ChatTurn};
use crate::config;
use crate::db::{self, DatabaseError};

/// Default chat turns sent per advisor call (counting the new message).
const DEFAULT_CONTEXT_WINDOW: usize = 20;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Internal lock error")]
    LockPoisoned,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Cannot prepare data directory: {0}")]
    DataDir(String),
}

pub struct AppState {
    /// SQLite file currently in use. Switched by the connect command.
    db_path: RwLock<PathBuf>,
    /// Chat-completions client; rebuilt settings live behind the lock.
    advisor: RwLock<AdvisorClient>,
    /// Send-window size (stored cap stays fixed at 20).
    context_window: AtomicUsize,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            db_path: RwLock::new(config::default_db_path()),
            advisor: RwLock::new(AdvisorClient::default_hosted()),
            context_window: AtomicUsize::new(DEFAULT_CONTEXT_WINDOW),
        }
    }

    /// Open a connection to the current database, creating its parent
    /// directory on first use.
    pub fn open_db(&self) -> Result<rusqlite::Connection, StateError> {
        let path = self
            .db_path
            .read()
            .map_err(|_| StateError::LockPoisoned)?
            .clone();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StateError::DataDir(e.to_string()))?;
        }
        Ok(db::open_database(&path)?)
    }

    /// Point the app at another SQLite file. The file is opened (and
    /// migrated) immediately so a bad path is rejected up front.
    pub fn set_db_path(&self, path: &Path) -> Result<(), StateError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StateError::DataDir(e.to_string()))?;
        }
        db::open_database(path)?;

        let mut guard = self.db_path.write().map_err(|_| StateError::LockPoisoned)?;
        *guard = path.to_path_buf();
        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf, StateError> {
        Ok(self
            .db_path
            .read()
            .map_err(|_| StateError::LockPoisoned)?
            .clone())
    }

    // ── Advisor access ──────────────────────────────────────

    /// Run one chat-completion call through the shared client.
    pub fn advisor_complete(&self, turns: &[ChatTurn]) -> Result<String, AdvisorError> {
        let guard = self
            .advisor
            .read()
            .map_err(|_| AdvisorError::HttpClient("advisor lock poisoned".into()))?;
        guard.complete(turns)
    }

    pub fn set_api_key(&self, api_key: &str) -> Result<(), StateError> {
        let mut guard = self.advisor.write().map_err(|_| StateError::LockPoisoned)?;
        guard.set_api_key(api_key);
        Ok(())
    }

    pub fn set_model(&self, model: &str) -> Result<(), StateError> {
        let mut guard = self.advisor.write().map_err(|_| StateError::LockPoisoned)?;
        guard.set_model(model);
        Ok(())
    }

    pub fn advisor_info(&self) -> Result<(String, String, bool), StateError> {
        let guard = self.advisor.read().map_err(|_| StateError::LockPoisoned)?;
        Ok((
            guard.base_url().to_string(),
            guard.model().to_string(),
            guard.has_api_key(),
        ))
    }

    // ── Context window ──────────────────────────────────────

    pub fn context_window(&self) -> usize {
        self.context_window.load(Ordering::Relaxed)
    }

    pub fn set_context_window(&self, limit: usize) -> usize {
        let clamped = clamp_window(limit);
        self.context_window.store(clamped, Ordering::Relaxed);
        clamped
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
