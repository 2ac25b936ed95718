//! Shared application state.
//!
//! `CoreState` is the single state object shared by the API layer. It
//! holds the database location and a per-account preference cache with an
//! explicit lifecycle: loaded on first access, written through on update,
//! evicted on sign-out.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use uuid::Uuid;

use crate::config;
use crate::db::{self, DatabaseError};
use crate::preferences::{self, AccountPreferences};

pub struct CoreState {
    pub db_path: PathBuf,
    /// Preference cache, keyed by account. Write-through; cleared per
    /// account on sign-out.
    preferences: RwLock<HashMap<Uuid, AccountPreferences>>,
}

impl CoreState {
    pub fn new() -> Self {
        Self::with_db_path(config::database_path())
    }

    /// State backed by a specific database file (tests use a temp dir).
    pub fn with_db_path(db_path: PathBuf) -> Self {
        Self {
            db_path,
            preferences: RwLock::new(HashMap::new()),
        }
    }

    /// Open a database connection. Connections are per-request; SQLite
    /// serialises concurrent writers itself.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }

    /// Get an account's preferences, loading them into the cache on
    /// first access.
    pub fn preferences_for(&self, account_id: &Uuid) -> Result<AccountPreferences, CoreError> {
        {
            let cache = self
                .preferences
                .read()
                .map_err(|_| CoreError::LockPoisoned)?;
            if let Some(prefs) = cache.get(account_id) {
                return Ok(*prefs);
            }
        }

        let conn = self.open_db()?;
        let prefs = preferences::load(&conn, account_id)?;

        let mut cache = self
            .preferences
            .write()
            .map_err(|_| CoreError::LockPoisoned)?;
        cache.insert(*account_id, prefs);
        Ok(prefs)
    }

    /// Update an account's preferences (explicit setter, write-through).
    pub fn set_preferences(
        &self,
        account_id: &Uuid,
        prefs: AccountPreferences,
    ) -> Result<(), CoreError> {
        let conn = self.open_db()?;
        preferences::store(&conn, account_id, &prefs)?;

        let mut cache = self
            .preferences
            .write()
            .map_err(|_| CoreError::LockPoisoned)?;
        cache.insert(*account_id, prefs);
        Ok(())
    }

    /// Tear down an account's preference state on sign-out: evict the
    /// cache entry and drop the stored rows.
    pub fn teardown_preferences(&self, account_id: &Uuid) -> Result<(), CoreError> {
        let conn = self.open_db()?;
        preferences::clear(&conn, account_id)?;

        let mut cache = self
            .preferences
            .write()
            .map_err(|_| CoreError::LockPoisoned)?;
        cache.remove(account_id);
        Ok(())
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}
