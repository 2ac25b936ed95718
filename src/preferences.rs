//! Per-account configuration (theme, notification toggle).
//!
//! Deliberately not ambient state: preferences are loaded explicitly,
//! updated through a setter on `CoreState`, and torn down on sign-out.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::Theme;

const KEY_THEME: &str = "theme";
const KEY_NOTIFICATIONS: &str = "notifications_enabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPreferences {
    pub theme: Theme,
    pub notifications_enabled: bool,
}

impl Default for AccountPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            notifications_enabled: true,
        }
    }
}

/// Load an account's preferences, falling back to defaults for unset or
/// unparseable values.
pub fn load(conn: &Connection, account_id: &Uuid) -> Result<AccountPreferences, DatabaseError> {
    let defaults = AccountPreferences::default();

    let theme = db::get_user_preference(conn, account_id, KEY_THEME)?
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.theme);

    let notifications_enabled = db::get_user_preference(conn, account_id, KEY_NOTIFICATIONS)?
        .map(|v| v == "true")
        .unwrap_or(defaults.notifications_enabled);

    Ok(AccountPreferences {
        theme,
        notifications_enabled,
    })
}

/// Persist an account's preferences.
pub fn store(
    conn: &Connection,
    account_id: &Uuid,
    prefs: &AccountPreferences,
) -> Result<(), DatabaseError> {
    db::set_user_preference(conn, account_id, KEY_THEME, prefs.theme.as_str())?;
    db::set_user_preference(
        conn,
        account_id,
        KEY_NOTIFICATIONS,
        if prefs.notifications_enabled {
            "true"
        } else {
            "false"
        },
    )?;
    Ok(())
}

/// Remove an account's stored preferences (sign-out teardown).
pub fn clear(conn: &Connection, account_id: &Uuid) -> Result<(), DatabaseError> {
    db::delete_user_preferences(conn, account_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn test_account(conn: &Connection) -> Uuid {
        db::create_account(conn, "Pat", "hash").unwrap().id
    }

    #[test]
    fn load_unset_returns_defaults() {
        let conn = open_memory_database().unwrap();
        let account_id = test_account(&conn);

        let prefs = load(&conn, &account_id).unwrap();
        assert_eq!(prefs, AccountPreferences::default());
        assert_eq!(prefs.theme, Theme::System);
        assert!(prefs.notifications_enabled);
    }

    #[test]
    fn store_then_load_roundtrips() {
        let conn = open_memory_database().unwrap();
        let account_id = test_account(&conn);

        let prefs = AccountPreferences {
            theme: Theme::Dark,
            notifications_enabled: false,
        };
        store(&conn, &account_id, &prefs).unwrap();

        assert_eq!(load(&conn, &account_id).unwrap(), prefs);
    }

    #[test]
    fn unparseable_theme_falls_back_to_default() {
        let conn = open_memory_database().unwrap();
        let account_id = test_account(&conn);

        db::set_user_preference(&conn, &account_id, KEY_THEME, "neon").unwrap();
        let prefs = load(&conn, &account_id).unwrap();
        assert_eq!(prefs.theme, Theme::System);
    }

    #[test]
    fn clear_restores_defaults() {
        let conn = open_memory_database().unwrap();
        let account_id = test_account(&conn);

        store(
            &conn,
            &account_id,
            &AccountPreferences {
                theme: Theme::Light,
                notifications_enabled: false,
            },
        )
        .unwrap();

        clear(&conn, &account_id).unwrap();
        assert_eq!(load(&conn, &account_id).unwrap(), AccountPreferences::default());
    }
}
