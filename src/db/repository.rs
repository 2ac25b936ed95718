//! Account and preference rows — everything that is not a medication,
//! schedule, or dose log lives here.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DatabaseError;

/// An owner of medications. Authenticates with a bearer token whose
/// SHA-256 hash is stored alongside the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// Insert a new account with the given token hash. Returns the account.
pub fn create_account(
    conn: &Connection,
    display_name: &str,
    token_hash: &str,
) -> Result<Account, DatabaseError> {
    let account = Account {
        id: Uuid::new_v4(),
        display_name: display_name.to_string(),
        created_at: Utc::now(),
    };
    conn.execute(
        "INSERT INTO accounts (id, display_name, token_hash, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            account.id.to_string(),
            account.display_name,
            token_hash,
            account.created_at.to_rfc3339(),
        ],
    )?;
    Ok(account)
}

/// Resolve a token hash to the owning account, if any.
pub fn account_for_token_hash(
    conn: &Connection,
    token_hash: &str,
) -> Result<Option<Account>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, display_name, created_at FROM accounts WHERE token_hash = ?1",
            params![token_hash],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((id, display_name, created_at)) => Ok(Some(Account {
            id: id.parse().unwrap_or_else(|_| Uuid::nil()),
            display_name,
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })),
        None => Ok(None),
    }
}

/// Revoke an account's bearer token (sign-out). Idempotent.
pub fn revoke_token(conn: &Connection, account_id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE accounts SET token_hash = NULL WHERE id = ?1",
        params![account_id.to_string()],
    )?;
    Ok(())
}

/// Read a single preference value for an account.
pub fn get_user_preference(
    conn: &Connection,
    account_id: &Uuid,
    key: &str,
) -> Result<Option<String>, DatabaseError> {
    let value = conn
        .query_row(
            "SELECT value FROM user_preferences WHERE account_id = ?1 AND key = ?2",
            params![account_id.to_string(), key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

/// Upsert a single preference value for an account.
pub fn set_user_preference(
    conn: &Connection,
    account_id: &Uuid,
    key: &str,
    value: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO user_preferences (account_id, key, value) VALUES (?1, ?2, ?3)
         ON CONFLICT (account_id, key) DO UPDATE SET value = excluded.value",
        params![account_id.to_string(), key, value],
    )?;
    Ok(())
}

/// Remove all stored preferences for an account (sign-out teardown).
pub fn delete_user_preferences(
    conn: &Connection,
    account_id: &Uuid,
) -> Result<usize, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM user_preferences WHERE account_id = ?1",
        params![account_id.to_string()],
    )?;
    Ok(deleted)
}
