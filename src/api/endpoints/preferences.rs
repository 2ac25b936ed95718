//! `GET|PUT /api/preferences` — explicit per-account configuration.

use axum::extract::State;
use axum::Extension;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{AccountContext, ApiContext};
use crate::preferences::AccountPreferences;

/// `GET /api/preferences` — loads into the cache on first access.
pub async fn get(
    State(ctx): State<ApiContext>,
    Extension(account): Extension<AccountContext>,
) -> Result<Json<AccountPreferences>, ApiError> {
    let prefs = ctx.core.preferences_for(&account.account_id)?;
    Ok(Json(prefs))
}

/// `PUT /api/preferences` — write-through update.
pub async fn put(
    State(ctx): State<ApiContext>,
    Extension(account): Extension<AccountContext>,
    Json(prefs): Json<AccountPreferences>,
) -> Result<Json<AccountPreferences>, ApiError> {
    ctx.core.set_preferences(&account.account_id, prefs)?;
    Ok(Json(prefs))
}
