//! Account lifecycle endpoints.
//!
//! - `POST /api/accounts` — create an account, returns its bearer token
//!   (the only time the token is visible; only its hash is stored).
//! - `POST /api/auth/signout` — revoke the token and tear down cached
//!   preference state.

use axum::extract::State;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{generate_token, hash_token, AccountContext, ApiContext};
use crate::db;

#[derive(Deserialize)]
pub struct CreateAccountRequest {
    pub display_name: Option<String>,
}

#[derive(Serialize)]
pub struct CreateAccountResponse {
    pub account: db::Account,
    pub token: String,
}

/// `POST /api/accounts` — unprotected, rate-limited only.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(body): Json<CreateAccountRequest>,
) -> Result<Json<CreateAccountResponse>, ApiError> {
    let display_name = body
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing required field: display_name".into()))?;

    let token = generate_token();
    let conn = ctx.core.open_db()?;
    let account = db::create_account(&conn, display_name, &hash_token(&token))?;

    tracing::info!(account_id = %account.id, "account created");

    Ok(Json(CreateAccountResponse { account, token }))
}

#[derive(Serialize)]
pub struct SignoutResponse {
    pub signed_out: bool,
}

/// `POST /api/auth/signout` — revoke the caller's token and drop their
/// preference state. The token that authenticated this request stops
/// working immediately after.
pub async fn signout(
    State(ctx): State<ApiContext>,
    Extension(account): Extension<AccountContext>,
) -> Result<Json<SignoutResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    db::revoke_token(&conn, &account.account_id)?;
    ctx.core.teardown_preferences(&account.account_id)?;

    tracing::info!(account_id = %account.account_id, "account signed out");

    Ok(Json(SignoutResponse { signed_out: true }))
}
