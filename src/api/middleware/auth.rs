//! Bearer token authentication middleware.
//!
//! Extracts `Authorization: Bearer <token>`, resolves its hash to an
//! account, and injects `AccountContext` into request extensions for
//! downstream handlers.

use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{hash_token, AccountContext, ApiContext};
use crate::db;

/// Require a valid bearer token.
///
/// Accesses `ApiContext` from request extensions (injected by Extension
/// layer). On success injects `AccountContext` and marks the response
/// uncacheable.
pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let conn = ctx.core.open_db()?;
    let account = db::account_for_token_hash(&conn, &hash_token(&token))?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(AccountContext {
        account_id: account.id,
        display_name: account.display_name,
    });

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert("Cache-Control", HeaderValue::from_static("no-store"));

    Ok(response)
}
