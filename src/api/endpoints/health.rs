//! `GET /api/health` — liveness check for signed-in clients.

use axum::Extension;
use axum::Json;
use serde::Serialize;

use crate::api::types::AccountContext;
use crate::config;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub account: String,
    pub version: String,
}

pub async fn check(Extension(account): Extension<AccountContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        account: account.display_name,
        version: config::APP_VERSION.to_string(),
    })
}
