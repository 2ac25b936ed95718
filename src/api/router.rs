//! API router.
//!
//! Returns a composable `Router` mounted under `/api/`.
//!
//! Middleware uses `Extension<ApiContext>` (injected as the outermost
//! layer). Endpoint handlers use `State<ApiContext>` (provided via
//! `with_state`).

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router. All routes except account creation require
/// bearer token authentication.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    // Protected routes — auth + rate limiting.
    //
    // Layers apply bottom (innermost) to top (outermost); Extension must
    // be outermost so the middleware can extract ApiContext.
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let protected = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/auth/signout", post(endpoints::accounts::signout))
        .route("/medications", post(endpoints::medications::create))
        .route("/medications", get(endpoints::medications::list))
        .route("/medications/:id", get(endpoints::medications::detail))
        .route(
            "/medications/:id/refill",
            post(endpoints::medications::refill),
        )
        .route(
            "/medications/:id",
            delete(endpoints::medications::deactivate),
        )
        .route("/reminders/update", post(endpoints::reminders::update))
        .route("/dashboard/summary", get(endpoints::dashboard::summary))
        .route("/calendar", get(endpoints::dashboard::calendar))
        .route("/preferences", get(endpoints::preferences::get))
        .route("/preferences", put(endpoints::preferences::put))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        .layer(axum::middleware::from_fn(middleware::rate::limit))
        .layer(axum::Extension(ctx.clone()));

    // Unprotected routes (rate-limited only).
    let unprotected = Router::new()
        .route("/accounts", post(endpoints::accounts::create))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::rate::limit))
        .layer(axum::Extension(ctx));

    Router::new().nest("/api", protected).nest("/api", unprotected)
}
