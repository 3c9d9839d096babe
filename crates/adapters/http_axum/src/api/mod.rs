//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod accessories;
pub mod sse;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accessories", get(accessories::list))
        .route("/accessories/{name}", get(accessories::get))
        .route(
            "/accessories/{name}/target",
            get(accessories::get_target).put(accessories::set_target),
        )
        .route("/accessories/{name}/identify", post(accessories::identify))
        .route("/events/stream", get(sse::stream))
}
