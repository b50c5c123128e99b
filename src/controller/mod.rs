use axum::{
    Router, extract::DefaultBodyLimit, middleware::from_fn_with_state, routing::post,
};

use crate::controller::discord::interaction::handle_interaction;
use crate::shared::middleware::discord_validation::validate_interaction;
use crate::shared::structs::AppState;

pub mod discord;

/// Interactions are accepted on any path; only POST is routed.
///
/// The body size is bounded by the validation middleware, so the extractor
/// limit is turned off to keep both steps in agreement.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_interaction))
        .route("/{*path}", post(handle_interaction))
        .layer(DefaultBodyLimit::disable())
        .layer(from_fn_with_state(state.clone(), validate_interaction))
        .with_state(state)
}
