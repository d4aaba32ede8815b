//! Resource routes for the catalog API.

use crate::handlers::{actor, movie};
use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/movies", get(movie::list).post(movie::create))
        .route("/v1/movies/field", put(movie::update_fields))
        .route(
            "/v1/movies/:id",
            get(movie::read).put(movie::update).delete(movie::delete),
        )
}

pub fn actor_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/actors", get(actor::list).post(actor::create))
        .route(
            "/v1/actors/:id",
            get(actor::read).put(actor::update).delete(actor::delete),
        )
}

pub fn catalog_routes(state: AppState) -> Router {
    Router::new()
        .merge(movie_routes())
        .merge(actor_routes())
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)))
        .with_state(state)
}
