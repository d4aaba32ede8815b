//! Shared application state for all routes. Repositories are trait objects so
//! handlers do not care what backs them.

use crate::config::CatalogConfig;
use crate::service::{ActorRepository, ActorStore, MovieRepository, MovieStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<dyn MovieRepository>,
    pub actors: Arc<dyn ActorRepository>,
}

impl AppState {
    /// PostgreSQL-backed stores sharing one pool.
    pub fn new(pool: PgPool, config: &CatalogConfig) -> Self {
        AppState {
            movies: Arc::new(MovieStore::new(pool.clone(), config)),
            actors: Arc::new(ActorStore::new(pool, config)),
        }
    }

    pub fn from_repositories(movies: Arc<dyn MovieRepository>, actors: Arc<dyn ActorRepository>) -> Self {
        AppState { movies, actors }
    }
}
