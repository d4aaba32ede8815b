//! Movie catalog: movies, actors and the cast links between them, stored in
//! PostgreSQL and served over a small REST API.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{CatalogConfig, DatabaseConfig};
pub use error::{CatalogError, ConfigError, ErrorKind};
pub use model::{
    Actor, ActorList, ListQuery, Movie, MovieList, MovieUpdate, NewActor, NewMovie, UpdateFieldRequest,
};
pub use response::{success_many, success_one};
pub use routes::catalog_routes;
pub use service::{ActorRepository, ActorStore, MovieRepository, MovieStore};
pub use state::AppState;
pub use store::{ensure_catalog_tables, ensure_database_exists};
