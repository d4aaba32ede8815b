//! Movie and actor stores over PostgreSQL, and the cast synchronizer they share.

mod actor;
pub mod cast;
mod movie;

pub use actor::ActorStore;
pub use cast::{plan_cast, sync_cast, CastDiff, CastMode};
pub use movie::MovieStore;

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::model::{
    Actor, ActorList, ListQuery, Movie, MovieList, MovieUpdate, NewActor, NewMovie, RowsAffected,
    UpdateFieldRequest,
};

/// Movie persistence as seen by request handlers.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Insert the movie and its cast atomically.
    async fn create(&self, movie: &NewMovie) -> Result<Movie, CatalogError>;
    async fn get(&self, id: i32) -> Result<Movie, CatalogError>;
    /// Overwrite scalar fields; replace the cast when `update.cast` is set.
    async fn update(&self, id: i32, update: &MovieUpdate) -> Result<Movie, CatalogError>;
    /// Remove the movie and its links. Missing movies are `NotFound`.
    async fn delete(&self, id: i32) -> Result<(), CatalogError>;
    async fn list(&self, query: &ListQuery) -> Result<MovieList, CatalogError>;
    async fn update_fields(&self, req: &UpdateFieldRequest) -> Result<RowsAffected, CatalogError>;
}

/// Actor persistence as seen by request handlers.
#[async_trait]
pub trait ActorRepository: Send + Sync {
    async fn create(&self, actor: &NewActor) -> Result<Actor, CatalogError>;
    async fn get(&self, id: i32) -> Result<Actor, CatalogError>;
    /// Full-row overwrite; fields the caller leaves out are reset, not kept.
    async fn update(&self, id: i32, actor: &NewActor) -> Result<Actor, CatalogError>;
    /// Idempotent: deleting an id that does not exist succeeds.
    async fn delete(&self, id: i32) -> Result<(), CatalogError>;
    async fn list(&self, query: &ListQuery) -> Result<ActorList, CatalogError>;
}
