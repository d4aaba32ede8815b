//! `/v1/movies` handlers.

use crate::error::CatalogError;
use crate::handlers::{list_query_from_params, parse_id};
use crate::model::{MovieUpdate, NewMovie, UpdateFieldRequest};
use crate::response::{success_created, success_many, success_one};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewMovie>,
) -> Result<impl IntoResponse, CatalogError> {
    body.validate()?;
    let movie = state.movies.create(&body).await?;
    Ok(success_created(movie))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, CatalogError> {
    let id = parse_id(&id)?;
    let movie = state.movies.get(id).await?;
    Ok(success_one(movie))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<MovieUpdate>,
) -> Result<impl IntoResponse, CatalogError> {
    let id = parse_id(&id)?;
    body.validate()?;
    let movie = state.movies.update(id, &body).await?;
    Ok(success_one(movie))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, CatalogError> {
    let id = parse_id(&id)?;
    state.movies.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, CatalogError> {
    let query = list_query_from_params(&params);
    let list = state.movies.list(&query).await?;
    Ok(success_many(list.movies, list.count))
}

/// Bulk column update on every movie matching the request's filters.
pub async fn update_fields(
    State(state): State<AppState>,
    Json(body): Json<UpdateFieldRequest>,
) -> Result<impl IntoResponse, CatalogError> {
    let affected = state.movies.update_fields(&body).await?;
    Ok(success_one(affected))
}
