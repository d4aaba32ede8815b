//! `/v1/actors` handlers.

use crate::error::CatalogError;
use crate::handlers::{list_query_from_params, parse_id};
use crate::model::NewActor;
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
    Json(body): Json<NewActor>,
) -> Result<impl IntoResponse, CatalogError> {
    body.validate()?;
    let actor = state.actors.create(&body).await?;
    Ok(success_created(actor))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, CatalogError> {
    let id = parse_id(&id)?;
    let actor = state.actors.get(id).await?;
    Ok(success_one(actor))
}

/// Full overwrite: a missing `role` resets to the default role.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<NewActor>,
) -> Result<impl IntoResponse, CatalogError> {
    let id = parse_id(&id)?;
    body.validate()?;
    let actor = state.actors.update(id, &body).await?;
    Ok(success_one(actor))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, CatalogError> {
    let id = parse_id(&id)?;
    state.actors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, CatalogError> {
    let query = list_query_from_params(&params);
    let list = state.actors.list(&query).await?;
    Ok(success_many(list.actors, list.total))
}
