//! Movie rows, write requests and bulk field updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::CatalogError;
use crate::model::{Actor, FilterDescriptor};

/// A movie with its materialized cast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub plot: String,
    pub cast: Vec<Actor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    pub fn cast_ids(&self) -> BTreeSet<i32> {
        self.cast.iter().map(|a| a.id).collect()
    }
}

/// Row of the `movies` relation, before the cast is attached.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct MovieRow {
    pub id: i32,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub plot: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MovieRow {
    pub fn with_cast(self, cast: Vec<Actor>) -> Movie {
        Movie {
            id: self.id,
            title: self.title,
            director: self.director,
            year: self.year,
            plot: self.plot,
            cast,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Cast member reference as sent by clients: `{"id": 5}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastRef {
    pub id: i32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub director: String,
    pub year: i32,
    #[serde(default, alias = "synopsis")]
    pub plot: String,
    #[serde(default, alias = "casts")]
    pub cast: Vec<CastRef>,
}

impl NewMovie {
    pub fn new(title: impl Into<String>, director: impl Into<String>, year: i32) -> Self {
        NewMovie {
            title: title.into(),
            director: director.into(),
            year,
            plot: String::new(),
            cast: Vec::new(),
        }
    }

    pub fn with_plot(mut self, plot: impl Into<String>) -> Self {
        self.plot = plot.into();
        self
    }

    pub fn with_cast(mut self, ids: impl IntoIterator<Item = i32>) -> Self {
        self.cast = ids.into_iter().map(|id| CastRef { id }).collect();
        self
    }

    pub fn cast_ids(&self) -> Vec<i32> {
        self.cast.iter().map(|c| c.id).collect()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_scalars(&self.title, &self.director, self.year)?;
        validate_cast(&self.cast)
    }
}

/// Scalar overwrite plus optional cast replacement. `cast: None` leaves the
/// existing links untouched; `Some(vec![])` clears them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MovieUpdate {
    pub title: String,
    pub director: String,
    pub year: i32,
    #[serde(default, alias = "synopsis")]
    pub plot: String,
    #[serde(default, alias = "casts")]
    pub cast: Option<Vec<CastRef>>,
}

impl MovieUpdate {
    pub fn new(title: impl Into<String>, director: impl Into<String>, year: i32) -> Self {
        MovieUpdate {
            title: title.into(),
            director: director.into(),
            year,
            plot: String::new(),
            cast: None,
        }
    }

    pub fn with_plot(mut self, plot: impl Into<String>) -> Self {
        self.plot = plot.into();
        self
    }

    pub fn with_cast(mut self, ids: impl IntoIterator<Item = i32>) -> Self {
        self.cast = Some(ids.into_iter().map(|id| CastRef { id }).collect());
        self
    }

    pub fn cast_ids(&self) -> Option<Vec<i32>> {
        self.cast.as_ref().map(|c| c.iter().map(|r| r.id).collect())
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_scalars(&self.title, &self.director, self.year)?;
        match &self.cast {
            Some(cast) => validate_cast(cast),
            None => Ok(()),
        }
    }
}

fn validate_scalars(title: &str, director: &str, year: i32) -> Result<(), CatalogError> {
    if title.trim().is_empty() {
        return Err(CatalogError::Validation("title is required".into()));
    }
    if director.trim().is_empty() {
        return Err(CatalogError::Validation("director is required".into()));
    }
    if title.chars().count() > 255 || director.chars().count() > 255 {
        return Err(CatalogError::Validation(
            "title and director must be at most 255 characters".into(),
        ));
    }
    if year <= 0 {
        return Err(CatalogError::Validation("year must be positive".into()));
    }
    Ok(())
}

fn validate_cast(cast: &[CastRef]) -> Result<(), CatalogError> {
    match cast.iter().find(|c| c.id <= 0) {
        Some(bad) => Err(CatalogError::Validation(format!("invalid cast id {}", bad.id))),
        None => Ok(()),
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct MovieList {
    pub movies: Vec<Movie>,
    pub count: i64,
}

/// One `column = value` assignment of a bulk field update.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateFieldItem {
    pub column: String,
    pub value: serde_json::Value,
}

/// Update the listed columns on every movie matching `filter`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateFieldRequest {
    #[serde(default)]
    pub filter: Vec<FilterDescriptor>,
    pub items: Vec<UpdateFieldItem>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RowsAffected {
    pub rows_affected: u64,
}
