//! Actor rows and write requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub const DEFAULT_ROLE: &str = "actor";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Actor {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of an actor create or full-row update.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewActor {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl NewActor {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        NewActor {
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Role to persist; blank or missing falls back to the column default.
    pub fn role_or_default(&self) -> &str {
        self.role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_ROLE)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.first_name.trim().is_empty() {
            return Err(CatalogError::Validation("first_name is required".into()));
        }
        if self.last_name.trim().is_empty() {
            return Err(CatalogError::Validation("last_name is required".into()));
        }
        for (name, value, max) in [
            ("first_name", self.first_name.as_str(), 32),
            ("last_name", self.last_name.as_str(), 32),
            ("role", self.role_or_default(), 32),
        ] {
            if value.chars().count() > max {
                return Err(CatalogError::Validation(format!(
                    "{} must be at most {} characters",
                    name, max
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ActorList {
    pub actors: Vec<Actor>,
    pub total: i64,
}
