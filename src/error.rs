//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("config load: {0}")]
    Load(String),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("validation: {0}")]
    Validation(String),
    #[error("referenced actor {id} not found")]
    ActorNotFound { id: i32 },
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("{operation} aborted: {source}")]
    TransactionAborted {
        operation: &'static str,
        #[source]
        source: Box<CatalogError>,
    },
}

/// Coarse classification used by callers deciding how to surface an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Storage,
    TransactionAborted,
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        CatalogError::NotFound { entity, id }
    }

    /// Wraps a failure raised inside a multi-statement operation. Already
    /// wrapped errors are returned as-is so the chain stays one level deep.
    pub fn aborted(operation: &'static str, source: CatalogError) -> Self {
        match source {
            already @ CatalogError::TransactionAborted { .. } => already,
            other => CatalogError::TransactionAborted {
                operation,
                source: Box::new(other),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NotFound { .. } => ErrorKind::NotFound,
            CatalogError::Validation(_)
            | CatalogError::ActorNotFound { .. }
            | CatalogError::UnknownColumn { .. }
            | CatalogError::BadRequest(_) => ErrorKind::Validation,
            CatalogError::Config(_) => ErrorKind::Storage,
            CatalogError::Storage(sqlx::Error::RowNotFound) => ErrorKind::NotFound,
            CatalogError::Storage(_) => ErrorKind::Storage,
            CatalogError::TransactionAborted { .. } => ErrorKind::TransactionAborted,
        }
    }

    /// Kind of the underlying cause, looking through transaction aborts.
    pub fn root_kind(&self) -> ErrorKind {
        self.root().kind()
    }

    pub fn root(&self) -> &CatalogError {
        match self {
            CatalogError::TransactionAborted { source, .. } => source.root(),
            other => other,
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self.root() {
            CatalogError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            CatalogError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            CatalogError::ActorNotFound { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "actor_not_found")
            }
            CatalogError::Validation(_) | CatalogError::UnknownColumn { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error")
            }
            CatalogError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            CatalogError::Storage(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            CatalogError::Storage(_) | CatalogError::TransactionAborted { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
            }
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        // Storage details stay in the log, not in the response.
        let message = if status.is_server_error() {
            "internal storage error".to_string()
        } else {
            self.root().to_string()
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}
