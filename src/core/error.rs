//! Typed error handling for the biztime service
//!
//! Every fallible operation in the service returns [`BizResult`]. Handlers
//! hand the error back to axum unchanged and [`BizError`]'s `IntoResponse`
//! implementation translates it into a status code and a JSON body:
//!
//! ```json
//! { "error": { "code": "ENTITY_NOT_FOUND", "message": "Can't find company with code of ibm", "status": 404 } }
//! ```
//!
//! # Error Categories
//!
//! - [`EntityError`]: a lookup or mutation by key matched no row (404)
//! - [`StorageError`]: anything the store raised, passed through unclassified (500)
//! - [`RequestError`]: unknown routes
//! - [`ConfigError`]: configuration loading and validation

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type for the service
#[derive(Debug, Error)]
pub enum BizError {
    /// Lookup or mutation target does not exist
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Failure raised by the underlying store
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error body returned to HTTP clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// HTTP status, repeated in the body
    pub status: u16,
}

/// Top-level wrapper so every failure body reads `{"error": {...}}`
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorResponse,
}

impl BizError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BizError::Entity(e) => e.status_code(),
            BizError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BizError::Request(e) => e.status_code(),
            BizError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BizError::Entity(e) => e.error_code(),
            BizError::Storage(_) => "STORAGE_ERROR",
            BizError::Request(e) => e.error_code(),
            BizError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorResponse {
                code: self.error_code().to_string(),
                message: self.to_string(),
                status: self.status_code().as_u16(),
            },
        }
    }
}

impl IntoResponse for BizError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// The two entity kinds exposed by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Company,
    Invoice,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Company => "company",
            EntityKind::Invoice => "invoice",
        }
    }

    /// Name of the key the entity is addressed by in URLs
    pub fn key(&self) -> &'static str {
        match self {
            EntityKind::Company => "code",
            EntityKind::Invoice => "id",
        }
    }
}

/// Errors raised by the resources themselves
#[derive(Debug, Error)]
pub enum EntityError {
    /// A read by key matched no row
    #[error("Can't find {} with {} of {key}", .kind.name(), .kind.key())]
    NotFound { kind: EntityKind, key: String },

    /// An update by key affected no row
    #[error("Can't update {} with {} of {key}", .kind.name(), .kind.key())]
    NotUpdated { kind: EntityKind, key: String },
}

impl EntityError {
    pub fn not_found(kind: EntityKind, key: impl Into<String>) -> Self {
        EntityError::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn not_updated(kind: EntityKind, key: impl Into<String>) -> Self {
        EntityError::NotUpdated {
            kind,
            key: key.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::NOT_FOUND
    }

    pub fn error_code(&self) -> &'static str {
        "ENTITY_NOT_FOUND"
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by a store backend
///
/// The resources never inspect these; they travel to the HTTP boundary as-is.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Could not reach the backend
    #[error("Failed to connect to {backend}: {message}")]
    Connection { backend: String, message: String },

    /// Statement failed (bad input syntax, lock poisoning, ...)
    #[error("{backend} query error: {message}")]
    Query { backend: String, message: String },

    /// A schema constraint rejected the statement
    #[error("{backend} constraint violation: {message}")]
    Constraint { backend: String, message: String },

    /// Schema migration failed
    #[error("{backend} migration error: {message}")]
    Migration { backend: String, message: String },
}

impl StorageError {
    pub fn query(backend: &str, message: impl Into<String>) -> Self {
        StorageError::Query {
            backend: backend.to_string(),
            message: message.into(),
        }
    }

    pub fn constraint(backend: &str, message: impl Into<String>) -> Self {
        StorageError::Constraint {
            backend: backend.to_string(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, Error)]
pub enum RequestError {
    /// No route matches the request
    #[error("Not Found")]
    RouteNotFound { path: String },
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::RouteNotFound { .. } => "ROUTE_NOT_FOUND",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{f}'")).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Storage backend not compiled into this binary
    #[error("Storage backend '{backend}' is not available in this build")]
    UnsupportedBackend { backend: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        const BACKEND: &str = "PostgreSQL";
        match err {
            sqlx::Error::Database(db) if !matches!(db.kind(), sqlx::error::ErrorKind::Other) => {
                StorageError::constraint(BACKEND, db.message())
            }
            other @ (sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed) => StorageError::Connection {
                backend: BACKEND.to_string(),
                message: other.to_string(),
            },
            other => StorageError::query(BACKEND, other.to_string()),
        }
    }
}

/// A specialized Result type for service operations
pub type BizResult<T> = Result<T, BizError>;
