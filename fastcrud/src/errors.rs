//! # Error Handling for CRUD APIs
//!
//! Every fallible operation of the controller returns [`CrudError`]. The core only ever
//! originates two kinds itself:
//!
//! - **`NotFound`**: missing path identifier, or no entity stored under it
//! - **`InvalidParameter`**: identifier unparseable or of the wrong representation, empty
//!   batch input
//!
//! The other two kinds carry collaborator errors verbatim:
//!
//! - **`Validation`**: the [`ValidationErrors`] returned by [`Validatable`](crate::validation::Validatable)
//! - **`Repository`**: the `DbErr` returned by the repository, including transaction failures
//!
//! ## HTTP mapping
//!
//! `CrudError` implements axum's `IntoResponse`. Repository internals are logged with
//! `tracing` and replaced by a generic message; they never reach the client.
//!
//! | Kind | Status |
//! |---|---|
//! | `NotFound` | 404 |
//! | `InvalidParameter` | 400 |
//! | `Validation` | 422 |
//! | `Repository` (`RecordNotFound`, `RecordNotUpdated`) | 404 |
//! | `Repository` (other) | 500 |
//!
//! ## Logging
//!
//! Errors are logged through `tracing`. No output unless the application installs a
//! subscriber:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt()
//!     .with_target(false)
//!     .compact()
//!     .init();
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

use crate::validation::{ValidationError, ValidationErrors};

/// Tag identifying the kind of a [`CrudError`], as sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidParameter,
    Validation,
    Repository,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidParameter => "invalid_parameter",
            Self::Validation => "validation",
            Self::Repository => "repository",
        }
    }
}

/// Error returned by controller operations.
#[derive(Debug)]
pub enum CrudError {
    /// Missing path identifier or unresolved entity
    NotFound {
        /// User-facing error message
        message: String,
    },

    /// Identifier present but unusable, or empty batch input
    InvalidParameter {
        /// User-facing error message
        message: String,
    },

    /// Propagated from the validation collaborator
    Validation(ValidationErrors),

    /// Propagated from the repository (details logged, not exposed)
    Repository(DbErr),
}

impl CrudError {
    /// Create a `NotFound` error
    ///
    /// # Example
    /// ```rust,ignore
    /// return Err(CrudError::not_found("record not found"));
    /// ```
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an `InvalidParameter` error
    ///
    /// # Example
    /// ```rust,ignore
    /// return Err(CrudError::invalid_parameter("no ids provided"));
    /// ```
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Repository(_) => ErrorKind::Repository,
        }
    }

    /// HTTP status code the transport should answer with
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Repository(DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated) => {
                StatusCode::NOT_FOUND
            }
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { message } | Self::InvalidParameter { message } => message.clone(),
            Self::Validation(errors) => match errors.errors() {
                [single] => single.to_string(),
                _ => "Validation failed".to_string(),
            },
            Self::Repository(DbErr::RecordNotFound(message)) => message.clone(),
            Self::Repository(DbErr::RecordNotUpdated) => "record not found".to_string(),
            Self::Repository(_) => "A database error occurred".to_string(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Repository(internal) if self.status_code().is_server_error() => {
                tracing::error!(error = ?internal, "Repository error occurred");
            }
            _ => {
                tracing::debug!(
                    kind = self.kind().as_str(),
                    error = %self,
                    status = %self.status_code(),
                    "CRUD error"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for CrudError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let details = match &self {
            Self::Validation(errors) => {
                Some(errors.errors().iter().map(ToString::to_string).collect())
            }
            _ => None,
        };
        let response = ErrorResponse {
            error: self.user_message(),
            kind: self.kind(),
            details,
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for CrudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { message } | Self::InvalidParameter { message } => f.write_str(message),
            Self::Validation(errors) => write!(f, "{errors}"),
            Self::Repository(err) => write!(f, "repository error: {err}"),
        }
    }
}

impl std::error::Error for CrudError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Repository(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbErr> for CrudError {
    fn from(err: DbErr) -> Self {
        Self::Repository(err)
    }
}

impl From<ValidationErrors> for CrudError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<ValidationError> for CrudError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(ValidationErrors::from(error))
    }
}
