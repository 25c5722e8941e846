//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These errors represent failures that can occur during use case execution:
//! status gates owned by the use case, rules rejected by a repository, and
//! infrastructure failures carrying the operation that hit them.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── PreconditionFailed(String)   - Status gate owned by the use case
//! ├── NotFound { .. }              - Entity missing
//! ├── ValidationFailed(String)     - Rule rejected by a repository or entity
//! ├── Domain(DomainError)          - Business rule violation
//! └── Repository { .. }            - Storage failure with operation context
//! ```
//!
//! # Examples
//!
//! ```
//! use boq_quotation::application::error::ApplicationError;
//! use boq_quotation::infrastructure::persistence::RepositoryError;
//!
//! let err = ApplicationError::precondition_failed("BOQ must be approved before export");
//! assert!(err.is_precondition_failed());
//!
//! let err = ApplicationError::from_repository("get jobs", RepositoryError::connection("reset"));
//! assert!(err.to_string().contains("get jobs"));
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A status gate checked by the use case failed.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// Resource not found.
    #[error("not found: {resource_type} {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// A rule was rejected; the message is passed through unchanged.
    #[error("{0}")]
    ValidationFailed(String),

    /// Domain error from business logic.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Storage failure.
    #[error("failed to {operation}: {source}")]
    Repository {
        /// What the use case was doing.
        operation: &'static str,
        /// Underlying error.
        #[source]
        source: RepositoryError,
    },
}

impl ApplicationError {
    /// Creates a precondition failed error.
    #[must_use]
    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::PreconditionFailed(message.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates a validation failed error.
    #[must_use]
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::ValidationFailed(message.into())
    }

    /// Maps a repository error, attaching the operation for I/O failures.
    ///
    /// `NotFound` and `Validation` keep their meaning; everything else
    /// becomes [`ApplicationError::Repository`].
    #[must_use]
    pub fn from_repository(operation: &'static str, source: RepositoryError) -> Self {
        match source {
            RepositoryError::NotFound { entity_type, id } => Self::not_found(entity_type, id),
            RepositoryError::Validation(message) => Self::ValidationFailed(message),
            source => Self::Repository { operation, source },
        }
    }

    /// Returns a closure mapping repository errors for `operation`, for use
    /// with `map_err`.
    #[must_use]
    pub fn repository(operation: &'static str) -> impl Fn(RepositoryError) -> Self {
        move |source| Self::from_repository(operation, source)
    }

    /// Returns true if this is a precondition error.
    #[must_use]
    pub fn is_precondition_failed(&self) -> bool {
        matches!(self, Self::PreconditionFailed(_))
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed(_))
    }

    /// Returns true if this is a storage failure.
    #[must_use]
    pub fn is_repository(&self) -> bool {
        matches!(self, Self::Repository { .. })
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
