//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! This module defines the repository traits (ports) that the use cases
//! depend on. Implementations exist for in-memory storage and PostgreSQL.
//!
//! # Available Repositories
//!
//! - [`BoqRepository`]: Bills of quantities with their jobs and general costs
//! - [`QuotationRepository`]: Quotations and the BOQ data they are priced from
//!
//! # Examples
//!
//! ```ignore
//! use boq_quotation::infrastructure::persistence::traits::QuotationRepository;
//!
//! async fn is_ready(repo: &impl QuotationRepository, project_id: ProjectId) -> bool {
//!     repo.check_boq_status(project_id).await.ok().flatten().is_some()
//! }
//! ```

use crate::domain::entities::{
    Boq, BoqJob, GeneralCost, Quotation, QuotationExportData, QuotationJob,
};
use crate::domain::services::ApprovalViolation;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{BoqId, BoqStatus, JobId, ProjectId, QuotationStatus};
use crate::domain::DomainError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// A business rule checked by the store was violated.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Maps a failed approval check for `project_id`.
    ///
    /// A missing quotation becomes `NotFound` keyed by the project; every
    /// other violation becomes `Validation`.
    #[must_use]
    pub fn approval(violation: ApprovalViolation, project_id: ProjectId) -> Self {
        if violation.is_not_found() {
            Self::not_found("Quotation", project_id.to_string())
        } else {
            Self::Validation(violation.to_string())
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<DomainError> for RepositoryError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::JobNotFound(id) => Self::not_found("BoqJob", id),
            DomainError::DuplicateJob(id) => Self::duplicate("BoqJob", id),
            DomainError::Arithmetic(e) => Self::internal(e.to_string()),
            other => Self::Validation(other.to_string()),
        }
    }
}


/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for bills of quantities.
///
/// Every mutation is only accepted while the BOQ is `Draft`; violations are
/// reported as `RepositoryError::Validation`.
#[async_trait]
pub trait BoqRepository: Send + Sync + fmt::Debug {
    /// Returns the project's BOQ, creating an empty draft if none exists.
    async fn create_for_project(&self, project_id: ProjectId) -> RepositoryResult<Boq>;

    /// Gets a BOQ by ID.
    ///
    /// Returns `None` if the BOQ does not exist.
    async fn get(&self, id: BoqId) -> RepositoryResult<Option<Boq>>;

    /// Gets the BOQ of a project.
    ///
    /// Returns `None` if the project has no BOQ.
    async fn get_by_project(&self, project_id: ProjectId) -> RepositoryResult<Option<Boq>>;

    /// Approves a BOQ.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown BOQ and
    /// `RepositoryError::Validation` if it is already approved or empty.
    async fn approve(&self, id: BoqId) -> RepositoryResult<()>;

    /// Appends a job line.
    async fn add_job(&self, id: BoqId, job: &BoqJob) -> RepositoryResult<()>;

    /// Replaces a job line identified by `job.id`.
    async fn update_job(&self, id: BoqId, job: &BoqJob) -> RepositoryResult<()>;

    /// Removes a job line.
    async fn delete_job(&self, id: BoqId, job_id: JobId) -> RepositoryResult<()>;

    /// Sets or clears the estimate of a general cost category.
    async fn set_general_cost(
        &self,
        id: BoqId,
        type_name: &str,
        estimated_cost: Option<Decimal>,
    ) -> RepositoryResult<()>;
}

/// Repository for quotations.
///
/// Reads the BOQ data a quotation is priced from and persists the single
/// quotation of each project.
///
/// # Examples
///
/// ```ignore
/// use boq_quotation::infrastructure::persistence::traits::QuotationRepository;
///
/// async fn example(repo: &impl QuotationRepository, project_id: ProjectId) {
///     let quotation = match repo.get_by_project_id(project_id).await? {
///         Some(q) => q,
///         None => repo.create(project_id).await?,
///     };
///     let jobs = repo.get_quotation_jobs(project_id).await?;
/// }
/// ```
#[async_trait]
pub trait QuotationRepository: Send + Sync + fmt::Debug {
    /// Returns the status of the project's BOQ.
    ///
    /// Returns `None` if the project has no BOQ.
    async fn check_boq_status(&self, project_id: ProjectId) -> RepositoryResult<Option<BoqStatus>>;

    /// Gets the project's quotation.
    ///
    /// Returns `None` if no quotation exists yet.
    async fn get_by_project_id(&self, project_id: ProjectId) -> RepositoryResult<Option<Quotation>>;

    /// Creates the project's draft quotation.
    ///
    /// At most one quotation exists per project: if one was created
    /// concurrently, that quotation is returned instead.
    async fn create(&self, project_id: ProjectId) -> RepositoryResult<Quotation>;

    /// Returns the job rows of the project's BOQ in insertion order.
    async fn get_quotation_jobs(&self, project_id: ProjectId)
    -> RepositoryResult<Vec<QuotationJob>>;

    /// Returns the general cost rows of the project's BOQ, including
    /// categories without an estimate.
    async fn get_quotation_general_costs(
        &self,
        project_id: ProjectId,
    ) -> RepositoryResult<Vec<GeneralCost>>;

    /// Checks the approval preconditions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no quotation exists and
    /// `RepositoryError::Validation` for any other violated rule.
    async fn validate_approval(&self, project_id: ProjectId) -> RepositoryResult<()>;

    /// Moves the quotation from `Draft` to `Approved`.
    async fn approve_quotation(&self, project_id: ProjectId) -> RepositoryResult<()>;

    /// Returns the quotation status.
    ///
    /// Returns `None` if no quotation exists.
    async fn get_quotation_status(
        &self,
        project_id: ProjectId,
    ) -> RepositoryResult<Option<QuotationStatus>>;

    /// Returns the bundle used to render the quotation document.
    async fn get_export_data(&self, project_id: ProjectId)
    -> RepositoryResult<QuotationExportData>;

    /// Replaces the validity date and tax percentage of a draft quotation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no quotation exists and
    /// `RepositoryError::Validation` if it is not a draft or the tax
    /// percentage is out of range.
    async fn update_terms(
        &self,
        project_id: ProjectId,
        valid_until: Option<Timestamp>,
        tax_percentage: Option<Decimal>,
    ) -> RepositoryResult<Quotation>;
}
