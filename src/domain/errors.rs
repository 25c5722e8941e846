//! # Domain Errors
//!
//! Business rule violations raised by entities and domain services.

use crate::domain::value_objects::arithmetic::ArithmeticError;
use crate::domain::value_objects::enums::{BoqStatus, QuotationStatus};
use thiserror::Error;

/// Error raised when a business rule is violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The BOQ is not in a state that allows the operation.
    #[error("BOQ is {status}: {reason}")]
    BoqNotEditable {
        /// Current BOQ status.
        status: BoqStatus,
        /// What was attempted.
        reason: String,
    },

    /// Status transition not allowed by the quotation lifecycle.
    #[error("invalid quotation transition from {from} to {to}")]
    InvalidQuotationTransition {
        /// Current status.
        from: QuotationStatus,
        /// Requested status.
        to: QuotationStatus,
    },

    /// Approval preconditions are not met.
    #[error("approval rejected: {0}")]
    ApprovalRejected(String),

    /// Quantity must be positive.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Price must not be negative.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Tax percentage out of range.
    #[error("invalid tax percentage: {0}")]
    InvalidTaxPercentage(String),

    /// A referenced job is not part of the BOQ.
    #[error("job not found in BOQ: {0}")]
    JobNotFound(String),

    /// A job with the same ID already exists in the BOQ.
    #[error("job already exists in BOQ: {0}")]
    DuplicateJob(String),

    /// Arithmetic failure while pricing.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl DomainError {
    /// Creates a BOQ-not-editable error.
    #[must_use]
    pub fn boq_not_editable(status: BoqStatus, reason: impl Into<String>) -> Self {
        Self::BoqNotEditable {
            status,
            reason: reason.into(),
        }
    }

    /// Creates an approval-rejected error.
    #[must_use]
    pub fn approval_rejected(reason: impl Into<String>) -> Self {
        Self::ApprovalRejected(reason.into())
    }

    /// Returns true if the error comes from a lifecycle gate rather than
    /// from bad input values.
    #[must_use]
    pub fn is_state_violation(&self) -> bool {
        matches!(
            self,
            Self::BoqNotEditable { .. }
                | Self::InvalidQuotationTransition { .. }
                | Self::ApprovalRejected(_)
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boq_not_editable_display() {
        let err = DomainError::boq_not_editable(BoqStatus::Approved, "cannot add job");
        assert_eq!(err.to_string(), "BOQ is approved: cannot add job");
        assert!(err.is_state_violation());
    }

    #[test]
    fn transition_display() {
        let err = DomainError::InvalidQuotationTransition {
            from: QuotationStatus::Approved,
            to: QuotationStatus::Approved,
        };
        assert!(err.to_string().contains("from approved to approved"));
    }

    #[test]
    fn input_errors_are_not_state_violations() {
        assert!(!DomainError::InvalidQuantity("0".to_string()).is_state_violation());
        assert!(!DomainError::from(ArithmeticError::Overflow).is_state_violation());
    }
}
