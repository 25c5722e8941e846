//! # Quotation Approval Rules
//!
//! Preconditions every quotation backend checks before moving a quotation
//! from `Draft` to `Approved`.
//!
//! Backends gather an [`ApprovalSnapshot`] with whatever queries suit their
//! storage and hand it to [`check_quotation_approval`], so the rule set is
//! identical across backends.

use crate::domain::value_objects::{BoqStatus, QuotationStatus};
use thiserror::Error;

/// State of a project as seen when approval is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApprovalSnapshot {
    /// BOQ status, `None` when the project has no BOQ.
    pub boq_status: Option<BoqStatus>,
    /// Quotation status, `None` when no quotation exists yet.
    pub quotation_status: Option<QuotationStatus>,
    /// Number of job lines in the BOQ.
    pub job_count: usize,
}

/// A violated approval precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApprovalViolation {
    /// The project has no BOQ.
    #[error("BOQ not found")]
    BoqMissing,

    /// The BOQ exists but is not approved.
    #[error("BOQ must be approved before approving quotation (current: {0})")]
    BoqNotApproved(BoqStatus),

    /// No quotation exists for the project.
    #[error("quotation not found")]
    QuotationMissing,

    /// The quotation is not a draft.
    #[error("only draft quotations can be approved (current: {0})")]
    QuotationNotDraft(QuotationStatus),

    /// The BOQ has no job lines.
    #[error("quotation must contain at least one job")]
    NoJobs,
}

impl ApprovalViolation {
    /// Returns true if the violation means a missing quotation rather than
    /// a failed rule.
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::QuotationMissing)
    }
}

/// Checks the approval preconditions in order: BOQ, quotation, jobs.
///
/// # Errors
///
/// Returns the first violated [`ApprovalViolation`].
pub fn check_quotation_approval(snapshot: ApprovalSnapshot) -> Result<(), ApprovalViolation> {
    match snapshot.boq_status {
        None => return Err(ApprovalViolation::BoqMissing),
        Some(status) if !status.is_approved() => {
            return Err(ApprovalViolation::BoqNotApproved(status));
        }
        Some(_) => {}
    }

    match snapshot.quotation_status {
        None => return Err(ApprovalViolation::QuotationMissing),
        Some(status) if !status.is_draft() => {
            return Err(ApprovalViolation::QuotationNotDraft(status));
        }
        Some(_) => {}
    }

    if snapshot.job_count == 0 {
        return Err(ApprovalViolation::NoJobs);
    }
    Ok(())
}
