//! # Quotation Entity
//!
//! A priced proposal derived from an approved bill of quantities.
//!
//! This module provides the [`Quotation`] aggregate together with the two
//! row types the pricing pipeline reads: [`QuotationJob`] and
//! [`GeneralCost`]. Optional amounts stay `None` until they are priced; a
//! zero is a real price, never a placeholder.
//!
//! # Examples
//!
//! ```
//! use boq_quotation::domain::entities::quotation::Quotation;
//! use boq_quotation::domain::value_objects::{ProjectId, QuotationStatus};
//!
//! let mut quotation = Quotation::new(ProjectId::new_v4());
//! assert_eq!(quotation.status(), QuotationStatus::Draft);
//!
//! quotation.approve().unwrap();
//! assert!(quotation.status().is_approved());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::CheckedArithmetic;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{ProjectId, QuotationId, QuotationStatus};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A quotation for a project.
///
/// # Invariants
///
/// - At most one quotation exists per project (enforced by storage)
/// - Status only moves `Draft` → `Approved`
/// - Terms (validity, tax) are only editable while `Draft`
/// - Tax percentage, when set, is within `0..=100`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    id: QuotationId,
    project_id: ProjectId,
    status: QuotationStatus,
    valid_until: Option<Timestamp>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schemars(with = "Option<f64>")]
    tax_percentage: Option<Decimal>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Quotation {
    /// Creates a new draft quotation with no terms set.
    #[must_use]
    pub fn new(project_id: ProjectId) -> Self {
        let now = Timestamp::now();
        Self {
            id: QuotationId::new_v4(),
            project_id,
            status: QuotationStatus::Draft,
            valid_until: None,
            tax_percentage: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstructs a quotation from storage without validation.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: QuotationId,
        project_id: ProjectId,
        status: QuotationStatus,
        valid_until: Option<Timestamp>,
        tax_percentage: Option<Decimal>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            project_id,
            status,
            valid_until,
            tax_percentage,
            created_at,
            updated_at,
        }
    }

    /// Returns the quotation ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> QuotationId {
        self.id
    }

    /// Returns the owning project.
    #[inline]
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> QuotationStatus {
        self.status
    }

    /// Returns the validity date, if set.
    #[inline]
    #[must_use]
    pub fn valid_until(&self) -> Option<Timestamp> {
        self.valid_until
    }

    /// Returns the tax percentage, if set.
    #[inline]
    #[must_use]
    pub fn tax_percentage(&self) -> Option<Decimal> {
        self.tax_percentage
    }

    /// Returns when the quotation was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the quotation was last modified.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Moves the quotation from `Draft` to `Approved`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuotationTransition` if already approved.
    pub fn approve(&mut self) -> DomainResult<()> {
        self.transition_to(QuotationStatus::Approved)
    }

    /// Replaces the validity date and tax percentage.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuotationTransition` if the quotation is
    /// no longer a draft, or `DomainError::InvalidTaxPercentage` if the
    /// percentage is outside `0..=100`.
    pub fn set_terms(
        &mut self,
        valid_until: Option<Timestamp>,
        tax_percentage: Option<Decimal>,
    ) -> DomainResult<()> {
        if !self.status.is_draft() {
            return Err(DomainError::InvalidQuotationTransition {
                from: self.status,
                to: QuotationStatus::Draft,
            });
        }
        if let Some(tax) = tax_percentage {
            validate_tax_percentage(tax)?;
        }
        self.valid_until = valid_until;
        self.tax_percentage = tax_percentage;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    fn transition_to(&mut self, target: QuotationStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidQuotationTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

impl fmt::Display for Quotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quotation({} for project {}, {})",
            self.id, self.project_id, self.status
        )
    }
}

/// Checks that a tax percentage lies within `0..=100`.
///
/// # Errors
///
/// Returns `DomainError::InvalidTaxPercentage` otherwise.
pub fn validate_tax_percentage(tax: Decimal) -> DomainResult<()> {
    if tax < Decimal::ZERO || tax > Decimal::ONE_HUNDRED {
        return Err(DomainError::InvalidTaxPercentage(format!(
            "{tax} is outside 0..=100"
        )));
    }
    Ok(())
}

/// A BOQ job line as read by the quotation pipeline.
///
/// `labor_cost` and `estimated_price` are per-unit figures shown on the
/// quotation; the `total_*` figures are line totals used for the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationJob {
    /// Job name.
    pub job_name: String,
    /// Unit of measure.
    pub unit: String,
    /// Quantity in `unit`.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub quantity: Decimal,
    /// Per-unit labor cost.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub labor_cost: Decimal,
    /// Line labor cost.
    #[serde(with = "rust_decimal::serde::float")]
    #[schemars(with = "f64")]
    pub total_labor_cost: Decimal,
    /// Per-unit estimated material price.
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schemars(with = "Option<f64>")]
    pub estimated_price: Option<Decimal>,
    /// Line estimated material price.
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schemars(with = "Option<f64>")]
    pub total_estimated_price: Option<Decimal>,
    /// Selling price.
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schemars(with = "Option<f64>")]
    pub selling_price: Option<Decimal>,
    /// Computed line total (labor + material).
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schemars(with = "Option<f64>")]
    pub total: Option<Decimal>,
}

impl QuotationJob {
    /// Creates a job row with only labor priced.
    ///
    /// Line labor is `quantity * labor_cost`; all optional amounts start
    /// unset.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` if the line labor overflows.
    pub fn new(
        job_name: impl Into<String>,
        unit: impl Into<String>,
        quantity: Decimal,
        labor_cost: Decimal,
    ) -> DomainResult<Self> {
        Ok(Self {
            job_name: job_name.into(),
            unit: unit.into(),
            quantity,
            labor_cost,
            total_labor_cost: quantity.safe_mul(labor_cost)?,
            estimated_price: None,
            total_estimated_price: None,
            selling_price: None,
            total: None,
        })
    }

    /// Overrides the line labor cost.
    #[must_use]
    pub fn with_total_labor_cost(mut self, total_labor_cost: Decimal) -> Self {
        self.total_labor_cost = total_labor_cost;
        self
    }

    /// Sets the per-unit and line estimated material price.
    #[must_use]
    pub fn with_estimate(
        mut self,
        estimated_price: Decimal,
        total_estimated_price: Decimal,
    ) -> Self {
        self.estimated_price = Some(estimated_price);
        self.total_estimated_price = Some(total_estimated_price);
        self
    }

    /// Sets the selling price.
    #[must_use]
    pub fn with_selling_price(mut self, selling_price: Decimal) -> Self {
        self.selling_price = Some(selling_price);
        self
    }

    /// Sets the computed line total.
    #[must_use]
    pub fn with_total(mut self, total: Decimal) -> Self {
        self.total = Some(total);
        self
    }
}

/// An overhead cost category of a BOQ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneralCost {
    /// Category name.
    pub type_name: String,
    /// Estimated cost, if already estimated.
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schemars(with = "Option<f64>")]
    pub estimated_cost: Option<Decimal>,
}

impl GeneralCost {
    /// Creates a general cost row.
    #[must_use]
    pub fn new(type_name: impl Into<String>, estimated_cost: Option<Decimal>) -> Self {
        Self {
            type_name: type_name.into(),
            estimated_cost,
        }
    }
}
