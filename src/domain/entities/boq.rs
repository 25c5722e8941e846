//! # Bill of Quantities
//!
//! The itemized job list of a project, gating quotation creation once
//! approved.
//!
//! A [`Boq`] is editable while `Draft`. Approval locks it: jobs and general
//! costs can no longer change and quotations may be derived from it.
//!
//! # Examples
//!
//! ```
//! use boq_quotation::domain::entities::boq::{Boq, BoqJob};
//! use boq_quotation::domain::value_objects::ProjectId;
//! use rust_decimal::Decimal;
//!
//! let mut boq = Boq::new(ProjectId::new_v4());
//! boq.add_job(BoqJob::new("Wall painting", "m2", Decimal::from(40), Decimal::from(3))).unwrap();
//! boq.approve().unwrap();
//!
//! assert!(boq.status().is_approved());
//! assert!(boq.add_job(BoqJob::new("Extra", "m", Decimal::ONE, Decimal::ONE)).is_err());
//! ```

use crate::domain::entities::quotation::{GeneralCost, QuotationJob};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::CheckedArithmetic;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{BoqId, BoqStatus, JobId, ProjectId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A job line item of a BOQ.
///
/// Prices are per unit. `estimated_price` and `selling_price` stay `None`
/// until somebody prices them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoqJob {
    /// Line identifier.
    pub id: JobId,
    /// Job name.
    pub name: String,
    /// Unit of measure.
    pub unit: String,
    /// Quantity in `unit`; must be positive.
    pub quantity: Decimal,
    /// Labor cost per unit; never absent.
    pub labor_cost: Decimal,
    /// Estimated material price per unit.
    pub estimated_price: Option<Decimal>,
    /// Selling price.
    pub selling_price: Option<Decimal>,
}

impl BoqJob {
    /// Creates a job with a fresh ID and no material or selling price.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        quantity: Decimal,
        labor_cost: Decimal,
    ) -> Self {
        Self {
            id: JobId::new_v4(),
            name: name.into(),
            unit: unit.into(),
            quantity,
            labor_cost,
            estimated_price: None,
            selling_price: None,
        }
    }

    /// Sets the estimated material price per unit.
    #[must_use]
    pub fn with_estimated_price(mut self, price: Decimal) -> Self {
        self.estimated_price = Some(price);
        self
    }

    /// Sets the selling price.
    #[must_use]
    pub fn with_selling_price(mut self, price: Decimal) -> Self {
        self.selling_price = Some(price);
        self
    }

    /// Checks quantity and price constraints.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` for a non-positive quantity
    /// and `DomainError::InvalidPrice` for any negative price.
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity <= Decimal::ZERO {
            return Err(DomainError::InvalidQuantity(format!(
                "quantity of '{}' must be positive, got {}",
                self.name, self.quantity
            )));
        }
        let prices = [
            ("labor cost", Some(self.labor_cost)),
            ("estimated price", self.estimated_price),
            ("selling price", self.selling_price),
        ];
        for (label, price) in prices {
            if let Some(value) = price
                && value < Decimal::ZERO
            {
                return Err(DomainError::InvalidPrice(format!(
                    "{label} of '{}' must not be negative, got {value}",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Projects the job into the row read by the quotation pipeline.
    ///
    /// Line labor is `quantity * labor_cost`. The material line and the
    /// computed total are only present when the material price is.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn to_quotation_job(&self) -> DomainResult<QuotationJob> {
        let total_labor_cost = self.quantity.safe_mul(self.labor_cost)?;
        let total_estimated_price = match self.estimated_price {
            Some(price) => Some(self.quantity.safe_mul(price)?),
            None => None,
        };
        let total = match total_estimated_price {
            Some(material) => Some(total_labor_cost.safe_add(material)?),
            None => None,
        };

        Ok(QuotationJob {
            job_name: self.name.clone(),
            unit: self.unit.clone(),
            quantity: self.quantity,
            labor_cost: self.labor_cost,
            total_labor_cost,
            estimated_price: self.estimated_price,
            total_estimated_price,
            selling_price: self.selling_price,
            total,
        })
    }
}

/// A project's bill of quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boq {
    id: BoqId,
    project_id: ProjectId,
    status: BoqStatus,
    jobs: Vec<BoqJob>,
    general_costs: Vec<GeneralCost>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Boq {
    /// Creates an empty draft BOQ for a project.
    #[must_use]
    pub fn new(project_id: ProjectId) -> Self {
        let now = Timestamp::now();
        Self {
            id: BoqId::new_v4(),
            project_id,
            status: BoqStatus::Draft,
            jobs: Vec::new(),
            general_costs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstructs a BOQ from storage without validation.
    #[must_use]
    pub fn from_parts(
        id: BoqId,
        project_id: ProjectId,
        status: BoqStatus,
        jobs: Vec<BoqJob>,
        general_costs: Vec<GeneralCost>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            project_id,
            status,
            jobs,
            general_costs,
            created_at,
            updated_at,
        }
    }

    /// Returns the BOQ ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> BoqId {
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
    pub fn status(&self) -> BoqStatus {
        self.status
    }

    /// Returns the job lines in insertion order.
    #[inline]
    #[must_use]
    pub fn jobs(&self) -> &[BoqJob] {
        &self.jobs
    }

    /// Returns the general cost categories.
    #[inline]
    #[must_use]
    pub fn general_costs(&self) -> &[GeneralCost] {
        &self.general_costs
    }

    /// Returns when the BOQ was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the BOQ was last modified.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Appends a job line.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BoqNotEditable` once approved, or a validation
    /// error for bad quantities and prices.
    pub fn add_job(&mut self, job: BoqJob) -> DomainResult<()> {
        self.ensure_editable("cannot add job")?;
        job.validate()?;
        if self.jobs.iter().any(|j| j.id == job.id) {
            return Err(DomainError::DuplicateJob(job.id.to_string()));
        }
        self.jobs.push(job);
        self.touch();
        Ok(())
    }

    /// Replaces the job line with the same ID.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::JobNotFound` if no line has that ID.
    pub fn update_job(&mut self, job: BoqJob) -> DomainResult<()> {
        self.ensure_editable("cannot update job")?;
        job.validate()?;
        let slot = self
            .jobs
            .iter_mut()
            .find(|j| j.id == job.id)
            .ok_or_else(|| DomainError::JobNotFound(job.id.to_string()))?;
        *slot = job;
        self.touch();
        Ok(())
    }

    /// Removes a job line.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::JobNotFound` if no line has that ID.
    pub fn remove_job(&mut self, job_id: JobId) -> DomainResult<()> {
        self.ensure_editable("cannot delete job")?;
        let before = self.jobs.len();
        self.jobs.retain(|j| j.id != job_id);
        if self.jobs.len() == before {
            return Err(DomainError::JobNotFound(job_id.to_string()));
        }
        self.touch();
        Ok(())
    }

    /// Sets the estimate of a general cost category, adding the category if
    /// it is new. `None` clears the estimate but keeps the category.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BoqNotEditable` once approved, or
    /// `DomainError::InvalidPrice` for a negative estimate.
    pub fn set_general_cost(
        &mut self,
        type_name: &str,
        estimated_cost: Option<Decimal>,
    ) -> DomainResult<()> {
        self.ensure_editable("cannot change general cost")?;
        if let Some(cost) = estimated_cost
            && cost < Decimal::ZERO
        {
            return Err(DomainError::InvalidPrice(format!(
                "general cost '{type_name}' must not be negative, got {cost}"
            )));
        }
        match self
            .general_costs
            .iter_mut()
            .find(|c| c.type_name == type_name)
        {
            Some(existing) => existing.estimated_cost = estimated_cost,
            None => self
                .general_costs
                .push(GeneralCost::new(type_name, estimated_cost)),
        }
        self.touch();
        Ok(())
    }

    /// Approves the BOQ, locking it for edits.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::BoqNotEditable` if already approved and
    /// `DomainError::ApprovalRejected` if the BOQ has no jobs.
    pub fn approve(&mut self) -> DomainResult<()> {
        self.ensure_editable("already approved")?;
        if self.jobs.is_empty() {
            return Err(DomainError::approval_rejected(
                "BOQ must contain at least one job",
            ));
        }
        self.status = BoqStatus::Approved;
        self.touch();
        Ok(())
    }

    /// Projects all job lines into quotation rows.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn quotation_jobs(&self) -> DomainResult<Vec<QuotationJob>> {
        self.jobs.iter().map(BoqJob::to_quotation_job).collect()
    }

    fn ensure_editable(&self, reason: &str) -> DomainResult<()> {
        if !self.status.is_editable() {
            return Err(DomainError::boq_not_editable(self.status, reason));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn painting() -> BoqJob {
        BoqJob::new("Painting", "m2", dec(10), dec(5))
    }

    mod jobs {
        use super::*;

        #[test]
        fn add_update_remove() {
            let mut boq = Boq::new(ProjectId::new_v4());
            let job = painting();
            let id = job.id;
            boq.add_job(job.clone()).unwrap();
            assert_eq!(boq.jobs().len(), 1);

            boq.update_job(job.with_selling_price(dec(120))).unwrap();
            assert_eq!(boq.jobs()[0].selling_price, Some(dec(120)));

            boq.remove_job(id).unwrap();
            assert!(boq.jobs().is_empty());
        }

        #[test]
        fn rejects_duplicate_id() {
            let mut boq = Boq::new(ProjectId::new_v4());
            let job = painting();
            boq.add_job(job.clone()).unwrap();
            assert!(matches!(
                boq.add_job(job),
                Err(DomainError::DuplicateJob(_))
            ));
        }

        #[test]
        fn update_unknown_job() {
            let mut boq = Boq::new(ProjectId::new_v4());
            assert!(matches!(
                boq.update_job(painting()),
                Err(DomainError::JobNotFound(_))
            ));
            assert!(matches!(
                boq.remove_job(JobId::new_v4()),
                Err(DomainError::JobNotFound(_))
            ));
        }

        #[test]
        fn rejects_zero_quantity_and_negative_prices() {
            let mut boq = Boq::new(ProjectId::new_v4());
            assert!(matches!(
                boq.add_job(BoqJob::new("x", "m", Decimal::ZERO, dec(1))),
                Err(DomainError::InvalidQuantity(_))
            ));
            assert!(matches!(
                boq.add_job(BoqJob::new("x", "m", dec(1), dec(-1))),
                Err(DomainError::InvalidPrice(_))
            ));
            assert!(matches!(
                boq.add_job(painting().with_estimated_price(dec(-2))),
                Err(DomainError::InvalidPrice(_))
            ));
        }

        #[test]
        fn zero_prices_are_valid() {
            let mut boq = Boq::new(ProjectId::new_v4());
            let job = BoqJob::new("Free", "m", dec(1), Decimal::ZERO)
                .with_estimated_price(Decimal::ZERO);
            boq.add_job(job).unwrap();
        }
    }

    mod approval {
        use super::*;

        #[test]
        fn empty_boq_cannot_be_approved() {
            let mut boq = Boq::new(ProjectId::new_v4());
            assert!(matches!(
                boq.approve(),
                Err(DomainError::ApprovalRejected(_))
            ));
            assert!(boq.status().is_editable());
        }

        #[test]
        fn approved_boq_is_locked() {
            let mut boq = Boq::new(ProjectId::new_v4());
            let job = painting();
            let id = job.id;
            boq.add_job(job).unwrap();
            boq.approve().unwrap();

            assert!(boq.add_job(painting()).is_err());
            assert!(boq.remove_job(id).is_err());
            assert!(boq.set_general_cost("Transport", Some(dec(10))).is_err());
            assert!(matches!(
                boq.approve(),
                Err(DomainError::BoqNotEditable { .. })
            ));
        }
    }

    mod general_costs {
        use super::*;

        #[test]
        fn set_general_cost_upserts_by_name() {
            let mut boq = Boq::new(ProjectId::new_v4());
            boq.set_general_cost("Transport", None).unwrap();
            boq.set_general_cost("Transport", Some(dec(30))).unwrap();
            boq.set_general_cost("Insurance", None).unwrap();

            assert_eq!(boq.general_costs().len(), 2);
            assert_eq!(boq.general_costs()[0].estimated_cost, Some(dec(30)));
            assert_eq!(boq.general_costs()[1].estimated_cost, None);
        }

        #[test]
        fn negative_general_cost_rejected() {
            let mut boq = Boq::new(ProjectId::new_v4());
            assert!(boq.set_general_cost("Transport", Some(dec(-5))).is_err());
        }
    }

    mod projection {
        use super::*;

        #[test]
        fn priced_job_has_material_and_total() {
            let job = BoqJob::new("Tiling", "m2", dec(2), dec(50)).with_estimated_price(dec(25));
            let row = job.to_quotation_job().unwrap();
            assert_eq!(row.total_labor_cost, dec(100));
            assert_eq!(row.total_estimated_price, Some(dec(50)));
            assert_eq!(row.total, Some(dec(150)));
        }

        #[test]
        fn unpriced_job_keeps_material_absent() {
            let row = BoqJob::new("Digging", "m3", dec(4), dec(50))
                .to_quotation_job()
                .unwrap();
            assert_eq!(row.total_labor_cost, dec(200));
            assert!(row.estimated_price.is_none());
            assert!(row.total_estimated_price.is_none());
            assert!(row.total.is_none());
        }

        #[test]
        fn projection_overflow_is_an_error() {
            let job = BoqJob::new("Huge", "m", Decimal::MAX, dec(2));
            assert!(matches!(
                job.to_quotation_job(),
                Err(DomainError::Arithmetic(_))
            ));
        }
    }
}
