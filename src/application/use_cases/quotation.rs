//! # Quotation Use Case
//!
//! Orchestrates quotation creation, approval, export and term updates.
//!
//! Repository calls are issued one after another; nothing runs in the
//! background and nothing is retried. Dropping a returned future cancels
//! the call in flight.
//!
//! # Flow
//!
//! ```text
//! create_or_get_quotation: BOQ approved? -> get or create -> jobs -> costs -> aggregate
//! approve_quotation:       validate -> approve -> re-read and aggregate
//! export_quotation:        BOQ approved? -> quotation approved? -> export bundle
//! ```

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{validate_tax_percentage, Quotation, QuotationExportData};
use crate::domain::services::QuotationAggregator;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{
    BoqStatus, ProjectId, QuotationResponse, QuotationStatus,
};
use crate::infrastructure::persistence::QuotationRepository;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Quotation workflow over a [`QuotationRepository`].
#[derive(Debug, Clone)]
pub struct QuotationUseCase {
    repository: Arc<dyn QuotationRepository>,
}

impl QuotationUseCase {
    /// Creates a use case over `repository`.
    #[must_use]
    pub fn new(repository: Arc<dyn QuotationRepository>) -> Self {
        Self { repository }
    }

    /// Returns the priced quotation of a project, creating the draft on
    /// first request.
    ///
    /// # Errors
    ///
    /// - `PreconditionFailed` unless the project's BOQ is approved; no
    ///   quotation is created in that case
    /// - `Repository` if a read or the creation fails
    /// - `Domain` if pricing overflows
    #[instrument(skip(self), fields(%project_id))]
    pub async fn create_or_get_quotation(
        &self,
        project_id: ProjectId,
    ) -> ApplicationResult<QuotationResponse> {
        self.require_boq_approved(project_id, "creating quotation")
            .await?;

        let existing = self
            .repository
            .get_by_project_id(project_id)
            .await
            .map_err(ApplicationError::repository("get quotation"))?;
        let quotation = match existing {
            Some(quotation) => quotation,
            None => {
                let created = self
                    .repository
                    .create(project_id)
                    .await
                    .map_err(ApplicationError::repository("create quotation"))?;
                info!(quotation_id = %created.id(), "quotation created");
                created
            }
        };

        self.price(&quotation).await
    }

    /// Approves the project's draft quotation.
    ///
    /// Once the status change is stored it is not rolled back; a failure
    /// while re-reading the approved quotation is still reported.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no quotation exists
    /// - `ValidationFailed` if an approval rule is violated
    /// - `Repository` if a storage call fails
    #[instrument(skip(self), fields(%project_id))]
    pub async fn approve_quotation(&self, project_id: ProjectId) -> ApplicationResult<()> {
        if let Err(err) = self.repository.validate_approval(project_id).await {
            warn!(error = %err, "quotation approval rejected");
            return Err(ApplicationError::from_repository("validate approval", err));
        }

        self.repository
            .approve_quotation(project_id)
            .await
            .map_err(ApplicationError::repository("approve quotation"))?;
        info!("quotation approved");

        let quotation = self
            .repository
            .get_by_project_id(project_id)
            .await
            .map_err(ApplicationError::repository("get approved quotation"))?
            .ok_or_else(|| ApplicationError::not_found("Quotation", project_id.to_string()))?;
        let response = self.price(&quotation).await?;
        debug!(
            status = %response.status,
            total = %response.summary.total,
            "approved quotation priced"
        );
        Ok(())
    }

    /// Returns the export bundle of an approved quotation.
    ///
    /// # Errors
    ///
    /// - `PreconditionFailed` unless both the BOQ and the quotation are
    ///   approved
    /// - `NotFound` if the project details are missing
    /// - `Repository` if a storage call fails
    #[instrument(skip(self), fields(%project_id))]
    pub async fn export_quotation(
        &self,
        project_id: ProjectId,
    ) -> ApplicationResult<QuotationExportData> {
        self.require_boq_approved(project_id, "exporting quotation")
            .await?;

        let status = self
            .repository
            .get_quotation_status(project_id)
            .await
            .map_err(ApplicationError::repository("get quotation status"))?;
        if status != Some(QuotationStatus::Approved) {
            warn!(?status, "export rejected");
            return Err(ApplicationError::precondition_failed(
                "quotation must be approved before exporting",
            ));
        }

        let data = self
            .repository
            .get_export_data(project_id)
            .await
            .map_err(ApplicationError::repository("get export data"))?;
        debug!(jobs = data.jobs.len(), "export data loaded");
        Ok(data)
    }

    /// Sets the validity date and tax percentage of a draft quotation.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the tax percentage is outside `0..=100`
    /// - `NotFound` if no quotation exists
    /// - `PreconditionFailed` if the quotation is already approved
    /// - `Repository` if a storage call fails
    #[instrument(skip(self), fields(%project_id))]
    pub async fn update_quotation_terms(
        &self,
        project_id: ProjectId,
        valid_until: Option<Timestamp>,
        tax_percentage: Option<Decimal>,
    ) -> ApplicationResult<Quotation> {
        if let Some(tax) = tax_percentage {
            validate_tax_percentage(tax)
                .map_err(|e| ApplicationError::validation_failed(e.to_string()))?;
        }

        let status = self
            .repository
            .get_quotation_status(project_id)
            .await
            .map_err(ApplicationError::repository("get quotation status"))?;
        match status {
            None => {
                return Err(ApplicationError::not_found(
                    "Quotation",
                    project_id.to_string(),
                ));
            }
            Some(QuotationStatus::Approved) => {
                return Err(ApplicationError::precondition_failed(
                    "quotation terms can only be changed while draft",
                ));
            }
            Some(QuotationStatus::Draft) => {}
        }

        let quotation = self
            .repository
            .update_terms(project_id, valid_until, tax_percentage)
            .await
            .map_err(ApplicationError::repository("update quotation terms"))?;
        info!("quotation terms updated");
        Ok(quotation)
    }

    async fn require_boq_approved(
        &self,
        project_id: ProjectId,
        action: &str,
    ) -> ApplicationResult<()> {
        let status = self
            .repository
            .check_boq_status(project_id)
            .await
            .map_err(ApplicationError::repository("check BOQ status"))?;
        if status != Some(BoqStatus::Approved) {
            warn!(?status, action, "BOQ not approved");
            return Err(ApplicationError::precondition_failed(format!(
                "BOQ must be approved before {action}"
            )));
        }
        Ok(())
    }

    async fn price(&self, quotation: &Quotation) -> ApplicationResult<QuotationResponse> {
        let project_id = quotation.project_id();
        let jobs = self
            .repository
            .get_quotation_jobs(project_id)
            .await
            .map_err(ApplicationError::repository("get quotation jobs"))?;
        let costs = self
            .repository
            .get_quotation_general_costs(project_id)
            .await
            .map_err(ApplicationError::repository("get general costs"))?;

        Ok(QuotationAggregator::build_response(quotation, &jobs, &costs)?)
    }
}
