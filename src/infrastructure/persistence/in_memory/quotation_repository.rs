//! # In-Memory Quotation Repository
//!
//! In-memory implementation of [`QuotationRepository`] for testing.
//!
//! Reads BOQ data from the storage of an [`InMemoryBoqRepository`] and keeps
//! project details for exports in a small registry.

use super::boq_repository::{find_by_project, BoqStorage, InMemoryBoqRepository};
use crate::domain::entities::{
    ExportProject, GeneralCost, Quotation, QuotationExportData, QuotationJob,
};
use crate::domain::services::{check_quotation_approval, ApprovalSnapshot, QuotationAggregator};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{BoqStatus, ProjectId, QuotationStatus};
use crate::infrastructure::persistence::traits::{
    QuotationRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`QuotationRepository`].
///
/// Quotations are keyed by project, so the one-quotation-per-project rule
/// holds by construction.
#[derive(Debug, Clone)]
pub struct InMemoryQuotationRepository {
    boqs: BoqStorage,
    quotations: Arc<RwLock<HashMap<ProjectId, Quotation>>>,
    projects: Arc<RwLock<HashMap<ProjectId, ExportProject>>>,
}

impl InMemoryQuotationRepository {
    /// Creates a repository reading BOQs from `boqs`.
    #[must_use]
    pub fn new(boqs: &InMemoryBoqRepository) -> Self {
        Self {
            boqs: boqs.storage(),
            quotations: Arc::new(RwLock::new(HashMap::new())),
            projects: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers the project and client details used in exports.
    pub async fn register_project(&self, project: ExportProject) {
        let mut projects = self.projects.write().await;
        projects.insert(project.project_id, project);
    }

    /// Returns the number of quotations in the repository.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quotations
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if the repository holds no quotations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all quotations and registered projects.
    pub async fn clear(&self) {
        self.quotations.write().await.clear();
        self.projects.write().await.clear();
    }

    async fn rows(
        &self,
        project_id: ProjectId,
    ) -> RepositoryResult<(Vec<QuotationJob>, Vec<GeneralCost>)> {
        let boqs = self.boqs.read().await;
        match find_by_project(&boqs, project_id) {
            Some(boq) => Ok((boq.quotation_jobs()?, boq.general_costs().to_vec())),
            None => Ok((Vec::new(), Vec::new())),
        }
    }
}

#[async_trait]
impl QuotationRepository for InMemoryQuotationRepository {
    async fn check_boq_status(&self, project_id: ProjectId) -> RepositoryResult<Option<BoqStatus>> {
        let boqs = self.boqs.read().await;
        Ok(find_by_project(&boqs, project_id).map(|b| b.status()))
    }

    async fn get_by_project_id(
        &self,
        project_id: ProjectId,
    ) -> RepositoryResult<Option<Quotation>> {
        let quotations = self.quotations.read().await;
        Ok(quotations.get(&project_id).cloned())
    }

    async fn create(&self, project_id: ProjectId) -> RepositoryResult<Quotation> {
        let mut quotations = self.quotations.write().await;
        let quotation = quotations
            .entry(project_id)
            .or_insert_with(|| Quotation::new(project_id));
        Ok(quotation.clone())
    }

    async fn get_quotation_jobs(
        &self,
        project_id: ProjectId,
    ) -> RepositoryResult<Vec<QuotationJob>> {
        let (jobs, _) = self.rows(project_id).await?;
        Ok(jobs)
    }

    async fn get_quotation_general_costs(
        &self,
        project_id: ProjectId,
    ) -> RepositoryResult<Vec<GeneralCost>> {
        let (_, costs) = self.rows(project_id).await?;
        Ok(costs)
    }

    async fn validate_approval(&self, project_id: ProjectId) -> RepositoryResult<()> {
        let boqs = self.boqs.read().await;
        let quotations = self.quotations.read().await;
        let boq = find_by_project(&boqs, project_id);

        let snapshot = ApprovalSnapshot {
            boq_status: boq.map(|b| b.status()),
            quotation_status: quotations.get(&project_id).map(Quotation::status),
            job_count: boq.map_or(0, |b| b.jobs().len()),
        };
        check_quotation_approval(snapshot)
            .map_err(|violation| RepositoryError::approval(violation, project_id))
    }

    async fn approve_quotation(&self, project_id: ProjectId) -> RepositoryResult<()> {
        let mut quotations = self.quotations.write().await;
        let quotation = quotations
            .get_mut(&project_id)
            .ok_or_else(|| RepositoryError::not_found("Quotation", project_id.to_string()))?;
        Ok(quotation.approve()?)
    }

    async fn get_quotation_status(
        &self,
        project_id: ProjectId,
    ) -> RepositoryResult<Option<QuotationStatus>> {
        let quotations = self.quotations.read().await;
        Ok(quotations.get(&project_id).map(Quotation::status))
    }

    async fn get_export_data(
        &self,
        project_id: ProjectId,
    ) -> RepositoryResult<QuotationExportData> {
        let quotation = self
            .get_by_project_id(project_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Quotation", project_id.to_string()))?;
        let project = self
            .projects
            .read()
            .await
            .get(&project_id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("Project", project_id.to_string()))?;
        let (jobs, general_costs) = self.rows(project_id).await?;
        let summary =
            QuotationAggregator::summarize(quotation.tax_percentage(), &jobs, &general_costs)?;

        Ok(QuotationExportData {
            project,
            quotation,
            jobs,
            general_costs,
            summary,
        })
    }

    async fn update_terms(
        &self,
        project_id: ProjectId,
        valid_until: Option<Timestamp>,
        tax_percentage: Option<Decimal>,
    ) -> RepositoryResult<Quotation> {
        let mut quotations = self.quotations.write().await;
        let quotation = quotations
            .get_mut(&project_id)
            .ok_or_else(|| RepositoryError::not_found("Quotation", project_id.to_string()))?;
        quotation.set_terms(valid_until, tax_percentage)?;
        Ok(quotation.clone())
    }
}
