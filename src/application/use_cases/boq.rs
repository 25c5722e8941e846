//! # BOQ Use Case
//!
//! Editing and approval of a project's bill of quantities.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{Boq, BoqJob};
use crate::domain::value_objects::{BoqId, JobId, ProjectId};
use crate::infrastructure::persistence::BoqRepository;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// BOQ workflow over a [`BoqRepository`].
#[derive(Debug, Clone)]
pub struct BoqUseCase {
    repository: Arc<dyn BoqRepository>,
}

impl BoqUseCase {
    /// Creates a use case over `repository`.
    #[must_use]
    pub fn new(repository: Arc<dyn BoqRepository>) -> Self {
        Self { repository }
    }

    /// Returns the project's BOQ, creating an empty draft if needed.
    ///
    /// # Errors
    ///
    /// Returns `Repository` if storage fails.
    #[instrument(skip(self), fields(%project_id))]
    pub async fn open_for_project(&self, project_id: ProjectId) -> ApplicationResult<Boq> {
        let boq = self
            .repository
            .create_for_project(project_id)
            .await
            .map_err(ApplicationError::repository("open BOQ"))?;
        debug!(boq_id = %boq.id(), status = %boq.status(), "BOQ opened");
        Ok(boq)
    }

    /// Returns the BOQ of a project.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the project has no BOQ.
    #[instrument(skip(self), fields(%project_id))]
    pub async fn get_by_project(&self, project_id: ProjectId) -> ApplicationResult<Boq> {
        self.repository
            .get_by_project(project_id)
            .await
            .map_err(ApplicationError::repository("get BOQ"))?
            .ok_or_else(|| ApplicationError::not_found("Boq", project_id.to_string()))
    }

    /// Appends a job line.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the BOQ is approved or the job is invalid
    /// - `NotFound` if the BOQ does not exist
    #[instrument(skip(self, job), fields(%boq_id, job_id = %job.id))]
    pub async fn add_job(&self, boq_id: BoqId, job: BoqJob) -> ApplicationResult<()> {
        self.repository
            .add_job(boq_id, &job)
            .await
            .map_err(ApplicationError::repository("add job"))?;
        info!(name = %job.name, "job added");
        Ok(())
    }

    /// Replaces a job line.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the BOQ is approved or the job is invalid
    /// - `NotFound` if the BOQ or the job does not exist
    #[instrument(skip(self, job), fields(%boq_id, job_id = %job.id))]
    pub async fn update_job(&self, boq_id: BoqId, job: BoqJob) -> ApplicationResult<()> {
        self.repository
            .update_job(boq_id, &job)
            .await
            .map_err(ApplicationError::repository("update job"))?;
        info!("job updated");
        Ok(())
    }

    /// Removes a job line.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the BOQ is approved
    /// - `NotFound` if the BOQ or the job does not exist
    #[instrument(skip(self))]
    pub async fn delete_job(&self, boq_id: BoqId, job_id: JobId) -> ApplicationResult<()> {
        self.repository
            .delete_job(boq_id, job_id)
            .await
            .map_err(ApplicationError::repository("delete job"))?;
        info!("job deleted");
        Ok(())
    }

    /// Sets or clears a general cost estimate.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the BOQ is approved or the estimate is
    ///   negative
    /// - `NotFound` if the BOQ does not exist
    #[instrument(skip(self))]
    pub async fn set_general_cost(
        &self,
        boq_id: BoqId,
        type_name: &str,
        estimated_cost: Option<Decimal>,
    ) -> ApplicationResult<()> {
        self.repository
            .set_general_cost(boq_id, type_name, estimated_cost)
            .await
            .map_err(ApplicationError::repository("set general cost"))?;
        debug!("general cost set");
        Ok(())
    }

    /// Approves a BOQ, locking it and allowing quotations.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the BOQ is already approved or has no jobs
    /// - `NotFound` if the BOQ does not exist
    #[instrument(skip(self))]
    pub async fn approve(&self, boq_id: BoqId) -> ApplicationResult<()> {
        self.repository
            .approve(boq_id)
            .await
            .map_err(ApplicationError::repository("approve BOQ"))?;
        info!("BOQ approved");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::in_memory::InMemoryBoqRepository;

    fn use_case() -> BoqUseCase {
        BoqUseCase::new(Arc::new(InMemoryBoqRepository::new()))
    }

    fn job() -> BoqJob {
        BoqJob::new("Concrete slab", "m3", Decimal::from(8), Decimal::from(120))
    }

    #[tokio::test]
    async fn open_is_idempotent() {
        let uc = use_case();
        let project = ProjectId::new_v4();
        let a = uc.open_for_project(project).await.unwrap();
        let b = uc.open_for_project(project).await.unwrap();
        assert_eq!(a.id(), b.id());
    }

    #[tokio::test]
    async fn missing_boq_is_not_found() {
        let err = use_case()
            .get_by_project(ProjectId::new_v4())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn edits_after_approval_are_rejected() {
        let uc = use_case();
        let project = ProjectId::new_v4();
        let boq = uc.open_for_project(project).await.unwrap();
        let job = job();
        uc.add_job(boq.id(), job.clone()).await.unwrap();
        uc.approve(boq.id()).await.unwrap();

        let err = uc.add_job(boq.id(), BoqJob::new("Late", "m", Decimal::ONE, Decimal::ONE))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(uc.delete_job(boq.id(), job.id).await.unwrap_err().is_validation());
        assert!(uc.approve(boq.id()).await.unwrap_err().is_validation());

        let stored = uc.get_by_project(project).await.unwrap();
        assert_eq!(stored.jobs().len(), 1);
    }

    #[tokio::test]
    async fn empty_boq_cannot_be_approved() {
        let uc = use_case();
        let boq = uc.open_for_project(ProjectId::new_v4()).await.unwrap();
        let err = uc.approve(boq.id()).await.unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("at least one job"));
    }

    #[tokio::test]
    async fn update_and_delete_unknown_job() {
        let uc = use_case();
        let boq = uc.open_for_project(ProjectId::new_v4()).await.unwrap();
        assert!(uc.update_job(boq.id(), job()).await.unwrap_err().is_not_found());
        assert!(
            uc.delete_job(boq.id(), JobId::new_v4())
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn general_cost_round_trip() {
        let uc = use_case();
        let project = ProjectId::new_v4();
        let boq = uc.open_for_project(project).await.unwrap();
        uc.set_general_cost(boq.id(), "Site office", Some(Decimal::from(450)))
            .await
            .unwrap();

        let stored = uc.get_by_project(project).await.unwrap();
        assert_eq!(
            stored.general_costs()[0].estimated_cost,
            Some(Decimal::from(450))
        );
    }

    #[tokio::test]
    async fn negative_job_price_is_rejected() {
        let uc = use_case();
        let boq = uc.open_for_project(ProjectId::new_v4()).await.unwrap();
        let err = uc
            .add_job(boq.id(), job().with_estimated_price(Decimal::from(-1)))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
