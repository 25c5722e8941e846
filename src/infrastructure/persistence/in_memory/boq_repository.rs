//! # In-Memory BOQ Repository
//!
//! In-memory implementation of [`BoqRepository`] for testing.
//!
//! The BOQ map is shared with
//! [`InMemoryQuotationRepository`](super::InMemoryQuotationRepository) so
//! that quotations see BOQ edits immediately.

use crate::domain::entities::{Boq, BoqJob};
use crate::domain::value_objects::{BoqId, JobId, ProjectId};
use crate::infrastructure::persistence::traits::{
    BoqRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared BOQ storage keyed by BOQ ID.
pub(crate) type BoqStorage = Arc<RwLock<HashMap<BoqId, Boq>>>;

/// Finds the BOQ of a project.
pub(crate) fn find_by_project(
    storage: &HashMap<BoqId, Boq>,
    project_id: ProjectId,
) -> Option<&Boq> {
    storage.values().find(|b| b.project_id() == project_id)
}

/// In-memory implementation of [`BoqRepository`].
#[derive(Debug, Clone)]
pub struct InMemoryBoqRepository {
    storage: BoqStorage,
}

impl InMemoryBoqRepository {
    /// Creates a new empty in-memory BOQ repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of BOQs in the repository.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all BOQs from the repository.
    pub async fn clear(&self) {
        let mut storage = self.storage.write().await;
        storage.clear();
    }

    pub(crate) fn storage(&self) -> BoqStorage {
        Arc::clone(&self.storage)
    }

    /// Applies `edit` to a stored BOQ under the write lock.
    ///
    /// The stored BOQ is only replaced when the edit succeeds.
    async fn modify<F>(&self, id: BoqId, edit: F) -> RepositoryResult<()>
    where
        F: FnOnce(&mut Boq) -> RepositoryResult<()> + Send,
    {
        let mut storage = self.storage.write().await;
        let stored = storage
            .get(&id)
            .ok_or_else(|| RepositoryError::not_found("Boq", id.to_string()))?;
        let mut boq = stored.clone();
        edit(&mut boq)?;
        storage.insert(id, boq);
        Ok(())
    }
}

impl Default for InMemoryBoqRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BoqRepository for InMemoryBoqRepository {
    async fn create_for_project(&self, project_id: ProjectId) -> RepositoryResult<Boq> {
        let mut storage = self.storage.write().await;
        if let Some(existing) = find_by_project(&storage, project_id) {
            return Ok(existing.clone());
        }
        let boq = Boq::new(project_id);
        storage.insert(boq.id(), boq.clone());
        Ok(boq)
    }

    async fn get(&self, id: BoqId) -> RepositoryResult<Option<Boq>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&id).cloned())
    }

    async fn get_by_project(&self, project_id: ProjectId) -> RepositoryResult<Option<Boq>> {
        let storage = self.storage.read().await;
        Ok(find_by_project(&storage, project_id).cloned())
    }

    async fn approve(&self, id: BoqId) -> RepositoryResult<()> {
        self.modify(id, |boq| Ok(boq.approve()?)).await
    }

    async fn add_job(&self, id: BoqId, job: &BoqJob) -> RepositoryResult<()> {
        let job = job.clone();
        self.modify(id, |boq| Ok(boq.add_job(job)?)).await
    }

    async fn update_job(&self, id: BoqId, job: &BoqJob) -> RepositoryResult<()> {
        let job = job.clone();
        self.modify(id, |boq| Ok(boq.update_job(job)?)).await
    }

    async fn delete_job(&self, id: BoqId, job_id: JobId) -> RepositoryResult<()> {
        self.modify(id, |boq| Ok(boq.remove_job(job_id)?)).await
    }

    async fn set_general_cost(
        &self,
        id: BoqId,
        type_name: &str,
        estimated_cost: Option<Decimal>,
    ) -> RepositoryResult<()> {
        self.modify(id, |boq| Ok(boq.set_general_cost(type_name, estimated_cost)?))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn job() -> BoqJob {
        BoqJob::new("Excavation", "m3", Decimal::from(12), Decimal::from(40))
    }

    #[tokio::test]
    async fn new_repository_is_empty() {
        let repo = InMemoryBoqRepository::new();
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn create_for_project_is_idempotent() {
        let repo = InMemoryBoqRepository::new();
        let project = ProjectId::new_v4();

        let first = repo.create_for_project(project).await.unwrap();
        let second = repo.create_for_project(project).await.unwrap();

        assert_eq!(first.id(), second.id());
        assert_eq!(repo.len(), 1);
        assert!(first.status().is_editable());
    }

    #[tokio::test]
    async fn get_by_project() {
        let repo = InMemoryBoqRepository::new();
        let project = ProjectId::new_v4();
        assert!(repo.get_by_project(project).await.unwrap().is_none());

        let boq = repo.create_for_project(project).await.unwrap();
        let found = repo.get_by_project(project).await.unwrap().unwrap();
        assert_eq!(found.id(), boq.id());
        assert!(repo.get(boq.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn job_lifecycle() {
        let repo = InMemoryBoqRepository::new();
        let boq = repo.create_for_project(ProjectId::new_v4()).await.unwrap();
        let job = job();

        repo.add_job(boq.id(), &job).await.unwrap();
        let priced = job.clone().with_estimated_price(Decimal::from(15));
        repo.update_job(boq.id(), &priced).await.unwrap();

        let stored = repo.get(boq.id()).await.unwrap().unwrap();
        assert_eq!(stored.jobs()[0].estimated_price, Some(Decimal::from(15)));

        repo.delete_job(boq.id(), job.id).await.unwrap();
        let stored = repo.get(boq.id()).await.unwrap().unwrap();
        assert!(stored.jobs().is_empty());
    }

    #[tokio::test]
    async fn unknown_boq_is_not_found() {
        let repo = InMemoryBoqRepository::new();
        let err = repo.add_job(BoqId::new_v4(), &job()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn approved_boq_rejects_edits() {
        let repo = InMemoryBoqRepository::new();
        let boq = repo.create_for_project(ProjectId::new_v4()).await.unwrap();
        repo.add_job(boq.id(), &job()).await.unwrap();
        repo.approve(boq.id()).await.unwrap();

        let err = repo.add_job(boq.id(), &job()).await.unwrap_err();
        assert!(err.is_validation());

        let err = repo
            .set_general_cost(boq.id(), "Transport", Some(Decimal::TEN))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn empty_boq_cannot_be_approved() {
        let repo = InMemoryBoqRepository::new();
        let boq = repo.create_for_project(ProjectId::new_v4()).await.unwrap();

        let err = repo.approve(boq.id()).await.unwrap_err();
        assert!(err.is_validation());

        let stored = repo.get(boq.id()).await.unwrap().unwrap();
        assert!(stored.status().is_editable());
    }

    #[tokio::test]
    async fn failed_edit_leaves_boq_unchanged() {
        let repo = InMemoryBoqRepository::new();
        let boq = repo.create_for_project(ProjectId::new_v4()).await.unwrap();
        let bad = BoqJob::new("Bad", "m", Decimal::ZERO, Decimal::ONE);

        assert!(repo.add_job(boq.id(), &bad).await.is_err());
        let stored = repo.get(boq.id()).await.unwrap().unwrap();
        assert!(stored.jobs().is_empty());
    }
}
