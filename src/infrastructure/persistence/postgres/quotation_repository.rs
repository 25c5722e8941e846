//! # PostgreSQL Quotation Repository
//!
//! PostgreSQL implementation of [`QuotationRepository`] using sqlx.
//!
//! The unique constraint on `quotation.project_id` backs the
//! one-quotation-per-project rule; [`create`](QuotationRepository::create)
//! inserts with `ON CONFLICT DO NOTHING` and then reads back whichever row
//! won.

use super::boq_repository::load_by_project;
use crate::domain::entities::{
    ExportProject, GeneralCost, Quotation, QuotationExportData, QuotationJob,
};
use crate::domain::services::{check_quotation_approval, ApprovalSnapshot, QuotationAggregator};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{
    BoqStatus, ParseEnumError, ProjectId, QuotationId, QuotationStatus,
};
use crate::domain::DomainError;
use crate::infrastructure::persistence::traits::{
    QuotationRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres};
use tracing::{debug, info};
use uuid::Uuid;

const SELECT_QUOTATION: &str = r#"
    SELECT id, project_id, status, valid_until, tax_percentage, created_at, updated_at
    FROM quotation
    WHERE project_id = $1
"#;

const SELECT_QUOTATION_FOR_UPDATE: &str = r#"
    SELECT id, project_id, status, valid_until, tax_percentage, created_at, updated_at
    FROM quotation
    WHERE project_id = $1
    FOR UPDATE
"#;

/// PostgreSQL implementation of [`QuotationRepository`].
///
/// Reads BOQ data from the tables owned by
/// [`PostgresBoqRepository`](super::PostgresBoqRepository) and project
/// details from the `project` table.
#[derive(Debug, Clone)]
pub struct PostgresQuotationRepository {
    pool: PgPool,
}

impl PostgresQuotationRepository {
    /// Creates a new PostgreSQL quotation repository.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn acquire(&self) -> RepositoryResult<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))
    }

    async fn rows(
        &self,
        conn: &mut PgConnection,
        project_id: ProjectId,
    ) -> RepositoryResult<(Vec<QuotationJob>, Vec<GeneralCost>)> {
        match load_by_project(conn, project_id).await? {
            Some(boq) => Ok((boq.quotation_jobs()?, boq.general_costs().to_vec())),
            None => Ok((Vec::new(), Vec::new())),
        }
    }
}

#[async_trait]
impl QuotationRepository for PostgresQuotationRepository {
    async fn check_boq_status(&self, project_id: ProjectId) -> RepositoryResult<Option<BoqStatus>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT status FROM boq WHERE project_id = $1")
            .bind(project_id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        row.map(|(status,)| parse_status(&status)).transpose()
    }

    async fn get_by_project_id(
        &self,
        project_id: ProjectId,
    ) -> RepositoryResult<Option<Quotation>> {
        let row: Option<QuotationRow> = sqlx::query_as(SELECT_QUOTATION)
            .bind(project_id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        row.map(QuotationRow::try_into_quotation).transpose()
    }

    async fn create(&self, project_id: ProjectId) -> RepositoryResult<Quotation> {
        let draft = Quotation::new(project_id);

        let result = sqlx::query(
            r#"
            INSERT INTO quotation (id, project_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (project_id) DO NOTHING
            "#,
        )
        .bind(draft.id().get())
        .bind(project_id.get())
        .bind(draft.status().as_str())
        .bind(draft.created_at().as_datetime())
        .bind(draft.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        if result.rows_affected() > 0 {
            info!(%project_id, quotation_id = %draft.id(), "quotation created");
        } else {
            debug!(%project_id, "quotation already existed");
        }

        self.get_by_project_id(project_id)
            .await?
            .ok_or_else(|| RepositoryError::internal("quotation vanished after upsert"))
    }

    async fn get_quotation_jobs(
        &self,
        project_id: ProjectId,
    ) -> RepositoryResult<Vec<QuotationJob>> {
        let mut conn = self.acquire().await?;
        let (jobs, _) = self.rows(&mut conn, project_id).await?;
        Ok(jobs)
    }

    async fn get_quotation_general_costs(
        &self,
        project_id: ProjectId,
    ) -> RepositoryResult<Vec<GeneralCost>> {
        let mut conn = self.acquire().await?;
        let (_, costs) = self.rows(&mut conn, project_id).await?;
        Ok(costs)
    }

    async fn validate_approval(&self, project_id: ProjectId) -> RepositoryResult<()> {
        let mut conn = self.acquire().await?;
        let boq = load_by_project(&mut conn, project_id).await?;
        let row: Option<(String,)> =
            sqlx::query_as("SELECT status FROM quotation WHERE project_id = $1")
                .bind(project_id.get())
                .fetch_optional(&mut *conn)
                .await
                .map_err(|e| RepositoryError::query(e.to_string()))?;
        let quotation_status = row.map(|(s,)| parse_status(&s)).transpose()?;

        let snapshot = ApprovalSnapshot {
            boq_status: boq.as_ref().map(|b| b.status()),
            quotation_status,
            job_count: boq.as_ref().map_or(0, |b| b.jobs().len()),
        };
        check_quotation_approval(snapshot)
            .map_err(|violation| RepositoryError::approval(violation, project_id))
    }

    async fn approve_quotation(&self, project_id: ProjectId) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE quotation
            SET status = $2, updated_at = $3
            WHERE project_id = $1 AND status = $4
            "#,
        )
        .bind(project_id.get())
        .bind(QuotationStatus::Approved.as_str())
        .bind(Utc::now())
        .bind(QuotationStatus::Draft.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return match self.get_quotation_status(project_id).await? {
                None => Err(RepositoryError::not_found(
                    "Quotation",
                    project_id.to_string(),
                )),
                Some(from) => Err(DomainError::InvalidQuotationTransition {
                    from,
                    to: QuotationStatus::Approved,
                }
                .into()),
            };
        }

        info!(%project_id, "quotation approved");
        Ok(())
    }

    async fn get_quotation_status(
        &self,
        project_id: ProjectId,
    ) -> RepositoryResult<Option<QuotationStatus>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT status FROM quotation WHERE project_id = $1")
                .bind(project_id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::query(e.to_string()))?;

        row.map(|(status,)| parse_status(&status)).transpose()
    }

    async fn get_export_data(
        &self,
        project_id: ProjectId,
    ) -> RepositoryResult<QuotationExportData> {
        let mut conn = self.acquire().await?;

        let project: ProjectRow = sqlx::query_as(
            r#"
            SELECT id, name, address, client_name, client_email,
                   client_tel, client_address, client_tax_id
            FROM project
            WHERE id = $1
            "#,
        )
        .bind(project_id.get())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?
        .ok_or_else(|| RepositoryError::not_found("Project", project_id.to_string()))?;

        let quotation = sqlx::query_as::<_, QuotationRow>(SELECT_QUOTATION)
            .bind(project_id.get())
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?
            .ok_or_else(|| RepositoryError::not_found("Quotation", project_id.to_string()))?
            .try_into_quotation()?;

        let (jobs, general_costs) = self.rows(&mut conn, project_id).await?;
        let summary =
            QuotationAggregator::summarize(quotation.tax_percentage(), &jobs, &general_costs)?;

        Ok(QuotationExportData {
            project: project.into_export_project(),
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
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))?;

        let mut quotation = sqlx::query_as::<_, QuotationRow>(SELECT_QUOTATION_FOR_UPDATE)
            .bind(project_id.get())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?
            .ok_or_else(|| RepositoryError::not_found("Quotation", project_id.to_string()))?
            .try_into_quotation()?;
        quotation.set_terms(valid_until, tax_percentage)?;

        sqlx::query(
            r#"
            UPDATE quotation
            SET valid_until = $2, tax_percentage = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(quotation.id().get())
        .bind(quotation.valid_until().map(DateTime::<Utc>::from))
        .bind(quotation.tax_percentage())
        .bind(quotation.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
        info!(%project_id, "quotation terms updated");
        Ok(quotation)
    }
}

fn parse_status<S>(value: &str) -> RepositoryResult<S>
where
    S: std::str::FromStr<Err = ParseEnumError>,
{
    value
        .parse()
        .map_err(|e: ParseEnumError| RepositoryError::serialization(e.to_string()))
}

/// Row type for quotation queries.
#[derive(Debug, sqlx::FromRow)]
struct QuotationRow {
    id: Uuid,
    project_id: Uuid,
    status: String,
    valid_until: Option<DateTime<Utc>>,
    tax_percentage: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl QuotationRow {
    fn try_into_quotation(self) -> RepositoryResult<Quotation> {
        Ok(Quotation::from_parts(
            QuotationId::new(self.id),
            ProjectId::new(self.project_id),
            parse_status(&self.status)?,
            self.valid_until.map(Timestamp::from),
            self.tax_percentage,
            self.created_at.into(),
            self.updated_at.into(),
        ))
    }
}

/// Row type for project queries.
#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    name: String,
    address: Option<String>,
    client_name: Option<String>,
    client_email: Option<String>,
    client_tel: Option<String>,
    client_address: Option<String>,
    client_tax_id: Option<String>,
}

impl ProjectRow {
    fn into_export_project(self) -> ExportProject {
        ExportProject {
            project_id: ProjectId::new(self.id),
            project_name: self.name,
            project_address: self.address,
            client_name: self.client_name,
            client_email: self.client_email,
            client_tel: self.client_tel,
            client_address: self.client_address,
            client_tax_id: self.client_tax_id,
        }
    }
}
