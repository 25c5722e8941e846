//! # PostgreSQL BOQ Repository
//!
//! PostgreSQL implementation of [`BoqRepository`] using sqlx.
//!
//! Mutations lock the BOQ row (`SELECT ... FOR UPDATE`), apply the change to
//! the loaded [`Boq`] so the entity's rules decide, then write only the
//! affected rows inside the same transaction.

use crate::domain::entities::{Boq, BoqJob, GeneralCost};
use crate::domain::value_objects::{BoqId, BoqStatus, JobId, ParseEnumError, ProjectId};
use crate::infrastructure::persistence::traits::{
    BoqRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

const SELECT_BY_ID: &str = r#"
    SELECT id, project_id, status, created_at, updated_at
    FROM boq
    WHERE id = $1
"#;

const SELECT_BY_ID_FOR_UPDATE: &str = r#"
    SELECT id, project_id, status, created_at, updated_at
    FROM boq
    WHERE id = $1
    FOR UPDATE
"#;

const SELECT_BY_PROJECT: &str = r#"
    SELECT id, project_id, status, created_at, updated_at
    FROM boq
    WHERE project_id = $1
"#;

/// PostgreSQL implementation of [`BoqRepository`].
///
/// # Examples
///
/// ```ignore
/// use boq_quotation::infrastructure::persistence::postgres::PostgresBoqRepository;
///
/// let pool = create_pool(&config.database).await?;
/// let repo = PostgresBoqRepository::new(pool);
/// ```
#[derive(Debug, Clone)]
pub struct PostgresBoqRepository {
    pool: PgPool,
}

impl PostgresBoqRepository {
    /// Creates a new PostgreSQL BOQ repository.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn find(&self, sql: &str, key: Uuid) -> RepositoryResult<Option<Boq>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))?;
        match fetch_header(&mut conn, sql, key).await? {
            Some(row) => Ok(Some(hydrate(&mut conn, row).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl BoqRepository for PostgresBoqRepository {
    async fn create_for_project(&self, project_id: ProjectId) -> RepositoryResult<Boq> {
        let boq = Boq::new(project_id);

        let result = sqlx::query(
            r#"
            INSERT INTO boq (id, project_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (project_id) DO NOTHING
            "#,
        )
        .bind(boq.id().get())
        .bind(project_id.get())
        .bind(boq.status().as_str())
        .bind(boq.created_at().as_datetime())
        .bind(boq.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        if result.rows_affected() > 0 {
            info!(%project_id, boq_id = %boq.id(), "BOQ created");
        }

        self.find(SELECT_BY_PROJECT, project_id.get())
            .await?
            .ok_or_else(|| RepositoryError::internal("BOQ vanished after upsert"))
    }

    async fn get(&self, id: BoqId) -> RepositoryResult<Option<Boq>> {
        self.find(SELECT_BY_ID, id.get()).await
    }

    async fn get_by_project(&self, project_id: ProjectId) -> RepositoryResult<Option<Boq>> {
        self.find(SELECT_BY_PROJECT, project_id.get()).await
    }

    async fn approve(&self, id: BoqId) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))?;
        let mut boq = lock(&mut tx, id).await?;
        boq.approve()?;

        sqlx::query("UPDATE boq SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id.get())
            .bind(boq.status().as_str())
            .bind(boq.updated_at().as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
        info!(boq_id = %id, "BOQ approved");
        Ok(())
    }

    async fn add_job(&self, id: BoqId, job: &BoqJob) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))?;
        let mut boq = lock(&mut tx, id).await?;
        boq.add_job(job.clone())?;

        sqlx::query(
            r#"
            INSERT INTO boq_job (
                id, boq_id, name, unit, quantity,
                labor_cost, estimated_price, selling_price
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(job.id.get())
        .bind(id.get())
        .bind(&job.name)
        .bind(&job.unit)
        .bind(job.quantity)
        .bind(job.labor_cost)
        .bind(job.estimated_price)
        .bind(job.selling_price)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        touch(&mut tx, &boq).await?;
        tx.commit()
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
        debug!(boq_id = %id, job_id = %job.id, "job added");
        Ok(())
    }

    async fn update_job(&self, id: BoqId, job: &BoqJob) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))?;
        let mut boq = lock(&mut tx, id).await?;
        boq.update_job(job.clone())?;

        sqlx::query(
            r#"
            UPDATE boq_job
            SET name = $3, unit = $4, quantity = $5,
                labor_cost = $6, estimated_price = $7, selling_price = $8
            WHERE id = $1 AND boq_id = $2
            "#,
        )
        .bind(job.id.get())
        .bind(id.get())
        .bind(&job.name)
        .bind(&job.unit)
        .bind(job.quantity)
        .bind(job.labor_cost)
        .bind(job.estimated_price)
        .bind(job.selling_price)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        touch(&mut tx, &boq).await?;
        tx.commit()
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
        debug!(boq_id = %id, job_id = %job.id, "job updated");
        Ok(())
    }

    async fn delete_job(&self, id: BoqId, job_id: JobId) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))?;
        let mut boq = lock(&mut tx, id).await?;
        boq.remove_job(job_id)?;

        sqlx::query("DELETE FROM boq_job WHERE id = $1 AND boq_id = $2")
            .bind(job_id.get())
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;

        touch(&mut tx, &boq).await?;
        tx.commit()
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
        debug!(boq_id = %id, %job_id, "job deleted");
        Ok(())
    }

    async fn set_general_cost(
        &self,
        id: BoqId,
        type_name: &str,
        estimated_cost: Option<Decimal>,
    ) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::connection(e.to_string()))?;
        let mut boq = lock(&mut tx, id).await?;
        boq.set_general_cost(type_name, estimated_cost)?;

        sqlx::query(
            r#"
            INSERT INTO boq_general_cost (boq_id, type_name, estimated_cost)
            VALUES ($1, $2, $3)
            ON CONFLICT (boq_id, type_name)
            DO UPDATE SET estimated_cost = EXCLUDED.estimated_cost
            "#,
        )
        .bind(id.get())
        .bind(type_name)
        .bind(estimated_cost)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;

        touch(&mut tx, &boq).await?;
        tx.commit()
            .await
            .map_err(|e| RepositoryError::query(e.to_string()))?;
        debug!(boq_id = %id, type_name, "general cost set");
        Ok(())
    }
}

async fn fetch_header(
    conn: &mut PgConnection,
    sql: &str,
    key: Uuid,
) -> RepositoryResult<Option<BoqRow>> {
    sqlx::query_as::<_, BoqRow>(sql)
        .bind(key)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))
}

/// Loads a BOQ and holds its row lock until the transaction ends.
async fn lock(conn: &mut PgConnection, id: BoqId) -> RepositoryResult<Boq> {
    let row = fetch_header(conn, SELECT_BY_ID_FOR_UPDATE, id.get())
        .await?
        .ok_or_else(|| RepositoryError::not_found("Boq", id.to_string()))?;
    hydrate(conn, row).await
}

async fn touch(conn: &mut PgConnection, boq: &Boq) -> RepositoryResult<()> {
    sqlx::query("UPDATE boq SET updated_at = $2 WHERE id = $1")
        .bind(boq.id().get())
        .bind(boq.updated_at().as_datetime())
        .execute(&mut *conn)
        .await
        .map_err(|e| RepositoryError::query(e.to_string()))?;
    Ok(())
}

/// Loads the BOQ of a project with its jobs and general costs.
pub(super) async fn load_by_project(
    conn: &mut PgConnection,
    project_id: ProjectId,
) -> RepositoryResult<Option<Boq>> {
    match fetch_header(conn, SELECT_BY_PROJECT, project_id.get()).await? {
        Some(row) => Ok(Some(hydrate(conn, row).await?)),
        None => Ok(None),
    }
}

async fn hydrate(conn: &mut PgConnection, row: BoqRow) -> RepositoryResult<Boq> {
    let jobs: Vec<JobRow> = sqlx::query_as(
        r#"
        SELECT id, name, unit, quantity, labor_cost, estimated_price, selling_price
        FROM boq_job
        WHERE boq_id = $1
        ORDER BY position ASC
        "#,
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| RepositoryError::query(e.to_string()))?;

    let costs: Vec<CostRow> = sqlx::query_as(
        r#"
        SELECT type_name, estimated_cost
        FROM boq_general_cost
        WHERE boq_id = $1
        ORDER BY position ASC
        "#,
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| RepositoryError::query(e.to_string()))?;

    row.try_into_boq(jobs, costs)
}

/// Row type for BOQ header queries.
#[derive(Debug, sqlx::FromRow)]
struct BoqRow {
    id: Uuid,
    project_id: Uuid,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BoqRow {
    fn try_into_boq(self, jobs: Vec<JobRow>, costs: Vec<CostRow>) -> RepositoryResult<Boq> {
        let status: BoqStatus = self
            .status
            .parse()
            .map_err(|e: ParseEnumError| RepositoryError::serialization(e.to_string()))?;

        Ok(Boq::from_parts(
            BoqId::new(self.id),
            ProjectId::new(self.project_id),
            status,
            jobs.into_iter().map(JobRow::into_job).collect(),
            costs.into_iter().map(CostRow::into_cost).collect(),
            self.created_at.into(),
            self.updated_at.into(),
        ))
    }
}

/// Row type for job queries.
#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    name: String,
    unit: String,
    quantity: Decimal,
    labor_cost: Decimal,
    estimated_price: Option<Decimal>,
    selling_price: Option<Decimal>,
}

impl JobRow {
    fn into_job(self) -> BoqJob {
        BoqJob {
            id: JobId::new(self.id),
            name: self.name,
            unit: self.unit,
            quantity: self.quantity,
            labor_cost: self.labor_cost,
            estimated_price: self.estimated_price,
            selling_price: self.selling_price,
        }
    }
}

/// Row type for general cost queries.
#[derive(Debug, sqlx::FromRow)]
struct CostRow {
    type_name: String,
    estimated_cost: Option<Decimal>,
}

impl CostRow {
    fn into_cost(self) -> GeneralCost {
        GeneralCost::new(self.type_name, self.estimated_cost)
    }
}
