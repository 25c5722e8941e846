//! quotation - operate BOQs and quotations against PostgreSQL
//!
//! Usage: quotation <command> [args]
//!
//! Connection and logging settings come from `config/`, `.env` and
//! `BOQ_*` environment variables.

use anyhow::{Context, Result};
use boq_quotation::application::{BoqUseCase, QuotationUseCase};
use boq_quotation::domain::value_objects::timestamp::Timestamp;
use boq_quotation::domain::value_objects::ProjectId;
use boq_quotation::infrastructure::config::AppConfig;
use boq_quotation::infrastructure::persistence::postgres::{
    create_pool, run_migrations, PostgresBoqRepository, PostgresQuotationRepository,
};
use boq_quotation::infrastructure::telemetry;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "quotation")]
#[command(about = "BOQ and quotation operations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply database migrations
    Migrate,

    /// Print the priced quotation of a project, creating it if needed
    Show {
        /// Project ID
        project_id: ProjectId,
    },

    /// Approve the quotation of a project
    Approve {
        /// Project ID
        project_id: ProjectId,
    },

    /// Print the export bundle of an approved quotation
    Export {
        /// Project ID
        project_id: ProjectId,
    },

    /// Approve the BOQ of a project
    ApproveBoq {
        /// Project ID
        project_id: ProjectId,
    },

    /// Set validity and tax of a draft quotation
    Terms {
        /// Project ID
        project_id: ProjectId,
        /// Tax percentage (0-100)
        #[arg(long)]
        tax: Option<Decimal>,
        /// Days the quotation stays valid; defaults to the configured period
        #[arg(long)]
        valid_days: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;
    telemetry::init(&config.logging)?;

    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to database")?;

    match cli.command {
        Command::Migrate => {
            run_migrations(&pool).await?;
            println!("migrations applied");
        }
        Command::Show { project_id } => {
            let uc = QuotationUseCase::new(Arc::new(PostgresQuotationRepository::new(pool)));
            let response = uc.create_or_get_quotation(project_id).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Approve { project_id } => {
            let uc = QuotationUseCase::new(Arc::new(PostgresQuotationRepository::new(pool)));
            uc.approve_quotation(project_id).await?;
            println!("quotation approved for project {project_id}");
        }
        Command::Export { project_id } => {
            let uc = QuotationUseCase::new(Arc::new(PostgresQuotationRepository::new(pool)));
            let data = uc.export_quotation(project_id).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Command::ApproveBoq { project_id } => {
            let uc = BoqUseCase::new(Arc::new(PostgresBoqRepository::new(pool)));
            let boq = uc.get_by_project(project_id).await?;
            uc.approve(boq.id()).await?;
            println!("BOQ {} approved", boq.id());
        }
        Command::Terms {
            project_id,
            tax,
            valid_days,
        } => {
            let days = valid_days.unwrap_or(config.quotation.default_validity_days);
            let valid_until = Timestamp::now()
                .checked_add_days(days)
                .with_context(|| format!("validity of {days} days is out of range"))?;
            let uc = QuotationUseCase::new(Arc::new(PostgresQuotationRepository::new(pool)));
            let quotation = uc
                .update_quotation_terms(project_id, Some(valid_until), tax)
                .await?;
            println!("{}", serde_json::to_string_pretty(&quotation)?);
        }
    }

    Ok(())
}
