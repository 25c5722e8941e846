//! # PostgreSQL Repositories
//!
//! sqlx-backed implementations of the repository traits, plus pool and
//! migration bootstrapping.

pub mod boq_repository;
pub mod pool;
pub mod quotation_repository;

pub use boq_repository::PostgresBoqRepository;
pub use pool::{create_pool, run_migrations};
pub use quotation_repository::PostgresQuotationRepository;
