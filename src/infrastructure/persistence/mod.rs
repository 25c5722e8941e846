//! # Persistence Layer
//!
//! Repository ports and their implementations.
//!
//! ## Repository Traits (Ports)
//!
//! - [`BoqRepository`]: Bills of quantities, their jobs and general costs
//! - [`QuotationRepository`]: Quotations and the BOQ rows they are priced from
//!
//! ## Implementations
//!
//! - `in_memory`: In-memory implementations for testing
//! - `postgres`: PostgreSQL implementations

pub mod in_memory;
pub mod postgres;
pub mod traits;

pub use traits::{BoqRepository, QuotationRepository, RepositoryError, RepositoryResult};
