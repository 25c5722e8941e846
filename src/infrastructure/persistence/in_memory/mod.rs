//! # In-Memory Repositories
//!
//! In-memory implementations for testing without database dependencies.
//!
//! ## Available Repositories
//!
//! - [`InMemoryBoqRepository`]: BOQ persistence
//! - [`InMemoryQuotationRepository`]: Quotation persistence, reading BOQs
//!   from a shared [`InMemoryBoqRepository`]
//!
//! ## Thread Safety
//!
//! All implementations use `Arc<RwLock<HashMap>>` for thread-safe access.

pub mod boq_repository;
pub mod quotation_repository;

pub use boq_repository::InMemoryBoqRepository;
pub use quotation_repository::InMemoryQuotationRepository;
