//! # Application Layer
//!
//! Use cases orchestrating the domain over the repository ports, and the
//! errors they report.

pub mod error;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use use_cases::{BoqUseCase, QuotationUseCase};
