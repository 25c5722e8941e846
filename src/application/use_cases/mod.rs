//! # Use Cases
//!
//! Application workflows sequencing repository calls and domain services.
//!
//! - [`QuotationUseCase`]: Create, price, approve and export quotations
//! - [`BoqUseCase`]: Edit and approve bills of quantities

pub mod boq;
pub mod quotation;

pub use boq::BoqUseCase;
pub use quotation::QuotationUseCase;
