//! # Domain Entities
//!
//! Aggregate roots and entities representing core business concepts.
//!
//! ## Aggregates
//!
//! - [`Boq`]: Bill of quantities with its job lines and approval gate
//! - [`Quotation`]: Priced proposal derived from an approved BOQ
//!
//! ## Read Rows
//!
//! - [`QuotationJob`], [`GeneralCost`]: Rows the pricing pipeline consumes
//! - [`QuotationExportData`]: Denormalized export bundle

pub mod boq;
pub mod export;
pub mod quotation;

pub use boq::{Boq, BoqJob};
pub use export::{ExportProject, QuotationExportData};
pub use quotation::{validate_tax_percentage, GeneralCost, Quotation, QuotationJob};
