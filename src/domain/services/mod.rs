//! # Domain Services
//!
//! Domain services encapsulating business logic that doesn't naturally
//! belong to a single entity or value object.
//!
//! ## Services
//!
//! - [`QuotationAggregator`]: Prices job and general-cost rows into a quotation
//! - [`check_quotation_approval`]: Shared quotation approval preconditions

pub mod approval;
pub mod quotation_aggregator;

pub use approval::{check_quotation_approval, ApprovalSnapshot, ApprovalViolation};
pub use quotation_aggregator::QuotationAggregator;
