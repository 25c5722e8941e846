//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`ProjectId`], [`BoqId`], [`QuotationId`], [`JobId`]: UUID-based identifiers
//!
//! ## Arithmetic
//!
//! - [`CheckedArithmetic`]: Trait for safe arithmetic operations
//! - [`round_money`]: Two-decimal output rounding
//!
//! ## Domain Enums
//!
//! - [`BoqStatus`]: BOQ approval state
//! - [`QuotationStatus`]: Quotation approval state
//!
//! ## Output Contract
//!
//! - [`QuotationResponse`]: Priced quotation with [`QuotationSummary`]

pub mod arithmetic;
pub mod enums;
pub mod ids;
pub mod quotation_response;
pub mod timestamp;

pub use arithmetic::{round_money, ArithmeticError, ArithmeticResult, CheckedArithmetic};
pub use enums::{BoqStatus, ParseEnumError, QuotationStatus};
pub use ids::{BoqId, JobId, ProjectId, QuotationId};
pub use quotation_response::{
    GeneralCostDetail, QuotationJobDetail, QuotationResponse, QuotationSummary,
};
pub use timestamp::Timestamp;
