//! # Domain Layer
//!
//! Entities, value objects and pure services of the BOQ and quotation
//! workflow. Nothing in this layer performs I/O.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
