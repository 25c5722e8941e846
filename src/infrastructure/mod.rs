//! # Infrastructure Layer
//!
//! Persistence adapters, configuration loading and log setup.

pub mod config;
pub mod persistence;
pub mod telemetry;
