//! # boq-quotation
//!
//! Bill-of-quantities and quotation backend for project procurement.
//!
//! A project's BOQ lists its jobs and general costs. Once the BOQ is
//! approved, a single quotation is derived from it, priced, approved and
//! finally exported to the client.
//!
//! ## Layers
//!
//! - [`domain`]: Entities, value objects and the pricing aggregator
//! - [`application`]: Use cases and application errors
//! - [`infrastructure`]: Repositories, configuration and logging
//!
//! ## Quick start
//!
//! ```
//! use boq_quotation::application::{BoqUseCase, QuotationUseCase};
//! use boq_quotation::domain::entities::BoqJob;
//! use boq_quotation::domain::value_objects::ProjectId;
//! use boq_quotation::infrastructure::persistence::in_memory::{
//!     InMemoryBoqRepository, InMemoryQuotationRepository,
//! };
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let boqs = InMemoryBoqRepository::new();
//! let quotations = InMemoryQuotationRepository::new(&boqs);
//! let boq_uc = BoqUseCase::new(Arc::new(boqs));
//! let quotation_uc = QuotationUseCase::new(Arc::new(quotations));
//!
//! let project = ProjectId::new_v4();
//! let boq = boq_uc.open_for_project(project).await.unwrap();
//! boq_uc
//!     .add_job(boq.id(), BoqJob::new("Painting", "m2", Decimal::from(10), Decimal::from(12)))
//!     .await
//!     .unwrap();
//! boq_uc.approve(boq.id()).await.unwrap();
//!
//! let response = quotation_uc.create_or_get_quotation(project).await.unwrap();
//! assert_eq!(response.summary.total, Decimal::from(120));
//! # });
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
