//! Estimate Store - persistence seam and estimation rounds
//!
//! - [`RecordStore`]: what the estimator needs from a hosted backend
//! - [`MemoryStore`]: in-process backend for demo mode and tests
//! - [`EstimationService`]: session, voting and finalization workflow
//!
//! # Example
//!
//! ```rust,ignore
//! use estimate_store::{EstimationService, MemoryStore, ServiceConfig};
//! use std::sync::Arc;
//!
//! let service = EstimationService::new(Arc::new(MemoryStore::new()), ServiceConfig::new());
//! let session = service.create_session("Sprint 12").await?;
//! let moderator = service.join(&session.code, "Ana", true).await?;
//! let task = service.add_task(session.id, "Checkout redesign").await?;
//! service.start_voting(task.id).await?;
//! service.submit_vote(task.id, moderator.id, &factors).await?;
//! let summary = service.reveal(task.id).await?;
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod lifecycle;
pub mod memory;
pub mod service;
pub mod store;

pub use error::{ServiceError, StoreError};
pub use lifecycle::{allowed_transitions, validate_transition};
pub use memory::MemoryStore;
pub use service::{EstimationService, ServiceConfig};
pub use store::{ChangeEvent, ChangeKind, RecordStore, Table};
