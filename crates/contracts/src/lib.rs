//! # Contracts
//!
//! Shared data model and collaborator interfaces for the contact
//! distribution workspace. Business crates depend on this crate only;
//! reverse dependencies are prohibited.
//!
//! ## Data flow
//! - `ingestion` produces [`RawRow`]s
//! - `distribution` turns them into an [`Assignment`]
//! - an [`AssignmentStore`] persists it, a [`WorkerRegistry`] supplies the
//!   worker snapshot

mod assignment;
mod config;
mod error;
mod format;
mod record;
mod registry;
mod store;
mod worker_id;

pub use assignment::*;
pub use config::*;
pub use error::*;
pub use format::InputFormat;
pub use record::*;
pub use registry::{Worker, WorkerRegistry};
pub use store::AssignmentStore;
pub use worker_id::WorkerId;
