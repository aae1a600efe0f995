//! # Storage
//!
//! Collaborator implementations for the upload pipeline.
//!
//! - `MemoryAssignmentStore` / `JsonFileAssignmentStore` implement
//!   `AssignmentStore`
//! - `StaticWorkerRegistry` / `JsonWorkerRegistry` implement
//!   `WorkerRegistry`
//! - `ConfiguredStore` / `ConfiguredRegistry` pick one from `ServiceConfig`

mod factory;
mod json_file;
mod memory;
mod registry;

pub use contracts::{AssignmentStore, WorkerRegistry};
pub use factory::{ConfiguredRegistry, ConfiguredStore};
pub use json_file::JsonFileAssignmentStore;
pub use memory::MemoryAssignmentStore;
pub use registry::{JsonWorkerRegistry, StaticWorkerRegistry};
