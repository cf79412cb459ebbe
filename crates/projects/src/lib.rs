//! Project domain module.
//!
//! This crate contains business rules for projects and their work items,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage).

pub mod project;
pub mod work_item;

pub use project::Project;
pub use work_item::{WorkItem, WorkItemStatus};
