//! Repository implementations.
//!
//! - `inmemory`: session hub and snapshot store held in process memory
//! - `file`: snapshot store persisted as one JSON file per session

pub mod file;
pub mod inmemory;

pub use file::FileSnapshotRepository;
pub use inmemory::{InMemorySessionRepository, InMemorySnapshotRepository};
