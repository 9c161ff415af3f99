//! Storage layer for atomic snapshot files.

mod atomic_toml;
mod snapshot;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile, FileStamp};
pub use snapshot::{SNAPSHOT_VERSION, StoreSnapshot, UpsertOutcome};
