//! Domain layer for Lincd.
//!
//! Holds the models, query shapes and capability traits shared by the
//! infrastructure and application crates. Nothing in here performs I/O.

pub mod community;
pub mod config;
pub mod directory;
pub mod error;
pub mod store;
pub mod thread;
pub mod user;
pub mod view;

// Re-export common error type
pub use error::{LincdError, Result};
