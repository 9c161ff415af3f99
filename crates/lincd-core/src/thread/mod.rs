//! Thread domain module.
//!
//! Threads form a parent/child reply graph. Creation belongs to the
//! thread-authoring side; the activity feed only reads them.
//!
//! # Module Structure
//!
//! - `model`: `ThreadRecord`, `NewThread`, and the `Reply` read model

mod model;

pub use model::{NewThread, Reply, ThreadRecord};
