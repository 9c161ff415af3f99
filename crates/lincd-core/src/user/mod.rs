//! User domain module.
//!
//! This module contains the user profile read model, the stored record shape,
//! and the write-side inputs used by the profile service.
//!
//! # Module Structure
//!
//! - `model`: `UserProfile`, `UserRecord`, `ProfileFields`, `ProfileUpdate`, `AuthorSummary`
//!
//! # Usage
//!
//! ```ignore
//! use lincd_core::user::{UserProfile, ProfileUpdate};
//! ```

mod model;

// Re-export public API
pub use model::{AuthorSummary, ProfileFields, ProfileUpdate, UserProfile, UserRecord};
