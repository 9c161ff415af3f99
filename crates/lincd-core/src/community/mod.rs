//! Community domain module.
//!
//! Communities are owned by a separate subsystem; this service only reads them
//! to populate user memberships.

mod model;

pub use model::{Community, NewCommunity};
