//! Store capability module.
//!
//! # Module Structure
//!
//! - `query`: filters, sort direction and paging windows
//! - `record_store`: the `RecordStore` trait implemented by infrastructure

mod query;
mod record_store;

pub use query::{PageRequest, SearchPattern, SortDirection, ThreadFilter, UserFilter};
pub use record_store::RecordStore;
