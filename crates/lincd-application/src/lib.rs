//! Application layer for Lincd.
//!
//! This crate provides use case implementations that coordinate between
//! the domain layer and whichever `RecordStore` the caller supplies.

pub mod activity_service;
pub mod directory_service;
pub mod profile_service;
pub mod services;

#[cfg(test)]
mod test_support;

pub use activity_service::ActivityService;
pub use directory_service::DirectoryService;
pub use profile_service::ProfileService;
pub use services::LincdServices;
