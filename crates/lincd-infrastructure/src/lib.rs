pub mod config_service;
pub mod memory_record_store;
pub mod paths;
pub mod storage;
pub mod toml_record_store;
pub mod view_invalidation;

pub use crate::config_service::ConfigService;
pub use crate::memory_record_store::InMemoryRecordStore;
pub use crate::toml_record_store::TomlRecordStore;
pub use crate::view_invalidation::{
    ChannelViewInvalidator, LoggingViewInvalidator, NoopViewInvalidator,
};

use lincd_core::config::{ServiceConfig, StoreBackend};
use lincd_core::store::RecordStore;
use std::sync::Arc;

/// Builds the `RecordStore` selected by `config.store.backend`.
pub fn open_record_store(
    config: &ServiceConfig,
    config_service: &ConfigService,
) -> lincd_core::Result<Arc<dyn RecordStore>> {
    match config.store.backend {
        StoreBackend::Memory => Ok(Arc::new(InMemoryRecordStore::new())),
        StoreBackend::Toml => {
            let path = config_service.store_path(config)?;
            Ok(Arc::new(TomlRecordStore::new(path)))
        }
    }
}
