//! Composition of every service over one shared store.

use lincd_core::config::ServiceConfig;
use lincd_core::store::RecordStore;
use lincd_core::view::ViewInvalidator;
use std::sync::Arc;

use crate::{ActivityService, DirectoryService, ProfileService};

/// All use cases wired to a single long-lived `RecordStore`.
pub struct LincdServices {
    pub profiles: ProfileService,
    pub directory: DirectoryService,
    pub activity: ActivityService,
    store: Arc<dyn RecordStore>,
}

impl LincdServices {
    pub fn new(
        store: Arc<dyn RecordStore>,
        invalidator: Arc<dyn ViewInvalidator>,
        config: &ServiceConfig,
    ) -> Self {
        Self {
            profiles: ProfileService::new(store.clone(), invalidator, &config.profile),
            directory: DirectoryService::new(store.clone(), &config.directory),
            activity: ActivityService::new(store.clone()),
            store,
        }
    }

    /// The shared store, for collaborators that write threads or communities.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }
}
