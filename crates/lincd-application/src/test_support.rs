//! Test doubles shared by the service tests.

use async_trait::async_trait;
use lincd_core::community::{Community, NewCommunity};
use lincd_core::store::{PageRequest, RecordStore, SortDirection, ThreadFilter, UserFilter};
use lincd_core::thread::{NewThread, ThreadRecord};
use lincd_core::user::{ProfileFields, UserRecord};
use lincd_core::view::ViewInvalidator;
use lincd_core::{LincdError, Result};
use std::sync::Mutex;

/// A store whose every call fails as if the connection were down.
pub struct FailingRecordStore;

fn down<T>() -> Result<T> {
    Err(LincdError::store_unavailable("connection refused"))
}

#[async_trait]
impl RecordStore for FailingRecordStore {
    async fn connect(&self) -> Result<()> {
        down()
    }

    async fn find_user(&self, _identity: &str) -> Result<Option<UserRecord>> {
        down()
    }

    async fn find_users(
        &self,
        _filter: &UserFilter,
        _sort: SortDirection,
        _page: PageRequest,
    ) -> Result<Vec<UserRecord>> {
        down()
    }

    async fn find_users_by_ids(&self, _identities: &[String]) -> Result<Vec<UserRecord>> {
        down()
    }

    async fn count_users(&self, _filter: &UserFilter) -> Result<u64> {
        down()
    }

    async fn upsert_user(&self, _identity: &str, _fields: &ProfileFields) -> Result<()> {
        down()
    }

    async fn find_threads(&self, _filter: &ThreadFilter) -> Result<Vec<ThreadRecord>> {
        down()
    }

    async fn insert_thread(&self, _thread: NewThread) -> Result<ThreadRecord> {
        down()
    }

    async fn find_communities(&self, _ids: &[String]) -> Result<Vec<Community>> {
        down()
    }

    async fn insert_community(&self, _community: NewCommunity) -> Result<Community> {
        down()
    }

    async fn add_membership(&self, _identity: &str, _community_id: &str) -> Result<()> {
        down()
    }
}

/// Remembers every invalidated path.
#[derive(Default)]
pub struct RecordingInvalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingInvalidator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl ViewInvalidator for RecordingInvalidator {
    fn invalidate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}
