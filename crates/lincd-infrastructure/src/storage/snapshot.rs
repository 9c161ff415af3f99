//! The full contents of a record store.
//!
//! Both the in-memory and the TOML-backed store keep one `StoreSnapshot` and
//! run every query against it, so their semantics cannot drift apart.

use chrono::{DateTime, Utc};
use lincd_core::community::{Community, NewCommunity};
use lincd_core::store::{PageRequest, SortDirection, ThreadFilter, UserFilter};
use lincd_core::thread::{NewThread, ThreadRecord};
use lincd_core::user::{ProfileFields, UserRecord};
use lincd_core::{LincdError, Result};
use serde::{Deserialize, Serialize};

/// Current on-disk layout version.
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Whether an upsert created or modified a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default = "current_version")]
    pub version: String,
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub threads: Vec<ThreadRecord>,
    #[serde(default)]
    pub communities: Vec<Community>,
}

fn current_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            version: current_version(),
            users: Vec::new(),
            threads: Vec::new(),
            communities: Vec::new(),
        }
    }
}

impl StoreSnapshot {
    // ============================================================================
    // Users
    // ============================================================================

    pub fn find_user(&self, identity: &str) -> Option<UserRecord> {
        self.users.iter().find(|u| u.id == identity).cloned()
    }

    pub fn find_users(
        &self,
        filter: &UserFilter,
        sort: SortDirection,
        page: PageRequest,
    ) -> Vec<UserRecord> {
        let mut matching: Vec<&UserRecord> =
            self.users.iter().filter(|u| filter.matches(u)).collect();
        matching.sort_by(|a, b| sort.compare_users(a, b));
        page.apply(matching.into_iter().cloned())
    }

    pub fn find_users_by_ids(&self, identities: &[String]) -> Vec<UserRecord> {
        self.users
            .iter()
            .filter(|u| identities.contains(&u.id))
            .cloned()
            .collect()
    }

    pub fn count_users(&self, filter: &UserFilter) -> u64 {
        self.users.iter().filter(|u| filter.matches(u)).count() as u64
    }

    pub fn upsert_user(
        &mut self,
        identity: &str,
        fields: &ProfileFields,
        now: DateTime<Utc>,
    ) -> Result<UpsertOutcome> {
        if self
            .users
            .iter()
            .any(|u| u.username == fields.username && u.id != identity)
        {
            return Err(LincdError::conflict(format!(
                "username '{}' is already taken",
                fields.username
            )));
        }

        match self.users.iter_mut().find(|u| u.id == identity) {
            Some(existing) => {
                existing.apply(fields, now);
                Ok(UpsertOutcome::Updated)
            }
            None => {
                self.users
                    .push(UserRecord::from_fields(identity, fields, now));
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    // ============================================================================
    // Threads
    // ============================================================================

    pub fn find_threads(&self, filter: &ThreadFilter) -> Vec<ThreadRecord> {
        self.threads
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    pub fn insert_thread(&mut self, thread: NewThread, now: DateTime<Utc>) -> Result<ThreadRecord> {
        let record = thread.into_record(now);

        if let Some(parent_id) = &record.parent_id {
            let parent = self
                .threads
                .iter_mut()
                .find(|t| &t.id == parent_id)
                .ok_or_else(|| LincdError::not_found("thread", parent_id.clone()))?;
            parent.children.push(record.id.clone());
        }

        self.threads.push(record.clone());
        Ok(record)
    }

    // ============================================================================
    // Communities
    // ============================================================================

    pub fn find_communities(&self, ids: &[String]) -> Vec<Community> {
        self.communities
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect()
    }

    pub fn insert_community(
        &mut self,
        community: NewCommunity,
        now: DateTime<Utc>,
    ) -> Result<Community> {
        if self.communities.iter().any(|c| c.slug == community.slug) {
            return Err(LincdError::conflict(format!(
                "community slug '{}' is already taken",
                community.slug
            )));
        }
        let community = community.into_community(now);
        self.communities.push(community.clone());
        Ok(community)
    }

    pub fn add_membership(&mut self, identity: &str, community_id: &str) -> Result<()> {
        if !self.communities.iter().any(|c| c.id == community_id) {
            return Err(LincdError::not_found("community", community_id));
        }
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == identity)
            .ok_or_else(|| LincdError::not_found("user", identity))?;
        if !user.communities.iter().any(|id| id == community_id) {
            user.communities.push(community_id.to_string());
        }
        Ok(())
    }
}
