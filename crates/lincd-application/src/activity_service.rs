//! Activity Service
//!
//! Builds a user's activity feed: replies other users left on the user's
//! own threads.

use lincd_core::store::{RecordStore, ThreadFilter};
use lincd_core::thread::Reply;
use lincd_core::{LincdError, Result};
use std::sync::Arc;

const FETCH_ACTIVITY: &str = "fetch activity";

/// Service for aggregating replies to a user's threads
pub struct ActivityService {
    store: Arc<dyn RecordStore>,
}

impl ActivityService {
    /// Create a new ActivityService
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Returns replies to `identity`'s threads authored by anyone else.
    ///
    /// Runs two sequential thread queries: the user's own threads, then the
    /// children of those threads. Self-replies are excluded. Replies are
    /// ordered by creation time, oldest first, ties broken by id.
    pub async fn get_activity(&self, identity: &str) -> Result<Vec<Reply>> {
        self.collect_replies(identity).await.map_err(|e| {
            tracing::error!(identity, error = %e, "activity aggregation failed");
            e.during(FETCH_ACTIVITY)
        })
    }

    async fn collect_replies(&self, identity: &str) -> Result<Vec<Reply>> {
        if identity.trim().is_empty() {
            return Err(LincdError::validation("identity must not be empty"));
        }

        self.store.connect().await?;

        let own_threads = self
            .store
            .find_threads(&ThreadFilter::by_author(identity))
            .await?;

        // Duplicates are kept; the id filter matches each reply once anyway
        let child_ids: Vec<String> = own_threads
            .iter()
            .flat_map(|thread| thread.children.iter().cloned())
            .collect();

        tracing::debug!(
            identity,
            threads = own_threads.len(),
            candidates = child_ids.len(),
            "collected reply candidates"
        );

        if child_ids.is_empty() {
            return Ok(Vec::new());
        }

        let reply_records = self
            .store
            .find_threads(&ThreadFilter::with_ids(child_ids).excluding_author(identity))
            .await?;

        let mut author_ids: Vec<String> = reply_records.iter().map(|r| r.author.clone()).collect();
        author_ids.sort();
        author_ids.dedup();
        let authors = self.store.find_author_summaries(&author_ids).await?;

        let mut replies: Vec<Reply> = reply_records
            .into_iter()
            .filter_map(|record| match authors.get(&record.author) {
                Some(author) => Some(Reply::from_record(record, author.clone())),
                None => {
                    tracing::warn!(
                        reply = %record.id,
                        author = %record.author,
                        "dropping reply whose author has no profile"
                    );
                    None
                }
            })
            .collect();

        replies.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(replies)
    }
}
