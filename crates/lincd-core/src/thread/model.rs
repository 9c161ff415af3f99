use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::AuthorSummary;

/// A thread as held by the store.
///
/// `children` lists reply thread ids in insertion order. The graph is
/// tree-shaped in practice but nothing prevents a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadRecord {
    pub id: String,
    /// Identity of the authoring user
    pub author: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ThreadRecord {
    /// Whether this thread is a reply to another thread.
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Input for posting a thread or a reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewThread {
    pub author: String,
    pub body: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub community: Option<String>,
}

impl NewThread {
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn reply_to(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn in_community(mut self, community: impl Into<String>) -> Self {
        self.community = Some(community.into());
        self
    }

    /// Builds the stored record with a fresh id and no children.
    pub fn into_record(self, created_at: DateTime<Utc>) -> ThreadRecord {
        ThreadRecord {
            id: uuid::Uuid::new_v4().to_string(),
            author: self.author,
            body: self.body,
            parent_id: self.parent_id,
            community: self.community,
            children: Vec::new(),
            created_at,
        }
    }
}

/// A reply to one of the requesting user's threads, with its author resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub author: AuthorSummary,
    pub created_at: DateTime<Utc>,
}

impl Reply {
    pub fn from_record(record: ThreadRecord, author: AuthorSummary) -> Self {
        Self {
            id: record.id,
            body: record.body,
            parent_id: record.parent_id,
            author,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_thread_into_record() {
        let now = Utc::now();
        let record = NewThread::new("user_a", "hello")
            .reply_to("t1")
            .into_record(now);

        assert!(!record.id.is_empty());
        assert_eq!(record.author, "user_a");
        assert_eq!(record.parent_id.as_deref(), Some("t1"));
        assert!(record.children.is_empty());
        assert!(record.is_reply());
        assert_eq!(record.created_at, now);
    }

    #[test]
    fn test_each_record_gets_unique_id() {
        let now = Utc::now();
        let a = NewThread::new("u", "x").into_record(now);
        let b = NewThread::new("u", "x").into_record(now);
        assert_ne!(a.id, b.id);
    }
}
