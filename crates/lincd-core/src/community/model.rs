use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A community a user can belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub id: String,
    /// URL-safe handle, e.g. "rustaceans"
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub bio: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a community.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCommunity {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub bio: String,
}

impl NewCommunity {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builds the stored community with a fresh id.
    pub fn into_community(self, created_at: DateTime<Utc>) -> Community {
        Community {
            id: uuid::Uuid::new_v4().to_string(),
            slug: self.slug,
            name: self.name,
            image: self.image,
            bio: self.bio,
            created_at,
        }
    }
}
