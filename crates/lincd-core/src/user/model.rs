//! User domain models.
//!
//! A user is keyed by an externally issued identity. The service never
//! authenticates; it trusts whatever identity its caller passes in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::community::Community;

/// A user record as held by the store.
///
/// Community memberships are stored as ids and only resolved into full
/// `Community` records when a `UserProfile` is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// External identity; immutable once set
    pub id: String,
    /// Lowercase, unique across the collection
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    /// Image URI
    #[serde(default)]
    pub image: String,
    /// One-way flag, set by every profile update
    #[serde(default)]
    pub onboarded: bool,
    /// Community ids this user belongs to
    #[serde(default)]
    pub communities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Creates the record inserted by an upsert that matched nothing.
    pub fn from_fields(id: impl Into<String>, fields: &ProfileFields, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            username: fields.username.clone(),
            name: fields.name.clone(),
            bio: fields.bio.clone(),
            image: fields.image.clone(),
            onboarded: fields.onboarded,
            communities: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the settable fields, leaving identity, memberships and
    /// creation time untouched.
    pub fn apply(&mut self, fields: &ProfileFields, now: DateTime<Utc>) {
        self.username = fields.username.clone();
        self.name = fields.name.clone();
        self.bio = fields.bio.clone();
        self.image = fields.image.clone();
        self.onboarded = fields.onboarded;
        self.updated_at = now;
    }

    /// Resolves this record into a profile using already-fetched communities.
    pub fn into_profile(self, communities: Vec<Community>) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username,
            name: self.name,
            bio: self.bio,
            image: self.image,
            onboarded: self.onboarded,
            communities,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// The minimal projection used when a user appears as an author.
    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}

/// User profile as returned to callers, with memberships populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub image: String,
    pub onboarded: bool,
    pub communities: Vec<Community>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The set of fields written by a profile upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub username: String,
    pub name: String,
    pub bio: String,
    pub image: String,
    pub onboarded: bool,
}

/// Input to a profile update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// External identity of the user being updated
    pub identity: String,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: String,
    /// View path the update was submitted from
    #[serde(default)]
    pub path: String,
}

impl ProfileUpdate {
    pub fn new(
        identity: impl Into<String>,
        username: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            username: username.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

/// Minimal author projection attached to replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: String,
    pub name: String,
    pub image: String,
}
