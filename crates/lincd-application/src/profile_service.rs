//! Profile Service
//!
//! Create-or-update and lookup of user profiles keyed by external identity.

use lincd_core::config::ProfileConfig;
use lincd_core::store::RecordStore;
use lincd_core::user::{ProfileFields, ProfileUpdate, UserProfile};
use lincd_core::view::ViewInvalidator;
use lincd_core::{LincdError, Result};
use std::sync::Arc;

const UPDATE_USER: &str = "create/update user";
const FETCH_USER: &str = "fetch user";

/// Service for onboarding and updating user profiles
pub struct ProfileService {
    store: Arc<dyn RecordStore>,
    invalidator: Arc<dyn ViewInvalidator>,
    edit_path: String,
}

impl ProfileService {
    /// Create a new ProfileService
    pub fn new(
        store: Arc<dyn RecordStore>,
        invalidator: Arc<dyn ViewInvalidator>,
        config: &ProfileConfig,
    ) -> Self {
        Self {
            store,
            invalidator,
            edit_path: config.edit_path.clone(),
        }
    }

    /// Creates or overwrites the profile for `update.identity`.
    ///
    /// The username is trimmed and lowercased, and `onboarded` is set on every
    /// call. When `update.path` is the profile edit path, its cached view is
    /// invalidated after the write succeeds.
    ///
    /// # Errors
    ///
    /// Every failure, including validation and username conflicts, comes
    /// back wrapped as "Failed to create/update user".
    pub async fn update_user(&self, update: ProfileUpdate) -> Result<()> {
        self.upsert_profile(&update).await.map_err(|e| {
            tracing::error!(identity = %update.identity, error = %e, "profile update failed");
            e.during(UPDATE_USER)
        })?;

        if update.path == self.edit_path {
            self.invalidator.invalidate(&update.path);
        }
        Ok(())
    }

    /// Looks up a profile by identity with its communities resolved.
    pub async fn fetch_user(&self, identity: &str) -> Result<Option<UserProfile>> {
        self.load_profile(identity).await.map_err(|e| {
            tracing::error!(identity, error = %e, "profile fetch failed");
            e.during(FETCH_USER)
        })
    }

    async fn upsert_profile(&self, update: &ProfileUpdate) -> Result<()> {
        if update.identity.trim().is_empty() {
            return Err(LincdError::validation("identity must not be empty"));
        }
        let username = update.username.trim().to_lowercase();
        if username.is_empty() {
            return Err(LincdError::validation("username must not be empty"));
        }

        let fields = ProfileFields {
            username,
            name: update.name.clone(),
            bio: update.bio.clone(),
            image: update.image.clone(),
            onboarded: true,
        };

        self.store.connect().await?;
        self.store.upsert_user(&update.identity, &fields).await?;

        tracing::info!(
            identity = %update.identity,
            username = %fields.username,
            "profile saved"
        );
        Ok(())
    }

    async fn load_profile(&self, identity: &str) -> Result<Option<UserProfile>> {
        self.store.connect().await?;
        let profile = self.store.find_user_populated(identity).await?;
        tracing::debug!(identity, found = profile.is_some(), "profile lookup");
        Ok(profile)
    }
}
