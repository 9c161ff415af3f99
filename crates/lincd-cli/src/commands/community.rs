use anyhow::Result;
use lincd_application::LincdServices;
use lincd_core::community::NewCommunity;
use serde_json::json;

use super::print_json;

pub async fn create(services: &LincdServices, name: String, slug: String, bio: String) -> Result<()> {
    let mut community = NewCommunity::new(slug, name);
    community.bio = bio;

    let store = services.store();
    store.connect().await?;
    let created = store.insert_community(community).await?;
    print_json(&created)
}

pub async fn join(services: &LincdServices, id: &str, community_id: &str) -> Result<()> {
    let store = services.store();
    store.connect().await?;
    store.add_membership(id, community_id).await?;
    print_json(&json!({ "id": id, "community": community_id, "joined": true }))
}
