use anyhow::Result;
use lincd_application::LincdServices;
use lincd_core::user::ProfileUpdate;
use serde_json::json;

use super::print_json;

pub async fn update(
    services: &LincdServices,
    id: String,
    username: String,
    name: String,
    bio: String,
    image: String,
    path: String,
) -> Result<()> {
    let update = ProfileUpdate::new(id.clone(), username, name)
        .with_bio(bio)
        .with_image(image)
        .with_path(path);
    services.profiles.update_user(update).await?;

    // Echo what was stored, normalized username included
    match services.profiles.fetch_user(&id).await? {
        Some(profile) => print_json(&profile),
        None => print_json(&json!({ "id": id, "saved": true })),
    }
}

pub async fn show(services: &LincdServices, id: &str) -> Result<()> {
    match services.profiles.fetch_user(id).await? {
        Some(profile) => print_json(&profile),
        None => anyhow::bail!("No profile for identity '{}'", id),
    }
}
