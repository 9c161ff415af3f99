use anyhow::Result;
use lincd_application::LincdServices;

use super::print_json;

pub async fn show(services: &LincdServices, id: &str) -> Result<()> {
    let replies = services.activity.get_activity(id).await?;
    print_json(&replies)
}
