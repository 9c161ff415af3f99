use anyhow::Result;
use lincd_application::LincdServices;
use lincd_core::thread::NewThread;

use super::print_json;

pub async fn post(
    services: &LincdServices,
    author: String,
    body: String,
    parent: Option<String>,
    community: Option<String>,
) -> Result<()> {
    let mut thread = NewThread::new(author, body);
    if let Some(parent) = parent {
        thread = thread.reply_to(parent);
    }
    if let Some(community) = community {
        thread = thread.in_community(community);
    }

    let store = services.store();
    store.connect().await?;
    let record = store.insert_thread(thread).await?;
    tracing::info!(thread = %record.id, reply = record.is_reply(), "thread posted");
    print_json(&record)
}
