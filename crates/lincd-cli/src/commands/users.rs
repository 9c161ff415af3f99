use anyhow::Result;
use lincd_application::LincdServices;
use lincd_core::directory::DirectoryQuery;
use lincd_core::store::SortDirection;

use super::print_json;

pub async fn list(
    services: &LincdServices,
    id: String,
    search: String,
    page: i64,
    page_size: Option<i64>,
    sort: SortDirection,
) -> Result<()> {
    let mut query = DirectoryQuery::new(id).search(search).page(page).sort(sort);
    if let Some(size) = page_size {
        query = query.page_size(size);
    }

    let page = services.directory.fetch_users(query).await?;
    print_json(&page)
}
