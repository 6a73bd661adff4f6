use crate::db::models::{Content, ContentStatus};
use crate::error::AppError;
use crate::search::client::{build_search_document, SearchService};

/// What happened to a record's search entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSync {
    Removed,
    Upserted,
    /// Status has no index rule; the entry was left as it is.
    Unchanged,
}

/// Bring the search index in line with the record's current status.
///
/// Drafts are removed and published records are upserted. Other statuses
/// leave the index alone.
pub async fn sync_search_index(
    search: &dyn SearchService,
    content: &Content,
) -> Result<IndexSync, AppError> {
    match content.status {
        ContentStatus::Draft => {
            search.remove_document(&content.id).await?;
            Ok(IndexSync::Removed)
        }
        ContentStatus::Published => {
            search
                .upsert_document(&build_search_document(content))
                .await?;
            Ok(IndexSync::Upserted)
        }
        ContentStatus::Archived => Ok(IndexSync::Unchanged),
    }
}
