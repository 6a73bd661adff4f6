use crate::db::models::ContentSummary;
use crate::db::repository::ContentRepository;
use crate::error::AppError;

/// Core listing logic: every record, in the store's newest-first order.
pub async fn process_list_content(
    content_repo: &dyn ContentRepository,
) -> Result<Vec<ContentSummary>, AppError> {
    let summaries = content_repo.list_content().await?;
    tracing::debug!(count = summaries.len(), "Listed content");
    Ok(summaries)
}

/// Axum handler for `GET /admin/content`.
#[cfg(feature = "server")]
pub async fn content_list_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
) -> Result<axum::Json<Vec<ContentSummary>>, AppError> {
    let result = process_list_content(state.content_repo.as_ref()).await?;
    Ok(axum::Json(result))
}
