use serde::Deserialize;

use crate::error::AppError;
use crate::search::client::{SearchHit, SearchService};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Core search logic. A blank query returns nothing without hitting the index.
pub async fn process_search(
    search: Option<&dyn SearchService>,
    query: &str,
) -> Result<Vec<SearchHit>, AppError> {
    let search =
        search.ok_or_else(|| AppError::Unavailable("Search not configured".into()))?;

    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    search.search(query).await
}

/// Axum handler for `GET /api/v1/search?q=...`.
#[cfg(feature = "server")]
pub async fn search_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Query(params): axum::extract::Query<SearchQuery>,
) -> Result<axum::Json<Vec<SearchHit>>, AppError> {
    let hits = process_search(state.search_service.as_deref(), &params.q).await?;
    Ok(axum::Json(hits))
}
