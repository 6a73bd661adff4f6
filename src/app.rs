use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db::repository::ContentRepository;
use crate::db::tag_repository::TagRepository;
use crate::search::client::SearchService;

/// Shared handles injected into every request.
#[derive(Clone)]
pub struct AppState {
    pub content_repo: Arc<dyn ContentRepository>,
    pub tag_repo: Arc<dyn TagRepository>,
    /// `None` when search is not configured.
    pub search_service: Option<Arc<dyn SearchService>>,
}

/// Build the Axum router with admin and API routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Admin pages
        .route(
            "/admin/content",
            get(crate::admin::content_list::content_list_handler),
        )
        .route(
            "/admin/content/{id}",
            get(crate::admin::content_edit::content_edit_page_handler)
                .post(crate::admin::content_edit::content_edit_action_handler),
        )
        // API routes
        .route("/api/v1/search", get(crate::api::search::search_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
