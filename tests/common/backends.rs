use std::sync::Arc;

use axum::Router;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::meilisearch::Meilisearch;
use testcontainers_modules::mongo::Mongo;

use folio::app::{build_router, AppState};
use folio::db::repository::{ContentRepository, MongoContentRepository};
use folio::db::tag_repository::{MongoTagRepository, TagRepository};
use folio::search::client::{MeilisearchService, SearchService};

/// MongoDB and Meilisearch containers wired into the real router.
///
/// Containers are stopped when this struct is dropped.
pub struct BackendEnv {
    _mongo: ContainerAsync<Mongo>,
    _meili: ContainerAsync<Meilisearch>,
    pub router: Router,
    pub contents: Arc<dyn ContentRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub search: Arc<dyn SearchService>,
}

impl BackendEnv {
    pub async fn start() -> Self {
        let (mongo_container, meili_container) =
            tokio::join!(Mongo::default().start(), Meilisearch::default().start());
        let mongo_container = mongo_container.expect("Failed to start MongoDB container");
        let meili_container = meili_container.expect("Failed to start Meilisearch container");

        // --- MongoDB ---
        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);
        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let mongo_db = mongo_client.database("folio_test");
        let contents: Arc<dyn ContentRepository> =
            Arc::new(MongoContentRepository::new(&mongo_db));
        let tags: Arc<dyn TagRepository> = Arc::new(MongoTagRepository::new(&mongo_db));

        // --- Meilisearch ---
        let meili_port = meili_container
            .get_host_port_ipv4(7700)
            .await
            .expect("Failed to get Meilisearch port");
        let meili_service =
            MeilisearchService::new(&format!("http://127.0.0.1:{}", meili_port), None)
                .expect("Failed to create MeilisearchService");
        meili_service
            .configure_index()
            .await
            .expect("Failed to configure Meilisearch index");
        let search: Arc<dyn SearchService> = Arc::new(meili_service);

        let router = build_router(AppState {
            content_repo: contents.clone(),
            tag_repo: tags.clone(),
            search_service: Some(search.clone()),
        });

        Self {
            _mongo: mongo_container,
            _meili: meili_container,
            router,
            contents,
            tags,
            search,
        }
    }

    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    /// Store the shared tag catalog.
    pub async fn seed_tags(&self) {
        for tag in super::catalog() {
            self.tags.create_tag(tag).await.unwrap();
        }
    }

    /// Meilisearch applies writes asynchronously.
    pub async fn wait_for_search_indexing(&self) {
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    }
}
