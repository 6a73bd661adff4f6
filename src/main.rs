use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use folio::app::{build_router, AppState};
use folio::config::AppConfig;
use folio::db::repository::{ContentRepository, MongoContentRepository};
use folio::db::tag_repository::{MongoTagRepository, TagRepository};
use folio::search::client::{MeilisearchService, SearchService};

#[derive(Debug, Parser)]
#[command(name = "folio", about = "Admin backend for the content catalog")]
struct Cli {
    /// Configuration file (defaults to ./folio.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed demo tags and content before serving.
    #[arg(long)]
    seed_demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    tracing::info!("Starting Folio server...");

    // Connect to MongoDB
    let mongo_client = mongodb::Client::with_uri_str(&config.mongodb_uri)
        .await
        .context("Failed to connect to MongoDB")?;
    let mongo_db = mongo_client.database(&config.mongodb_database);
    let content_repo: Arc<dyn ContentRepository> =
        Arc::new(MongoContentRepository::new(&mongo_db));
    let tag_repo: Arc<dyn TagRepository> = Arc::new(MongoTagRepository::new(&mongo_db));

    tracing::info!("Connected to MongoDB at {}", config.mongodb_uri);

    // Connect to Meilisearch (optional)
    let search_service: Option<Arc<dyn SearchService>> = match config.search_url() {
        Some(url) => {
            let service = MeilisearchService::new(url, config.meili_api_key.clone())?;
            if let Err(e) = service.configure_index().await {
                tracing::warn!("Failed to configure search index: {e}");
            }
            tracing::info!("Search enabled at {}", url);
            let service: Arc<dyn SearchService> = Arc::new(service);
            Some(service)
        }
        None => {
            tracing::warn!("FOLIO_MEILI_URL not set, search index sync disabled");
            None
        }
    };

    if config.demo_mode || cli.seed_demo {
        folio::demo_seeder::seed_demo_data(
            content_repo.as_ref(),
            tag_repo.as_ref(),
            search_service.as_deref(),
        )
        .await;
    }

    let app = build_router(AppState {
        content_repo,
        tag_repo,
        search_service,
    });

    // Start the server
    tracing::info!("Listening on http://{}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
