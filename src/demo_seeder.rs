use chrono::{Duration, Utc};
use serde_json::json;

use crate::db::models::{Content, ContentStatus, ContentType, Metadata, Tag};
use crate::db::repository::ContentRepository;
use crate::db::tag_repository::TagRepository;
use crate::search::client::SearchService;
use crate::search::sync::sync_search_index;

fn demo_tags() -> Vec<Tag> {
    [
        ("tag-svelte", "svelte", "Svelte"),
        ("tag-runes", "runes", "Runes"),
        ("tag-tooling", "tooling", "Tooling"),
    ]
    .into_iter()
    .map(|(id, slug, name)| Tag {
        id: id.to_string(),
        slug: slug.to_string(),
        name: name.to_string(),
    })
    .collect()
}

fn demo_contents(tags: &[Tag]) -> Vec<Content> {
    let now = Utc::now();
    let mut imported = Metadata::new();
    imported.insert(
        "externalSource",
        json!({ "type": "github", "url": "https://github.com/sveltejs/kit" }),
    );
    imported.insert("stars", json!(18000));

    vec![
        Content {
            id: "demo-getting-started".to_string(),
            title: "Getting Started with Runes".to_string(),
            description: Some("A short tour of the new reactivity model.".to_string()),
            slug: "getting-started-with-runes".to_string(),
            body: Some("# Runes\n\n`$state` and `$derived` replace stores.".to_string()),
            content_type: ContentType::Article,
            status: ContentStatus::Published,
            metadata: Metadata::new(),
            tags: tags[..2].to_vec(),
            created_at: now - Duration::days(7),
            updated_at: now - Duration::days(7),
            likes: 3,
            saves: 1,
        },
        Content {
            id: "demo-sveltekit".to_string(),
            title: "SvelteKit".to_string(),
            description: Some("The application framework.".to_string()),
            slug: "sveltekit".to_string(),
            body: None,
            content_type: ContentType::Library,
            status: ContentStatus::Draft,
            metadata: imported,
            tags: tags[2..].to_vec(),
            created_at: now - Duration::days(1),
            updated_at: now - Duration::days(1),
            likes: 0,
            saves: 0,
        },
    ]
}

/// Insert demo tags and content that are not there yet.
///
/// Failures are logged and skipped so a partially seeded store still boots.
pub async fn seed_demo_data(
    content_repo: &dyn ContentRepository,
    tag_repo: &dyn TagRepository,
    search: Option<&dyn SearchService>,
) {
    tracing::info!("Starting demo data seeding...");

    let tags = demo_tags();
    for tag in &tags {
        if let Err(e) = tag_repo.create_tag(tag.clone()).await {
            tracing::error!("Failed to seed tag '{}': {}", tag.slug, e);
        }
    }

    for content in demo_contents(&tags) {
        match content_repo.get_content_by_id(&content.id).await {
            Ok(Some(_)) => {
                tracing::info!("Content '{}' already exists, skipping.", content.id);
                continue;
            }
            Err(e) => {
                tracing::error!("Failed to check for existing content '{}': {}", content.id, e);
                continue;
            }
            Ok(None) => {}
        }

        if let Err(e) = content_repo.create_content(content.clone()).await {
            tracing::error!("Failed to insert content '{}': {}", content.id, e);
            continue;
        }
        tracing::info!("Inserted content '{}'.", content.id);

        if let Some(search) = search {
            match sync_search_index(search, &content).await {
                Ok(sync) => tracing::info!("Synced '{}' with search index: {:?}", content.id, sync),
                Err(e) => tracing::error!("Failed to index '{}': {}", content.id, e),
            }
        }
    }

    tracing::info!("Demo data seeding completed.");
}
