use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::db::models::{Content, ContentType};
use crate::error::AppError;

/// A content record projected for the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    /// Primary key: the content id.
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Tag slugs, in the record's tag order.
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Creation time as Unix timestamp (seconds).
    pub created_at: i64,
    pub likes: u64,
    pub saves: u64,
}

/// A search result returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    #[serde(rename = "type")]
    pub content_type: ContentType,
}

impl From<SearchDocument> for SearchHit {
    fn from(doc: SearchDocument) -> Self {
        SearchHit {
            id: doc.id,
            title: doc.title,
            description: doc.description,
            tags: doc.tags,
            content_type: doc.content_type,
        }
    }
}

/// Trait for search operations, enabling mock testing.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Add or replace a document in the search index.
    async fn upsert_document(&self, doc: &SearchDocument) -> Result<(), AppError>;

    /// Remove a document from the search index. Succeeds if it is not there.
    async fn remove_document(&self, id: &str) -> Result<(), AppError>;

    /// Full-text search over indexed content.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, AppError>;

    /// Configure the search index (filterable/searchable attributes).
    /// Should be called once on startup.
    async fn configure_index(&self) -> Result<(), AppError>;
}

/// Meilisearch implementation of the SearchService.
#[cfg(feature = "server")]
pub struct MeilisearchService {
    client: meilisearch_sdk::client::Client,
    index_name: String,
}

#[cfg(feature = "server")]
impl MeilisearchService {
    pub fn new(url: &str, api_key: Option<String>) -> Result<Self, AppError> {
        let client = meilisearch_sdk::client::Client::new(url, api_key).map_err(|e| {
            AppError::Config(format!("Failed to create Meilisearch client: {e}"))
        })?;

        Ok(Self {
            client,
            index_name: "content".to_string(),
        })
    }

    fn index(&self) -> meilisearch_sdk::indexes::Index {
        self.client.index(&self.index_name)
    }
}

#[cfg(feature = "server")]
#[async_trait]
impl SearchService for MeilisearchService {
    async fn upsert_document(&self, doc: &SearchDocument) -> Result<(), AppError> {
        let _task: meilisearch_sdk::task_info::TaskInfo = self
            .index()
            .add_or_replace(&[doc], Some("id"))
            .await
            .map_err(|e| AppError::Search(format!("Meilisearch index error: {e}")))?;

        Ok(())
    }

    async fn remove_document(&self, id: &str) -> Result<(), AppError> {
        let _task: meilisearch_sdk::task_info::TaskInfo = self
            .index()
            .delete_document(id)
            .await
            .map_err(|e| AppError::Search(format!("Meilisearch delete error: {e}")))?;

        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, AppError> {
        let results: meilisearch_sdk::search::SearchResults<SearchDocument> = self
            .index()
            .search()
            .with_query(query)
            .with_limit(20)
            .execute()
            .await
            .map_err(|e| AppError::Search(format!("Meilisearch search error: {e}")))?;

        Ok(results
            .hits
            .into_iter()
            .map(|hit| SearchHit::from(hit.result))
            .collect())
    }

    async fn configure_index(&self) -> Result<(), AppError> {
        let index = self.index();

        let _: meilisearch_sdk::task_info::TaskInfo = index
            .set_filterable_attributes(["type", "tags"])
            .await
            .map_err(|e| AppError::Search(format!("Meilisearch config error: {e}")))?;

        let _: meilisearch_sdk::task_info::TaskInfo = index
            .set_searchable_attributes(["title", "description", "tags"])
            .await
            .map_err(|e| AppError::Search(format!("Meilisearch config error: {e}")))?;

        let _: meilisearch_sdk::task_info::TaskInfo = index
            .set_sortable_attributes(["created_at", "likes", "saves"])
            .await
            .map_err(|e| AppError::Search(format!("Meilisearch config error: {e}")))?;

        Ok(())
    }
}

/// Build a SearchDocument from a content record.
pub fn build_search_document(content: &Content) -> SearchDocument {
    SearchDocument {
        id: content.id.clone(),
        title: content.title.clone(),
        description: content.description.clone(),
        tags: content.tag_slugs(),
        content_type: content.content_type,
        created_at: content.created_at.timestamp(),
        likes: content.likes,
        saves: content.saves,
    }
}
