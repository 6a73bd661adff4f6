use async_trait::async_trait;

use crate::db::models::{Content, ContentSummary, ContentUpdate};
use crate::error::AppError;

/// Repository trait for content records.
///
/// This trait allows mocking the database layer in tests.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Find a content record by id, with its tags resolved.
    async fn get_content_by_id(&self, id: &str) -> Result<Option<Content>, AppError>;

    /// Overwrite the editable fields of an existing record.
    ///
    /// Last write wins. Fails with `NotFound` when no record has this id.
    async fn update_content(&self, id: &str, update: ContentUpdate) -> Result<(), AppError>;

    /// Insert a new record.
    async fn create_content(&self, content: Content) -> Result<(), AppError>;

    /// List all records, most recently updated first.
    async fn list_content(&self) -> Result<Vec<ContentSummary>, AppError>;
}

#[cfg(feature = "server")]
mod mongo {
    use chrono::{DateTime, Utc};
    use futures::TryStreamExt;
    use mongodb::bson::{self, doc};
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::db::models::{ContentStatus, ContentType, Metadata, Tag};
    use crate::db::tag_repository::TagRecord;

    /// Content as stored in the `contents` collection: tags are kept as ids.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct ContentRecord {
        #[serde(rename = "_id")]
        id: String,
        title: String,
        #[serde(default)]
        description: Option<String>,
        slug: String,
        #[serde(default)]
        body: Option<String>,
        #[serde(rename = "type")]
        content_type: ContentType,
        status: ContentStatus,
        #[serde(default)]
        metadata: Metadata,
        #[serde(default)]
        tag_ids: Vec<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        #[serde(default)]
        likes: u64,
        #[serde(default)]
        saves: u64,
    }

    impl From<Content> for ContentRecord {
        fn from(content: Content) -> Self {
            let tag_ids = content.tag_ids();
            Self {
                id: content.id,
                title: content.title,
                description: content.description,
                slug: content.slug,
                body: content.body,
                content_type: content.content_type,
                status: content.status,
                metadata: content.metadata,
                tag_ids,
                created_at: content.created_at,
                updated_at: content.updated_at,
                likes: content.likes,
                saves: content.saves,
            }
        }
    }

    impl ContentRecord {
        fn into_content(self, tags: Vec<Tag>) -> Content {
            Content {
                id: self.id,
                title: self.title,
                description: self.description,
                slug: self.slug,
                body: self.body,
                content_type: self.content_type,
                status: self.status,
                metadata: self.metadata,
                tags,
                created_at: self.created_at,
                updated_at: self.updated_at,
                likes: self.likes,
                saves: self.saves,
            }
        }
    }

    /// MongoDB implementation of the ContentRepository.
    pub struct MongoContentRepository {
        contents: mongodb::Collection<ContentRecord>,
        tags: mongodb::Collection<TagRecord>,
    }

    impl MongoContentRepository {
        pub fn new(db: &mongodb::Database) -> Self {
            Self {
                contents: db.collection("contents"),
                tags: db.collection("tags"),
            }
        }

        /// Look up tags by id, keeping the order of `ids` and skipping ids
        /// that no longer exist in the catalog.
        async fn resolve_tags(&self, ids: &[String]) -> Result<Vec<Tag>, AppError> {
            if ids.is_empty() {
                return Ok(Vec::new());
            }

            let records: Vec<TagRecord> = self
                .tags
                .find(doc! { "_id": { "$in": ids.to_vec() } })
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .try_collect()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            Ok(ids
                .iter()
                .filter_map(|id| records.iter().find(|t| &t.id == id))
                .cloned()
                .map(Tag::from)
                .collect())
        }
    }

    #[async_trait]
    impl ContentRepository for MongoContentRepository {
        async fn get_content_by_id(&self, id: &str) -> Result<Option<Content>, AppError> {
            let record = self
                .contents
                .find_one(doc! { "_id": id })
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            match record {
                Some(record) => {
                    let tags = self.resolve_tags(&record.tag_ids).await?;
                    Ok(Some(record.into_content(tags)))
                }
                None => Ok(None),
            }
        }

        async fn update_content(&self, id: &str, update: ContentUpdate) -> Result<(), AppError> {
            let metadata = bson::to_bson(&update.metadata)
                .map_err(|e| AppError::Internal(format!("Failed to encode metadata: {e}")))?;
            let updated_at = bson::to_bson(&Utc::now())
                .map_err(|e| AppError::Internal(format!("Failed to encode timestamp: {e}")))?;

            let changes = doc! {
                "$set": {
                    "title": &update.title,
                    "description": &update.description,
                    "slug": &update.slug,
                    "body": &update.body,
                    "type": update.content_type.as_str(),
                    "status": update.status.as_str(),
                    "metadata": metadata,
                    "tag_ids": update.tags.clone(),
                    "updated_at": updated_at,
                }
            };

            let result = self
                .contents
                .update_one(doc! { "_id": id }, changes)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            if result.matched_count == 0 {
                return Err(AppError::NotFound(format!("Content '{}' not found", id)));
            }

            Ok(())
        }

        async fn create_content(&self, content: Content) -> Result<(), AppError> {
            self.contents
                .insert_one(ContentRecord::from(content))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            Ok(())
        }

        async fn list_content(&self) -> Result<Vec<ContentSummary>, AppError> {
            use mongodb::options::FindOptions;

            let options = FindOptions::builder()
                .sort(doc! { "updated_at": -1 })
                .build();

            let mut cursor = self
                .contents
                .find(doc! {})
                .with_options(options)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            let mut summaries = Vec::new();
            while let Some(record) = cursor
                .try_next()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
            {
                summaries.push(ContentSummary::from(&record.into_content(Vec::new())));
            }

            Ok(summaries)
        }
    }
}

#[cfg(feature = "server")]
pub use mongo::MongoContentRepository;
