use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::db::models::Tag;
use crate::error::AppError;

/// Tag as stored in the `tags` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TagRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub slug: String,
    pub name: String,
}

impl From<TagRecord> for Tag {
    fn from(record: TagRecord) -> Self {
        Tag {
            id: record.id,
            slug: record.slug,
            name: record.name,
        }
    }
}

impl From<Tag> for TagRecord {
    fn from(tag: Tag) -> Self {
        TagRecord {
            id: tag.id,
            slug: tag.slug,
            name: tag.name,
        }
    }
}

/// Repository trait for the tag catalog.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// All tags, ordered by display name.
    async fn get_all_tags(&self) -> Result<Vec<Tag>, AppError>;

    /// Create a tag or replace the one with the same id.
    async fn create_tag(&self, tag: Tag) -> Result<(), AppError>;
}

/// MongoDB implementation of the TagRepository.
#[cfg(feature = "server")]
pub struct MongoTagRepository {
    collection: mongodb::Collection<TagRecord>,
}

#[cfg(feature = "server")]
impl MongoTagRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("tags"),
        }
    }
}

#[cfg(feature = "server")]
#[async_trait]
impl TagRepository for MongoTagRepository {
    async fn get_all_tags(&self) -> Result<Vec<Tag>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();

        let records: Vec<TagRecord> = self
            .collection
            .find(doc! {})
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(records.into_iter().map(Tag::from).collect())
    }

    async fn create_tag(&self, tag: Tag) -> Result<(), AppError> {
        use mongodb::bson::doc;
        use mongodb::options::ReplaceOptions;

        let record = TagRecord::from(tag);
        let filter = doc! { "_id": &record.id };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection
            .replace_one(filter, &record)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
