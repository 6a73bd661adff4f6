use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Metadata key marking a record imported from an outside system.
pub const EXTERNAL_SOURCE_KEY: &str = "externalSource";

/// Publication status of a content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Published,
    Archived,
}

impl ContentStatus {
    pub const ALL: [ContentStatus; 3] = [
        ContentStatus::Draft,
        ContentStatus::Published,
        ContentStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
            ContentStatus::Archived => "archived",
        }
    }

    /// Parse a status from a string (case-insensitive).
    pub fn from_str_ci(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of content a record holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Article,
    Recipe,
    Video,
    Library,
    Announcement,
    Collection,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::Article,
        ContentType::Recipe,
        ContentType::Video,
        ContentType::Library,
        ContentType::Announcement,
        ContentType::Collection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Recipe => "recipe",
            ContentType::Video => "video",
            ContentType::Library => "library",
            ContentType::Announcement => "announcement",
            ContentType::Collection => "collection",
        }
    }

    /// Parse a content type from a string (case-insensitive).
    pub fn from_str_ci(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Open key-value annotations attached to a content record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the record was imported from an outside system.
    ///
    /// The marker only counts when its value is truthy: `null`, `false`, `0`
    /// and `""` are treated as absent.
    pub fn has_external_source(&self) -> bool {
        self.0.get(EXTERNAL_SOURCE_KEY).is_some_and(is_truthy)
    }

    /// Merge submitted metadata with the metadata already stored.
    ///
    /// For imported records the stored map is the base and every submitted key
    /// overrides it, so provenance keys the form never sent survive the edit.
    /// For everything else the submitted map replaces the stored one.
    pub fn merge_preserving_source(existing: Option<&Metadata>, submitted: Metadata) -> Metadata {
        match existing {
            Some(existing) if existing.has_external_source() => {
                let mut merged = existing.0.clone();
                merged.extend(submitted.0);
                Metadata(merged)
            }
            _ => submitted,
        }
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Metadata(map)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A tag from the tag catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub slug: String,
    /// Display label.
    pub name: String,
}

/// A content record as returned by the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub status: ContentStatus,
    #[serde(default)]
    pub metadata: Metadata,
    /// Associated tags, in the order they were assigned.
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub saves: u64,
}

impl Content {
    pub fn tag_ids(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.id.clone()).collect()
    }

    pub fn tag_slugs(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.slug.clone()).collect()
    }
}

/// Fields written by an edit. Tags are referenced by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentUpdate {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub body: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub status: ContentStatus,
    pub metadata: Metadata,
    pub tags: Vec<String>,
}

/// A row of the admin content listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub status: ContentStatus,
    pub updated_at: DateTime<Utc>,
}

impl From<&Content> for ContentSummary {
    fn from(content: &Content) -> Self {
        Self {
            id: content.id.clone(),
            title: content.title.clone(),
            slug: content.slug.clone(),
            content_type: content.content_type,
            status: content.status,
            updated_at: content.updated_at,
        }
    }
}
