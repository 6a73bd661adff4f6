use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::models::{Content, ContentStatus, ContentType, ContentUpdate, Metadata};
use crate::forms::{FieldErrors, FormFields, FormSchema};

const TITLE_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 500;
const SLUG_MAX: usize = 200;

/// Editable fields of a content record, as shown in the edit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentFormData {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub body: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub status: ContentStatus,
    pub metadata: Metadata,
    /// Tag ids.
    pub tags: Vec<String>,
}

impl Default for ContentFormData {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            slug: String::new(),
            body: String::new(),
            content_type: ContentType::Article,
            status: ContentStatus::Draft,
            metadata: Metadata::new(),
            tags: Vec::new(),
        }
    }
}

impl ContentFormData {
    /// Pre-populate the form from a stored record.
    pub fn from_content(content: &Content) -> Self {
        Self {
            title: content.title.clone(),
            description: content.description.clone().unwrap_or_default(),
            slug: content.slug.clone(),
            body: content.body.clone().unwrap_or_default(),
            content_type: content.content_type,
            status: content.status,
            metadata: content.metadata.clone(),
            tags: content.tag_ids(),
        }
    }

    /// Turn validated form data into a store update with the given metadata.
    pub fn into_update(self, metadata: Metadata) -> ContentUpdate {
        ContentUpdate {
            title: self.title,
            description: self.description,
            slug: self.slug,
            body: self.body,
            content_type: self.content_type,
            status: self.status,
            metadata,
            tags: self.tags,
        }
    }
}

impl FormSchema for ContentFormData {
    fn parse(fields: &FormFields) -> (Self, FieldErrors) {
        let mut errors = FieldErrors::default();
        let text = |name: &str| fields.get(name).unwrap_or_default().to_string();

        let content_type = match fields.get("type").map(str::trim) {
            None | Some("") => {
                errors.add("type", "Content type is required");
                ContentType::Article
            }
            Some(raw) => ContentType::from_str_ci(raw).unwrap_or_else(|| {
                errors.add(
                    "type",
                    format!(
                        "Invalid content type '{}'. Expected: {}",
                        raw,
                        ContentType::ALL.map(|t| t.as_str()).join(", ")
                    ),
                );
                ContentType::Article
            }),
        };

        let status = match fields.get("status").map(str::trim) {
            None | Some("") => {
                errors.add("status", "Status is required");
                ContentStatus::Draft
            }
            Some(raw) => ContentStatus::from_str_ci(raw).unwrap_or_else(|| {
                errors.add(
                    "status",
                    format!(
                        "Invalid status '{}'. Expected: {}",
                        raw,
                        ContentStatus::ALL.map(|s| s.as_str()).join(", ")
                    ),
                );
                ContentStatus::Draft
            }),
        };

        let metadata = match fields.get("metadata").map(str::trim) {
            None | Some("") => Metadata::new(),
            Some(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => Metadata::from(map),
                Ok(_) => {
                    errors.add("metadata", "Metadata must be a JSON object");
                    Metadata::new()
                }
                Err(e) => {
                    errors.add("metadata", format!("Metadata is not valid JSON: {e}"));
                    Metadata::new()
                }
            },
        };

        let mut tags: Vec<String> = Vec::new();
        for tag in fields.get_all("tags").map(str::trim).filter(|t| !t.is_empty()) {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        let data = Self {
            title: text("title").trim().to_string(),
            description: text("description").trim().to_string(),
            slug: text("slug").trim().to_string(),
            body: text("body"),
            content_type,
            status,
            metadata,
            tags,
        };

        errors.extend(data.validate());
        (data, errors)
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        if self.title.trim().is_empty() {
            errors.add("title", "Title is required");
        } else if self.title.chars().count() > TITLE_MAX {
            errors.add("title", format!("Title must be at most {TITLE_MAX} characters"));
        }

        if self.description.chars().count() > DESCRIPTION_MAX {
            errors.add(
                "description",
                format!("Description must be at most {DESCRIPTION_MAX} characters"),
            );
        }

        if self.slug.is_empty() {
            errors.add("slug", "Slug is required");
        } else if self.slug.len() > SLUG_MAX {
            errors.add("slug", format!("Slug must be at most {SLUG_MAX} characters"));
        } else if !is_valid_slug(&self.slug) {
            errors.add(
                "slug",
                "Slug may only contain lowercase letters, numbers and single hyphens",
            );
        }

        errors
    }
}

/// Lowercase ASCII alphanumeric groups joined by single hyphens.
fn is_valid_slug(slug: &str) -> bool {
    slug.split('-').all(|part| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    })
}
