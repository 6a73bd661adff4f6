pub mod backends;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::{TimeZone, Utc};

use folio::app::{build_router, AppState};
use folio::db::models::{
    Content, ContentStatus, ContentSummary, ContentType, ContentUpdate, Metadata, Tag,
};
use folio::db::repository::ContentRepository;
use folio::db::tag_repository::TagRepository;
use folio::error::AppError;
use folio::search::client::{SearchDocument, SearchHit, SearchService};

/// In-memory content store that resolves tag ids against a fixed catalog.
pub struct InMemoryContentStore {
    contents: Mutex<HashMap<String, Content>>,
    catalog: Vec<Tag>,
    pub update_calls: Mutex<Vec<(String, ContentUpdate)>>,
}

impl InMemoryContentStore {
    pub fn new(catalog: Vec<Tag>) -> Self {
        Self {
            contents: Mutex::new(HashMap::new()),
            catalog,
            update_calls: Mutex::new(vec![]),
        }
    }

    pub fn get(&self, id: &str) -> Option<Content> {
        self.contents.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentStore {
    async fn get_content_by_id(&self, id: &str) -> Result<Option<Content>, AppError> {
        Ok(self.get(id))
    }

    async fn update_content(&self, id: &str, update: ContentUpdate) -> Result<(), AppError> {
        self.update_calls
            .lock()
            .unwrap()
            .push((id.to_string(), update.clone()));

        let mut contents = self.contents.lock().unwrap();
        let content = contents
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Content '{}' not found", id)))?;

        content.title = update.title;
        content.description = Some(update.description);
        content.slug = update.slug;
        content.body = Some(update.body);
        content.content_type = update.content_type;
        content.status = update.status;
        content.metadata = update.metadata;
        content.tags = update
            .tags
            .iter()
            .filter_map(|id| self.catalog.iter().find(|t| &t.id == id).cloned())
            .collect();
        content.updated_at = Utc::now();
        Ok(())
    }

    async fn create_content(&self, content: Content) -> Result<(), AppError> {
        self.contents
            .lock()
            .unwrap()
            .insert(content.id.clone(), content);
        Ok(())
    }

    async fn list_content(&self) -> Result<Vec<ContentSummary>, AppError> {
        let mut summaries: Vec<ContentSummary> = self
            .contents
            .lock()
            .unwrap()
            .values()
            .map(ContentSummary::from)
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }
}

pub struct InMemoryTagCatalog {
    tags: Mutex<Vec<Tag>>,
    pub reads: Mutex<usize>,
}

#[async_trait]
impl TagRepository for InMemoryTagCatalog {
    async fn get_all_tags(&self) -> Result<Vec<Tag>, AppError> {
        *self.reads.lock().unwrap() += 1;
        let mut tags = self.tags.lock().unwrap().clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn create_tag(&self, tag: Tag) -> Result<(), AppError> {
        let mut tags = self.tags.lock().unwrap();
        tags.retain(|t| t.id != tag.id);
        tags.push(tag);
        Ok(())
    }
}

/// Search index kept in a map, recording every call.
#[derive(Default)]
pub struct InMemorySearch {
    pub documents: Mutex<HashMap<String, SearchDocument>>,
    pub upsert_calls: Mutex<Vec<SearchDocument>>,
    pub remove_calls: Mutex<Vec<String>>,
    pub fail: Mutex<bool>,
}

#[async_trait]
impl SearchService for InMemorySearch {
    async fn upsert_document(&self, doc: &SearchDocument) -> Result<(), AppError> {
        if *self.fail.lock().unwrap() {
            return Err(AppError::Search("index unavailable".into()));
        }
        self.upsert_calls.lock().unwrap().push(doc.clone());
        self.documents
            .lock()
            .unwrap()
            .insert(doc.id.clone(), doc.clone());
        Ok(())
    }

    async fn remove_document(&self, id: &str) -> Result<(), AppError> {
        if *self.fail.lock().unwrap() {
            return Err(AppError::Search("index unavailable".into()));
        }
        self.remove_calls.lock().unwrap().push(id.to_string());
        self.documents.lock().unwrap().remove(id);
        Ok(())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, AppError> {
        let query = query.to_lowercase();
        Ok(self
            .documents
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.title.to_lowercase().contains(&query))
            .cloned()
            .map(SearchHit::from)
            .collect())
    }

    async fn configure_index(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// In-memory collaborators wired into the real router.
pub struct TestEnv {
    pub router: Router,
    pub contents: Arc<InMemoryContentStore>,
    pub tags: Arc<InMemoryTagCatalog>,
    pub search: Arc<InMemorySearch>,
}

impl TestEnv {
    pub fn start() -> Self {
        let catalog = catalog();
        let contents = Arc::new(InMemoryContentStore::new(catalog.clone()));
        let tags = Arc::new(InMemoryTagCatalog {
            tags: Mutex::new(catalog),
            reads: Mutex::new(0),
        });
        let search = Arc::new(InMemorySearch::default());
        let search_service: Arc<dyn SearchService> = search.clone();

        let router = build_router(AppState {
            content_repo: contents.clone(),
            tag_repo: tags.clone(),
            search_service: Some(search_service),
        });

        Self {
            router,
            contents,
            tags,
            search,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    /// Helper: store a record directly, bypassing the HTTP layer.
    pub async fn seed(&self, content: Content) {
        self.contents.create_content(content).await.unwrap();
    }
}

/// Build a `TestServer` with search disabled.
pub fn server_without_search(env: &TestEnv) -> axum_test::TestServer {
    let router = build_router(AppState {
        content_repo: env.contents.clone(),
        tag_repo: env.tags.clone(),
        search_service: None,
    });

    axum_test::TestServer::builder()
        .build(router)
}

pub fn catalog() -> Vec<Tag> {
    vec![
        Tag { id: "t1".into(), slug: "svelte".into(), name: "Svelte".into() },
        Tag { id: "t2".into(), slug: "runes".into(), name: "Runes".into() },
        Tag { id: "t3".into(), slug: "tooling".into(), name: "Tooling".into() },
    ]
}

pub fn make_content(id: &str, status: ContentStatus, metadata: Metadata) -> Content {
    Content {
        id: id.to_string(),
        title: "Original title".to_string(),
        description: None,
        slug: "original-title".to_string(),
        body: None,
        content_type: ContentType::Article,
        status,
        metadata,
        tags: vec![],
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap(),
        likes: 5,
        saves: 2,
    }
}

/// A valid edit-form submission with the given status and tags.
pub fn edit_form<'a>(status: &'a str, tags: &[&'a str], metadata: &'a str) -> Vec<(&'a str, &'a str)> {
    let mut pairs = vec![
        ("title", "Edited title"),
        ("description", "Edited description"),
        ("slug", "edited-title"),
        ("body", "Edited body"),
        ("type", "article"),
        ("status", status),
        ("metadata", metadata),
    ];
    pairs.extend(tags.iter().map(|t| ("tags", *t)));
    pairs
}
