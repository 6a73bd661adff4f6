use serde::Serialize;

use crate::admin::PageOutcome;
use crate::db::models::{Content, Metadata, Tag};
use crate::db::repository::ContentRepository;
use crate::db::tag_repository::TagRepository;
use crate::error::AppError;
use crate::forms::content::ContentFormData;
use crate::forms::{FormFields, FormMessage, ValidatedForm};
use crate::search::client::SearchService;
use crate::search::sync::{sync_search_index, IndexSync};

pub const INVALID_FORM_MESSAGE: &str = "Invalid form data. Please check the form and try again.";
pub const UPDATED_MESSAGE: &str = "Content updated successfully.";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update content. Please try again.";

/// View model of the content edit page.
#[derive(Debug, Clone, Serialize)]
pub struct EditPageData {
    pub form: ValidatedForm<ContentFormData>,
    /// Full tag catalog for the tag selector.
    pub tags: Vec<Tag>,
    pub content_id: String,
    /// The stored record, for the read-only details next to the form.
    pub content: Content,
}

/// Result of submitting the edit form.
#[derive(Debug, Clone, Serialize)]
pub struct EditActionData {
    pub form: ValidatedForm<ContentFormData>,
}

/// Load a record into the edit form.
///
/// Redirects to the listing when the record does not exist, without reading
/// anything else.
pub async fn load_content_edit(
    content_repo: &dyn ContentRepository,
    tag_repo: &dyn TagRepository,
    id: &str,
) -> Result<PageOutcome<EditPageData>, AppError> {
    let Some(content) = content_repo.get_content_by_id(id).await? else {
        tracing::debug!(content_id = id, "Content not found, redirecting to listing");
        return Ok(PageOutcome::redirect_to_listing());
    };

    let form = ValidatedForm::from_data(ContentFormData::from_content(&content));
    let tags = tag_repo.get_all_tags().await?;

    Ok(PageOutcome::Render(EditPageData {
        form,
        tags,
        content_id: id.to_string(),
        content,
    }))
}

/// Validate and apply a submitted edit, then sync the search index.
///
/// Failures after validation are logged and reported on the form; storage
/// changes that already happened are not rolled back.
pub async fn process_content_update(
    content_repo: &dyn ContentRepository,
    search: Option<&dyn SearchService>,
    id: &str,
    fields: &FormFields,
) -> EditActionData {
    let form: ValidatedForm<ContentFormData> = ValidatedForm::from_submission(fields);

    if !form.valid {
        tracing::debug!(content_id = id, errors = ?form.errors, "Rejected invalid content form");
        return EditActionData {
            form: form.with_message(FormMessage::failure(INVALID_FORM_MESSAGE)),
        };
    }

    match apply_update(content_repo, search, id, form.data.clone()).await {
        Ok(sync) => {
            tracing::info!(content_id = id, index = ?sync, "Content updated");
            EditActionData {
                form: form.with_message(FormMessage::success(UPDATED_MESSAGE)),
            }
        }
        Err(e) => {
            tracing::error!(content_id = id, error = %e, "Error updating content");
            EditActionData {
                form: form.with_message(FormMessage::failure(UPDATE_FAILED_MESSAGE)),
            }
        }
    }
}

async fn apply_update(
    content_repo: &dyn ContentRepository,
    search: Option<&dyn SearchService>,
    id: &str,
    mut data: ContentFormData,
) -> Result<Option<IndexSync>, AppError> {
    // A missing record only loses the merge; the update below reports it.
    let existing = content_repo.get_content_by_id(id).await?;

    let submitted = std::mem::take(&mut data.metadata);
    let metadata = Metadata::merge_preserving_source(
        existing.as_ref().map(|c| &c.metadata),
        submitted,
    );

    content_repo
        .update_content(id, data.into_update(metadata))
        .await?;

    let content = content_repo
        .get_content_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content '{}' vanished after update", id)))?;

    match search {
        Some(search) => Ok(Some(sync_search_index(search, &content).await?)),
        None => {
            tracing::debug!(content_id = id, "Search not configured, skipping index sync");
            Ok(None)
        }
    }
}

/// Axum handler for `GET /admin/content/{id}`.
#[cfg(feature = "server")]
pub async fn content_edit_page_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path(id): axum::extract::Path<String>,
) -> Result<axum::response::Response, AppError> {
    let outcome = load_content_edit(
        state.content_repo.as_ref(),
        state.tag_repo.as_ref(),
        &id,
    )
    .await?;

    Ok(outcome.into_response_with_status(axum::http::StatusCode::OK))
}

/// Axum handler for `POST /admin/content/{id}`.
///
/// Invalid submissions answer 400; everything else that renders answers 200
/// with the outcome in the form message.
#[cfg(feature = "server")]
pub async fn content_edit_action_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path(id): axum::extract::Path<String>,
    axum::extract::RawForm(body): axum::extract::RawForm,
) -> axum::response::Response {
    use axum::http::StatusCode;

    let fields = FormFields::parse(&body);
    let outcome = process_content_update(
        state.content_repo.as_ref(),
        state.search_service.as_deref(),
        &id,
        &fields,
    )
    .await;

    let status = if outcome.form.valid {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    PageOutcome::Render(outcome).into_response_with_status(status)
}
