pub mod content_edit;
pub mod content_list;

/// Where the admin UI is sent when a requested record does not exist.
pub const CONTENT_LISTING_PATH: &str = "/admin/content";

/// Result of an admin page handler: data to render, or a redirect.
///
/// A redirect is a routing signal, not an error, and handlers pass it
/// through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome<T> {
    Render(T),
    Redirect(String),
}

impl<T> PageOutcome<T> {
    pub fn redirect_to_listing() -> Self {
        PageOutcome::Redirect(CONTENT_LISTING_PATH.to_string())
    }
}

#[cfg(feature = "server")]
impl<T: serde::Serialize> PageOutcome<T> {
    /// Render as JSON with the given status, or as `303 See Other`.
    pub fn into_response_with_status(
        self,
        status: axum::http::StatusCode,
    ) -> axum::response::Response {
        use axum::response::IntoResponse;

        match self {
            PageOutcome::Render(data) => (status, axum::Json(data)).into_response(),
            PageOutcome::Redirect(location) => {
                axum::response::Redirect::to(&location).into_response()
            }
        }
    }
}
