//! Page handlers, the load-more API and the health check

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ServerError};
use super::preview::PreviewSession;
use super::AppState;
use crate::cms::{Cursor, PreviewRef};
use crate::content::{ListingPage, PostPage};
use crate::helpers::encode_query;
use crate::templates::{PostCard, PostPagination, PostView};

/// Href the load-more script fetches for `cursor`
pub fn load_more_href(cursor: &Cursor) -> String {
    format!("/api/posts?cursor={}", encode_query(cursor.as_str()))
}

/// `GET /`
pub async fn home(
    State(state): State<AppState>,
    PreviewSession(preview): PreviewSession,
    uri: Uri,
) -> Response {
    let page = render_home(&state, preview.as_ref()).await;
    respond(&state, page, preview.is_some(), &uri)
}

/// `GET /post/:slug`
pub async fn post(
    State(state): State<AppState>,
    PreviewSession(preview): PreviewSession,
    Path(slug): Path<String>,
    uri: Uri,
) -> Response {
    let page = render_post(&state, preview.as_ref(), &slug).await;
    respond(&state, page, preview.is_some(), &uri)
}

async fn render_home(
    state: &AppState,
    preview: Option<&PreviewRef>,
) -> Result<String, ServerError> {
    let handle = state.cms.handle(preview).await?;
    let page = ListingPage::first(
        &handle,
        &state.config.cms.document_type,
        state.config.per_page,
    )
    .await?;

    let posts = PostCard::from_summaries(&page.results, &state.formatter);
    let next_page = page.next_page.as_ref().map(load_more_href);
    Ok(state
        .renderer
        .render_home(&posts, next_page.as_deref(), handle.is_preview())?)
}

async fn render_post(
    state: &AppState,
    preview: Option<&PreviewRef>,
    slug: &str,
) -> Result<String, ServerError> {
    let handle = state.cms.handle(preview).await?;
    let page = PostPage::load(&handle, &state.config.cms.document_type, slug).await?;

    let view = PostView::new(&page, &state.formatter, &state.resolver);
    Ok(state.renderer.render_post(&view, handle.is_preview())?)
}

/// Page response for a render result.
///
/// A preview ref the CMS refuses (expired or deleted release) ends the
/// session and reloads the same page with published content.
fn respond(
    state: &AppState,
    page: Result<String, ServerError>,
    preview: bool,
    uri: &Uri,
) -> Response {
    match page {
        Ok(html) => Html(html).into_response(),
        Err(ServerError::Upstream(err)) if preview && err.is_rejection() => {
            tracing::warn!(error = %err, "CMS refused the preview ref, ending preview");
            let location = uri
                .path_and_query()
                .map(|p| p.as_str().to_string())
                .unwrap_or_else(|| "/".to_string());
            (
                StatusCode::TEMPORARY_REDIRECT,
                state.preview.end(),
                [(header::LOCATION, location)],
            )
                .into_response()
        }
        Err(err) => err.render(&state.renderer, preview),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoadMoreParams {
    cursor: Option<String>,
}

/// `GET /api/posts?cursor=<cursor>`
pub async fn load_more(
    State(state): State<AppState>,
    PreviewSession(preview): PreviewSession,
    Query(params): Query<LoadMoreParams>,
) -> Result<Json<PostPagination>, ApiError> {
    let cursor = params
        .cursor
        .filter(|c| !c.is_empty())
        .map(Cursor::new)
        .ok_or_else(|| ServerError::BadRequest("missing cursor".to_string()))?;

    if !state.cms.owns(&cursor) {
        tracing::warn!(cursor = %cursor, "rejecting cursor for a foreign host");
        return Err(ServerError::BadRequest("cursor does not belong to the CMS".to_string()).into());
    }

    let handle = state.cms.handle(preview.as_ref()).await?;
    let page = ListingPage::fetch(&handle, &cursor).await?;

    Ok(Json(PostPagination {
        next_page: page.next_page.as_ref().map(load_more_href),
        results: PostCard::from_summaries(&page.results, &state.formatter),
    }))
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "spacetraveling",
        version: env!("CARGO_PKG_VERSION"),
    })
}
