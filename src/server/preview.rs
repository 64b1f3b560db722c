//! Preview mode: the signed cookie and the endpoints that set and clear it

use axum::extract::{FromRequestParts, Query, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, Key, SameSite, SignedCookieJar};
use serde::Deserialize;
use sha2::{Digest, Sha512};
use std::convert::Infallible;

use super::error::{ApiError, ServerError};
use super::AppState;
use crate::cms::PreviewRef;
use crate::config::SiteConfig;

/// Issues and reads the preview cookie.
///
/// The cookie carries the CMS preview ref, signed with a key derived from
/// `preview.secret`. Without a secret preview mode is disabled and no cookie
/// verifies.
#[derive(Clone)]
pub struct PreviewCookie {
    name: String,
    key: Option<Key>,
    secure: bool,
    max_age: Option<u64>,
}

impl PreviewCookie {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            name: config.preview.cookie_name.clone(),
            key: config.preview.secret.as_deref().map(signing_key),
            secure: config.is_https(),
            max_age: config.preview.max_age,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    /// The preview ref in `jar`, if its signature holds
    pub fn read(&self, jar: &CookieJar) -> Option<PreviewRef> {
        let key = self.key.as_ref()?;
        let raw = jar.get(&self.name)?;

        // RFC 6265 allows a double-quoted cookie value
        let value = raw.value().trim_matches('"').to_string();
        let signed = SignedCookieJar::new(key.clone());
        match signed.verify(Cookie::new(self.name.clone(), value)) {
            Some(cookie) => PreviewRef::new(cookie.value()),
            None => {
                tracing::debug!("ignoring preview cookie with a bad signature");
                None
            }
        }
    }

    /// Jar starting a preview session on `reference`
    pub fn start(&self, reference: &PreviewRef) -> Option<SignedCookieJar> {
        let key = self.key.clone()?;
        let mut cookie = self.cookie(reference.as_str().to_string());
        if let Some(max_age) = self.max_age {
            let seconds = i64::try_from(max_age).unwrap_or(i64::MAX);
            cookie.set_max_age(time::Duration::seconds(seconds));
        }
        Some(SignedCookieJar::new(key).add(cookie))
    }

    /// Jar expiring the preview cookie
    pub fn end(&self) -> CookieJar {
        let mut cookie = self.cookie(String::new());
        cookie.make_removal();
        CookieJar::new().add(cookie)
    }

    fn cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }
}

/// Signing key for a secret of any length
fn signing_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}

/// The preview ref of the current request, if its cookie verifies
pub struct PreviewSession(pub Option<PreviewRef>);

#[axum::async_trait]
impl FromRequestParts<AppState> for PreviewSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Self(state.preview.read(&jar)))
    }
}

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    token: Option<String>,
    #[serde(rename = "documentId")]
    document_id: Option<String>,
}

/// `GET /api/preview?token=<ref>&documentId=<id>`
pub async fn preview(
    State(state): State<AppState>,
    Query(params): Query<PreviewParams>,
) -> Result<Response, ApiError> {
    if !state.preview.is_enabled() {
        return Err(ServerError::PreviewDisabled.into());
    }

    let reference = params
        .token
        .and_then(PreviewRef::new)
        .ok_or(ServerError::InvalidToken)?;
    let document_id = params
        .document_id
        .filter(|id| !id.trim().is_empty())
        .ok_or(ServerError::InvalidToken)?;

    let handle = state.cms.handle(Some(&reference)).await?;
    let resolver = &state.resolver;
    let location = match handle
        .resolve_preview(&document_id, |doc| resolver.resolve(doc), "/")
        .await
    {
        Ok(location) => location,
        Err(e) if e.is_rejection() => {
            tracing::warn!(document_id = %document_id, "CMS refused preview ref: {}", e);
            return Err(ServerError::InvalidToken.into());
        }
        Err(e) => return Err(e.into()),
    };

    let jar = state
        .preview
        .start(&reference)
        .ok_or(ServerError::PreviewDisabled)?;

    tracing::info!(document_id = %document_id, location = %location, "preview started");
    Ok((StatusCode::FOUND, jar, [(header::LOCATION, location)]).into_response())
}

/// `GET /api/exit-preview`
pub async fn exit_preview(State(state): State<AppState>) -> Response {
    tracing::info!("preview ended");
    (
        StatusCode::TEMPORARY_REDIRECT,
        state.preview.end(),
        [(header::LOCATION, "/")],
    )
        .into_response()
}
