//! Error types for the blog server.
//!
//! Page handlers answer with the site's error page, API handlers with a
//! JSON `{"message": ...}` body.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use crate::cms::CmsError;
use crate::helpers::html_escape;
use crate::templates::TemplateRenderer;

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No post with the requested slug
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    /// The preview ref was missing or refused by the CMS
    #[error("Invalid token")]
    InvalidToken,

    /// No preview secret is configured
    #[error("Preview mode is disabled")]
    PreviewDisabled,

    /// The CMS failed or answered something unusable
    #[error("upstream error: {0}")]
    Upstream(CmsError),

    /// Template rendering failed
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<CmsError> for ServerError {
    fn from(err: CmsError) -> Self {
        match err {
            CmsError::NotFound(what) => Self::NotFound(what),
            CmsError::ForeignCursor(cursor) => {
                Self::BadRequest(format!("cursor does not belong to the CMS: {}", cursor))
            }
            other => Self::Upstream(other),
        }
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::PreviewDisabled => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to visitors
    fn public_message(&self) -> String {
        match self {
            Self::NotFound(_) => "Post não encontrado.".to_string(),
            Self::Upstream(_) => {
                "O serviço de conteúdo está indisponível. Tente novamente mais tarde.".to_string()
            }
            Self::Internal(_) => "Ocorreu um erro interno.".to_string(),
            other => other.to_string(),
        }
    }

    fn log(&self) {
        match self {
            Self::Upstream(err) => tracing::error!(error = %err, "CMS request failed"),
            Self::Internal(err) => tracing::error!(error = %err, "internal server error"),
            other => tracing::debug!(error = %other, "request rejected"),
        }
    }

    /// Error page rendered with the site layout; `preview` keeps the exit
    /// link visible during a preview session
    pub fn render(self, renderer: &TemplateRenderer, preview: bool) -> Response {
        self.log();
        let status = self.status();
        match renderer.render_error(status.as_u16(), &self.public_message(), preview) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "failed to render error page");
                self.plain_page()
            }
        }
    }

    /// Bare error page that needs no templates
    fn plain_page(&self) -> Response {
        let status = self.status();
        let message = html_escape(&self.public_message());

        let markup = format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{code} | Spacetraveling</title>
  <meta name="robots" content="noindex">
</head>
<body>
  <main class="container error">
    <h1>{code}</h1>
    <p>{message}</p>
    <a href="/">Voltar para a página inicial</a>
  </main>
</body>
</html>
"#,
            code = status.as_u16(),
            message = message,
        );

        (status, Html(markup)).into_response()
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        self.log();
        self.plain_page()
    }
}

/// Error of a JSON endpoint
#[derive(Debug)]
pub struct ApiError(pub ServerError);

impl From<ServerError> for ApiError {
    fn from(err: ServerError) -> Self {
        Self(err)
    }
}

impl From<CmsError> for ApiError {
    fn from(err: CmsError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.0.log();
        let body = serde_json::json!({ "message": self.0.public_message() });
        (self.0.status(), Json(body)).into_response()
    }
}
