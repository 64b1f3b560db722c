//! Blog server: pages rendered per request so preview mode works
//!
//! ## Routes
//!
//! - `GET /` - Home page
//! - `GET /post/:slug` - Post page
//! - `GET /api/posts?cursor=` - Next page of the listing (JSON)
//! - `GET /api/preview` - Start a preview session
//! - `GET /api/exit-preview` - End a preview session
//! - `GET /health` - Health check (JSON)
//! - anything else is served from the static directory

mod error;
mod pages;
mod preview;

use anyhow::Result;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cms::CmsClient;
use crate::config::SiteConfig;
use crate::content::LinkResolver;
use crate::helpers::DateFormatter;
use crate::templates::TemplateRenderer;
use crate::Blog;

pub use error::{ApiError, ServerError};
pub use pages::load_more_href;
pub use preview::{PreviewCookie, PreviewSession};

/// Shared application state available to all request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub cms: CmsClient,
    pub renderer: Arc<TemplateRenderer>,
    pub resolver: LinkResolver,
    pub formatter: DateFormatter,
    pub preview: PreviewCookie,
}

impl AppState {
    pub fn new(config: &SiteConfig, cms: CmsClient) -> Result<Self> {
        let state = Self {
            config: Arc::new(config.clone()),
            cms,
            renderer: Arc::new(TemplateRenderer::new(config)?),
            resolver: LinkResolver::new(&config.cms.document_type),
            formatter: DateFormatter::from_config(config),
            preview: PreviewCookie::from_config(config),
        };

        if !state.preview.is_enabled() {
            tracing::warn!("no preview secret configured, preview mode is disabled");
        }

        Ok(state)
    }
}

/// Build the complete router
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/post/:slug", get(pages::post))
        .route("/api/posts", get(pages::load_more))
        .route("/api/preview", get(preview::preview))
        .route("/api/exit-preview", get(preview::exit_preview))
        .route("/health", get(pages::health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the blog server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let cms = CmsClient::prismic(&blog.config.cms)?;
    let state = AppState::new(&blog.config, cms)?;
    let app = router(state, &blog.static_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
