//! Prismic REST API v2 repository

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{ApiRoot, CmsError, Cursor, Repository, SearchQuery, SearchResponse};
use crate::config::CmsConfig;

/// Repository backed by the Prismic REST API
pub struct PrismicRepository {
    client: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl PrismicRepository {
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("spacetraveling/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/documents/search", self.endpoint)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CmsError> {
        let request = match &self.access_token {
            Some(token) => request.query(&[("access_token", token)]),
            None => request,
        };
        send_json(request).await
    }
}

async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, CmsError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "CMS request rejected");
        return Err(CmsError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl Repository for PrismicRepository {
    async fn api_root(&self) -> Result<ApiRoot, CmsError> {
        self.get_json(self.client.get(&self.endpoint)).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, CmsError> {
        tracing::debug!(
            q = %super::predicate::to_query(&query.predicates),
            page_size = ?query.options.page_size,
            after = ?query.options.after,
            "CMS search"
        );
        let request = self.client.get(self.search_url()).query(&query.params());
        self.get_json(request).await
    }

    async fn fetch(&self, cursor: &Cursor) -> Result<SearchResponse, CmsError> {
        if !self.owns(cursor) {
            return Err(CmsError::ForeignCursor(cursor.to_string()));
        }
        tracing::debug!(cursor = %cursor, "CMS fetch cursor");
        // next_page URLs already carry every search parameter, the token included
        send_json(self.client.get(cursor.as_str())).await
    }

    fn owns(&self, cursor: &Cursor) -> bool {
        cursor
            .as_str()
            .strip_prefix(&self.search_url())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('?'))
    }
}

/// Extract the `message` of a CMS error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}
