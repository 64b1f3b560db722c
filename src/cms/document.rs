//! Raw documents and responses as served by the CMS REST API

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Cursor;

/// API root (`GET {endpoint}`), trimmed to what we use
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRoot {
    pub refs: Vec<Ref>,
}

impl ApiRoot {
    /// The ref pointing at published content
    pub fn master_ref(&self) -> Option<&Ref> {
        self.refs.iter().find(|r| r.is_master_ref)
    }
}

/// A content release (the master ref is the published one)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ref {
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

/// One page of search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default)]
    pub results_per_page: usize,
    #[serde(default)]
    pub results_size: usize,
    #[serde(default)]
    pub total_results_size: usize,
    #[serde(default)]
    pub total_pages: usize,
    pub next_page: Option<Cursor>,
    pub prev_page: Option<Cursor>,
    pub results: Vec<Document>,
}

fn first_page() -> usize {
    1
}

/// A CMS document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub uid: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub last_publication_date: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl Document {
    /// A top-level string field of `data`
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(Value::as_str)
    }

    pub fn first_published(&self) -> Option<DateTime<Utc>> {
        self.first_publication_date.as_deref().and_then(parse_cms_date)
    }

    pub fn last_published(&self) -> Option<DateTime<Utc>> {
        self.last_publication_date.as_deref().and_then(parse_cms_date)
    }
}

/// Parse a CMS timestamp such as `2021-03-25T19:25:28+0000`
pub fn parse_cms_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::<FixedOffset>::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .map(|d| d.with_timezone(&Utc))
        .ok()
}
