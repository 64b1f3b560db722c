//! Post view models and their mapping from CMS documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RichTextBlock;
use crate::cms::Document;

/// A post as shown in the listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    /// URL slug
    pub uid: String,

    /// First publication date, absent for never-published previews
    pub first_publication_date: Option<DateTime<Utc>>,

    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl PostSummary {
    /// Map a listing document. Documents without a uid cannot be linked
    /// to and are skipped.
    pub fn from_document(doc: &Document) -> Option<Self> {
        let Some(uid) = doc.uid.clone() else {
            tracing::warn!(id = %doc.id, "skipping document without uid");
            return None;
        };

        Some(Self {
            first_publication_date: doc.first_published(),
            title: required_text(doc, "title"),
            subtitle: required_text(doc, "subtitle"),
            author: required_text(doc, "author"),
            uid,
        })
    }
}

/// A full post
#[derive(Debug, Clone, PartialEq)]
pub struct PostDetail {
    /// CMS document id, needed for neighbor lookups
    pub id: String,
    pub summary: PostSummary,
    pub last_publication_date: Option<DateTime<Utc>>,
    pub banner: Option<Banner>,
    /// Sections in source order
    pub content: Vec<ContentSection>,
}

impl PostDetail {
    pub fn from_document(doc: &Document) -> Option<Self> {
        let summary = PostSummary::from_document(doc)?;

        let banner = doc
            .data
            .get("banner")
            .cloned()
            .and_then(|v| serde_json::from_value::<Banner>(v).ok())
            .filter(|b| !b.url.is_empty());

        let content = match doc.data.get("content") {
            Some(Value::Array(sections)) => sections
                .iter()
                .filter_map(|s| match serde_json::from_value::<ContentSection>(s.clone()) {
                    Ok(section) => Some(section),
                    Err(e) => {
                        tracing::warn!(id = %doc.id, "skipping malformed content section: {}", e);
                        None
                    }
                })
                .collect(),
            _ => Vec::new(),
        };

        Some(Self {
            id: doc.id.clone(),
            last_publication_date: doc.last_published(),
            summary,
            banner,
            content,
        })
    }
}

/// Banner image reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// A heading followed by rich-text body blocks
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentSection {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub heading: String,
    #[serde(default)]
    pub body: Vec<RichTextBlock>,
}

/// Previous or next post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostNeighbor {
    pub slug: String,
    pub title: String,
}

impl PostNeighbor {
    pub fn from_document(doc: &Document) -> Option<Self> {
        Some(Self {
            slug: doc.uid.clone()?,
            title: required_text(doc, "title"),
        })
    }
}

/// A text field the views require; null maps to the empty string
fn required_text(doc: &Document, field: &str) -> String {
    match doc.text_field(field) {
        Some(text) => text.to_string(),
        None => {
            tracing::warn!(id = %doc.id, field, "missing text field, using empty string");
            String::new()
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
