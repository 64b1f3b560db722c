//! Opaque tokens handed out by the CMS

use serde::{Deserialize, Serialize};
use std::fmt;

/// Next-page cursor returned by a search. Dereferenced verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Preview ref issued by the CMS for a preview session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewRef(String);

impl PreviewRef {
    /// Wrap a ref, rejecting blank values
    pub fn new(reference: impl Into<String>) -> Option<Self> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            None
        } else {
            Some(Self(reference))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_preview_ref_rejected() {
        assert!(PreviewRef::new("").is_none());
        assert!(PreviewRef::new("   ").is_none());
        assert_eq!(
            PreviewRef::new("https://repo.prismic.io/previews/abc").map(|r| r.to_string()),
            Some("https://repo.prismic.io/previews/abc".to_string())
        );
    }

    #[test]
    fn test_cursor_serializes_as_string() {
        let cursor = Cursor::new("https://repo/api/v2/documents/search?page=2");
        let json = serde_json::to_string(&Some(cursor)).unwrap();
        assert_eq!(json, r#""https://repo/api/v2/documents/search?page=2""#);
    }
}
