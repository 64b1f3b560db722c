//! Maps CMS documents and links to site paths

use serde_json::Value;

use crate::cms::Document;
use crate::helpers::post_path;

/// Resolves documents to the page that renders them
#[derive(Debug, Clone)]
pub struct LinkResolver {
    post_type: String,
}

impl LinkResolver {
    pub fn new(post_type: &str) -> Self {
        Self {
            post_type: post_type.to_string(),
        }
    }

    /// Path of a document: posts live under `/post/<uid>`, anything else is `/`
    pub fn resolve(&self, doc: &Document) -> String {
        self.resolve_parts(&doc.doc_type, doc.uid.as_deref())
    }

    /// Href of a hyperlink span's `data`
    pub fn resolve_link(&self, data: &Value) -> String {
        let get = |key: &str| data.get(key).and_then(Value::as_str);
        match get("link_type") {
            Some("Document") => self.resolve_parts(get("type").unwrap_or(""), get("uid")),
            _ => get("url").unwrap_or("#").to_string(),
        }
    }

    fn resolve_parts(&self, doc_type: &str, uid: Option<&str>) -> String {
        match uid {
            Some(uid) if doc_type == self.post_type => post_path(uid),
            _ => "/".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::memory::doc;
    use serde_json::json;

    #[test]
    fn test_resolve_document() {
        let resolver = LinkResolver::new("posts");
        let post = doc("1", "como-utilizar-hooks", "2021-03-25T19:25:28+0000");
        assert_eq!(resolver.resolve(&post), "/post/como-utilizar-hooks");

        let mut page = post.clone();
        page.doc_type = "page".to_string();
        assert_eq!(resolver.resolve(&page), "/");
    }

    #[test]
    fn test_resolve_link() {
        let resolver = LinkResolver::new("posts");
        assert_eq!(
            resolver.resolve_link(&json!({"link_type": "Web", "url": "https://example.com"})),
            "https://example.com"
        );
        assert_eq!(
            resolver.resolve_link(&json!({"link_type": "Document", "type": "posts", "uid": "a b"})),
            "/post/a%20b"
        );
        assert_eq!(
            resolver.resolve_link(&json!({"link_type": "Document", "type": "posts"})),
            "/"
        );
        assert_eq!(resolver.resolve_link(&Value::Null), "#");
    }
}
