//! In-memory repository used by tests

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Mutex;

use super::{
    ApiRoot, CmsError, Cursor, Document, Predicate, Ref, Repository, SearchQuery, SearchResponse,
};

pub(crate) const MEMORY_ENDPOINT: &str = "https://memory.test/api/v2";
const DEFAULT_PAGE_SIZE: usize = 20;

/// Repository holding published documents plus preview releases
#[derive(Default)]
pub(crate) struct MemoryRepository {
    published: Vec<Document>,
    previews: HashMap<String, Vec<Document>>,
    /// Cursor url to the query and page it continues
    cursors: Mutex<HashMap<String, (SearchQuery, usize)>>,
    fail_fetches: AtomicBool,
}

impl MemoryRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_document(mut self, document: Document) -> Self {
        self.published.push(document);
        self
    }

    /// Documents visible under the preview ref `reference`
    pub(crate) fn with_preview(mut self, reference: &str, documents: Vec<Document>) -> Self {
        self.previews.insert(reference.to_string(), documents);
        self
    }

    pub(crate) fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, AtomicOrdering::SeqCst);
    }

    fn documents(&self, reference: &str) -> Result<&[Document], CmsError> {
        if reference == "master" {
            return Ok(&self.published);
        }
        self.previews
            .get(reference)
            .map(Vec::as_slice)
            .ok_or_else(|| CmsError::Status {
                status: 404,
                message: format!("Ref not found: {}", reference),
            })
    }

    fn run(&self, query: &SearchQuery, page: usize) -> Result<SearchResponse, CmsError> {
        let mut docs: Vec<Document> = self
            .documents(&query.reference)?
            .iter()
            .filter(|d| query.predicates.iter().all(|p| matches(p, d)))
            .cloned()
            .collect();

        for ordering in query.options.orderings.iter().rev() {
            docs.sort_by(|a, b| {
                let ord = sort_key(a, &ordering.field).cmp(&sort_key(b, &ordering.field));
                if ordering.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        if let Some(after) = &query.options.after {
            if let Some(pos) = docs.iter().position(|d| &d.id == after) {
                docs.drain(..=pos);
            }
        }

        if !query.options.fetch.is_empty() {
            for doc in &mut docs {
                project(doc, &query.options.fetch);
            }
        }

        let page_size = query.options.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let page = page.max(1);
        let total = docs.len();
        let total_pages = total.div_ceil(page_size);
        let results: Vec<Document> = docs
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();

        let next_page = if page < total_pages {
            let mut cursors = self.cursors.lock().unwrap();
            let url = format!(
                "{}/documents/search?cursor={}",
                MEMORY_ENDPOINT,
                cursors.len() + 1
            );
            cursors.insert(url.clone(), (query.clone(), page + 1));
            Some(Cursor::new(url))
        } else {
            None
        };

        Ok(SearchResponse {
            page,
            results_per_page: page_size,
            results_size: results.len(),
            total_results_size: total,
            total_pages,
            next_page,
            prev_page: None,
            results,
        })
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn api_root(&self) -> Result<ApiRoot, CmsError> {
        Ok(ApiRoot {
            refs: vec![Ref {
                id: "master".to_string(),
                reference: "master".to_string(),
                label: "Master".to_string(),
                is_master_ref: true,
            }],
        })
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, CmsError> {
        self.run(query, 1)
    }

    async fn fetch(&self, cursor: &Cursor) -> Result<SearchResponse, CmsError> {
        if !self.owns(cursor) {
            return Err(CmsError::ForeignCursor(cursor.to_string()));
        }
        if self.fail_fetches.load(AtomicOrdering::SeqCst) {
            return Err(CmsError::Status {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        let (query, page) = self
            .cursors
            .lock()
            .unwrap()
            .get(cursor.as_str())
            .cloned()
            .ok_or_else(|| CmsError::Status {
                status: 404,
                message: "unknown cursor".to_string(),
            })?;
        self.run(&query, page)
    }

    fn owns(&self, cursor: &Cursor) -> bool {
        cursor
            .as_str()
            .starts_with(&format!("{}/documents/search?", MEMORY_ENDPOINT))
    }
}

fn field_value<'a>(doc: &'a Document, path: &str) -> Option<&'a str> {
    match path {
        "document.type" => Some(doc.doc_type.as_str()),
        "document.id" => Some(doc.id.as_str()),
        _ => {
            let rest = path.strip_prefix("my.")?;
            let (doc_type, field) = rest.split_once('.')?;
            if doc_type != doc.doc_type {
                return None;
            }
            if field == "uid" {
                doc.uid.as_deref()
            } else {
                doc.text_field(field)
            }
        }
    }
}

fn matches(predicate: &Predicate, doc: &Document) -> bool {
    match predicate {
        Predicate::At { path, value } => field_value(doc, path) == Some(value.as_str()),
    }
}

fn sort_key<'a>(doc: &'a Document, field: &str) -> Option<&'a str> {
    match field {
        "document.first_publication_date" => doc.first_publication_date.as_deref(),
        "document.last_publication_date" => doc.last_publication_date.as_deref(),
        other => field_value(doc, other),
    }
}

fn project(doc: &mut Document, fetch: &[String]) {
    if let Some(data) = doc.data.as_object_mut() {
        let doc_type = doc.doc_type.clone();
        data.retain(|key, _| fetch.iter().any(|f| *f == format!("{}.{}", doc_type, key)));
    }
}

/// A published post with one content section
pub(crate) fn doc(id: &str, uid: &str, published: &str) -> Document {
    Document {
        id: id.to_string(),
        uid: Some(uid.to_string()),
        doc_type: "posts".to_string(),
        first_publication_date: Some(published.to_string()),
        last_publication_date: Some(published.to_string()),
        data: json!({
            "title": format!("Title {}", uid),
            "subtitle": format!("Subtitle {}", uid),
            "author": "Joseph Oliveira",
            "banner": {"url": format!("https://images.test/{}.png", uid), "alt": null},
            "content": [{
                "heading": "Introduction",
                "body": [{"type": "paragraph", "text": "Some words here.", "spans": []}]
            }]
        }),
    }
}
