//! CMS module - client factory, query handles and the Prismic repository
//!
//! A [`Repository`] speaks the wire protocol. [`CmsClient`] wraps one and
//! hands out [`QueryHandle`]s bound to a ref: the preview ref when a preview
//! session is active, otherwise the repository's master ref.

mod document;
mod error;
#[cfg(test)]
pub(crate) mod memory;
pub mod predicate;
mod prismic;
mod token;

use async_trait::async_trait;
use std::sync::Arc;

pub use document::{parse_cms_date, ApiRoot, Document, Ref, SearchResponse};
pub use error::CmsError;
pub use predicate::{Ordering, Predicate, QueryOptions, SearchQuery};
pub use prismic::PrismicRepository;
pub use token::{Cursor, PreviewRef};

use crate::config::CmsConfig;

/// Wire-level access to a content repository
#[async_trait]
pub trait Repository: Send + Sync {
    /// Fetch the API root listing the available refs
    async fn api_root(&self) -> Result<ApiRoot, CmsError>;

    /// Run a search
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, CmsError>;

    /// Dereference a cursor returned by an earlier search
    async fn fetch(&self, cursor: &Cursor) -> Result<SearchResponse, CmsError>;

    /// Whether the cursor points into this repository
    fn owns(&self, cursor: &Cursor) -> bool;
}

/// Factory for query handles
#[derive(Clone)]
pub struct CmsClient {
    repository: Arc<dyn Repository>,
}

impl CmsClient {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Client for the configured Prismic repository
    pub fn prismic(config: &CmsConfig) -> Result<Self, CmsError> {
        Ok(Self::new(Arc::new(PrismicRepository::new(config)?)))
    }

    /// A handle querying the preview ref if given, the master ref otherwise
    pub async fn handle(&self, preview: Option<&PreviewRef>) -> Result<QueryHandle, CmsError> {
        let (reference, preview) = match preview {
            Some(preview_ref) => (preview_ref.as_str().to_string(), true),
            None => {
                let root = self.repository.api_root().await?;
                let master = root
                    .master_ref()
                    .ok_or_else(|| CmsError::NoMasterRef("api root".to_string()))?;
                (master.reference.clone(), false)
            }
        };

        Ok(QueryHandle {
            repository: Arc::clone(&self.repository),
            reference,
            preview,
        })
    }

    pub fn owns(&self, cursor: &Cursor) -> bool {
        self.repository.owns(cursor)
    }
}

/// Authenticated query handle bound to one ref
#[derive(Clone)]
pub struct QueryHandle {
    repository: Arc<dyn Repository>,
    reference: String,
    preview: bool,
}

impl QueryHandle {
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Whether this handle sees unpublished content
    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub async fn query(
        &self,
        predicates: Vec<Predicate>,
        options: QueryOptions,
    ) -> Result<SearchResponse, CmsError> {
        let query = SearchQuery {
            reference: self.reference.clone(),
            predicates,
            options,
        };
        self.repository.search(&query).await
    }

    /// The document of `doc_type` with the given uid
    pub async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Document, CmsError> {
        let response = self
            .query(
                vec![Predicate::uid(doc_type, uid)],
                QueryOptions::default().page_size(1),
            )
            .await?;
        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::NotFound(format!("{} {}", doc_type, uid)))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Document>, CmsError> {
        let response = self
            .query(
                vec![Predicate::document_id(id)],
                QueryOptions::default().page_size(1),
            )
            .await?;
        Ok(response.results.into_iter().next())
    }

    /// Dereference a next-page cursor
    pub async fn fetch(&self, cursor: &Cursor) -> Result<SearchResponse, CmsError> {
        self.repository.fetch(cursor).await
    }

    /// Resolve the page to open for a previewed document.
    ///
    /// An unknown document resolves to `default`; a ref the CMS refuses is
    /// returned as an error.
    pub async fn resolve_preview<F>(
        &self,
        document_id: &str,
        link_resolver: F,
        default: &str,
    ) -> Result<String, CmsError>
    where
        F: Fn(&Document) -> String,
    {
        let document = self.get_by_id(document_id).await?;
        Ok(document
            .map(|doc| link_resolver(&doc))
            .unwrap_or_else(|| default.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::memory::{doc, MemoryRepository};
    use super::*;

    fn client(repo: MemoryRepository) -> CmsClient {
        CmsClient::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_handle_uses_master_ref() {
        let client = client(MemoryRepository::new());
        let handle = client.handle(None).await.unwrap();
        assert_eq!(handle.reference(), "master");
        assert!(!handle.is_preview());
    }

    #[tokio::test]
    async fn test_handle_bound_to_preview() {
        let client = client(MemoryRepository::new());
        let preview = PreviewRef::new("draft-ref").unwrap();
        let handle = client.handle(Some(&preview)).await.unwrap();
        assert_eq!(handle.reference(), "draft-ref");
        assert!(handle.is_preview());
    }

    #[tokio::test]
    async fn test_get_by_uid() {
        let repo = MemoryRepository::new()
            .with_document(doc("1", "first", "2021-03-01T10:00:00+0000"))
            .with_document(doc("2", "second", "2021-03-02T10:00:00+0000"));
        let handle = client(repo).handle(None).await.unwrap();

        let found = handle.get_by_uid("posts", "second").await.unwrap();
        assert_eq!(found.id, "2");

        let missing = handle.get_by_uid("posts", "third").await.unwrap_err();
        assert!(matches!(missing, CmsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_preview() {
        let repo = MemoryRepository::new()
            .with_preview("draft-ref", vec![doc("9", "draft", "2021-04-01T10:00:00+0000")]);
        let client = client(repo);
        let handle = client
            .handle(Some(&PreviewRef::new("draft-ref").unwrap()))
            .await
            .unwrap();

        let resolver = |d: &Document| format!("/post/{}", d.uid.clone().unwrap_or_default());
        assert_eq!(
            handle.resolve_preview("9", resolver, "/").await.unwrap(),
            "/post/draft"
        );
        assert_eq!(handle.resolve_preview("404", resolver, "/").await.unwrap(), "/");

        let bogus = client
            .handle(Some(&PreviewRef::new("bogus").unwrap()))
            .await
            .unwrap();
        let err = bogus.resolve_preview("9", resolver, "/").await.unwrap_err();
        assert!(err.is_rejection());
    }
}
