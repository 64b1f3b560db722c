//! Paginated post listing driven by CMS cursors

use super::PostSummary;
use crate::cms::{CmsError, Cursor, Predicate, QueryHandle, QueryOptions, SearchResponse};

/// One page of summaries and the cursor to the following page
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub results: Vec<PostSummary>,
    pub next_page: Option<Cursor>,
}

impl ListingPage {
    pub fn from_response(response: SearchResponse) -> Self {
        Self {
            results: response
                .results
                .iter()
                .filter_map(PostSummary::from_document)
                .collect(),
            next_page: response.next_page,
        }
    }

    /// Query the first page of posts of `doc_type`
    pub async fn first(
        handle: &QueryHandle,
        doc_type: &str,
        page_size: usize,
    ) -> Result<Self, CmsError> {
        let fields = ["title", "subtitle", "author"].map(|f| format!("{}.{}", doc_type, f));
        let response = handle
            .query(
                vec![Predicate::document_type(doc_type)],
                QueryOptions::default().fetch(fields).page_size(page_size),
            )
            .await?;
        Ok(Self::from_response(response))
    }

    /// Dereference a cursor
    pub async fn fetch(handle: &QueryHandle, cursor: &Cursor) -> Result<Self, CmsError> {
        Ok(Self::from_response(handle.fetch(cursor).await?))
    }
}

/// Posts loaded so far plus the cursor for more.
///
/// Once the cursor is exhausted it stays exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    posts: Vec<PostSummary>,
    next_page: Option<Cursor>,
}

impl Listing {
    pub fn new(first: ListingPage) -> Self {
        Self {
            posts: first.results,
            next_page: first.next_page,
        }
    }

    pub async fn load(
        handle: &QueryHandle,
        doc_type: &str,
        page_size: usize,
    ) -> Result<Self, CmsError> {
        Ok(Self::new(ListingPage::first(handle, doc_type, page_size).await?))
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn next_page(&self) -> Option<&Cursor> {
        self.next_page.as_ref()
    }

    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Fetch the next page and append it, returning how many posts were added.
    ///
    /// A failed fetch leaves the listing untouched.
    pub async fn load_more(&mut self, handle: &QueryHandle) -> Result<usize, CmsError> {
        let Some(cursor) = &self.next_page else {
            return Ok(0);
        };

        let page = match ListingPage::fetch(handle, cursor).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(cursor = %cursor, "failed to load more posts: {}", e);
                return Err(e);
            }
        };

        let added = page.results.len();
        self.posts.extend(page.results);
        self.next_page = page.next_page;
        tracing::debug!(added, has_more = self.has_more(), "loaded more posts");
        Ok(added)
    }

    pub fn into_posts(self) -> Vec<PostSummary> {
        self.posts
    }
}
