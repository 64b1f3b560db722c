//! Post detail queries: the post itself and its chronological neighbors

use super::{reading_time, PostDetail, PostNeighbor};
use crate::cms::{CmsError, Ordering, Predicate, QueryHandle, QueryOptions};

const PUBLICATION_DATE: &str = "document.first_publication_date";

/// Everything the post page shows
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub post: PostDetail,
    /// Estimated minutes to read
    pub reading_time: usize,
    pub previous: Option<PostNeighbor>,
    pub next: Option<PostNeighbor>,
}

impl PostPage {
    /// Load the post with `slug` and its neighbors
    pub async fn load(handle: &QueryHandle, doc_type: &str, slug: &str) -> Result<Self, CmsError> {
        let document = handle.get_by_uid(doc_type, slug).await?;
        let post = PostDetail::from_document(&document)
            .ok_or_else(|| CmsError::NotFound(format!("{} {}", doc_type, slug)))?;

        let previous = neighbor(handle, doc_type, &post.id, Ordering::desc(PUBLICATION_DATE));
        let next = neighbor(handle, doc_type, &post.id, Ordering::asc(PUBLICATION_DATE));
        let (previous, next) = tokio::try_join!(previous, next)?;

        Ok(Self {
            reading_time: reading_time(&post.content),
            post,
            previous,
            next,
        })
    }
}

/// First post positioned after `id` under `ordering`
async fn neighbor(
    handle: &QueryHandle,
    doc_type: &str,
    id: &str,
    ordering: Ordering,
) -> Result<Option<PostNeighbor>, CmsError> {
    let response = handle
        .query(
            vec![Predicate::document_type(doc_type)],
            QueryOptions::default()
                .fetch([format!("{}.title", doc_type)])
                .page_size(1)
                .after(id)
                .order_by(ordering),
        )
        .await?;

    Ok(response
        .results
        .first()
        .and_then(PostNeighbor::from_document))
}
