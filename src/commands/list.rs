//! List the posts known to the CMS

use anyhow::Result;

use crate::cms::CmsClient;
use crate::content::{Listing, PostSummary};
use crate::Blog;

/// Page size used while walking the listing
const LIST_PAGE_SIZE: usize = 100;

/// Print every published post
pub async fn run(blog: &Blog) -> Result<()> {
    let cms = blog.cms()?;
    let posts = load_posts(&cms, &blog.config.cms.document_type).await?;

    println!("Posts ({}):", posts.len());
    for post in posts {
        let date = post
            .first_publication_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        println!("  {} - {} [{}]", date, post.title, post.uid);
    }

    Ok(())
}

/// Every published post of `doc_type`, following the cursor chain
pub async fn load_posts(cms: &CmsClient, doc_type: &str) -> Result<Vec<PostSummary>> {
    let handle = cms.handle(None).await?;
    let mut listing = Listing::load(&handle, doc_type, LIST_PAGE_SIZE).await?;
    while listing.has_more() {
        listing.load_more(&handle).await?;
    }
    Ok(listing.into_posts())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::memory::{doc, MemoryRepository};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_load_posts_follows_cursors() {
        let mut repo = MemoryRepository::new();
        for i in 0..150 {
            repo = repo.with_document(doc(
                &i.to_string(),
                &format!("post-{}", i),
                "2021-03-01T10:00:00+0000",
            ));
        }
        let cms = CmsClient::new(Arc::new(repo));

        let posts = load_posts(&cms, "posts").await.unwrap();
        assert_eq!(posts.len(), 150);
        assert_eq!(posts[0].uid, "post-0");
        assert_eq!(posts[149].uid, "post-149");
    }
}
