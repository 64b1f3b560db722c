//! Generator module - renders the published content to static files

use anyhow::Result;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::cms::{CmsClient, QueryHandle};
use crate::content::{LinkResolver, Listing, PostPage, PostSummary};
use crate::helpers::DateFormatter;
use crate::templates::{PostCard, PostPagination, PostView, TemplateRenderer};
use crate::Blog;

/// What a build produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateStats {
    pub posts: usize,
    pub pages: usize,
}

/// Static site generator
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    formatter: DateFormatter,
    resolver: LinkResolver,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            renderer: TemplateRenderer::new(&blog.config)?,
            formatter: DateFormatter::from_config(&blog.config),
            resolver: LinkResolver::new(&blog.config.cms.document_type),
        })
    }

    /// Generate the entire site from the published content
    pub async fn generate(&self, cms: &CmsClient) -> Result<GenerateStats> {
        fs::create_dir_all(&self.blog.public_dir)?;

        self.copy_static_assets()?;

        let handle = cms.handle(None).await?;
        let (posts, bounds) = self.load_listing(&handle).await?;

        self.generate_index_pages(&posts, &bounds)?;
        let written = self.generate_post_pages(&handle, &posts).await?;
        self.generate_not_found_page()?;

        Ok(GenerateStats {
            posts: written,
            pages: bounds.len(),
        })
    }

    /// Walk the listing cursor chain. Returns every summary plus the end
    /// offset of each listing page.
    async fn load_listing(&self, handle: &QueryHandle) -> Result<(Vec<PostSummary>, Vec<usize>)> {
        let config = &self.blog.config;
        let mut listing =
            Listing::load(handle, &config.cms.document_type, config.per_page.max(1)).await?;

        let mut bounds = vec![listing.posts().len()];
        while listing.has_more() {
            let added = listing.load_more(handle).await?;
            let end = bounds.last().copied().unwrap_or(0) + added;
            bounds.push(end);
        }

        tracing::info!(
            "Loaded {} posts in {} pages",
            listing.posts().len(),
            bounds.len()
        );
        Ok((listing.into_posts(), bounds))
    }

    /// Local href of listing page `page_num` (2-based)
    fn page_href(&self, page_num: usize) -> String {
        format!(
            "/{}/{}/posts.json",
            self.blog.config.pagination_dir.trim_matches('/'),
            page_num
        )
    }

    /// `index.html` with the first page, `<pagination_dir>/<n>/posts.json`
    /// for the rest, each pointing at the next
    fn generate_index_pages(&self, posts: &[PostSummary], bounds: &[usize]) -> Result<()> {
        let total_pages = bounds.len();
        let next_href = |page_num: usize| {
            if page_num < total_pages {
                Some(self.page_href(page_num + 1))
            } else {
                None
            }
        };

        let mut start = 0;
        for (i, &end) in bounds.iter().enumerate() {
            let page_num = i + 1;
            let cards = PostCard::from_summaries(&posts[start..end], &self.formatter);
            start = end;

            if page_num == 1 {
                let html = self
                    .renderer
                    .render_home(&cards, next_href(page_num).as_deref(), false)?;
                let output_path = self.blog.public_dir.join("index.html");
                fs::write(&output_path, html)?;
                tracing::debug!("Generated: {:?}", output_path);
                continue;
            }

            let pagination = PostPagination {
                next_page: next_href(page_num),
                results: cards,
            };
            let output_path = self
                .blog
                .public_dir
                .join(self.page_href(page_num).trim_start_matches('/'));
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, serde_json::to_string(&pagination)?)?;
            tracing::debug!("Generated: {:?}", output_path);
        }

        Ok(())
    }

    /// Generate individual post pages
    async fn generate_post_pages(
        &self,
        handle: &QueryHandle,
        posts: &[PostSummary],
    ) -> Result<usize> {
        let doc_type = &self.blog.config.cms.document_type;
        let mut written = 0;

        for summary in posts {
            if !is_safe_slug(&summary.uid) {
                tracing::warn!(uid = %summary.uid, "skipping post with an unsafe slug");
                continue;
            }

            let page = PostPage::load(handle, doc_type, &summary.uid).await?;
            let view = PostView::new(&page, &self.formatter, &self.resolver);
            let html = self.renderer.render_post(&view, false)?;

            let output_path = self
                .blog
                .public_dir
                .join("post")
                .join(&summary.uid)
                .join("index.html");
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
            }
            fs::write(&output_path, &html)
                .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
            tracing::debug!("Generated post: {:?}", output_path);
            written += 1;
        }

        Ok(written)
    }

    fn generate_not_found_page(&self) -> Result<()> {
        let html = self.renderer.render_error(404, "Post não encontrado.", false)?;
        fs::write(self.blog.public_dir.join("404.html"), html)?;
        Ok(())
    }

    /// Copy static assets (images, css, etc.) to public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            tracing::debug!("No static directory at {:?}", static_dir);
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() {
                let relative = path.strip_prefix(static_dir)?;
                let dest = self.blog.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}

/// Whether a slug can be used as a single directory name
fn is_safe_slug(slug: &str) -> bool {
    let path = Path::new(slug);
    !slug.is_empty()
        && !slug.contains(['/', '\\'])
        && path.components().count() == 1
        && path.file_name().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::memory::{doc, MemoryRepository};
    use crate::config::SiteConfig;
    use std::sync::Arc;

    fn blog(dir: &Path) -> Blog {
        let config = SiteConfig {
            per_page: 1,
            date_locale: "en_US".to_string(),
            ..SiteConfig::default()
        };
        Blog::with_config(dir, config)
    }

    fn cms() -> CmsClient {
        CmsClient::new(Arc::new(
            MemoryRepository::new()
                .with_document(doc("1", "first", "2021-03-01T10:00:00+0000"))
                .with_document(doc("2", "second", "2021-03-02T10:00:00+0000"))
                .with_document(doc("3", "third", "2021-03-03T10:00:00+0000")),
        ))
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_generate_site() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        fs::create_dir_all(blog.static_dir.join("assets")).unwrap();
        fs::write(blog.static_dir.join("assets/logo.svg"), "<svg/>").unwrap();

        let stats = Generator::new(&blog)
            .unwrap()
            .generate(&cms())
            .await
            .unwrap();
        assert_eq!(stats, GenerateStats { posts: 3, pages: 3 });

        let public = &blog.public_dir;
        let index = fs::read_to_string(public.join("index.html")).unwrap();
        assert!(index.contains("Title first"));
        assert!(index.contains("&#x2F;page&#x2F;2&#x2F;posts.json"));

        let page2 = read_json(&public.join("page/2/posts.json"));
        assert_eq!(page2["next_page"], "/page/3/posts.json");
        assert_eq!(page2["results"][0]["uid"], "second");

        let page3 = read_json(&public.join("page/3/posts.json"));
        assert!(page3["next_page"].is_null());
        assert_eq!(page3["results"][0]["href"], "/post/third");

        for uid in ["first", "second", "third"] {
            let post = fs::read_to_string(public.join("post").join(uid).join("index.html")).unwrap();
            assert!(post.contains(&format!("Title {}", uid)));
        }

        assert!(public.join("404.html").exists());
        assert_eq!(
            fs::read_to_string(public.join("assets/logo.svg")).unwrap(),
            "<svg/>"
        );
    }

    #[tokio::test]
    async fn test_generate_single_page_has_no_load_more() {
        let dir = tempfile::tempdir().unwrap();
        let mut blog = blog(dir.path());
        blog.config.per_page = 10;

        let stats = Generator::new(&blog)
            .unwrap()
            .generate(&cms())
            .await
            .unwrap();
        assert_eq!(stats.pages, 1);

        let index = fs::read_to_string(blog.public_dir.join("index.html")).unwrap();
        assert!(!index.contains("Carregar mais posts"));
        assert!(!blog.public_dir.join("page").exists());
    }

    #[test]
    fn test_is_safe_slug() {
        assert!(is_safe_slug("como-utilizar-hooks"));
        assert!(is_safe_slug("ação"));
        assert!(!is_safe_slug(""));
        assert!(!is_safe_slug(".."));
        assert!(!is_safe_slug("a/b"));
    }
}
