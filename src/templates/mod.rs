//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded directly in the binary.

mod view;

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::helpers::{full_url_for, open_graph, truncate};

pub use view::{NeighborLink, PostCard, PostPagination, PostView, SectionView};

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
    config: SiteConfig,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("post.html", include_str!("site/post.html")),
            ("error.html", include_str!("site/error.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/preview.html",
                include_str!("site/partials/preview.html"),
            ),
            (
                "partials/comments.html",
                include_str!("site/partials/comments.html"),
            ),
            (
                "partials/load_more.html",
                include_str!("site/partials/load_more.html"),
            ),
        ])?;

        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self {
            tera,
            config: config.clone(),
        })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Home page. `next_page` is the href the load-more button fetches.
    pub fn render_home(
        &self,
        posts: &[PostCard],
        next_page: Option<&str>,
        preview: bool,
    ) -> Result<String> {
        let mut context = self.base_context(preview);
        context.insert("posts", posts);
        context.insert("next_page", &next_page);
        self.render("index.html", &context)
    }

    pub fn render_post(&self, post: &PostView, preview: bool) -> Result<String> {
        let og_tags = open_graph(
            &post.title,
            &post.subtitle,
            &full_url_for(&self.config, &post.href),
            post.banner_url.as_deref(),
            &self.config.title,
        );

        let mut context = self.base_context(preview);
        context.insert("post", post);
        context.insert("og_tags", &og_tags);
        context.insert("comments", &self.config.comments);
        self.render("post.html", &context)
    }

    pub fn render_error(&self, status: u16, message: &str, preview: bool) -> Result<String> {
        let mut context = self.base_context(preview);
        context.insert("status", &status);
        context.insert("message", message);
        self.render("error.html", &context)
    }

    /// Context shared by every page
    fn base_context(&self, preview: bool) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::from(&self.config));
        context.insert("preview", &preview);
        context
    }
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    Ok(tera::Value::String(truncate(&s, length, Some(&omission))))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
        }
    }
}
