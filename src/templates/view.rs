//! View data handed to the templates and to the load-more API

use serde::Serialize;

use crate::content::{rich_text, LinkResolver, PostNeighbor, PostPage, PostSummary};
use crate::helpers::{date_xml, post_path, DateFormatter};

/// A post in the home listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCard {
    pub uid: String,
    pub href: String,
    /// ISO 8601 timestamp, null for unpublished previews
    pub first_publication_date: Option<String>,
    /// Display date
    pub date: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl PostCard {
    pub fn new(summary: &PostSummary, formatter: &DateFormatter) -> Self {
        Self {
            uid: summary.uid.clone(),
            href: post_path(&summary.uid),
            first_publication_date: summary.first_publication_date.as_ref().map(date_xml),
            date: summary
                .first_publication_date
                .as_ref()
                .map(|d| formatter.format(d))
                .unwrap_or_default(),
            title: summary.title.clone(),
            subtitle: summary.subtitle.clone(),
            author: summary.author.clone(),
        }
    }

    pub fn from_summaries(summaries: &[PostSummary], formatter: &DateFormatter) -> Vec<Self> {
        summaries
            .iter()
            .map(|s| Self::new(s, formatter))
            .collect()
    }
}

/// One page of posts as consumed by the load-more script
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPagination {
    pub next_page: Option<String>,
    pub results: Vec<PostCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborLink {
    pub title: String,
    pub href: String,
}

impl From<&PostNeighbor> for NeighborLink {
    fn from(neighbor: &PostNeighbor) -> Self {
        Self {
            title: neighbor.title.clone(),
            href: post_path(&neighbor.slug),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub heading: String,
    /// Rendered rich text
    pub html: String,
}

/// The post detail page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub uid: String,
    pub href: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub datetime: Option<String>,
    /// Display date of the last edit, when it differs from the first publication
    pub updated: Option<String>,
    /// Minutes
    pub reading_time: usize,
    pub banner_url: Option<String>,
    pub banner_alt: String,
    pub sections: Vec<SectionView>,
    pub previous: Option<NeighborLink>,
    pub next: Option<NeighborLink>,
}

impl PostView {
    pub fn new(page: &PostPage, formatter: &DateFormatter, resolver: &LinkResolver) -> Self {
        let post = &page.post;
        let summary = &post.summary;
        let first = summary.first_publication_date.as_ref();

        let updated = match (first, post.last_publication_date.as_ref()) {
            (Some(first), Some(last)) if last > first => Some(formatter.format(last)),
            _ => None,
        };

        Self {
            uid: summary.uid.clone(),
            href: post_path(&summary.uid),
            title: summary.title.clone(),
            subtitle: summary.subtitle.clone(),
            author: summary.author.clone(),
            date: first.map(|d| formatter.format(d)).unwrap_or_default(),
            datetime: first.map(date_xml),
            updated,
            reading_time: page.reading_time,
            banner_url: post.banner.as_ref().map(|b| b.url.clone()),
            banner_alt: post
                .banner
                .as_ref()
                .and_then(|b| b.alt.clone())
                .unwrap_or_else(|| summary.title.clone()),
            sections: post
                .content
                .iter()
                .map(|section| SectionView {
                    heading: section.heading.clone(),
                    html: rich_text::as_html(&section.body, resolver),
                })
                .collect(),
            previous: page.previous.as_ref().map(NeighborLink::from),
            next: page.next.as_ref().map(NeighborLink::from),
        }
    }
}
