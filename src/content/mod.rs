//! Content module - view models shaped from CMS documents

mod detail;
mod link;
mod listing;
mod post;
mod reading_time;
pub mod rich_text;

pub use detail::PostPage;
pub use link::LinkResolver;
pub use listing::{Listing, ListingPage};
pub use post::{Banner, ContentSection, PostDetail, PostNeighbor, PostSummary};
pub use reading_time::{count_words, reading_time, WORDS_PER_MINUTE};
pub use rich_text::{RichTextBlock, TextBlock};
