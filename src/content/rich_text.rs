//! Structured text blocks and their HTML rendering
//!
//! Span offsets count UTF-16 code units, the way the CMS editor reports them.

use serde::Deserialize;
use serde_json::Value;

use super::LinkResolver;
use crate::helpers::html_escape;

/// One block of structured text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum RichTextBlock {
    #[serde(rename = "paragraph")]
    Paragraph(TextBlock),
    #[serde(rename = "heading1")]
    Heading1(TextBlock),
    #[serde(rename = "heading2")]
    Heading2(TextBlock),
    #[serde(rename = "heading3")]
    Heading3(TextBlock),
    #[serde(rename = "heading4")]
    Heading4(TextBlock),
    #[serde(rename = "heading5")]
    Heading5(TextBlock),
    #[serde(rename = "heading6")]
    Heading6(TextBlock),
    #[serde(rename = "preformatted")]
    Preformatted(TextBlock),
    #[serde(rename = "list-item")]
    ListItem(TextBlock),
    #[serde(rename = "o-list-item")]
    OrderedListItem(TextBlock),
    #[serde(rename = "image")]
    Image(ImageBlock),
    #[serde(rename = "embed")]
    Embed(EmbedBlock),
    #[serde(other)]
    Unsupported,
}

impl RichTextBlock {
    /// Plain text of the block, empty for images and embeds
    pub fn text(&self) -> &str {
        match self {
            Self::Paragraph(b)
            | Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::Heading4(b)
            | Self::Heading5(b)
            | Self::Heading6(b)
            | Self::Preformatted(b)
            | Self::ListItem(b)
            | Self::OrderedListItem(b) => &b.text,
            Self::Image(_) | Self::Embed(_) | Self::Unsupported => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
}

impl TextBlock {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            spans: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageBlock {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmbedBlock {
    pub oembed: Value,
}

/// Inline formatting over `[start, end)`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SpanKind,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SpanKind {
    #[serde(rename = "strong")]
    Strong,
    #[serde(rename = "em")]
    Em,
    #[serde(rename = "hyperlink")]
    Hyperlink,
    #[serde(rename = "label")]
    Label,
    #[serde(other)]
    Other,
}

#[derive(Clone, Copy, PartialEq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn open(self) -> &'static str {
        match self {
            Self::Unordered => "<ul>",
            Self::Ordered => "<ol>",
        }
    }

    fn close(self) -> &'static str {
        match self {
            Self::Unordered => "</ul>",
            Self::Ordered => "</ol>",
        }
    }
}

/// Render blocks to HTML. Consecutive list items share one list element.
pub fn as_html(blocks: &[RichTextBlock], resolver: &LinkResolver) -> String {
    let mut html = String::new();
    let mut list: Option<ListKind> = None;

    for block in blocks {
        let wanted = match block {
            RichTextBlock::ListItem(_) => Some(ListKind::Unordered),
            RichTextBlock::OrderedListItem(_) => Some(ListKind::Ordered),
            _ => None,
        };
        if list != wanted {
            if let Some(open) = list {
                html.push_str(open.close());
            }
            if let Some(kind) = wanted {
                html.push_str(kind.open());
            }
            list = wanted;
        }

        match block {
            RichTextBlock::Paragraph(b) => wrap(&mut html, "p", b, resolver),
            RichTextBlock::Heading1(b) => wrap(&mut html, "h1", b, resolver),
            RichTextBlock::Heading2(b) => wrap(&mut html, "h2", b, resolver),
            RichTextBlock::Heading3(b) => wrap(&mut html, "h3", b, resolver),
            RichTextBlock::Heading4(b) => wrap(&mut html, "h4", b, resolver),
            RichTextBlock::Heading5(b) => wrap(&mut html, "h5", b, resolver),
            RichTextBlock::Heading6(b) => wrap(&mut html, "h6", b, resolver),
            RichTextBlock::Preformatted(b) => wrap(&mut html, "pre", b, resolver),
            RichTextBlock::ListItem(b) | RichTextBlock::OrderedListItem(b) => {
                wrap(&mut html, "li", b, resolver)
            }
            RichTextBlock::Image(image) => {
                html.push_str(&format!(
                    r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
                    html_escape(&image.url),
                    html_escape(image.alt.as_deref().unwrap_or(""))
                ));
            }
            RichTextBlock::Embed(embed) => html.push_str(&render_embed(&embed.oembed)),
            RichTextBlock::Unsupported => {}
        }
    }

    if let Some(open) = list {
        html.push_str(open.close());
    }

    html
}

fn wrap(html: &mut String, tag: &str, block: &TextBlock, resolver: &LinkResolver) {
    html.push('<');
    html.push_str(tag);
    html.push('>');
    html.push_str(&render_spans(&block.text, &block.spans, resolver));
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}

fn render_embed(oembed: &Value) -> String {
    let get = |key: &str| oembed.get(key).and_then(Value::as_str).unwrap_or("");
    // oEmbed markup is produced by the CMS and trusted as-is
    format!(
        r#"<div data-oembed="{}" data-oembed-type="{}" data-oembed-provider="{}">{}</div>"#,
        html_escape(get("embed_url")),
        html_escape(get("type")),
        html_escape(get("provider_name")),
        get("html")
    )
}

/// Render text with inline spans as well-nested HTML
pub fn render_spans(text: &str, spans: &[Span], resolver: &LinkResolver) -> String {
    let offsets = Utf16Offsets::new(text);

    // Byte ranges, ordered so that outer spans open first
    let mut ranges: Vec<(usize, usize, &Span)> = spans
        .iter()
        .filter(|s| s.kind != SpanKind::Other)
        .map(|s| (offsets.byte(s.start), offsets.byte(s.end), s))
        .filter(|(start, end, _)| start < end)
        .collect();
    ranges.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut boundaries: Vec<usize> = vec![0, text.len()];
    for (start, end, _) in &ranges {
        boundaries.push(*start);
        boundaries.push(*end);
    }
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut html = String::with_capacity(text.len());
    let mut open: Vec<usize> = Vec::new();

    for window in boundaries.windows(2) {
        let (from, to) = (window[0], window[1]);
        let active: Vec<usize> = ranges
            .iter()
            .enumerate()
            .filter(|(_, (start, end, _))| *start <= from && *end >= to)
            .map(|(i, _)| i)
            .collect();

        let common = open
            .iter()
            .zip(active.iter())
            .take_while(|(a, b)| a == b)
            .count();
        while open.len() > common {
            if let Some(i) = open.pop() {
                html.push_str(close_tag(ranges[i].2));
            }
        }
        for &i in &active[common..] {
            html.push_str(&open_tag(ranges[i].2, resolver));
            open.push(i);
        }

        html.push_str(&html_escape(&text[from..to]).replace('\n', "<br />"));
    }

    while let Some(i) = open.pop() {
        html.push_str(close_tag(ranges[i].2));
    }

    html
}

fn open_tag(span: &Span, resolver: &LinkResolver) -> String {
    match span.kind {
        SpanKind::Strong => "<strong>".to_string(),
        SpanKind::Em => "<em>".to_string(),
        SpanKind::Label => {
            let label = span.data.get("label").and_then(Value::as_str).unwrap_or("");
            format!(r#"<span class="{}">"#, html_escape(label))
        }
        SpanKind::Hyperlink => {
            let href = resolver.resolve_link(&span.data);
            let blank = span.data.get("target").and_then(Value::as_str) == Some("_blank");
            if blank {
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#,
                    html_escape(&href)
                )
            } else {
                format!(r#"<a href="{}">"#, html_escape(&href))
            }
        }
        SpanKind::Other => String::new(),
    }
}

fn close_tag(span: &Span) -> &'static str {
    match span.kind {
        SpanKind::Strong => "</strong>",
        SpanKind::Em => "</em>",
        SpanKind::Label => "</span>",
        SpanKind::Hyperlink => "</a>",
        SpanKind::Other => "",
    }
}

/// Maps UTF-16 offsets to byte offsets of a string
struct Utf16Offsets {
    /// (utf16 offset, byte offset) at each char start
    starts: Vec<(usize, usize)>,
    len: usize,
}

impl Utf16Offsets {
    fn new(text: &str) -> Self {
        let mut starts = Vec::with_capacity(text.len());
        let mut unit = 0;
        for (byte, c) in text.char_indices() {
            starts.push((unit, byte));
            unit += c.len_utf16();
        }
        Self {
            starts,
            len: text.len(),
        }
    }

    /// Byte offset of the char starting at or after `unit`, clamped to the text
    fn byte(&self, unit: usize) -> usize {
        match self.starts.binary_search_by(|(u, _)| u.cmp(&unit)) {
            Ok(i) => self.starts[i].1,
            Err(i) => self.starts.get(i).map(|(_, b)| *b).unwrap_or(self.len),
        }
    }
}
