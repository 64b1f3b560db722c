//! Reading time estimation

use super::ContentSection;

/// Assumed reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// Whitespace-delimited words across every heading and body block
pub fn count_words(sections: &[ContentSection]) -> usize {
    sections
        .iter()
        .map(|section| {
            let body: usize = section
                .body
                .iter()
                .map(|block| block.text().split_whitespace().count())
                .sum();
            section.heading.split_whitespace().count() + body
        })
        .sum()
}

/// Estimated minutes to read, rounded up
pub fn reading_time(sections: &[ContentSection]) -> usize {
    count_words(sections).div_ceil(WORDS_PER_MINUTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{RichTextBlock, TextBlock};

    fn section(heading: &str, paragraphs: &[String]) -> ContentSection {
        ContentSection {
            heading: heading.to_string(),
            body: paragraphs
                .iter()
                .map(|p| RichTextBlock::Paragraph(TextBlock::plain(p)))
                .collect(),
        }
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_no_sections() {
        assert_eq!(count_words(&[]), 0);
        assert_eq!(reading_time(&[]), 0);
    }

    #[test]
    fn test_exactly_one_minute() {
        let sections = vec![section("", &[words(200)])];
        assert_eq!(count_words(&sections), 200);
        assert_eq!(reading_time(&sections), 1);
    }

    #[test]
    fn test_one_word_over_rounds_up() {
        let sections = vec![section("", &[words(120)]), section("", &[words(81)])];
        assert_eq!(count_words(&sections), 201);
        assert_eq!(reading_time(&sections), 2);
    }

    #[test]
    fn test_headings_count() {
        let sections = vec![section("Two words", &[words(198)])];
        assert_eq!(count_words(&sections), 200);
        assert_eq!(reading_time(&sections), 1);

        let sections = vec![section("Three words here", &[words(198)])];
        assert_eq!(reading_time(&sections), 2);
    }

    #[test]
    fn test_whitespace_runs_do_not_add_words() {
        let sections = vec![section("  spaced   heading ", &["a\n\nb\tc  ".to_string()])];
        assert_eq!(count_words(&sections), 5);
    }
}
