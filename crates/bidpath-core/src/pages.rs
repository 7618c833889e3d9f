//! Deterministic page-count estimate for proposal text.
//!
//! Independent of the generation backend so the number stays reproducible
//! for identical input.

use crate::contracts::DraftSection;

/// Words per page assumed by [`estimate_pages`].
pub const DEFAULT_WORDS_PER_PAGE: usize = 450;

/// Estimate pages at [`DEFAULT_WORDS_PER_PAGE`].
pub fn estimate_pages(text: &str) -> u32 {
    estimate_pages_with(text, DEFAULT_WORDS_PER_PAGE)
}

/// Count whitespace-separated words and divide by `words_per_page`,
/// rounding up. Never returns less than 1, including for empty text.
///
/// A `words_per_page` of 0 is treated as 1.
pub fn estimate_pages_with(text: &str, words_per_page: usize) -> u32 {
    let words = text.split_whitespace().count();
    let pages = words.div_ceil(words_per_page.max(1)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Section contents in list order, newline-joined.
pub fn joined_content(sections: &[DraftSection]) -> String {
    sections
        .iter()
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn section(id: &str, content: String) -> DraftSection {
        DraftSection {
            id: id.into(),
            title: id.into(),
            content,
            requirements_covered_ids: vec![],
        }
    }

    #[test]
    fn empty_and_single_word() {
        assert_eq!(estimate_pages(""), 1);
        assert_eq!(estimate_pages("   \n\t "), 1);
        assert_eq!(estimate_pages("word"), 1);
    }

    #[test]
    fn page_boundaries() {
        assert_eq!(estimate_pages(&words(450)), 1);
        assert_eq!(estimate_pages(&words(451)), 2);
    }

    #[test]
    fn boundaries_hold_for_many_pages() {
        for k in 0..25 {
            assert_eq!(estimate_pages(&words(k * 450 + 1)), k as u32 + 1, "k={k}");
            if k >= 1 {
                assert_eq!(estimate_pages(&words(k * 450)), k as u32, "k={k}");
            }
        }
    }

    #[test]
    fn whitespace_runs_are_single_separators() {
        let text = "alpha \n\n  beta\t\tgamma   ";
        assert_eq!(estimate_pages_with(text, 3), 1);
        assert_eq!(estimate_pages_with(text, 2), 2);
    }

    #[test]
    fn custom_words_per_page() {
        assert_eq!(estimate_pages_with(&words(250), 250), 1);
        assert_eq!(estimate_pages_with(&words(251), 250), 2);
        assert_eq!(estimate_pages_with(&words(5), 0), 5);
    }

    #[test]
    fn repeated_calls_agree() {
        let text = words(1234);
        assert_eq!(estimate_pages(&text), estimate_pages(&text));
    }

    #[test]
    fn two_sections_of_900_words_make_two_pages() {
        let sections = vec![section("s1", words(400)), section("s2", words(500))];
        let joined = joined_content(&sections);
        assert_eq!(joined.split_whitespace().count(), 900);
        assert_eq!(estimate_pages(&joined), 2);
    }

    #[test]
    fn joined_content_keeps_list_order() {
        let sections = vec![section("a", "first".into()), section("b", "second".into())];
        assert_eq!(joined_content(&sections), "first\nsecond");
        assert_eq!(joined_content(&[]), "");
    }
}
