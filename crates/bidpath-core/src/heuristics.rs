//! Text preparation and keyword detection for solicitation input.

use crate::contracts::ParsedSolicitation;

/// Set-aside and certification programs recognised in solicitation text.
pub const SET_ASIDE_KEYWORDS: &[&str] = &[
    "8(a)",
    "EDWOSB",
    "HUBZone",
    "SDVOSB",
    "Small Business",
    "VOSB",
    "WOSB",
];

/// Normalize line endings and collapse runs of blanks.
///
/// CRLF and lone CR become LF, runs of spaces/tabs become one space, and
/// three or more consecutive newlines become two. The result is trimmed.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0usize;
    let mut in_blank = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let c = if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            '\n'
        } else {
            c
        };
        match c {
            '\n' => {
                in_blank = false;
                newlines += 1;
                if newlines <= 2 {
                    out.push('\n');
                }
            }
            ' ' | '\t' => {
                newlines = 0;
                if !in_blank {
                    out.push(' ');
                    in_blank = true;
                }
            }
            other => {
                newlines = 0;
                in_blank = false;
                out.push(other);
            }
        }
    }
    out.trim().to_string()
}

/// Truncate to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Keywords from [`SET_ASIDE_KEYWORDS`] that appear (case-insensitively)
/// in `text`. A keyword contained in a longer matched keyword on the same
/// occurrence is not reported separately ("WOSB" inside "EDWOSB").
pub fn detect_set_asides(text: &str) -> Vec<&'static str> {
    let upper = text.to_uppercase();
    let mut found: Vec<&'static str> = Vec::new();
    for &keyword in SET_ASIDE_KEYWORDS {
        let needle = keyword.to_uppercase();
        let standalone = upper.match_indices(&needle).any(|(idx, _)| {
            !SET_ASIDE_KEYWORDS.iter().any(|&longer| {
                longer.len() > keyword.len() && covers(&upper, idx, &needle, &longer.to_uppercase())
            })
        });
        if standalone {
            found.push(keyword);
        }
    }
    found
}

/// Whether the occurrence of `needle` at `idx` lies inside an occurrence of `longer`.
fn covers(haystack: &str, idx: usize, needle: &str, longer: &str) -> bool {
    let Some(offset) = longer.find(needle) else {
        return false;
    };
    idx.checked_sub(offset)
        .and_then(|start| haystack.get(start..start + longer.len()))
        .is_some_and(|window| window == longer)
}

/// Set-aside keywords across the parsed metadata, scope, and requirement text.
pub fn solicitation_set_asides(parsed: &ParsedSolicitation) -> Vec<&'static str> {
    let mut corpus = String::new();
    if let Some(set_aside) = &parsed.metadata.set_aside {
        corpus.push_str(set_aside);
        corpus.push('\n');
    }
    corpus.push_str(&parsed.scope_summary);
    for req in &parsed.requirements {
        corpus.push('\n');
        corpus.push_str(&req.text);
    }
    detect_set_asides(&corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{Priority, Requirement, SolicitationMetadata};

    #[test]
    fn whitespace_is_normalized() {
        let raw = "SECTION C\r\n\r\n\r\n\r\nThe  contractor\t\tshall\rprovide  ";
        assert_eq!(
            normalize_whitespace(raw),
            "SECTION C\n\nThe contractor shall\nprovide"
        );
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn detects_set_asides_case_insensitively() {
        let found = detect_set_asides("This is a total small business set-aside under 8(a).");
        assert_eq!(found, vec!["8(a)", "Small Business"]);
    }

    #[test]
    fn nested_keywords_are_not_double_counted() {
        assert_eq!(detect_set_asides("EDWOSB program"), vec!["EDWOSB"]);
        assert_eq!(detect_set_asides("SDVOSB only"), vec!["SDVOSB"]);
        assert_eq!(detect_set_asides("WOSB and EDWOSB"), vec!["EDWOSB", "WOSB"]);
        assert!(detect_set_asides("full and open competition").is_empty());
    }

    #[test]
    fn parsed_solicitation_corpus() {
        let parsed = ParsedSolicitation {
            metadata: SolicitationMetadata {
                set_aside: Some("HUBZone".into()),
                ..Default::default()
            },
            requirements: vec![Requirement {
                id: "R1".into(),
                text: "Offeror must be a certified SDVOSB.".into(),
                priority: Priority::Must,
                suggested_sections: vec![],
            }],
            ..Default::default()
        };
        assert_eq!(solicitation_set_asides(&parsed), vec!["HUBZone", "SDVOSB"]);
    }
}
