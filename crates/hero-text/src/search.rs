#![forbid(unsafe_code)]

//! Case-insensitive literal search.
//!
//! Queries are always treated as literal text: regex metacharacters typed by
//! the user match themselves. Matching ([`contains_case_insensitive`],
//! [`LiteralPattern::is_match`]) uses full Unicode lowercasing. Range lookup
//! ([`find_case_insensitive`], [`LiteralPattern::find`]) uses an ASCII fast
//! path when the needle is ASCII and a compiled case-insensitive regex
//! otherwise.
//!
//! All ranges are byte offsets into the haystack and always fall on `char`
//! boundaries.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

/// A single match location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Byte range of the match in the haystack.
    pub range: Range<usize>,
}

impl SearchResult {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { range: start..end }
    }

    /// The matched slice of `haystack`.
    #[must_use]
    pub fn text<'a>(&self, haystack: &'a str) -> &'a str {
        &haystack[self.range.clone()]
    }
}

/// Strip surrounding whitespace from a user query.
///
/// An empty result means "no active search".
#[must_use]
pub fn normalize_query(query: &str) -> &str {
    query.trim()
}

/// Escape every regex metacharacter in `query` so it matches literally.
#[must_use]
pub fn escape_pattern(query: &str) -> String {
    regex::escape(query)
}

/// Whether `haystack` contains `needle`, ignoring case.
///
/// An empty needle is contained in every haystack.
#[must_use]
pub fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.is_ascii() && needle.is_ascii() {
        return ascii_windows_match(haystack.as_bytes(), needle.as_bytes());
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn ascii_windows_match(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}

/// Non-overlapping ASCII case-insensitive matches, left to right.
///
/// Only ASCII letters are folded. Because ASCII bytes never occur inside a
/// multi-byte UTF-8 sequence, results are valid `char` boundaries even when
/// the haystack contains non-ASCII text.
#[must_use]
pub fn search_ascii_case_insensitive(haystack: &str, needle: &str) -> Vec<SearchResult> {
    let needle = needle.as_bytes();
    let bytes = haystack.as_bytes();
    let mut results = Vec::new();
    if needle.is_empty() || needle.len() > bytes.len() {
        return results;
    }
    let mut i = 0;
    while i + needle.len() <= bytes.len() {
        if bytes[i..i + needle.len()].eq_ignore_ascii_case(needle) {
            results.push(SearchResult::new(i, i + needle.len()));
            i += needle.len();
        } else {
            i += 1;
        }
    }
    results
}

/// Non-overlapping case-insensitive matches of the literal `needle`.
///
/// Returns no results for an empty needle.
#[must_use]
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Vec<SearchResult> {
    match LiteralPattern::new(needle) {
        Some(pattern) => pattern.find(haystack),
        None => Vec::new(),
    }
}

/// A normalized query compiled once and reused across many haystacks.
#[derive(Debug, Clone)]
pub struct LiteralPattern {
    query: String,
    lowered: String,
    regex: Option<Regex>,
}

impl LiteralPattern {
    /// Compile `query`. Returns `None` if the query is blank.
    ///
    /// ASCII queries never need a regex. For other queries a regex that fails
    /// to build is logged and the pattern still matches, but
    /// [`find`](Self::find) returns no ranges.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let query = normalize_query(query);
        if query.is_empty() {
            return None;
        }
        let regex = if query.is_ascii() {
            None
        } else {
            match RegexBuilder::new(&escape_pattern(query))
                .case_insensitive(true)
                .build()
            {
                Ok(regex) => Some(regex),
                Err(err) => {
                    tracing::warn!(%err, query_len = query.len(), "search pattern failed to compile");
                    None
                }
            }
        };
        tracing::debug!(ascii = query.is_ascii(), regex = regex.is_some(), "search pattern ready");
        Some(Self {
            query: query.to_string(),
            lowered: query.to_lowercase(),
            regex,
        })
    }

    /// The normalized query text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether `haystack` contains the query, ignoring case.
    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        if haystack.is_ascii() && self.query.is_ascii() {
            return ascii_windows_match(haystack.as_bytes(), self.query.as_bytes());
        }
        haystack.to_lowercase().contains(&self.lowered)
    }

    /// All non-overlapping match ranges in `haystack`.
    #[must_use]
    pub fn find(&self, haystack: &str) -> Vec<SearchResult> {
        if self.query.is_ascii() {
            return search_ascii_case_insensitive(haystack, &self.query);
        }
        match &self.regex {
            Some(regex) => regex
                .find_iter(haystack)
                .map(|m| SearchResult::new(m.start(), m.end()))
                .collect(),
            None => Vec::new(),
        }
    }
}
