#![forbid(unsafe_code)]

//! Search-match highlighting.
//!
//! [`highlight`] splits a message body into alternating plain and matched
//! segments, the shape a renderer needs to style matches inline:
//!
//! ```text
//! "The cat sat" / "at"  =>  ["The c", "at", " s", "at", ""]
//!                             plain  match plain match plain
//! ```
//!
//! Segment `i` is a match exactly when `i` is odd, so a highlighted result
//! always has `2k + 1` segments for `k` matches. Plain segments may be empty.
//! Concatenating every segment reproduces the input text.
//!
//! The query is trimmed and matched literally and case-insensitively, the
//! same way message search decides whether a message matches.

use smallvec::SmallVec;
use unicode_width::UnicodeWidthStr;

use crate::search::LiteralPattern;

/// How a segment should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Ordinary text.
    Plain,
    /// A match in a message that is not the focused result.
    Match,
    /// A match in the focused result; rendered more prominently.
    Current,
}

/// A borrowed slice of the input plus its styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub kind: SegmentKind,
}

impl<'a> Segment<'a> {
    #[must_use]
    pub const fn plain(text: &'a str) -> Self {
        Self {
            text,
            kind: SegmentKind::Plain,
        }
    }

    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.kind != SegmentKind::Plain
    }

    /// Display width in terminal cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.text.width()
    }
}

/// The segments of one highlighted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted<'a> {
    segments: SmallVec<[Segment<'a>; 5]>,
}

impl<'a> Highlighted<'a> {
    /// The unmodified text as a single plain segment.
    #[must_use]
    pub fn unmodified(text: &'a str) -> Self {
        let mut segments = SmallVec::new();
        segments.push(Segment::plain(text));
        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Never true; even empty input yields one empty plain segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of highlighted segments.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_highlighted()).count()
    }

    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.match_count() > 0
    }

    /// Total display width in terminal cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.segments.iter().map(Segment::width).sum()
    }

    /// Concatenate the segments back into the original text.
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        self.segments.iter().map(|s| s.text).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment<'a>> {
        self.segments.iter()
    }
}

impl<'h, 'a> IntoIterator for &'h Highlighted<'a> {
    type Item = &'h Segment<'a>;
    type IntoIter = std::slice::Iter<'h, Segment<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// A query compiled once for highlighting many texts.
#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Option<LiteralPattern>,
}

impl Highlighter {
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self {
            pattern: LiteralPattern::new(query),
        }
    }

    /// Whether the query is non-blank.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    /// Split `text` into plain and matched segments.
    ///
    /// Matches are tagged [`SegmentKind::Current`] when `is_current` is set and
    /// [`SegmentKind::Match`] otherwise.
    #[must_use]
    pub fn highlight<'a>(&self, text: &'a str, is_current: bool) -> Highlighted<'a> {
        let Some(pattern) = &self.pattern else {
            return Highlighted::unmodified(text);
        };
        if text.is_empty() {
            return Highlighted::unmodified(text);
        }
        let matches = pattern.find(text);
        if matches.is_empty() {
            return Highlighted::unmodified(text);
        }

        let kind = if is_current {
            SegmentKind::Current
        } else {
            SegmentKind::Match
        };
        let mut segments = SmallVec::with_capacity(matches.len() * 2 + 1);
        let mut cursor = 0;
        for m in matches {
            segments.push(Segment::plain(&text[cursor..m.range.start]));
            segments.push(Segment {
                text: &text[m.range.clone()],
                kind,
            });
            cursor = m.range.end;
        }
        segments.push(Segment::plain(&text[cursor..]));
        Highlighted { segments }
    }
}

/// Highlight every occurrence of `query` in `text`.
///
/// A blank query or empty text yields the text unmodified.
#[must_use]
pub fn highlight<'a>(text: &'a str, query: &str, is_current: bool) -> Highlighted<'a> {
    Highlighter::new(query).highlight(text, is_current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(h: &Highlighted<'a>) -> Vec<&'a str> {
        h.iter().map(|s| s.text).collect()
    }

    #[test]
    fn alternating_segments() {
        let h = highlight("The cat sat", "at", false);
        assert_eq!(texts(&h), vec!["The c", "at", " s", "at", ""]);
        let kinds: Vec<SegmentKind> = h.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Plain,
                SegmentKind::Match,
                SegmentKind::Plain,
                SegmentKind::Match,
                SegmentKind::Plain,
            ]
        );
        assert_eq!(h.match_count(), 2);
    }

    #[test]
    fn current_result_uses_current_kind() {
        let h = highlight("The cat sat", "AT", true);
        assert!(h.iter().filter(|s| s.is_highlighted()).all(|s| s.kind == SegmentKind::Current));
        // Matched text keeps the original casing.
        assert_eq!(h.segments()[1].text, "at");
    }

    #[test]
    fn metacharacters_match_literally() {
        let h = highlight("x a.b*c y", "a.b*c", false);
        assert_eq!(texts(&h), vec!["x ", "a.b*c", " y"]);
        let none = highlight("aXbbbc", "a.b*c", false);
        assert_eq!(none.len(), 1);
        assert!(!none.is_highlighted());
    }

    #[test]
    fn blank_query_or_empty_text_is_unmodified() {
        assert_eq!(texts(&highlight("hello", "", false)), vec!["hello"]);
        assert_eq!(texts(&highlight("hello", "   ", true)), vec!["hello"]);
        assert_eq!(texts(&highlight("", "x", false)), vec![""]);
        assert!(!Highlighter::new(" ").is_active());
    }

    #[test]
    fn query_is_trimmed() {
        let h = highlight("meeting notes", " notes ", false);
        assert_eq!(texts(&h), vec!["meeting ", "notes", ""]);
    }

    #[test]
    fn trailing_space_in_query_still_highlights() {
        // "cat " against "the cat." matches on the trimmed query.
        let h = highlight("the cat.", "cat ", false);
        assert_eq!(texts(&h), vec!["the ", "cat", "."]);
        assert_eq!(h.match_count(), 1);
        assert!(crate::search::LiteralPattern::new("cat ").is_some_and(|p| p.is_match("the cat.")));
    }

    #[test]
    fn whole_text_match() {
        let h = highlight("IEP", "iep", false);
        assert_eq!(texts(&h), vec!["", "IEP", ""]);
    }

    #[test]
    fn width_counts_wide_characters() {
        let h = highlight("你好 world", "world", false);
        assert_eq!(h.width(), 4 + 1 + 5);
    }

    #[test]
    fn highlighter_reuses_pattern() {
        let hl = Highlighter::new("iep");
        assert_eq!(hl.highlight("IEP goals", false).match_count(), 1);
        assert_eq!(hl.highlight("no match", false).match_count(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn segments_reassemble_input(text in "\\PC{0,60}", query in "\\PC{0,4}") {
                let h = highlight(&text, &query, false);
                prop_assert_eq!(h.to_plain_string(), text.clone());
            }

            #[test]
            fn matches_sit_at_odd_positions(text in "[a-c ]{0,40}", query in "[a-c]{1,2}") {
                let h = highlight(&text, &query, true);
                prop_assert_eq!(h.len() % 2, 1);
                for (i, seg) in h.iter().enumerate() {
                    prop_assert_eq!(seg.is_highlighted(), i % 2 == 1);
                    if seg.is_highlighted() {
                        prop_assert!(seg.text.eq_ignore_ascii_case(&query));
                    }
                }
            }
        }
    }
}
