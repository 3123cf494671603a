#![forbid(unsafe_code)]

//! Incremental search over a conversation.
//!
//! [`MessageSearch`] borrows the caller's messages and keeps the derived
//! state: the positions of matching messages and a cursor into them. A
//! message matches when its content is non-empty and contains the trimmed
//! query, ignoring case. Matching is plain substring containment.
//!
//! State is recomputed wholesale whenever the query or the message slice
//! changes; nothing is patched incrementally. Recomputing with the same
//! inputs yields the same matches.
//!
//! # Cursor rules
//!
//! | Event | Cursor |
//! |-------|--------|
//! | query changes | reset to 0 |
//! | messages change | clamped to the last match |
//! | `next` | `(cursor + 1) % total` |
//! | `previous` | `cursor - 1`, wrapping to `total - 1` |
//! | `clear` | query emptied, cursor 0 |
//!
//! Navigation is a no-op while there are no matches.

use std::fmt;

use hero_core::Searchable;
use hero_text::{Highlighted, Highlighter, LiteralPattern, normalize_query};

/// A matching message and its position in the full message slice.
#[derive(Debug)]
pub struct MessageMatch<'a, M> {
    pub message: &'a M,
    /// Index into the unfiltered messages (use it to scroll the list).
    pub index: usize,
}

impl<M> Clone for MessageMatch<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for MessageMatch<'_, M> {}

impl<M> PartialEq for MessageMatch<'_, M> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && std::ptr::eq(self.message, other.message)
    }
}

/// Snapshot of the search for status displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInfo {
    /// Trimmed query.
    pub query: String,
    /// 1-based position of the focused match, if any.
    pub current: Option<usize>,
    pub total: usize,
    pub active: bool,
}

impl fmt::Display for SearchInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.active, self.current) {
            (false, _) => f.write_str("no search"),
            (true, Some(current)) => write!(f, "{current} of {}", self.total),
            (true, None) => f.write_str("No results"),
        }
    }
}

/// Search state over a borrowed message slice.
#[derive(Debug)]
pub struct MessageSearch<'a, M> {
    messages: &'a [M],
    query: String,
    pattern: Option<LiteralPattern>,
    highlighter: Highlighter,
    matches: Vec<usize>,
    cursor: usize,
}

impl<'a, M: Searchable> MessageSearch<'a, M> {
    /// A search with an empty query.
    #[must_use]
    pub fn new(messages: &'a [M]) -> Self {
        Self {
            messages,
            query: String::new(),
            pattern: None,
            highlighter: Highlighter::new(""),
            matches: Vec::new(),
            cursor: 0,
        }
    }

    /// Start with `query` already applied.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.set_query(query);
        self
    }

    #[must_use]
    pub fn messages(&self) -> &'a [M] {
        self.messages
    }

    /// Swap in a new message slice. Matches are recomputed and the cursor is
    /// clamped so it still points at a match.
    pub fn set_messages(&mut self, messages: &'a [M]) {
        self.messages = messages;
        self.recompute();
        self.cursor = match self.matches.len() {
            0 => 0,
            n => self.cursor.min(n - 1),
        };
    }

    /// Apply a new query. Returns `false` (and keeps the cursor) when the
    /// query is unchanged.
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if query == self.query {
            return false;
        }
        self.query = query;
        self.pattern = LiteralPattern::new(&self.query);
        self.highlighter = Highlighter::new(&self.query);
        self.cursor = 0;
        self.recompute();
        true
    }

    /// The raw query as last set.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    fn recompute(&mut self) {
        let _span = tracing::debug_span!("message_search", messages = self.messages.len()).entered();
        self.matches.clear();
        let Some(pattern) = &self.pattern else {
            return;
        };
        self.matches.extend(
            self.messages
                .iter()
                .enumerate()
                .filter(|(_, m)| m.content().is_some_and(|c| !c.is_empty() && pattern.is_match(c)))
                .map(|(i, _)| i),
        );
        tracing::debug!(matches = self.matches.len(), "search recomputed");
    }

    /// Matching messages in conversation order.
    pub fn matches(&self) -> impl ExactSizeIterator<Item = MessageMatch<'a, M>> + '_ {
        let messages = self.messages;
        self.matches.iter().map(move |&index| MessageMatch {
            message: &messages[index],
            index,
        })
    }

    /// Positions of the matching messages.
    #[must_use]
    pub fn match_indices(&self) -> &[usize] {
        &self.matches
    }

    /// The matches, or every message when there is no active search.
    #[must_use]
    pub fn filtered(&self) -> Vec<&'a M> {
        if self.has_active_search() {
            self.matches().map(|m| m.message).collect()
        } else {
            self.messages.iter().collect()
        }
    }

    /// The focused match.
    #[must_use]
    pub fn current(&self) -> Option<MessageMatch<'a, M>> {
        let index = *self.matches.get(self.cursor)?;
        Some(MessageMatch {
            message: &self.messages[index],
            index,
        })
    }

    /// Cursor position within the matches (0-based).
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.cursor
    }

    /// Number of matches.
    #[must_use]
    pub fn total(&self) -> usize {
        self.matches.len()
    }

    pub fn next(&mut self) {
        let n = self.matches.len();
        if n == 0 {
            return;
        }
        self.cursor = (self.cursor + 1) % n;
    }

    pub fn previous(&mut self) {
        let n = self.matches.len();
        if n == 0 {
            return;
        }
        self.cursor = if self.cursor == 0 { n - 1 } else { self.cursor - 1 };
    }

    /// Empty the query and reset the cursor.
    pub fn clear(&mut self) {
        self.set_query(String::new());
        self.cursor = 0;
    }

    /// Whether `id` is the focused match.
    #[must_use]
    pub fn is_current_result(&self, id: &M::Id) -> bool {
        self.current().is_some_and(|m| m.message.id() == *id)
    }

    /// Whether `id` is among the matches.
    #[must_use]
    pub fn has_search_match(&self, id: &M::Id) -> bool {
        self.has_active_search()
            && self
                .matches
                .iter()
                .any(|&index| self.messages[index].id() == *id)
    }

    /// Whether the trimmed query is non-empty.
    #[must_use]
    pub fn has_active_search(&self) -> bool {
        !normalize_query(&self.query).is_empty()
    }

    #[must_use]
    pub fn has_results(&self) -> bool {
        !self.matches.is_empty()
    }

    #[must_use]
    pub fn search_info(&self) -> SearchInfo {
        SearchInfo {
            query: normalize_query(&self.query).to_string(),
            current: self.current().map(|_| self.cursor + 1),
            total: self.matches.len(),
            active: self.has_active_search(),
        }
    }

    /// Highlight the query in `message`, marking matches as current when
    /// `message` is the focused result.
    #[must_use]
    pub fn highlight<'m>(&self, message: &'m M) -> Highlighted<'m> {
        let text = message.content().unwrap_or_default();
        let is_current = self.is_current_result(&message.id());
        self.highlighter.highlight(text, is_current)
    }
}
