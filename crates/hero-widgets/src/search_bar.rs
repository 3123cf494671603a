#![forbid(unsafe_code)]

//! Search bar controller: raw input, debounced query, key bindings.
//!
//! Keystrokes update the input text immediately but reach the
//! [`MessageSearch`] only after the input has been quiet for the configured
//! debounce (300 ms by default). The owner drives time by calling
//! [`SearchBar::tick`] from its event loop.
//!
//! | Key | Action |
//! |-----|--------|
//! | Enter | next result |
//! | Shift+Enter | previous result |
//! | Escape | clear input and query, drop any pending update |

use std::fmt;
use std::time::{Duration, Instant};

use hero_core::{Searchable, ViewConfig};
use hero_runtime::Debouncer;

use crate::message_search::MessageSearch;

/// Keys the search bar reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKey {
    Enter { shift: bool },
    Escape,
}

/// Result counter shown next to the input while a search is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    NoResults,
    /// 1-based position of the focused result.
    Position { current: usize, total: usize },
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResults => f.write_str("No results"),
            Self::Position { current, total } => write!(f, "{current} of {total}"),
        }
    }
}

/// Input state for one conversation's search box.
#[derive(Debug)]
pub struct SearchBar<'a, M> {
    input: String,
    debouncer: Debouncer<String>,
    search: MessageSearch<'a, M>,
}

impl<'a, M: Searchable> SearchBar<'a, M> {
    #[must_use]
    pub fn new(messages: &'a [M], debounce: Duration) -> Self {
        Self {
            input: String::new(),
            debouncer: Debouncer::new(debounce),
            search: MessageSearch::new(messages),
        }
    }

    /// A search bar using the configured debounce.
    #[must_use]
    pub fn from_config(messages: &'a [M], config: &ViewConfig) -> Self {
        Self::new(messages, config.search_debounce)
    }

    /// Current input text (may be ahead of the applied query).
    #[must_use]
    pub fn input_text(&self) -> &str {
        &self.input
    }

    /// Replace the input text and schedule a query update.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.input = text.into();
        self.debouncer.schedule(self.input.clone(), now);
    }

    /// Apply the pending query if the debounce elapsed. Returns `true` when
    /// the search query changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(query) => self.search.set_query(query),
            None => false,
        }
    }

    /// Time until the next `tick` would apply a pending query.
    #[must_use]
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_ready(now)
    }

    /// Whether typed input has not reached the search yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// React to a key.
    ///
    /// Enter first applies a pending query whose debounce already elapsed;
    /// in that case the focus stays on the first new result instead of
    /// advancing.
    pub fn handle_key(&mut self, key: SearchKey, now: Instant) {
        tracing::trace!(?key, pending = self.debouncer.is_pending(), "search key");
        match key {
            SearchKey::Enter { shift } => {
                if self.tick(now) {
                    return;
                }
                if shift {
                    self.search.previous();
                } else {
                    self.search.next();
                }
            }
            SearchKey::Escape => self.clear(),
        }
    }

    /// Empty the input and the query.
    pub fn clear(&mut self) {
        self.input.clear();
        self.debouncer.cancel();
        self.search.clear();
    }

    /// The counter to display, or `None` without an active search.
    #[must_use]
    pub fn badge(&self) -> Option<Badge> {
        if !self.search.has_active_search() {
            return None;
        }
        if !self.search.has_results() {
            return Some(Badge::NoResults);
        }
        Some(Badge::Position {
            current: self.search.current_index() + 1,
            total: self.search.total(),
        })
    }

    /// Forward a new message slice to the search.
    pub fn set_messages(&mut self, messages: &'a [M]) {
        self.search.set_messages(messages);
    }

    #[must_use]
    pub fn search(&self) -> &MessageSearch<'a, M> {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut MessageSearch<'a, M> {
        &mut self.search
    }
}
