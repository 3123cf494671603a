#![forbid(unsafe_code)]

//! Identity and searchable-content contracts.
//!
//! The windowed renderer is generic over any [`Identified`] item; the message
//! search is generic over any [`Searchable`] record. Neither holds ownership:
//! both borrow the caller's sequence for the duration of one recomputation.
//!
//! Id stability is a caller contract. The renderer uses ids as render keys
//! and the search uses them for `is_current_result` / `has_search_match`, so
//! an id that changes between recomputations produces flicker or stale
//! highlight state, never a panic.

use std::fmt::Debug;
use std::hash::Hash;

/// An item with a stable, unique identifier.
pub trait Identified {
    /// Identifier type (string ids from the backend, integers in tests).
    type Id: Eq + Hash + Clone + Debug;

    /// The item's identifier.
    fn id(&self) -> Self::Id;
}

/// A record with optional textual content that can be searched.
pub trait Searchable: Identified {
    /// The searchable text. `None` or an empty string excludes the record
    /// from matching.
    fn content(&self) -> Option<&str>;
}

impl<T: Identified + ?Sized> Identified for &T {
    type Id = T::Id;

    fn id(&self) -> Self::Id {
        (**self).id()
    }
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn content(&self) -> Option<&str> {
        (**self).content()
    }
}

impl<I: Eq + Hash + Clone + Debug> Identified for (I, String) {
    type Id = I;

    fn id(&self) -> I {
        self.0.clone()
    }
}

impl<I: Eq + Hash + Clone + Debug> Searchable for (I, String) {
    fn content(&self) -> Option<&str> {
        Some(self.1.as_str())
    }
}
