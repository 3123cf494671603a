#![forbid(unsafe_code)]

//! Text primitives for message search.
//!
//! # Role in My IEP Hero
//! `hero-text` owns the string-level pieces of search: query normalization,
//! literal case-insensitive matching, match ranges, and the segment model
//! renderers use to style matches inline. It knows nothing about messages or
//! navigation; `hero-widgets` layers the search state on top.

pub mod highlight;
pub mod search;

pub use highlight::{Highlighted, Highlighter, Segment, SegmentKind, highlight};
pub use search::{
    LiteralPattern, SearchResult, contains_case_insensitive, escape_pattern,
    find_case_insensitive, normalize_query,
};
