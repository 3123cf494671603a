#![forbid(unsafe_code)]

//! Conversation widgets: windowed message list and incremental search.
//!
//! # Role in My IEP Hero
//! `hero-widgets` is the top layer. [`WindowedList`] renders only the rows a
//! viewport can show and reports when the reader nears the end of the loaded
//! history. [`MessageSearch`] tracks matches and a result cursor over the
//! same messages, and [`SearchBar`] feeds it debounced keyboard input.
//!
//! The widgets borrow the caller's message slice; none of them owns or
//! mutates conversation data.

pub mod message_search;
pub mod search_bar;
pub mod virtualized;

pub use message_search::{MessageMatch, MessageSearch, SearchInfo};
pub use search_bar::{Badge, SearchBar, SearchKey};
pub use virtualized::{
    EndReachedSentinel, ListGeometry, RenderedRow, RenderedWindow, ScrollAlign, ScrollState,
    VisibleWindow, WindowedList,
};
