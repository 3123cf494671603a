#![forbid(unsafe_code)]

//! Runtime pieces shared by the list and search widgets.
//!
//! # Role in My IEP Hero
//! `hero-runtime` holds the stateful glue that sits between user input and
//! the pure recomputations in `hero-widgets`: a clock-driven [`Debouncer`]
//! for query input, a [`VisibilityObserver`] for list sentinels, and the
//! [`AppContext`] composition root that owns configuration, session, and plan.
//!
//! Everything here is single-threaded and synchronous. Time is always passed
//! in explicitly.

pub mod context;
pub mod debounce;
pub mod visibility;

pub use context::{AppContext, ContextError};
pub use debounce::{Debouncer, PendingToken};
pub use visibility::{Subscription, VisibilityObserver};
