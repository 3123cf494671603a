#![forbid(unsafe_code)]

//! Visibility observation for sentinel rows.
//!
//! A [`VisibilityObserver`] tracks whether one element (the near-end
//! sentinel of a windowed list) intersects the viewport. The owner of the
//! geometry reports the current state with [`update`](VisibilityObserver::update);
//! subscribers hear about transitions only.
//!
//! Subscriptions are RAII guards. The observer keeps only weak references
//! to callbacks, so dropping the [`Subscription`] is the whole unsubscribe
//! story; dead entries are pruned the next time the observer notifies.
//!
//! Single-threaded (`Rc`), like the UI loop that drives it.
//!
//! # Re-entrancy
//!
//! Callbacks run after the internal borrow is released, so a subscriber may
//! call `update` again. The nested update notifies before the outer one
//! returns, and the last reported state wins.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback = Rc<dyn Fn(bool)>;
type WeakCallback = Weak<dyn Fn(bool)>;

struct State {
    visible: bool,
    version: u64,
    subscribers: Vec<WeakCallback>,
}

/// Shared visibility flag with transition notification.
///
/// Clones share state.
#[derive(Clone)]
pub struct VisibilityObserver {
    state: Rc<RefCell<State>>,
}

impl Default for VisibilityObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VisibilityObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("VisibilityObserver")
            .field("visible", &state.visible)
            .field("version", &state.version)
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}

impl VisibilityObserver {
    /// A new observer; the element starts out not visible.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                visible: false,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Register `callback` for visibility transitions.
    ///
    /// The callback receives the new visibility. It stays registered until
    /// the returned guard is dropped.
    pub fn subscribe(&self, callback: impl Fn(bool) + 'static) -> Subscription {
        let callback: Callback = Rc::new(callback);
        self.state
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&callback));
        Subscription { _callback: callback }
    }

    /// Report the current visibility. Returns `true` if it changed.
    pub fn update(&self, visible: bool) -> bool {
        let live: Vec<Callback> = {
            let mut state = self.state.borrow_mut();
            if state.visible == visible {
                return false;
            }
            state.visible = visible;
            state.version += 1;
            state.subscribers.retain(|w| w.strong_count() > 0);
            state.subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        tracing::trace!(visible, subscribers = live.len(), "visibility changed");
        for callback in live {
            callback(visible);
        }
        true
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    /// Number of transitions so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.borrow().version
    }

    /// Registered callbacks, including dropped ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().subscribers.len()
    }
}

/// Keeps a visibility callback alive. Drop to unsubscribe.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    _callback: Callback,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
