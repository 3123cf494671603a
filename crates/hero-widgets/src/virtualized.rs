#![forbid(unsafe_code)]

//! Windowed rendering for long, fixed-height lists.
//!
//! Only the rows intersecting the viewport (plus an overscan margin on each
//! side) are rendered; a full-height spacer keeps the scrollbar honest. For a
//! scroll offset `s`, row height `h`, viewport height `c`, overscan `o`, and
//! `n` rows:
//!
//! ```text
//! start  = max(0, floor(s / h) - o)
//! end    = min(n - 1, floor((s + c) / h) + o)      (inclusive)
//! offset = start * h
//! ```
//!
//! # Core Types
//!
//! - [`ListGeometry`] - row count and heights; all the window math
//! - [`VisibleWindow`] - the inclusive row range to render and its offset
//! - [`WindowedList`] - borrows the caller's rows and renders the window
//! - [`EndReachedSentinel`] - near-end notification for pagination
//! - [`ScrollState`] - scroll offset with follow mode and jump-to-row
//!
//! # Invariants
//!
//! 1. For `n > 0`: `0 <= start <= end <= n - 1` and `offset == start * h`.
//! 2. Scroll offsets are clamped to `[0, max(0, n * h - c)]` before use, so
//!    elastic overscroll and stale offsets past the end are harmless.
//! 3. An empty list has no window, zero total height, and its sentinel never
//!    becomes visible.
//!
//! Heights must be positive. [`ViewConfig::validate`](hero_core::ViewConfig::validate)
//! enforces that for configuration loaded at startup; the math itself does
//! not check and degrades to a single-row window instead of panicking.

use std::cell::Cell;
use std::ops::Range;
use std::rc::Rc;

use hero_core::{Identified, ViewConfig};
use hero_runtime::{Subscription, VisibilityObserver};

/// Height of the near-end sentinel element, in pixels.
pub const SENTINEL_HEIGHT: f64 = 1.0;

/// Distance from the bottom that still counts as "at the bottom".
const BOTTOM_TOLERANCE: f64 = 1.0;

/// The rows to render for one scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleWindow {
    /// First rendered row.
    pub start: usize,
    /// Last rendered row (inclusive).
    pub end: usize,
    /// Pixel offset of `start` from the top of the list.
    pub offset: f64,
}

impl VisibleWindow {
    /// Number of rendered rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false; a window holds at least one row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Half-open range of rendered rows, for slicing.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end + 1
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }
}

/// Row count and pixel dimensions of a list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListGeometry {
    pub count: usize,
    pub item_height: f64,
    pub container_height: f64,
}

impl ListGeometry {
    #[must_use]
    pub fn new(count: usize, item_height: f64, container_height: f64) -> Self {
        Self {
            count,
            item_height,
            container_height,
        }
    }

    /// Height of the full spacer.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.count as f64 * self.item_height
    }

    /// Largest meaningful scroll offset.
    #[must_use]
    pub fn max_scroll_top(&self) -> f64 {
        (self.total_height() - self.container_height).max(0.0)
    }

    /// Clamp `scroll_top` into `[0, max_scroll_top]`. NaN becomes 0.
    #[must_use]
    pub fn clamp_scroll(&self, scroll_top: f64) -> f64 {
        if scroll_top > 0.0 {
            scroll_top.min(self.max_scroll_top())
        } else {
            0.0
        }
    }

    /// Rows to render at `scroll_top`, or `None` for an empty list.
    #[must_use]
    pub fn window(&self, scroll_top: f64, overscan: usize) -> Option<VisibleWindow> {
        if self.count == 0 {
            return None;
        }
        let top = self.clamp_scroll(scroll_top);
        let last_row = self.count - 1;
        let first_visible = (top / self.item_height).floor() as usize;
        let last_visible = ((top + self.container_height) / self.item_height).floor() as usize;

        let end = last_visible.saturating_add(overscan).min(last_row);
        let start = first_visible.saturating_sub(overscan).min(end);
        Some(VisibleWindow {
            start,
            end,
            offset: start as f64 * self.item_height,
        })
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow<K, R> {
    /// Stable render key (the item id).
    pub key: K,
    /// Absolute index in the full list.
    pub index: usize,
    pub output: R,
}

/// Output of [`WindowedList::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedWindow<K, R> {
    pub window: Option<VisibleWindow>,
    /// Offset at which the rendered rows are positioned.
    pub offset: f64,
    /// Height of the full spacer.
    pub total_height: f64,
    pub rows: Vec<RenderedRow<K, R>>,
}

impl<K, R> RenderedWindow<K, R> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A fixed-row-height list over a borrowed slice.
#[derive(Debug)]
pub struct WindowedList<'a, T> {
    items: &'a [T],
    item_height: f64,
    container_height: f64,
    overscan: usize,
    end_reached_threshold: f64,
    root_margin: f64,
}

// Manual impls: only the slice reference is copied, so `T` need not be `Copy`.
impl<T> Clone for WindowedList<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for WindowedList<'_, T> {}

impl<'a, T> WindowedList<'a, T> {
    /// A list with the default view configuration.
    #[must_use]
    pub fn new(items: &'a [T]) -> Self {
        Self::with_config(items, &ViewConfig::default())
    }

    /// A list sized from `config`.
    #[must_use]
    pub fn with_config(items: &'a [T], config: &ViewConfig) -> Self {
        Self {
            items,
            item_height: config.item_height,
            container_height: config.container_height,
            overscan: config.overscan,
            end_reached_threshold: config.end_reached_threshold,
            root_margin: config.root_margin,
        }
    }

    #[must_use]
    pub fn with_item_height(mut self, height: f64) -> Self {
        self.item_height = height;
        self
    }

    #[must_use]
    pub fn with_container_height(mut self, height: f64) -> Self {
        self.container_height = height;
        self
    }

    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Fraction of the list after which the near-end sentinel sits.
    #[must_use]
    pub fn with_end_reached_threshold(mut self, threshold: f64) -> Self {
        self.end_reached_threshold = threshold;
        self
    }

    /// Extra pixels around the viewport that count as visible for the sentinel.
    #[must_use]
    pub fn with_root_margin(mut self, margin: f64) -> Self {
        self.root_margin = margin;
        self
    }

    /// Replace the rows, keeping the configuration.
    #[must_use]
    pub fn with_items<'b>(self, items: &'b [T]) -> WindowedList<'b, T> {
        WindowedList {
            items,
            item_height: self.item_height,
            container_height: self.container_height,
            overscan: self.overscan,
            end_reached_threshold: self.end_reached_threshold,
            root_margin: self.root_margin,
        }
    }

    #[must_use]
    pub fn items(&self) -> &'a [T] {
        self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    #[must_use]
    pub fn geometry(&self) -> ListGeometry {
        ListGeometry::new(self.items.len(), self.item_height, self.container_height)
    }

    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.geometry().total_height()
    }

    /// Rows to render at `scroll_top`, or `None` for an empty list.
    #[must_use]
    pub fn visible_window(&self, scroll_top: f64) -> Option<VisibleWindow> {
        self.geometry().window(scroll_top, self.overscan)
    }

    /// Top of the near-end sentinel, or `None` for an empty list.
    ///
    /// The sentinel's bottom edge is anchored `total_height * (1 - threshold)`
    /// above the end of the spacer.
    #[must_use]
    pub fn sentinel_top(&self) -> Option<f64> {
        if self.items.is_empty() {
            return None;
        }
        // Bottom edge at total * threshold, i.e. total * (1 - threshold) above the end.
        let bottom = self.total_height() * self.end_reached_threshold;
        Some((bottom - SENTINEL_HEIGHT).max(0.0))
    }

    /// Whether the sentinel intersects the viewport expanded by the root margin.
    #[must_use]
    pub fn is_sentinel_visible(&self, scroll_top: f64) -> bool {
        let Some(sentinel_top) = self.sentinel_top() else {
            return false;
        };
        let top = self.geometry().clamp_scroll(scroll_top);
        let view_top = top - self.root_margin;
        let view_bottom = top + self.container_height + self.root_margin;
        sentinel_top <= view_bottom && sentinel_top + SENTINEL_HEIGHT >= view_top
    }
}

impl<'a, T: Identified> WindowedList<'a, T> {
    /// Render the rows of the window at `scroll_top`.
    ///
    /// `render_fn` receives each item and its absolute index, in order.
    pub fn render<R, F>(&self, scroll_top: f64, mut render_fn: F) -> RenderedWindow<T::Id, R>
    where
        F: FnMut(&'a T, usize) -> R,
    {
        let total_height = self.total_height();
        let Some(window) = self.visible_window(scroll_top) else {
            return RenderedWindow {
                window: None,
                offset: 0.0,
                total_height,
                rows: Vec::new(),
            };
        };
        tracing::trace!(
            start = window.start,
            end = window.end,
            count = self.items.len(),
            "render window"
        );
        let items: &'a [T] = self.items;
        let rows = items[window.range()]
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let index = window.start + i;
                RenderedRow {
                    key: item.id(),
                    index,
                    output: render_fn(item, index),
                }
            })
            .collect();
        RenderedWindow {
            window: Some(window),
            offset: window.offset,
            total_height,
            rows,
        }
    }
}

/// Fires a callback when a list's near-end sentinel scrolls into view.
///
/// The callback runs on the not-visible to visible transition only, so
/// lingering near the end does not request the next page repeatedly.
/// Dropping the sentinel releases its visibility subscription.
pub struct EndReachedSentinel {
    observer: VisibilityObserver,
    fired: Rc<Cell<u64>>,
    _subscription: Subscription,
}

impl std::fmt::Debug for EndReachedSentinel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndReachedSentinel")
            .field("visible", &self.observer.is_visible())
            .field("fired", &self.fired.get())
            .finish()
    }
}

impl EndReachedSentinel {
    /// A sentinel with its own observer.
    pub fn new(on_end_reached: impl Fn() + 'static) -> Self {
        Self::with_observer(VisibilityObserver::new(), on_end_reached)
    }

    /// A sentinel reporting through an existing observer.
    pub fn with_observer(observer: VisibilityObserver, on_end_reached: impl Fn() + 'static) -> Self {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let subscription = observer.subscribe(move |visible| {
            if visible {
                counter.set(counter.get() + 1);
                on_end_reached();
            }
        });
        Self {
            observer,
            fired,
            _subscription: subscription,
        }
    }

    /// Recompute sentinel visibility for `list` at `scroll_top`.
    ///
    /// Returns `true` if the near-end callback ran.
    pub fn observe<T>(&self, list: &WindowedList<'_, T>, scroll_top: f64) -> bool {
        let visible = list.is_sentinel_visible(scroll_top);
        let fired = self.observer.update(visible) && visible;
        if fired {
            tracing::debug!(scroll_top, count = list.len(), "end reached");
        }
        fired
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.observer.is_visible()
    }

    /// How many times the callback has run.
    #[must_use]
    pub fn fire_count(&self) -> u64 {
        self.fired.get()
    }

    #[must_use]
    pub fn observer(&self) -> &VisibilityObserver {
        &self.observer
    }
}

/// Where [`ScrollState::scroll_to_index`] places the target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAlign {
    /// Row at the top of the viewport.
    #[default]
    Start,
    /// Row centered in the viewport (jumping to a search result).
    Center,
}

/// Scroll offset plus follow mode.
///
/// In follow mode the list stays pinned to the bottom as rows are appended.
/// Any scroll that leaves the bottom turns follow mode off;
/// [`scroll_to_bottom`](Self::scroll_to_bottom) turns it back on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    scroll_top: f64,
    follow: bool,
}

impl ScrollState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    #[must_use]
    pub fn follow_mode(&self) -> bool {
        self.follow
    }

    /// Manual scroll to an absolute offset.
    pub fn set_scroll_top(&mut self, scroll_top: f64, geometry: &ListGeometry) {
        self.scroll_top = geometry.clamp_scroll(scroll_top);
        self.leave_follow_unless_at_bottom(geometry);
    }

    /// Manual scroll by `delta` pixels (positive is down).
    pub fn scroll_by(&mut self, delta: f64, geometry: &ListGeometry) {
        self.set_scroll_top(self.scroll_top + delta, geometry);
    }

    /// Bring row `index` into view. Out-of-range indices target the last row.
    pub fn scroll_to_index(&mut self, index: usize, align: ScrollAlign, geometry: &ListGeometry) {
        if geometry.count == 0 {
            self.scroll_top = 0.0;
            return;
        }
        let index = index.min(geometry.count - 1);
        let row_top = index as f64 * geometry.item_height;
        let target = match align {
            ScrollAlign::Start => row_top,
            ScrollAlign::Center => {
                row_top + geometry.item_height / 2.0 - geometry.container_height / 2.0
            }
        };
        self.scroll_top = geometry.clamp_scroll(target);
        self.leave_follow_unless_at_bottom(geometry);
    }

    /// Jump to the end and enable follow mode.
    pub fn scroll_to_bottom(&mut self, geometry: &ListGeometry) {
        self.scroll_top = geometry.max_scroll_top();
        self.follow = true;
    }

    pub fn set_follow(&mut self, follow: bool, geometry: &ListGeometry) {
        self.follow = follow;
        if follow {
            self.scroll_to_bottom(geometry);
        }
    }

    #[must_use]
    pub fn is_at_bottom(&self, geometry: &ListGeometry) -> bool {
        self.scroll_top >= geometry.max_scroll_top() - BOTTOM_TOLERANCE
    }

    /// Re-anchor after rows were added or removed.
    pub fn on_items_changed(&mut self, geometry: &ListGeometry) {
        if self.follow {
            self.scroll_top = geometry.max_scroll_top();
        } else {
            self.scroll_top = geometry.clamp_scroll(self.scroll_top);
        }
    }

    fn leave_follow_unless_at_bottom(&mut self, geometry: &ListGeometry) {
        if self.follow && !self.is_at_bottom(geometry) {
            tracing::trace!(scroll_top = self.scroll_top, "follow mode off");
            self.follow = false;
        }
    }
}
