//! Property-based invariant tests for windowed list rendering.
//!
//! Verifies:
//! 1. For a non-empty list: 0 <= start <= end <= n - 1
//! 2. offset == start * item_height
//! 3. The window covers every row that intersects the viewport
//! 4. The window never exceeds the visible rows plus overscan on each side
//! 5. An empty list has no window and no sentinel, at any scroll position
//! 6. Rendering visits exactly the window's rows, in order
//! 7. Determinism: same inputs, same window

use hero_widgets::{ListGeometry, ScrollAlign, ScrollState, WindowedList};
use proptest::prelude::*;

fn rows(n: usize) -> Vec<(usize, String)> {
    (0..n).map(|i| (i, String::new())).collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Bounds and offset
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn window_is_in_bounds(
        count in 1usize..2_000,
        item_height in 1.0f64..200.0,
        container_height in 1.0f64..2_000.0,
        overscan in 0usize..20,
        scroll_top in -1_000.0f64..500_000.0,
    ) {
        let geo = ListGeometry::new(count, item_height, container_height);
        let window = geo.window(scroll_top, overscan);
        prop_assert!(window.is_some());
        let window = window.unwrap();
        prop_assert!(window.start <= window.end, "start {} > end {}", window.start, window.end);
        prop_assert!(window.end < count, "end {} >= count {}", window.end, count);
        prop_assert_eq!(window.offset, window.start as f64 * item_height);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3-4. Coverage and tightness
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn window_covers_viewport(
        count in 1usize..500,
        item_height in 10.0f64..120.0,
        container_height in 50.0f64..1_000.0,
        overscan in 0usize..10,
        frac in 0.0f64..=1.0,
    ) {
        let geo = ListGeometry::new(count, item_height, container_height);
        let scroll_top = geo.max_scroll_top() * frac;
        let window = geo.window(scroll_top, overscan).unwrap();

        let first_visible = (scroll_top / item_height).floor() as usize;
        let last_visible = (((scroll_top + container_height) / item_height).ceil() as usize)
            .saturating_sub(1)
            .min(count - 1);
        prop_assert!(window.start <= first_visible.min(count - 1));
        prop_assert!(window.end >= last_visible);

        let visible = ((container_height / item_height).floor() as usize) + 2;
        prop_assert!(window.len() <= visible + 2 * overscan);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Empty list
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn empty_list_has_nothing(scroll_top in -1e6f64..1e6) {
        let items: Vec<(usize, String)> = Vec::new();
        let list = WindowedList::new(&items);
        prop_assert!(list.visible_window(scroll_top).is_none());
        prop_assert!(!list.is_sentinel_visible(scroll_top));
        prop_assert_eq!(list.total_height(), 0.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6-7. Rendering and determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn render_visits_window_in_order(
        count in 1usize..300,
        overscan in 0usize..8,
        scroll_top in 0.0f64..30_000.0,
    ) {
        let items = rows(count);
        let list = WindowedList::new(&items).with_overscan(overscan);
        let mut seen = Vec::new();
        let rendered = list.render(scroll_top, |_, index| {
            seen.push(index);
            index
        });
        let window = rendered.window.unwrap();
        prop_assert_eq!(seen, window.range().collect::<Vec<_>>());
        prop_assert!(rendered.rows.iter().all(|row| row.key == row.index && row.output == row.index));
        prop_assert_eq!(list.visible_window(scroll_top), Some(window));
    }
}

proptest! {
    #[test]
    fn scroll_to_index_shows_row(
        count in 1usize..1_000,
        index in 0usize..1_000,
        center in any::<bool>(),
    ) {
        let geo = ListGeometry::new(count, 80.0, 400.0);
        let mut scroll = ScrollState::new();
        let align = if center { ScrollAlign::Center } else { ScrollAlign::Start };
        scroll.scroll_to_index(index, align, &geo);
        let window = geo.window(scroll.scroll_top(), 0).unwrap();
        prop_assert!(window.contains(index.min(count - 1)));
    }
}
