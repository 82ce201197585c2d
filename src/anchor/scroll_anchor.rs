//! Scroll anchor: Before/after measurement bracketing a DOM mutation.

use crate::layout::{NodeId, Rect};
use tracing::trace;

/// A scrolling container whose nodes can be measured.
pub trait ScrollContainer {
    /// Current vertical scroll offset.
    fn scroll_top(&self) -> i32;

    /// Set the vertical scroll offset.
    fn set_scroll_top(&mut self, value: i32);

    /// Total scrollable content height.
    fn scroll_height(&self) -> i32;

    /// Bounding rect of `node` relative to the viewport, if it is rendered.
    fn node_rect(&self, node: NodeId) -> Option<Rect>;
}

/// Where content is being inserted relative to the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Content lands above the view; the view must be pushed down with it.
    Up,
    /// Content lands below the view. Recorded only; no compensation needed.
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measurement {
    /// Screen offset of the reference node.
    Node { top: i32 },
    /// Distance from the scroll position to the end of the content.
    /// Used when there is no reference node to measure.
    FromBottom { distance: i32 },
}

/// Measurement taken before one mutation, consumed by [`restore`](Self::restore).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollAnchor {
    reference: Option<NodeId>,
    direction: Direction,
    measurement: Measurement,
}

impl ScrollAnchor {
    /// Record the current position of `reference` ahead of a mutation.
    ///
    /// With no reference (or one that is not rendered), the distance to the
    /// bottom of the content is recorded instead, so that restoring shifts
    /// the view by exactly the height that was inserted.
    pub fn prepare_for<C>(container: &C, reference: Option<NodeId>, direction: Direction) -> Self
    where
        C: ScrollContainer + ?Sized,
    {
        let measurement = match reference.and_then(|node| container.node_rect(node)) {
            Some(rect) => Measurement::Node { top: rect.top() },
            None => Measurement::FromBottom {
                distance: container.scroll_height() - container.scroll_top(),
            },
        };

        Self {
            reference,
            direction,
            measurement,
        }
    }

    /// The direction this anchor was prepared for.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// The reference node, if any.
    pub const fn reference(&self) -> Option<NodeId> {
        self.reference
    }

    /// Re-measure after the mutation and compensate the scroll offset.
    ///
    /// Returns the scroll delta that was applied.
    pub fn restore<C>(self, container: &mut C) -> i32
    where
        C: ScrollContainer + ?Sized,
    {
        if self.direction == Direction::Down {
            return 0;
        }

        let delta = match self.measurement {
            Measurement::Node { top } => self
                .reference
                .and_then(|node| container.node_rect(node))
                .map_or(0, |rect| rect.top() - top),
            Measurement::FromBottom { distance } => {
                container.scroll_height() - container.scroll_top() - distance
            }
        };

        if delta != 0 {
            let target = container.scroll_top() + delta;
            container.set_scroll_top(target);
        }
        trace!(delta, reference = ?self.reference, "scroll anchor restored");
        delta
    }
}

/// Run `mutation` bracketed by a scroll anchor on `reference`.
///
/// The restore step runs whatever the mutation returns, including an `Err`.
pub fn anchored<C, T, F>(container: &mut C, reference: Option<NodeId>, direction: Direction, mutation: F) -> T
where
    C: ScrollContainer + ?Sized,
    F: FnOnce(&mut C) -> T,
{
    let anchor = ScrollAnchor::prepare_for(container, reference, direction);
    let result = mutation(container);
    anchor.restore(container);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Vertical stack of blocks with a chrome offset above the list.
    struct Column {
        chrome: i32,
        heights: Vec<i32>,
        scroll_top: i32,
    }

    impl Column {
        fn new(heights: Vec<i32>) -> Self {
            Self {
                chrome: 40,
                heights,
                scroll_top: 0,
            }
        }
    }

    impl ScrollContainer for Column {
        fn scroll_top(&self) -> i32 {
            self.scroll_top
        }

        fn set_scroll_top(&mut self, value: i32) {
            self.scroll_top = value.max(0);
        }

        fn scroll_height(&self) -> i32 {
            self.chrome + self.heights.iter().sum::<i32>()
        }

        #[allow(clippy::cast_possible_truncation)]
        fn node_rect(&self, node: NodeId) -> Option<Rect> {
            let index = node.0 as usize;
            let height = *self.heights.get(index)?;
            let above: i32 = self.heights[..index].iter().sum();
            Some(Rect::new(0, self.chrome + above - self.scroll_top, 300, height))
        }
    }

    #[test]
    fn test_anchor_insert_above_reference() {
        let mut column = Column::new(vec![100, 100, 100]);
        column.scroll_top = 150;
        let before = column.node_rect(NodeId(1)).unwrap().top();

        // Inserting a block at the head shifts every index by one.
        let anchor = ScrollAnchor::prepare_for(&column, Some(NodeId(1)), Direction::Up);
        column.heights.insert(0, 80);
        let anchor = ScrollAnchor {
            reference: Some(NodeId(2)),
            ..anchor
        };
        let delta = anchor.restore(&mut column);

        assert_eq!(delta, 80);
        assert_eq!(column.scroll_top, 230);
        assert_eq!(column.node_rect(NodeId(2)).unwrap().top(), before);
    }

    #[test]
    fn test_anchor_without_reference_uses_inserted_height() {
        let mut column = Column::new(Vec::new());
        let anchor = ScrollAnchor::prepare_for(&column, None, Direction::Up);
        column.heights.push(120);
        assert_eq!(anchor.restore(&mut column), 120);
        assert_eq!(column.scroll_top, 120);

        let pushed = anchored(&mut column, None, Direction::Up, |c| {
            c.heights.push(60);
            c.heights.len()
        });
        assert_eq!(pushed, 2);
        assert_eq!(column.scroll_top, 180);
    }

    #[test]
    fn test_anchor_down_is_recorded_but_inert() {
        let mut column = Column::new(vec![50, 50]);
        column.scroll_top = 10;
        let anchor = ScrollAnchor::prepare_for(&column, Some(NodeId(0)), Direction::Down);
        assert_eq!(anchor.direction(), Direction::Down);
        assert_eq!(anchor.reference(), Some(NodeId(0)));

        column.heights.insert(0, 500);
        assert_eq!(anchor.restore(&mut column), 0);
        assert_eq!(column.scroll_top, 10);
    }

    #[test]
    fn test_anchored_restores_on_error() {
        let mut column = Column::new(vec![100]);
        column.scroll_top = 20;
        let result: Result<(), &str> = anchored(&mut column, Some(NodeId(0)), Direction::Up, |c| {
            c.heights[0] = 100;
            c.chrome += 30;
            Err("mutation failed")
        });

        assert!(result.is_err());
        assert_eq!(column.scroll_top, 50);
    }

    proptest! {
        #[test]
        fn prop_anchor_keeps_reference_on_screen(
            heights in prop::collection::vec(10i32..400, 1..20),
            inserted in prop::collection::vec(10i32..400, 1..5),
            pick in any::<prop::sample::Index>(),
            scroll in 0i32..2000,
        ) {
            let mut column = Column::new(heights.clone());
            column.scroll_top = scroll;
            let reference = pick.index(heights.len());
            let before = column.node_rect(NodeId(reference as u64)).unwrap().top();

            let anchor = ScrollAnchor::prepare_for(&column, Some(NodeId(reference as u64)), Direction::Up);
            for (i, h) in inserted.iter().enumerate() {
                column.heights.insert(i, *h);
            }
            let moved = NodeId((reference + inserted.len()) as u64);
            let anchor = ScrollAnchor { reference: Some(moved), ..anchor };
            anchor.restore(&mut column);

            let after = column.node_rect(moved).unwrap().top();
            prop_assert!((after - before).abs() <= 1);
        }
    }
}
