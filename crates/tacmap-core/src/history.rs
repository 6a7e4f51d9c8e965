//! Bounded undo history of full editor snapshots.

use crate::elements::FloorElements;
use crate::viewport::Viewport;
use std::collections::VecDeque;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// A snapshot of the document state taken before a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub elements: FloorElements,
    pub viewport: Viewport,
}

/// Undo stack. The oldest entry is evicted once the capacity is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: VecDeque<Snapshot>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(MAX_UNDO_HISTORY)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record a snapshot (call before making changes).
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Take the most recent snapshot.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, HexColor, PermMarker};
    use kurbo::{Point, Vec2};

    fn snapshot_with(n: usize) -> Snapshot {
        let mut elements = FloorElements::new();
        for i in 0..n {
            elements.push(0, Element::PermMarker(PermMarker::new(Point::new(i as f64, 0.0), HexColor::red())));
        }
        Snapshot {
            elements,
            viewport: Viewport::new(Vec2::new(n as f64, 0.0), 1.0),
        }
    }

    #[test]
    fn test_pop_returns_newest() {
        let mut history = History::new();
        history.push(snapshot_with(1));
        history.push(snapshot_with(2));
        assert_eq!(history.pop().map(|s| s.elements.len()), Some(2));
        assert_eq!(history.pop().map(|s| s.elements.len()), Some(1));
        assert!(history.pop().is_none());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new();
        for i in 0..(MAX_UNDO_HISTORY + 10) {
            history.push(snapshot_with(i));
        }
        assert_eq!(history.len(), MAX_UNDO_HISTORY);

        let mut oldest = None;
        while let Some(s) = history.pop() {
            oldest = Some(s);
        }
        // Entries 0..10 were evicted.
        assert_eq!(oldest.map(|s| s.viewport.pan.x), Some(10.0));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut live = snapshot_with(1);
        let mut history = History::new();
        history.push(live.clone());

        live.elements.push(0, Element::PermMarker(PermMarker::new(Point::ZERO, HexColor::red())));
        live.viewport.scale = 3.0;

        let stored = history.peek().unwrap();
        assert_eq!(stored.elements.len(), 1);
        assert!((stored.viewport.scale - 1.0).abs() < f64::EPSILON);
    }
}
