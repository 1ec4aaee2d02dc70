//! Store of materialized render handles for the visible window.
//!
//! Handles live in a deque indexed by `line - first`, so the set of held
//! indices is always the contiguous range `first..first + len`.

use std::collections::VecDeque;

/// Contiguous window of render handles keyed by document line.
#[derive(Debug, Clone)]
pub struct VisibleLineStore<L> {
    first: usize,
    lines: VecDeque<L>,
}

impl<L> Default for VisibleLineStore<L> {
    fn default() -> Self {
        Self {
            first: 0,
            lines: VecDeque::new(),
        }
    }
}

impl<L> VisibleLineStore<L> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// First held line index. Meaningless when the store is empty.
    pub fn first(&self) -> usize {
        self.first
    }

    /// One past the last held line index.
    pub fn end(&self) -> usize {
        self.first + self.lines.len()
    }

    /// Number of held handles.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when no handles are held.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether a handle for `index` is held.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.first && index < self.end()
    }

    /// Handle for `index`, if held.
    pub fn get(&self, index: usize) -> Option<&L> {
        index
            .checked_sub(self.first)
            .and_then(|offset| self.lines.get(offset))
    }

    /// Mutable handle for `index`, if held.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut L> {
        index
            .checked_sub(self.first)
            .and_then(|offset| self.lines.get_mut(offset))
    }

    /// Handles in ascending line order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &L)> {
        let first = self.first;
        self.lines.iter().enumerate().map(move |(i, l)| (first + i, l))
    }

    /// Mutable handles in ascending line order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut L)> {
        let first = self.first;
        self.lines
            .iter_mut()
            .enumerate()
            .map(move |(i, l)| (first + i, l))
    }

    /// Make the store hold exactly `first..end`.
    ///
    /// Handles for indices already held are kept (same objects); missing ones
    /// are created with `create`, in ascending order; everything outside the
    /// new range is dropped. Returns the number of handles created.
    pub fn retain_window(&mut self, first: usize, end: usize, mut create: impl FnMut(usize) -> L) -> usize {
        let end = end.max(first);
        let keep_start = first.max(self.first);
        let keep_end = end.min(self.end());
        let mut created = 0;

        if self.lines.is_empty() || keep_start >= keep_end {
            self.lines.clear();
            self.lines.extend((first..end).map(|i| {
                created += 1;
                create(i)
            }));
            self.first = first;
            return created;
        }

        // Trim to the overlap, then grow outward on either side.
        self.lines.truncate(keep_end - self.first);
        self.lines.drain(..keep_start - self.first);
        for index in (first..keep_start).rev() {
            created += 1;
            self.lines.push_front(create(index));
        }
        for index in keep_end..end {
            created += 1;
            self.lines.push_back(create(index));
        }
        self.first = first;
        created
    }

    /// Drop every handle.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
