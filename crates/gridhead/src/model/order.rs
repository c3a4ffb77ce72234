//! The canonical left-to-right column order.

use std::collections::HashSet;

use super::column::ColumnId;
use crate::error::{HeaderError, HeaderResult};

/// An ordered sequence of column ids without duplicates.
///
/// This is the sole source of truth for header placement. Apart from
/// reconciliation with a changed column set, the only mutation is
/// [`relocate`](Self::relocate), a single-element splice move.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnOrder {
    ids: Vec<ColumnId>,
}

impl ColumnOrder {
    /// An empty order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an order from ids, rejecting duplicates.
    pub fn from_ids<I>(ids: I) -> HeaderResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<ColumnId>,
    {
        let ids: Vec<ColumnId> = ids.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(ids.len());
        for id in &ids {
            if !seen.insert(id) {
                return Err(HeaderError::DuplicateColumn(id.clone()));
            }
        }
        Ok(Self { ids })
    }

    /// The ids in order.
    pub fn ids(&self) -> &[ColumnId] {
        &self.ids
    }

    /// Consume into the id vector.
    pub fn into_ids(self) -> Vec<ColumnId> {
        self.ids
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// `true` if no order is stored.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Position of a column in the order.
    pub fn index_of(&self, id: &ColumnId) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    /// Whether `id` is part of the order.
    pub fn contains(&self, id: &ColumnId) -> bool {
        self.index_of(id).is_some()
    }

    /// Move `active` to the position `target` occupies now.
    ///
    /// The active id is removed first and reinserted at the target's original
    /// index, so moving right lands it just after the target and moving left
    /// just before it. Every other column keeps its relative order.
    ///
    /// Returns the `(old_index, new_index)` pair. Fails without touching the
    /// order when either id is missing or both are the same column.
    pub fn relocate(&mut self, active: &ColumnId, target: &ColumnId) -> HeaderResult<(usize, usize)> {
        if active == target {
            return Err(HeaderError::InvalidTarget(target.clone()));
        }
        let old_index = self
            .index_of(active)
            .ok_or_else(|| HeaderError::StaleColumn(active.clone()))?;
        let new_index = self
            .index_of(target)
            .ok_or_else(|| HeaderError::InvalidTarget(target.clone()))?;

        let moved = self.ids.remove(old_index);
        self.ids.insert(new_index, moved);
        Ok((old_index, new_index))
    }

    /// Make the order cover exactly `known`: ids no longer known are dropped,
    /// and unknown newcomers are appended in the order given.
    ///
    /// Returns `true` if anything changed.
    pub fn reconcile(&mut self, known: &[ColumnId]) -> bool {
        let known_set: HashSet<&ColumnId> = known.iter().collect();
        let before = self.ids.len();
        self.ids.retain(|id| known_set.contains(id));
        let mut changed = self.ids.len() != before;

        let present: HashSet<ColumnId> = self.ids.iter().cloned().collect();
        for id in known {
            if !present.contains(id) {
                self.ids.push(id.clone());
                changed = true;
            }
        }
        changed
    }

    /// Neighbouring column in the given direction, if any.
    pub fn neighbour(&self, id: &ColumnId, direction: StepDirection) -> Option<&ColumnId> {
        let index = self.index_of(id)?;
        match direction {
            StepDirection::Previous => index.checked_sub(1).and_then(|i| self.ids.get(i)),
            StepDirection::Next => self.ids.get(index + 1),
        }
    }
}

impl<'a> IntoIterator for &'a ColumnOrder {
    type Item = &'a ColumnId;
    type IntoIter = std::slice::Iter<'a, ColumnId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

/// Direction for keyboard stepping through the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    /// Towards the start (left).
    Previous,
    /// Towards the end (right).
    Next,
}
