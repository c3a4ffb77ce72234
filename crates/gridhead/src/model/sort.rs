//! Multi-column sort keys.

use super::column::{ColumnId, SortDirection};

/// One entry of a [`SortSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortEntry {
    pub column: ColumnId,
    pub descending: bool,
}

impl SortEntry {
    pub fn new(column: impl Into<ColumnId>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            descending: direction.is_descending(),
        }
    }

    pub fn direction(&self) -> SortDirection {
        SortDirection::from_descending(self.descending)
    }
}

/// Ordered sort keys, unique by column. Earlier entries take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortSpec {
    entries: Vec<SortEntry>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direction the column is sorted in, if it is one of the sort keys.
    pub fn direction_of(&self, column: &ColumnId) -> Option<SortDirection> {
        self.entries
            .iter()
            .find(|entry| &entry.column == column)
            .map(SortEntry::direction)
    }

    /// Set a column's direction. An existing entry keeps its position (and so
    /// its precedence); a new one is appended as the lowest-priority key.
    pub fn upsert(&mut self, column: &ColumnId, direction: SortDirection) {
        let entry = SortEntry::new(column.clone(), direction);
        match self.entries.iter_mut().find(|existing| &existing.column == column) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Remove a column from the sort keys. Returns `true` if it was present.
    pub fn remove(&mut self, column: &ColumnId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| &entry.column != column);
        self.entries.len() != before
    }

    /// Drop entries whose column is not in `known`.
    pub fn retain_known(&mut self, known: &[ColumnId]) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| known.contains(&entry.column));
        self.entries.len() != before
    }
}
