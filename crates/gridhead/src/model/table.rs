//! The table-model seam and an in-memory implementation.
//!
//! The header controllers never touch column state directly. They read
//! [`HeaderDescriptor`]s from a [`ColumnModel`] and commit through its
//! mutation entry points, all of which are synchronous: a committed change is
//! visible to the very next read.

use parking_lot::RwLock;

use gridhead_core::Signal;
use gridhead_core::logging::targets;

use super::column::{Column, ColumnId, HeaderDescriptor, PinSide};
use super::order::ColumnOrder;
use super::sort::SortSpec;

/// Signals emitted by a [`ColumnModel`] after each committed mutation.
pub struct ColumnSignals {
    /// Emitted with the new order after a reorder commit or reconciliation.
    pub order_changed: Signal<ColumnOrder>,
    /// Emitted when a column's size changes: (column, old, new).
    pub size_changed: Signal<(ColumnId, f32, f32)>,
    /// Emitted with the new sort spec.
    pub sorting_changed: Signal<SortSpec>,
    /// Emitted when a column is pinned or unpinned.
    pub pinning_changed: Signal<(ColumnId, Option<PinSide>)>,
    /// Emitted when a column is shown or hidden.
    pub visibility_changed: Signal<(ColumnId, bool)>,
    /// Emitted after the column set itself was replaced.
    pub columns_reset: Signal<()>,
}

impl Default for ColumnSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnSignals {
    /// Signals with no connections.
    pub fn new() -> Self {
        Self {
            order_changed: Signal::new(),
            size_changed: Signal::new(),
            sorting_changed: Signal::new(),
            pinning_changed: Signal::new(),
            visibility_changed: Signal::new(),
            columns_reset: Signal::new(),
        }
    }
}

/// The tabular model as seen from the header row.
///
/// Implementations use interior mutability; every method takes `&self` so a
/// model can be shared as `Arc<dyn ColumnModel>` between the controllers.
pub trait ColumnModel: Send + Sync {
    /// All known columns in definition order, hidden ones included.
    fn headers(&self) -> Vec<HeaderDescriptor>;

    /// The stored column order. May be empty when the user never reordered;
    /// see [`effective_order`](Self::effective_order).
    fn column_order(&self) -> ColumnOrder;

    /// Replace the column order. The stored order always covers exactly the
    /// known columns: unknown ids are dropped and missing ones appended.
    fn set_column_order(&self, order: ColumnOrder);

    /// Store a column size. Returns `false` for an unknown column.
    fn set_column_size(&self, column: &ColumnId, size: f32) -> bool;

    /// The current multi-column sort.
    fn sorting(&self) -> SortSpec;

    /// Replace the sort spec.
    fn set_sorting(&self, sorting: SortSpec);

    /// Pin or unpin a column. Returns `false` for an unknown column.
    fn set_pinned(&self, column: &ColumnId, side: Option<PinSide>) -> bool;

    /// Show or hide a column. Returns `false` for an unknown column.
    fn set_visible(&self, column: &ColumnId, visible: bool) -> bool;

    /// Change notifications.
    fn signals(&self) -> &ColumnSignals;

    /// Descriptor of a single column.
    fn header(&self, column: &ColumnId) -> Option<HeaderDescriptor> {
        self.headers().into_iter().find(|header| &header.id == column)
    }

    /// The stored order, or the definition order when none is stored.
    fn effective_order(&self) -> ColumnOrder {
        let order = self.column_order();
        if !order.is_empty() {
            return order;
        }
        let ids = self.headers().into_iter().map(|header| header.id);
        ColumnOrder::from_ids(ids).unwrap_or_default()
    }

    /// Visible columns, left to right.
    fn visible_headers(&self) -> Vec<HeaderDescriptor> {
        let mut headers = self.headers();
        let order = self.effective_order();
        headers.retain(|header| header.visible);
        headers.sort_by_key(|header| order.index_of(&header.id).unwrap_or(usize::MAX));
        headers
    }

    /// Ids of the visible columns, left to right.
    fn visible_order(&self) -> ColumnOrder {
        let ids = self.visible_headers().into_iter().map(|header| header.id);
        ColumnOrder::from_ids(ids).unwrap_or_default()
    }
}

#[derive(Debug, Default)]
struct TableState {
    columns: Vec<Column>,
    order: ColumnOrder,
    sorting: SortSpec,
}

impl TableState {
    fn column_mut(&mut self, id: &ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| &column.id == id)
    }

    fn ids(&self) -> Vec<ColumnId> {
        self.columns.iter().map(|column| column.id.clone()).collect()
    }
}

/// An in-memory [`ColumnModel`].
///
/// # Example
///
/// ```
/// use gridhead::model::{Column, ColumnModel, ColumnTable};
///
/// let table = ColumnTable::new(vec![Column::new("name"), Column::new("price")]);
/// assert_eq!(table.effective_order().len(), 2);
/// ```
pub struct ColumnTable {
    state: RwLock<TableState>,
    signals: ColumnSignals,
}

impl ColumnTable {
    /// Create a table. Duplicate ids after the first occurrence are dropped.
    pub fn new(columns: Vec<Column>) -> Self {
        let table = Self {
            state: RwLock::new(TableState::default()),
            signals: ColumnSignals::new(),
        };
        table.install_columns(columns);
        table
    }

    /// Replace the column set, e.g. after an asynchronous schema change.
    ///
    /// The stored order is reconciled: removed ids are dropped and new ids are
    /// appended. Sort entries for removed columns are discarded.
    pub fn set_columns(&self, columns: Vec<Column>) {
        let (order, sorting, order_changed, sorting_changed) = self.install_columns(columns);
        self.signals.columns_reset.emit(());
        if order_changed {
            self.signals.order_changed.emit(order);
        }
        if sorting_changed {
            self.signals.sorting_changed.emit(sorting);
        }
    }

    fn install_columns(&self, columns: Vec<Column>) -> (ColumnOrder, SortSpec, bool, bool) {
        let mut state = self.state.write();
        let mut unique: Vec<Column> = Vec::with_capacity(columns.len());
        for column in columns {
            if unique.iter().any(|existing| existing.id == column.id) {
                tracing::warn!(target: targets::MODEL, column = %column.id, "duplicate column id ignored");
                continue;
            }
            unique.push(column);
        }
        state.columns = unique;

        let ids = state.ids();
        let order_changed = state.order.reconcile(&ids);
        let sorting_changed = state.sorting.retain_known(&ids);
        tracing::debug!(target: targets::MODEL, columns = ids.len(), "column set installed");
        (state.order.clone(), state.sorting.clone(), order_changed, sorting_changed)
    }

    /// Remove a single column.
    pub fn remove_column(&self, column: &ColumnId) -> bool {
        let columns = {
            let state = self.state.read();
            if !state.columns.iter().any(|c| &c.id == column) {
                return false;
            }
            state
                .columns
                .iter()
                .filter(|c| &c.id != column)
                .cloned()
                .collect()
        };
        self.set_columns(columns);
        true
    }
}

impl ColumnModel for ColumnTable {
    fn headers(&self) -> Vec<HeaderDescriptor> {
        let state = self.state.read();
        state
            .columns
            .iter()
            .map(|column| HeaderDescriptor {
                id: column.id.clone(),
                label: column.display_label().to_string(),
                variant: column.variant,
                size: column.size,
                size_overrides: column.size_overrides,
                sorted: state.sorting.direction_of(&column.id),
                pinned: column.pinned,
                visible: column.visible,
                capabilities: column.capabilities,
            })
            .collect()
    }

    fn column_order(&self) -> ColumnOrder {
        self.state.read().order.clone()
    }

    fn set_column_order(&self, mut order: ColumnOrder) {
        {
            let mut state = self.state.write();
            if order.reconcile(&state.ids()) {
                tracing::debug!(
                    target: targets::MODEL,
                    order = ?order.ids(),
                    "column order reconciled against known columns"
                );
            }
            if state.order == order {
                return;
            }
            state.order = order.clone();
        }
        tracing::debug!(target: targets::MODEL, order = ?order.ids(), "column order committed");
        self.signals.order_changed.emit(order);
    }

    fn set_column_size(&self, column: &ColumnId, size: f32) -> bool {
        let old = {
            let mut state = self.state.write();
            let Some(entry) = state.column_mut(column) else {
                return false;
            };
            let old = entry.size;
            entry.size = Some(size);
            old
        };
        if old != Some(size) {
            self.signals
                .size_changed
                .emit((column.clone(), old.unwrap_or(size), size));
        }
        true
    }

    fn sorting(&self) -> SortSpec {
        self.state.read().sorting.clone()
    }

    fn set_sorting(&self, sorting: SortSpec) {
        {
            let mut state = self.state.write();
            if state.sorting == sorting {
                return;
            }
            state.sorting = sorting.clone();
        }
        self.signals.sorting_changed.emit(sorting);
    }

    fn set_pinned(&self, column: &ColumnId, side: Option<PinSide>) -> bool {
        let changed = {
            let mut state = self.state.write();
            let Some(entry) = state.column_mut(column) else {
                return false;
            };
            let changed = entry.pinned != side;
            entry.pinned = side;
            changed
        };
        if changed {
            self.signals.pinning_changed.emit((column.clone(), side));
        }
        true
    }

    fn set_visible(&self, column: &ColumnId, visible: bool) -> bool {
        let changed = {
            let mut state = self.state.write();
            let Some(entry) = state.column_mut(column) else {
                return false;
            };
            let changed = entry.visible != visible;
            entry.visible = visible;
            changed
        };
        if changed {
            self.signals.visibility_changed.emit((column.clone(), visible));
        }
        true
    }

    fn signals(&self) -> &ColumnSignals {
        &self.signals
    }
}

static_assertions::assert_impl_all!(ColumnTable: Send, Sync);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::model::SortDirection;

    fn table() -> ColumnTable {
        ColumnTable::new(vec![
            Column::new("A"),
            Column::new("B"),
            Column::new("C").with_visible(false),
            Column::new("D"),
        ])
    }

    fn ids(headers: &[HeaderDescriptor]) -> Vec<&str> {
        headers.iter().map(|h| h.id.as_str()).collect()
    }

    #[test]
    fn test_initial_order_is_definition_order() {
        let t = table();
        let column_order_binding = t.column_order();
        let order: Vec<&str> = column_order_binding.ids().iter().map(ColumnId::as_str).collect();
        assert_eq!(order, ["A", "B", "C", "D"]);
        assert_eq!(ids(&t.visible_headers()), ["A", "B", "D"]);
    }

    #[test]
    fn test_visible_headers_follow_order() {
        let t = table();
        t.set_column_order(ColumnOrder::from_ids(["D", "C", "B", "A"]).unwrap());
        assert_eq!(ids(&t.visible_headers()), ["D", "B", "A"]);
        let visible_order_binding = t.visible_order();
        let visible: Vec<&str> = visible_order_binding.ids().iter().map(ColumnId::as_str).collect();
        assert_eq!(visible, ["D", "B", "A"]);
    }

    #[test]
    fn test_set_column_order_keeps_a_permutation() {
        let t = table();
        let emitted = Arc::new(Mutex::new(Vec::new()));
        let emitted_clone = emitted.clone();
        t.signals().order_changed.connect(move |order| {
            emitted_clone.lock().push(order.clone());
        });

        t.set_column_order(ColumnOrder::from_ids(["C", "ghost", "A"]).unwrap());
        let column_order_binding = t.column_order();
        let order: Vec<&str> = column_order_binding.ids().iter().map(ColumnId::as_str).collect();
        assert_eq!(order, ["C", "A", "B", "D"]);
        assert_eq!(emitted.lock().len(), 1);
        assert_eq!(emitted.lock()[0], t.column_order());

        t.set_column_order(ColumnOrder::from_ids(["C", "A"]).unwrap());
        assert_eq!(emitted.lock().len(), 1);
    }

    #[test]
    fn test_sorted_state_in_descriptors() {
        let t = table();
        let mut spec = SortSpec::new();
        spec.upsert(&"B".into(), SortDirection::Descending);
        t.set_sorting(spec);
        assert_eq!(t.header(&"B".into()).unwrap().sorted, Some(SortDirection::Descending));
        assert_eq!(t.header(&"A".into()).unwrap().sorted, None);
    }

    #[test]
    fn test_unknown_column_mutations_fail() {
        let t = table();
        assert!(!t.set_column_size(&"ghost".into(), 100.0));
        assert!(!t.set_visible(&"ghost".into(), false));
        assert!(!t.set_pinned(&"ghost".into(), Some(PinSide::Left)));
    }

    #[test]
    fn test_set_columns_reconciles_order_and_sorting() {
        let t = table();
        t.set_column_order(ColumnOrder::from_ids(["D", "C", "B", "A"]).unwrap());
        let mut spec = SortSpec::new();
        spec.upsert(&"D".into(), SortDirection::Ascending);
        t.set_sorting(spec);

        let orders = Arc::new(Mutex::new(Vec::new()));
        let orders_clone = orders.clone();
        t.signals().order_changed.connect(move |order| {
            orders_clone.lock().push(order.len());
        });

        t.set_columns(vec![Column::new("A"), Column::new("B"), Column::new("E")]);
        let column_order_binding = t.column_order();
        let order: Vec<&str> = column_order_binding.ids().iter().map(ColumnId::as_str).collect();
        assert_eq!(order, ["B", "A", "E"]);
        assert!(t.sorting().is_empty());
        assert_eq!(*orders.lock(), vec![3]);
    }

    #[test]
    fn test_size_signal_reports_old_and_new() {
        let t = table();
        let sizes = Arc::new(Mutex::new(Vec::new()));
        let sizes_clone = sizes.clone();
        t.signals().size_changed.connect(move |(id, old, new)| {
            sizes_clone.lock().push((id.to_string(), *old, *new));
        });

        t.set_column_size(&"A".into(), 200.0);
        t.set_column_size(&"A".into(), 200.0);
        t.set_column_size(&"A".into(), 250.0);
        assert_eq!(
            *sizes.lock(),
            vec![("A".to_string(), 200.0, 200.0), ("A".to_string(), 200.0, 250.0)]
        );
    }
}
