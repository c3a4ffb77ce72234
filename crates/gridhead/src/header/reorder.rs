//! Drag-to-reorder lifecycle.
//!
//! A reorder drag moves through `start` -> any number of `move_to`/`step`
//! calls -> `finish` (or `cancel`). Only `finish` with a valid drop target
//! touches the column order, and it does so with a single splice move.

use std::sync::Arc;

use parking_lot::Mutex;

use gridhead_core::Signal;
use gridhead_core::logging::targets;

use super::arbiter::{DragState, GestureArbiter, GestureLease};
use super::probe::{BoundsRegistry, GeometryProbe, HighlightSide};
use crate::error::{HeaderError, HeaderResult};
use crate::geometry::Point;
use crate::model::{ColumnId, ColumnModel, ColumnOrder, StepDirection};

/// What the drag overlay needs on every update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DragSnapshot {
    /// The dragged column.
    pub active_id: Option<ColumnId>,
    /// The drop target, never the dragged column.
    pub over_id: Option<ColumnId>,
    pub highlight_side: Option<HighlightSide>,
    /// Overlay x: the pointer, else the target's midpoint.
    pub drag_x: Option<f32>,
}

/// A committed reorder.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderCommit {
    pub column: ColumnId,
    /// Index in the full order before the move.
    pub from: usize,
    /// Index in the full order after the move.
    pub to: usize,
    /// The order after the move.
    pub order: ColumnOrder,
}

/// Next keyboard drop target within `order`.
///
/// Steps one position from `current`, or from `active` when nothing is
/// targeted yet or `current` is not in `order`. At either end of the order
/// the current target is kept.
pub fn step_target(
    order: &ColumnOrder,
    active: &ColumnId,
    current: Option<&ColumnId>,
    direction: StepDirection,
) -> Option<ColumnId> {
    let from = current.filter(|id| order.contains(id)).unwrap_or(active);
    match order.neighbour(from, direction) {
        Some(next) => Some(next.clone()),
        None => order.contains(from).then(|| from.clone()),
    }
}

/// Drives reorder drags against a [`ColumnModel`].
pub struct ReorderController {
    model: Arc<dyn ColumnModel>,
    arbiter: Arc<GestureArbiter>,
    lease: Mutex<Option<GestureLease>>,
    /// Emitted on every drag update and once more, empty, when the drag ends.
    pub drag_changed: Signal<DragSnapshot>,
    /// Emitted after a reorder was written to the model.
    pub committed: Signal<ReorderCommit>,
}

impl ReorderController {
    pub fn new(model: Arc<dyn ColumnModel>, arbiter: Arc<GestureArbiter>) -> Self {
        Self {
            model,
            arbiter,
            lease: Mutex::new(None),
            drag_changed: Signal::new(),
            committed: Signal::new(),
        }
    }

    /// `true` while this controller owns a drag.
    pub fn is_active(&self) -> bool {
        self.lease.lock().as_ref().is_some_and(GestureLease::is_current)
    }

    /// Pick up `column`. Refused silently if another gesture is active or the
    /// column is not part of the order.
    pub fn start(&self, column: &ColumnId) -> bool {
        if !self.model.effective_order().contains(column) {
            tracing::debug!(target: targets::REORDER, %column, "drag refused: unknown column");
            return false;
        }
        if !self
            .arbiter
            .lease_drag_into(column, |lease| *self.lease.lock() = Some(lease))
        {
            return false;
        }
        tracing::debug!(target: targets::REORDER, %column, "drag started");
        self.drag_changed.emit(self.snapshot());
        true
    }

    /// Follow the pointer. Never touches the column order.
    pub fn move_to(&self, pointer: Point, bounds: &BoundsRegistry) -> Option<DragSnapshot> {
        let drag = self.owned_drag()?;
        let order = self.model.effective_order();
        let hit = GeometryProbe::hit_test(pointer, &drag.active, &order, bounds);
        let target = hit.map(|hit| hit.target_id);
        self.set_target(&drag.active, target, Some(pointer.x), &order);
        tracing::trace!(target: targets::REORDER, x = pointer.x, "drag moved");
        self.publish()
    }

    /// Move the drop target to the next visible column left or right.
    ///
    /// Hidden columns are skipped; the commit still happens against the full
    /// order, so they keep their place.
    pub fn step(&self, direction: StepDirection, bounds: &BoundsRegistry) -> Option<DragSnapshot> {
        let drag = self.owned_drag()?;
        let order = self.model.effective_order();
        let visible = self.model.visible_order();
        let target = step_target(&visible, &drag.active, drag.over.as_ref(), direction);
        self.set_target(&drag.active, target, None, &order);
        tracing::trace!(target: targets::REORDER, ?direction, "drag stepped");
        self.publish_with_fallback(bounds)
    }

    fn set_target(
        &self,
        active: &ColumnId,
        target: Option<ColumnId>,
        pointer_x: Option<f32>,
        order: &ColumnOrder,
    ) {
        let over = target.filter(|target| target != active);
        let highlight = over.as_ref().and_then(|over| GeometryProbe::side(order, active, over));
        self.arbiter.update_drag(|state| {
            state.over = over;
            state.highlight = highlight;
            state.pointer_x = pointer_x;
        });
    }

    /// Drop the dragged column on `dropped_on` and end the drag.
    ///
    /// No-op when nothing was dropped on, the target is the dragged column,
    /// or either column is gone from the order. A second call does nothing.
    pub fn finish(&self, dropped_on: Option<&ColumnId>) -> Option<ReorderCommit> {
        let lease = self.lease.lock().take()?;
        let Some(drag) = self.arbiter.drag().filter(|_| lease.is_current()) else {
            tracing::debug!(target: targets::REORDER, "finish ignored: drag no longer active");
            return None;
        };

        let outcome = match dropped_on {
            Some(target) => self.commit(&drag.active, target),
            None => Err(HeaderError::InvalidTarget(drag.active.clone())),
        };
        lease.complete();
        self.drag_changed.emit(DragSnapshot::default());

        match outcome {
            Ok(commit) => {
                tracing::debug!(
                    target: targets::REORDER,
                    column = %commit.column,
                    from = commit.from,
                    to = commit.to,
                    "reorder committed"
                );
                self.committed.emit(commit.clone());
                Some(commit)
            }
            Err(error) => {
                tracing::debug!(target: targets::REORDER, %error, "drop had no effect");
                None
            }
        }
    }

    /// Drop on the current target.
    pub fn drop_on_current(&self) -> Option<ReorderCommit> {
        let over = self.arbiter.drag().and_then(|drag| drag.over);
        self.finish(over.as_ref())
    }

    /// Abort the drag. Equivalent to `finish(None)`.
    pub fn cancel(&self) {
        if self.finish(None).is_none() {
            tracing::trace!(target: targets::REORDER, "drag cancelled");
        }
    }

    fn commit(&self, active: &ColumnId, target: &ColumnId) -> HeaderResult<ReorderCommit> {
        let mut order = self.model.effective_order();
        let (from, to) = order.relocate(active, target)?;
        self.model.set_column_order(order.clone());
        Ok(ReorderCommit {
            column: active.clone(),
            from,
            to,
            order,
        })
    }

    /// Current `{active, over, highlight, drag_x}`. Empty when idle.
    pub fn snapshot(&self) -> DragSnapshot {
        self.arbiter
            .drag()
            .map(|drag| DragSnapshot {
                active_id: Some(drag.active),
                over_id: drag.over,
                highlight_side: drag.highlight,
                drag_x: drag.pointer_x,
            })
            .unwrap_or_default()
    }

    /// Snapshot with the keyboard fallback for `drag_x` applied.
    pub fn snapshot_with_bounds(&self, bounds: &BoundsRegistry) -> DragSnapshot {
        let mut snapshot = self.snapshot();
        let target_rect = snapshot.over_id.as_ref().and_then(|id| bounds.get(id));
        snapshot.drag_x = GeometryProbe::drag_x(snapshot.drag_x, target_rect);
        snapshot
    }

    fn owned_drag(&self) -> Option<DragState> {
        if !self.is_active() {
            return None;
        }
        self.arbiter.drag()
    }

    fn publish(&self) -> Option<DragSnapshot> {
        let snapshot = self.snapshot();
        self.drag_changed.emit(snapshot.clone());
        Some(snapshot)
    }

    fn publish_with_fallback(&self, bounds: &BoundsRegistry) -> Option<DragSnapshot> {
        let snapshot = self.snapshot_with_bounds(bounds);
        self.drag_changed.emit(snapshot.clone());
        Some(snapshot)
    }
}

static_assertions::assert_impl_all!(ReorderController: Send, Sync);
