//! Gesture arbitration.
//!
//! A header row runs at most one gesture at a time: a column resize or a
//! reorder drag. [`GestureArbiter`] owns that single piece of shared state.
//! Controllers claim it with `begin_*`, observe it through
//! [`is_busy`](GestureArbiter::is_busy), and give it back with
//! [`end`](GestureArbiter::end) or [`cancel`](GestureArbiter::cancel).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gridhead::header::{GestureArbiter, GestureState};
//!
//! let arbiter = Arc::new(GestureArbiter::new());
//! assert!(arbiter.begin_drag(&"name".into()));
//! assert!(!arbiter.begin_resize(&"price".into()));
//!
//! arbiter.end();
//! assert_eq!(arbiter.current(), GestureState::Idle);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gridhead_core::logging::targets;
use gridhead_core::{Property, Signal};

use super::probe::HighlightSide;
use crate::error::{HeaderError, HeaderResult};
use crate::model::ColumnId;

/// Live state of a reorder drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// The column being dragged.
    pub active: ColumnId,
    /// Current drop target, never equal to `active`.
    pub over: Option<ColumnId>,
    pub highlight: Option<HighlightSide>,
    /// Last pointer x, absent for keyboard drags.
    pub pointer_x: Option<f32>,
}

impl DragState {
    fn new(active: ColumnId) -> Self {
        Self {
            active,
            over: None,
            highlight: None,
            pointer_x: None,
        }
    }
}

/// The row's gesture state. At most one gesture is ever active.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Resizing(ColumnId),
    Dragging(DragState),
}

impl GestureState {
    /// Short name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Resizing(_) => "resize",
            Self::Dragging(_) => "drag",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Single-writer owner of the row's [`GestureState`].
pub struct GestureArbiter {
    state: Property<GestureState>,
    /// Bumped on every successful begin; lets a lease tell its own gesture
    /// apart from a later one.
    generation: AtomicU64,
    /// Emitted after every state transition, including drag updates.
    pub state_changed: Signal<GestureState>,
}

impl Default for GestureArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureArbiter {
    pub fn new() -> Self {
        Self {
            state: Property::new(GestureState::Idle),
            generation: AtomicU64::new(0),
            state_changed: Signal::new(),
        }
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> GestureState {
        self.state.get()
    }

    /// `true` while any gesture is active.
    pub fn is_busy(&self) -> bool {
        self.state.with(|state| !state.is_idle())
    }

    /// `true` while a reorder drag is active.
    pub fn is_dragging(&self) -> bool {
        self.state.with(|state| matches!(state, GestureState::Dragging(_)))
    }

    /// The column currently being resized.
    pub fn resizing_column(&self) -> Option<ColumnId> {
        self.state.with(|state| match state {
            GestureState::Resizing(id) => Some(id.clone()),
            _ => None,
        })
    }

    /// The live drag, if one is in progress.
    pub fn drag(&self) -> Option<DragState> {
        self.state.with(|state| match state {
            GestureState::Dragging(drag) => Some(drag.clone()),
            _ => None,
        })
    }

    /// Claim the arbiter for a resize of `column`.
    ///
    /// Returns `false`, leaving the state untouched, unless the row is idle.
    pub fn begin_resize(&self, column: &ColumnId) -> bool {
        self.try_begin(GestureState::Resizing(column.clone())).is_ok()
    }

    /// Claim the arbiter for a reorder drag of `column`.
    pub fn begin_drag(&self, column: &ColumnId) -> bool {
        self.try_begin(GestureState::Dragging(DragState::new(column.clone())))
            .is_ok()
    }

    /// Transition from `Idle` to `next`.
    pub fn try_begin(&self, next: GestureState) -> HeaderResult<()> {
        self.claim(&next)?;
        self.state_changed.emit(next);
        Ok(())
    }

    /// Compare-and-set from `Idle` without announcing the transition.
    fn claim(&self, next: &GestureState) -> HeaderResult<()> {
        let mut active = "idle";
        let claimed = self.state.update(|current| {
            if current.is_idle() {
                Some(next.clone())
            } else {
                active = current.name();
                None
            }
        });
        if !claimed {
            tracing::debug!(
                target: targets::GESTURE,
                requested = next.name(),
                active,
                "gesture refused"
            );
            return Err(HeaderError::ConcurrentGestureRejected { active });
        }

        self.generation.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(target: targets::GESTURE, state = ?next, "gesture started");
        Ok(())
    }

    /// Update the live drag. No-op unless a drag is in progress.
    ///
    /// Returns `true` if the drag state changed.
    pub fn update_drag<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut DragState),
    {
        let mut next = None;
        let changed = self.state.update(|current| {
            let GestureState::Dragging(drag) = current else {
                return None;
            };
            let mut updated = drag.clone();
            f(&mut updated);
            if updated == *drag {
                return None;
            }
            let state = GestureState::Dragging(updated);
            next = Some(state.clone());
            Some(state)
        });
        if let Some(state) = next {
            tracing::trace!(target: targets::GESTURE, state = ?state, "drag updated");
            self.state_changed.emit(state);
        }
        changed
    }

    /// Return to `Idle` after a completed gesture.
    pub fn end(&self) {
        self.release("gesture ended");
    }

    /// Return to `Idle` after an aborted gesture. Nothing is committed.
    pub fn cancel(&self) {
        self.release("gesture cancelled");
    }

    fn release(&self, message: &'static str) {
        if let Some(previous) = self.state.replace(GestureState::Idle) {
            tracing::debug!(target: targets::GESTURE, previous = previous.name(), "{message}");
            self.state_changed.emit(GestureState::Idle);
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Claim a resize and wrap it in a [`GestureLease`].
    pub fn lease_resize(self: &Arc<Self>, column: &ColumnId) -> Option<GestureLease> {
        self.begin_resize(column).then(|| GestureLease::new(self))
    }

    /// Claim a drag and wrap it in a [`GestureLease`].
    pub fn lease_drag(self: &Arc<Self>, column: &ColumnId) -> Option<GestureLease> {
        self.begin_drag(column).then(|| GestureLease::new(self))
    }

    /// Like [`lease_resize`](Self::lease_resize), but hands the lease to
    /// `store` before `state_changed` fires.
    pub fn lease_resize_into<F>(self: &Arc<Self>, column: &ColumnId, store: F) -> bool
    where
        F: FnOnce(GestureLease),
    {
        self.lease_into(GestureState::Resizing(column.clone()), store)
    }

    /// Like [`lease_drag`](Self::lease_drag), but hands the lease to `store`
    /// before `state_changed` fires. Slots then already see the owner
    /// holding it.
    pub fn lease_drag_into<F>(self: &Arc<Self>, column: &ColumnId, store: F) -> bool
    where
        F: FnOnce(GestureLease),
    {
        self.lease_into(GestureState::Dragging(DragState::new(column.clone())), store)
    }

    fn lease_into<F>(self: &Arc<Self>, next: GestureState, store: F) -> bool
    where
        F: FnOnce(GestureLease),
    {
        if self.claim(&next).is_err() {
            return false;
        }
        store(GestureLease::new(self));
        self.state_changed.emit(next);
        true
    }
}

/// Scoped ownership of an active gesture.
///
/// Dropping the lease cancels the gesture it was created for; a later
/// gesture started by someone else is left alone. Call
/// [`complete`](Self::complete) after a successful commit.
pub struct GestureLease {
    arbiter: Arc<GestureArbiter>,
    generation: u64,
    finished: bool,
}

impl GestureLease {
    fn new(arbiter: &Arc<GestureArbiter>) -> Self {
        Self {
            arbiter: Arc::clone(arbiter),
            generation: arbiter.generation(),
            finished: false,
        }
    }

    /// `true` while the arbiter is still running this lease's gesture.
    pub fn is_current(&self) -> bool {
        !self.finished && self.arbiter.generation() == self.generation && self.arbiter.is_busy()
    }

    /// End the gesture normally.
    pub fn complete(mut self) {
        self.finish(GestureArbiter::end);
    }

    /// Abort the gesture.
    pub fn abort(mut self) {
        self.finish(GestureArbiter::cancel);
    }

    fn finish(&mut self, release: fn(&GestureArbiter)) {
        if self.finished {
            return;
        }
        self.finished = true;
        if self.arbiter.generation() == self.generation {
            release(&self.arbiter);
        }
    }
}

impl Drop for GestureLease {
    fn drop(&mut self) {
        self.finish(GestureArbiter::cancel);
    }
}

static_assertions::assert_impl_all!(GestureArbiter: Send, Sync);
static_assertions::assert_impl_all!(GestureLease: Send, Sync);

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn test_begin_refused_while_busy() {
        let arbiter = GestureArbiter::new();
        assert!(arbiter.begin_resize(&"A".into()));
        assert!(!arbiter.begin_resize(&"B".into()));
        assert!(!arbiter.begin_drag(&"B".into()));
        assert_eq!(arbiter.current(), GestureState::Resizing("A".into()));

        arbiter.end();
        assert!(arbiter.begin_drag(&"B".into()));
        assert!(!arbiter.begin_resize(&"A".into()));
        assert!(arbiter.is_dragging());
    }

    #[test]
    fn test_active_column_cannot_begin_again() {
        let arbiter = GestureArbiter::new();
        assert!(arbiter.begin_resize(&"A".into()));
        assert!(!arbiter.begin_resize(&"A".into()));
        assert!(!arbiter.begin_drag(&"A".into()));
        assert_eq!(arbiter.current(), GestureState::Resizing("A".into()));

        arbiter.end();
        assert!(arbiter.begin_drag(&"A".into()));
        arbiter.update_drag(|drag| drag.over = Some("B".into()));
        assert!(!arbiter.begin_drag(&"A".into()));
        assert!(!arbiter.begin_resize(&"A".into()));
        assert_eq!(arbiter.drag().unwrap().over, Some("B".into()));
    }

    #[test]
    fn test_try_begin_reports_active_gesture() {
        let arbiter = GestureArbiter::new();
        arbiter.begin_drag(&"A".into());
        assert_eq!(
            arbiter.try_begin(GestureState::Resizing("B".into())),
            Err(HeaderError::ConcurrentGestureRejected { active: "drag" })
        );
    }

    #[test]
    fn test_update_drag_only_while_dragging() {
        let arbiter = GestureArbiter::new();
        assert!(!arbiter.update_drag(|drag| drag.pointer_x = Some(1.0)));

        arbiter.begin_drag(&"A".into());
        assert!(arbiter.update_drag(|drag| drag.over = Some("B".into())));
        assert!(!arbiter.update_drag(|drag| drag.over = Some("B".into())));
        assert_eq!(arbiter.drag().unwrap().over, Some("B".into()));
    }

    #[test]
    fn test_state_changed_signal() {
        let arbiter = GestureArbiter::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        arbiter.state_changed.connect(move |state| {
            seen_clone.lock().push(state.name());
        });

        arbiter.begin_resize(&"A".into());
        arbiter.begin_drag(&"B".into());
        arbiter.end();
        arbiter.end();

        assert_eq!(*seen.lock(), vec!["resize", "idle"]);
    }

    #[test]
    fn test_lease_cancels_on_drop() {
        let arbiter = Arc::new(GestureArbiter::new());
        {
            let lease = arbiter.lease_drag(&"A".into()).unwrap();
            assert!(lease.is_current());
            assert!(arbiter.is_busy());
        }
        assert!(!arbiter.is_busy());
    }

    #[test]
    fn test_stale_lease_leaves_newer_gesture_alone() {
        let arbiter = Arc::new(GestureArbiter::new());
        let lease = arbiter.lease_drag(&"A".into()).unwrap();
        arbiter.cancel();
        assert!(arbiter.begin_resize(&"B".into()));
        assert!(!lease.is_current());

        drop(lease);
        assert_eq!(arbiter.resizing_column(), Some("B".into()));
    }

    #[test]
    fn test_lease_stored_before_announcement() {
        let arbiter = Arc::new(GestureArbiter::new());
        let slot = Arc::new(Mutex::new(None::<GestureLease>));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (slot_clone, seen_clone) = (slot.clone(), seen.clone());
        arbiter.state_changed.connect(move |state| {
            let held = slot_clone.lock().as_ref().is_some_and(GestureLease::is_current);
            seen_clone.lock().push((state.name(), held));
        });

        assert!(arbiter.lease_drag_into(&"A".into(), |lease| *slot.lock() = Some(lease)));
        assert!(!arbiter.lease_resize_into(&"A".into(), drop));
        let lease = slot.lock().take();
        drop(lease);
        assert_eq!(*seen.lock(), vec![("drag", true), ("idle", false)]);
    }

    #[test]
    fn test_lease_complete() {
        let arbiter = Arc::new(GestureArbiter::new());
        let lease = arbiter.lease_resize(&"A".into()).unwrap();
        assert!(arbiter.lease_drag(&"B".into()).is_none());
        lease.complete();
        assert_eq!(arbiter.current(), GestureState::Idle);
    }
}
