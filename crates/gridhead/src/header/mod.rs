//! Header interaction: gesture arbitration, reordering, resizing, the header
//! menu and the row that ties them together.
//!
//! The controllers share one [`GestureArbiter`] so that a resize, a reorder
//! drag and the menu can never run at the same time. [`ColumnHeaderRow`]
//! owns the arbiter and routes input through a [`HandlerChain`].

mod arbiter;
mod chain;
mod events;
mod menu;
mod probe;
mod reorder;
mod resize;
mod row;
mod snapshot;
mod variant;

pub use arbiter::{DragState, GestureArbiter, GestureLease, GestureState};
pub use chain::{
    ArbiterGate, ContextMenuTrigger, Dispatch, DragActivator, Flow, HandlerChain, Interceptor,
    ResizeHandleInterceptor, RouteContext,
};
pub use events::{EventDisposition, Key, KeyTarget, PointerButton, PointerEvent, PointerEventKind};
pub use menu::{HeaderMenuController, MenuAction, MenuEntry, MenuState};
pub use probe::{BoundsRegistry, GeometryProbe, HighlightSide, HitResult};
pub use reorder::{DragSnapshot, ReorderCommit, ReorderController, step_target};
pub use resize::{ResizeController, ResizeHandleInfo, ResizeHandler};
pub use row::{ColumnHeaderRow, DragOverlay};
pub use snapshot::{AriaSort, DirtyFields, HeaderSnapshot, dirty_fields, resizer_needs_update};
pub use variant::{ColumnVariantRegistry, VariantInfo};
