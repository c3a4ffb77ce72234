//! Prelude module for gridhead.
//!
//! ```ignore
//! use gridhead::prelude::*;
//! ```

// ============================================================================
// Row and configuration
// ============================================================================

pub use crate::config::HeaderConfig;
pub use crate::error::{HeaderError, HeaderResult};
pub use crate::header::{ColumnHeaderRow, DragOverlay, HeaderSnapshot};

// ============================================================================
// Controllers
// ============================================================================

pub use crate::header::{
    GestureArbiter, GestureState, HeaderMenuController, MenuAction, MenuEntry, ReorderController,
    ResizeController,
};

// ============================================================================
// Input
// ============================================================================

pub use crate::header::{EventDisposition, Key, KeyTarget, PointerEvent};

// ============================================================================
// Model
// ============================================================================

pub use crate::model::{
    Column, ColumnId, ColumnModel, ColumnOrder, ColumnTable, ColumnVariant, PinSide, SortDirection,
    SortSpec,
};

// ============================================================================
// Geometry and signals
// ============================================================================

pub use crate::geometry::{Point, Rect, Size};
pub use gridhead_core::{Property, Signal};
