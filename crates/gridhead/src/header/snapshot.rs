//! Immutable per-header presentation state and change detection.
//!
//! The row produces one [`HeaderSnapshot`] per visible column. Comparing two
//! snapshots with [`dirty_fields`] tells a renderer exactly what to repaint;
//! [`resizer_needs_update`] is the narrower check for the resize handle.

use std::ops::{BitOr, BitOrAssign};

use super::probe::HighlightSide;
use super::variant::VariantInfo;
use crate::model::{ColumnId, ColumnVariant, PinSide, SortDirection};

/// Accessibility sort state of a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AriaSort {
    Ascending,
    Descending,
    /// Sortable, currently unsorted.
    None,
}

impl AriaSort {
    /// `None` for columns that cannot be sorted at all.
    pub fn from_state(sortable: bool, sorted: Option<SortDirection>) -> Option<Self> {
        match sorted {
            Some(SortDirection::Ascending) => Some(Self::Ascending),
            Some(SortDirection::Descending) => Some(Self::Descending),
            None if sortable => Some(Self::None),
            None => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
            Self::None => "none",
        }
    }
}

/// Presentation state of one header.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderSnapshot {
    pub id: ColumnId,
    pub label: String,
    /// 1-based position among the visible columns.
    pub col_index: usize,
    pub aria_sort: Option<AriaSort>,
    pub pinned: Option<PinSide>,
    pub size: f32,
    pub variant: ColumnVariant,
    pub variant_info: Option<VariantInfo>,
    /// This header is the drag source.
    pub is_dragging: bool,
    /// This header is the drop target (never the drag source).
    pub is_over: bool,
    pub highlight_side: Option<HighlightSide>,
    pub is_any_dragging: bool,
    /// This header's column is being resized.
    pub is_resizing: bool,
    /// Pointer interaction is suppressed (any drag or resize in progress).
    pub interaction_suppressed: bool,
}

/// Bit set of [`HeaderSnapshot`] fields that differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DirtyFields(u16);

impl DirtyFields {
    pub const NONE: Self = Self(0);
    pub const LABEL: Self = Self(1 << 0);
    pub const INDEX: Self = Self(1 << 1);
    pub const SORT: Self = Self(1 << 2);
    pub const PIN: Self = Self(1 << 3);
    pub const SIZE: Self = Self(1 << 4);
    pub const VARIANT: Self = Self(1 << 5);
    pub const DRAG_SOURCE: Self = Self(1 << 6);
    pub const DROP_TARGET: Self = Self(1 << 7);
    pub const ANY_DRAG: Self = Self(1 << 8);
    pub const RESIZING: Self = Self(1 << 9);
    pub const SUPPRESSED: Self = Self(1 << 10);
    pub const ALL: Self = Self((1 << 11) - 1);

    /// Fields that affect the resize handle.
    pub const RESIZER: Self = Self(
        Self::LABEL.0 | Self::SIZE.0 | Self::DRAG_SOURCE.0 | Self::ANY_DRAG.0 | Self::RESIZING.0,
    );

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u16 {
        self.0
    }
}

impl BitOr for DirtyFields {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for DirtyFields {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Fields that differ between two snapshots of the same header.
pub fn dirty_fields(prev: &HeaderSnapshot, next: &HeaderSnapshot) -> DirtyFields {
    let mut dirty = DirtyFields::NONE;
    let mut mark = |changed: bool, field: DirtyFields| {
        if changed {
            dirty |= field;
        }
    };
    mark(prev.label != next.label, DirtyFields::LABEL);
    mark(prev.col_index != next.col_index, DirtyFields::INDEX);
    mark(prev.aria_sort != next.aria_sort, DirtyFields::SORT);
    mark(prev.pinned != next.pinned, DirtyFields::PIN);
    mark(prev.size != next.size, DirtyFields::SIZE);
    mark(
        prev.variant != next.variant || prev.variant_info != next.variant_info,
        DirtyFields::VARIANT,
    );
    mark(prev.is_dragging != next.is_dragging, DirtyFields::DRAG_SOURCE);
    mark(
        prev.is_over != next.is_over || prev.highlight_side != next.highlight_side,
        DirtyFields::DROP_TARGET,
    );
    mark(prev.is_any_dragging != next.is_any_dragging, DirtyFields::ANY_DRAG);
    mark(prev.is_resizing != next.is_resizing, DirtyFields::RESIZING);
    mark(
        prev.interaction_suppressed != next.interaction_suppressed,
        DirtyFields::SUPPRESSED,
    );
    dirty
}

/// Whether the resize handle must be refreshed.
pub fn resizer_needs_update(prev: &HeaderSnapshot, next: &HeaderSnapshot) -> bool {
    dirty_fields(prev, next).intersects(DirtyFields::RESIZER)
}
