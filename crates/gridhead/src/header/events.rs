//! Input events delivered to a header row.

use crate::geometry::Point;
use crate::model::ColumnId;

/// Mouse/touch buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    /// The pointer was lost (capture released, window blurred).
    Cancel,
    DoubleClick,
    ContextMenu,
}

/// A pointer event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Point,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: impl Into<Point>) -> Self {
        Self {
            kind,
            position: position.into(),
            button: PointerButton::Primary,
        }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Down, (x, y))
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Move, (x, y))
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Up, (x, y))
    }

    pub fn cancel() -> Self {
        Self::new(PointerEventKind::Cancel, Point::ZERO)
    }

    pub fn double_click(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::DoubleClick, (x, y))
    }

    pub fn context_menu(x: f32, y: f32) -> Self {
        Self {
            button: PointerButton::Secondary,
            ..Self::new(PointerEventKind::ContextMenu, (x, y))
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn is_primary(&self) -> bool {
        self.button == PointerButton::Primary
    }
}

/// Keys the header row reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Enter,
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

/// The focused element receiving a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyTarget {
    Header(ColumnId),
    ResizeHandle(ColumnId),
}

/// Whether an event was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    Consumed,
    Ignored,
}

impl EventDisposition {
    pub fn is_consumed(self) -> bool {
        self == Self::Consumed
    }
}

impl From<bool> for EventDisposition {
    fn from(consumed: bool) -> Self {
        if consumed { Self::Consumed } else { Self::Ignored }
    }
}
