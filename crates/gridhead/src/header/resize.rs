//! Column resizing.
//!
//! A resize previews the new size while the pointer moves and writes it to
//! the model on release. Every intermediate size is clamped to the column's
//! bounds. The controller hands out a disabled handler while a reorder drag
//! runs or while another column is being resized.

use std::sync::Arc;

use parking_lot::Mutex;

use gridhead_core::Signal;
use gridhead_core::logging::targets;

use super::arbiter::{GestureArbiter, GestureLease};
use super::probe::BoundsRegistry;
use crate::config::{HeaderConfig, ordered_bounds};
use crate::error::{HeaderError, HeaderResult};
use crate::geometry::Point;
use crate::model::{ColumnId, ColumnModel, HeaderDescriptor};

/// Accessibility description of a column's resize handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeHandleInfo {
    /// "Resize {label} column".
    pub label: String,
    pub value: f32,
    pub min: f32,
    pub max: f32,
    /// Reachable with Tab. Off while the column is the drag source.
    pub tabbable: bool,
    /// Hidden while any drag is in progress.
    pub hidden: bool,
    /// This column is being resized.
    pub active: bool,
}

struct ResizeSession {
    column: ColumnId,
    lease: GestureLease,
    start_x: f32,
    start_size: f32,
    preview: f32,
}

/// Per-column sizing against a [`ColumnModel`].
pub struct ResizeController {
    model: Arc<dyn ColumnModel>,
    arbiter: Arc<GestureArbiter>,
    config: HeaderConfig,
    session: Mutex<Option<ResizeSession>>,
    /// Live size while a resize is in progress: (column, size).
    pub preview_changed: Signal<(ColumnId, f32)>,
    /// Emitted after a size was written to the model.
    pub size_committed: Signal<(ColumnId, f32)>,
}

impl ResizeController {
    pub fn new(model: Arc<dyn ColumnModel>, arbiter: Arc<GestureArbiter>, config: HeaderConfig) -> Self {
        Self {
            model,
            arbiter,
            config,
            session: Mutex::new(None),
            preview_changed: Signal::new(),
            size_committed: Signal::new(),
        }
    }

    pub fn config(&self) -> &HeaderConfig {
        &self.config
    }

    /// `(min, max)` for a column, column overrides first.
    pub fn bounds(&self, column: &ColumnId) -> (f32, f32) {
        match self.model.header(column) {
            Some(header) => self.bounds_of(&header),
            None => self.config.size_bounds(),
        }
    }

    fn bounds_of(&self, header: &HeaderDescriptor) -> (f32, f32) {
        let min = header.size_overrides.min_size.unwrap_or(self.config.min_size);
        let max = header.size_overrides.max_size.unwrap_or(self.config.max_size);
        ordered_bounds(min, max)
    }

    /// Size a column returns to on reset.
    pub fn default_size(&self, column: &ColumnId) -> f32 {
        let (min, max) = self.bounds(column);
        self.model
            .header(column)
            .and_then(|header| header.size_overrides.default_size)
            .unwrap_or(self.config.default_size)
            .clamp(min, max)
    }

    /// Clamp `size` into the column's bounds.
    pub fn clamp(&self, column: &ColumnId, size: f32) -> f32 {
        let (min, max) = self.bounds(column);
        size.clamp(min, max)
    }

    /// The live size: the preview while resizing, else the stored size, else
    /// the default.
    pub fn size(&self, column: &ColumnId) -> f32 {
        if let Some(session) = self.session.lock().as_ref()
            && session.column == *column
        {
            return session.preview;
        }
        match self.model.header(column) {
            Some(header) => {
                let (min, max) = self.bounds_of(&header);
                header
                    .size
                    .or(header.size_overrides.default_size)
                    .unwrap_or(self.config.default_size)
                    .clamp(min, max)
            }
            None => self.config.clamped_default_size(),
        }
    }

    /// The column whose trailing edge lies within the grab radius of `point`.
    pub fn handle_at(&self, point: Point, bounds: &BoundsRegistry) -> Option<ColumnId> {
        let radius = self.config.resize_grab_radius;
        let mut best: Option<(&ColumnId, f32)> = None;
        for (id, rect) in bounds.iter() {
            if point.y < rect.top() || point.y >= rect.bottom() {
                continue;
            }
            let distance = (point.x - rect.right()).abs();
            if distance > radius || !self.is_resizable(id) {
                continue;
            }
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((id, distance));
            }
        }
        best.map(|(id, _)| id.clone())
    }

    pub fn is_resizable(&self, column: &ColumnId) -> bool {
        self.model
            .header(column)
            .is_some_and(|header| header.capabilities.resizable)
    }

    /// `true` while a resize session is open on any column.
    pub fn is_resizing(&self) -> bool {
        self.session.lock().is_some()
    }

    /// The handler for a column's resize handle.
    pub fn resize_handler(&self, column: &ColumnId) -> ResizeHandler<'_> {
        let enabled = self.handler_enabled(column);
        if !enabled {
            tracing::trace!(target: targets::RESIZE, %column, "resize handler disabled");
        }
        ResizeHandler {
            controller: self,
            column: column.clone(),
            enabled,
        }
    }

    fn handler_enabled(&self, column: &ColumnId) -> bool {
        if self.arbiter.is_dragging() || !self.is_resizable(column) {
            return false;
        }
        self.arbiter
            .resizing_column()
            .is_none_or(|resizing| resizing == *column)
    }

    /// Reset a column to its default size. Ignored while any gesture runs.
    pub fn reset_to_default(&self, column: &ColumnId) -> bool {
        if self.arbiter.is_busy() {
            tracing::debug!(target: targets::RESIZE, %column, "reset ignored while busy");
            return false;
        }
        if !self.is_resizable(column) {
            return false;
        }
        let size = self.default_size(column);
        self.write(column, size).is_ok()
    }

    /// Accessibility info for a column's handle.
    pub fn handle_info(&self, column: &ColumnId) -> Option<ResizeHandleInfo> {
        let header = self.model.header(column)?;
        if !header.capabilities.resizable {
            return None;
        }
        let (min, max) = self.bounds_of(&header);
        let drag = self.arbiter.drag();
        Some(ResizeHandleInfo {
            label: format!("Resize {} column", header.label),
            value: self.size(column),
            min,
            max,
            tabbable: drag.as_ref().is_none_or(|drag| drag.active != *column),
            hidden: drag.is_some(),
            active: self.arbiter.resizing_column().as_ref() == Some(column),
        })
    }

    /// Abort any open resize, restoring the committed size.
    pub fn cancel(&self) {
        let Some(session) = self.session.lock().take() else {
            return;
        };
        tracing::debug!(target: targets::RESIZE, column = %session.column, "resize cancelled");
        let column = session.column.clone();
        let restored = session.start_size;
        session.lease.abort();
        self.preview_changed.emit((column, restored));
    }

    fn press(&self, column: &ColumnId, x: f32) -> bool {
        let start_size = self.size(column);
        let claimed = self.arbiter.lease_resize_into(column, |lease| {
            *self.session.lock() = Some(ResizeSession {
                column: column.clone(),
                lease,
                start_x: x,
                start_size,
                preview: start_size,
            });
        });
        if !claimed {
            return false;
        }
        tracing::debug!(target: targets::RESIZE, %column, start_size, "resize started");
        true
    }

    fn drag_to(&self, column: &ColumnId, x: f32) -> Option<f32> {
        let (start_x, start_size) = {
            let session = self.session.lock();
            let session = session.as_ref().filter(|s| s.column == *column)?;
            (session.start_x, session.start_size)
        };
        let size = self.clamp(column, start_size + (x - start_x));
        self.set_preview(column, size)
    }

    fn set_preview(&self, column: &ColumnId, size: f32) -> Option<f32> {
        {
            let mut session = self.session.lock();
            let session = session.as_mut().filter(|s| s.column == *column)?;
            if session.preview == size {
                return Some(size);
            }
            session.preview = size;
        }
        tracing::trace!(target: targets::RESIZE, %column, size, "resize preview");
        self.preview_changed.emit((column.clone(), size));
        Some(size)
    }

    fn release(&self, column: &ColumnId) -> Option<f32> {
        let session = {
            let mut slot = self.session.lock();
            if slot.as_ref().is_none_or(|s| s.column != *column) {
                return None;
            }
            slot.take()?
        };
        let result = self.write(column, session.preview);
        session.lease.complete();
        match result {
            Ok(size) => Some(size),
            Err(error) => {
                tracing::debug!(target: targets::RESIZE, %error, "resize had no effect");
                None
            }
        }
    }

    fn adjust_by(&self, column: &ColumnId, delta: f32) -> Option<f32> {
        if self.session.lock().as_ref().is_some_and(|s| s.column == *column) {
            let current = self.size(column);
            return self.set_preview(column, self.clamp(column, current + delta));
        }
        let lease = self.arbiter.lease_resize(column)?;
        let size = self.clamp(column, self.size(column) + delta);
        let result = self.write(column, size);
        lease.complete();
        result.ok()
    }

    fn write(&self, column: &ColumnId, size: f32) -> HeaderResult<f32> {
        let size = self.clamp(column, size);
        if !self.model.set_column_size(column, size) {
            return Err(HeaderError::StaleColumn(column.clone()));
        }
        tracing::debug!(target: targets::RESIZE, %column, size, "column size committed");
        self.size_committed.emit((column.clone(), size));
        Ok(size)
    }
}

/// Pointer and keyboard entry points for one column's resize handle.
///
/// A disabled handler accepts every call and does nothing.
pub struct ResizeHandler<'a> {
    controller: &'a ResizeController,
    column: ColumnId,
    enabled: bool,
}

impl ResizeHandler<'_> {
    pub fn column(&self) -> &ColumnId {
        &self.column
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Grab the handle at pointer x. Returns `true` if the resize started.
    pub fn press(&self, x: f32) -> bool {
        self.enabled && self.controller.press(&self.column, x)
    }

    /// Follow the pointer. Returns the clamped preview size.
    pub fn drag_to(&self, x: f32) -> Option<f32> {
        if !self.enabled {
            return None;
        }
        self.controller.drag_to(&self.column, x)
    }

    /// Let go of the handle, committing the preview.
    pub fn release(&self) -> Option<f32> {
        if !self.enabled {
            return None;
        }
        self.controller.release(&self.column)
    }

    /// Keyboard nudge by `delta` pixels.
    pub fn adjust_by(&self, delta: f32) -> Option<f32> {
        if !self.enabled {
            return None;
        }
        self.controller.adjust_by(&self.column, delta)
    }

    pub fn cancel(&self) {
        if self.enabled {
            self.controller.cancel();
        }
    }
}

static_assertions::assert_impl_all!(ResizeController: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::{Column, ColumnCapabilities, ColumnTable};

    fn setup() -> (Arc<ColumnTable>, Arc<GestureArbiter>, ResizeController) {
        let table = Arc::new(ColumnTable::new(vec![
            Column::new("A").with_label("Alpha"),
            Column::new("B").with_size(200.0),
            Column::new("C").with_size_bounds(100.0, 300.0).with_default_size(120.0),
            Column::new("D").with_capabilities(ColumnCapabilities {
                resizable: false,
                ..ColumnCapabilities::all()
            }),
        ]));
        let arbiter = Arc::new(GestureArbiter::new());
        let resize = ResizeController::new(table.clone(), arbiter.clone(), HeaderConfig::default());
        (table, arbiter, resize)
    }

    #[test]
    fn test_size_defaults() {
        let (_, _, resize) = setup();
        assert_eq!(resize.size(&"A".into()), 150.0);
        assert_eq!(resize.size(&"B".into()), 200.0);
        assert_eq!(resize.size(&"C".into()), 120.0);
        assert_eq!(resize.size(&"ghost".into()), 150.0);
    }

    #[test]
    fn test_drag_clamps_and_commits_on_release() {
        let (table, arbiter, resize) = setup();
        let handler = resize.resize_handler(&"A".into());
        assert!(handler.press(300.0));
        assert!(arbiter.is_busy());

        assert_eq!(handler.drag_to(2000.0), Some(800.0));
        assert_eq!(handler.drag_to(-2000.0), Some(60.0));
        assert_eq!(handler.drag_to(350.0), Some(200.0));
        assert_eq!(table.header(&"A".into()).unwrap().size, None);

        assert_eq!(handler.release(), Some(200.0));
        assert_eq!(table.header(&"A".into()).unwrap().size, Some(200.0));
        assert!(!arbiter.is_busy());
    }

    #[test]
    fn test_per_column_bounds() {
        let (_, _, resize) = setup();
        let handler = resize.resize_handler(&"C".into());
        handler.press(0.0);
        assert_eq!(handler.drag_to(-500.0), Some(100.0));
        assert_eq!(handler.drag_to(500.0), Some(300.0));
    }

    #[test]
    fn test_handler_disabled_while_dragging() {
        let (table, arbiter, resize) = setup();
        arbiter.begin_drag(&"B".into());
        let handler = resize.resize_handler(&"A".into());
        assert!(!handler.is_enabled());
        assert!(!handler.press(10.0));
        assert_eq!(handler.adjust_by(10.0), None);
        assert_eq!(table.header(&"A".into()).unwrap().size, None);
    }

    #[test]
    fn test_handler_disabled_for_other_column_while_resizing() {
        let (_, _, resize) = setup();
        let a = resize.resize_handler(&"A".into());
        a.press(0.0);
        assert!(!resize.resize_handler(&"B".into()).is_enabled());
        assert!(resize.resize_handler(&"A".into()).is_enabled());
    }

    #[test]
    fn test_cancel_restores() {
        let (table, arbiter, resize) = setup();
        let handler = resize.resize_handler(&"B".into());
        handler.press(0.0);
        handler.drag_to(100.0);
        assert_eq!(resize.size(&"B".into()), 300.0);
        handler.cancel();
        assert_eq!(resize.size(&"B".into()), 200.0);
        assert_eq!(table.header(&"B".into()).unwrap().size, Some(200.0));
        assert!(!arbiter.is_busy());
    }

    #[test]
    fn test_reset_ignored_while_busy() {
        let (table, arbiter, resize) = setup();
        arbiter.begin_drag(&"A".into());
        assert!(!resize.reset_to_default(&"B".into()));
        arbiter.end();
        assert!(resize.reset_to_default(&"B".into()));
        assert_eq!(table.header(&"B".into()).unwrap().size, Some(150.0));
    }

    #[test]
    fn test_keyboard_adjust() {
        let (table, arbiter, resize) = setup();
        let handler = resize.resize_handler(&"B".into());
        assert_eq!(handler.adjust_by(10.0), Some(210.0));
        assert_eq!(table.header(&"B".into()).unwrap().size, Some(210.0));
        assert!(!arbiter.is_busy());
    }

    #[test]
    fn test_non_resizable_column() {
        let (_, _, resize) = setup();
        assert!(!resize.resize_handler(&"D".into()).is_enabled());
        assert!(resize.handle_info(&"D".into()).is_none());
    }

    #[test]
    fn test_handle_at() {
        let (_, _, resize) = setup();
        let bounds = BoundsRegistry::from_layout([
            (ColumnId::from("A"), Rect::new(0.0, 0.0, 150.0, 36.0)),
            (ColumnId::from("D"), Rect::new(150.0, 0.0, 150.0, 36.0)),
        ]);
        assert_eq!(resize.handle_at(Point::new(145.0, 10.0), &bounds), Some("A".into()));
        assert_eq!(resize.handle_at(Point::new(100.0, 10.0), &bounds), None);
        assert_eq!(resize.handle_at(Point::new(298.0, 10.0), &bounds), None);
    }

    #[test]
    fn test_handle_info() {
        let (_, arbiter, resize) = setup();
        let info = resize.handle_info(&"A".into()).unwrap();
        assert_eq!(info.label, "Resize Alpha column");
        assert_eq!((info.min, info.max, info.value), (60.0, 800.0, 150.0));
        assert!(info.tabbable && !info.hidden && !info.active);

        arbiter.begin_drag(&"A".into());
        let info = resize.handle_info(&"A".into()).unwrap();
        assert!(!info.tabbable && info.hidden);
    }

    #[test]
    fn test_session_visible_during_start_announcement() {
        let (_, arbiter, resize) = setup();
        let resize = Arc::new(resize);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (weak, seen_clone) = (Arc::downgrade(&resize), seen.clone());
        arbiter.state_changed.connect(move |state| {
            if let Some(resize) = weak.upgrade() {
                seen_clone.lock().push((state.name(), resize.is_resizing()));
            }
        });

        assert!(resize.resize_handler(&"A".into()).press(150.0));
        assert_eq!(*seen.lock(), vec![("resize", true)]);
    }

    #[test]
    fn test_inverted_config_bounds_do_not_panic() {
        let table = Arc::new(ColumnTable::new(vec![Column::new("A")]));
        let config = HeaderConfig::default().with_size_bounds(500.0, 100.0);
        let resize = ResizeController::new(table, Arc::new(GestureArbiter::new()), config);
        assert_eq!(resize.bounds(&"ghost".into()), (500.0, 500.0));
        assert_eq!(resize.size(&"ghost".into()), 500.0);
        assert_eq!(resize.size(&"A".into()), 500.0);
        assert_eq!(resize.clamp(&"ghost".into(), 20.0), 500.0);
    }
}
