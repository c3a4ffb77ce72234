//! The header row: one header per visible column, wired to the controllers.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use gridhead_core::logging::targets;
use gridhead_core::{PerfSpan, Signal};

use super::arbiter::GestureArbiter;
use super::chain::{HandlerChain, RouteContext};
use super::events::{EventDisposition, Key, KeyTarget, PointerEvent};
use super::menu::{HeaderMenuController, MenuAction, MenuEntry};
use super::probe::BoundsRegistry;
use super::reorder::{DragSnapshot, ReorderController};
use super::resize::{ResizeController, ResizeHandleInfo};
use super::snapshot::{AriaSort, DirtyFields, HeaderSnapshot, dirty_fields};
use super::variant::ColumnVariantRegistry;
use crate::config::HeaderConfig;
use crate::error::HeaderResult;
use crate::geometry::{Point, Rect};
use crate::model::{ColumnId, ColumnModel, StepDirection};

/// Placement of the floating drag preview.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOverlay {
    pub active_id: ColumnId,
    /// Width of the dragged column.
    pub width: f32,
    /// Height of the grid body.
    pub height: f32,
    /// Top of the header row.
    pub top: f32,
    pub drag_x: Option<f32>,
}

/// Composition root for a grid's column headers.
///
/// Owns the gesture arbiter and the three controllers, routes pointer and
/// keyboard input through a [`HandlerChain`], and publishes
/// [`HeaderSnapshot`]s with per-header dirty flags after every event.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use gridhead::{ColumnHeaderRow, HeaderConfig};
/// use gridhead::header::PointerEvent;
/// use gridhead::model::{Column, ColumnModel, ColumnTable};
///
/// let table = Arc::new(ColumnTable::new(vec![Column::new("a"), Column::new("b")]));
/// let row = ColumnHeaderRow::new(table.clone(), HeaderConfig::default());
///
/// row.handle_pointer(PointerEvent::down(20.0, 10.0));
/// row.handle_pointer(PointerEvent::moved(60.0, 10.0));
/// assert!(row.is_any_dragging());
/// row.handle_pointer(PointerEvent::up(200.0, 10.0));
///
/// let order: Vec<String> = table.effective_order().ids().iter().map(|id| id.to_string()).collect();
/// assert_eq!(order, ["b", "a"]);
/// ```
pub struct ColumnHeaderRow {
    model: Arc<dyn ColumnModel>,
    config: HeaderConfig,
    arbiter: Arc<GestureArbiter>,
    reorder: ReorderController,
    resize: ResizeController,
    menu: HeaderMenuController,
    variants: ColumnVariantRegistry,
    chain: HandlerChain,
    origin: RwLock<Point>,
    bounds: RwLock<BoundsRegistry>,
    published: Mutex<Vec<HeaderSnapshot>>,
    /// Headers whose presentation changed, with the changed fields.
    pub headers_changed: Signal<Vec<(ColumnId, DirtyFields)>>,
}

impl ColumnHeaderRow {
    /// Create a row at the viewport origin.
    ///
    /// A config that fails [`HeaderConfig::validate`] is normalized first.
    pub fn new(model: Arc<dyn ColumnModel>, config: HeaderConfig) -> Self {
        let config = config.normalized();
        let arbiter = Arc::new(GestureArbiter::new());
        let row = Self {
            reorder: ReorderController::new(model.clone(), arbiter.clone()),
            resize: ResizeController::new(model.clone(), arbiter.clone(), config.clone()),
            menu: HeaderMenuController::new(model.clone(), arbiter.clone()),
            variants: ColumnVariantRegistry::new(),
            chain: HandlerChain::standard(config.drag_activation_distance),
            origin: RwLock::new(Point::ZERO),
            bounds: RwLock::new(BoundsRegistry::new()),
            published: Mutex::new(Vec::new()),
            headers_changed: Signal::new(),
            model,
            config,
            arbiter,
        };
        row.relayout(Point::ZERO);
        *row.published.lock() = row.header_states();
        row
    }

    pub fn config(&self) -> &HeaderConfig {
        &self.config
    }

    pub fn model(&self) -> &Arc<dyn ColumnModel> {
        &self.model
    }

    pub fn arbiter(&self) -> &Arc<GestureArbiter> {
        &self.arbiter
    }

    pub fn reorder(&self) -> &ReorderController {
        &self.reorder
    }

    pub fn resize(&self) -> &ResizeController {
        &self.resize
    }

    pub fn menu(&self) -> &HeaderMenuController {
        &self.menu
    }

    /// Last measured header rectangles.
    pub fn bounds(&self) -> BoundsRegistry {
        self.bounds.read().clone()
    }

    /// Lay the visible headers out left to right from `origin`.
    pub fn relayout(&self, origin: Point) {
        *self.origin.write() = origin;
        let mut x = origin.x;
        let layout: Vec<(ColumnId, Rect)> = self
            .model
            .visible_headers()
            .into_iter()
            .map(|header| {
                let width = self.resize.size(&header.id);
                let rect = Rect::new(x, origin.y, width, self.config.header_height);
                x += width;
                (header.id, rect)
            })
            .collect();
        *self.bounds.write() = BoundsRegistry::from_layout(layout);
    }

    /// Replace the layout with externally measured rectangles.
    pub fn set_bounds(&self, bounds: BoundsRegistry) {
        *self.bounds.write() = bounds;
    }

    /// Route a pointer event.
    pub fn handle_pointer(&self, event: PointerEvent) -> EventDisposition {
        let _span = PerfSpan::new("header_pointer");
        let bounds = self.bounds();
        let ctx = RouteContext {
            arbiter: &self.arbiter,
            reorder: &self.reorder,
            resize: &self.resize,
            menu: &self.menu,
            bounds: &bounds,
        };
        let dispatch = self.chain.dispatch(&event, &ctx);
        if dispatch.handled_by.is_some() {
            self.after_event();
        }
        dispatch.disposition
    }

    /// Route a key press on a focused header or resize handle.
    pub fn handle_key(&self, target: &KeyTarget, key: Key) -> EventDisposition {
        let consumed = match target {
            KeyTarget::Header(column) => self.header_key(column, key),
            KeyTarget::ResizeHandle(column) => self.resize_key(column, key),
        };
        if consumed {
            self.after_event();
        }
        consumed.into()
    }

    fn header_key(&self, column: &ColumnId, key: Key) -> bool {
        let bounds = self.bounds();
        if self.reorder.is_active() {
            match key {
                Key::Space | Key::Enter => {
                    self.reorder.drop_on_current();
                }
                Key::ArrowLeft => {
                    self.reorder.step(StepDirection::Previous, &bounds);
                }
                Key::ArrowRight => {
                    self.reorder.step(StepDirection::Next, &bounds);
                }
                Key::Escape => self.reorder.cancel(),
                Key::Other => return false,
            }
            return true;
        }
        match key {
            Key::Space | Key::Enter => {
                self.menu.close();
                self.reorder.start(column)
            }
            _ => false,
        }
    }

    fn resize_key(&self, column: &ColumnId, key: Key) -> bool {
        let step = self.config.keyboard_resize_step;
        let delta = match key {
            Key::ArrowLeft => -step,
            Key::ArrowRight => step,
            _ => return false,
        };
        self.resize.resize_handler(column).adjust_by(delta).is_some()
    }

    /// Perform a menu entry's action and close the menu.
    pub fn activate_menu(&self, action: MenuAction) -> HeaderResult<bool> {
        let result = self.menu.activate(action);
        self.after_event();
        result
    }

    /// Entries for the open menu.
    pub fn menu_entries(&self) -> Option<Vec<MenuEntry>> {
        let state = self.menu.state()?;
        self.menu.entries(&state.column).ok()
    }

    fn after_event(&self) {
        if self.arbiter.is_busy() {
            self.menu.close();
        }
        self.refresh_layout();
        self.refresh();
    }

    fn refresh_layout(&self) {
        let origin = *self.origin.read();
        self.relayout(origin);
    }

    /// Recompute header snapshots and publish the ones that changed.
    ///
    /// Hosts call this after changing the model behind the row's back.
    pub fn refresh(&self) -> Vec<(ColumnId, DirtyFields)> {
        let next = self.header_states();
        let changes: Vec<(ColumnId, DirtyFields)> = {
            let mut published = self.published.lock();
            let changes = next
                .iter()
                .filter_map(|snapshot| {
                    let dirty = published
                        .iter()
                        .find(|prev| prev.id == snapshot.id)
                        .map_or(DirtyFields::ALL, |prev| dirty_fields(prev, snapshot));
                    (!dirty.is_empty()).then(|| (snapshot.id.clone(), dirty))
                })
                .collect();
            *published = next;
            changes
        };
        if !changes.is_empty() {
            tracing::trace!(target: targets::INPUT, changed = changes.len(), "headers changed");
            self.headers_changed.emit(changes.clone());
        }
        changes
    }

    /// Presentation state of every visible header, left to right.
    pub fn header_states(&self) -> Vec<HeaderSnapshot> {
        let drag = self.arbiter.drag();
        let resizing = self.arbiter.resizing_column();
        let busy = drag.is_some() || resizing.is_some();

        self.model
            .visible_headers()
            .into_iter()
            .enumerate()
            .map(|(index, header)| {
                let is_dragging = drag.as_ref().is_some_and(|d| d.active == header.id);
                let is_over = drag
                    .as_ref()
                    .is_some_and(|d| d.over.as_ref() == Some(&header.id) && d.active != header.id);
                HeaderSnapshot {
                    col_index: index + 1,
                    aria_sort: AriaSort::from_state(header.capabilities.sortable, header.sorted),
                    pinned: header.pinned,
                    size: self.resize.size(&header.id),
                    variant: header.variant,
                    variant_info: self.variants.lookup(header.variant),
                    is_dragging,
                    is_over,
                    highlight_side: if is_over {
                        drag.as_ref().and_then(|d| d.highlight)
                    } else {
                        None
                    },
                    is_any_dragging: drag.is_some(),
                    is_resizing: resizing.as_ref() == Some(&header.id),
                    interaction_suppressed: busy,
                    label: header.label,
                    id: header.id,
                }
            })
            .collect()
    }

    /// Live drag state for the overlay.
    pub fn drag_snapshot(&self) -> DragSnapshot {
        self.reorder.snapshot_with_bounds(&self.bounds.read())
    }

    /// Overlay placement while a drag is in progress.
    pub fn drag_overlay(&self) -> Option<DragOverlay> {
        let snapshot = self.drag_snapshot();
        let active_id = snapshot.active_id?;
        Some(DragOverlay {
            width: self.resize.size(&active_id),
            height: self.config.grid_height,
            top: self.origin.read().y,
            drag_x: snapshot.drag_x,
            active_id,
        })
    }

    pub fn is_any_dragging(&self) -> bool {
        self.arbiter.is_dragging()
    }

    pub fn resize_handle_info(&self, column: &ColumnId) -> Option<ResizeHandleInfo> {
        self.resize.handle_info(column)
    }

    /// Abort whatever gesture is running and close the menu.
    pub fn cancel_gestures(&self) {
        self.chain.reset();
        self.reorder.cancel();
        self.resize.cancel();
        self.menu.close();
    }
}

impl Drop for ColumnHeaderRow {
    fn drop(&mut self) {
        if self.arbiter.is_busy() {
            tracing::debug!(target: targets::GESTURE, "header row dropped mid-gesture");
        }
        self.cancel_gestures();
    }
}

static_assertions::assert_impl_all!(ColumnHeaderRow: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::HighlightSide;
    use crate::model::{Column, ColumnTable, ColumnVariant};

    fn row() -> (Arc<ColumnTable>, ColumnHeaderRow) {
        let table = Arc::new(ColumnTable::new(vec![
            Column::new("A").with_variant(ColumnVariant::Number),
            Column::new("B"),
            Column::new("C"),
            Column::new("D"),
        ]));
        let row = ColumnHeaderRow::new(table.clone(), HeaderConfig::default());
        (table, row)
    }

    #[test]
    fn test_layout_uses_sizes() {
        let (_, row) = row();
        let bounds = row.bounds();
        assert_eq!(bounds.get(&"C".into()), Some(Rect::new(300.0, 0.0, 150.0, 36.0)));
    }

    #[test]
    fn test_header_states_during_drag() {
        let (_, row) = row();
        row.handle_pointer(PointerEvent::down(20.0, 10.0));
        row.handle_pointer(PointerEvent::moved(40.0, 10.0));
        row.handle_pointer(PointerEvent::moved(320.0, 10.0));

        let states = row.header_states();
        assert!(states[0].is_dragging && !states[0].is_over);
        assert!(states[2].is_over);
        assert_eq!(states[2].highlight_side, Some(HighlightSide::After));
        assert!(states.iter().all(|s| s.is_any_dragging && s.interaction_suppressed));
        assert_eq!(states[0].variant_info.map(|v| v.label), Some("Number"));
    }

    #[test]
    fn test_overlay() {
        let (_, row) = row();
        assert!(row.drag_overlay().is_none());
        row.relayout(Point::new(0.0, 50.0));
        row.handle_key(&KeyTarget::Header("B".into()), Key::Space);
        row.handle_key(&KeyTarget::Header("B".into()), Key::ArrowRight);

        let overlay = row.drag_overlay().unwrap();
        assert_eq!(overlay.active_id, "B");
        assert_eq!((overlay.width, overlay.height, overlay.top), (150.0, 600.0, 50.0));
        assert_eq!(overlay.drag_x, Some(375.0));
    }

    #[test]
    fn test_keyboard_reorder() {
        let (table, row) = row();
        let header = KeyTarget::Header("D".into());
        assert!(row.handle_key(&header, Key::Enter).is_consumed());
        row.handle_key(&header, Key::ArrowLeft);
        row.handle_key(&header, Key::ArrowLeft);
        row.handle_key(&header, Key::Enter);

        let order: Vec<String> = table.effective_order().ids().iter().map(ToString::to_string).collect();
        assert_eq!(order, ["A", "D", "B", "C"]);
        assert!(!row.is_any_dragging());
    }

    #[test]
    fn test_escape_cancels_keyboard_drag() {
        let (table, row) = row();
        let header = KeyTarget::Header("A".into());
        row.handle_key(&header, Key::Space);
        row.handle_key(&header, Key::ArrowRight);
        row.handle_key(&header, Key::Escape);
        assert_eq!(table.effective_order().index_of(&"A".into()), Some(0));
        assert!(!row.arbiter().is_busy());
    }

    #[test]
    fn test_refresh_reports_dirty_headers() {
        let (table, row) = row();
        row.refresh();
        table.set_column_size(&"B".into(), 220.0);
        let changes = row.refresh();
        assert_eq!(changes, vec![(ColumnId::from("B"), DirtyFields::SIZE)]);
    }

    #[test]
    fn test_drop_mid_drag_releases_arbiter() {
        let (_, row) = row();
        let arbiter = row.arbiter().clone();
        row.handle_key(&KeyTarget::Header("A".into()), Key::Space);
        assert!(arbiter.is_busy());
        drop(row);
        assert!(!arbiter.is_busy());
    }
}
