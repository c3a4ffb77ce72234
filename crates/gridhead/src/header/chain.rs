//! Pointer routing.
//!
//! A pointer event walks a [`HandlerChain`] of named interceptors in a fixed
//! order. The first interceptor that stops the walk decides what the event
//! meant. The standard chain is:
//!
//! 1. `resize-handle`: presses near a column's trailing edge and the events
//!    of a resize in progress.
//! 2. `arbiter-gate`: while a gesture runs, everything else goes to the drag
//!    in progress or is swallowed.
//! 3. `drag-activation`: a press on a header becomes a reorder drag once the
//!    pointer has travelled past the activation distance.
//! 4. `context-menu`: opens the header menu.

use parking_lot::Mutex;

use gridhead_core::logging::targets;

use super::arbiter::GestureArbiter;
use super::events::{EventDisposition, PointerEvent, PointerEventKind};
use super::menu::HeaderMenuController;
use super::probe::BoundsRegistry;
use super::reorder::ReorderController;
use super::resize::ResizeController;
use crate::geometry::Point;
use crate::model::ColumnId;

/// Everything an interceptor may act on.
pub struct RouteContext<'a> {
    pub arbiter: &'a GestureArbiter,
    pub reorder: &'a ReorderController,
    pub resize: &'a ResizeController,
    pub menu: &'a HeaderMenuController,
    pub bounds: &'a BoundsRegistry,
}

/// Interceptor verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Pass the event to the next interceptor.
    Continue,
    /// Stop here.
    Stop(EventDisposition),
}

/// One stage of a [`HandlerChain`].
pub trait Interceptor: Send + Sync {
    fn name(&self) -> &'static str;

    fn intercept(&self, event: &PointerEvent, ctx: &RouteContext<'_>) -> Flow;

    /// Drop any per-press state, e.g. when the row is torn down.
    fn reset(&self) {}
}

/// Result of dispatching one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub disposition: EventDisposition,
    /// Name of the interceptor that stopped the walk.
    pub handled_by: Option<&'static str>,
}

/// Ordered interceptors.
#[derive(Default)]
pub struct HandlerChain {
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard resize -> gate -> drag -> menu chain.
    pub fn standard(drag_activation_distance: f32) -> Self {
        let mut chain = Self::new();
        chain.push(ResizeHandleInterceptor);
        chain.push(ArbiterGate);
        chain.push(DragActivator::new(drag_activation_distance));
        chain.push(ContextMenuTrigger);
        chain
    }

    pub fn push(&mut self, interceptor: impl Interceptor + 'static) {
        self.interceptors.push(Box::new(interceptor));
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    pub fn dispatch(&self, event: &PointerEvent, ctx: &RouteContext<'_>) -> Dispatch {
        for interceptor in &self.interceptors {
            if let Flow::Stop(disposition) = interceptor.intercept(event, ctx) {
                tracing::trace!(
                    target: targets::INPUT,
                    kind = ?event.kind,
                    handled_by = interceptor.name(),
                    ?disposition,
                    "pointer event routed"
                );
                return Dispatch {
                    disposition,
                    handled_by: Some(interceptor.name()),
                };
            }
        }
        Dispatch {
            disposition: EventDisposition::Ignored,
            handled_by: None,
        }
    }

    pub fn reset(&self) {
        for interceptor in &self.interceptors {
            interceptor.reset();
        }
    }
}

/// Grabs resize handles and drives the resize in progress.
pub struct ResizeHandleInterceptor;

impl Interceptor for ResizeHandleInterceptor {
    fn name(&self) -> &'static str {
        "resize-handle"
    }

    fn intercept(&self, event: &PointerEvent, ctx: &RouteContext<'_>) -> Flow {
        if ctx.resize.is_resizing()
            && let Some(column) = ctx.arbiter.resizing_column()
        {
            let handler = ctx.resize.resize_handler(&column);
            match event.kind {
                PointerEventKind::Move => {
                    handler.drag_to(event.position.x);
                }
                PointerEventKind::Up => {
                    handler.release();
                }
                PointerEventKind::Cancel => handler.cancel(),
                _ => return Flow::Continue,
            }
            return Flow::Stop(EventDisposition::Consumed);
        }

        match event.kind {
            PointerEventKind::Down if event.is_primary() => {
                match ctx.resize.handle_at(event.position, ctx.bounds) {
                    Some(column) if ctx.resize.resize_handler(&column).press(event.position.x) => {
                        Flow::Stop(EventDisposition::Consumed)
                    }
                    _ => Flow::Continue,
                }
            }
            PointerEventKind::DoubleClick => match ctx.resize.handle_at(event.position, ctx.bounds) {
                Some(column) => {
                    ctx.resize.reset_to_default(&column);
                    Flow::Stop(EventDisposition::Consumed)
                }
                None => Flow::Continue,
            },
            _ => Flow::Continue,
        }
    }
}

/// While a gesture is active, feeds the drag and swallows everything else.
pub struct ArbiterGate;

impl Interceptor for ArbiterGate {
    fn name(&self) -> &'static str {
        "arbiter-gate"
    }

    fn intercept(&self, event: &PointerEvent, ctx: &RouteContext<'_>) -> Flow {
        if !ctx.arbiter.is_busy() {
            return Flow::Continue;
        }
        if ctx.reorder.is_active() {
            match event.kind {
                PointerEventKind::Move => {
                    ctx.reorder.move_to(event.position, ctx.bounds);
                }
                PointerEventKind::Up => {
                    ctx.reorder.move_to(event.position, ctx.bounds);
                    ctx.reorder.drop_on_current();
                }
                PointerEventKind::Cancel => ctx.reorder.cancel(),
                _ => {}
            }
        }
        Flow::Stop(EventDisposition::Consumed)
    }
}

#[derive(Debug, Clone)]
struct PendingPress {
    column: ColumnId,
    origin: Point,
}

/// Turns a press that travels far enough into a reorder drag.
pub struct DragActivator {
    distance: f32,
    pending: Mutex<Option<PendingPress>>,
}

impl DragActivator {
    pub fn new(distance: f32) -> Self {
        Self {
            distance,
            pending: Mutex::new(None),
        }
    }
}

impl Interceptor for DragActivator {
    fn name(&self) -> &'static str {
        "drag-activation"
    }

    fn intercept(&self, event: &PointerEvent, ctx: &RouteContext<'_>) -> Flow {
        match event.kind {
            PointerEventKind::Down if event.is_primary() => {
                *self.pending.lock() = ctx.bounds.column_at(event.position).map(|column| PendingPress {
                    column: column.clone(),
                    origin: event.position,
                });
                Flow::Continue
            }
            PointerEventKind::Move => {
                let press = {
                    let mut pending = self.pending.lock();
                    match pending.as_ref() {
                        Some(press) if press.origin.distance_to(event.position) > self.distance => {
                            pending.take()
                        }
                        _ => None,
                    }
                };
                let Some(press) = press else {
                    return Flow::Continue;
                };
                ctx.menu.close();
                if !ctx.reorder.start(&press.column) {
                    return Flow::Continue;
                }
                ctx.reorder.move_to(event.position, ctx.bounds);
                Flow::Stop(EventDisposition::Consumed)
            }
            PointerEventKind::Up | PointerEventKind::Cancel => {
                self.reset();
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn reset(&self) {
        self.pending.lock().take();
    }
}

/// Opens the header menu on a context-menu request.
pub struct ContextMenuTrigger;

impl Interceptor for ContextMenuTrigger {
    fn name(&self) -> &'static str {
        "context-menu"
    }

    fn intercept(&self, event: &PointerEvent, ctx: &RouteContext<'_>) -> Flow {
        if event.kind != PointerEventKind::ContextMenu {
            return Flow::Continue;
        }
        let Some(column) = ctx.bounds.column_at(event.position) else {
            return Flow::Continue;
        };
        if ctx.menu.open_at(column, event.position.x, event.position.y) {
            Flow::Stop(EventDisposition::Consumed)
        } else {
            Flow::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::HeaderConfig;
    use crate::geometry::Rect;
    use crate::model::{Column, ColumnModel, ColumnTable};

    struct Fixture {
        table: Arc<ColumnTable>,
        arbiter: Arc<GestureArbiter>,
        reorder: ReorderController,
        resize: ResizeController,
        menu: HeaderMenuController,
        bounds: BoundsRegistry,
        chain: HandlerChain,
    }

    impl Fixture {
        fn new() -> Self {
            let table = Arc::new(ColumnTable::new(
                ["A", "B", "C"].into_iter().map(Column::new).collect(),
            ));
            let arbiter = Arc::new(GestureArbiter::new());
            let bounds = BoundsRegistry::from_layout(
                ["A", "B", "C"]
                    .into_iter()
                    .enumerate()
                    .map(|(i, id)| (ColumnId::from(id), Rect::new(i as f32 * 150.0, 0.0, 150.0, 36.0))),
            );
            Self {
                reorder: ReorderController::new(table.clone(), arbiter.clone()),
                resize: ResizeController::new(table.clone(), arbiter.clone(), HeaderConfig::default()),
                menu: HeaderMenuController::new(table.clone(), arbiter.clone()),
                chain: HandlerChain::standard(8.0),
                table,
                arbiter,
                bounds,
            }
        }

        fn send(&self, event: PointerEvent) -> Dispatch {
            let ctx = RouteContext {
                arbiter: &self.arbiter,
                reorder: &self.reorder,
                resize: &self.resize,
                menu: &self.menu,
                bounds: &self.bounds,
            };
            self.chain.dispatch(&event, &ctx)
        }
    }

    #[test]
    fn test_standard_order() {
        assert_eq!(
            HandlerChain::standard(8.0).names(),
            ["resize-handle", "arbiter-gate", "drag-activation", "context-menu"]
        );
    }

    #[test]
    fn test_small_moves_stay_a_click() {
        let f = Fixture::new();
        f.send(PointerEvent::down(50.0, 10.0));
        let dispatch = f.send(PointerEvent::moved(56.0, 12.0));
        assert_eq!(dispatch.disposition, EventDisposition::Ignored);
        assert!(!f.arbiter.is_busy());
        f.send(PointerEvent::up(56.0, 12.0));
        assert!(!f.arbiter.is_busy());
    }

    #[test]
    fn test_press_on_edge_resizes_not_drags() {
        let f = Fixture::new();
        let dispatch = f.send(PointerEvent::down(148.0, 10.0));
        assert_eq!(dispatch.handled_by, Some("resize-handle"));
        assert_eq!(f.arbiter.resizing_column(), Some("A".into()));

        f.send(PointerEvent::moved(198.0, 10.0));
        assert!(!f.arbiter.is_dragging());
        f.send(PointerEvent::up(198.0, 10.0));
        assert_eq!(f.table.header(&"A".into()).unwrap().size, Some(200.0));
    }

    #[test]
    fn test_drag_activation_and_drop() {
        let f = Fixture::new();
        f.send(PointerEvent::down(50.0, 10.0));
        let dispatch = f.send(PointerEvent::moved(60.0, 10.0));
        assert_eq!(dispatch.handled_by, Some("drag-activation"));
        assert!(f.arbiter.is_dragging());

        let dispatch = f.send(PointerEvent::moved(400.0, 10.0));
        assert_eq!(dispatch.handled_by, Some("arbiter-gate"));
        f.send(PointerEvent::up(400.0, 10.0));

        let order: Vec<String> = f.table.effective_order().ids().iter().map(ToString::to_string).collect();
        assert_eq!(order, ["B", "C", "A"]);
        assert!(!f.arbiter.is_busy());
    }

    #[test]
    fn test_context_menu_blocked_during_drag() {
        let f = Fixture::new();
        f.send(PointerEvent::down(50.0, 10.0));
        f.send(PointerEvent::moved(80.0, 10.0));
        let dispatch = f.send(PointerEvent::context_menu(200.0, 10.0));
        assert_eq!(dispatch.handled_by, Some("arbiter-gate"));
        assert!(!f.menu.is_open());

        f.send(PointerEvent::cancel());
        assert!(f.send(PointerEvent::context_menu(200.0, 10.0)).disposition.is_consumed());
        assert_eq!(f.menu.state().unwrap().column, "B");
    }
}
