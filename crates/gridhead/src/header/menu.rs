//! Per-row header context menu.
//!
//! The menu offers sort, pin and hide actions for the column it was opened
//! on. It never opens while a gesture is running, and every action is a
//! single commit to the model.

use std::sync::Arc;

use gridhead_core::logging::targets;
use gridhead_core::{Property, Signal};

use super::arbiter::GestureArbiter;
use crate::error::{HeaderError, HeaderResult};
use crate::geometry::Point;
use crate::model::{ColumnId, ColumnModel, HeaderDescriptor, PinSide, SortDirection};

/// An open menu: the column and the viewport anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuState {
    pub column: ColumnId,
    pub anchor: Point,
}

/// Something a menu entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Sort by the column, keeping its place in a multi-column sort.
    Sort(SortDirection),
    /// Drop the column from the sort.
    RemoveSort,
    /// Pin to a side.
    Pin(PinSide),
    /// Release a pin.
    Unpin,
    /// Hide the column.
    Hide,
}

/// One row of the menu as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    Item {
        label: &'static str,
        action: MenuAction,
        checked: bool,
    },
    Separator,
}

impl MenuEntry {
    fn item(label: &'static str, action: MenuAction, checked: bool) -> Self {
        Self::Item { label, action, checked }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            Self::Item { label, .. } => Some(*label),
            Self::Separator => None,
        }
    }
}

/// Open/close state and actions of the header menu.
pub struct HeaderMenuController {
    model: Arc<dyn ColumnModel>,
    arbiter: Arc<GestureArbiter>,
    state: Property<Option<MenuState>>,
    /// Emitted with the new state when the menu opens.
    pub opened: Signal<MenuState>,
    /// Emitted when an open menu closes.
    pub closed: Signal<()>,
}

impl HeaderMenuController {
    pub fn new(model: Arc<dyn ColumnModel>, arbiter: Arc<GestureArbiter>) -> Self {
        Self {
            model,
            arbiter,
            state: Property::new(None),
            opened: Signal::new(),
            closed: Signal::new(),
        }
    }

    /// The open menu, if any.
    pub fn state(&self) -> Option<MenuState> {
        self.state.get()
    }

    pub fn is_open(&self) -> bool {
        self.state.with(Option::is_some)
    }

    /// Open the menu for `column` at viewport `(x, y)`.
    ///
    /// Does nothing while a drag or resize is active.
    pub fn open_at(&self, column: &ColumnId, x: f32, y: f32) -> bool {
        if self.arbiter.is_busy() {
            tracing::debug!(target: targets::MENU, %column, "menu refused while busy");
            return false;
        }
        if self.model.header(column).is_none() {
            tracing::debug!(target: targets::MENU, %column, "menu refused: unknown column");
            return false;
        }
        let state = MenuState {
            column: column.clone(),
            anchor: Point::new(x, y),
        };
        self.state.set_silent(Some(state.clone()));
        tracing::debug!(target: targets::MENU, %column, x, y, "menu opened");
        self.opened.emit(state);
        true
    }

    /// Close the menu. Returns `true` if it was open.
    pub fn close(&self) -> bool {
        if self.state.replace(None).is_none() {
            return false;
        }
        tracing::debug!(target: targets::MENU, "menu closed");
        self.closed.emit(());
        true
    }

    /// Entries offered for a column, grouped and separated.
    pub fn entries(&self, column: &ColumnId) -> HeaderResult<Vec<MenuEntry>> {
        let header = self.header(column)?;
        let caps = header.capabilities;
        let mut groups: Vec<Vec<MenuEntry>> = Vec::new();

        if caps.sortable {
            let mut group = vec![
                MenuEntry::item(
                    "Sort asc",
                    MenuAction::Sort(SortDirection::Ascending),
                    header.sorted == Some(SortDirection::Ascending),
                ),
                MenuEntry::item(
                    "Sort desc",
                    MenuAction::Sort(SortDirection::Descending),
                    header.sorted == Some(SortDirection::Descending),
                ),
            ];
            if header.sorted.is_some() {
                group.push(MenuEntry::item("Remove sort", MenuAction::RemoveSort, false));
            }
            groups.push(group);
        }

        if caps.pinnable {
            let left = match header.pinned {
                Some(PinSide::Left) => MenuEntry::item("Unpin from left", MenuAction::Unpin, false),
                _ => MenuEntry::item("Pin to left", MenuAction::Pin(PinSide::Left), false),
            };
            let right = match header.pinned {
                Some(PinSide::Right) => MenuEntry::item("Unpin from right", MenuAction::Unpin, false),
                _ => MenuEntry::item("Pin to right", MenuAction::Pin(PinSide::Right), false),
            };
            groups.push(vec![left, right]);
        }

        if caps.hideable {
            groups.push(vec![MenuEntry::item("Hide column", MenuAction::Hide, false)]);
        }

        let mut entries = Vec::new();
        for (i, group) in groups.into_iter().enumerate() {
            if i > 0 {
                entries.push(MenuEntry::Separator);
            }
            entries.extend(group);
        }
        Ok(entries)
    }

    /// Perform `action` on the open menu's column and close the menu.
    ///
    /// Returns `Ok(false)` when no menu is open.
    pub fn activate(&self, action: MenuAction) -> HeaderResult<bool> {
        let Some(state) = self.state() else {
            return Ok(false);
        };
        let result = self.apply(&state.column, action);
        self.close();
        result.map(|()| true)
    }

    /// Perform `action` on `column` directly.
    pub fn apply(&self, column: &ColumnId, action: MenuAction) -> HeaderResult<()> {
        match action {
            MenuAction::Sort(direction) => self.set_sort(column, direction),
            MenuAction::RemoveSort => self.clear_sort(column),
            MenuAction::Pin(side) => self.pin(column, Some(side)),
            MenuAction::Unpin => self.pin(column, None),
            MenuAction::Hide => self.set_visible(column, false),
        }
    }

    /// Sort by `column`. An existing entry keeps its position.
    pub fn set_sort(&self, column: &ColumnId, direction: SortDirection) -> HeaderResult<()> {
        self.check(column, |h| h.capabilities.sortable, "sorting")?;
        let mut sorting = self.model.sorting();
        sorting.upsert(column, direction);
        self.model.set_sorting(sorting);
        tracing::debug!(target: targets::MENU, %column, ?direction, "sort set");
        Ok(())
    }

    pub fn clear_sort(&self, column: &ColumnId) -> HeaderResult<()> {
        self.check(column, |h| h.capabilities.sortable, "sorting")?;
        let mut sorting = self.model.sorting();
        if sorting.remove(column) {
            self.model.set_sorting(sorting);
            tracing::debug!(target: targets::MENU, %column, "sort removed");
        }
        Ok(())
    }

    /// Pin `column` to a side, or unpin it with `None`.
    pub fn pin(&self, column: &ColumnId, side: Option<PinSide>) -> HeaderResult<()> {
        self.check(column, |h| h.capabilities.pinnable, "pinning")?;
        if !self.model.set_pinned(column, side) {
            return Err(HeaderError::StaleColumn(column.clone()));
        }
        tracing::debug!(target: targets::MENU, %column, ?side, "pin set");
        Ok(())
    }

    /// Show or hide `column`. Only hiding needs the `hideable` capability.
    pub fn set_visible(&self, column: &ColumnId, visible: bool) -> HeaderResult<()> {
        self.check(column, |h| visible || h.capabilities.hideable, "hiding")?;
        if !self.model.set_visible(column, visible) {
            return Err(HeaderError::StaleColumn(column.clone()));
        }
        tracing::debug!(target: targets::MENU, %column, visible, "visibility set");
        Ok(())
    }

    fn header(&self, column: &ColumnId) -> HeaderResult<HeaderDescriptor> {
        self.model
            .header(column)
            .ok_or_else(|| HeaderError::UnknownColumn(column.clone()))
    }

    fn check<F>(&self, column: &ColumnId, allowed: F, action: &'static str) -> HeaderResult<()>
    where
        F: FnOnce(&HeaderDescriptor) -> bool,
    {
        if self.arbiter.is_busy() {
            return Err(HeaderError::GestureActive);
        }
        let header = self.header(column)?;
        if !allowed(&header) {
            return Err(HeaderError::CapabilityDenied {
                column: column.clone(),
                action,
            });
        }
        Ok(())
    }
}

static_assertions::assert_impl_all!(HeaderMenuController: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, ColumnCapabilities, ColumnTable, SortEntry};

    fn setup() -> (Arc<ColumnTable>, Arc<GestureArbiter>, HeaderMenuController) {
        let table = Arc::new(ColumnTable::new(vec![
            Column::new("A"),
            Column::new("B"),
            Column::new("locked").with_capabilities(ColumnCapabilities::none()),
        ]));
        let arbiter = Arc::new(GestureArbiter::new());
        let menu = HeaderMenuController::new(table.clone(), arbiter.clone());
        (table, arbiter, menu)
    }

    fn labels(entries: &[MenuEntry]) -> Vec<&'static str> {
        entries.iter().map(|e| e.label().unwrap_or("---")).collect()
    }

    #[test]
    fn test_sort_upsert() {
        let (table, _, menu) = setup();
        menu.set_sort(&"B".into(), SortDirection::Ascending).unwrap();
        menu.set_sort(&"B".into(), SortDirection::Descending).unwrap();
        assert_eq!(
            table.sorting().entries(),
            &[SortEntry::new("B", SortDirection::Descending)]
        );
    }

    #[test]
    fn test_open_refused_while_dragging() {
        let (_, arbiter, menu) = setup();
        arbiter.begin_drag(&"A".into());
        assert!(!menu.open_at(&"B".into(), 10.0, 20.0));
        assert!(!menu.is_open());
        assert_eq!(
            menu.set_sort(&"B".into(), SortDirection::Ascending),
            Err(HeaderError::GestureActive)
        );
    }

    #[test]
    fn test_open_and_close() {
        let (_, _, menu) = setup();
        assert!(menu.open_at(&"A".into(), 10.0, 20.0));
        assert_eq!(menu.state().unwrap().anchor, Point::new(10.0, 20.0));
        assert!(menu.close());
        assert!(!menu.close());
    }

    #[test]
    fn test_entries_layout() {
        let (table, _, menu) = setup();
        assert_eq!(
            labels(&menu.entries(&"A".into()).unwrap()),
            ["Sort asc", "Sort desc", "---", "Pin to left", "Pin to right", "---", "Hide column"]
        );

        menu.set_sort(&"A".into(), SortDirection::Ascending).unwrap();
        table.set_pinned(&"A".into(), Some(PinSide::Left));
        let entries = menu.entries(&"A".into()).unwrap();
        assert_eq!(
            labels(&entries),
            [
                "Sort asc",
                "Sort desc",
                "Remove sort",
                "---",
                "Unpin from left",
                "Pin to right",
                "---",
                "Hide column"
            ]
        );
        assert!(matches!(entries[0], MenuEntry::Item { checked: true, .. }));
    }

    #[test]
    fn test_capabilities_enforced() {
        let (_, _, menu) = setup();
        let locked = ColumnId::from("locked");
        assert!(menu.entries(&locked).unwrap().is_empty());
        assert!(matches!(
            menu.pin(&locked, Some(PinSide::Right)),
            Err(HeaderError::CapabilityDenied { action: "pinning", .. })
        ));
        assert!(menu.set_visible(&locked, false).is_err());
        assert!(menu.set_visible(&locked, true).is_ok());
    }

    #[test]
    fn test_activate_applies_and_closes() {
        let (table, _, menu) = setup();
        menu.open_at(&"B".into(), 0.0, 0.0);
        assert_eq!(menu.activate(MenuAction::Hide), Ok(true));
        assert!(!table.header(&"B".into()).unwrap().visible);
        assert!(!menu.is_open());
        assert_eq!(menu.activate(MenuAction::Hide), Ok(false));
    }
}
