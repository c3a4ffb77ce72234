//! Drop-target geometry.
//!
//! [`BoundsRegistry`] remembers the last measured rectangle of every visible
//! header. [`GeometryProbe`] answers the two questions a reorder drag asks on
//! every pointer move: which column is the pointer over, and which edge of it
//! should be highlighted.

use crate::geometry::{Point, Rect};
use crate::model::{ColumnId, ColumnOrder};

/// Edge of the drop target that receives the insertion highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightSide {
    /// Leading (left) edge.
    Before,
    /// Trailing (right) edge.
    After,
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    /// The column under or nearest to the pointer.
    pub target_id: ColumnId,
    /// `None` when the target is the active column itself, or when either
    /// column is missing from the order.
    pub side: Option<HighlightSide>,
}

/// Column id to last measured header rectangle, in layout order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundsRegistry {
    entries: Vec<(ColumnId, Rect)>,
}

impl BoundsRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a complete layout pass.
    pub fn from_layout<I>(layout: I) -> Self
    where
        I: IntoIterator<Item = (ColumnId, Rect)>,
    {
        let mut registry = Self::new();
        for (id, rect) in layout {
            registry.record(id, rect);
        }
        registry
    }

    /// Store or replace the rectangle of one column.
    pub fn record(&mut self, id: ColumnId, rect: Rect) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, existing)) => *existing = rect,
            None => self.entries.push((id, rect)),
        }
    }

    /// Forget a column, returning its last rectangle.
    pub fn remove(&mut self, id: &ColumnId) -> Option<Rect> {
        let index = self.entries.iter().position(|(existing, _)| existing == id)?;
        Some(self.entries.remove(index).1)
    }

    /// Forget every column.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Last rectangle recorded for `id`.
    pub fn get(&self, id: &ColumnId) -> Option<Rect> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, rect)| *rect)
    }

    /// Number of measured columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` before the first layout pass.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (&ColumnId, Rect)> {
        self.entries.iter().map(|(id, rect)| (id, *rect))
    }

    /// The column whose rectangle contains `point`.
    pub fn column_at(&self, point: Point) -> Option<&ColumnId> {
        self.entries
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(id, _)| id)
    }

    /// The column horizontally nearest to `x`. Ties go to the leftmost entry.
    pub fn nearest_to(&self, x: f32) -> Option<&ColumnId> {
        let mut best: Option<(&ColumnId, f32)> = None;
        for (id, rect) in &self.entries {
            let distance = rect.horizontal_distance(x);
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((id, distance));
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Stateless hit testing against a [`BoundsRegistry`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryProbe;

impl GeometryProbe {
    /// Find the drop target under `pointer`.
    ///
    /// A rectangle containing the point wins; otherwise the horizontally
    /// nearest header is the target. The highlight side comes from
    /// [`side`](Self::side) and ignores where inside the target the pointer is.
    pub fn hit_test(
        pointer: Point,
        active: &ColumnId,
        order: &ColumnOrder,
        candidates: &BoundsRegistry,
    ) -> Option<HitResult> {
        let target = candidates
            .column_at(pointer)
            .or_else(|| candidates.nearest_to(pointer.x))?;
        Some(HitResult {
            side: Self::side(order, active, target),
            target_id: target.clone(),
        })
    }

    /// Highlight side from relative order: a column dragged rightwards
    /// lands after its target, one dragged leftwards lands before it.
    pub fn side(order: &ColumnOrder, active: &ColumnId, target: &ColumnId) -> Option<HighlightSide> {
        let active_index = order.index_of(active)?;
        let target_index = order.index_of(target)?;
        match active_index.cmp(&target_index) {
            std::cmp::Ordering::Less => Some(HighlightSide::After),
            std::cmp::Ordering::Greater => Some(HighlightSide::Before),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Horizontal position of the drag for the overlay.
    ///
    /// The live pointer x wins; without one (keyboard reorder) the midpoint
    /// of the current target is used.
    pub fn drag_x(pointer_x: Option<f32>, target_rect: Option<Rect>) -> Option<f32> {
        pointer_x.or_else(|| target_rect.map(|rect| rect.center().x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> (ColumnOrder, BoundsRegistry) {
        let order = ColumnOrder::from_ids(["A", "B", "C", "D"]).unwrap();
        let bounds = BoundsRegistry::from_layout(
            order
                .ids()
                .iter()
                .enumerate()
                .map(|(i, id)| (id.clone(), Rect::new(i as f32 * 100.0, 0.0, 100.0, 36.0))),
        );
        (order, bounds)
    }

    #[test]
    fn test_hit_inside_rect() {
        let (order, bounds) = layout();
        let hit = GeometryProbe::hit_test(Point::new(250.0, 10.0), &"A".into(), &order, &bounds).unwrap();
        assert_eq!(hit.target_id, "C");
        assert_eq!(hit.side, Some(HighlightSide::After));
    }

    #[test]
    fn test_side_ignores_sub_position() {
        let (order, bounds) = layout();
        for x in [101.0, 150.0, 199.0] {
            let hit = GeometryProbe::hit_test(Point::new(x, 10.0), &"D".into(), &order, &bounds).unwrap();
            assert_eq!(hit.target_id, "B");
            assert_eq!(hit.side, Some(HighlightSide::Before));
        }
    }

    #[test]
    fn test_nearest_when_outside() {
        let (order, bounds) = layout();
        let hit = GeometryProbe::hit_test(Point::new(950.0, 80.0), &"A".into(), &order, &bounds).unwrap();
        assert_eq!(hit.target_id, "D");

        let hit = GeometryProbe::hit_test(Point::new(-40.0, 10.0), &"C".into(), &order, &bounds).unwrap();
        assert_eq!(hit.target_id, "A");
        assert_eq!(hit.side, Some(HighlightSide::Before));
    }

    #[test]
    fn test_self_target_has_no_side() {
        let (order, bounds) = layout();
        let hit = GeometryProbe::hit_test(Point::new(50.0, 10.0), &"A".into(), &order, &bounds).unwrap();
        assert_eq!(hit.target_id, "A");
        assert_eq!(hit.side, None);
    }

    #[test]
    fn test_empty_candidates() {
        let order = ColumnOrder::from_ids(["A"]).unwrap();
        assert!(GeometryProbe::hit_test(Point::ZERO, &"A".into(), &order, &BoundsRegistry::new()).is_none());
    }

    #[test]
    fn test_drag_x_precedence() {
        let rect = Rect::new(100.0, 0.0, 100.0, 36.0);
        assert_eq!(GeometryProbe::drag_x(Some(42.0), Some(rect)), Some(42.0));
        assert_eq!(GeometryProbe::drag_x(None, Some(rect)), Some(150.0));
        assert_eq!(GeometryProbe::drag_x(None, None), None);
    }

    #[test]
    fn test_registry_record_replaces() {
        let mut bounds = BoundsRegistry::new();
        bounds.record("A".into(), Rect::new(0.0, 0.0, 10.0, 10.0));
        bounds.record("A".into(), Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(bounds.len(), 1);
        assert_eq!(bounds.get(&"A".into()).unwrap().width(), 20.0);
        assert!(bounds.remove(&"A".into()).is_some());
        assert!(bounds.is_empty());
    }
}
