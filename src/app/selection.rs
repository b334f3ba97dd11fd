//! Auswahl-Beschränkungen und Auflösung einer Zeigerposition auf ein Objekt.
//!
//! Jeder Tool-Schritt installiert `SelectionConstraints`; `resolve` sucht
//! damit das passende Objekt unter dem Zeiger. Gelesen wird nur, die World
//! bleibt unverändert.

use crate::core::{Coordinates, PointId, PointType, SegmentId, ShapeId, World};

/// Aufgelöstes Objekt unter dem Zeiger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    Point(PointId),
    Segment(SegmentId),
    Shape(ShapeId),
}

/// Objektart für die Prioritäts-Reihenfolge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Point,
    Segment,
    Shape,
}

impl Selection {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Selection::Point(_) => ObjectKind::Point,
            Selection::Segment(_) => ObjectKind::Segment,
            Selection::Shape(_) => ObjectKind::Shape,
        }
    }

    /// Besitzende Form des Objekts (Punkt → Form, Segment → Form).
    pub fn owner_shape(&self, world: &World) -> Option<ShapeId> {
        match *self {
            Selection::Point(id) => world.point(id).and_then(|p| p.shape_id),
            Selection::Segment(id) => world.segment(id).and_then(|s| s.shape_id),
            Selection::Shape(id) => world.shape(id).map(|s| s.id),
        }
    }
}

// ── Beschränkungen ──────────────────────────────────────────────────

/// Filter für eine Objektart: an/aus, optionale Whitelist, Blacklist.
#[derive(Debug, Clone, PartialEq)]
pub struct KindConstraint<Id> {
    pub can_select: bool,
    /// `None`: alle IDs erlaubt
    pub whitelist: Option<Vec<Id>>,
    pub blacklist: Vec<Id>,
}

impl<Id> Default for KindConstraint<Id> {
    fn default() -> Self {
        Self::disabled()
    }
}

impl<Id> KindConstraint<Id> {
    /// Objektart nicht wählbar.
    pub fn disabled() -> Self {
        Self {
            can_select: false,
            whitelist: None,
            blacklist: Vec::new(),
        }
    }

    /// Jedes Objekt dieser Art wählbar.
    pub fn any() -> Self {
        Self {
            can_select: true,
            whitelist: None,
            blacklist: Vec::new(),
        }
    }

    /// Nur die angegebenen IDs wählbar.
    pub fn only(ids: Vec<Id>) -> Self {
        Self {
            can_select: true,
            whitelist: Some(ids),
            blacklist: Vec::new(),
        }
    }

    pub fn except(mut self, ids: Vec<Id>) -> Self {
        self.blacklist = ids;
        self
    }
}

impl<Id: PartialEq> KindConstraint<Id> {
    pub fn allows(&self, id: &Id) -> bool {
        self.can_select
            && self.whitelist.as_ref().map_or(true, |list| list.contains(id))
            && !self.blacklist.contains(id)
    }
}

/// Beschränkungen des aktuellen Tool-Schritts.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConstraints {
    pub points: KindConstraint<PointId>,
    /// Erlaubte Punkt-Rollen; leer = alle
    pub point_types: Vec<PointType>,
    pub segments: KindConstraint<SegmentId>,
    pub shapes: KindConstraint<ShapeId>,
    /// Reihenfolge, in der die Objektarten probiert werden
    pub priority: [ObjectKind; 3],
}

impl Default for SelectionConstraints {
    fn default() -> Self {
        Self::none()
    }
}

impl SelectionConstraints {
    pub const DEFAULT_PRIORITY: [ObjectKind; 3] =
        [ObjectKind::Point, ObjectKind::Segment, ObjectKind::Shape];

    /// Nichts wählbar (z.B. während eine Animation läuft).
    pub fn none() -> Self {
        Self {
            points: KindConstraint::disabled(),
            point_types: Vec::new(),
            segments: KindConstraint::disabled(),
            shapes: KindConstraint::disabled(),
            priority: Self::DEFAULT_PRIORITY,
        }
    }

    /// Beliebige Formen wählbar.
    pub fn shapes() -> Self {
        Self {
            shapes: KindConstraint::any(),
            ..Self::none()
        }
    }

    /// Punkte der angegebenen Rollen wählbar.
    pub fn points(point_types: Vec<PointType>) -> Self {
        Self {
            points: KindConstraint::any(),
            point_types,
            ..Self::none()
        }
    }

    pub fn with_segments(mut self, segments: KindConstraint<SegmentId>) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_shapes(mut self, shapes: KindConstraint<ShapeId>) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn with_priority(mut self, priority: [ObjectKind; 3]) -> Self {
        self.priority = priority;
        self
    }

    /// Ist überhaupt etwas wählbar?
    pub fn is_empty(&self) -> bool {
        !self.points.can_select && !self.segments.can_select && !self.shapes.can_select
    }

    /// Prüft eine bereits aufgelöste Auswahl gegen die Beschränkungen.
    pub fn allows(&self, world: &World, selection: &Selection) -> bool {
        match selection {
            Selection::Point(id) => world
                .point(*id)
                .is_some_and(|p| p.visible && self.allows_point_type(p.point_type))
                && self.points.allows(id),
            Selection::Segment(id) => world.segment(*id).is_some() && self.segments.allows(id),
            Selection::Shape(id) => world.shape(*id).is_some() && self.shapes.allows(id),
        }
    }

    fn allows_point_type(&self, point_type: PointType) -> bool {
        self.point_types.is_empty() || self.point_types.contains(&point_type)
    }
}

// ── Auflösung ───────────────────────────────────────────────────────

/// Sucht das Objekt unter `at` gemäß den Beschränkungen.
///
/// Punkte: nächster sichtbarer Punkt im Radius. Segmente: kleinster Abstand
/// im Radius. Formen: oberste Form, die `at` enthält (offene Formen: Rand
/// im Radius).
pub fn resolve(
    world: &World,
    constraints: &SelectionConstraints,
    at: Coordinates,
    radius: f64,
) -> Option<Selection> {
    constraints.priority.iter().find_map(|kind| match kind {
        ObjectKind::Point => resolve_point(world, constraints, at, radius),
        ObjectKind::Segment => resolve_segment(world, constraints, at, radius),
        ObjectKind::Shape => resolve_shape(world, constraints, at, radius),
    })
}

fn resolve_point(
    world: &World,
    constraints: &SelectionConstraints,
    at: Coordinates,
    radius: f64,
) -> Option<Selection> {
    if !constraints.points.can_select {
        return None;
    }
    world
        .points_within_radius(at, radius)
        .into_iter()
        .map(|hit| Selection::Point(hit.point_id))
        .find(|selection| constraints.allows(world, selection))
}

fn resolve_segment(
    world: &World,
    constraints: &SelectionConstraints,
    at: Coordinates,
    radius: f64,
) -> Option<Selection> {
    if !constraints.segments.can_select {
        return None;
    }
    world
        .segments()
        .filter(|s| constraints.segments.allows(&s.id))
        .filter(|s| {
            s.shape_id
                .and_then(|id| world.shape(id))
                .map_or(true, |shape| shape.visible)
        })
        .filter_map(|s| {
            let distance = world.segment_geometry(s.id)?.distance_to(at);
            (distance <= radius).then_some((distance, s.id))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(_, id)| Selection::Segment(id))
}

fn resolve_shape(
    world: &World,
    constraints: &SelectionConstraints,
    at: Coordinates,
    radius: f64,
) -> Option<Selection> {
    if !constraints.shapes.can_select {
        return None;
    }
    world
        .shape_ids()
        .into_iter()
        .rev()
        .filter(|id| constraints.shapes.allows(id))
        .filter(|id| world.shape(*id).is_some_and(|s| s.visible))
        .find(|id| {
            let Some(geometry) = world.shape_geometry(*id) else {
                return false;
            };
            if geometry.is_closed() {
                return geometry.is_coordinates_in_path(at);
            }
            geometry.segments.iter().any(|s| s.distance_to(at) <= radius)
                || geometry.points.iter().any(|p| p.dist(at) <= radius)
        })
        .map(Selection::Shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{IdAllocator, SegmentGeometry, ShapeGeometry, ShapeKind};

    fn square(world: &mut World, origin: Coordinates) -> ShapeId {
        let c = |x: f64, y: f64| origin + Coordinates::new(x, y);
        let geometry = ShapeGeometry::new(
            ShapeKind::Regular,
            vec![
                SegmentGeometry::line(c(0.0, 0.0), c(10.0, 0.0)),
                SegmentGeometry::line(c(10.0, 0.0), c(10.0, 10.0)),
                SegmentGeometry::line(c(10.0, 10.0), c(0.0, 10.0)),
                SegmentGeometry::line(c(0.0, 10.0), c(0.0, 0.0)),
            ],
        );
        let mut ids: IdAllocator = world.allocator();
        let bundle = World::build_bundle(&mut ids, &geometry);
        let id = bundle.shape.id;
        world.insert_bundle(bundle, None).expect("einfügbar");
        id
    }

    #[test]
    fn whitelist_and_blacklist_filter_ids() {
        let only = KindConstraint::only(vec![ShapeId(1), ShapeId(2)]).except(vec![ShapeId(2)]);
        assert!(only.allows(&ShapeId(1)));
        assert!(!only.allows(&ShapeId(2)));
        assert!(!only.allows(&ShapeId(3)));
        assert!(!KindConstraint::<ShapeId>::disabled().allows(&ShapeId(1)));
    }

    #[test]
    fn vertex_wins_over_shape_by_priority() {
        let mut world = World::new();
        square(&mut world, Coordinates::ZERO);
        let constraints =
            SelectionConstraints::points(vec![PointType::Vertex]).with_shapes(KindConstraint::any());

        let hit = resolve(&world, &constraints, Coordinates::new(0.5, 0.5), 2.0);
        assert!(matches!(hit, Some(Selection::Point(_))));

        let inner = resolve(&world, &constraints, Coordinates::new(5.0, 5.0), 2.0);
        assert!(matches!(inner, Some(Selection::Shape(_))));
    }

    #[test]
    fn topmost_shape_is_resolved() {
        let mut world = World::new();
        let lower = square(&mut world, Coordinates::ZERO);
        let upper = square(&mut world, Coordinates::new(5.0, 5.0));
        let constraints = SelectionConstraints::shapes();

        let hit = resolve(&world, &constraints, Coordinates::new(7.0, 7.0), 1.0);
        assert_eq!(hit, Some(Selection::Shape(upper)));

        let blocked = constraints.with_shapes(KindConstraint::any().except(vec![upper]));
        let hit = resolve(&world, &blocked, Coordinates::new(7.0, 7.0), 1.0);
        assert_eq!(hit, Some(Selection::Shape(lower)));
    }

    #[test]
    fn nearest_segment_within_radius() {
        let mut world = World::new();
        let id = square(&mut world, Coordinates::ZERO);
        let constraints = SelectionConstraints::none().with_segments(KindConstraint::any());

        let hit = resolve(&world, &constraints, Coordinates::new(5.0, 0.4), 1.0)
            .expect("Segment in Reichweite");
        assert_eq!(hit.owner_shape(&world), Some(id));
        assert!(resolve(&world, &constraints, Coordinates::new(5.0, 5.0), 1.0).is_none());
    }

    #[test]
    fn empty_constraints_select_nothing() {
        let mut world = World::new();
        square(&mut world, Coordinates::ZERO);
        let constraints = SelectionConstraints::none();
        assert!(constraints.is_empty());
        assert!(resolve(&world, &constraints, Coordinates::new(5.0, 5.0), 1.0).is_none());
    }
}
