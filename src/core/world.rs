//! Die zentrale World-Datenstruktur: Arena aller Punkte, Segmente, Formen und Gruppen.
//!
//! Nur Actions verändern die World; Tools und Constraints lesen sie.

mod edit;

use super::shape::ShapeGeometry;
use super::{
    Coordinates, Group, GroupId, IdAllocator, Point, PointId, PointType, Segment,
    SegmentGeometry, SegmentId, Shape, ShapeId, ShapeKind, SpatialIndex, SpatialMatch,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fehler bei strukturellen Änderungen der World.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("ID {0} ist bereits vergeben")]
    IdInUse(u64),
    #[error("Form {0} existiert nicht")]
    MissingShape(ShapeId),
    #[error("Segment {0} existiert nicht")]
    MissingSegment(SegmentId),
    #[error("Punkt {0} existiert nicht")]
    MissingPoint(PointId),
    #[error("Gruppe {0} existiert nicht")]
    MissingGroup(GroupId),
}

/// Eine Form mit allen ihr gehörenden Segmenten und Punkten.
///
/// Einheit für Einfügen, Entfernen und Kopieren.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeBundle {
    pub shape: Shape,
    pub segments: Vec<Segment>,
    pub points: Vec<Point>,
}

/// Gruppenzugehörigkeit einer entfernten Form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMembership {
    pub group_id: GroupId,
    /// Position der Form in der Gruppe
    pub index: usize,
    /// Gruppe wurde mit der Form aufgelöst (war danach leer)
    pub dissolved: Option<(Group, usize)>,
}

/// Alles, was zum Wiederherstellen einer entfernten Form nötig ist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedShape {
    pub bundle: ShapeBundle,
    pub z_index: usize,
    pub membership: Option<GroupMembership>,
}

/// Arena des geometrischen Objektmodells.
#[derive(Debug, Clone)]
pub struct World {
    points: HashMap<PointId, Point>,
    segments: HashMap<SegmentId, Segment>,
    /// Formen in Zeichenreihenfolge (letzte = oberste)
    shapes: IndexMap<ShapeId, Shape>,
    groups: IndexMap<GroupId, Group>,
    /// Persistenter Spatial-Index über alle Punkte
    spatial_index: SpatialIndex,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Erstellt eine leere World.
    pub fn new() -> Self {
        Self {
            points: HashMap::new(),
            segments: HashMap::new(),
            shapes: IndexMap::new(),
            groups: IndexMap::new(),
            spatial_index: SpatialIndex::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.points.is_empty()
    }

    // ── Zugriff ─────────────────────────────────────────────────

    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points.get(&id)
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(&id)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    /// Formen in Zeichenreihenfolge.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.points.values()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn shape_ids(&self) -> Vec<ShapeId> {
        self.shapes.keys().copied().collect()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Position einer Form in der Zeichenreihenfolge.
    pub fn shape_z_index(&self, id: ShapeId) -> Option<usize> {
        self.shapes.get_index_of(&id)
    }

    pub fn group_z_index(&self, id: GroupId) -> Option<usize> {
        self.groups.get_index_of(&id)
    }

    /// Gruppe, zu der eine Form gehört.
    pub fn group_of(&self, shape_id: ShapeId) -> Option<GroupId> {
        self.groups
            .values()
            .find(|g| g.contains(shape_id))
            .map(|g| g.id)
    }

    /// Alle Formen, die mit `shape_id` zusammen bewegt werden (Gruppe oder nur sie selbst).
    pub fn group_members_or_self(&self, shape_id: ShapeId) -> Vec<ShapeId> {
        self.group_of(shape_id)
            .and_then(|g| self.groups.get(&g))
            .map(|g| g.shape_ids.clone())
            .unwrap_or_else(|| vec![shape_id])
    }

    /// Berechnet die nächste freie ID (größte vergebene ID + 1).
    pub fn next_id(&self) -> u64 {
        let max_point = self.points.keys().map(|id| id.0).max().unwrap_or(0);
        let max_segment = self.segments.keys().map(|id| id.0).max().unwrap_or(0);
        let max_shape = self.shapes.keys().map(|id| id.0).max().unwrap_or(0);
        let max_group = self.groups.keys().map(|id| id.0).max().unwrap_or(0);
        max_point.max(max_segment).max(max_shape).max(max_group) + 1
    }

    /// ID-Vergeber ab der nächsten freien ID.
    pub fn allocator(&self) -> IdAllocator {
        IdAllocator::starting_at(self.next_id())
    }

    /// Ist die Roh-ID bereits durch irgendein Objekt belegt?
    pub fn id_in_use(&self, raw: u64) -> bool {
        self.points.contains_key(&PointId(raw))
            || self.segments.contains_key(&SegmentId(raw))
            || self.shapes.contains_key(&ShapeId(raw))
            || self.groups.contains_key(&GroupId(raw))
    }

    // ── Geometrie-Auflösung ──────────────────────────────────────

    /// Koordinaten eines Punktes.
    pub fn coordinates(&self, id: PointId) -> Option<Coordinates> {
        self.points.get(&id).map(|p| p.coordinates)
    }

    /// Löst die Geometrie eines Segments auf.
    pub fn segment_geometry(&self, id: SegmentId) -> Option<SegmentGeometry> {
        let segment = self.segments.get(&id)?;
        let start = self.coordinates(segment.vertex_ids[0])?;
        let end = self.coordinates(segment.vertex_ids[1])?;
        let arc_center = match segment.arc_center_id {
            Some(center_id) => Some(self.coordinates(center_id)?),
            None => None,
        };
        Some(SegmentGeometry {
            vertices: [start, end],
            arc_center,
            counterclockwise: segment.counterclockwise,
            is_infinite: segment.is_infinite,
            is_semi_infinite: segment.is_semi_infinite,
        })
    }

    /// Löst die Geometrie einer Form auf.
    pub fn shape_geometry(&self, id: ShapeId) -> Option<ShapeGeometry> {
        let shape = self.shapes.get(&id)?;
        let segments = shape
            .segment_ids
            .iter()
            .map(|sid| self.segment_geometry(*sid))
            .collect::<Option<Vec<_>>>()?;
        let points = shape
            .point_ids
            .iter()
            .filter_map(|pid| self.coordinates(*pid))
            .collect();
        Some(ShapeGeometry {
            kind: shape.kind,
            segments,
            points,
        })
    }

    /// Vertex-IDs einer Form in Kettenreihenfolge, ohne Duplikate.
    pub fn vertex_ids(&self, shape_id: ShapeId) -> Vec<PointId> {
        let Some(shape) = self.shapes.get(&shape_id) else {
            return Vec::new();
        };
        let mut ids: Vec<PointId> = Vec::new();
        let vertices = shape
            .segment_ids
            .iter()
            .filter_map(|sid| self.segments.get(sid))
            .flat_map(|s| s.vertex_ids)
            .chain(shape.point_ids.iter().copied());
        for id in vertices {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Alle Punkte einer Form (Vertices, Teilungspunkte, Bogenzentren,
    /// freie Punkte, Zentrum) ohne Duplikate.
    pub fn owned_point_ids(&self, shape_id: ShapeId) -> Vec<PointId> {
        let Some(shape) = self.shapes.get(&shape_id) else {
            return Vec::new();
        };
        let mut ids: Vec<PointId> = Vec::new();
        let candidates = shape
            .segment_ids
            .iter()
            .filter_map(|sid| self.segments.get(sid))
            .flat_map(|s| s.point_ids())
            .chain(shape.point_ids.iter().copied())
            .chain(shape.center_id);
        for id in candidates {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    // ── Spatial-Index ────────────────────────────────────────────

    /// Baut den persistenten Spatial-Index aus den aktuellen Punkten neu auf.
    pub fn rebuild_spatial_index(&mut self) {
        self.spatial_index = SpatialIndex::from_points(&self.points);
    }

    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.spatial_index
    }

    /// Findet alle Punkte innerhalb eines Radius.
    pub fn points_within_radius(&self, query: Coordinates, radius: f64) -> Vec<SpatialMatch> {
        self.spatial_index.within_radius(query, radius)
    }

    // ── Bündel ──────────────────────────────────────────────────

    /// Baut ein Bündel aus Segment-Geometrien mit frischen IDs.
    ///
    /// Zusammenfallende Vertices werden zu einem Punkt vereint. Eine
    /// `SinglePoint`-Form nutzt `geometry.points`.
    pub fn build_bundle(ids: &mut IdAllocator, geometry: &ShapeGeometry) -> ShapeBundle {
        let shape_id = ids.shape();
        Self::build_bundle_with_id(shape_id, ids, geometry)
    }

    /// Wie [`World::build_bundle`], aber mit vorgegebener Form-ID.
    pub fn build_bundle_with_id(
        shape_id: ShapeId,
        ids: &mut IdAllocator,
        geometry: &ShapeGeometry,
    ) -> ShapeBundle {
        let mut shape = Shape::new(shape_id, geometry.kind);
        let mut points: Vec<Point> = Vec::new();
        let mut segments: Vec<Segment> = Vec::new();

        let mut vertex_for = |coords: Coordinates, points: &mut Vec<Point>, ids: &mut IdAllocator| {
            if let Some(existing) = points
                .iter()
                .find(|p| p.point_type == PointType::Vertex && p.coordinates.coincides(coords))
            {
                return existing.id;
            }
            let mut point = Point::new(ids.point(), coords, PointType::Vertex);
            point.shape_id = Some(shape_id);
            let id = point.id;
            points.push(point);
            id
        };

        for (idx, geo) in geometry.segments.iter().enumerate() {
            let segment_id = ids.segment();
            let start = vertex_for(geo.vertices[0], &mut points, ids);
            let end = if geo.is_circle() {
                start
            } else {
                vertex_for(geo.vertices[1], &mut points, ids)
            };
            let mut segment = match geo.arc_center {
                Some(center) => {
                    let mut center_point = Point::new(ids.point(), center, PointType::ArcCenter);
                    center_point.shape_id = Some(shape_id);
                    center_point.attach_segment(segment_id);
                    let center_id = center_point.id;
                    points.push(center_point);
                    Segment::arc(segment_id, start, end, center_id, geo.counterclockwise)
                }
                None => Segment::line(segment_id, start, end),
            };
            segment.is_infinite = geo.is_infinite;
            segment.is_semi_infinite = geo.is_semi_infinite;
            segment.shape_id = Some(shape_id);
            segment.idx = idx;
            for vertex_id in [start, end] {
                if let Some(p) = points.iter_mut().find(|p| p.id == vertex_id) {
                    p.attach_segment(segment_id);
                }
            }
            shape.segment_ids.push(segment_id);
            segments.push(segment);
        }

        for coords in &geometry.points {
            let mut point = Point::new(ids.point(), *coords, PointType::Vertex);
            point.shape_id = Some(shape_id);
            shape.point_ids.push(point.id);
            points.push(point);
        }

        let mut center = Point::new(ids.point(), geometry.center(), PointType::ShapeCenter);
        center.shape_id = Some(shape_id);
        center.visible = false;
        shape.center_id = Some(center.id);
        points.push(center);

        ShapeBundle {
            shape,
            segments,
            points,
        }
    }

    /// Aktueller Zustand einer Form als Bündel.
    pub fn shape_bundle(&self, id: ShapeId) -> Option<ShapeBundle> {
        let shape = self.shapes.get(&id)?.clone();
        let segments = shape
            .segment_ids
            .iter()
            .filter_map(|sid| self.segments.get(sid).cloned())
            .collect();
        let points = self
            .owned_point_ids(id)
            .into_iter()
            .filter_map(|pid| self.points.get(&pid).cloned())
            .collect();
        Some(ShapeBundle {
            shape,
            segments,
            points,
        })
    }

    /// Fügt ein Bündel ein, optional an einer Position der Zeichenreihenfolge.
    pub fn insert_bundle(
        &mut self,
        bundle: ShapeBundle,
        z_index: Option<usize>,
    ) -> Result<(), WorldError> {
        let raw_ids = std::iter::once(bundle.shape.id.0)
            .chain(bundle.segments.iter().map(|s| s.id.0))
            .chain(bundle.points.iter().map(|p| p.id.0));
        for raw in raw_ids {
            if self.id_in_use(raw) {
                return Err(WorldError::IdInUse(raw));
            }
        }

        for point in bundle.points {
            self.points.insert(point.id, point);
        }
        for segment in bundle.segments {
            self.segments.insert(segment.id, segment);
        }
        let shape = bundle.shape;
        match z_index {
            Some(index) if index < self.shapes.len() => {
                self.shapes.shift_insert(index, shape.id, shape);
            }
            _ => {
                self.shapes.insert(shape.id, shape);
            }
        }
        self.rebuild_spatial_index();
        Ok(())
    }

    /// Entfernt eine Form samt Segmenten und Punkten und löst sie aus ihrer Gruppe.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<RemovedShape> {
        let bundle = self.shape_bundle(id)?;
        let (z_index, _, _) = self.shapes.shift_remove_full(&id)?;
        for segment in &bundle.segments {
            self.segments.remove(&segment.id);
        }
        for point in &bundle.points {
            self.points.remove(&point.id);
        }

        let membership = self.group_of(id).and_then(|group_id| {
            let group = self.groups.get_mut(&group_id)?;
            let index = group.remove(id)?;
            let dissolved = if group.is_empty() {
                self.groups
                    .shift_remove_full(&group_id)
                    .map(|(z, _, g)| (g, z))
            } else {
                None
            };
            Some(GroupMembership {
                group_id,
                index,
                dissolved,
            })
        });

        self.rebuild_spatial_index();
        Some(RemovedShape {
            bundle,
            z_index,
            membership,
        })
    }

    /// Stellt eine entfernte Form an ihrer alten Position wieder her.
    pub fn restore_shape(&mut self, removed: RemovedShape) -> Result<(), WorldError> {
        let shape_id = removed.bundle.shape.id;
        self.insert_bundle(removed.bundle, Some(removed.z_index))?;
        if let Some(membership) = removed.membership {
            match membership.dissolved {
                Some((mut group, z)) => {
                    group.shape_ids.clear();
                    group.shape_ids.push(shape_id);
                    self.insert_group(group, Some(z))?;
                }
                None => {
                    let group = self
                        .groups
                        .get_mut(&membership.group_id)
                        .ok_or(WorldError::MissingGroup(membership.group_id))?;
                    let index = membership.index.min(group.shape_ids.len());
                    group.shape_ids.insert(index, shape_id);
                }
            }
        }
        Ok(())
    }

    /// Fügt einen freien Punkt ohne Form ein.
    pub fn insert_point(&mut self, point: Point) -> Result<(), WorldError> {
        if self.id_in_use(point.id.0) {
            return Err(WorldError::IdInUse(point.id.0));
        }
        self.points.insert(point.id, point);
        self.rebuild_spatial_index();
        Ok(())
    }

    // ── Gruppen ─────────────────────────────────────────────────

    /// Fügt eine Gruppe ein.
    pub fn insert_group(&mut self, group: Group, z_index: Option<usize>) -> Result<(), WorldError> {
        if self.id_in_use(group.id.0) {
            return Err(WorldError::IdInUse(group.id.0));
        }
        match z_index {
            Some(index) if index < self.groups.len() => {
                self.groups.shift_insert(index, group.id, group);
            }
            _ => {
                self.groups.insert(group.id, group);
            }
        }
        Ok(())
    }

    /// Entfernt eine Gruppe (die Formen bleiben bestehen).
    pub fn remove_group(&mut self, id: GroupId) -> Option<(Group, usize)> {
        self.groups
            .shift_remove_full(&id)
            .map(|(index, _, group)| (group, index))
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(&id)
    }

    // ── Attribute ───────────────────────────────────────────────

    /// Zugriff auf die Attribute einer Form (Struktur-Listen nicht verändern).
    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    pub fn point_mut(&mut self, id: PointId) -> Option<&mut Point> {
        self.points.get_mut(&id)
    }

    /// Verschiebt eine Form an `index` der Zeichenreihenfolge.
    pub fn move_shape_to(&mut self, id: ShapeId, index: usize) -> Result<(), WorldError> {
        let from = self
            .shapes
            .get_index_of(&id)
            .ok_or(WorldError::MissingShape(id))?;
        let to = index.min(self.shapes.len().saturating_sub(1));
        self.shapes.move_index(from, to);
        Ok(())
    }

    /// Zeigt oder verbirgt das Zentrum einer Form.
    pub fn set_center_shown(&mut self, id: ShapeId, shown: bool) -> Result<(), WorldError> {
        let shape = self.shapes.get_mut(&id).ok_or(WorldError::MissingShape(id))?;
        shape.is_center_shown = shown;
        if let Some(center) = shape.center_id.and_then(|c| self.points.get_mut(&c)) {
            center.visible = shown;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
