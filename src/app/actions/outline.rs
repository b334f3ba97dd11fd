//! Umriss-Operationen: Zerschneiden und Zusammenfügen von Formen.

use super::shape::show_center;
use super::{require_bundle_ids_free, ActionError, Reversible};
use crate::core::coordinates::COINCIDENCE_EPSILON;
use crate::core::{
    clean_same_direction, merge_outlines, split_outline, Coordinates, PointId, RemovedShape,
    SegmentGeometry, ShapeBundle, ShapeGeometry, ShapeId, ShapeKind, World, WorldError,
};
use serde::{Deserialize, Serialize};

/// Darf die geschlossene Form entlang `from → (via) → to` zerschnitten werden?
///
/// Die Sehne muss im Inneren verlaufen und darf den Rand nur an ihren
/// Endpunkten berühren.
pub fn is_valid_cut(
    geometry: &ShapeGeometry,
    from: Coordinates,
    to: Coordinates,
    via: Option<Coordinates>,
) -> bool {
    if geometry.kind != ShapeKind::Regular || !geometry.is_closed() || from.coincides(to) {
        return false;
    }
    if !geometry.is_coordinates_on_border(from) || !geometry.is_coordinates_on_border(to) {
        return false;
    }
    let chord: Vec<SegmentGeometry> = match via {
        Some(c) => {
            if !geometry.is_coordinates_strictly_inside(c) {
                return false;
            }
            vec![SegmentGeometry::line(from, c), SegmentGeometry::line(c, to)]
        }
        None => vec![SegmentGeometry::line(from, to)],
    };
    for piece in &chord {
        if !geometry.is_coordinates_strictly_inside(piece.middle()) {
            return false;
        }
        for border in &geometry.segments {
            let touches_elsewhere = piece
                .intersection_with(border, COINCIDENCE_EPSILON)
                .unwrap_or_default()
                .into_iter()
                .any(|p| !p.coincides(from) && !p.coincides(to));
            if touches_elsewhere {
                return false;
            }
        }
    }
    split_outline(&geometry.segments, from, to, via).is_some()
}

/// Zwei Formen lassen sich vereinen: keine Überlappung und ein gemeinsamer
/// Rand, der einen einzigen geschlossenen Umriss ergibt.
pub fn merged_outline(first: &ShapeGeometry, second: &ShapeGeometry) -> Option<Vec<SegmentGeometry>> {
    if first.overlaps_with(second) {
        return None;
    }
    merge_outlines(first, second)
}

/// Neue Form aus einem Umriss mit den Attributen von `source`.
fn bundle_from_outline(
    world: &World,
    ids: &mut crate::core::IdAllocator,
    outline: &[SegmentGeometry],
    source: ShapeId,
) -> Result<ShapeBundle, ActionError> {
    let geometry = ShapeGeometry::new(ShapeKind::Regular, clean_same_direction(outline, true));
    let mut bundle = World::build_bundle(ids, &geometry);
    let original = world.shape(source).ok_or(WorldError::MissingShape(source))?;
    bundle.shape.copy_attributes_from(original);
    show_center(&mut bundle);
    Ok(bundle)
}

// ── Cut ─────────────────────────────────────────────────────────────

/// Zerschneidet eine geschlossene Form entlang der Sehne zwischen zwei
/// Randpunkten, optional über ihr Zentrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cut {
    pub shape_id: ShapeId,
    pub first: PointId,
    pub second: PointId,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub via_center: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<RemovedShape>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub created: Vec<ShapeBundle>,
}

impl Cut {
    pub fn new(shape_id: ShapeId, first: PointId, second: PointId, via_center: bool) -> Self {
        Self {
            shape_id,
            first,
            second,
            via_center,
            removed: None,
            created: Vec::new(),
        }
    }

    /// Geometrie, Schnitt-Endpunkte und optionales Zentrum.
    fn chord(
        &self,
        world: &World,
    ) -> Result<(ShapeGeometry, Coordinates, Coordinates, Option<Coordinates>), ActionError> {
        let geometry = world
            .shape_geometry(self.shape_id)
            .ok_or(WorldError::MissingShape(self.shape_id))?;
        let from = world
            .coordinates(self.first)
            .ok_or(WorldError::MissingPoint(self.first))?;
        let to = world
            .coordinates(self.second)
            .ok_or(WorldError::MissingPoint(self.second))?;
        let via = self.via_center.then(|| geometry.center());
        Ok((geometry, from, to, via))
    }
}

impl Reversible for Cut {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        let (geometry, from, to, via) = self.chord(world)?;
        if !self.created.is_empty() {
            for bundle in &self.created {
                require_bundle_ids_free(world, bundle)?;
            }
            return Ok(());
        }
        if !is_valid_cut(&geometry, from, to, via) {
            return Err(ActionError::Geometry("Schnitt verlässt die Form"));
        }
        Ok(())
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        if self.created.is_empty() {
            let (geometry, from, to, via) = self.chord(world)?;
            let (first, second) = split_outline(&geometry.segments, from, to, via)
                .ok_or(ActionError::Geometry("Umriss nicht teilbar"))?;
            let mut ids = world.allocator();
            self.created = vec![
                bundle_from_outline(world, &mut ids, &first, self.shape_id)?,
                bundle_from_outline(world, &mut ids, &second, self.shape_id)?,
            ];
        }
        let removed = world
            .remove_shape(self.shape_id)
            .ok_or(WorldError::MissingShape(self.shape_id))?;
        let z_index = removed.z_index;
        self.removed = Some(removed);
        for (offset, bundle) in self.created.iter().enumerate() {
            world.insert_bundle(bundle.clone(), Some(z_index + offset))?;
        }
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        let removed = self.removed.as_ref().ok_or(ActionError::NotExecuted)?;
        for bundle in &self.created {
            if world.shape(bundle.shape.id).is_none() {
                return Err(WorldError::MissingShape(bundle.shape.id).into());
            }
        }
        if world.id_in_use(removed.bundle.shape.id.0) {
            return Err(WorldError::IdInUse(removed.bundle.shape.id.0).into());
        }
        Ok(())
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        for bundle in self.created.iter().rev() {
            world.remove_shape(bundle.shape.id);
        }
        let removed = self.removed.take().ok_or(ActionError::NotExecuted)?;
        world.restore_shape(removed)?;
        Ok(())
    }
}

// ── Merge ───────────────────────────────────────────────────────────

/// Vereint zwei Formen mit gemeinsamem Rand zu einer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merge {
    pub first: ShapeId,
    pub second: ShapeId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<RemovedShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<ShapeBundle>,
}

impl Merge {
    pub fn new(first: ShapeId, second: ShapeId) -> Self {
        Self {
            first,
            second,
            removed: Vec::new(),
            created: None,
        }
    }

    fn outline(&self, world: &World) -> Result<Vec<SegmentGeometry>, ActionError> {
        let first = world
            .shape_geometry(self.first)
            .ok_or(WorldError::MissingShape(self.first))?;
        let second = world
            .shape_geometry(self.second)
            .ok_or(WorldError::MissingShape(self.second))?;
        merged_outline(&first, &second).ok_or(ActionError::Geometry("kein gemeinsamer Rand"))
    }
}

impl Reversible for Merge {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        if self.first == self.second {
            return Err(ActionError::InvalidParameter(
                "eine Form kann nicht mit sich selbst vereint werden".into(),
            ));
        }
        match &self.created {
            Some(bundle) => {
                super::require_shapes(world, &[self.first, self.second])?;
                require_bundle_ids_free(world, bundle)
            }
            None => self.outline(world).map(|_| ()),
        }
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        let bundle = match &self.created {
            Some(bundle) => bundle.clone(),
            None => {
                let outline = self.outline(world)?;
                let mut ids = world.allocator();
                bundle_from_outline(world, &mut ids, &outline, self.first)?
            }
        };
        let z_index = [self.first, self.second]
            .iter()
            .filter_map(|id| world.shape_z_index(*id))
            .min()
            .ok_or(WorldError::MissingShape(self.first))?;

        self.removed.clear();
        for id in [self.first, self.second] {
            let removed = world.remove_shape(id).ok_or(WorldError::MissingShape(id))?;
            self.removed.push(removed);
        }
        world.insert_bundle(bundle.clone(), Some(z_index))?;
        self.created = Some(bundle);
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        let bundle = self.created.as_ref().ok_or(ActionError::NotExecuted)?;
        if self.removed.len() != 2 {
            return Err(ActionError::NotExecuted);
        }
        if world.shape(bundle.shape.id).is_none() {
            return Err(WorldError::MissingShape(bundle.shape.id).into());
        }
        Ok(())
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        let id = self
            .created
            .as_ref()
            .map(|b| b.shape.id)
            .ok_or(ActionError::NotExecuted)?;
        world.remove_shape(id).ok_or(WorldError::MissingShape(id))?;
        for removed in self.removed.iter().rev() {
            world.restore_shape(removed.clone())?;
        }
        self.removed.clear();
        Ok(())
    }
}
