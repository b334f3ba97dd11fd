//! Erzeugen, Löschen und Kopieren ganzer Formen.

use super::{require_bundle_ids_free, require_finite, require_shapes, ActionError, Reversible};
use crate::core::{
    Coordinates, IdAllocator, PointId, RemovedShape, SegmentId, ShapeBundle, ShapeGeometry,
    ShapeId, World, WorldError,
};
use crate::persistence::ShapeData;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── CreateShape ─────────────────────────────────────────────────────

/// Legt eine Form aus einer Vorlage (Pfad + Attribute) an, verschoben um `offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShape {
    pub template: ShapeData,
    #[serde(default)]
    pub offset: Coordinates,
    /// Beim ersten Ausführen erzeugtes Bündel (IDs für Redo/Replay)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<ShapeBundle>,
}

impl CreateShape {
    pub fn new(template: ShapeData, offset: Coordinates) -> Self {
        Self {
            template,
            offset,
            created: None,
        }
    }

    /// ID der erzeugten Form (nach dem ersten Ausführen).
    pub fn shape_id(&self) -> Option<ShapeId> {
        self.created.as_ref().map(|b| b.shape.id)
    }

    fn build(&self, world: &World) -> Result<ShapeBundle, ActionError> {
        let geometry = self
            .template
            .geometry_from_path()
            .map_err(|e| ActionError::InvalidParameter(e.to_string()))?;
        let moved = translated_geometry(&geometry, self.offset);
        let mut ids = world.allocator();
        let mut bundle = World::build_bundle(&mut ids, &moved);
        self.template.apply_attributes(&mut bundle.shape);
        bundle.shape.kind = moved.kind;
        show_center(&mut bundle);
        Ok(bundle)
    }
}

impl Reversible for CreateShape {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        require_finite(self.offset.x, "offset.x")?;
        require_finite(self.offset.y, "offset.y")?;
        match &self.created {
            Some(bundle) => require_bundle_ids_free(world, bundle),
            None => self
                .template
                .geometry_from_path()
                .map(|_| ())
                .map_err(|e| ActionError::InvalidParameter(e.to_string())),
        }
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        let bundle = match &self.created {
            Some(bundle) => bundle.clone(),
            None => self.build(world)?,
        };
        world.insert_bundle(bundle.clone(), None)?;
        self.created = Some(bundle);
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        let id = self.shape_id().ok_or(ActionError::NotExecuted)?;
        world
            .shape(id)
            .map(|_| ())
            .ok_or_else(|| WorldError::MissingShape(id).into())
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        let id = self.shape_id().ok_or(ActionError::NotExecuted)?;
        world
            .remove_shape(id)
            .map(|_| ())
            .ok_or_else(|| WorldError::MissingShape(id).into())
    }
}

// ── DeleteShapes ────────────────────────────────────────────────────

/// Entfernt Formen samt Segmenten, Punkten und Gruppenzugehörigkeit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteShapes {
    pub shape_ids: Vec<ShapeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<RemovedShape>,
}

impl DeleteShapes {
    pub fn new(shape_ids: Vec<ShapeId>) -> Self {
        Self {
            shape_ids,
            removed: Vec::new(),
        }
    }
}

impl Reversible for DeleteShapes {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        require_shapes(world, &self.shape_ids)
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        self.removed.clear();
        for id in &self.shape_ids {
            let removed = world
                .remove_shape(*id)
                .ok_or(WorldError::MissingShape(*id))?;
            self.removed.push(removed);
        }
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        if self.removed.len() != self.shape_ids.len() {
            return Err(ActionError::NotExecuted);
        }
        for removed in &self.removed {
            require_bundle_ids_free(world, &removed.bundle)?;
        }
        Ok(())
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        // Umgekehrte Reihenfolge: jede Form landet wieder an ihrem z-Index
        for removed in self.removed.iter().rev() {
            world.restore_shape(removed.clone())?;
        }
        self.removed.clear();
        Ok(())
    }
}

// ── Duplicate ───────────────────────────────────────────────────────

/// Kopiert Formen mit allen Punkten und Segmenten, verschoben um `offset`.
///
/// `new_shape_ids` kann vom Aufrufer vorab reserviert werden, damit eine
/// folgende Action im selben Batch die Kopien referenzieren kann.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Duplicate {
    pub shape_ids: Vec<ShapeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub new_shape_ids: Vec<ShapeId>,
    #[serde(default)]
    pub offset: Coordinates,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub created: Vec<ShapeBundle>,
}

impl Duplicate {
    pub fn new(shape_ids: Vec<ShapeId>, offset: Coordinates) -> Self {
        Self {
            shape_ids,
            new_shape_ids: Vec::new(),
            offset,
            created: Vec::new(),
        }
    }

    /// Mit vorab reservierten IDs für die Kopien.
    pub fn with_new_ids(mut self, new_shape_ids: Vec<ShapeId>) -> Self {
        self.new_shape_ids = new_shape_ids;
        self
    }

    fn build(&self, world: &World) -> Result<Vec<ShapeBundle>, ActionError> {
        let reserved_max = self.new_shape_ids.iter().map(|id| id.0).max().unwrap_or(0);
        let mut ids = IdAllocator::starting_at(world.next_id().max(reserved_max + 1));
        self.shape_ids
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let bundle = world
                    .shape_bundle(*source)
                    .ok_or(WorldError::MissingShape(*source))?;
                let new_id = match self.new_shape_ids.get(index) {
                    Some(id) => *id,
                    None => ids.shape(),
                };
                Ok(remap_bundle(&bundle, new_id, &mut ids, self.offset))
            })
            .collect()
    }
}

impl Reversible for Duplicate {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        require_shapes(world, &self.shape_ids)?;
        require_finite(self.offset.x, "offset.x")?;
        require_finite(self.offset.y, "offset.y")?;
        if !self.new_shape_ids.is_empty() && self.new_shape_ids.len() != self.shape_ids.len() {
            return Err(ActionError::InvalidParameter(
                "newShapeIds passt nicht zu shapeIds".into(),
            ));
        }
        for id in &self.new_shape_ids {
            if world.id_in_use(id.0) {
                return Err(WorldError::IdInUse(id.0).into());
            }
        }
        for bundle in &self.created {
            require_bundle_ids_free(world, bundle)?;
        }
        Ok(())
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        if self.created.is_empty() {
            self.created = self.build(world)?;
            self.new_shape_ids = self.created.iter().map(|b| b.shape.id).collect();
        }
        for (index, bundle) in self.created.iter().enumerate() {
            if let Err(err) = world.insert_bundle(bundle.clone(), None) {
                for inserted in self.created[..index].iter().rev() {
                    world.remove_shape(inserted.shape.id);
                }
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        if self.created.is_empty() {
            return Err(ActionError::NotExecuted);
        }
        let ids: Vec<ShapeId> = self.created.iter().map(|b| b.shape.id).collect();
        require_shapes(world, &ids)
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        for bundle in self.created.iter().rev() {
            world
                .remove_shape(bundle.shape.id)
                .ok_or(WorldError::MissingShape(bundle.shape.id))?;
        }
        Ok(())
    }
}

// ── Hilfsfunktionen ─────────────────────────────────────────────────

/// Kopie eines Bündels mit neuen IDs, alle Punkte um `offset` verschoben.
pub(crate) fn remap_bundle(
    bundle: &ShapeBundle,
    shape_id: ShapeId,
    ids: &mut IdAllocator,
    offset: Coordinates,
) -> ShapeBundle {
    let point_map: HashMap<PointId, PointId> =
        bundle.points.iter().map(|p| (p.id, ids.point())).collect();
    let segment_map: HashMap<SegmentId, SegmentId> =
        bundle.segments.iter().map(|s| (s.id, ids.segment())).collect();
    let point = |id: &PointId| point_map.get(id).copied().unwrap_or(*id);
    let segment = |id: &SegmentId| segment_map.get(id).copied().unwrap_or(*id);

    let mut shape = bundle.shape.clone();
    shape.id = shape_id;
    shape.segment_ids = shape.segment_ids.iter().map(segment).collect();
    shape.point_ids = shape.point_ids.iter().map(point).collect();
    shape.center_id = shape.center_id.as_ref().map(point);

    let segments = bundle
        .segments
        .iter()
        .map(|s| {
            let mut copy = s.clone();
            copy.id = segment(&s.id);
            copy.vertex_ids = [point(&s.vertex_ids[0]), point(&s.vertex_ids[1])];
            copy.division_ids = s.division_ids.iter().map(point).collect();
            copy.arc_center_id = s.arc_center_id.as_ref().map(point);
            copy.shape_id = Some(shape_id);
            copy
        })
        .collect();

    let points = bundle
        .points
        .iter()
        .map(|p| {
            let mut copy = p.clone();
            copy.id = point(&p.id);
            copy.coordinates = p.coordinates + offset;
            copy.segment_ids = p.segment_ids.iter().map(segment).collect();
            copy.shape_id = Some(shape_id);
            copy
        })
        .collect();

    ShapeBundle {
        shape,
        segments,
        points,
    }
}

/// Geometrie um `offset` verschoben.
pub(crate) fn translated_geometry(geometry: &ShapeGeometry, offset: Coordinates) -> ShapeGeometry {
    ShapeGeometry {
        kind: geometry.kind,
        segments: geometry
            .segments
            .iter()
            .map(|s| s.translated(offset))
            .collect(),
        points: geometry.points.iter().map(|p| *p + offset).collect(),
    }
}

/// Sichtbarkeit des Zentrums an `is_center_shown` angleichen.
pub(crate) fn show_center(bundle: &mut ShapeBundle) {
    let shown = bundle.shape.is_center_shown;
    if let Some(center_id) = bundle.shape.center_id {
        if let Some(center) = bundle.points.iter_mut().find(|p| p.id == center_id) {
            center.visible = shown;
        }
    }
}
