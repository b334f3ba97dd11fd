//! Transformationen ganzer Formen: Verschieben, Drehen, Strecken, Umdrehen.
//!
//! Alle merken sich die Punkt-Koordinaten vor der Ausführung; Undo setzt
//! sie exakt zurück statt die inverse Transformation zu rechnen.

use super::{require_finite, require_shapes, ActionError, Reversible};
use crate::core::{Coordinates, PointId, ShapeId, World, WorldError};
use serde::{Deserialize, Serialize};

/// Koordinaten aller Punkte der Formen.
fn snapshot_points(world: &World, shape_ids: &[ShapeId]) -> Vec<(PointId, Coordinates)> {
    let mut snapshot: Vec<(PointId, Coordinates)> = Vec::new();
    for shape_id in shape_ids {
        for id in world.owned_point_ids(*shape_id) {
            if snapshot.iter().any(|(known, _)| *known == id) {
                continue;
            }
            if let Some(coords) = world.coordinates(id) {
                snapshot.push((id, coords));
            }
        }
    }
    snapshot
}

fn check_snapshot(world: &World, snapshot: &[(PointId, Coordinates)]) -> Result<(), ActionError> {
    if snapshot.is_empty() {
        return Err(ActionError::NotExecuted);
    }
    match snapshot.iter().find(|(id, _)| world.point(*id).is_none()) {
        Some((id, _)) => Err(WorldError::MissingPoint(*id).into()),
        None => Ok(()),
    }
}

fn restore_points(world: &mut World, snapshot: &[(PointId, Coordinates)]) -> Result<(), ActionError> {
    for (id, coords) in snapshot {
        let point = world.point_mut(*id).ok_or(WorldError::MissingPoint(*id))?;
        point.coordinates = *coords;
    }
    world.rebuild_spatial_index();
    Ok(())
}

fn require_coordinates(coords: Coordinates, name: &'static str) -> Result<(), ActionError> {
    require_finite(coords.x, name)?;
    require_finite(coords.y, name)
}

// ── Translate ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translate {
    pub shape_ids: Vec<ShapeId>,
    pub delta: Coordinates,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub original: Vec<(PointId, Coordinates)>,
}

impl Translate {
    pub fn new(shape_ids: Vec<ShapeId>, delta: Coordinates) -> Self {
        Self {
            shape_ids,
            delta,
            original: Vec::new(),
        }
    }
}

impl Reversible for Translate {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        require_shapes(world, &self.shape_ids)?;
        require_coordinates(self.delta, "delta")
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        self.original = snapshot_points(world, &self.shape_ids);
        world.translate_shapes(&self.shape_ids, self.delta)?;
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        check_snapshot(world, &self.original)
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        restore_points(world, &self.original)
    }
}

// ── Rotate ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rotate {
    pub shape_ids: Vec<ShapeId>,
    /// Winkel im Bogenmaß
    pub angle: f64,
    pub center: Coordinates,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub original: Vec<(PointId, Coordinates)>,
}

impl Rotate {
    pub fn new(shape_ids: Vec<ShapeId>, angle: f64, center: Coordinates) -> Self {
        Self {
            shape_ids,
            angle,
            center,
            original: Vec::new(),
        }
    }
}

impl Reversible for Rotate {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        require_shapes(world, &self.shape_ids)?;
        require_finite(self.angle, "angle")?;
        require_coordinates(self.center, "center")
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        self.original = snapshot_points(world, &self.shape_ids);
        world.rotate_shapes(&self.shape_ids, self.angle, self.center)?;
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        check_snapshot(world, &self.original)
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        restore_points(world, &self.original)
    }
}

// ── Homothety ───────────────────────────────────────────────────────

/// Zentrische Streckung um `center`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Homothety {
    pub shape_ids: Vec<ShapeId>,
    pub factor: f64,
    pub center: Coordinates,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub original: Vec<(PointId, Coordinates)>,
}

impl Homothety {
    pub fn new(shape_ids: Vec<ShapeId>, factor: f64, center: Coordinates) -> Self {
        Self {
            shape_ids,
            factor,
            center,
            original: Vec::new(),
        }
    }
}

impl Reversible for Homothety {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        require_shapes(world, &self.shape_ids)?;
        require_finite(self.factor, "factor")?;
        if self.factor.abs() < crate::core::COINCIDENCE_EPSILON {
            return Err(ActionError::InvalidParameter("factor ist 0".into()));
        }
        require_coordinates(self.center, "center")
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        self.original = snapshot_points(world, &self.shape_ids);
        world.homothety_shapes(&self.shape_ids, self.factor, self.center)?;
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        check_snapshot(world, &self.original)
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        restore_points(world, &self.original)
    }
}

// ── Reverse ─────────────────────────────────────────────────────────

/// Spiegelt Formen an der Achse `axis[0] → axis[1]` und dreht sie um
/// (Bogenrichtung, Biface-Farbe, `is_reversed`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reverse {
    pub shape_ids: Vec<ShapeId>,
    pub axis: [Coordinates; 2],
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub original: Vec<(PointId, Coordinates)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ratios: Vec<(PointId, f64)>,
}

impl Reverse {
    pub fn new(shape_ids: Vec<ShapeId>, axis: [Coordinates; 2]) -> Self {
        Self {
            shape_ids,
            axis,
            original: Vec::new(),
            ratios: Vec::new(),
        }
    }
}

impl Reversible for Reverse {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        require_shapes(world, &self.shape_ids)?;
        require_coordinates(self.axis[0], "axis")?;
        require_coordinates(self.axis[1], "axis")?;
        if self.axis[0].coincides(self.axis[1]) {
            return Err(ActionError::Geometry("Achse ohne Richtung"));
        }
        Ok(())
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        self.original = snapshot_points(world, &self.shape_ids);
        self.ratios = self
            .original
            .iter()
            .filter_map(|(id, _)| world.point(*id)?.ratio.map(|r| (*id, r)))
            .collect();
        world.reflect_shapes(&self.shape_ids, self.axis[0], self.axis[1])?;
        for id in &self.shape_ids {
            world.reverse_shape(*id)?;
            // Gespiegelte Formen behalten ihren Umlaufsinn
            world.reverse_outline(*id)?;
        }
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        require_shapes(world, &self.shape_ids)?;
        check_snapshot(world, &self.original)
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        for id in &self.shape_ids {
            world.reverse_outline(*id)?;
            world.reverse_shape(*id)?;
        }
        for (id, ratio) in &self.ratios {
            let point = world.point_mut(*id).ok_or(WorldError::MissingPoint(*id))?;
            point.ratio = Some(*ratio);
        }
        restore_points(world, &self.original)
    }
}
