//! Darstellungs-Attribute: Farbe, Zentrum, Zeichenreihenfolge.

use super::{require_shapes, ActionError, Reversible};
use crate::core::{Color, ShapeId, World, WorldError};
use serde::{Deserialize, Serialize};

// ── ChangeColor ─────────────────────────────────────────────────────

/// Setzt Füll- und/oder Randfarbe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeColor {
    pub shape_ids: Vec<ShapeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    /// (Füllung, Rand) vor der Änderung, je Form
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub previous: Vec<(Color, Color)>,
}

impl ChangeColor {
    pub fn fill(shape_ids: Vec<ShapeId>, color: Color) -> Self {
        Self {
            shape_ids,
            fill: Some(color),
            stroke: None,
            previous: Vec::new(),
        }
    }

    pub fn with_stroke(mut self, color: Color) -> Self {
        self.stroke = Some(color);
        self
    }
}

impl Reversible for ChangeColor {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        require_shapes(world, &self.shape_ids)?;
        if self.fill.is_none() && self.stroke.is_none() {
            return Err(ActionError::MissingParameter("fill/stroke"));
        }
        Ok(())
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        self.previous.clear();
        for id in &self.shape_ids {
            let shape = world.shape_mut(*id).ok_or(WorldError::MissingShape(*id))?;
            self.previous.push((shape.fill_color, shape.stroke_color));
            if let Some(fill) = self.fill {
                shape.fill_color = fill;
            }
            if let Some(stroke) = self.stroke {
                shape.stroke_color = stroke;
            }
        }
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        if self.previous.len() != self.shape_ids.len() {
            return Err(ActionError::NotExecuted);
        }
        require_shapes(world, &self.shape_ids)
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        for (id, (fill, stroke)) in self.shape_ids.iter().zip(&self.previous) {
            let shape = world.shape_mut(*id).ok_or(WorldError::MissingShape(*id))?;
            shape.fill_color = *fill;
            shape.stroke_color = *stroke;
        }
        Ok(())
    }
}

// ── ToggleCenter ────────────────────────────────────────────────────

/// Zeigt/verbirgt das Zentrum der Formen (selbstinvers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleCenter {
    pub shape_ids: Vec<ShapeId>,
}

impl ToggleCenter {
    pub fn new(shape_ids: Vec<ShapeId>) -> Self {
        Self { shape_ids }
    }

    fn toggle(&self, world: &mut World) -> Result<(), ActionError> {
        for id in &self.shape_ids {
            let shown = world
                .shape(*id)
                .map(|s| s.is_center_shown)
                .ok_or(WorldError::MissingShape(*id))?;
            world.set_center_shown(*id, !shown)?;
        }
        Ok(())
    }
}

impl Reversible for ToggleCenter {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        require_shapes(world, &self.shape_ids)
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        self.toggle(world)
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        require_shapes(world, &self.shape_ids)
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        self.toggle(world)
    }
}

// ── ChangeOrder ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderTarget {
    /// Nach oben (zuletzt gezeichnet)
    Front,
    /// Nach unten
    Back,
}

/// Verschiebt Formen in der Zeichenreihenfolge; ihre relative Ordnung bleibt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeOrder {
    pub shape_ids: Vec<ShapeId>,
    pub target: OrderTarget,
    /// Vollständige Zeichenreihenfolge vor der Änderung
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub previous: Vec<ShapeId>,
}

impl ChangeOrder {
    pub fn new(shape_ids: Vec<ShapeId>, target: OrderTarget) -> Self {
        Self {
            shape_ids,
            target,
            previous: Vec::new(),
        }
    }
}

impl Reversible for ChangeOrder {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        require_shapes(world, &self.shape_ids)
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        self.previous = world.shape_ids();
        let mut ordered: Vec<(usize, ShapeId)> = self
            .shape_ids
            .iter()
            .filter_map(|id| world.shape_z_index(*id).map(|z| (z, *id)))
            .collect();
        ordered.sort_by_key(|(z, _)| *z);
        match self.target {
            OrderTarget::Front => {
                let top = world.shape_count().saturating_sub(1);
                for (_, id) in ordered {
                    world.move_shape_to(id, top)?;
                }
            }
            OrderTarget::Back => {
                for (_, id) in ordered.into_iter().rev() {
                    world.move_shape_to(id, 0)?;
                }
            }
        }
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        if self.previous.is_empty() {
            return Err(ActionError::NotExecuted);
        }
        if self.previous.len() != world.shape_count() {
            return Err(ActionError::InvalidParameter(
                "Zeichenreihenfolge passt nicht zur World".into(),
            ));
        }
        require_shapes(world, &self.previous)
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        for (index, id) in self.previous.iter().enumerate() {
            world.move_shape_to(*id, index)?;
        }
        Ok(())
    }
}
