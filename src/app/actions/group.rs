//! Gruppen anlegen, erweitern und auflösen.

use super::{require_shapes, ActionError, Reversible};
use crate::core::{Group, GroupId, ShapeId, World, WorldError};
use serde::{Deserialize, Serialize};

fn require_ungrouped(world: &World, shape_ids: &[ShapeId]) -> Result<(), ActionError> {
    match shape_ids.iter().find_map(|id| world.group_of(*id).map(|g| (*id, g))) {
        Some((shape, group)) => Err(ActionError::InvalidParameter(format!(
            "{shape} gehört bereits zu {group}"
        ))),
        None => Ok(()),
    }
}

// ── CreateGroup ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroup {
    pub shape_ids: Vec<ShapeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
}

impl CreateGroup {
    pub fn new(shape_ids: Vec<ShapeId>) -> Self {
        Self {
            shape_ids,
            group_id: None,
        }
    }
}

impl Reversible for CreateGroup {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        require_shapes(world, &self.shape_ids)?;
        if self.shape_ids.len() < 2 {
            return Err(ActionError::InvalidParameter(
                "eine Gruppe braucht mindestens zwei Formen".into(),
            ));
        }
        require_ungrouped(world, &self.shape_ids)?;
        if let Some(id) = self.group_id {
            if world.id_in_use(id.0) {
                return Err(WorldError::IdInUse(id.0).into());
            }
        }
        Ok(())
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        let id = match self.group_id {
            Some(id) => id,
            None => world.allocator().group(),
        };
        world.insert_group(Group::new(id, self.shape_ids.clone()), None)?;
        self.group_id = Some(id);
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        let id = self.group_id.ok_or(ActionError::NotExecuted)?;
        world
            .group(id)
            .map(|_| ())
            .ok_or_else(|| WorldError::MissingGroup(id).into())
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        let id = self.group_id.ok_or(ActionError::NotExecuted)?;
        world.remove_group(id).ok_or(WorldError::MissingGroup(id))?;
        Ok(())
    }
}

// ── AddToGroup ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToGroup {
    pub group_id: GroupId,
    pub shape_ids: Vec<ShapeId>,
}

impl AddToGroup {
    pub fn new(group_id: GroupId, shape_ids: Vec<ShapeId>) -> Self {
        Self {
            group_id,
            shape_ids,
        }
    }
}

impl Reversible for AddToGroup {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        if world.group(self.group_id).is_none() {
            return Err(WorldError::MissingGroup(self.group_id).into());
        }
        require_shapes(world, &self.shape_ids)?;
        require_ungrouped(world, &self.shape_ids)
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        let group = world
            .group_mut(self.group_id)
            .ok_or(WorldError::MissingGroup(self.group_id))?;
        for id in &self.shape_ids {
            group.add(*id);
        }
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        let group = world
            .group(self.group_id)
            .ok_or(WorldError::MissingGroup(self.group_id))?;
        match self.shape_ids.iter().find(|id| !group.contains(**id)) {
            Some(id) => Err(ActionError::InvalidParameter(format!(
                "{id} ist nicht in {}",
                self.group_id
            ))),
            None => Ok(()),
        }
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        let group = world
            .group_mut(self.group_id)
            .ok_or(WorldError::MissingGroup(self.group_id))?;
        for id in self.shape_ids.iter().rev() {
            group.remove(*id);
        }
        Ok(())
    }
}

// ── DeleteGroup ─────────────────────────────────────────────────────

/// Löst eine Gruppe auf; die Formen bleiben bestehen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteGroup {
    pub group_id: GroupId,
    /// Gruppe und ihre Position vor dem Auflösen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<(Group, usize)>,
}

impl DeleteGroup {
    pub fn new(group_id: GroupId) -> Self {
        Self {
            group_id,
            removed: None,
        }
    }
}

impl Reversible for DeleteGroup {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        world
            .group(self.group_id)
            .map(|_| ())
            .ok_or_else(|| WorldError::MissingGroup(self.group_id).into())
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        let removed = world
            .remove_group(self.group_id)
            .ok_or(WorldError::MissingGroup(self.group_id))?;
        self.removed = Some(removed);
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        let (group, _) = self.removed.as_ref().ok_or(ActionError::NotExecuted)?;
        if world.id_in_use(group.id.0) {
            return Err(WorldError::IdInUse(group.id.0).into());
        }
        require_shapes(world, &group.shape_ids)?;
        require_ungrouped(world, &group.shape_ids)
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        let (group, z_index) = self.removed.take().ok_or(ActionError::NotExecuted)?;
        world.insert_group(group, Some(z_index))?;
        Ok(())
    }
}
