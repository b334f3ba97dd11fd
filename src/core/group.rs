//! Gruppe: Menge von Formen, die gemeinsam bewegt, gefärbt und gedreht werden.

use super::{GroupId, ShapeId};
use serde::{Deserialize, Serialize};

/// Eine Gruppe in der `World`. Eine Form gehört zu höchstens einer Gruppe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub shape_ids: Vec<ShapeId>,
}

impl Group {
    pub fn new(id: GroupId, shape_ids: Vec<ShapeId>) -> Self {
        Self { id, shape_ids }
    }

    pub fn contains(&self, shape_id: ShapeId) -> bool {
        self.shape_ids.contains(&shape_id)
    }

    /// Fügt eine Form hinzu (idempotent).
    pub fn add(&mut self, shape_id: ShapeId) {
        if !self.contains(shape_id) {
            self.shape_ids.push(shape_id);
        }
    }

    /// Entfernt eine Form und liefert ihre bisherige Position.
    pub fn remove(&mut self, shape_id: ShapeId) -> Option<usize> {
        let index = self.shape_ids.iter().position(|id| *id == shape_id)?;
        self.shape_ids.remove(index);
        Some(index)
    }

    pub fn is_empty(&self) -> bool {
        self.shape_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_and_remove_reports_index() {
        let mut group = Group::new(GroupId(1), vec![ShapeId(2)]);
        group.add(ShapeId(3));
        group.add(ShapeId(3));
        assert_eq!(group.shape_ids, vec![ShapeId(2), ShapeId(3)]);
        assert_eq!(group.remove(ShapeId(3)), Some(1));
        assert_eq!(group.remove(ShapeId(3)), None);
        assert!(!group.is_empty());
    }
}
