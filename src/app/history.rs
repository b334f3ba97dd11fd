use super::actions::{ActionBatch, ActionError};
use crate::core::World;
use crate::persistence::SceneData;
use serde::{Deserialize, Serialize};

/// Lineare Historie ausgeführter Action-Batches mit Cursor.
///
/// Alle Batches `0..cursor` vom Anfangszustand `initial` aus abgespielt
/// ergeben exakt den aktuellen Zustand der World. Wird `max_depth`
/// überschritten, wandert der älteste Batch in den Anfangszustand.
#[derive(Debug, Clone)]
pub struct History {
    initial: SceneData,
    batches: Vec<ActionBatch>,
    cursor: usize,
    max_depth: usize,
}

/// Serialisierbare Form der Historie (Arbeitsbereich-Datei).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryData {
    pub initial: SceneData,
    pub batches: Vec<ActionBatch>,
    pub cursor: usize,
}

impl History {
    /// Neue Historie mit `world` als Anfangszustand.
    pub fn new(world: &World, max_depth: usize) -> Self {
        Self {
            initial: world.to_scene(),
            batches: Vec::new(),
            cursor: 0,
            max_depth: max_depth.max(1),
        }
    }

    /// Verwirft alle Batches; `world` wird neuer Anfangszustand.
    pub fn reset(&mut self, world: &World) {
        self.initial = world.to_scene();
        self.batches.clear();
        self.cursor = 0;
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
        while self.batches.len() > self.max_depth && self.fold_oldest() {}
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        self.cursor < self.batches.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn batches(&self) -> &[ActionBatch] {
        &self.batches
    }

    pub fn initial(&self) -> &SceneData {
        &self.initial
    }

    /// Führt einen Batch aus und nimmt ihn bei Erfolg auf.
    pub fn execute(&mut self, world: &mut World, mut batch: ActionBatch) -> Result<(), ActionError> {
        if batch.is_empty() {
            return Err(ActionError::MissingParameter("actions"));
        }
        batch.execute(world)?;
        self.record(batch);
        Ok(())
    }

    /// Nimmt einen bereits ausgeführten Batch auf; der Redo-Zweig entfällt.
    pub fn record(&mut self, batch: ActionBatch) {
        self.batches.truncate(self.cursor);
        self.batches.push(batch);
        self.cursor = self.batches.len();
        while self.batches.len() > self.max_depth && self.fold_oldest() {}
    }

    /// Spielt den ältesten Batch in den Anfangszustand ein.
    fn fold_oldest(&mut self) -> bool {
        if self.batches.is_empty() || self.cursor == 0 {
            return false;
        }
        let (mut world, _) = World::from_scene(&self.initial);
        let mut oldest = self.batches[0].clone();
        if let Err(e) = oldest.execute(&mut world) {
            log::error!("Ältester Batch '{}' nicht abspielbar: {}", oldest.label(), e);
            return false;
        }
        self.initial = world.to_scene();
        self.batches.remove(0);
        self.cursor -= 1;
        true
    }

    /// Macht den Batch vor dem Cursor rückgängig. `Ok(false)`: nichts zu tun.
    pub fn undo(&mut self, world: &mut World) -> Result<bool, ActionError> {
        if self.cursor == 0 {
            return Ok(false);
        }
        self.batches[self.cursor - 1].undo(world)?;
        self.cursor -= 1;
        Ok(true)
    }

    /// Wiederholt den Batch am Cursor. `Ok(false)`: nichts zu tun.
    pub fn redo(&mut self, world: &mut World) -> Result<bool, ActionError> {
        if self.cursor >= self.batches.len() {
            return Ok(false);
        }
        self.batches[self.cursor].execute(world)?;
        self.cursor += 1;
        Ok(true)
    }

    /// Springt per Undo/Redo zum Schritt `index` (0 = Anfangszustand).
    pub fn jump_to(&mut self, world: &mut World, index: usize) -> Result<(), ActionError> {
        if index > self.batches.len() {
            return Err(ActionError::InvalidParameter(format!(
                "Schritt {index} existiert nicht (max. {})",
                self.batches.len()
            )));
        }
        while self.cursor > index {
            self.undo(world)?;
        }
        while self.cursor < index {
            self.redo(world)?;
        }
        Ok(())
    }

    /// Baut den Zustand nach `index` Batches frisch aus dem Anfangszustand.
    pub fn replay(&self, index: usize) -> Result<World, ActionError> {
        let (mut world, report) = World::from_scene(&self.initial);
        if !report.is_clean() {
            log::warn!("Anfangszustand mit {} Problemen geladen", report.issues.len());
        }
        for batch in self.batches.iter().take(index) {
            batch.clone().execute(&mut world)?;
        }
        Ok(world)
    }

    pub fn to_data(&self) -> HistoryData {
        HistoryData {
            initial: self.initial.clone(),
            batches: self.batches.clone(),
            cursor: self.cursor,
        }
    }

    /// Historie und World aus einer gespeicherten Historie (bis zum Cursor abgespielt).
    pub fn from_data(data: HistoryData, max_depth: usize) -> Result<(Self, World), ActionError> {
        let mut history = Self {
            cursor: data.cursor.min(data.batches.len()),
            initial: data.initial,
            batches: data.batches,
            max_depth: max_depth.max(1),
        };
        let (mut world, report) = World::from_scene(&history.initial);
        if !report.is_clean() {
            log::warn!("Anfangszustand mit {} Problemen geladen", report.issues.len());
        }
        for batch in history.batches.iter_mut().take(history.cursor) {
            batch.execute(&mut world)?;
        }
        Ok((history, world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::{CreateShape, DeleteShapes, Translate};
    use crate::core::{Coordinates, ShapeId, ShapeKind};
    use crate::persistence::ShapeData;

    fn create_batch(x: f64) -> ActionBatch {
        ActionBatch::single(CreateShape::new(
            ShapeData::template(ShapeKind::Regular, "M 0 0 L 10 0 L 10 10 Z"),
            Coordinates::new(x, 0.0),
        ))
    }

    fn first_shape(world: &World) -> ShapeId {
        world.shape_ids()[0]
    }

    #[test]
    fn empty_history_cannot_undo_or_redo() {
        let world = World::new();
        let history = History::new(&world, 10);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_and_redo_move_cursor() {
        let mut world = World::new();
        let mut history = History::new(&world, 10);
        history
            .execute(&mut world, create_batch(0.0))
            .expect("ausführbar");
        let after = world.to_scene();
        assert!(history.can_undo());

        assert!(history.undo(&mut world).expect("Undo"));
        assert!(world.is_empty());
        assert!(!history.undo(&mut world).expect("nichts zu tun"));

        assert!(history.redo(&mut world).expect("Redo"));
        assert_eq!(world.to_scene(), after);
        assert!(!history.can_redo());
    }

    #[test]
    fn new_batch_truncates_redo_branch() {
        let mut world = World::new();
        let mut history = History::new(&world, 10);
        history.execute(&mut world, create_batch(0.0)).expect("ausführbar");
        history.execute(&mut world, create_batch(20.0)).expect("ausführbar");
        history.undo(&mut world).expect("Undo");
        history.execute(&mut world, create_batch(40.0)).expect("ausführbar");
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn failed_batch_is_not_recorded() {
        let mut world = World::new();
        let mut history = History::new(&world, 10);
        let result = history.execute(
            &mut world,
            ActionBatch::single(DeleteShapes::new(vec![ShapeId(42)])),
        );
        assert!(result.is_err());
        assert!(history.is_empty());
    }

    #[test]
    fn replay_reproduces_live_state() {
        let mut world = World::new();
        let mut history = History::new(&world, 10);
        history.execute(&mut world, create_batch(0.0)).expect("ausführbar");
        history.execute(&mut world, create_batch(30.0)).expect("ausführbar");
        let id = first_shape(&world);
        history
            .execute(
                &mut world,
                ActionBatch::single(Translate::new(vec![id], Coordinates::new(0.5, 0.25))),
            )
            .expect("ausführbar");
        history
            .execute(&mut world, ActionBatch::single(DeleteShapes::new(vec![id])))
            .expect("ausführbar");

        let replayed = history.replay(history.cursor()).expect("abspielbar");
        assert_eq!(replayed.to_scene(), world.to_scene());
        assert_eq!(replayed.next_id(), world.next_id());
    }

    #[test]
    fn jump_to_walks_history() {
        let mut world = World::new();
        let mut history = History::new(&world, 10);
        for x in [0.0, 20.0, 40.0] {
            history.execute(&mut world, create_batch(x)).expect("ausführbar");
        }
        history.jump_to(&mut world, 1).expect("Sprung");
        assert_eq!(world.shape_count(), 1);
        history.jump_to(&mut world, 3).expect("Sprung");
        assert_eq!(world.shape_count(), 3);
        assert!(history.jump_to(&mut world, 4).is_err());
    }

    #[test]
    fn max_depth_folds_oldest_batch_into_initial() {
        let mut world = World::new();
        let mut history = History::new(&world, 2);
        for x in [0.0, 20.0, 40.0] {
            history.execute(&mut world, create_batch(x)).expect("ausführbar");
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.initial().shapes.len(), 1);
        let replayed = history.replay(history.cursor()).expect("abspielbar");
        assert_eq!(replayed.to_scene(), world.to_scene());
    }

    #[test]
    fn history_data_round_trips_through_json() {
        let mut world = World::new();
        let mut history = History::new(&world, 10);
        history.execute(&mut world, create_batch(0.0)).expect("ausführbar");
        history.execute(&mut world, create_batch(30.0)).expect("ausführbar");
        history.undo(&mut world).expect("Undo");

        let json = serde_json::to_string(&history.to_data()).expect("serialisierbar");
        let data: HistoryData = serde_json::from_str(&json).expect("lesbar");
        let (mut loaded, mut loaded_world) = History::from_data(data, 10).expect("abspielbar");
        assert_eq!(loaded.cursor(), 1);
        assert_eq!(loaded_world.to_scene(), world.to_scene());

        loaded.redo(&mut loaded_world).expect("Redo");
        history.redo(&mut world).expect("Redo");
        assert_eq!(loaded_world.to_scene(), world.to_scene());
    }
}
