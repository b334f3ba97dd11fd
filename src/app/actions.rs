//! Reversible Actions auf der World (Command-Pattern).
//!
//! Jede Action prüft ihre Parameter, führt aus, prüft die Undo-Parameter
//! und macht rückgängig. Payloads enthalten nur IDs und Werte, nie
//! Referenzen, und lassen sich als JSON speichern und wieder abspielen.
//! Beim ersten Ausführen vergebene IDs werden im Payload festgehalten,
//! damit Redo und Replay dieselben IDs treffen.

mod attributes;
mod group;
mod outline;
mod segment;
mod shape;
mod transform;

pub use attributes::{ChangeColor, ChangeOrder, OrderTarget, ToggleCenter};
pub use group::{AddToGroup, CreateGroup, DeleteGroup};
pub use outline::{is_valid_cut, merged_outline, Cut, Merge};
pub use segment::{DivideSegment, RemoveDivisionPoint};
pub use shape::{CreateShape, DeleteShapes, Duplicate};
pub use transform::{Homothety, Reverse, Rotate, Translate};

use crate::core::{ShapeBundle, ShapeId, World, WorldError};
use serde::{Deserialize, Serialize};

/// Fehler beim Prüfen oder Ausführen einer Action.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("Parameter fehlt: {0}")]
    MissingParameter(&'static str),
    #[error("ungültiger Parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error("geometrische Operation nicht möglich: {0}")]
    Geometry(&'static str),
    #[error("Aktion wurde noch nicht ausgeführt")]
    NotExecuted,
    #[error("ungültiger Payload: {0}")]
    Payload(String),
}

/// Vertrag jeder Action.
///
/// `execute` darf nur nach erfolgreichem `check_do_parameters` laufen und
/// verändert die World entweder vollständig oder gar nicht. `undo` stellt
/// den Zustand vor `execute` exakt wieder her.
pub trait Reversible {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError>;
    fn execute(&mut self, world: &mut World) -> Result<(), ActionError>;
    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError>;
    fn undo(&mut self, world: &mut World) -> Result<(), ActionError>;
}

/// Alle Actions als geschlossene Menge; serialisiert als `{name, payload}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "payload", rename_all = "camelCase")]
pub enum Action {
    CreateShape(CreateShape),
    DeleteShapes(DeleteShapes),
    Translate(Translate),
    Rotate(Rotate),
    Homothety(Homothety),
    Reverse(Reverse),
    DivideSegment(DivideSegment),
    RemoveDivisionPoint(RemoveDivisionPoint),
    Cut(Cut),
    Merge(Merge),
    Duplicate(Duplicate),
    CreateGroup(CreateGroup),
    AddToGroup(AddToGroup),
    DeleteGroup(DeleteGroup),
    ChangeColor(ChangeColor),
    ToggleCenter(ToggleCenter),
    ChangeOrder(ChangeOrder),
}

impl Action {
    /// Name der Action (wie im Payload).
    pub fn name(&self) -> &'static str {
        match self {
            Action::CreateShape(_) => "createShape",
            Action::DeleteShapes(_) => "deleteShapes",
            Action::Translate(_) => "translate",
            Action::Rotate(_) => "rotate",
            Action::Homothety(_) => "homothety",
            Action::Reverse(_) => "reverse",
            Action::DivideSegment(_) => "divideSegment",
            Action::RemoveDivisionPoint(_) => "removeDivisionPoint",
            Action::Cut(_) => "cut",
            Action::Merge(_) => "merge",
            Action::Duplicate(_) => "duplicate",
            Action::CreateGroup(_) => "createGroup",
            Action::AddToGroup(_) => "addToGroup",
            Action::DeleteGroup(_) => "deleteGroup",
            Action::ChangeColor(_) => "changeColor",
            Action::ToggleCenter(_) => "toggleCenter",
            Action::ChangeOrder(_) => "changeOrder",
        }
    }

    /// Baut eine Action aus Name und Plain-Data-Payload.
    pub fn from_payload(name: &str, payload: serde_json::Value) -> Result<Self, ActionError> {
        let tagged = serde_json::json!({ "name": name, "payload": payload });
        serde_json::from_value(tagged).map_err(|e| ActionError::Payload(e.to_string()))
    }

    /// Payload ohne Namen.
    pub fn payload(&self) -> Result<serde_json::Value, ActionError> {
        let mut tagged =
            serde_json::to_value(self).map_err(|e| ActionError::Payload(e.to_string()))?;
        Ok(tagged
            .get_mut("payload")
            .map(serde_json::Value::take)
            .unwrap_or(serde_json::Value::Null))
    }

    fn inner(&self) -> &dyn Reversible {
        match self {
            Action::CreateShape(a) => a,
            Action::DeleteShapes(a) => a,
            Action::Translate(a) => a,
            Action::Rotate(a) => a,
            Action::Homothety(a) => a,
            Action::Reverse(a) => a,
            Action::DivideSegment(a) => a,
            Action::RemoveDivisionPoint(a) => a,
            Action::Cut(a) => a,
            Action::Merge(a) => a,
            Action::Duplicate(a) => a,
            Action::CreateGroup(a) => a,
            Action::AddToGroup(a) => a,
            Action::DeleteGroup(a) => a,
            Action::ChangeColor(a) => a,
            Action::ToggleCenter(a) => a,
            Action::ChangeOrder(a) => a,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Reversible {
        match self {
            Action::CreateShape(a) => a,
            Action::DeleteShapes(a) => a,
            Action::Translate(a) => a,
            Action::Rotate(a) => a,
            Action::Homothety(a) => a,
            Action::Reverse(a) => a,
            Action::DivideSegment(a) => a,
            Action::RemoveDivisionPoint(a) => a,
            Action::Cut(a) => a,
            Action::Merge(a) => a,
            Action::Duplicate(a) => a,
            Action::CreateGroup(a) => a,
            Action::AddToGroup(a) => a,
            Action::DeleteGroup(a) => a,
            Action::ChangeColor(a) => a,
            Action::ToggleCenter(a) => a,
            Action::ChangeOrder(a) => a,
        }
    }

    /// Prüft und führt aus. Bei ungültigen Parametern bleibt die World unverändert.
    pub fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        if let Err(err) = self.inner().check_do_parameters(world) {
            log::warn!("Action '{}' abgewiesen: {}", self.name(), err);
            return Err(err);
        }
        self.inner_mut().execute(world)
    }

    /// Prüft und macht rückgängig.
    pub fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        if let Err(err) = self.inner().check_undo_parameters(world) {
            log::warn!("Undo von '{}' abgewiesen: {}", self.name(), err);
            return Err(err);
        }
        self.inner_mut().undo(world)
    }
}

macro_rules! impl_from_action {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Action {
                fn from(action: $variant) -> Self {
                    Action::$variant(action)
                }
            }
        )*
    };
}

impl_from_action!(
    CreateShape,
    DeleteShapes,
    Translate,
    Rotate,
    Homothety,
    Reverse,
    DivideSegment,
    RemoveDivisionPoint,
    Cut,
    Merge,
    Duplicate,
    CreateGroup,
    AddToGroup,
    DeleteGroup,
    ChangeColor,
    ToggleCenter,
    ChangeOrder,
);

// ── Batch ───────────────────────────────────────────────────────────

/// Eine oder mehrere Actions, die gemeinsam ausgeführt und rückgängig
/// gemacht werden (eine Undo/Redo-Einheit).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionBatch {
    pub actions: Vec<Action>,
}

impl ActionBatch {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    /// Batch mit genau einer Action.
    pub fn single(action: impl Into<Action>) -> Self {
        Self::new(vec![action.into()])
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Namen aller Actions, für Logs und Anzeige.
    pub fn label(&self) -> String {
        self.actions
            .iter()
            .map(Action::name)
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Führt alle Actions aus. Schlägt eine fehl, werden die bereits
    /// ausgeführten in umgekehrter Reihenfolge zurückgenommen.
    pub fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        for index in 0..self.actions.len() {
            if let Err(err) = self.actions[index].execute(world) {
                for done in self.actions[..index].iter_mut().rev() {
                    if let Err(rollback) = done.undo(world) {
                        log::error!("Rücknahme von '{}' fehlgeschlagen: {}", done.name(), rollback);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Macht alle Actions in umgekehrter Reihenfolge rückgängig.
    pub fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        let count = self.actions.len();
        for offset in 0..count {
            let index = count - 1 - offset;
            if let Err(err) = self.actions[index].undo(world) {
                for undone in self.actions[index + 1..].iter_mut() {
                    if let Err(redo) = undone.execute(world) {
                        log::error!("Wiederholen von '{}' fehlgeschlagen: {}", undone.name(), redo);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

// ── Gemeinsame Prüfungen ────────────────────────────────────────────

/// Nicht-leere Liste existierender, eindeutiger Formen.
fn require_shapes(world: &World, shape_ids: &[ShapeId]) -> Result<(), ActionError> {
    if shape_ids.is_empty() {
        return Err(ActionError::MissingParameter("shapeIds"));
    }
    for (index, id) in shape_ids.iter().enumerate() {
        if world.shape(*id).is_none() {
            return Err(WorldError::MissingShape(*id).into());
        }
        if shape_ids[..index].contains(id) {
            return Err(ActionError::InvalidParameter(format!("{id} doppelt")));
        }
    }
    Ok(())
}

/// Alle IDs eines Bündels sind in der World noch frei.
fn require_bundle_ids_free(world: &World, bundle: &ShapeBundle) -> Result<(), ActionError> {
    let raw_ids = std::iter::once(bundle.shape.id.0)
        .chain(bundle.segments.iter().map(|s| s.id.0))
        .chain(bundle.points.iter().map(|p| p.id.0));
    for raw in raw_ids {
        if world.id_in_use(raw) {
            return Err(WorldError::IdInUse(raw).into());
        }
    }
    Ok(())
}

fn require_finite(value: f64, name: &'static str) -> Result<(), ActionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ActionError::InvalidParameter(format!("{name} ist nicht endlich")))
    }
}
