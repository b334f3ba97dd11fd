//! Tool-Trait: Schnittstelle für alle Werkzeuge.

use crate::app::selection::SelectionConstraints;
use crate::core::World;

use super::{ToolContext, ToolEvent, ToolKind, ToolOutput, ToolPreview};

/// Schnittstelle für alle Werkzeuge (Erstellen, Verschieben, Schneiden, …).
///
/// Tools sind zustandsbehaftet (benannte Schritte) und verändern die World
/// nie selbst: ein abgeschlossener Ablauf liefert einen `ActionBatch`.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Anzeigename für die Werkzeugleiste
    fn name(&self) -> &str;

    /// Kurzbeschreibung / Tooltip
    fn description(&self) -> &str;

    /// Name des aktuellen Schritts (z.B. "selectSecondPoint")
    fn step(&self) -> &'static str;

    /// Statustext für den aktuellen Schritt (z.B. "Zweiten Punkt wählen")
    fn status_text(&self) -> &str;

    /// Auswahl-Beschränkungen des aktuellen Schritts.
    fn constraints(&self, world: &World) -> SelectionConstraints;

    /// Tool aktivieren: erster Schritt.
    fn start(&mut self, ctx: &ToolContext) -> ToolOutput;

    /// Ereignis im aktuellen Schritt verarbeiten.
    fn handle(&mut self, event: &ToolEvent, ctx: &ToolContext) -> ToolOutput;

    /// Tool deaktivieren: angefangene Eingaben und Animationen verwerfen.
    fn end(&mut self);

    /// Preview-Geometrie für den aktuellen Schritt.
    fn preview(&self, _world: &World) -> ToolPreview {
        ToolPreview::default()
    }

    /// Hat das Tool angefangene Eingaben (erster Schritt verlassen)?
    fn has_pending_input(&self) -> bool {
        false
    }

    /// Braucht das Tool Animations-Frames?
    fn is_animating(&self) -> bool {
        false
    }
}
