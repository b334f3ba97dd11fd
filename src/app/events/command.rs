use crate::app::selection::Selection;
use crate::app::tools::ToolKind;
use crate::core::{Color, Coordinates};
use crate::persistence::ShapeKit;
use crate::shared::WorkbenchOptions;
use std::path::PathBuf;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone)]
pub enum AppCommand {
    // ── Werkzeug-Eingaben ──
    /// Zeiger gedrückt: erst Auflösung über die Auswahl-Beschränkungen,
    /// sonst als reine Zeigerposition an das Werkzeug
    ToolPointerDown { at: Coordinates, pick_radius: f64 },
    ToolPointerMove { at: Coordinates },
    ToolPointerUp { at: Coordinates },
    /// Bereits aufgelöstes Objekt an das Werkzeug geben
    ToolObjectSelected {
        selection: Selection,
        at: Coordinates,
    },
    RestartTool,
    AdvanceAnimation { dt: f64 },

    // ── Werkzeug-Verwaltung ──
    ActivateTool { tool: ToolKind },
    DeactivateTool,
    ChooseTemplate { name: String },
    ChooseColor { color: Color },
    DeliverKit { kit: ShapeKit },
    LoadKit { path: PathBuf },

    // ── Historie ──
    Undo,
    Redo,
    JumpTo { index: usize },

    // ── Kamera & Viewport ──
    /// Aktives Werkzeug anhalten (Pan/Zoom übernimmt)
    PauseTool,
    ResumeTool,
    PanCamera { delta: Coordinates },
    ZoomCamera {
        factor: f64,
        focus_world: Option<Coordinates>,
    },
    /// Zwei-Finger-Geste beginnt: Ankerpunkte festhalten
    BeginPinch { touches: [Coordinates; 2] },
    /// Zwei-Finger-Geste: Kamera so führen, dass die Anker unter den Fingern bleiben
    UpdatePinch { touches: [Coordinates; 2] },
    EndPinch,
    SetViewportSize { size: [f64; 2] },
    ResetCamera,

    // ── Datei-I/O ──
    NewScene,
    LoadScene { path: PathBuf },
    SaveScene { path: PathBuf },
    LoadWorkspace { path: PathBuf },
    SaveWorkspace { path: PathBuf },

    // ── Optionen ──
    ApplyOptions { options: Box<WorkbenchOptions> },
    ResetOptions,
}
