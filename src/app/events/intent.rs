use crate::app::selection::Selection;
use crate::app::tools::ToolKind;
use crate::core::{Color, Coordinates};
use crate::persistence::ShapeKit;
use crate::shared::WorkbenchOptions;
use std::path::PathBuf;

/// App-Intent Events.
/// Intents sind Eingaben aus UI/System ohne direkte Mutationslogik.
/// Alle Positionen sind bereits in Weltkoordinaten umgerechnet.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Zeiger gedrückt
    PointerDown { at: Coordinates },
    /// Zeiger bewegt
    PointerMove { at: Coordinates },
    /// Zeiger losgelassen
    PointerUp { at: Coordinates },
    /// Berührung begonnen (alle aktiven Finger)
    TouchStart { touches: Vec<Coordinates> },
    /// Berührung bewegt (alle aktiven Finger)
    TouchMove { touches: Vec<Coordinates> },
    /// Berührung beendet (verbleibende Finger)
    TouchEnd { touches: Vec<Coordinates> },
    /// Ein externer Resolver hat bereits ein Objekt gewählt
    ObjectSelected {
        selection: Selection,
        at: Coordinates,
    },
    /// Aktives Werkzeug auf den ersten Schritt zurücksetzen
    RestartRequested,
    /// Animations-Takt (Sekunden seit dem letzten Frame)
    AnimationFrame { dt: f64 },

    /// Werkzeug wechseln
    ToolSelected { tool: ToolKind },
    /// Aktives Werkzeug beenden
    ToolDeactivated,
    /// Vorlage im Bausatz gewählt
    TemplateChosen { name: String },
    /// Farbe für das Färben-Werkzeug gewählt
    ColorChosen { color: Color },
    /// Bausatz wurde extern geladen
    KitLoaded { kit: ShapeKit },
    /// Bausatz aus Datei laden
    KitFileSelected { path: PathBuf },

    /// Undo: Letzten Batch rückgängig machen
    UndoRequested,
    /// Redo: Rückgängig gemachten Batch wiederherstellen
    RedoRequested,
    /// Zu einem Schritt der Historie springen (0 = Anfangszustand)
    HistoryJumpRequested { index: usize },

    /// Pan/Zoom-Geste beginnt (z.B. mittlere Maustaste)
    PanZoomStarted,
    /// Pan/Zoom-Geste endet
    PanZoomEnded,
    /// Kamera um Delta verschieben (Welt-Einheiten)
    CameraPan { delta: Coordinates },
    /// Kamera zoomen (optional auf einen Fokuspunkt)
    CameraZoom {
        factor: f64,
        focus_world: Option<Coordinates>,
    },
    /// Viewport-Größe hat sich geändert
    ViewportResized { size: [f64; 2] },
    /// Kamera auf Standard zurücksetzen
    ResetCameraRequested,

    /// Leere Szene beginnen
    NewSceneRequested,
    /// Szene aus Datei laden
    SceneFileSelected { path: PathBuf },
    /// Szene in Datei speichern
    SceneSavePathSelected { path: PathBuf },
    /// Arbeitsbereich (Szene samt Historie) laden
    WorkspaceFileSelected { path: PathBuf },
    /// Arbeitsbereich speichern
    WorkspaceSavePathSelected { path: PathBuf },

    /// Optionen wurden geändert
    OptionsChanged { options: Box<WorkbenchOptions> },
    /// Optionen auf Standard zurücksetzen
    ResetOptionsRequested,
}
