//! Application State: zentrale Datenhaltung.
//!
//! Der `AppState` ist der explizite Kontext, den Controller und Handler
//! per Referenz erhalten: World, Historie, Werkzeuge, Ansicht, Optionen.

use super::history::History;
use super::tools::ToolManager;
use super::CommandLog;
use crate::core::{Camera, Color, Coordinates, World};
use crate::persistence::{LoadReport, ShapeKit};
use crate::shared::WorkbenchOptions;
use std::path::PathBuf;

/// Anker einer Zwei-Finger-Geste in Weltkoordinaten.
///
/// Die Anker bleiben während der Geste fest: die Kamera wird so geführt,
/// dass sie unter den Fingern liegen bleiben.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchAnchor {
    pub midpoint: Coordinates,
    pub distance: f64,
}

/// Kamera, Viewport und Zeigerzustand
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub camera: Camera,
    /// Viewport-Größe in Pixeln [Breite, Höhe]
    pub viewport_size: [f64; 2],
    /// Laufende Zwei-Finger-Geste
    pub pinch: Option<PinchAnchor>,
    /// Letzte bekannte Zeigerposition (Welt)
    pub cursor: Coordinates,
    pub pointer_down: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            camera: Camera::new(),
            viewport_size: [0.0, 0.0],
            pinch: None,
            cursor: Coordinates::ZERO,
            pointer_down: false,
        }
    }
}

/// Dateibezogener Zustand
#[derive(Debug, Clone, Default)]
pub struct FileState {
    /// Zuletzt geladene oder gespeicherte Szene
    pub current_scene_path: Option<PathBuf>,
    /// Probleme beim letzten Laden
    pub last_load_report: Option<LoadReport>,
    /// Optionen-Datei; ohne Pfad werden geänderte Optionen nicht gespeichert
    pub options_path: Option<PathBuf>,
}

/// Hauptzustand der Anwendung
pub struct AppState {
    pub world: World,
    pub history: History,
    pub tools: ToolManager,
    pub view: ViewState,
    pub files: FileState,
    /// Geladener Bausatz für das Erstellen-Tool
    pub kit: Option<ShapeKit>,
    /// Gewählte Farbe für das Färben-Tool
    pub chosen_color: Option<Color>,
    pub options: WorkbenchOptions,
    pub command_log: CommandLog,
    /// Rückmeldung für die Statuszeile
    pub status_message: Option<String>,
    redraw_requested: bool,
}

impl AppState {
    /// Erstellt einen leeren AppState mit Standard-Optionen.
    pub fn new() -> Self {
        Self::with_options(WorkbenchOptions::default())
    }

    pub fn with_options(options: WorkbenchOptions) -> Self {
        let world = World::new();
        Self {
            history: History::new(&world, options.history_max_depth),
            world,
            tools: ToolManager::new(),
            view: ViewState::new(),
            files: FileState::default(),
            kit: None,
            chosen_color: None,
            options,
            command_log: CommandLog::new(),
            status_message: None,
            redraw_requested: false,
        }
    }

    /// Gibt die Anzahl der Formen zurück (für UI-Anzeige)
    pub fn shape_count(&self) -> usize {
        self.world.shape_count()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Fordert ein Neuzeichnen an.
    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    /// Liefert und löscht die Neuzeichnen-Anforderung.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Ersetzt World und Historie (Laden, neue Szene).
    pub fn replace_world(&mut self, world: World, history: History) {
        self.world = world;
        self.history = history;
        self.request_redraw();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
