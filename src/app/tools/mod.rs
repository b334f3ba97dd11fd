//! Tool-System: jedes Werkzeug ist ein Zustandsautomat mit benannten Schritten.
//!
//! Tools implementieren den `Tool`-Trait und werden beim `ToolManager`
//! registriert. Sie lesen die World nur; ein abgeschlossener Ablauf liefert
//! einen `ActionBatch` (`ToolOutput::Commit`), den der Controller über die
//! Historie ausführt.

/// Erstellen aus einem Bausatz.
pub mod create;
/// Kopieren mit Ziehen.
pub mod copy;
/// Zerschneiden entlang einer Sehne.
pub mod cut;
/// Segmente teilen.
pub mod divide;
/// Gruppen bilden.
pub mod group;
/// Zusammenfügen zweier Formen.
pub mod merge;
/// Ein-Klick-Werkzeuge (Löschen, Farbe, Zentrum, Reihenfolge, Gruppe lösen).
pub mod pick;
/// Umdrehen mit Animation.
pub mod reverse;
/// Tool-Trait: Schnittstelle für alle Werkzeuge.
mod tool;
/// Verschieben, Drehen, Strecken.
pub mod transform;


pub use tool::Tool;

use super::actions::ActionBatch;
use super::selection::{Selection, SelectionConstraints};
use crate::core::{Color, Coordinates, ShapeGeometry, ShapeId, World};
use crate::persistence::ShapeKit;
use crate::shared::WorkbenchOptions;
use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_4, PI};

// ── Typen ────────────────────────────────────────────────────────

/// Alle bekannten Werkzeuge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolKind {
    Create,
    Move,
    Rotate,
    Scale,
    Reverse,
    Divide,
    Cut,
    Merge,
    Copy,
    Group,
    Ungroup,
    Delete,
    Color,
    ToggleCenter,
    ToFront,
    ToBack,
}

/// Lesender Zugriff auf den Anwendungszustand für einen Tool-Schritt.
#[derive(Clone, Copy)]
pub struct ToolContext<'a> {
    pub world: &'a World,
    pub options: &'a WorkbenchOptions,
}

/// Eingabe-Ereignis für das aktive Tool (Koordinaten in Welt-Einheiten).
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEvent {
    PointerDown(Coordinates),
    PointerMove(Coordinates),
    PointerUp(Coordinates),
    /// Vom Resolver aufgelöstes Objekt unter dem Zeiger
    ObjectSelected {
        selection: Selection,
        at: Coordinates,
    },
    /// Zurück zum ersten Schritt, angefangene Eingaben verwerfen
    Restart,
    /// Animations-Takt, `dt` in Sekunden
    AnimationFrame { dt: f64 },
    KitLoaded(ShapeKit),
    ChooseTemplate(String),
    SetColor(Color),
}

/// Rückgabe eines Tool-Schritts; steuert den Ablauf im Controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Ereignis im aktuellen Schritt ohne Bedeutung
    Ignored,
    /// Schritt gewechselt oder Zwischenstand aktualisiert
    Continue,
    /// Ablauf abgeschlossen, Batch ausführen
    Commit(ActionBatch),
    /// Eingabe abgelehnt (ungültige Konstruktion), Schritt bleibt
    Rejected(String),
}

/// Visuelle Transformation während eines Ziehens oder einer Animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreviewTransform {
    Translate(Coordinates),
    Rotate { angle: f64, center: Coordinates },
    Scale { factor: f64, center: Coordinates },
    /// Umklappen an `axis`, `progress` in [0, 1]
    Flip { axis: [Coordinates; 2], progress: f64 },
}

impl PreviewTransform {
    /// Affine Abbildung in Welt-Koordinaten.
    pub fn affine(&self) -> DAffine2 {
        match *self {
            PreviewTransform::Translate(delta) => DAffine2::from_translation(delta.into()),
            PreviewTransform::Rotate { angle, center } => around(center, DAffine2::from_angle(angle)),
            PreviewTransform::Scale { factor, center } => {
                around(center, DAffine2::from_scale(DVec2::splat(factor)))
            }
            PreviewTransform::Flip { axis, progress } => {
                let dir = DVec2::from(axis[1] - axis[0]).normalize_or_zero();
                let normal = dir.perp();
                // Normalanteil läuft von +1 über 0 nach -1
                let k = (PI * progress.clamp(0.0, 1.0)).cos();
                let linear = glam::DMat2::from_cols(
                    dir * dir.x + normal * normal.x * k,
                    dir * dir.y + normal * normal.y * k,
                );
                around(axis[0], DAffine2::from_mat2(linear))
            }
        }
    }

    pub fn apply(&self, coordinates: Coordinates) -> Coordinates {
        self.affine().transform_point2(coordinates.into()).into()
    }
}

fn around(center: Coordinates, linear: DAffine2) -> DAffine2 {
    let c = DVec2::from(center);
    DAffine2::from_translation(c) * linear * DAffine2::from_translation(-c)
}

/// Preview-Geometrie für den Renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolPreview {
    /// Zusätzliche Umrisse als Pfad-Strings (z.B. Vorlage unter dem Zeiger)
    pub paths: Vec<String>,
    /// Transformation der hervorgehobenen Formen
    pub transform: Option<PreviewTransform>,
    pub highlighted: Vec<ShapeId>,
    /// Markierte Punkte (gewählte Schnittpunkte, Achse, …)
    pub markers: Vec<Coordinates>,
}

impl ToolPreview {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
            && self.transform.is_none()
            && self.highlighted.is_empty()
            && self.markers.is_empty()
    }
}

// ── Gemeinsame Utilities ─────────────────────────────────────

/// Form, die eine Auswahl betrifft (Punkte und Segmente über ihren Besitzer).
pub fn selected_shape(world: &World, selection: &Selection) -> Option<ShapeId> {
    selection.owner_shape(world)
}

/// Mittelpunkt der gemeinsamen Bounding-Box der Formen.
pub fn combined_center(world: &World, shape_ids: &[ShapeId]) -> Option<Coordinates> {
    let mut bounds: Option<(Coordinates, Coordinates)> = None;
    for id in shape_ids {
        let (min, max) = world.shape_geometry(*id)?.bounds();
        bounds = Some(match bounds {
            Some((lo, hi)) => (
                Coordinates::new(lo.x.min(min.x), lo.y.min(min.y)),
                Coordinates::new(hi.x.max(max.x), hi.y.max(max.y)),
            ),
            None => (min, max),
        });
    }
    bounds.map(|(min, max)| min.middle_with(max))
}

/// Geometrie um `offset` verschoben (Vorschau-Umrisse).
pub fn shifted_geometry(mut geometry: ShapeGeometry, offset: Coordinates) -> ShapeGeometry {
    for segment in &mut geometry.segments {
        *segment = segment.translated(offset);
    }
    for point in &mut geometry.points {
        *point = *point + offset;
    }
    geometry
}

/// Richtung von `center` nach `towards`, auf Vielfache von 45° gerastet.
pub fn snapped_direction(center: Coordinates, towards: Coordinates) -> Option<Coordinates> {
    let d = towards - center;
    if d.length() < crate::core::COINCIDENCE_EPSILON {
        return None;
    }
    let angle = d.y.atan2(d.x);
    let snapped = (angle / FRAC_PI_4).round() * FRAC_PI_4;
    Some(Coordinates::from_angle(snapped))
}

// ── ToolManager ──────────────────────────────────────────────────

/// Verwaltet registrierte Tools, das aktive Tool und die Pause durch das
/// permanente Pan/Zoom-Werkzeug.
pub struct ToolManager {
    tools: Vec<Box<dyn Tool>>,
    active_index: Option<usize>,
    paused: bool,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolManager {
    /// Erstellt einen ToolManager mit allen Standard-Tools.
    pub fn new() -> Self {
        let mut manager = Self {
            tools: Vec::new(),
            active_index: None,
            paused: false,
        };
        manager.register(Box::new(create::CreateTool::new()));
        manager.register(Box::new(transform::TransformTool::moving()));
        manager.register(Box::new(transform::TransformTool::rotating()));
        manager.register(Box::new(transform::TransformTool::scaling()));
        manager.register(Box::new(reverse::ReverseTool::new()));
        manager.register(Box::new(divide::DivideTool::new()));
        manager.register(Box::new(cut::CutTool::new()));
        manager.register(Box::new(merge::MergeTool::new()));
        manager.register(Box::new(copy::CopyTool::new()));
        manager.register(Box::new(group::GroupTool::new()));
        for mode in pick::PickMode::ALL {
            manager.register(Box::new(pick::PickTool::new(mode)));
        }
        manager
    }

    /// Registriert ein Tool; ein vorhandenes Tool derselben Art wird ersetzt.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        match self.index_of(tool.kind()) {
            Some(index) => self.tools[index] = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Art und Name aller registrierten Tools.
    pub fn tool_names(&self) -> Vec<(ToolKind, &str)> {
        self.tools.iter().map(|t| (t.kind(), t.name())).collect()
    }

    fn index_of(&self, kind: ToolKind) -> Option<usize> {
        self.tools.iter().position(|t| t.kind() == kind)
    }

    /// Aktiviert ein Tool; das bisherige wird beendet.
    pub fn activate(&mut self, kind: ToolKind, ctx: &ToolContext) -> Option<ToolOutput> {
        let index = self.index_of(kind)?;
        if let Some(old) = self.active_index {
            self.tools[old].end();
        }
        self.active_index = Some(index);
        self.paused = false;
        Some(self.tools[index].start(ctx))
    }

    /// Beendet das aktive Tool.
    pub fn deactivate(&mut self) {
        if let Some(index) = self.active_index.take() {
            self.tools[index].end();
        }
        self.paused = false;
    }

    pub fn active_kind(&self) -> Option<ToolKind> {
        self.active_tool().map(|t| t.kind())
    }

    pub fn active_tool(&self) -> Option<&dyn Tool> {
        self.active_index.map(|i| self.tools[i].as_ref())
    }

    pub fn active_tool_mut(&mut self) -> Option<&mut dyn Tool> {
        let i = self.active_index?;
        Some(self.tools[i].as_mut())
    }

    /// Reicht ein Ereignis an das aktive Tool weiter (nicht während Pause).
    pub fn handle(&mut self, event: &ToolEvent, ctx: &ToolContext) -> ToolOutput {
        if self.paused {
            return ToolOutput::Ignored;
        }
        match self.active_tool_mut() {
            Some(tool) => tool.handle(event, ctx),
            None => ToolOutput::Ignored,
        }
    }

    /// Unterbricht das aktive Tool; sein Schritt und seine Daten bleiben.
    pub fn pause(&mut self) {
        if self.active_index.is_some() {
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Beschränkungen des aktuellen Schritts; während der Pause nichts.
    pub fn constraints(&self, world: &World) -> SelectionConstraints {
        match self.active_tool() {
            Some(tool) if !self.paused => tool.constraints(world),
            _ => SelectionConstraints::none(),
        }
    }

    pub fn preview(&self, world: &World) -> ToolPreview {
        self.active_tool()
            .map(|t| t.preview(world))
            .unwrap_or_default()
    }

    /// Läuft gerade eine Animation, die Frames braucht?
    pub fn is_animating(&self) -> bool {
        !self.paused && self.active_tool().is_some_and(|t| t.is_animating())
    }
}
