//! Form: geordnete Kette von Segmenten mit Darstellungs-Attributen.
//!
//! Wie beim Segment hält der Arena-Datensatz [`Shape`] nur IDs und Attribute;
//! die aufgelöste Geometrie ist der Wertetyp [`ShapeGeometry`].

mod geometry;
mod outline;

pub use geometry::ShapeGeometry;
pub use outline::{clean_same_direction, merge_outlines, split_outline};
pub(crate) use outline::merge_pair;

use super::{Color, PointId, SegmentId, ShapeId};
use serde::{Deserialize, Serialize};

/// Varianten einer Form mit eigenem Pfad- und Enthaltensein-Verhalten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    /// Geschlossene oder offene Kette
    #[default]
    Regular,
    /// Unabhängige Kanten, Innen-Test über die konvexe Hülle
    Cube,
    /// Zwei parallele unendliche Geraden, innen = dazwischen
    StripLine,
    /// Einzelner Punkt ohne Segmente
    SinglePoint,
    /// Eine offene Strecke mit Pfeilspitze
    ArrowLine,
}

/// Zeichen-Hinweise für den externen Renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderHints {
    pub filled: bool,
    pub arrow_head: bool,
    pub dashed: bool,
}

impl ShapeKind {
    /// Zeichen-Hinweise abhängig von der Variante.
    pub fn render_hints(self, closed: bool) -> RenderHints {
        match self {
            ShapeKind::Regular => RenderHints {
                filled: closed,
                ..RenderHints::default()
            },
            ShapeKind::Cube => RenderHints {
                filled: true,
                ..RenderHints::default()
            },
            ShapeKind::StripLine => RenderHints {
                filled: true,
                dashed: true,
                ..RenderHints::default()
            },
            ShapeKind::SinglePoint => RenderHints::default(),
            ShapeKind::ArrowLine => RenderHints {
                arrow_head: true,
                ..RenderHints::default()
            },
        }
    }
}

/// Eine Form in der Arena der `World`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub name: String,
    /// Segmente in Kettenreihenfolge (`segment.idx` = Position)
    pub segment_ids: Vec<SegmentId>,
    /// Punkte ohne Segment (z.B. der Punkt einer `SinglePoint`-Form)
    pub point_ids: Vec<PointId>,
    /// Zentrums-Punkt, sichtbar wenn `is_center_shown`
    pub center_id: Option<PointId>,
    pub fill_color: Color,
    pub fill_opacity: f64,
    pub stroke_color: Color,
    pub stroke_width: f64,
    pub visible: bool,
    pub is_reversed: bool,
    pub is_biface: bool,
    pub is_center_shown: bool,
}

impl Shape {
    pub const DEFAULT_FILL: Color = Color::rgb(0x00, 0x96, 0x88);
    pub const DEFAULT_STROKE: Color = Color::BLACK;
    pub const DEFAULT_OPACITY: f64 = 0.7;
    pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;

    /// Erstellt eine leere Form mit Standard-Attributen.
    pub fn new(id: ShapeId, kind: ShapeKind) -> Self {
        Self {
            id,
            kind,
            name: String::new(),
            segment_ids: Vec::new(),
            point_ids: Vec::new(),
            center_id: None,
            fill_color: Self::DEFAULT_FILL,
            fill_opacity: Self::DEFAULT_OPACITY,
            stroke_color: Self::DEFAULT_STROKE,
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
            visible: true,
            is_reversed: false,
            is_biface: false,
            is_center_shown: false,
        }
    }

    /// Attribut-Teil des Umdrehens: Komplementärfarbe bei Biface, Flag kippen.
    ///
    /// Die Bogen-Laufrichtungen kippt `World::reverse_shape`.
    pub fn reverse_attributes(&mut self) {
        if self.is_biface {
            self.fill_color = self.fill_color.complement();
        }
        self.is_reversed = !self.is_reversed;
    }

    /// Übernimmt alle Darstellungs-Attribute einer anderen Form.
    pub fn copy_attributes_from(&mut self, other: &Shape) {
        self.name = other.name.clone();
        self.fill_color = other.fill_color;
        self.fill_opacity = other.fill_opacity;
        self.stroke_color = other.stroke_color;
        self.stroke_width = other.stroke_width;
        self.visible = other.visible;
        self.is_reversed = other.is_reversed;
        self.is_biface = other.is_biface;
        self.is_center_shown = other.is_center_shown;
    }
}

#[cfg(test)]
mod tests;
