//! Plain-Data-Payloads (`saveData`): minimale Kodierung, nur Abweichungen vom Standard.

use crate::core::{
    parse_path, path_to_geometries, Color, Coordinates, Group, GroupId, PathCommand, PathError,
    Point, PointId, PointType, Segment, SegmentGeometry, SegmentId, Shape, ShapeGeometry, ShapeId,
    ShapeKind,
};
use serde::{Deserialize, Serialize};

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_true(value: &bool) -> bool {
    *value
}

fn default_true() -> bool {
    true
}

// ── Punkt ───────────────────────────────────────────────────────────

/// Gespeicherter Punkt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointData {
    pub id: PointId,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "is_default")]
    pub point_type: PointType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segment_ids: Vec<SegmentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_id: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    /// Nur gesetzt, wenn abweichend vom Standard des Punkt-Typs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub color: Color,
}

impl From<&Point> for PointData {
    fn from(point: &Point) -> Self {
        let default_visible = Point::new(point.id, point.coordinates, point.point_type).visible;
        Self {
            id: point.id,
            coordinates: point.coordinates,
            point_type: point.point_type,
            segment_ids: point.segment_ids.clone(),
            shape_id: point.shape_id,
            ratio: point.ratio,
            visible: (point.visible != default_visible).then_some(point.visible),
            color: point.color,
        }
    }
}

impl From<&PointData> for Point {
    fn from(data: &PointData) -> Self {
        let mut point = Point::new(data.id, data.coordinates, data.point_type);
        point.segment_ids = data.segment_ids.clone();
        point.shape_id = data.shape_id;
        point.ratio = data.ratio;
        if let Some(visible) = data.visible {
            point.visible = visible;
        }
        point.color = data.color;
        point
    }
}

// ── Segment ─────────────────────────────────────────────────────────

/// Gespeichertes Segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentData {
    pub id: SegmentId,
    pub vertex_ids: [PointId; 2],
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub division_ids: Vec<PointId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc_center_id: Option<PointId>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub counterclockwise: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_infinite: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_semi_infinite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_id: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub idx: usize,
}

impl From<&Segment> for SegmentData {
    fn from(segment: &Segment) -> Self {
        Self {
            id: segment.id,
            vertex_ids: segment.vertex_ids,
            division_ids: segment.division_ids.clone(),
            arc_center_id: segment.arc_center_id,
            counterclockwise: segment.counterclockwise,
            is_infinite: segment.is_infinite,
            is_semi_infinite: segment.is_semi_infinite,
            shape_id: segment.shape_id,
            idx: segment.idx,
        }
    }
}

impl From<&SegmentData> for Segment {
    fn from(data: &SegmentData) -> Self {
        Segment {
            id: data.id,
            vertex_ids: data.vertex_ids,
            division_ids: data.division_ids.clone(),
            arc_center_id: data.arc_center_id,
            counterclockwise: data.counterclockwise,
            is_infinite: data.is_infinite,
            is_semi_infinite: data.is_semi_infinite,
            shape_id: data.shape_id,
            idx: data.idx,
        }
    }
}

// ── Form ────────────────────────────────────────────────────────────

/// Gespeicherte Form. Primär über den Pfad-String beschrieben; Segment-
/// und Punkt-IDs fehlen bei Bausatz-Vorlagen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ShapeId>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub kind: ShapeKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segment_ids: Vec<SegmentId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub point_ids: Vec<PointId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_id: Option<PointId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_reversed: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_biface: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_center_shown: bool,
}

fn differs<T: PartialEq>(value: T, default: T) -> Option<T> {
    (value != default).then_some(value)
}

impl ShapeData {
    /// Vorlage aus einem Pfad ohne IDs.
    pub fn template(kind: ShapeKind, path: impl Into<String>) -> Self {
        Self {
            id: None,
            kind,
            name: String::new(),
            path: path.into(),
            segment_ids: Vec::new(),
            point_ids: Vec::new(),
            center_id: None,
            fill_color: None,
            fill_opacity: None,
            stroke_color: None,
            stroke_width: None,
            visible: true,
            is_reversed: false,
            is_biface: false,
            is_center_shown: false,
        }
    }

    /// Kodiert eine Form; `path` ist die Pfad-Darstellung ihrer Geometrie.
    pub fn from_shape(shape: &Shape, path: String) -> Self {
        Self {
            id: Some(shape.id),
            kind: shape.kind,
            name: shape.name.clone(),
            path,
            segment_ids: shape.segment_ids.clone(),
            point_ids: shape.point_ids.clone(),
            center_id: shape.center_id,
            fill_color: differs(shape.fill_color, Shape::DEFAULT_FILL),
            fill_opacity: differs(shape.fill_opacity, Shape::DEFAULT_OPACITY),
            stroke_color: differs(shape.stroke_color, Shape::DEFAULT_STROKE),
            stroke_width: differs(shape.stroke_width, Shape::DEFAULT_STROKE_WIDTH),
            visible: shape.visible,
            is_reversed: shape.is_reversed,
            is_biface: shape.is_biface,
            is_center_shown: shape.is_center_shown,
        }
    }

    /// Überträgt die Attribute (ohne Struktur-IDs) auf eine Form.
    pub fn apply_attributes(&self, shape: &mut Shape) {
        shape.kind = self.kind;
        shape.name = self.name.clone();
        shape.fill_color = self.fill_color.unwrap_or(Shape::DEFAULT_FILL);
        shape.fill_opacity = self.fill_opacity.unwrap_or(Shape::DEFAULT_OPACITY);
        shape.stroke_color = self.stroke_color.unwrap_or(Shape::DEFAULT_STROKE);
        shape.stroke_width = self.stroke_width.unwrap_or(Shape::DEFAULT_STROKE_WIDTH);
        shape.visible = self.visible;
        shape.is_reversed = self.is_reversed;
        shape.is_biface = self.is_biface;
        shape.is_center_shown = self.is_center_shown;
    }

    /// Baut die Geometrie aus dem Pfad.
    ///
    /// Ein Pfad ohne Segmente ergibt eine `SinglePoint`-Form; `StripLine`-
    /// Segmente werden unendlich. Vertices bleiben wie im Pfad angegeben.
    pub fn geometry_from_path(&self) -> Result<ShapeGeometry, PathError> {
        let segments = path_to_geometries(&self.path)?;
        if segments.is_empty() || self.kind == ShapeKind::SinglePoint {
            let start = match parse_path(&self.path)?.first() {
                Some(PathCommand::MoveTo(p)) => *p,
                _ => return Err(PathError::MissingMoveTo),
            };
            return Ok(ShapeGeometry::single_point(start));
        }
        let segments = if self.kind == ShapeKind::Regular {
            join_full_circle(segments)
        } else {
            segments
        };
        let mut geometry = ShapeGeometry::new(self.kind, segments);
        if self.kind == ShapeKind::StripLine {
            for segment in &mut geometry.segments {
                segment.is_infinite = true;
            }
        }
        Ok(geometry)
    }
}

/// Zwei Halbbögen um denselben Mittelpunkt, die sich schließen, sind ein
/// Vollkreis (so schreibt `svg_path` Kreise).
fn join_full_circle(segments: Vec<SegmentGeometry>) -> Vec<SegmentGeometry> {
    if let [first, second] = segments.as_slice() {
        if let (Some(center), Some(other)) = (first.arc_center, second.arc_center) {
            if center.coincides(other)
                && first.counterclockwise == second.counterclockwise
                && first.vertices[1].coincides(second.vertices[0])
                && second.vertices[1].coincides(first.vertices[0])
            {
                return vec![SegmentGeometry::circle(
                    first.vertices[0],
                    center,
                    first.counterclockwise,
                )];
            }
        }
    }
    segments
}

// ── Gruppe & Szene ──────────────────────────────────────────────────

/// Gespeicherte Gruppe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupData {
    pub id: GroupId,
    pub shape_ids: Vec<ShapeId>,
}

impl From<&Group> for GroupData {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            shape_ids: group.shape_ids.clone(),
        }
    }
}

/// Vollständiger Szenen-Snapshot.
///
/// Punkte und Segmente nach ID sortiert, Formen und Gruppen in
/// Zeichenreihenfolge; dadurch ist strukturelle Gleichheit aussagekräftig.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneData {
    #[serde(default)]
    pub points: Vec<PointData>,
    #[serde(default)]
    pub segments: Vec<SegmentData>,
    #[serde(default)]
    pub shapes: Vec<ShapeData>,
    #[serde(default)]
    pub groups: Vec<GroupData>,
}

/// Bausatz: benannte Sammlung von Form-Vorlagen für das Erstellen-Tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeKit {
    pub name: String,
    pub shapes: Vec<ShapeData>,
}

impl ShapeKit {
    /// Vorlage nach Name.
    pub fn template(&self, name: &str) -> Option<&ShapeData> {
        self.shapes.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_point_serializes_minimally() {
        let point = Point::new(PointId(4), Coordinates::new(1.0, 2.0), PointType::Vertex);
        let json = serde_json::to_string(&PointData::from(&point)).expect("serialisierbar");
        assert_eq!(json, r#"{"id":4,"coordinates":{"x":1.0,"y":2.0}}"#);
    }

    #[test]
    fn arc_center_visibility_round_trips() {
        let mut center = Point::new(PointId(1), Coordinates::ZERO, PointType::ArcCenter);
        let data = PointData::from(&center);
        assert_eq!(data.visible, None);
        center.visible = true;
        let data = PointData::from(&center);
        assert_eq!(data.visible, Some(true));
        assert_eq!(Point::from(&data), center);
    }

    #[test]
    fn shape_attributes_only_when_changed() {
        let mut shape = Shape::new(ShapeId(3), ShapeKind::Regular);
        shape.is_biface = true;
        let data = ShapeData::from_shape(&shape, "M 0 0 L 1 0".to_string());
        let json = serde_json::to_value(&data).expect("serialisierbar");
        assert_eq!(
            json,
            serde_json::json!({"id": 3, "path": "M 0 0 L 1 0", "isBiface": true})
        );
        let mut restored = Shape::new(ShapeId(3), ShapeKind::Regular);
        data.apply_attributes(&mut restored);
        assert_eq!(restored, shape);
    }

    #[test]
    fn template_path_builds_circle() {
        let data = ShapeData::template(ShapeKind::Regular, "M 5 0 A 5 5 0 0 1 -5 0 A 5 5 0 0 1 5 0");
        let geometry = data.geometry_from_path().expect("gueltiger Pfad");
        assert!(geometry.is_circle());
    }

    #[test]
    fn template_keeps_collinear_vertices() {
        let data = ShapeData::template(ShapeKind::Regular, "M 0 0 L 5 0 L 10 0 L 10 10 Z");
        let geometry = data.geometry_from_path().expect("gueltiger Pfad");
        assert_eq!(geometry.segments.len(), 4);
        assert_eq!(geometry.segments[1].vertices[0], Coordinates::new(5.0, 0.0));
    }

    #[test]
    fn template_without_segments_is_single_point() {
        let data = ShapeData::template(ShapeKind::Regular, "M 3 4");
        let geometry = data.geometry_from_path().expect("gueltiger Pfad");
        assert_eq!(geometry.kind, ShapeKind::SinglePoint);
        assert_eq!(geometry.points, vec![Coordinates::new(3.0, 4.0)]);
    }

    #[test]
    fn strip_line_segments_become_infinite() {
        let data = ShapeData::template(ShapeKind::StripLine, "M 0 0 L 1 0 M 0 4 L 1 4");
        let geometry = data.geometry_from_path().expect("gueltiger Pfad");
        assert_eq!(geometry.segments.len(), 2);
        assert!(geometry.segments.iter().all(|s| s.is_infinite));
    }

    #[test]
    fn kit_parses_from_json() {
        let kit: ShapeKit = serde_json::from_str(
            r##"{"name":"tangram","shapes":[{"name":"carre","path":"M 0 0 H 1 V 1 H 0 Z","fillColor":"#ff0000"}]}"##,
        )
        .expect("gueltiger Bausatz");
        let square = kit.template("carre").expect("Vorlage vorhanden");
        assert_eq!(square.fill_color, Some(Color::rgb(255, 0, 0)));
        assert!(square.id.is_none());
    }
}
