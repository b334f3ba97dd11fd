//! Umwandlung World ⇄ `SceneData` mit Ladebericht für unauflösbare Referenzen.

use super::data::{GroupData, PointData, SceneData, SegmentData, ShapeData};
use crate::core::path::format_number;
use crate::core::{
    geometries_to_path, Group, IdAllocator, PathError, Point, PointId, Segment, SegmentId, Shape,
    ShapeBundle, ShapeGeometry, ShapeId, ShapeKind, World,
};
use std::collections::{HashMap, HashSet};

/// Ein nicht-fataler Fehler beim Laden einer Szene.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadIssue {
    #[error("{owner}: Referenz {missing} nicht auflösbar")]
    UnresolvedId { owner: String, missing: String },
    #[error("{shape}: ungültiger Pfad ({error})")]
    InvalidPath { shape: String, error: PathError },
    #[error("{owner}: {reason}")]
    Rejected { owner: String, reason: String },
}

/// Ergebnis eines Ladevorgangs: alle übersprungenen Teile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub issues: Vec<LoadIssue>,
    pub shapes_loaded: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, issue: LoadIssue) {
        log::error!("Szene laden: {issue}");
        self.issues.push(issue);
    }
}

/// Pfad-Darstellung einer Form für die Persistenz (unendliche Segmente nicht verlängert).
pub fn persisted_path(geometry: &ShapeGeometry) -> String {
    if geometry.segments.is_empty() {
        return geometry
            .points
            .first()
            .map(|p| format!("M {} {}", format_number(p.x), format_number(p.y)))
            .unwrap_or_default();
    }
    geometries_to_path(&geometry.segments, 1.0)
}

impl World {
    /// Schreibt den vollständigen Zustand als `SceneData`.
    pub fn to_scene(&self) -> SceneData {
        let mut points: Vec<PointData> = self.points().map(PointData::from).collect();
        points.sort_by_key(|p| p.id);
        let mut segments: Vec<SegmentData> = self.segments().map(SegmentData::from).collect();
        segments.sort_by_key(|s| s.id);
        let shapes = self
            .shapes()
            .map(|shape| {
                let path = self
                    .shape_geometry(shape.id)
                    .map(|g| persisted_path(&g))
                    .unwrap_or_default();
                ShapeData::from_shape(shape, path)
            })
            .collect();
        let groups = self.groups().map(GroupData::from).collect();
        SceneData {
            points,
            segments,
            shapes,
            groups,
        }
    }

    /// Baut eine World aus `SceneData`.
    ///
    /// Formen mit Segment-IDs werden exakt wiederhergestellt, Formen ohne
    /// (Bausatz-Vorlagen) aus ihrem Pfad aufgebaut. Unauflösbare Referenzen
    /// überspringen nur das betroffene Objekt und landen im Bericht.
    pub fn from_scene(scene: &SceneData) -> (World, LoadReport) {
        let mut world = World::new();
        let mut report = LoadReport::default();

        let points: HashMap<PointId, &PointData> = scene.points.iter().map(|p| (p.id, p)).collect();
        let segments: HashMap<SegmentId, &SegmentData> =
            scene.segments.iter().map(|s| (s.id, s)).collect();
        let mut ids = IdAllocator::starting_at(max_scene_id(scene) + 1);
        let mut claimed: HashSet<PointId> = HashSet::new();

        for data in &scene.shapes {
            let bundle = match bundle_from_data(data, &points, &segments, &mut ids) {
                Ok(bundle) => bundle,
                Err(issue) => {
                    report.push(issue);
                    continue;
                }
            };
            let owner = bundle.shape.id.to_string();
            let owned: Vec<PointId> = bundle.points.iter().map(|p| p.id).collect();
            match world.insert_bundle(bundle, None) {
                Ok(()) => {
                    claimed.extend(owned);
                    report.shapes_loaded += 1;
                }
                Err(err) => report.push(LoadIssue::Rejected {
                    owner,
                    reason: err.to_string(),
                }),
            }
        }

        // Freie Punkte; Punkte übersprungener Formen entfallen
        for data in &scene.points {
            if claimed.contains(&data.id) || data.shape_id.is_some() {
                continue;
            }
            if let Err(err) = world.insert_point(Point::from(data)) {
                report.push(LoadIssue::Rejected {
                    owner: data.id.to_string(),
                    reason: err.to_string(),
                });
            }
        }

        let mut grouped: HashSet<ShapeId> = HashSet::new();
        for data in &scene.groups {
            let mut group = Group::new(data.id, Vec::new());
            for shape_id in &data.shape_ids {
                if world.shape(*shape_id).is_none() || grouped.contains(shape_id) {
                    report.push(LoadIssue::UnresolvedId {
                        owner: data.id.to_string(),
                        missing: shape_id.to_string(),
                    });
                    continue;
                }
                grouped.insert(*shape_id);
                group.add(*shape_id);
            }
            if group.is_empty() {
                continue;
            }
            if let Err(err) = world.insert_group(group, None) {
                report.push(LoadIssue::Rejected {
                    owner: data.id.to_string(),
                    reason: err.to_string(),
                });
            }
        }

        log::info!(
            "Szene geladen: {} Formen, {} Punkte, {} Probleme",
            world.shape_count(),
            world.point_count(),
            report.issues.len()
        );
        (world, report)
    }
}

fn max_scene_id(scene: &SceneData) -> u64 {
    let points = scene.points.iter().map(|p| p.id.0);
    let segments = scene.segments.iter().map(|s| s.id.0);
    let shapes = scene.shapes.iter().filter_map(|s| s.id.map(|id| id.0));
    let groups = scene.groups.iter().map(|g| g.id.0);
    points.chain(segments).chain(shapes).chain(groups).max().unwrap_or(0)
}

fn shape_label(data: &ShapeData) -> String {
    match (data.id, data.name.is_empty()) {
        (Some(id), _) => id.to_string(),
        (None, false) => data.name.clone(),
        (None, true) => "Vorlage".to_string(),
    }
}

fn bundle_from_data(
    data: &ShapeData,
    points: &HashMap<PointId, &PointData>,
    segments: &HashMap<SegmentId, &SegmentData>,
    ids: &mut IdAllocator,
) -> Result<ShapeBundle, LoadIssue> {
    let label = shape_label(data);

    if data.segment_ids.is_empty() && data.point_ids.is_empty() {
        let geometry = data
            .geometry_from_path()
            .map_err(|error| LoadIssue::InvalidPath {
                shape: label,
                error,
            })?;
        let shape_id = data.id.unwrap_or_else(|| ids.shape());
        let mut bundle = World::build_bundle_with_id(shape_id, ids, &geometry);
        data.apply_attributes(&mut bundle.shape);
        bundle.shape.kind = geometry.kind;
        return Ok(bundle);
    }

    let Some(shape_id) = data.id else {
        return Err(LoadIssue::UnresolvedId {
            owner: label,
            missing: "id".to_string(),
        });
    };
    let unresolved = |missing: String| LoadIssue::UnresolvedId {
        owner: label.clone(),
        missing,
    };

    let mut shape = Shape::new(shape_id, data.kind);
    data.apply_attributes(&mut shape);
    shape.segment_ids = data.segment_ids.clone();
    shape.point_ids = data.point_ids.clone();
    shape.center_id = data.center_id;

    let bundle_segments = data
        .segment_ids
        .iter()
        .map(|sid| {
            segments
                .get(sid)
                .map(|s| Segment::from(*s))
                .ok_or_else(|| unresolved(sid.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut point_ids: Vec<PointId> = Vec::new();
    let candidates = bundle_segments
        .iter()
        .flat_map(|s| s.point_ids())
        .chain(data.point_ids.iter().copied())
        .chain(data.center_id);
    for id in candidates {
        if !point_ids.contains(&id) {
            point_ids.push(id);
        }
    }
    let bundle_points = point_ids
        .iter()
        .map(|pid| {
            points
                .get(pid)
                .map(|p| Point::from(*p))
                .ok_or_else(|| unresolved(pid.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if shape.kind != ShapeKind::SinglePoint && bundle_segments.is_empty() {
        shape.kind = ShapeKind::SinglePoint;
    }
    Ok(ShapeBundle {
        shape,
        segments: bundle_segments,
        points: bundle_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{path_to_geometries, Color, Coordinates, GroupId};

    fn world_with_square() -> (World, ShapeId) {
        let mut world = World::new();
        let geometry = ShapeGeometry::new(
            ShapeKind::Regular,
            path_to_geometries("M 0 0 L 10 0 L 10 10 L 0 10 Z").expect("gueltiger Pfad"),
        );
        let mut ids = world.allocator();
        let bundle = World::build_bundle(&mut ids, &geometry);
        let id = bundle.shape.id;
        world.insert_bundle(bundle, None).expect("IDs frei");
        (world, id)
    }

    #[test]
    fn scene_round_trip_is_structurally_equal() {
        let (mut world, id) = world_with_square();
        world.shape_mut(id).expect("Form").fill_color = Color::rgb(10, 20, 30);
        let group_id = GroupId(world.next_id());
        world
            .insert_group(Group::new(group_id, vec![id]), None)
            .expect("Gruppe");

        let scene = world.to_scene();
        let (loaded, report) = World::from_scene(&scene);
        assert!(report.is_clean());
        assert_eq!(report.shapes_loaded, 1);
        assert_eq!(loaded.to_scene(), scene);
        assert_eq!(loaded.next_id(), world.next_id());
    }

    #[test]
    fn path_is_written_without_closing_command() {
        let (world, _) = world_with_square();
        let scene = world.to_scene();
        assert_eq!(scene.shapes[0].path, "M 0 0 L 10 0 L 10 10 L 0 10 L 0 0");
    }

    #[test]
    fn missing_segment_skips_only_that_shape() {
        let (world, id) = world_with_square();
        let mut scene = world.to_scene();
        let mut broken = scene.shapes[0].clone();
        broken.id = Some(ShapeId(500));
        broken.segment_ids = vec![SegmentId(999)];
        scene.shapes.push(broken);

        let (loaded, report) = World::from_scene(&scene);
        assert_eq!(loaded.shape_ids(), vec![id]);
        assert_eq!(
            report.issues,
            vec![LoadIssue::UnresolvedId {
                owner: "sh500".to_string(),
                missing: "s999".to_string(),
            }]
        );
    }

    #[test]
    fn templates_get_fresh_ids_after_stored_ones() {
        let (world, _) = world_with_square();
        let mut scene = world.to_scene();
        let before = world.next_id();
        scene
            .shapes
            .push(ShapeData::template(ShapeKind::Regular, "M 20 0 L 30 0 L 25 5 Z"));

        let (loaded, report) = World::from_scene(&scene);
        assert!(report.is_clean());
        assert_eq!(loaded.shape_count(), 2);
        let new_id = loaded.shape_ids()[1];
        assert_eq!(new_id, ShapeId(before));
        let geometry = loaded.shape_geometry(new_id).expect("Geometrie");
        assert_eq!(geometry.segments.len(), 3);
        assert!(geometry.center().coincides(Coordinates::new(25.0, 5.0 / 3.0)));
    }

    #[test]
    fn invalid_template_path_is_reported() {
        let scene = SceneData {
            shapes: vec![ShapeData::template(ShapeKind::Regular, "L 1 1")],
            ..SceneData::default()
        };
        let (loaded, report) = World::from_scene(&scene);
        assert!(loaded.is_empty());
        assert!(matches!(
            report.issues.as_slice(),
            [LoadIssue::InvalidPath { .. }]
        ));
    }

    #[test]
    fn group_members_that_did_not_load_are_dropped() {
        let (world, id) = world_with_square();
        let mut scene = world.to_scene();
        scene.groups.push(GroupData {
            id: GroupId(400),
            shape_ids: vec![id, ShapeId(401)],
        });
        let (loaded, report) = World::from_scene(&scene);
        assert_eq!(
            loaded.group(GroupId(400)).map(|g| g.shape_ids.clone()),
            Some(vec![id])
        );
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn single_point_shape_round_trips() {
        let scene = SceneData {
            shapes: vec![ShapeData::template(ShapeKind::SinglePoint, "M 3 4")],
            ..SceneData::default()
        };
        let (loaded, _) = World::from_scene(&scene);
        let stored = loaded.to_scene();
        assert_eq!(stored.shapes[0].path, "M 3 4");
        assert_eq!(stored.shapes[0].kind, ShapeKind::SinglePoint);
        let (again, report) = World::from_scene(&stored);
        assert!(report.is_clean());
        assert_eq!(again.to_scene(), stored);
    }
}
