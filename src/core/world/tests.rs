use super::*;
use crate::core::path::path_to_geometries;
use crate::core::{Color, ShapeGeometry};
use std::f64::consts::FRAC_PI_2;

fn insert_path(world: &mut World, path: &str) -> ShapeId {
    let geometry = ShapeGeometry::new(
        ShapeKind::Regular,
        path_to_geometries(path).expect("gueltiger Pfad"),
    );
    let mut ids = world.allocator();
    let bundle = World::build_bundle(&mut ids, &geometry);
    let id = bundle.shape.id;
    world.insert_bundle(bundle, None).expect("IDs frei");
    id
}

fn square(world: &mut World) -> ShapeId {
    insert_path(world, "M 0 0 L 10 0 L 10 10 L 0 10 Z")
}

#[test]
fn bundle_shares_chain_vertices() {
    let mut world = World::new();
    let id = square(&mut world);
    let shape = world.shape(id).expect("Form vorhanden");
    assert_eq!(shape.segment_ids.len(), 4);
    // 4 Vertices + Zentrum
    assert_eq!(world.point_count(), 5);
    for pair in shape.segment_ids.windows(2) {
        let a = world.segment(pair[0]).expect("Segment");
        let b = world.segment(pair[1]).expect("Segment");
        assert_eq!(a.vertex_ids[1], b.vertex_ids[0]);
    }
    let center = shape.center_id.and_then(|c| world.point(c)).expect("Zentrum");
    assert_eq!(center.coordinates, Coordinates::new(5.0, 5.0));
    assert!(!center.visible);
}

#[test]
fn next_id_is_max_plus_one() {
    let mut world = World::new();
    assert_eq!(world.next_id(), 1);
    square(&mut world);
    // Form + 4 Segmente + 5 Punkte
    assert_eq!(world.next_id(), 11);
}

#[test]
fn insert_rejects_used_ids() {
    let mut world = World::new();
    let id = square(&mut world);
    let bundle = world.shape_bundle(id).expect("Bündel");
    assert_eq!(
        world.insert_bundle(bundle, None),
        Err(WorldError::IdInUse(id.0))
    );
}

#[test]
fn remove_and_restore_keeps_z_order() {
    let mut world = World::new();
    let first = square(&mut world);
    let second = insert_path(&mut world, "M 20 0 L 30 0 L 30 10 Z");
    let third = insert_path(&mut world, "M 40 0 L 50 0 L 50 10 Z");
    let before = world.shape_bundle(second).expect("Bündel");

    let removed = world.remove_shape(second).expect("entfernt");
    assert_eq!(removed.z_index, 1);
    assert!(world.shape(second).is_none());
    assert_eq!(world.shape_ids(), vec![first, third]);

    world.restore_shape(removed).expect("wiederhergestellt");
    assert_eq!(world.shape_ids(), vec![first, second, third]);
    assert_eq!(world.shape_bundle(second), Some(before));
}

#[test]
fn removing_last_group_member_dissolves_group() {
    let mut world = World::new();
    let shape = square(&mut world);
    let group_id = GroupId(world.next_id());
    world
        .insert_group(Group::new(group_id, vec![shape]), None)
        .expect("Gruppe");

    let removed = world.remove_shape(shape).expect("entfernt");
    assert!(world.group(group_id).is_none());
    world.restore_shape(removed).expect("wiederhergestellt");
    assert_eq!(world.group_of(shape), Some(group_id));
}

#[test]
fn transforms_move_every_owned_point() {
    let mut world = World::new();
    let id = square(&mut world);
    world
        .translate_shapes(&[id], Coordinates::new(5.0, 0.0))
        .expect("Form vorhanden");
    let geometry = world.shape_geometry(id).expect("Geometrie");
    assert_eq!(geometry.segments[0].vertices[0], Coordinates::new(5.0, 0.0));
    assert_eq!(geometry.center(), Coordinates::new(10.0, 5.0));

    world
        .rotate_shapes(&[id], FRAC_PI_2, Coordinates::new(10.0, 5.0))
        .expect("Form vorhanden");
    let geometry = world.shape_geometry(id).expect("Geometrie");
    assert!(geometry.segments[0].vertices[0].equal(Coordinates::new(15.0, 0.0), 1e-9));
}

#[test]
fn homothety_keeps_center_fixed() {
    let mut world = World::new();
    let id = square(&mut world);
    world
        .homothety_shapes(&[id], 2.0, Coordinates::new(5.0, 5.0))
        .expect("Form vorhanden");
    let geometry = world.shape_geometry(id).expect("Geometrie");
    assert_eq!(geometry.center(), Coordinates::new(5.0, 5.0));
    assert_eq!(geometry.segments[0].vertices[0], Coordinates::new(-5.0, -5.0));
    assert_eq!(geometry.segments[0].length(), 20.0);
}

#[test]
fn transforms_move_division_points_with_their_segment() {
    let mut world = World::new();
    let id = square(&mut world);
    let segment_id = world.shape(id).expect("Form").segment_ids[0];
    let mut ids = world.allocator();
    let division = ids.point();
    world
        .add_division_point(segment_id, Point::division(division, Coordinates::new(5.0, 0.0), 0.5))
        .expect("Teilungspunkt");

    world
        .translate_shapes(&[id], Coordinates::new(3.0, 4.0))
        .expect("Form vorhanden");
    assert_eq!(world.coordinates(division), Some(Coordinates::new(8.0, 4.0)));

    world
        .homothety_shapes(&[id], 2.0, Coordinates::new(3.0, 4.0))
        .expect("Form vorhanden");
    assert_eq!(world.coordinates(division), Some(Coordinates::new(13.0, 4.0)));
    let geometry = world.segment_geometry(segment_id).expect("Geometrie");
    assert_eq!(geometry.point_at_ratio(0.5), Coordinates::new(13.0, 4.0));
}

#[test]
fn reverse_is_an_involution() {
    let mut world = World::new();
    let id = insert_path(&mut world, "M 5 0 A 5 5 0 0 1 -5 0 Z");
    {
        let shape = world.shape_mut(id).expect("Form");
        shape.is_biface = true;
        shape.fill_color = Color::rgb(1, 2, 3);
    }
    let before = world.shape_bundle(id).expect("Bündel");

    world.reverse_shape(id).expect("Form vorhanden");
    let arc = world.shape(id).map(|s| s.segment_ids[0]).expect("Segment");
    assert!(world.segment(arc).expect("Segment").counterclockwise);
    assert_eq!(
        world.shape(id).expect("Form").fill_color,
        Color::rgb(254, 253, 252)
    );

    world.reverse_shape(id).expect("Form vorhanden");
    assert_eq!(world.shape_bundle(id), Some(before));
}

#[test]
fn reverse_segment_mirrors_division_ratios() {
    let mut world = World::new();
    let id = square(&mut world);
    let segment_id = world.shape(id).expect("Form").segment_ids[0];
    let mut ids = world.allocator();
    let (near, far) = (ids.point(), ids.point());
    world
        .add_division_point(segment_id, Point::division(near, Coordinates::new(2.5, 0.0), 0.25))
        .expect("Teilungspunkt");
    world
        .add_division_point(segment_id, Point::division(far, Coordinates::new(7.5, 0.0), 0.75))
        .expect("Teilungspunkt");
    let vertices = world.segment(segment_id).expect("Segment").vertex_ids;

    world.reverse_segment(segment_id, false).expect("Segment vorhanden");

    let segment = world.segment(segment_id).expect("Segment");
    assert_eq!(segment.vertex_ids, [vertices[1], vertices[0]]);
    assert_eq!(segment.division_ids, vec![far, near]);
    assert_eq!(world.point(far).and_then(|p| p.ratio), Some(0.25));
    assert_eq!(world.point(near).and_then(|p| p.ratio), Some(0.75));
    let geometry = world.segment_geometry(segment_id).expect("Geometrie");
    assert_eq!(geometry.point_at_ratio(0.25), Coordinates::new(7.5, 0.0));
}

#[test]
fn reverse_outline_keeps_geometry() {
    let mut world = World::new();
    let id = insert_path(&mut world, "M 5 0 A 5 5 0 0 1 -5 0 Z");
    let before = world.shape_geometry(id).expect("Geometrie");

    world.reverse_outline(id).expect("Form vorhanden");

    let after = world.shape_geometry(id).expect("Geometrie");
    assert_eq!(after.segments.len(), before.segments.len());
    for pair in after.segments.windows(2) {
        assert!(pair[0].vertices[1].coincides(pair[1].vertices[0]));
    }
    let arc = after.segments.iter().find(|s| s.is_arc()).expect("Bogen");
    let original = before.segments.iter().find(|s| s.is_arc()).expect("Bogen");
    assert!(arc.middle().coincides(original.middle()));
    for sample in [Coordinates::new(0.0, 2.0), Coordinates::new(0.0, -2.0)] {
        assert_eq!(after.is_coordinates_in_path(sample), before.is_coordinates_in_path(sample));
    }
    let shape = world.shape(id).expect("Form");
    for (idx, segment_id) in shape.segment_ids.iter().enumerate() {
        assert_eq!(world.segment(*segment_id).expect("Segment").idx, idx);
    }
}

#[test]
fn clean_in_place_removes_middle_vertex() {
    let mut world = World::new();
    let id = insert_path(&mut world, "M 0 0 L 5 0 L 10 0 L 10 10 L 0 10 Z");
    assert_eq!(world.point_count(), 6);

    assert!(world.clean_same_direction(id).expect("Form vorhanden"));
    let shape = world.shape(id).expect("Form");
    assert_eq!(shape.segment_ids.len(), 4);
    assert_eq!(world.point_count(), 5);
    for (idx, sid) in shape.segment_ids.iter().enumerate() {
        assert_eq!(world.segment(*sid).expect("Segment").idx, idx);
    }
    let first = world
        .segment_geometry(shape.segment_ids[0])
        .expect("Geometrie");
    assert_eq!(first.vertices[1], Coordinates::new(10.0, 0.0));

    let snapshot = world.shape_bundle(id);
    assert!(!world.clean_same_direction(id).expect("Form vorhanden"));
    assert_eq!(world.shape_bundle(id), snapshot);
}

#[test]
fn clean_keeps_division_points_with_new_ratio() {
    let mut world = World::new();
    let id = insert_path(&mut world, "M 0 0 L 5 0 L 10 0 L 10 10 L 0 10 Z");
    let second = world.shape(id).map(|s| s.segment_ids[1]).expect("Segment");
    let point_id = PointId(world.next_id());
    world
        .add_division_point(
            second,
            Point::division(point_id, Coordinates::new(7.5, 0.0), 0.5),
        )
        .expect("Segment vorhanden");

    world.clean_same_direction(id).expect("Form vorhanden");
    let point = world.point(point_id).expect("Teilungspunkt bleibt");
    assert_eq!(point.ratio, Some(0.75));
    let first = world.shape(id).map(|s| s.segment_ids[0]).expect("Segment");
    assert_eq!(
        world.segment(first).expect("Segment").division_ids,
        vec![point_id]
    );
}

#[test]
fn zero_radius_circle_becomes_single_point() {
    let mut world = World::new();
    let p = Coordinates::new(3.0, 3.0);
    let geometry = ShapeGeometry::new(
        ShapeKind::Regular,
        vec![crate::core::SegmentGeometry::circle(p, p, false)],
    );
    let mut ids = world.allocator();
    let bundle = World::build_bundle(&mut ids, &geometry);
    let id = bundle.shape.id;
    world.insert_bundle(bundle, None).expect("IDs frei");

    assert!(world.clean_same_direction(id).expect("Form vorhanden"));
    let shape = world.shape(id).expect("Form");
    assert_eq!(shape.kind, ShapeKind::SinglePoint);
    assert!(shape.segment_ids.is_empty());
    assert_eq!(shape.point_ids.len(), 1);
    assert_eq!(world.segment_count(), 0);
    let geometry = world.shape_geometry(id).expect("Geometrie");
    assert_eq!(geometry.points, vec![p]);
}

#[test]
fn division_points_stay_sorted_and_restore_in_place() {
    let mut world = World::new();
    let id = square(&mut world);
    let segment = world.shape(id).map(|s| s.segment_ids[0]).expect("Segment");
    let base = world.next_id();
    for (offset, ratio) in [(0, 0.75), (1, 0.25), (2, 0.5)] {
        let coords = Coordinates::new(10.0 * ratio, 0.0);
        world
            .add_division_point(segment, Point::division(PointId(base + offset), coords, ratio))
            .expect("Segment vorhanden");
    }
    let order = world.segment(segment).expect("Segment").division_ids.clone();
    assert_eq!(
        order,
        vec![PointId(base + 1), PointId(base + 2), PointId(base)]
    );

    let (sid, index, point) = world
        .remove_division_point(PointId(base + 2))
        .expect("Teilungspunkt vorhanden");
    assert_eq!((sid, index), (segment, 1));
    world
        .restore_division_point(sid, index, point)
        .expect("wiederhergestellt");
    assert_eq!(world.segment(segment).expect("Segment").division_ids, order);
}

#[test]
fn spatial_index_follows_mutations() {
    let mut world = World::new();
    let id = square(&mut world);
    assert!(!world
        .points_within_radius(Coordinates::new(0.0, 0.0), 0.5)
        .is_empty());
    world
        .translate_shapes(&[id], Coordinates::new(100.0, 0.0))
        .expect("Form vorhanden");
    assert!(world
        .points_within_radius(Coordinates::new(0.0, 0.0), 0.5)
        .is_empty());
}

#[test]
fn move_shape_to_changes_z_order() {
    let mut world = World::new();
    let a = square(&mut world);
    let b = insert_path(&mut world, "M 20 0 L 30 0 L 30 10 Z");
    world.move_shape_to(a, 10).expect("Form vorhanden");
    assert_eq!(world.shape_ids(), vec![b, a]);
    world.set_center_shown(a, true).expect("Form vorhanden");
    let center = world.shape(a).and_then(|s| s.center_id).expect("Zentrum");
    assert!(world.point(center).expect("Punkt").visible);
}
