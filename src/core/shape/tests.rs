use super::*;
use crate::core::path::path_to_geometries;
use crate::core::segment::SegmentGeometry;
use crate::core::{Color, Coordinates, ShapeId};

fn c(x: f64, y: f64) -> Coordinates {
    Coordinates::new(x, y)
}

fn from_path(path: &str) -> ShapeGeometry {
    ShapeGeometry::new(
        ShapeKind::Regular,
        path_to_geometries(path).expect("gueltiger Pfad"),
    )
}

fn square(x: f64, y: f64, size: f64) -> ShapeGeometry {
    from_path(&format!(
        "M {x} {y} L {} {y} L {} {} L {x} {} Z",
        x + size,
        x + size,
        y + size,
        y + size
    ))
}

// ── Enthaltensein ──────────────────────────────────────────────

#[test]
fn square_containment() {
    let sq = square(0.0, 0.0, 10.0);
    assert!(sq.is_closed());
    assert!(sq.is_coordinates_in_path(c(5.0, 5.0)));
    assert!(!sq.is_coordinates_in_path(c(15.0, 15.0)));
    assert!(sq.is_coordinates_on_border(c(0.0, 5.0)));
    assert!(sq.is_coordinates_in_path(c(0.0, 5.0)));
    assert!(!sq.is_coordinates_strictly_inside(c(0.0, 5.0)));
    assert!(sq.is_coordinates_strictly_inside(c(5.0, 5.0)));
}

#[test]
fn circle_containment_is_exact() {
    let circle = ShapeGeometry::new(
        ShapeKind::Regular,
        vec![SegmentGeometry::circle(c(5.0, 0.0), c(0.0, 0.0), false)],
    );
    assert!(circle.is_circle());
    assert!(circle.is_closed());
    assert!(circle.is_coordinates_in_path(c(3.0, 3.9)));
    assert!(!circle.is_coordinates_in_path(c(3.6, 3.6)));
    assert_eq!(circle.center(), c(0.0, 0.0));
}

#[test]
fn half_disc_contains_points_above_diameter() {
    let half = from_path("M 5 0 A 5 5 0 0 1 -5 0 Z");
    assert!(half.is_closed());
    assert!(half.is_coordinates_in_path(c(0.0, 4.0)));
    assert!(!half.is_coordinates_in_path(c(0.0, -1.0)));
}

#[test]
fn open_chain_only_contains_its_border() {
    let open = from_path("M 0 0 L 10 0 L 10 10");
    assert!(!open.is_closed());
    assert!(open.is_coordinates_in_path(c(10.0, 5.0)));
    assert!(!open.is_coordinates_in_path(c(8.0, 2.0)));
}

#[test]
fn strip_line_contains_points_between_lines() {
    let strip = ShapeGeometry::new(
        ShapeKind::StripLine,
        vec![
            SegmentGeometry::infinite_line(c(0.0, 0.0), c(1.0, 0.0)),
            SegmentGeometry::infinite_line(c(0.0, 4.0), c(1.0, 4.0)),
        ],
    );
    assert!(strip.is_coordinates_in_path(c(-300.0, 2.0)));
    assert!(!strip.is_coordinates_in_path(c(0.0, 5.0)));
    assert!(strip.render_hints().dashed);
}

#[test]
fn cube_uses_convex_hull_of_edges() {
    let cube = ShapeGeometry::new(
        ShapeKind::Cube,
        vec![
            SegmentGeometry::line(c(0.0, 0.0), c(10.0, 0.0)),
            SegmentGeometry::line(c(10.0, 10.0), c(0.0, 10.0)),
        ],
    );
    assert!(cube.is_coordinates_in_path(c(5.0, 5.0)));
    assert!(!cube.is_coordinates_in_path(c(11.0, 5.0)));
}

#[test]
fn single_point_shape() {
    let point = ShapeGeometry::single_point(c(2.0, 3.0));
    assert!(point.is_coordinates_in_path(c(2.0, 3.0)));
    assert!(!point.is_coordinates_in_path(c(2.1, 3.0)));
    assert_eq!(point.svg_path(1.0), "M 2 3");
    assert_eq!(point.center(), c(2.0, 3.0));
}

// ── Überlappung ────────────────────────────────────────────────

#[test]
fn adjacent_squares_do_not_overlap() {
    let a = square(0.0, 0.0, 10.0);
    let b = square(10.0, 0.0, 10.0);
    assert!(!a.overlaps_with(&b));
}

#[test]
fn identical_and_shifted_squares_overlap() {
    let a = square(0.0, 0.0, 10.0);
    assert!(a.overlaps_with(&square(0.0, 0.0, 10.0)));
    assert!(a.overlaps_with(&square(5.0, 5.0, 10.0)));
    assert!(!a.overlaps_with(&square(30.0, 30.0, 10.0)));
}

#[test]
fn partially_shared_border_is_no_overlap() {
    let a = square(0.0, 0.0, 10.0);
    assert!(!a.overlaps_with(&square(5.0, -10.0, 10.0)));
    assert!(!a.overlaps_with(&square(10.0, 0.0, 5.0)));
}

#[test]
fn near_crossing_within_precision_is_an_overlap() {
    // Senkrechte Kante endet 0.3 unter der Unterkante: zählt als Schnitt
    let a = square(0.0, 0.0, 10.0);
    let b = from_path("M 5 -0.3 L 5 -10 L 4 -10 Z");
    assert!(a.overlaps_with(&b));
}

// ── Zusammenfassen ─────────────────────────────────────────────

#[test]
fn clean_merges_runs_of_collinear_segments() {
    let sq = from_path("M 0 0 L 3 0 L 6 0 L 10 0 L 10 10 L 0 10 Z");
    let cleaned = clean_same_direction(&sq.segments, true);
    assert_eq!(cleaned.len(), 4);
    assert_eq!(cleaned[0].vertices, [c(0.0, 0.0), c(10.0, 0.0)]);
}

#[test]
fn clean_is_idempotent() {
    let shape = from_path("M 0 0 L 5 0 L 10 0 L 10 5 L 10 10 L 0 10 L 0 5 Z");
    let once = clean_same_direction(&shape.segments, true);
    let twice = clean_same_direction(&once, true);
    assert_eq!(once, twice);
    assert_eq!(once.len(), 4);
}

#[test]
fn clean_merges_wrap_around_segments() {
    // Start mitten auf der Unterkante
    let shape = from_path("M 5 0 L 10 0 L 10 10 L 0 10 L 0 0 Z");
    let cleaned = clean_same_direction(&shape.segments, true);
    assert_eq!(cleaned.len(), 4);
}

#[test]
fn clean_turns_half_arcs_into_circle() {
    let circle = from_path("M 5 0 A 5 5 0 0 1 -5 0 A 5 5 0 0 1 5 0");
    let cleaned = clean_same_direction(&circle.segments, true);
    assert_eq!(cleaned.len(), 1);
    assert!(cleaned[0].is_circle());
}

// ── Vereinigen & Zerschneiden ──────────────────────────────────

#[test]
fn merge_two_adjacent_squares() {
    let a = square(0.0, 0.0, 10.0);
    let b = square(10.0, 0.0, 10.0);
    let outline = merge_outlines(&a, &b).expect("gemeinsame Kante");
    assert_eq!(outline.len(), 4);
    let merged = ShapeGeometry::new(ShapeKind::Regular, outline);
    assert!(merged.is_closed());
    assert!(merged.is_coordinates_strictly_inside(c(10.0, 5.0)));
}

#[test]
fn merge_with_partial_common_border() {
    let a = square(0.0, 0.0, 10.0);
    let b = square(10.0, 0.0, 5.0);
    let outline = merge_outlines(&a, &b).expect("gemeinsame Teilkante");
    let merged = ShapeGeometry::new(ShapeKind::Regular, outline);
    assert!(merged.is_closed());
    assert_eq!(merged.segments.len(), 6);
}

#[test]
fn merge_without_common_border_fails() {
    let a = square(0.0, 0.0, 10.0);
    let b = square(20.0, 0.0, 10.0);
    assert!(merge_outlines(&a, &b).is_none());
}

#[test]
fn split_square_along_diagonal() {
    let sq = square(0.0, 0.0, 10.0);
    let (first, second) =
        split_outline(&sq.segments, c(0.0, 0.0), c(10.0, 10.0), None).expect("gueltige Sehne");
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
    let first = ShapeGeometry::new(ShapeKind::Regular, first);
    let second = ShapeGeometry::new(ShapeKind::Regular, second);
    assert!(first.is_closed() && second.is_closed());
    assert!(first.is_coordinates_strictly_inside(c(7.0, 2.0)));
    assert!(second.is_coordinates_strictly_inside(c(2.0, 7.0)));
}

#[test]
fn split_circle_through_center() {
    let circle = vec![SegmentGeometry::circle(c(5.0, 0.0), c(0.0, 0.0), false)];
    let (first, second) = split_outline(&circle, c(5.0, 0.0), c(-5.0, 0.0), Some(c(0.0, 0.0)))
        .expect("gueltige Sehne");
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
    assert!(ShapeGeometry::new(ShapeKind::Regular, first).is_coordinates_in_path(c(0.0, 2.0)));
}

// ── Datensatz ──────────────────────────────────────────────────

#[test]
fn reverse_attributes_is_involution_for_biface() {
    let mut shape = Shape::new(ShapeId(1), ShapeKind::Regular);
    shape.is_biface = true;
    shape.fill_color = Color::rgb(10, 20, 30);
    shape.reverse_attributes();
    assert_eq!(shape.fill_color, Color::rgb(245, 235, 225));
    assert!(shape.is_reversed);
    shape.reverse_attributes();
    assert_eq!(shape.fill_color, Color::rgb(10, 20, 30));
    assert!(!shape.is_reversed);
}

#[test]
fn render_hints_per_kind() {
    assert!(ShapeKind::Regular.render_hints(true).filled);
    assert!(!ShapeKind::Regular.render_hints(false).filled);
    assert!(ShapeKind::ArrowLine.render_hints(false).arrow_head);
}
