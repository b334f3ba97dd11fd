use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use figure_workbench::app::actions::merged_outline;
use figure_workbench::core::{
    Coordinates, Point, PointId, PointType, SegmentGeometry, ShapeGeometry, ShapeKind,
    SpatialIndex, INTERSECTION_PRECISION,
};
use std::collections::HashMap;
use std::hint::black_box;

fn polygon(vertices: &[Coordinates]) -> ShapeGeometry {
    let segments = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(a, b)| SegmentGeometry::line(*a, *b))
        .collect();
    ShapeGeometry::new(ShapeKind::Regular, segments)
}

fn regular_polygon(sides: usize, radius: f64, center: Coordinates) -> ShapeGeometry {
    let vertices: Vec<Coordinates> = (0..sides)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / sides as f64;
            center + Coordinates::new(angle.cos(), angle.sin()) * radius
        })
        .collect();
    polygon(&vertices)
}

fn bench_intersections(c: &mut Criterion) {
    let line = SegmentGeometry::line(Coordinates::new(-10.0, -3.0), Coordinates::new(10.0, 4.0));
    let other_line =
        SegmentGeometry::line(Coordinates::new(-5.0, 8.0), Coordinates::new(6.0, -9.0));
    let arc = SegmentGeometry::arc(
        Coordinates::new(5.0, 0.0),
        Coordinates::new(-5.0, 0.0),
        Coordinates::ZERO,
        true,
    );
    let circle = SegmentGeometry::circle(Coordinates::new(3.0, 1.0), Coordinates::new(1.0, 1.0), true);

    let mut group = c.benchmark_group("intersection");
    group.bench_function("line_line", |b| {
        b.iter(|| black_box(&line).intersection_with(black_box(&other_line), INTERSECTION_PRECISION))
    });
    group.bench_function("line_arc", |b| {
        b.iter(|| black_box(&line).intersection_with(black_box(&arc), INTERSECTION_PRECISION))
    });
    group.bench_function("arc_circle", |b| {
        b.iter(|| black_box(&arc).intersection_with(black_box(&circle), INTERSECTION_PRECISION))
    });
    group.finish();
}

fn bench_containment(c: &mut Criterion) {
    let mut group = c.benchmark_group("containment");

    for &sides in &[4usize, 32, 256] {
        let shape = regular_polygon(sides, 50.0, Coordinates::ZERO);
        let queries: Vec<Coordinates> = (0..256)
            .map(|i| Coordinates::new((i % 16) as f64 * 7.0 - 56.0, (i / 16) as f64 * 7.0 - 56.0))
            .collect();

        group.bench_with_input(BenchmarkId::new("in_path", sides), &shape, |b, shape| {
            b.iter(|| {
                let hits = queries
                    .iter()
                    .filter(|q| shape.is_coordinates_in_path(black_box(**q)))
                    .count();
                black_box(hits)
            })
        });
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let left = polygon(&[
        Coordinates::new(0.0, 0.0),
        Coordinates::new(10.0, 0.0),
        Coordinates::new(10.0, 10.0),
        Coordinates::new(0.0, 10.0),
    ]);
    let right = polygon(&[
        Coordinates::new(10.0, 0.0),
        Coordinates::new(20.0, 0.0),
        Coordinates::new(20.0, 10.0),
        Coordinates::new(10.0, 10.0),
    ]);
    let apart = regular_polygon(64, 5.0, Coordinates::new(100.0, 100.0));

    let mut group = c.benchmark_group("merge");
    group.bench_function("adjacent_squares", |b| {
        b.iter(|| black_box(merged_outline(black_box(&left), black_box(&right))))
    });
    group.bench_function("disjoint_polygon", |b| {
        b.iter(|| black_box(merged_outline(black_box(&left), black_box(&apart))))
    });
    group.finish();
}

fn bench_spatial_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_queries");

    for &count in &[1_000usize, 50_000] {
        let points: HashMap<PointId, Point> = (0..count)
            .map(|i| {
                let id = PointId(i as u64 + 1);
                let coordinates = Coordinates::new((i % 1000) as f64, (i / 1000) as f64);
                (id, Point::new(id, coordinates, PointType::Vertex))
            })
            .collect();
        let index = SpatialIndex::from_points(&points);

        group.bench_with_input(BenchmarkId::new("within_radius", count), &index, |b, index| {
            b.iter(|| black_box(index.within_radius(black_box(Coordinates::new(500.3, 20.7)), 5.0).len()))
        });
    }

    group.finish();
}

criterion_group!(
    geometry_benches,
    bench_intersections,
    bench_containment,
    bench_merge,
    bench_spatial_queries
);
criterion_main!(geometry_benches);
