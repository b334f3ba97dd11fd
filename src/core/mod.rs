//! Core-Domänentypen: Koordinaten, Punkte, Segmente, Formen, Gruppen, World.
//!
//! Das Objektmodell ist eine Arena mit stabilen IDs; die Geometrie eines
//! Segments oder einer Form wird bei Bedarf als Wertetyp aufgelöst.

pub mod camera;
pub mod color;
pub mod coordinates;
pub mod group;
pub mod ids;
pub mod path;
pub mod point;
pub mod segment;
pub mod shape;
pub mod spatial;
pub mod world;

pub use camera::Camera;
pub use color::{Color, ColorParseError};
pub use coordinates::{normalize_angle, Coordinates, COINCIDENCE_EPSILON, INTERSECTION_PRECISION};
pub use group::Group;
pub use ids::{GroupId, IdAllocator, PointId, SegmentId, ShapeId};
pub use path::{geometries_to_path, parse_path, path_to_geometries, PathCommand, PathError};
pub use point::{Point, PointType};
pub use segment::{ArcFlags, Segment, SegmentGeometry, INFINITE_DISPLAY_OFFSET};
pub use shape::{
    clean_same_direction, merge_outlines, split_outline, RenderHints, Shape, ShapeGeometry,
    ShapeKind,
};
pub use spatial::{SpatialIndex, SpatialMatch};
pub use world::{GroupMembership, RemovedShape, ShapeBundle, World, WorldError};
