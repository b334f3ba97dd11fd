//! Figure Workbench Library.
//! Geometrie-Kern, Actions mit Undo, Werkzeug-Automaten und Persistenz
//! einer 2D-Konstruktionsumgebung.

pub mod app;
pub mod core;
pub mod persistence;
pub mod shared;

pub use app::{
    Action, ActionBatch, AppCommand, AppController, AppIntent, AppState, History, Selection,
    ToolKind,
};
pub use core::{
    Camera, Color, Coordinates, Group, GroupId, Point, PointId, PointType, Segment, SegmentId,
    Shape, ShapeGeometry, ShapeId, ShapeKind, World,
};
pub use persistence::{LoadReport, SceneData, ShapeData, ShapeKit};
pub use shared::{RenderScene, WorkbenchOptions};
