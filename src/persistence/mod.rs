//! Persistenz: Szenen-Snapshots, Bausätze und JSON-Dateien.

pub mod data;
mod json;
mod scene;

pub use data::{GroupData, PointData, SceneData, SegmentData, ShapeData, ShapeKit};
pub use json::{
    kit_from_json, load_kit_file, load_scene_file, save_scene_file, load_scene_json,
    save_scene_json, LoadError,
};
pub use scene::{persisted_path, LoadIssue, LoadReport};
