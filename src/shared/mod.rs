//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen und die Render-Szene, die `app` baut
//! und ein externer Renderer konsumiert.

pub mod options;
mod render_scene;

pub use options::WorkbenchOptions;
pub use render_scene::{PreviewLayer, RenderPoint, RenderScene, RenderShape};
