//! Application-Layer: Controller, State, Events, Actions, Historie und Werkzeuge.

pub mod actions;
pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
pub mod history;
mod intent_mapping;
pub mod render_scene;
pub mod selection;
/// Application State
///
/// Dieses Modul verwaltet den Zustand der Anwendung (World, Historie, Werkzeuge, Ansicht).
pub mod state;
pub mod tools;

pub use actions::{Action, ActionBatch, ActionError};
pub use command_log::CommandLog;
pub use controller::AppController;
pub use events::{AppCommand, AppIntent};
pub use history::{History, HistoryData};
pub use render_scene::build as build_render_scene;
pub use selection::{Selection, SelectionConstraints};
pub use state::{AppState, ViewState};
pub use tools::{ToolKind, ToolManager};
