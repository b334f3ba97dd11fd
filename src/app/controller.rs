//! Application Controller für zentrale Event-Verarbeitung.

use super::render_scene;
use super::{AppCommand, AppIntent, AppState};
use crate::shared::RenderScene;

/// Orchestriert Eingabe-Events, Werkzeuge und Historie auf dem AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: AppIntent) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;

        match command {
            // === Werkzeug-Eingaben ===
            AppCommand::ToolPointerDown { at, pick_radius } => {
                handlers::tool::pointer_down(state, at, pick_radius)
            }
            AppCommand::ToolPointerMove { at } => handlers::tool::pointer_move(state, at),
            AppCommand::ToolPointerUp { at } => handlers::tool::pointer_up(state, at),
            AppCommand::ToolObjectSelected { selection, at } => {
                handlers::tool::object_selected(state, selection, at)
            }
            AppCommand::RestartTool => handlers::tool::restart(state),
            AppCommand::AdvanceAnimation { dt } => handlers::tool::advance_animation(state, dt),

            // === Werkzeug-Verwaltung ===
            AppCommand::ActivateTool { tool } => handlers::tool::activate(state, tool),
            AppCommand::DeactivateTool => handlers::tool::deactivate(state),
            AppCommand::ChooseTemplate { name } => handlers::tool::choose_template(state, name),
            AppCommand::ChooseColor { color } => handlers::tool::choose_color(state, color),
            AppCommand::DeliverKit { kit } => handlers::tool::deliver_kit(state, kit),
            AppCommand::LoadKit { path } => handlers::file_io::load_kit(state, path)?,

            // === History ===
            AppCommand::Undo => handlers::history::undo(state)?,
            AppCommand::Redo => handlers::history::redo(state)?,
            AppCommand::JumpTo { index } => handlers::history::jump_to(state, index)?,

            // === Kamera & Viewport ===
            AppCommand::PauseTool => handlers::tool::pause(state),
            AppCommand::ResumeTool => handlers::tool::resume(state),
            AppCommand::PanCamera { delta } => handlers::view::pan(state, delta),
            AppCommand::ZoomCamera {
                factor,
                focus_world,
            } => handlers::view::zoom_towards(state, factor, focus_world),
            AppCommand::BeginPinch { touches } => handlers::view::begin_pinch(state, touches),
            AppCommand::UpdatePinch { touches } => handlers::view::update_pinch(state, touches),
            AppCommand::EndPinch => handlers::view::end_pinch(state),
            AppCommand::SetViewportSize { size } => handlers::view::set_viewport_size(state, size),
            AppCommand::ResetCamera => handlers::view::reset_camera(state),

            // === Datei-I/O ===
            AppCommand::NewScene => handlers::file_io::new_scene(state),
            AppCommand::LoadScene { path } => handlers::file_io::load_scene(state, path)?,
            AppCommand::SaveScene { path } => handlers::file_io::save_scene(state, path)?,
            AppCommand::LoadWorkspace { path } => handlers::file_io::load_workspace(state, path)?,
            AppCommand::SaveWorkspace { path } => handlers::file_io::save_workspace(state, path)?,

            // === Optionen ===
            AppCommand::ApplyOptions { options } => {
                handlers::options::apply_options(state, *options)?
            }
            AppCommand::ResetOptions => handlers::options::reset_options(state)?,
        }

        Ok(())
    }

    /// Baut die Render-Szene aus dem aktuellen AppState.
    pub fn build_render_scene(&self, state: &AppState) -> RenderScene {
        render_scene::build(state)
    }
}
