//! Mapping von UI-Intents auf mutierende App-Commands.

use super::{AppCommand, AppIntent, AppState};
use crate::core::Coordinates;

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::PointerDown { at } => vec![AppCommand::ToolPointerDown {
            at,
            pick_radius: state.options.selection_pick_radius,
        }],
        AppIntent::PointerMove { at } => vec![AppCommand::ToolPointerMove { at }],
        AppIntent::PointerUp { at } => vec![AppCommand::ToolPointerUp { at }],
        AppIntent::TouchStart { touches } => map_touch_start(state, &touches),
        AppIntent::TouchMove { touches } => map_touch_move(state, &touches),
        AppIntent::TouchEnd { touches } => map_touch_end(state, &touches),
        AppIntent::ObjectSelected { selection, at } => {
            vec![AppCommand::ToolObjectSelected { selection, at }]
        }
        AppIntent::RestartRequested => vec![AppCommand::RestartTool],
        AppIntent::AnimationFrame { dt } => {
            // Ohne laufende Animation gibt es nichts zu takten
            if state.tools.is_animating() {
                vec![AppCommand::AdvanceAnimation { dt }]
            } else {
                vec![]
            }
        }

        AppIntent::ToolSelected { tool } => vec![AppCommand::ActivateTool { tool }],
        AppIntent::ToolDeactivated => vec![AppCommand::DeactivateTool],
        AppIntent::TemplateChosen { name } => vec![AppCommand::ChooseTemplate { name }],
        AppIntent::ColorChosen { color } => vec![AppCommand::ChooseColor { color }],
        AppIntent::KitLoaded { kit } => vec![AppCommand::DeliverKit { kit }],
        AppIntent::KitFileSelected { path } => vec![AppCommand::LoadKit { path }],

        AppIntent::UndoRequested => vec![AppCommand::Undo],
        AppIntent::RedoRequested => vec![AppCommand::Redo],
        AppIntent::HistoryJumpRequested { index } => vec![AppCommand::JumpTo { index }],

        AppIntent::PanZoomStarted => vec![AppCommand::PauseTool],
        AppIntent::PanZoomEnded => vec![AppCommand::ResumeTool],
        AppIntent::CameraPan { delta } => vec![AppCommand::PanCamera { delta }],
        AppIntent::CameraZoom {
            factor,
            focus_world,
        } => vec![AppCommand::ZoomCamera {
            factor,
            focus_world,
        }],
        AppIntent::ViewportResized { size } => vec![AppCommand::SetViewportSize { size }],
        AppIntent::ResetCameraRequested => vec![AppCommand::ResetCamera],

        AppIntent::NewSceneRequested => vec![AppCommand::NewScene],
        AppIntent::SceneFileSelected { path } => vec![AppCommand::LoadScene { path }],
        AppIntent::SceneSavePathSelected { path } => vec![AppCommand::SaveScene { path }],
        AppIntent::WorkspaceFileSelected { path } => vec![AppCommand::LoadWorkspace { path }],
        AppIntent::WorkspaceSavePathSelected { path } => {
            vec![AppCommand::SaveWorkspace { path }]
        }

        AppIntent::OptionsChanged { options } => vec![AppCommand::ApplyOptions { options }],
        AppIntent::ResetOptionsRequested => vec![AppCommand::ResetOptions],
    }
}

// ── Touch ────────────────────────────────────────────────────────

fn two_fingers(touches: &[Coordinates]) -> Option<[Coordinates; 2]> {
    match touches {
        [a, b, ..] => Some([*a, *b]),
        _ => None,
    }
}

/// Ein Finger bedient das Werkzeug, zwei Finger pausieren es für Pan/Zoom.
fn map_touch_start(state: &AppState, touches: &[Coordinates]) -> Vec<AppCommand> {
    if let Some(pair) = two_fingers(touches) {
        if state.view.pinch.is_some() {
            return vec![];
        }
        let mut commands = Vec::new();
        if state.view.pointer_down {
            // Der erste Finger hat bereits eine Geste begonnen
            commands.push(AppCommand::RestartTool);
        }
        commands.push(AppCommand::PauseTool);
        commands.push(AppCommand::BeginPinch { touches: pair });
        return commands;
    }
    match touches.first() {
        Some(at) if state.view.pinch.is_none() => vec![AppCommand::ToolPointerDown {
            at: *at,
            pick_radius: state.options.selection_pick_radius,
        }],
        _ => vec![],
    }
}

fn map_touch_move(state: &AppState, touches: &[Coordinates]) -> Vec<AppCommand> {
    if state.view.pinch.is_some() {
        return match two_fingers(touches) {
            Some(pair) => vec![AppCommand::UpdatePinch { touches: pair }],
            None => vec![],
        };
    }
    match touches.first() {
        Some(at) => vec![AppCommand::ToolPointerMove { at: *at }],
        None => vec![],
    }
}

fn map_touch_end(state: &AppState, touches: &[Coordinates]) -> Vec<AppCommand> {
    if state.view.pinch.is_some() {
        if touches.len() < 2 {
            return vec![AppCommand::EndPinch, AppCommand::ResumeTool];
        }
        return vec![];
    }
    if touches.is_empty() && state.view.pointer_down {
        return vec![AppCommand::ToolPointerUp {
            at: state.view.cursor,
        }];
    }
    vec![]
}

#[cfg(test)]
mod tests;
