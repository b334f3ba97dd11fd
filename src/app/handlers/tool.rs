//! Handler für Werkzeug-Eingaben und Werkzeugwechsel.
//!
//! Werkzeuge lesen die World nur; ein abgeschlossener Ablauf kommt als
//! `ToolOutput::Commit` zurück und wird hier über die Historie ausgeführt.

use crate::app::selection::{self, Selection};
use crate::app::tools::{ToolContext, ToolEvent, ToolKind, ToolOutput};
use crate::app::AppState;
use crate::core::{Color, Coordinates};
use crate::persistence::ShapeKit;

/// Gibt ein Event an das aktive Werkzeug und verarbeitet dessen Ausgabe.
fn dispatch(state: &mut AppState, event: ToolEvent) {
    let ctx = ToolContext {
        world: &state.world,
        options: &state.options,
    };
    let output = state.tools.handle(&event, &ctx);
    apply_output(state, output);
}

fn apply_output(state: &mut AppState, output: ToolOutput) {
    match output {
        ToolOutput::Ignored => {}
        ToolOutput::Continue => {
            state.status_message = state.tools.active_tool().map(|t| t.status_text().to_owned());
            state.request_redraw();
        }
        ToolOutput::Commit(batch) => {
            let label = batch.label();
            match state.history.execute(&mut state.world, batch) {
                Ok(()) => {
                    log::info!("Batch '{}' ausgeführt (Schritt {})", label, state.history.cursor());
                    state.status_message =
                        state.tools.active_tool().map(|t| t.status_text().to_owned());
                }
                Err(e) => {
                    log::warn!("Batch '{}' nicht ausgeführt: {}", label, e);
                    state.status_message = Some(format!("{label}: {e}"));
                    // Werkzeug-Zwischenstände können sich auf den verworfenen Batch beziehen
                    let ctx = ToolContext {
                        world: &state.world,
                        options: &state.options,
                    };
                    state.tools.handle(&ToolEvent::Restart, &ctx);
                }
            }
            state.request_redraw();
        }
        ToolOutput::Rejected(reason) => {
            log::warn!("Konstruktion abgewiesen: {}", reason);
            state.status_message = Some(reason);
            state.request_redraw();
        }
    }
}

// ── Zeiger ───────────────────────────────────────────────────────

/// Zeiger gedrückt: passt ein Objekt zu den aktuellen Beschränkungen, erhält
/// das Werkzeug die Auswahl, sonst die reine Position.
pub fn pointer_down(state: &mut AppState, at: Coordinates, pick_radius: f64) {
    state.view.cursor = at;
    state.view.pointer_down = true;
    if state.tools.is_paused() {
        log::debug!("Zeiger gedrückt: Werkzeug pausiert");
        return;
    }
    let constraints = state.tools.constraints(&state.world);
    let picked = if constraints.is_empty() {
        None
    } else {
        selection::resolve(&state.world, &constraints, at, pick_radius)
    };
    match picked {
        Some(selection) => {
            log::debug!("Auswahl {:?} bei {:?}", selection, at);
            dispatch(state, ToolEvent::ObjectSelected { selection, at });
        }
        None => dispatch(state, ToolEvent::PointerDown(at)),
    }
}

pub fn pointer_move(state: &mut AppState, at: Coordinates) {
    state.view.cursor = at;
    dispatch(state, ToolEvent::PointerMove(at));
}

pub fn pointer_up(state: &mut AppState, at: Coordinates) {
    state.view.cursor = at;
    state.view.pointer_down = false;
    dispatch(state, ToolEvent::PointerUp(at));
}

/// Von außen bereits aufgelöste Auswahl; sie muss trotzdem erlaubt sein.
pub fn object_selected(state: &mut AppState, selection: Selection, at: Coordinates) {
    let constraints = state.tools.constraints(&state.world);
    if !constraints.allows(&state.world, &selection) {
        log::debug!("Auswahl {:?} im aktuellen Schritt nicht erlaubt", selection);
        return;
    }
    dispatch(state, ToolEvent::ObjectSelected { selection, at });
}

pub fn restart(state: &mut AppState) {
    dispatch(state, ToolEvent::Restart);
}

pub fn advance_animation(state: &mut AppState, dt: f64) {
    if !state.tools.is_animating() {
        log::debug!("Animations-Takt ohne laufende Animation");
        return;
    }
    dispatch(state, ToolEvent::AnimationFrame { dt });
}

// ── Werkzeugwechsel ──────────────────────────────────────────────

/// Aktiviert ein Werkzeug; das bisherige wird beendet.
pub fn activate(state: &mut AppState, kind: ToolKind) {
    let ctx = ToolContext {
        world: &state.world,
        options: &state.options,
    };
    let Some(output) = state.tools.activate(kind, &ctx) else {
        log::warn!("Werkzeug {:?} nicht registriert", kind);
        return;
    };
    log::info!("Werkzeug aktiviert: {:?}", kind);
    state.view.pointer_down = false;
    state.view.pinch = None;
    apply_output(state, output);

    // Einstellungen, die vor der Aktivierung gewählt wurden, nachreichen
    match kind {
        ToolKind::Create => {
            if let Some(kit) = state.kit.clone() {
                dispatch(state, ToolEvent::KitLoaded(kit));
            }
        }
        ToolKind::Color => {
            if let Some(color) = state.chosen_color {
                dispatch(state, ToolEvent::SetColor(color));
            }
        }
        _ => {}
    }
    state.status_message = state.tools.active_tool().map(|t| t.status_text().to_owned());
}

pub fn deactivate(state: &mut AppState) {
    if state.tools.active_kind().is_none() {
        log::debug!("Kein aktives Werkzeug");
        return;
    }
    state.tools.deactivate();
    state.status_message = None;
    state.request_redraw();
}

pub fn choose_template(state: &mut AppState, name: String) {
    dispatch(state, ToolEvent::ChooseTemplate(name));
}

pub fn choose_color(state: &mut AppState, color: Color) {
    state.chosen_color = Some(color);
    if state.tools.active_kind() == Some(ToolKind::Color) {
        dispatch(state, ToolEvent::SetColor(color));
    }
}

/// Stellt einen geladenen Bausatz bereit; ein wartendes Erstellen-Tool
/// verlässt dadurch seinen Ladeschritt.
pub fn deliver_kit(state: &mut AppState, kit: ShapeKit) {
    log::info!("Bausatz '{}' bereitgestellt", kit.name);
    state.kit = Some(kit.clone());
    if state.tools.active_kind() == Some(ToolKind::Create) {
        dispatch(state, ToolEvent::KitLoaded(kit));
    }
}

// ── Pause ────────────────────────────────────────────────────────

pub fn pause(state: &mut AppState) {
    state.tools.pause();
}

pub fn resume(state: &mut AppState) {
    state.tools.resume();
    state.request_redraw();
}
