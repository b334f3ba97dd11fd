//! Handler für Undo/Redo und Sprünge in der Historie.
//!
//! Nach jeder Änderung der World durch die Historie wird das aktive
//! Werkzeug neu gestartet, damit keine Zwischenstände auf verschwundene
//! Objekte zeigen.

use crate::app::tools::{ToolContext, ToolEvent};
use crate::app::AppState;

fn restart_active_tool(state: &mut AppState) {
    let ctx = ToolContext {
        world: &state.world,
        options: &state.options,
    };
    state.tools.handle(&ToolEvent::Restart, &ctx);
}

/// Führt einen Undo-Schritt aus, falls vorhanden.
pub fn undo(state: &mut AppState) -> anyhow::Result<()> {
    if state.history.undo(&mut state.world)? {
        log::info!("Undo ausgeführt (Schritt {})", state.history.cursor());
        restart_active_tool(state);
        state.request_redraw();
    } else {
        log::debug!("Undo: nichts zu tun");
    }
    Ok(())
}

/// Führt einen Redo-Schritt aus, falls vorhanden.
pub fn redo(state: &mut AppState) -> anyhow::Result<()> {
    if state.history.redo(&mut state.world)? {
        log::info!("Redo ausgeführt (Schritt {})", state.history.cursor());
        restart_active_tool(state);
        state.request_redraw();
    } else {
        log::debug!("Redo: nichts zu tun");
    }
    Ok(())
}

/// Springt zum Schritt `index` (0 = Anfangszustand).
pub fn jump_to(state: &mut AppState, index: usize) -> anyhow::Result<()> {
    if index == state.history.cursor() {
        log::debug!("Sprung zu Schritt {}: bereits dort", index);
        return Ok(());
    }
    state.history.jump_to(&mut state.world, index)?;
    log::info!("Zu Schritt {} gesprungen", index);
    restart_active_tool(state);
    state.request_redraw();
    Ok(())
}
