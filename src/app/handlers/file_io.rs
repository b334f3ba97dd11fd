//! Handler für Datei-Operationen (Szene, Arbeitsbereich, Bausatz).
//!
//! Eine Szene ist nur der aktuelle Zustand; ein Arbeitsbereich enthält
//! zusätzlich die Historie (Anfangszustand, Batches, Cursor).

use crate::app::history::{History, HistoryData};
use crate::app::AppState;
use crate::core::World;
use crate::persistence;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Beginnt eine leere Szene; die Historie startet neu.
pub fn new_scene(state: &mut AppState) {
    let world = World::new();
    let history = History::new(&world, state.options.history_max_depth);
    state.replace_world(world, history);
    state.files.current_scene_path = None;
    state.files.last_load_report = None;
    state.tools.deactivate();
    log::info!("Neue Szene");
}

/// Lädt eine Szene; unauflösbare Referenzen landen im Ladebericht.
pub fn load_scene(state: &mut AppState, path: PathBuf) -> anyhow::Result<()> {
    let (world, report) = persistence::load_scene_file(&path)?;
    if !report.is_clean() {
        log::warn!(
            "Szene {} mit {} Problemen geladen",
            path.display(),
            report.issues.len()
        );
        state.status_message = Some(format!(
            "{} Probleme beim Laden, siehe Bericht",
            report.issues.len()
        ));
    }
    log::info!(
        "Szene geladen: {} ({} Formen)",
        path.display(),
        report.shapes_loaded
    );
    let history = History::new(&world, state.options.history_max_depth);
    state.replace_world(world, history);
    state.tools.deactivate();
    state.files.current_scene_path = Some(path);
    state.files.last_load_report = Some(report);
    Ok(())
}

pub fn save_scene(state: &mut AppState, path: PathBuf) -> anyhow::Result<()> {
    persistence::save_scene_file(&state.world, &path)?;
    state.files.current_scene_path = Some(path);
    Ok(())
}

// ── Arbeitsbereich ───────────────────────────────────────────────

/// Speichert Szene samt Historie als JSON.
pub fn save_workspace(state: &mut AppState, path: PathBuf) -> anyhow::Result<()> {
    write_workspace_file(&state.history.to_data(), &path)?;
    log::info!(
        "Arbeitsbereich gespeichert: {} ({} Schritte)",
        path.display(),
        state.history.len()
    );
    Ok(())
}

/// Lädt einen Arbeitsbereich und spielt die Historie bis zum Cursor ab.
pub fn load_workspace(state: &mut AppState, path: PathBuf) -> anyhow::Result<()> {
    let data = read_workspace_file(&path)?;
    let (history, world) = History::from_data(data, state.options.history_max_depth)
        .with_context(|| format!("Historie aus {} nicht abspielbar", path.display()))?;
    log::info!(
        "Arbeitsbereich geladen: {} (Schritt {} von {})",
        path.display(),
        history.cursor(),
        history.len()
    );
    state.replace_world(world, history);
    state.tools.deactivate();
    state.files.last_load_report = None;
    Ok(())
}

fn write_workspace_file(data: &HistoryData, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(data).context("Historie nicht serialisierbar")?;
    std::fs::write(path, json).with_context(|| {
        format!(
            "Arbeitsbereich konnte nicht geschrieben werden: {}",
            path.display()
        )
    })
}

fn read_workspace_file(path: &Path) -> anyhow::Result<HistoryData> {
    let json = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Arbeitsbereich konnte nicht gelesen werden: {}",
            path.display()
        )
    })?;
    serde_json::from_str(&json)
        .with_context(|| format!("Fehler beim Parsen des Arbeitsbereichs {}", path.display()))
}

// ── Bausatz ──────────────────────────────────────────────────────

pub fn load_kit(state: &mut AppState, path: PathBuf) -> anyhow::Result<()> {
    let kit = persistence::load_kit_file(&path)?;
    super::tool::deliver_kit(state, kit);
    Ok(())
}
