//! JSON-Dateien für Szenen und Bausätze.

use super::data::{SceneData, ShapeKit};
use super::scene::LoadReport;
use crate::core::World;
use anyhow::Context;
use std::path::Path;

/// Fataler Fehler beim Lesen eines Dokuments.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("ungültiges JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialisiert die World als JSON-Szene.
pub fn save_scene_json(world: &World) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&world.to_scene())
}

/// Liest eine JSON-Szene. Nur fehlerhaftes JSON ist fatal; fehlende
/// Referenzen stehen im Bericht.
pub fn load_scene_json(json: &str) -> Result<(World, LoadReport), LoadError> {
    let scene: SceneData = serde_json::from_str(json)?;
    Ok(World::from_scene(&scene))
}

/// Liest einen Bausatz aus JSON.
pub fn kit_from_json(json: &str) -> Result<ShapeKit, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Speichert die Szene in eine Datei.
pub fn save_scene_file(world: &World, path: &Path) -> anyhow::Result<()> {
    let json = save_scene_json(world).context("Szene nicht serialisierbar")?;
    std::fs::write(path, json)
        .with_context(|| format!("Szene konnte nicht geschrieben werden: {}", path.display()))?;
    log::info!("Szene gespeichert: {}", path.display());
    Ok(())
}

/// Lädt eine Szene aus einer Datei.
pub fn load_scene_file(path: &Path) -> anyhow::Result<(World, LoadReport)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Szene konnte nicht gelesen werden: {}", path.display()))?;
    let loaded = load_scene_json(&json)
        .with_context(|| format!("Fehler beim Parsen der Szene {}", path.display()))?;
    Ok(loaded)
}

/// Lädt einen Bausatz aus einer Datei.
pub fn load_kit_file(path: &Path) -> anyhow::Result<ShapeKit> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Bausatz konnte nicht gelesen werden: {}", path.display()))?;
    let kit = kit_from_json(&json)
        .with_context(|| format!("Fehler beim Parsen des Bausatzes {}", path.display()))?;
    log::info!("Bausatz '{}' geladen: {} Vorlagen", kit.name, kit.shapes.len());
    Ok(kit)
}
