//! Zentrale Konfiguration der Figuren-Werkbank.
//!
//! `WorkbenchOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::{Color, COINCIDENCE_EPSILON, INFINITE_DISPLAY_OFFSET, INTERSECTION_PRECISION};
use serde::{Deserialize, Serialize};

// ── Selektion ───────────────────────────────────────────────────────

/// Pick-Radius in Welteinheiten.
pub const SELECTION_PICK_RADIUS: f64 = 5.0;

// ── Historie ────────────────────────────────────────────────────────

/// Maximale Anzahl gespeicherter Batches, bevor die ältesten in den
/// Anfangszustand gefaltet werden.
pub const HISTORY_MAX_DEPTH: usize = 200;

// ── Tools ───────────────────────────────────────────────────────────

/// Dauer der Umdreh-Animation in Sekunden.
pub const REVERSE_ANIMATION_SECONDS: f64 = 0.8;
/// Standard-Anzahl Teile beim Teilen eines Segments.
pub const DIVIDE_PARTS_DEFAULT: usize = 2;
/// Versatz einer Kopie, wenn kein Ziehen stattfindet.
pub const COPY_OFFSET: f64 = 20.0;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Optionen.
/// Wird als `figure_workbench.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbenchOptions {
    // ── Geometrie ───────────────────────────────────────────────
    /// Toleranz für Koinzidenz von Koordinaten
    pub coincidence_epsilon: f64,
    /// Toleranz beim Filtern von Schnittpunkten
    pub intersection_precision: f64,
    /// Verlängerung unendlicher Segmente bei der Darstellung
    #[serde(default = "default_infinite_display_offset")]
    pub infinite_display_offset: f64,

    // ── Selektion ───────────────────────────────────────────────
    /// Pick-Radius in Welteinheiten
    pub selection_pick_radius: f64,

    // ── Historie ────────────────────────────────────────────────
    pub history_max_depth: usize,

    // ── Tools ────────────────────────────────────────────────────
    /// Dauer der Umdreh-Animation in Sekunden
    pub reverse_animation_seconds: f64,
    /// Anzahl Teile für das Teilen-Tool
    pub divide_parts: usize,
    #[serde(default = "default_copy_offset")]
    pub copy_offset: f64,

    // ── Darstellung neuer Formen ────────────────────────────────
    pub default_fill_color: Color,
    pub default_stroke_color: Color,
    pub default_fill_opacity: f64,
}

impl Default for WorkbenchOptions {
    fn default() -> Self {
        Self {
            coincidence_epsilon: COINCIDENCE_EPSILON,
            intersection_precision: INTERSECTION_PRECISION,
            infinite_display_offset: INFINITE_DISPLAY_OFFSET,

            selection_pick_radius: SELECTION_PICK_RADIUS,

            history_max_depth: HISTORY_MAX_DEPTH,

            reverse_animation_seconds: REVERSE_ANIMATION_SECONDS,
            divide_parts: DIVIDE_PARTS_DEFAULT,
            copy_offset: COPY_OFFSET,

            default_fill_color: crate::core::Shape::DEFAULT_FILL,
            default_stroke_color: crate::core::Shape::DEFAULT_STROKE,
            default_fill_opacity: crate::core::Shape::DEFAULT_OPACITY,
        }
    }
}

/// Serde-Default für `infinite_display_offset` (ältere TOML-Dateien).
fn default_infinite_display_offset() -> f64 {
    INFINITE_DISPLAY_OFFSET
}

fn default_copy_offset() -> f64 {
    COPY_OFFSET
}

impl WorkbenchOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("figure_workbench"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("figure_workbench.toml")
    }

    /// Teile für das Teilen-Tool, mindestens 2.
    pub fn effective_divide_parts(&self) -> usize {
        self.divide_parts.max(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_round_trip_keeps_values() {
        let mut options = WorkbenchOptions::default();
        options.divide_parts = 5;
        options.default_fill_color = Color::rgb(1, 2, 3);
        let text = toml::to_string_pretty(&options).expect("serialisierbar");
        let back: WorkbenchOptions = toml::from_str(&text).expect("lesbar");
        assert_eq!(back, options);
    }

    #[test]
    fn missing_optional_keys_use_defaults() {
        let mut text = toml::to_string_pretty(&WorkbenchOptions::default()).expect("serialisierbar");
        text = text
            .lines()
            .filter(|l| !l.starts_with("infinite_display_offset") && !l.starts_with("copy_offset"))
            .collect::<Vec<_>>()
            .join("\n");
        let back: WorkbenchOptions = toml::from_str(&text).expect("lesbar");
        assert_eq!(back.infinite_display_offset, INFINITE_DISPLAY_OFFSET);
        assert_eq!(back.copy_offset, COPY_OFFSET);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("wb-opts-{}.toml", std::process::id()));
        std::fs::write(&path, "coincidence_epsilon = \"x\"").expect("schreibbar");
        assert_eq!(WorkbenchOptions::load_from_file(&path), WorkbenchOptions::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn divide_parts_has_lower_bound() {
        let options = WorkbenchOptions {
            divide_parts: 0,
            ..WorkbenchOptions::default()
        };
        assert_eq!(options.effective_divide_parts(), 2);
    }
}
