//! Handler für Laufzeit-Optionen.

use crate::app::AppState;
use crate::shared::WorkbenchOptions;

/// Übernimmt neue Optionen und persistiert sie, falls eine Optionen-Datei bekannt ist.
pub fn apply_options(state: &mut AppState, options: WorkbenchOptions) -> anyhow::Result<()> {
    state.history.set_max_depth(options.history_max_depth);
    state.options = options;
    state.request_redraw();
    match state.files.options_path.as_deref() {
        Some(path) => state.options.save_to_file(path),
        None => {
            log::debug!("Optionen übernommen, keine Optionen-Datei gesetzt");
            Ok(())
        }
    }
}

/// Setzt Optionen auf Standardwerte zurück und persistiert sie.
pub fn reset_options(state: &mut AppState) -> anyhow::Result<()> {
    apply_options(state, WorkbenchOptions::default())
}
