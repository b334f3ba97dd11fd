//! Begrenztes Command-Log zur Nachverfolgung der ausgeführten Commands.

use super::AppCommand;

/// Speichert ausgeführte Commands in Reihenfolge.
///
/// Hochfrequente Commands (Zeigerbewegung, Animations-Takt, Pinch-Updates)
/// werden nur gezählt, nicht gespeichert.
#[derive(Default)]
pub struct CommandLog {
    entries: Vec<AppCommand>,
    skipped: usize,
}

impl CommandLog {
    const MAX_ENTRIES: usize = 1000;

    /// Erstellt ein leeres Command-Log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            skipped: 0,
        }
    }

    /// Fügt einen ausgeführten Command hinzu.
    /// Begrenzt auf MAX_ENTRIES, ältere Einträge werden verworfen.
    pub fn record(&mut self, command: &AppCommand) {
        if is_high_frequency(command) {
            self.skipped += 1;
            return;
        }
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.drain(..Self::MAX_ENTRIES / 2);
        }
        self.entries.push(command.clone());
    }

    /// Gibt die Anzahl der geloggten Commands zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Commands vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Anzahl der nur gezählten hochfrequenten Commands.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Liefert eine read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[AppCommand] {
        &self.entries
    }
}

fn is_high_frequency(command: &AppCommand) -> bool {
    matches!(
        command,
        AppCommand::ToolPointerMove { .. }
            | AppCommand::AdvanceAnimation { .. }
            | AppCommand::UpdatePinch { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Coordinates;

    #[test]
    fn pointer_moves_are_only_counted() {
        let mut log = CommandLog::new();
        log.record(&AppCommand::Undo);
        log.record(&AppCommand::ToolPointerMove {
            at: Coordinates::new(1.0, 1.0),
        });
        log.record(&AppCommand::AdvanceAnimation { dt: 0.016 });

        assert_eq!(log.len(), 1);
        assert_eq!(log.skipped(), 2);
        assert!(matches!(log.entries()[0], AppCommand::Undo));
    }

    #[test]
    fn full_log_drops_oldest_half() {
        let mut log = CommandLog::new();
        for index in 0..CommandLog::MAX_ENTRIES {
            log.record(&AppCommand::JumpTo { index });
        }
        log.record(&AppCommand::Redo);

        assert_eq!(log.len(), CommandLog::MAX_ENTRIES / 2 + 1);
        assert!(matches!(
            log.entries()[0],
            AppCommand::JumpTo { index } if index == CommandLog::MAX_ENTRIES / 2
        ));
    }
}
