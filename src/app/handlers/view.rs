//! Handler für Kamera, Viewport und Zwei-Finger-Gesten.

use crate::app::state::PinchAnchor;
use crate::app::AppState;
use crate::core::{Camera, Coordinates, COINCIDENCE_EPSILON};

/// Setzt die Kamera auf den Standardzustand zurück.
pub fn reset_camera(state: &mut AppState) {
    state.view.camera = Camera::new();
    state.request_redraw();
}

/// Aktualisiert die Viewport-Größe im State.
pub fn set_viewport_size(state: &mut AppState, size: [f64; 2]) {
    state.view.viewport_size = size;
    state.request_redraw();
}

/// Verschiebt die Kamera um ein Weltkoordinaten-Delta.
pub fn pan(state: &mut AppState, delta: Coordinates) {
    state.view.camera.pan(delta);
    state.request_redraw();
}

/// Zoomt mit optionalem Fokuspunkt im Weltkoordinatensystem.
pub fn zoom_towards(state: &mut AppState, factor: f64, focus_world: Option<Coordinates>) {
    if factor <= 0.0 || !factor.is_finite() {
        log::debug!("Zoom-Faktor {} ignoriert", factor);
        return;
    }
    match focus_world {
        Some(focus) => state.view.camera.zoom_towards(factor, focus),
        None => state.view.camera.zoom_by(factor),
    }
    state.request_redraw();
}

// ── Zwei-Finger-Geste ────────────────────────────────────────────

pub fn begin_pinch(state: &mut AppState, touches: [Coordinates; 2]) {
    let [a, b] = touches;
    state.view.pinch = Some(PinchAnchor {
        midpoint: a.middle_with(b),
        distance: a.dist(b),
    });
    state.view.pointer_down = false;
    log::debug!("Pinch beginnt bei {:?}", a.middle_with(b));
}

/// Führt die Kamera so, dass die Anker unter den Fingern bleiben.
///
/// Die Finger-Positionen kommen mit der aktuellen Kamera umgerechnet an;
/// bleiben die Finger stehen, liefern sie nach der Korrektur wieder die Anker.
pub fn update_pinch(state: &mut AppState, touches: [Coordinates; 2]) {
    let Some(anchor) = state.view.pinch else {
        log::debug!("Pinch-Update ohne laufende Geste");
        return;
    };
    let [a, b] = touches;
    let camera = &mut state.view.camera;
    camera.pan(anchor.midpoint - a.middle_with(b));

    let distance = a.dist(b);
    if anchor.distance > COINCIDENCE_EPSILON && distance > COINCIDENCE_EPSILON {
        camera.zoom_towards(distance / anchor.distance, anchor.midpoint);
    }
    state.request_redraw();
}

pub fn end_pinch(state: &mut AppState) {
    if state.view.pinch.take().is_some() {
        log::debug!("Pinch beendet");
    }
}
