//! 2D-Kamera für Pan und Zoom der Zeichenfläche.

use super::Coordinates;
use glam::{DAffine2, DVec2};

/// 2D-Kamera mit Pan und Zoom
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Welt-Position in der Mitte des Viewports
    pub position: Coordinates,
    /// Zoom-Level (1.0 = eine Welteinheit pro Pixel)
    pub zoom: f64,
}

impl Camera {
    /// Minimaler Zoom-Faktor.
    pub const ZOOM_MIN: f64 = 0.05;
    /// Maximaler Zoom-Faktor.
    pub const ZOOM_MAX: f64 = 50.0;

    /// Erstellt eine neue Kamera
    pub fn new() -> Self {
        Self {
            position: Coordinates::ZERO,
            zoom: 1.0,
        }
    }

    /// Verschiebt die Kamera (Pan, Welteinheiten)
    pub fn pan(&mut self, delta: Coordinates) {
        self.position = self.position + delta;
    }

    /// Ändert den Zoom-Level
    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom = (self.zoom * factor).clamp(Self::ZOOM_MIN, Self::ZOOM_MAX);
    }

    /// Zoomt so, dass `focus` (Welt) an derselben Bildschirmstelle bleibt.
    pub fn zoom_towards(&mut self, factor: f64, focus: Coordinates) {
        let before = self.zoom;
        self.zoom_by(factor);
        let applied = self.zoom / before;
        // focus - (focus - position) / applied
        self.position = focus + (self.position - focus) * (1.0 / applied);
    }

    /// Welt → Screen als affine Abbildung (Viewport-Mitte = Kamera-Position).
    pub fn world_to_screen_transform(&self, viewport: [f64; 2]) -> DAffine2 {
        let center = DVec2::new(viewport[0] * 0.5, viewport[1] * 0.5);
        DAffine2::from_translation(center)
            * DAffine2::from_scale(DVec2::splat(self.zoom))
            * DAffine2::from_translation(-DVec2::from(self.position))
    }

    /// Konvertiert Welt-Koordinaten zu Screen-Koordinaten.
    pub fn world_to_screen(&self, world: Coordinates, viewport: [f64; 2]) -> Coordinates {
        self.world_to_screen_transform(viewport)
            .transform_point2(world.into())
            .into()
    }

    /// Konvertiert Screen-Koordinaten zu Welt-Koordinaten.
    pub fn screen_to_world(&self, screen: Coordinates, viewport: [f64; 2]) -> Coordinates {
        self.world_to_screen_transform(viewport)
            .inverse()
            .transform_point2(screen.into())
            .into()
    }

    /// Pick-Radius in Welteinheiten für einen Radius in Pixeln.
    pub fn pick_radius_world(&self, pick_radius_px: f64) -> f64 {
        pick_radius_px / self.zoom
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_pan() {
        let mut camera = Camera::new();
        camera.pan(Coordinates::new(10.0, 5.0));
        assert_relative_eq!(camera.position.x, 10.0);
        assert_relative_eq!(camera.position.y, 5.0);
    }

    #[test]
    fn test_camera_zoom_is_clamped() {
        let mut camera = Camera::new();
        camera.zoom_by(2.0);
        assert_relative_eq!(camera.zoom, 2.0);
        camera.zoom_by(1000.0);
        assert_relative_eq!(camera.zoom, Camera::ZOOM_MAX);
    }

    #[test]
    fn test_screen_world_round_trip() {
        let mut camera = Camera::new();
        camera.position = Coordinates::new(100.0, 50.0);
        camera.zoom = 3.0;
        let viewport = [800.0, 600.0];
        let world = Coordinates::new(120.0, 40.0);
        let screen = camera.world_to_screen(world, viewport);
        let back = camera.screen_to_world(screen, viewport);
        assert_relative_eq!(back.x, world.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, world.y, epsilon = 1e-9);
        // Viewport-Mitte zeigt auf die Kamera-Position
        let center = camera.screen_to_world(Coordinates::new(400.0, 300.0), viewport);
        assert_relative_eq!(center.x, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zoom_towards_keeps_focus_fixed() {
        let mut camera = Camera::new();
        let viewport = [800.0, 600.0];
        let focus = Coordinates::new(50.0, 20.0);
        let before = camera.world_to_screen(focus, viewport);
        camera.zoom_towards(2.0, focus);
        let after = camera.world_to_screen(focus, viewport);
        assert_relative_eq!(before.x, after.x, epsilon = 1e-9);
        assert_relative_eq!(before.y, after.y, epsilon = 1e-9);
    }

    #[test]
    fn test_pick_radius_shrinks_with_zoom() {
        let mut camera = Camera::new();
        assert_relative_eq!(camera.pick_radius_world(10.0), 10.0);
        camera.zoom_by(2.0);
        assert_relative_eq!(camera.pick_radius_world(10.0), 5.0);
    }
}
