//! Builder für Render-Szenen aus dem AppState.

use crate::app::AppState;
use crate::shared::{PreviewLayer, RenderPoint, RenderScene, RenderShape};
use std::collections::HashSet;

/// Baut eine RenderScene aus dem aktuellen AppState.
pub fn build(state: &AppState) -> RenderScene {
    let world = &state.world;
    let preview = state.tools.preview(world);
    let highlighted: HashSet<_> = preview.highlighted.iter().copied().collect();
    let transformed = preview.transform.is_some();

    let shapes = world
        .shapes()
        .filter(|shape| shape.visible)
        .filter_map(|shape| {
            let geometry = world.shape_geometry(shape.id)?;
            let is_highlighted = highlighted.contains(&shape.id);
            Some(RenderShape {
                id: shape.id,
                path: geometry.svg_path(1.0),
                fill_color: shape.fill_color,
                fill_opacity: shape.fill_opacity,
                stroke_color: shape.stroke_color,
                stroke_width: shape.stroke_width,
                hints: geometry.render_hints(),
                bounds: geometry.bounds(),
                highlighted: is_highlighted,
                transformed: transformed && is_highlighted,
            })
        })
        .collect();

    // Punkte unsichtbarer Formen bleiben verborgen
    let mut points: Vec<RenderPoint> = world
        .points()
        .filter(|p| p.visible)
        .filter(|p| {
            p.shape_id
                .and_then(|id| world.shape(id))
                .map_or(true, |shape| shape.visible)
        })
        .map(|p| RenderPoint {
            id: p.id,
            coordinates: p.coordinates,
            point_type: p.point_type,
            color: p.color,
        })
        .collect();
    points.sort_by_key(|p| p.id);

    RenderScene {
        camera: state.view.camera.clone(),
        viewport_size: state.view.viewport_size,
        shapes,
        points,
        preview: PreviewLayer {
            paths: preview.paths,
            transform: preview.transform.map(|t| t.affine()),
            markers: preview.markers,
        },
        status_message: state.status_message.clone(),
    }
}
