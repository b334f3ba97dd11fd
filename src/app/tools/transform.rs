//! Verschieben, Drehen und Strecken per Ziehen.
//!
//! Alle drei teilen denselben Ablauf `start → listen → drag → start`; erst
//! beim Loslassen entsteht eine Action.

use super::{
    combined_center, selected_shape, PreviewTransform, Tool, ToolContext, ToolEvent, ToolKind,
    ToolOutput, ToolPreview,
};
use crate::app::actions::{ActionBatch, Homothety, Rotate, Translate};
use crate::app::selection::SelectionConstraints;
use crate::core::{normalize_angle, Coordinates, ShapeId, World, COINCIDENCE_EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformMode {
    Move,
    Rotate,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformStep {
    Start,
    /// Form gegriffen, Zeiger gedrückt
    Listen,
    Drag,
}

impl TransformStep {
    pub fn as_str(self) -> &'static str {
        match self {
            TransformStep::Start => "start",
            TransformStep::Listen => "listen",
            TransformStep::Drag => "drag",
        }
    }
}

pub struct TransformTool {
    mode: TransformMode,
    step: TransformStep,
    shape_ids: Vec<ShapeId>,
    center: Coordinates,
    grab: Coordinates,
    cursor: Coordinates,
}

impl TransformTool {
    fn new(mode: TransformMode) -> Self {
        Self {
            mode,
            step: TransformStep::Start,
            shape_ids: Vec::new(),
            center: Coordinates::ZERO,
            grab: Coordinates::ZERO,
            cursor: Coordinates::ZERO,
        }
    }

    pub fn moving() -> Self {
        Self::new(TransformMode::Move)
    }

    pub fn rotating() -> Self {
        Self::new(TransformMode::Rotate)
    }

    pub fn scaling() -> Self {
        Self::new(TransformMode::Scale)
    }

    pub fn current_step(&self) -> TransformStep {
        self.step
    }

    fn reset(&mut self) {
        self.step = TransformStep::Start;
        self.shape_ids.clear();
    }

    /// Transformation vom Greifpunkt zur aktuellen Zeigerposition.
    fn transform(&self) -> Option<PreviewTransform> {
        match self.mode {
            TransformMode::Move => Some(PreviewTransform::Translate(self.cursor - self.grab)),
            TransformMode::Rotate => {
                let from = self.grab - self.center;
                let to = self.cursor - self.center;
                if from.length() < COINCIDENCE_EPSILON || to.length() < COINCIDENCE_EPSILON {
                    return None;
                }
                let angle = normalize_angle(to.y.atan2(to.x) - from.y.atan2(from.x));
                Some(PreviewTransform::Rotate {
                    angle,
                    center: self.center,
                })
            }
            TransformMode::Scale => {
                let from = self.grab.dist(self.center);
                let to = self.cursor.dist(self.center);
                if from < COINCIDENCE_EPSILON || to < COINCIDENCE_EPSILON {
                    return None;
                }
                Some(PreviewTransform::Scale {
                    factor: to / from,
                    center: self.center,
                })
            }
        }
    }

    fn commit(&mut self) -> ToolOutput {
        let shape_ids = std::mem::take(&mut self.shape_ids);
        self.step = TransformStep::Start;
        let batch = match self.transform() {
            Some(PreviewTransform::Translate(delta)) if delta.length() > COINCIDENCE_EPSILON => {
                ActionBatch::single(Translate::new(shape_ids, delta))
            }
            Some(PreviewTransform::Rotate { angle, center }) if angle.abs() > f64::EPSILON => {
                ActionBatch::single(Rotate::new(shape_ids, angle, center))
            }
            Some(PreviewTransform::Scale { factor, center })
                if (factor - 1.0).abs() > f64::EPSILON =>
            {
                ActionBatch::single(Homothety::new(shape_ids, factor, center))
            }
            Some(_) => return ToolOutput::Continue,
            None => return ToolOutput::Rejected("Ziehen durch das Zentrum nicht möglich".into()),
        };
        ToolOutput::Commit(batch)
    }
}

impl Tool for TransformTool {
    fn kind(&self) -> ToolKind {
        match self.mode {
            TransformMode::Move => ToolKind::Move,
            TransformMode::Rotate => ToolKind::Rotate,
            TransformMode::Scale => ToolKind::Scale,
        }
    }

    fn name(&self) -> &str {
        match self.mode {
            TransformMode::Move => "Verschieben",
            TransformMode::Rotate => "Drehen",
            TransformMode::Scale => "Strecken",
        }
    }

    fn description(&self) -> &str {
        match self.mode {
            TransformMode::Move => "Verschiebt eine Form (samt Gruppe)",
            TransformMode::Rotate => "Dreht eine Form um ihr Zentrum",
            TransformMode::Scale => "Streckt eine Form von ihrem Zentrum aus",
        }
    }

    fn step(&self) -> &'static str {
        self.step.as_str()
    }

    fn status_text(&self) -> &str {
        match self.step {
            TransformStep::Start => "Form wählen",
            TransformStep::Listen | TransformStep::Drag => "Ziehen und loslassen",
        }
    }

    fn constraints(&self, _world: &World) -> SelectionConstraints {
        match self.step {
            TransformStep::Start => SelectionConstraints::shapes(),
            _ => SelectionConstraints::none(),
        }
    }

    fn start(&mut self, _ctx: &ToolContext) -> ToolOutput {
        self.reset();
        ToolOutput::Continue
    }

    fn handle(&mut self, event: &ToolEvent, ctx: &ToolContext) -> ToolOutput {
        match (self.step, event) {
            (_, ToolEvent::Restart) => {
                self.reset();
                ToolOutput::Continue
            }
            (TransformStep::Start, ToolEvent::ObjectSelected { selection, at }) => {
                let Some(shape_id) = selected_shape(ctx.world, selection) else {
                    return ToolOutput::Ignored;
                };
                let shape_ids = ctx.world.group_members_or_self(shape_id);
                let Some(center) = combined_center(ctx.world, &shape_ids) else {
                    return ToolOutput::Ignored;
                };
                self.shape_ids = shape_ids;
                self.center = center;
                self.grab = *at;
                self.cursor = *at;
                self.step = TransformStep::Listen;
                ToolOutput::Continue
            }
            (TransformStep::Listen | TransformStep::Drag, ToolEvent::PointerMove(at)) => {
                self.cursor = *at;
                self.step = TransformStep::Drag;
                ToolOutput::Continue
            }
            (TransformStep::Listen, ToolEvent::PointerUp(_)) => {
                self.reset();
                ToolOutput::Continue
            }
            (TransformStep::Drag, ToolEvent::PointerUp(at)) => {
                self.cursor = *at;
                self.commit()
            }
            _ => ToolOutput::Ignored,
        }
    }

    fn end(&mut self) {
        self.reset();
    }

    fn preview(&self, _world: &World) -> ToolPreview {
        if self.step == TransformStep::Start {
            return ToolPreview::default();
        }
        ToolPreview {
            transform: if self.step == TransformStep::Drag {
                self.transform()
            } else {
                None
            },
            highlighted: self.shape_ids.clone(),
            markers: vec![self.center],
            ..ToolPreview::default()
        }
    }

    fn has_pending_input(&self) -> bool {
        self.step != TransformStep::Start
    }
}
