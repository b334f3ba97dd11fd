//! Umdrehen-Tool: Form wählen, Achse durch ihr Zentrum festlegen, Umklappen
//! animieren und erst am Ende die Action abgeben.

use super::{
    combined_center, selected_shape, snapped_direction, PreviewTransform, Tool, ToolContext,
    ToolEvent, ToolKind, ToolOutput, ToolPreview,
};
use crate::app::actions::{ActionBatch, Reverse};
use crate::app::selection::SelectionConstraints;
use crate::core::{Coordinates, ShapeId, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReverseStep {
    Start,
    SelectAxis,
    Animate,
}

impl ReverseStep {
    pub fn as_str(self) -> &'static str {
        match self {
            ReverseStep::Start => "start",
            ReverseStep::SelectAxis => "selectAxis",
            ReverseStep::Animate => "animate",
        }
    }
}

pub struct ReverseTool {
    step: ReverseStep,
    shape_ids: Vec<ShapeId>,
    center: Coordinates,
    axis: [Coordinates; 2],
    elapsed: f64,
    duration: f64,
}

impl ReverseTool {
    pub fn new() -> Self {
        Self {
            step: ReverseStep::Start,
            shape_ids: Vec::new(),
            center: Coordinates::ZERO,
            axis: [Coordinates::ZERO; 2],
            elapsed: 0.0,
            duration: 0.0,
        }
    }

    pub fn current_step(&self) -> ReverseStep {
        self.step
    }

    /// Fortschritt der Animation in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        self.step = ReverseStep::Start;
        self.shape_ids.clear();
        self.elapsed = 0.0;
    }

    fn select_axis(&mut self, at: Coordinates, ctx: &ToolContext) -> ToolOutput {
        let Some(direction) = snapped_direction(self.center, at) else {
            return ToolOutput::Rejected("Achse braucht eine Richtung".into());
        };
        self.axis = [self.center, self.center + direction];
        self.elapsed = 0.0;
        self.duration = ctx.options.reverse_animation_seconds.max(0.0);
        self.step = ReverseStep::Animate;
        ToolOutput::Continue
    }
}

impl Default for ReverseTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for ReverseTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Reverse
    }

    fn name(&self) -> &str {
        "Umdrehen"
    }

    fn description(&self) -> &str {
        "Klappt eine Form an einer Achse durch ihr Zentrum um"
    }

    fn step(&self) -> &'static str {
        self.step.as_str()
    }

    fn status_text(&self) -> &str {
        match self.step {
            ReverseStep::Start => "Form wählen",
            ReverseStep::SelectAxis => "Richtung der Achse wählen",
            ReverseStep::Animate => "Wird umgedreht…",
        }
    }

    fn constraints(&self, _world: &World) -> SelectionConstraints {
        match self.step {
            ReverseStep::Start => SelectionConstraints::shapes(),
            _ => SelectionConstraints::none(),
        }
    }

    fn start(&mut self, _ctx: &ToolContext) -> ToolOutput {
        self.reset();
        ToolOutput::Continue
    }

    fn handle(&mut self, event: &ToolEvent, ctx: &ToolContext) -> ToolOutput {
        match (self.step, event) {
            (ReverseStep::Animate, ToolEvent::AnimationFrame { dt }) => {
                self.elapsed += dt.max(0.0);
                if self.progress() < 1.0 {
                    return ToolOutput::Continue;
                }
                let shape_ids = std::mem::take(&mut self.shape_ids);
                let axis = self.axis;
                self.reset();
                ToolOutput::Commit(ActionBatch::single(Reverse::new(shape_ids, axis)))
            }
            // Die laufende Animation lässt sich nicht neu starten
            (ReverseStep::Animate, _) => ToolOutput::Ignored,
            (_, ToolEvent::Restart) => {
                self.reset();
                ToolOutput::Continue
            }
            (ReverseStep::Start, ToolEvent::ObjectSelected { selection, .. }) => {
                let Some(shape_id) = selected_shape(ctx.world, selection) else {
                    return ToolOutput::Ignored;
                };
                let shape_ids = ctx.world.group_members_or_self(shape_id);
                let Some(center) = combined_center(ctx.world, &shape_ids) else {
                    return ToolOutput::Ignored;
                };
                self.shape_ids = shape_ids;
                self.center = center;
                self.step = ReverseStep::SelectAxis;
                ToolOutput::Continue
            }
            (ReverseStep::SelectAxis, ToolEvent::PointerDown(at))
            | (ReverseStep::SelectAxis, ToolEvent::ObjectSelected { at, .. }) => {
                self.select_axis(*at, ctx)
            }
            _ => ToolOutput::Ignored,
        }
    }

    fn end(&mut self) {
        if self.step == ReverseStep::Animate {
            log::debug!("Umdreh-Animation abgebrochen");
        }
        self.reset();
    }

    fn preview(&self, _world: &World) -> ToolPreview {
        match self.step {
            ReverseStep::Start => ToolPreview::default(),
            ReverseStep::SelectAxis => ToolPreview {
                highlighted: self.shape_ids.clone(),
                markers: vec![self.center],
                ..ToolPreview::default()
            },
            ReverseStep::Animate => ToolPreview {
                highlighted: self.shape_ids.clone(),
                transform: Some(PreviewTransform::Flip {
                    axis: self.axis,
                    progress: self.progress(),
                }),
                markers: self.axis.to_vec(),
                ..ToolPreview::default()
            },
        }
    }

    fn has_pending_input(&self) -> bool {
        self.step != ReverseStep::Start
    }

    fn is_animating(&self) -> bool {
        self.step == ReverseStep::Animate
    }
}
