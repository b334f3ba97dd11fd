//! Zusammenfügen-Tool: zwei Formen mit gemeinsamem Rand vereinen.

use super::{selected_shape, Tool, ToolContext, ToolEvent, ToolKind, ToolOutput, ToolPreview};
use crate::app::actions::{merged_outline, ActionBatch, Merge};
use crate::app::selection::{KindConstraint, SelectionConstraints};
use crate::core::{ShapeId, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStep {
    Start,
    SelectSecondShape,
}

impl MergeStep {
    pub fn as_str(self) -> &'static str {
        match self {
            MergeStep::Start => "start",
            MergeStep::SelectSecondShape => "selectSecondShape",
        }
    }
}

pub struct MergeTool {
    step: MergeStep,
    first: Option<ShapeId>,
}

impl MergeTool {
    pub fn new() -> Self {
        Self {
            step: MergeStep::Start,
            first: None,
        }
    }

    pub fn current_step(&self) -> MergeStep {
        self.step
    }

    fn reset(&mut self) {
        self.step = MergeStep::Start;
        self.first = None;
    }
}

impl Default for MergeTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for MergeTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Merge
    }

    fn name(&self) -> &str {
        "Zusammenfügen"
    }

    fn description(&self) -> &str {
        "Vereint zwei Formen mit gemeinsamem Rand"
    }

    fn step(&self) -> &'static str {
        self.step.as_str()
    }

    fn status_text(&self) -> &str {
        match self.step {
            MergeStep::Start => "Erste Form wählen",
            MergeStep::SelectSecondShape => "Angrenzende Form wählen",
        }
    }

    fn constraints(&self, _world: &World) -> SelectionConstraints {
        match (self.step, self.first) {
            (MergeStep::SelectSecondShape, Some(first)) => SelectionConstraints::none()
                .with_shapes(KindConstraint::any().except(vec![first])),
            _ => SelectionConstraints::shapes(),
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
            (MergeStep::Start, ToolEvent::ObjectSelected { selection, .. }) => {
                let Some(shape_id) = selected_shape(ctx.world, selection) else {
                    return ToolOutput::Ignored;
                };
                self.first = Some(shape_id);
                self.step = MergeStep::SelectSecondShape;
                ToolOutput::Continue
            }
            (MergeStep::SelectSecondShape, ToolEvent::ObjectSelected { selection, .. }) => {
                let (Some(first), Some(second)) = (self.first, selected_shape(ctx.world, selection))
                else {
                    return ToolOutput::Ignored;
                };
                let mergeable = match (
                    ctx.world.shape_geometry(first),
                    ctx.world.shape_geometry(second),
                ) {
                    (Some(a), Some(b)) => first != second && merged_outline(&a, &b).is_some(),
                    _ => false,
                };
                if !mergeable {
                    log::warn!("{} und {} haben keinen gemeinsamen Rand", first, second);
                    return ToolOutput::Rejected("Formen haben keinen gemeinsamen Rand".into());
                }
                self.reset();
                ToolOutput::Commit(ActionBatch::single(Merge::new(first, second)))
            }
            _ => ToolOutput::Ignored,
        }
    }

    fn end(&mut self) {
        self.reset();
    }

    fn preview(&self, _world: &World) -> ToolPreview {
        ToolPreview {
            highlighted: self.first.into_iter().collect(),
            ..ToolPreview::default()
        }
    }

    fn has_pending_input(&self) -> bool {
        self.step != MergeStep::Start
    }
}
