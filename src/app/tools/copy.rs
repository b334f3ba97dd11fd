//! Kopieren-Tool: Form (samt Gruppe) greifen, ziehen, Kopie ablegen.
//!
//! Mehrere Formen werden als Kopie wieder gruppiert; Kopieren und
//! Gruppieren bilden einen gemeinsamen Batch.

use super::{
    selected_shape, shifted_geometry, Tool, ToolContext, ToolEvent, ToolKind, ToolOutput, ToolPreview,
};
use crate::app::actions::{Action, ActionBatch, CreateGroup, Duplicate};
use crate::app::selection::SelectionConstraints;
use crate::core::{Coordinates, ShapeId, World, COINCIDENCE_EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStep {
    Start,
    Drag,
}

impl CopyStep {
    pub fn as_str(self) -> &'static str {
        match self {
            CopyStep::Start => "start",
            CopyStep::Drag => "drag",
        }
    }
}

pub struct CopyTool {
    step: CopyStep,
    shape_ids: Vec<ShapeId>,
    grab: Coordinates,
    cursor: Coordinates,
}

impl CopyTool {
    pub fn new() -> Self {
        Self {
            step: CopyStep::Start,
            shape_ids: Vec::new(),
            grab: Coordinates::ZERO,
            cursor: Coordinates::ZERO,
        }
    }

    pub fn current_step(&self) -> CopyStep {
        self.step
    }

    fn reset(&mut self) {
        self.step = CopyStep::Start;
        self.shape_ids.clear();
    }

    /// Kopien mit vorab reservierten IDs, bei mehreren Formen neu gruppiert.
    fn batch(world: &World, shape_ids: Vec<ShapeId>, offset: Coordinates) -> ActionBatch {
        let mut ids = world.allocator();
        let new_ids: Vec<ShapeId> = shape_ids.iter().map(|_| ids.shape()).collect();
        let mut actions: Vec<Action> =
            vec![Duplicate::new(shape_ids, offset).with_new_ids(new_ids.clone()).into()];
        if new_ids.len() > 1 {
            actions.push(CreateGroup::new(new_ids).into());
        }
        ActionBatch::new(actions)
    }
}

impl Default for CopyTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for CopyTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Copy
    }

    fn name(&self) -> &str {
        "Kopieren"
    }

    fn description(&self) -> &str {
        "Kopiert eine Form (samt Gruppe) an die Zielposition"
    }

    fn step(&self) -> &'static str {
        self.step.as_str()
    }

    fn status_text(&self) -> &str {
        match self.step {
            CopyStep::Start => "Form wählen",
            CopyStep::Drag => "Kopie ziehen und loslassen",
        }
    }

    fn constraints(&self, _world: &World) -> SelectionConstraints {
        match self.step {
            CopyStep::Start => SelectionConstraints::shapes(),
            CopyStep::Drag => SelectionConstraints::none(),
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
            (CopyStep::Start, ToolEvent::ObjectSelected { selection, at }) => {
                let Some(shape_id) = selected_shape(ctx.world, selection) else {
                    return ToolOutput::Ignored;
                };
                self.shape_ids = ctx.world.group_members_or_self(shape_id);
                self.grab = *at;
                self.cursor = *at;
                self.step = CopyStep::Drag;
                ToolOutput::Continue
            }
            (CopyStep::Drag, ToolEvent::PointerMove(at)) => {
                self.cursor = *at;
                ToolOutput::Continue
            }
            (CopyStep::Drag, ToolEvent::PointerUp(at)) => {
                self.cursor = *at;
                let mut offset = self.cursor - self.grab;
                if offset.length() < COINCIDENCE_EPSILON {
                    let d = ctx.options.copy_offset;
                    offset = Coordinates::new(d, d);
                }
                let shape_ids = std::mem::take(&mut self.shape_ids);
                self.reset();
                ToolOutput::Commit(Self::batch(ctx.world, shape_ids, offset))
            }
            _ => ToolOutput::Ignored,
        }
    }

    fn end(&mut self) {
        self.reset();
    }

    fn preview(&self, world: &World) -> ToolPreview {
        if self.step != CopyStep::Drag {
            return ToolPreview::default();
        }
        let offset = self.cursor - self.grab;
        let paths = self
            .shape_ids
            .iter()
            .filter_map(|id| world.shape_geometry(*id))
            .map(|geometry| shifted_geometry(geometry, offset).svg_path(1.0))
            .collect();
        ToolPreview {
            paths,
            highlighted: self.shape_ids.clone(),
            ..ToolPreview::default()
        }
    }

    fn has_pending_input(&self) -> bool {
        self.step == CopyStep::Drag
    }
}
