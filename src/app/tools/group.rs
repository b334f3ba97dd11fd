//! Gruppieren-Tool: Formen nacheinander wählen; die erste Wahl legt die
//! Gruppe fest, jede weitere wird hinzugefügt.
//!
//! Gehört eine gewählte Form bereits zu einer anderen Gruppe, wird diese
//! aufgelöst und ihre Formen kommen vollständig hinzu.

use super::{selected_shape, Tool, ToolContext, ToolEvent, ToolKind, ToolOutput, ToolPreview};
use crate::app::actions::{Action, ActionBatch, AddToGroup, CreateGroup, DeleteGroup};
use crate::app::selection::{KindConstraint, SelectionConstraints};
use crate::core::{GroupId, ShapeId, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStep {
    Start,
    SelectSecondShape,
    SelectOtherShapes,
}

impl GroupStep {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupStep::Start => "start",
            GroupStep::SelectSecondShape => "selectSecondShape",
            GroupStep::SelectOtherShapes => "selectOtherShapes",
        }
    }
}

pub struct GroupTool {
    step: GroupStep,
    /// Erste Form (solange noch keine Gruppe besteht)
    first: Option<ShapeId>,
    group_id: Option<GroupId>,
}

impl GroupTool {
    pub fn new() -> Self {
        Self {
            step: GroupStep::Start,
            first: None,
            group_id: None,
        }
    }

    pub fn current_step(&self) -> GroupStep {
        self.step
    }

    fn reset(&mut self) {
        self.step = GroupStep::Start;
        self.first = None;
        self.group_id = None;
    }

    /// Formen, die bereits zur entstehenden Gruppe gehören.
    fn members(&self, world: &World) -> Vec<ShapeId> {
        match self.group_id.and_then(|id| world.group(id)) {
            Some(group) => group.shape_ids.clone(),
            None => self.first.into_iter().collect(),
        }
    }

    /// Actions, um `picked` (samt eigener Gruppe) zur Gruppe hinzuzufügen.
    fn join(&mut self, world: &World, picked: ShapeId) -> ToolOutput {
        let mut actions: Vec<Action> = Vec::new();
        let incoming = match world.group_of(picked) {
            Some(other) if Some(other) == self.group_id => return ToolOutput::Ignored,
            Some(other) => {
                actions.push(DeleteGroup::new(other).into());
                world.group_members_or_self(picked)
            }
            None => vec![picked],
        };
        match (self.group_id, self.first) {
            (Some(group_id), _) => {
                actions.push(AddToGroup::new(group_id, incoming).into());
            }
            (None, Some(first)) => {
                let group_id = world.allocator().group();
                let mut shape_ids = vec![first];
                shape_ids.extend(incoming.into_iter().filter(|id| *id != first));
                actions.push(
                    CreateGroup {
                        shape_ids,
                        group_id: Some(group_id),
                    }
                    .into(),
                );
                self.group_id = Some(group_id);
                self.first = None;
            }
            (None, None) => return ToolOutput::Ignored,
        }
        self.step = GroupStep::SelectOtherShapes;
        ToolOutput::Commit(ActionBatch::new(actions))
    }
}

impl Default for GroupTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for GroupTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Group
    }

    fn name(&self) -> &str {
        "Gruppieren"
    }

    fn description(&self) -> &str {
        "Fasst Formen zu einer Gruppe zusammen"
    }

    fn step(&self) -> &'static str {
        self.step.as_str()
    }

    fn status_text(&self) -> &str {
        match self.step {
            GroupStep::Start => "Erste Form wählen",
            GroupStep::SelectSecondShape => "Zweite Form wählen",
            GroupStep::SelectOtherShapes => "Weitere Formen wählen",
        }
    }

    fn constraints(&self, world: &World) -> SelectionConstraints {
        match self.step {
            GroupStep::Start => SelectionConstraints::shapes(),
            _ => SelectionConstraints::none()
                .with_shapes(KindConstraint::any().except(self.members(world))),
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
            (GroupStep::Start, ToolEvent::ObjectSelected { selection, .. }) => {
                let Some(shape_id) = selected_shape(ctx.world, selection) else {
                    return ToolOutput::Ignored;
                };
                match ctx.world.group_of(shape_id) {
                    Some(group_id) => self.group_id = Some(group_id),
                    None => self.first = Some(shape_id),
                }
                self.step = GroupStep::SelectSecondShape;
                ToolOutput::Continue
            }
            (
                GroupStep::SelectSecondShape | GroupStep::SelectOtherShapes,
                ToolEvent::ObjectSelected { selection, .. },
            ) => {
                let Some(shape_id) = selected_shape(ctx.world, selection) else {
                    return ToolOutput::Ignored;
                };
                if self.first == Some(shape_id) {
                    return ToolOutput::Ignored;
                }
                self.join(ctx.world, shape_id)
            }
            _ => ToolOutput::Ignored,
        }
    }

    fn end(&mut self) {
        self.reset();
    }

    fn preview(&self, world: &World) -> ToolPreview {
        ToolPreview {
            highlighted: self.members(world),
            ..ToolPreview::default()
        }
    }

    fn has_pending_input(&self) -> bool {
        self.step == GroupStep::SelectSecondShape
    }
}
