//! Ein-Klick-Werkzeuge: ein Objekt wählen, sofort eine Action abgeben.

use super::{selected_shape, Tool, ToolContext, ToolEvent, ToolKind, ToolOutput};
use crate::app::actions::{
    ActionBatch, ChangeColor, ChangeOrder, DeleteGroup, DeleteShapes, OrderTarget,
    RemoveDivisionPoint, ToggleCenter,
};
use crate::app::selection::{KindConstraint, Selection, SelectionConstraints};
use crate::core::{Color, PointType, ShapeId, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickMode {
    /// Form samt Gruppe löschen, oder einen Teilungspunkt entfernen
    Delete,
    Ungroup,
    Color,
    ToggleCenter,
    ToFront,
    ToBack,
}

impl PickMode {
    pub const ALL: [PickMode; 6] = [
        PickMode::Delete,
        PickMode::Ungroup,
        PickMode::Color,
        PickMode::ToggleCenter,
        PickMode::ToFront,
        PickMode::ToBack,
    ];
}

pub struct PickTool {
    mode: PickMode,
    color: Option<Color>,
}

impl PickTool {
    pub fn new(mode: PickMode) -> Self {
        Self { mode, color: None }
    }

    pub fn mode(&self) -> PickMode {
        self.mode
    }

    fn batch_for_shape(&self, ctx: &ToolContext, shape_id: ShapeId) -> ToolOutput {
        let world = ctx.world;
        let members = world.group_members_or_self(shape_id);
        let batch = match self.mode {
            PickMode::Delete => ActionBatch::single(DeleteShapes::new(members)),
            PickMode::Ungroup => match world.group_of(shape_id) {
                Some(group_id) => ActionBatch::single(DeleteGroup::new(group_id)),
                None => return ToolOutput::Rejected("Form gehört zu keiner Gruppe".into()),
            },
            PickMode::Color => {
                let color = self.color.unwrap_or(ctx.options.default_fill_color);
                ActionBatch::single(ChangeColor::fill(members, color))
            }
            PickMode::ToggleCenter => ActionBatch::single(ToggleCenter::new(vec![shape_id])),
            PickMode::ToFront => ActionBatch::single(ChangeOrder::new(members, OrderTarget::Front)),
            PickMode::ToBack => ActionBatch::single(ChangeOrder::new(members, OrderTarget::Back)),
        };
        ToolOutput::Commit(batch)
    }
}

impl Tool for PickTool {
    fn kind(&self) -> ToolKind {
        match self.mode {
            PickMode::Delete => ToolKind::Delete,
            PickMode::Ungroup => ToolKind::Ungroup,
            PickMode::Color => ToolKind::Color,
            PickMode::ToggleCenter => ToolKind::ToggleCenter,
            PickMode::ToFront => ToolKind::ToFront,
            PickMode::ToBack => ToolKind::ToBack,
        }
    }

    fn name(&self) -> &str {
        match self.mode {
            PickMode::Delete => "Löschen",
            PickMode::Ungroup => "Gruppe lösen",
            PickMode::Color => "Färben",
            PickMode::ToggleCenter => "Zentrum zeigen",
            PickMode::ToFront => "Nach vorne",
            PickMode::ToBack => "Nach hinten",
        }
    }

    fn description(&self) -> &str {
        match self.mode {
            PickMode::Delete => "Löscht eine Form samt Gruppe oder einen Teilungspunkt",
            PickMode::Ungroup => "Löst die Gruppe einer Form auf",
            PickMode::Color => "Färbt eine Form (samt Gruppe) ein",
            PickMode::ToggleCenter => "Blendet das Zentrum einer Form ein oder aus",
            PickMode::ToFront => "Zeichnet eine Form zuoberst",
            PickMode::ToBack => "Zeichnet eine Form zuunterst",
        }
    }

    fn step(&self) -> &'static str {
        "start"
    }

    fn status_text(&self) -> &str {
        match self.mode {
            PickMode::Delete => "Form oder Teilungspunkt wählen",
            PickMode::Ungroup => "Gruppierte Form wählen",
            _ => "Form wählen",
        }
    }

    fn constraints(&self, world: &World) -> SelectionConstraints {
        match self.mode {
            PickMode::Delete => SelectionConstraints::points(vec![PointType::DivisionPoint])
                .with_shapes(KindConstraint::any()),
            PickMode::Ungroup => {
                let grouped: Vec<ShapeId> = world
                    .groups()
                    .flat_map(|g| g.shape_ids.iter().copied())
                    .collect();
                SelectionConstraints::none().with_shapes(KindConstraint::only(grouped))
            }
            _ => SelectionConstraints::shapes(),
        }
    }

    fn start(&mut self, _ctx: &ToolContext) -> ToolOutput {
        ToolOutput::Continue
    }

    fn handle(&mut self, event: &ToolEvent, ctx: &ToolContext) -> ToolOutput {
        match event {
            ToolEvent::SetColor(color) if self.mode == PickMode::Color => {
                self.color = Some(*color);
                ToolOutput::Continue
            }
            ToolEvent::ObjectSelected {
                selection: Selection::Point(point_id),
                ..
            } if self.mode == PickMode::Delete => {
                let is_division = ctx
                    .world
                    .point(*point_id)
                    .is_some_and(|p| p.point_type == PointType::DivisionPoint);
                if !is_division {
                    return ToolOutput::Ignored;
                }
                ToolOutput::Commit(ActionBatch::single(RemoveDivisionPoint::new(*point_id)))
            }
            ToolEvent::ObjectSelected { selection, .. } => {
                match selected_shape(ctx.world, selection) {
                    Some(shape_id) => self.batch_for_shape(ctx, shape_id),
                    None => ToolOutput::Ignored,
                }
            }
            _ => ToolOutput::Ignored,
        }
    }

    fn end(&mut self) {}
}
