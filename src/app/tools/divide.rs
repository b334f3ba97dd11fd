//! Teilen-Tool: ein Segment ganz oder zwischen zwei seiner Punkte in gleiche
//! Teile zerlegen.

use super::{Tool, ToolContext, ToolEvent, ToolKind, ToolOutput, ToolPreview};
use crate::app::actions::{ActionBatch, DivideSegment};
use crate::app::selection::{KindConstraint, Selection, SelectionConstraints};
use crate::core::{PointId, PointType, Segment, SegmentId, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivideStep {
    Start,
    SelectSecondPoint,
}

impl DivideStep {
    pub fn as_str(self) -> &'static str {
        match self {
            DivideStep::Start => "start",
            DivideStep::SelectSecondPoint => "selectSecondPoint",
        }
    }
}

const DIVIDABLE_POINTS: [PointType; 2] = [PointType::Vertex, PointType::DivisionPoint];

/// Punkte eines Segments, zwischen denen geteilt werden darf.
fn dividable_points(segment: &Segment) -> impl Iterator<Item = PointId> + '_ {
    let center = segment.arc_center_id;
    segment
        .point_ids()
        .into_iter()
        .filter(move |id| Some(*id) != center)
}

/// Endliches Segment, das beide Punkte trägt.
fn common_segment(world: &World, a: PointId, b: PointId) -> Option<SegmentId> {
    world
        .segments()
        .filter(|s| !s.is_infinite && !s.is_semi_infinite)
        .find(|s| {
            let ids: Vec<PointId> = dividable_points(s).collect();
            ids.contains(&a) && ids.contains(&b)
        })
        .map(|s| s.id)
}

pub struct DivideTool {
    step: DivideStep,
    first: Option<PointId>,
}

impl DivideTool {
    pub fn new() -> Self {
        Self {
            step: DivideStep::Start,
            first: None,
        }
    }

    pub fn current_step(&self) -> DivideStep {
        self.step
    }

    fn reset(&mut self) {
        self.step = DivideStep::Start;
        self.first = None;
    }
}

impl Default for DivideTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for DivideTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Divide
    }

    fn name(&self) -> &str {
        "Teilen"
    }

    fn description(&self) -> &str {
        "Teilt ein Segment in gleich lange Stücke"
    }

    fn step(&self) -> &'static str {
        self.step.as_str()
    }

    fn status_text(&self) -> &str {
        match self.step {
            DivideStep::Start => "Segment oder ersten Punkt wählen",
            DivideStep::SelectSecondPoint => "Zweiten Punkt auf demselben Segment wählen",
        }
    }

    fn constraints(&self, world: &World) -> SelectionConstraints {
        match (self.step, self.first) {
            (DivideStep::SelectSecondPoint, Some(first)) => {
                let mut candidates: Vec<PointId> = Vec::new();
                for segment in world.segments().filter(|s| !s.is_infinite && !s.is_semi_infinite) {
                    let ids: Vec<PointId> = dividable_points(segment).collect();
                    if ids.contains(&first) {
                        candidates.extend(ids.into_iter().filter(|id| *id != first));
                    }
                }
                SelectionConstraints {
                    points: KindConstraint::only(candidates),
                    point_types: DIVIDABLE_POINTS.to_vec(),
                    ..SelectionConstraints::none()
                }
            }
            _ => {
                let unbounded: Vec<SegmentId> = world
                    .segments()
                    .filter(|s| s.is_infinite || s.is_semi_infinite)
                    .map(|s| s.id)
                    .collect();
                SelectionConstraints::points(DIVIDABLE_POINTS.to_vec())
                    .with_segments(KindConstraint::any().except(unbounded))
            }
        }
    }

    fn start(&mut self, _ctx: &ToolContext) -> ToolOutput {
        self.reset();
        ToolOutput::Continue
    }

    fn handle(&mut self, event: &ToolEvent, ctx: &ToolContext) -> ToolOutput {
        let parts = ctx.options.effective_divide_parts();
        match (self.step, event) {
            (_, ToolEvent::Restart) => {
                self.reset();
                ToolOutput::Continue
            }
            (
                DivideStep::Start,
                ToolEvent::ObjectSelected {
                    selection: Selection::Segment(segment_id),
                    ..
                },
            ) => ToolOutput::Commit(ActionBatch::single(DivideSegment::whole(*segment_id, parts))),
            (
                DivideStep::Start,
                ToolEvent::ObjectSelected {
                    selection: Selection::Point(point_id),
                    ..
                },
            ) => {
                self.first = Some(*point_id);
                self.step = DivideStep::SelectSecondPoint;
                ToolOutput::Continue
            }
            (
                DivideStep::SelectSecondPoint,
                ToolEvent::ObjectSelected {
                    selection: Selection::Point(second),
                    ..
                },
            ) => {
                let Some(first) = self.first else {
                    self.reset();
                    return ToolOutput::Ignored;
                };
                let Some(segment_id) = common_segment(ctx.world, first, *second) else {
                    return ToolOutput::Rejected("Punkte liegen nicht auf einem Segment".into());
                };
                self.reset();
                ToolOutput::Commit(ActionBatch::single(DivideSegment::between(
                    segment_id, parts, first, *second,
                )))
            }
            _ => ToolOutput::Ignored,
        }
    }

    fn end(&mut self) {
        self.reset();
    }

    fn preview(&self, world: &World) -> ToolPreview {
        match self.first.and_then(|id| world.coordinates(id)) {
            Some(first) => ToolPreview {
                markers: vec![first],
                ..ToolPreview::default()
            },
            None => ToolPreview::default(),
        }
    }

    fn has_pending_input(&self) -> bool {
        self.step != DivideStep::Start
    }
}
