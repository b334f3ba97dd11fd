//! Schneiden-Tool: zwei Randpunkte einer geschlossenen Form wählen, dann
//! bestätigen (direkte Sehne) oder über das Zentrum schneiden.

use super::{Tool, ToolContext, ToolEvent, ToolKind, ToolOutput, ToolPreview};
use crate::app::actions::{is_valid_cut, ActionBatch, Cut};
use crate::app::selection::{KindConstraint, Selection, SelectionConstraints};
use crate::core::{PointId, PointType, ShapeId, ShapeKind, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutStep {
    Start,
    SelectSecondPoint,
    SelectThirdPoint,
    /// Schnitt wird geprüft und abgegeben
    Cut,
}

impl CutStep {
    pub fn as_str(self) -> &'static str {
        match self {
            CutStep::Start => "start",
            CutStep::SelectSecondPoint => "selectSecondPoint",
            CutStep::SelectThirdPoint => "selectThirdPoint",
            CutStep::Cut => "cut",
        }
    }
}

const BORDER_POINTS: [PointType; 2] = [PointType::Vertex, PointType::DivisionPoint];

/// Randpunkte aller schneidbaren (geschlossenen, regulären) Formen.
fn cuttable_points(world: &World, only: Option<ShapeId>) -> Vec<PointId> {
    world
        .shapes()
        .filter(|s| s.kind == ShapeKind::Regular)
        .filter(|s| only.map_or(true, |id| id == s.id))
        .filter(|s| world.shape_geometry(s.id).is_some_and(|g| g.is_closed()))
        .flat_map(|s| world.owned_point_ids(s.id))
        .filter(|id| {
            world
                .point(*id)
                .is_some_and(|p| BORDER_POINTS.contains(&p.point_type))
        })
        .collect()
}

pub struct CutTool {
    step: CutStep,
    shape_id: Option<ShapeId>,
    first: Option<PointId>,
    second: Option<PointId>,
}

impl CutTool {
    pub fn new() -> Self {
        Self {
            step: CutStep::Start,
            shape_id: None,
            first: None,
            second: None,
        }
    }

    pub fn current_step(&self) -> CutStep {
        self.step
    }

    fn reset(&mut self) {
        self.step = CutStep::Start;
        self.shape_id = None;
        self.first = None;
        self.second = None;
    }

    /// Prüft den Schnitt und gibt ihn ab; bei ungültiger Sehne kein Batch.
    fn cut(&mut self, world: &World, via_center: bool) -> ToolOutput {
        self.step = CutStep::Cut;
        let (Some(shape_id), Some(first), Some(second)) = (self.shape_id, self.first, self.second)
        else {
            self.reset();
            return ToolOutput::Ignored;
        };
        let valid = match (
            world.shape_geometry(shape_id),
            world.coordinates(first),
            world.coordinates(second),
        ) {
            (Some(geometry), Some(from), Some(to)) => {
                let via = via_center.then(|| geometry.center());
                is_valid_cut(&geometry, from, to, via)
            }
            _ => false,
        };
        self.reset();
        if !valid {
            log::warn!("Schnitt verlässt die Form {}, abgelehnt", shape_id);
            return ToolOutput::Rejected("Schnitt verlässt die Form".into());
        }
        ToolOutput::Commit(ActionBatch::single(Cut::new(
            shape_id, first, second, via_center,
        )))
    }
}

impl Default for CutTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for CutTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Cut
    }

    fn name(&self) -> &str {
        "Schneiden"
    }

    fn description(&self) -> &str {
        "Zerschneidet eine Form entlang einer Linie zwischen zwei Randpunkten"
    }

    fn step(&self) -> &'static str {
        self.step.as_str()
    }

    fn status_text(&self) -> &str {
        match self.step {
            CutStep::Start => "Ersten Randpunkt wählen",
            CutStep::SelectSecondPoint => "Zweiten Randpunkt wählen",
            CutStep::SelectThirdPoint => {
                "Zentrum wählen oder an beliebiger Stelle klicken für einen geraden Schnitt"
            }
            CutStep::Cut => "Schneide…",
        }
    }

    fn constraints(&self, world: &World) -> SelectionConstraints {
        match self.step {
            CutStep::Start => SelectionConstraints {
                points: KindConstraint::only(cuttable_points(world, None)),
                point_types: BORDER_POINTS.to_vec(),
                ..SelectionConstraints::none()
            },
            CutStep::SelectSecondPoint => SelectionConstraints {
                points: KindConstraint::only(cuttable_points(world, self.shape_id))
                    .except(self.first.into_iter().collect()),
                point_types: BORDER_POINTS.to_vec(),
                ..SelectionConstraints::none()
            },
            CutStep::SelectThirdPoint => {
                let center = self
                    .shape_id
                    .and_then(|id| world.shape(id))
                    .and_then(|s| s.center_id);
                SelectionConstraints {
                    points: KindConstraint::only(center.into_iter().collect()),
                    point_types: vec![PointType::ShapeCenter],
                    ..SelectionConstraints::none()
                }
            }
            CutStep::Cut => SelectionConstraints::none(),
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
            (
                CutStep::Start,
                ToolEvent::ObjectSelected {
                    selection: Selection::Point(point_id),
                    ..
                },
            ) => {
                let Some(shape_id) = ctx.world.point(*point_id).and_then(|p| p.shape_id) else {
                    return ToolOutput::Ignored;
                };
                self.shape_id = Some(shape_id);
                self.first = Some(*point_id);
                self.step = CutStep::SelectSecondPoint;
                ToolOutput::Continue
            }
            (
                CutStep::SelectSecondPoint,
                ToolEvent::ObjectSelected {
                    selection: Selection::Point(point_id),
                    ..
                },
            ) => {
                self.second = Some(*point_id);
                self.step = CutStep::SelectThirdPoint;
                ToolOutput::Continue
            }
            (
                CutStep::SelectThirdPoint,
                ToolEvent::ObjectSelected {
                    selection: Selection::Point(_),
                    ..
                },
            ) => self.cut(ctx.world, true),
            (CutStep::SelectThirdPoint, ToolEvent::PointerDown(_)) => self.cut(ctx.world, false),
            _ => ToolOutput::Ignored,
        }
    }

    fn end(&mut self) {
        self.reset();
    }

    fn preview(&self, world: &World) -> ToolPreview {
        let markers: Vec<_> = [self.first, self.second]
            .into_iter()
            .flatten()
            .filter_map(|id| world.coordinates(id))
            .collect();
        ToolPreview {
            highlighted: self.shape_id.into_iter().collect(),
            markers,
            ..ToolPreview::default()
        }
    }

    fn has_pending_input(&self) -> bool {
        self.step != CutStep::Start
    }
}
