//! Erstellen-Tool: setzt eine Vorlage aus dem geladenen Bausatz ab.

use super::{shifted_geometry, Tool, ToolContext, ToolEvent, ToolKind, ToolOutput, ToolPreview};
use crate::app::actions::{ActionBatch, CreateShape};
use crate::app::selection::SelectionConstraints;
use crate::core::{Coordinates, Shape, ShapeGeometry, World};
use crate::persistence::{ShapeData, ShapeKit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateStep {
    /// Bausatz noch nicht geladen, keine Beschränkungen installiert
    Loading,
    Listen,
    /// Vorlage hängt am Zeiger
    Move,
}

impl CreateStep {
    pub fn as_str(self) -> &'static str {
        match self {
            CreateStep::Loading => "loading",
            CreateStep::Listen => "listen",
            CreateStep::Move => "move",
        }
    }
}

/// Erstellen-Tool: Vorlage wählen, ablegen per Klick oder Ziehen.
pub struct CreateTool {
    step: CreateStep,
    kit: Option<ShapeKit>,
    template: Option<ShapeData>,
    /// Zentrum der Vorlage in ihren eigenen Koordinaten
    anchor: Coordinates,
    cursor: Coordinates,
}

impl CreateTool {
    pub fn new() -> Self {
        Self {
            step: CreateStep::Loading,
            kit: None,
            template: None,
            anchor: Coordinates::ZERO,
            cursor: Coordinates::ZERO,
        }
    }

    pub fn current_step(&self) -> CreateStep {
        self.step
    }

    fn choose(&mut self, name: &str) -> ToolOutput {
        let Some(template) = self.kit.as_ref().and_then(|k| k.template(name)) else {
            return ToolOutput::Rejected(format!("Vorlage '{name}' nicht im Bausatz"));
        };
        match template.geometry_from_path() {
            Ok(geometry) => {
                self.anchor = geometry.center();
                self.template = Some(template.clone());
                log::debug!("Vorlage gewählt: {}", name);
                ToolOutput::Continue
            }
            Err(e) => ToolOutput::Rejected(format!("Vorlage '{name}' fehlerhaft: {e}")),
        }
    }

    /// Vorlage mit den Standardfarben der Optionen, falls sie keine eigenen hat.
    fn template_with_defaults(&self, ctx: &ToolContext) -> Option<ShapeData> {
        let mut template = self.template.clone()?;
        let options = ctx.options;
        if template.fill_color.is_none() && options.default_fill_color != Shape::DEFAULT_FILL {
            template.fill_color = Some(options.default_fill_color);
        }
        if template.stroke_color.is_none() && options.default_stroke_color != Shape::DEFAULT_STROKE {
            template.stroke_color = Some(options.default_stroke_color);
        }
        if template.fill_opacity.is_none()
            && (options.default_fill_opacity - Shape::DEFAULT_OPACITY).abs() > f64::EPSILON
        {
            template.fill_opacity = Some(options.default_fill_opacity);
        }
        Some(template)
    }

    fn ghost(&self) -> Option<ShapeGeometry> {
        let geometry = self.template.as_ref()?.geometry_from_path().ok()?;
        Some(shifted_geometry(geometry, self.cursor - self.anchor))
    }
}

impl Default for CreateTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for CreateTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Create
    }

    fn name(&self) -> &str {
        "Erstellen"
    }

    fn description(&self) -> &str {
        "Legt eine Form aus dem Bausatz an"
    }

    fn step(&self) -> &'static str {
        self.step.as_str()
    }

    fn status_text(&self) -> &str {
        match self.step {
            CreateStep::Loading => "Bausatz wird geladen…",
            CreateStep::Listen if self.template.is_none() => "Vorlage wählen",
            CreateStep::Listen => "Klicken zum Ablegen",
            CreateStep::Move => "Loslassen zum Ablegen",
        }
    }

    fn constraints(&self, _world: &World) -> SelectionConstraints {
        SelectionConstraints::none()
    }

    fn start(&mut self, _ctx: &ToolContext) -> ToolOutput {
        self.step = if self.kit.is_some() {
            CreateStep::Listen
        } else {
            CreateStep::Loading
        };
        ToolOutput::Continue
    }

    fn handle(&mut self, event: &ToolEvent, ctx: &ToolContext) -> ToolOutput {
        match (self.step, event) {
            (_, ToolEvent::KitLoaded(kit)) => {
                let keep = self
                    .template
                    .as_ref()
                    .is_some_and(|t| kit.template(&t.name).is_some());
                if !keep {
                    self.template = None;
                }
                self.kit = Some(kit.clone());
                if self.step == CreateStep::Loading {
                    self.step = CreateStep::Listen;
                }
                log::info!("Bausatz '{}' mit {} Vorlagen bereit", kit.name, kit.shapes.len());
                ToolOutput::Continue
            }
            (CreateStep::Loading, _) => ToolOutput::Ignored,
            (_, ToolEvent::ChooseTemplate(name)) => self.choose(name),
            (_, ToolEvent::Restart) => {
                self.step = CreateStep::Listen;
                ToolOutput::Continue
            }
            (CreateStep::Listen, ToolEvent::PointerDown(at)) => {
                if self.template.is_none() {
                    return ToolOutput::Rejected("Keine Vorlage gewählt".into());
                }
                self.cursor = *at;
                self.step = CreateStep::Move;
                ToolOutput::Continue
            }
            (CreateStep::Listen, ToolEvent::PointerMove(at)) => {
                self.cursor = *at;
                ToolOutput::Ignored
            }
            (CreateStep::Move, ToolEvent::PointerMove(at)) => {
                self.cursor = *at;
                ToolOutput::Continue
            }
            (CreateStep::Move, ToolEvent::PointerUp(at)) => {
                self.cursor = *at;
                self.step = CreateStep::Listen;
                match self.template_with_defaults(ctx) {
                    Some(template) => ToolOutput::Commit(ActionBatch::single(CreateShape::new(
                        template,
                        *at - self.anchor,
                    ))),
                    None => ToolOutput::Rejected("Keine Vorlage gewählt".into()),
                }
            }
            _ => ToolOutput::Ignored,
        }
    }

    fn end(&mut self) {
        if self.step == CreateStep::Move {
            self.step = CreateStep::Listen;
        }
    }

    fn preview(&self, _world: &World) -> ToolPreview {
        if self.step != CreateStep::Move {
            return ToolPreview::default();
        }
        match self.ghost() {
            Some(geometry) => ToolPreview {
                paths: vec![geometry.svg_path(1.0)],
                markers: vec![self.cursor],
                ..ToolPreview::default()
            },
            None => ToolPreview::default(),
        }
    }

    fn has_pending_input(&self) -> bool {
        self.step == CreateStep::Move
    }
}
