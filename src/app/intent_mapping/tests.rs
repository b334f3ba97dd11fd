use crate::app::state::PinchAnchor;
use crate::app::{AppCommand, AppIntent, AppState};
use crate::core::Coordinates;

use super::map_intent_to_commands;

#[test]
fn pointer_down_carries_configured_pick_radius() {
    let mut state = AppState::new();
    state.options.selection_pick_radius = 12.5;

    let commands = map_intent_to_commands(
        &state,
        AppIntent::PointerDown {
            at: Coordinates::new(1.0, 2.0),
        },
    );

    assert_eq!(commands.len(), 1);
    assert!(matches!(
        commands[0],
        AppCommand::ToolPointerDown { pick_radius, .. } if pick_radius == 12.5
    ));
}

#[test]
fn animation_frame_without_animation_maps_to_nothing() {
    let state = AppState::new();

    let commands = map_intent_to_commands(&state, AppIntent::AnimationFrame { dt: 0.016 });

    assert!(commands.is_empty());
}

#[test]
fn second_finger_pauses_tool_and_starts_pinch() {
    let state = AppState::new();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::TouchStart {
            touches: vec![Coordinates::new(0.0, 0.0), Coordinates::new(10.0, 0.0)],
        },
    );

    assert_eq!(commands.len(), 2);
    assert!(matches!(commands[0], AppCommand::PauseTool));
    assert!(matches!(commands[1], AppCommand::BeginPinch { .. }));
}

#[test]
fn lifting_finger_during_pinch_resumes_tool() {
    let mut state = AppState::new();
    state.view.pinch = Some(PinchAnchor {
        midpoint: Coordinates::new(5.0, 0.0),
        distance: 10.0,
    });

    let commands = map_intent_to_commands(
        &state,
        AppIntent::TouchEnd {
            touches: vec![Coordinates::new(0.0, 0.0)],
        },
    );

    assert_eq!(commands.len(), 2);
    assert!(matches!(commands[0], AppCommand::EndPinch));
    assert!(matches!(commands[1], AppCommand::ResumeTool));
}

#[test]
fn single_touch_acts_as_pointer() {
    let state = AppState::new();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::TouchMove {
            touches: vec![Coordinates::new(3.0, 4.0)],
        },
    );

    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], AppCommand::ToolPointerMove { .. }));
}
