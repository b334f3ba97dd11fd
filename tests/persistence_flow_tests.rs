use figure_workbench::app::actions::{CreateGroup, CreateShape, Translate};
use figure_workbench::persistence::{load_scene_json, save_scene_json};
use figure_workbench::{
    ActionBatch, AppController, AppIntent, AppState, Coordinates, ShapeData, ShapeId, ShapeKind,
    WorkbenchOptions,
};
use std::path::PathBuf;

const SQUARE: &str = "M 0 0 L 10 0 L 10 10 L 0 10 Z";

fn temp_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("figure-workbench-{}-{}", std::process::id(), name))
}

fn run(state: &mut AppState, batch: ActionBatch) {
    state
        .history
        .execute(&mut state.world, batch)
        .expect("Batch ausführbar");
}

fn add_square(state: &mut AppState, offset: Coordinates) -> ShapeId {
    run(
        state,
        ActionBatch::single(CreateShape::new(
            ShapeData::template(ShapeKind::Regular, SQUARE),
            offset,
        )),
    );
    *state.world.shape_ids().last().expect("Form vorhanden")
}

#[test]
fn test_scene_file_round_trip_through_controller() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    let a = add_square(&mut state, Coordinates::ZERO);
    let b = add_square(&mut state, Coordinates::new(20.0, 0.0));
    run(&mut state, ActionBatch::single(CreateGroup::new(vec![a, b])));
    let before = state.world.to_scene();
    let path = temp_file("scene.json");

    controller
        .handle_intent(
            &mut state,
            AppIntent::SceneSavePathSelected { path: path.clone() },
        )
        .expect("Speichern");
    controller
        .handle_intent(&mut state, AppIntent::NewSceneRequested)
        .expect("Neue Szene");
    assert_eq!(state.world.shape_count(), 0);
    assert!(!state.can_undo());

    controller
        .handle_intent(
            &mut state,
            AppIntent::SceneFileSelected { path: path.clone() },
        )
        .expect("Laden");

    assert_eq!(state.world.to_scene(), before);
    assert_eq!(state.files.current_scene_path.as_deref(), Some(path.as_path()));
    assert!(state
        .files
        .last_load_report
        .as_ref()
        .is_some_and(|r| r.is_clean()));
    // Geladene Szene ist der neue Anfangszustand
    assert_eq!(state.history.len(), 0);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_workspace_keeps_history_and_cursor() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    let id = add_square(&mut state, Coordinates::ZERO);
    run(
        &mut state,
        ActionBatch::single(Translate::new(vec![id], Coordinates::new(5.0, 0.0))),
    );
    controller
        .handle_intent(&mut state, AppIntent::UndoRequested)
        .expect("Undo");
    let path = temp_file("workspace.json");

    controller
        .handle_intent(
            &mut state,
            AppIntent::WorkspaceSavePathSelected { path: path.clone() },
        )
        .expect("Speichern");
    let mut restored = AppState::new();
    controller
        .handle_intent(
            &mut restored,
            AppIntent::WorkspaceFileSelected { path: path.clone() },
        )
        .expect("Laden");

    assert_eq!(restored.history.len(), 2);
    assert_eq!(restored.history.cursor(), 1);
    assert_eq!(restored.world.to_scene(), state.world.to_scene());

    controller
        .handle_intent(&mut restored, AppIntent::RedoRequested)
        .expect("Redo");
    controller
        .handle_intent(&mut state, AppIntent::RedoRequested)
        .expect("Redo");
    assert_eq!(restored.world.to_scene(), state.world.to_scene());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_unresolved_group_member_is_reported_not_fatal() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    let path = temp_file("broken.json");
    std::fs::write(
        &path,
        r#"{
            "shapes": [{ "id": 1, "path": "M 0 0 L 10 0 L 10 10 Z" }],
            "groups": [{ "id": 50, "shapeIds": [1, 99] }]
        }"#,
    )
    .expect("Datei schreibbar");

    controller
        .handle_intent(&mut state, AppIntent::SceneFileSelected { path: path.clone() })
        .expect("Laden trotz Problemen");

    assert_eq!(state.world.shape_count(), 1);
    let report = state.files.last_load_report.as_ref().expect("Bericht");
    assert!(!report.is_clean());
    assert!(state.status_message.is_some());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_missing_scene_file_is_an_error() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    add_square(&mut state, Coordinates::ZERO);

    let result = controller.handle_intent(
        &mut state,
        AppIntent::SceneFileSelected {
            path: temp_file("does-not-exist.json"),
        },
    );

    assert!(result.is_err());
    assert_eq!(state.world.shape_count(), 1);
}

#[test]
fn test_default_attributes_are_not_serialized() {
    let mut state = AppState::new();
    add_square(&mut state, Coordinates::ZERO);

    let json = save_scene_json(&state.world).expect("serialisierbar");

    assert!(!json.contains("fillColor"));
    assert!(!json.contains("isReversed"));
    let (world, report) = load_scene_json(&json).expect("lesbar");
    assert!(report.is_clean());
    assert_eq!(world.to_scene(), state.world.to_scene());
}

#[test]
fn test_options_change_applies_history_depth() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    for i in 0..4 {
        add_square(&mut state, Coordinates::new(20.0 * f64::from(i), 0.0));
    }
    let options = WorkbenchOptions {
        history_max_depth: 2,
        ..WorkbenchOptions::default()
    };

    controller
        .handle_intent(
            &mut state,
            AppIntent::OptionsChanged {
                options: Box::new(options),
            },
        )
        .expect("Optionen übernehmen");

    assert_eq!(state.options.history_max_depth, 2);
    assert_eq!(state.history.len(), 2);
    assert_eq!(state.world.shape_count(), 4);
    let replayed = state.history.replay(2).expect("abspielbar");
    assert_eq!(replayed.to_scene(), state.world.to_scene());
}
