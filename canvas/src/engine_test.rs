#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::input::{Button, InputState, PointerId, WheelDelta};
use crate::surface::RecordingSurface;

// =============================================================
// Helpers
// =============================================================

fn three_floor_map() -> MapDescription {
    serde_json::from_value(json!({
        "floors": {
            "1": { "name": "Ground", "rooms": [{ "id": "101", "name": "Lobby", "x": 3, "y": 2 }] },
            "2": { "name": "First", "rooms": [{ "id": "201", "name": "Office", "x": 4, "y": 6 }] },
            "3": { "name": "Second", "rooms": [] }
        },
        "vertical_connections": [
            { "id": "stair_1_2_0", "type": "stair", "start_floor": 1, "end_floor": 2, "start_pos": { "x": 0, "y": 0 } }
        ]
    }))
    .unwrap()
}

fn inputs() -> SceneInputs {
    SceneInputs { map: three_floor_map(), current_floor: 1, ..SceneInputs::default() }
}

fn ready_core() -> EngineCore {
    let mut core = EngineCore::create(inputs(), RendererConfig::default());
    core.mark_surface_ready(800.0, 600.0, 1.0);
    core
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

const MOUSE: PointerId = 1;
const FINGER_A: PointerId = 7;
const FINGER_B: PointerId = 8;

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn create_builds_scene_but_waits_for_surface() {
    let core = EngineCore::create(inputs(), RendererConfig::default());
    assert_eq!(core.lifecycle(), Lifecycle::Pending);
    assert!(!core.objects().is_empty());

    let mut surface = RecordingSurface::new();
    assert!(!core.paint(&mut surface).unwrap());
    assert!(surface.calls.is_empty());
}

#[test]
fn surface_ready_enables_paint() {
    let mut core = EngineCore::create(inputs(), RendererConfig::default());
    assert_eq!(core.mark_surface_ready(640.0, 480.0, 2.0), vec![Action::RenderNeeded]);
    assert_eq!(core.viewport, Viewport { width: 640.0, height: 480.0, dpr: 2.0 });

    let mut surface = RecordingSurface::new();
    assert!(core.paint(&mut surface).unwrap());
    assert!(surface.has_transform());
    assert_eq!(surface.depth(), 0);
}

#[test]
fn missing_current_floor_resolves_to_lowest() {
    let core = EngineCore::create(
        SceneInputs { current_floor: 7, ..inputs() },
        RendererConfig::default(),
    );
    assert_eq!(core.current_floor(), 1);
}

#[test]
fn empty_map_paints_placeholder() {
    let mut core = EngineCore::create(SceneInputs::default(), RendererConfig::default());
    core.mark_surface_ready(300.0, 200.0, 1.0);
    let mut surface = RecordingSurface::new();
    assert!(core.paint(&mut surface).unwrap());
    assert!(!surface.has_transform());
    assert!(surface.texts().contains(&render::PLACEHOLDER_TEXT));
}

#[test]
fn inputs_changed_rebuilds_scene() {
    let mut core = ready_core();
    let before = core.objects().len();
    let actions = core.on_inputs_changed(SceneInputs {
        path: vec![PathPoint::new(1.0, 1.0, 1), PathPoint::new(2.0, 1.0, 1)],
        ..inputs()
    });
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_eq!(core.objects().len(), before + 2);
}

#[test]
fn destroy_stops_everything() {
    let mut core = ready_core();
    core.start_auto_rotate(0.0);
    assert_eq!(core.destroy(), vec![Action::AutoRotateStopped]);
    assert_eq!(core.lifecycle(), Lifecycle::Destroyed);
    assert!(!core.is_auto_rotating());

    let mut surface = RecordingSurface::new();
    assert!(!core.paint(&mut surface).unwrap());
    assert!(core.on_wheel(WheelDelta { dy: 10.0 }).is_empty());
    assert!(core.on_inputs_changed(inputs()).is_empty());
    assert!(core.mark_surface_ready(1.0, 1.0, 1.0).is_empty());
}

#[test]
fn destroy_without_rotation_reports_nothing() {
    let mut core = ready_core();
    assert!(core.destroy().is_empty());
}

// =============================================================
// Gestures
// =============================================================

#[test]
fn drag_rotates_and_tilts_camera() {
    let mut core = ready_core();
    let start = core.camera;
    core.on_pointer_down(MOUSE, pt(100.0, 100.0), Button::Primary);
    assert_eq!(core.on_pointer_move(MOUSE, pt(150.0, 80.0)), vec![Action::RenderNeeded]);
    assert!(core.camera.angle > start.angle);
    assert!(core.camera.height > start.height);
    core.on_pointer_up(MOUSE, pt(150.0, 80.0));
    assert!(core.input.is_idle());
}

#[test]
fn drag_there_and_back_restores_camera() {
    let mut core = ready_core();
    let start = core.camera;
    core.on_pointer_down(MOUSE, pt(0.0, 0.0), Button::Primary);
    core.on_pointer_move(MOUSE, pt(40.0, 20.0));
    core.on_pointer_move(MOUSE, pt(0.0, 0.0));
    core.on_pointer_up(MOUSE, pt(0.0, 0.0));
    assert!((core.camera.angle - start.angle).abs() < 1e-9);
    assert!((core.camera.height - start.height).abs() < 1e-9);
}

#[test]
fn move_without_contact_does_nothing() {
    let mut core = ready_core();
    let start = core.camera;
    assert!(core.on_pointer_move(MOUSE, pt(50.0, 50.0)).is_empty());
    assert_eq!(core.camera, start);
}

#[test]
fn secondary_button_does_not_rotate() {
    let mut core = ready_core();
    assert!(core.on_pointer_down(MOUSE, pt(0.0, 0.0), Button::Secondary).is_empty());
    assert!(core.input.is_idle());
}

#[test]
fn second_contact_keeps_first_gesture() {
    let mut core = ready_core();
    core.on_pointer_down(FINGER_A, pt(10.0, 10.0), Button::Primary);
    core.on_pointer_down(FINGER_B, pt(90.0, 90.0), Button::Primary);
    assert_eq!(core.input, InputState::Rotating { pointer_id: FINGER_A, last_screen: pt(10.0, 10.0) });
}

#[test]
fn second_finger_neither_moves_nor_ends_the_drag() {
    let mut core = ready_core();
    core.on_pointer_down(FINGER_A, pt(100.0, 100.0), Button::Primary);
    core.on_pointer_down(FINGER_B, pt(400.0, 100.0), Button::Primary);
    let start = core.camera;

    assert!(core.on_pointer_move(FINGER_B, pt(401.0, 100.0)).is_empty());
    assert_eq!(core.camera, start);

    assert_eq!(core.on_pointer_move(FINGER_A, pt(101.0, 100.0)), vec![Action::RenderNeeded]);
    let one_px = core.camera.angle - start.angle;
    assert!(one_px > 0.0 && one_px < 0.1);

    core.on_pointer_up(FINGER_B, pt(401.0, 100.0));
    assert!(core.input.is_tracking(FINGER_A));

    let before = core.camera.angle;
    assert_eq!(core.on_pointer_move(FINGER_A, pt(150.0, 100.0)), vec![Action::RenderNeeded]);
    assert!(core.camera.angle > before);

    core.on_pointer_up(FINGER_A, pt(150.0, 100.0));
    assert!(core.input.is_idle());
}

#[test]
fn first_contact_retires_hint() {
    let mut core = ready_core();
    assert!(core.show_hint());
    assert_eq!(core.on_pointer_down(MOUSE, pt(0.0, 0.0), Button::Primary), vec![Action::RenderNeeded]);
    assert!(!core.show_hint());
    core.on_pointer_up(MOUSE, pt(0.0, 0.0));
    assert!(core.on_pointer_down(MOUSE, pt(0.0, 0.0), Button::Primary).is_empty());
    assert!(!core.show_hint());
}

#[test]
fn hint_disabled_by_config() {
    let config = RendererConfig { show_hint: false, ..RendererConfig::default() };
    let core = EngineCore::create(inputs(), config);
    assert!(!core.show_hint());
    assert!(!core.frame_params().show_hint);
}

#[test]
fn wheel_adjusts_height_while_rotating() {
    let mut core = ready_core();
    core.on_pointer_down(MOUSE, pt(0.0, 0.0), Button::Primary);
    let before = core.camera.height;
    assert_eq!(core.on_wheel(WheelDelta { dy: 100.0 }), vec![Action::RenderNeeded]);
    assert!((core.camera.height - (before + 1.0)).abs() < 1e-9);
}

#[test]
fn wheel_height_is_clamped() {
    let mut core = ready_core();
    core.on_wheel(WheelDelta { dy: 1.0e6 });
    assert_eq!(core.camera.height, crate::consts::HEIGHT_MAX);
    core.on_wheel(WheelDelta { dy: -1.0e6 });
    assert_eq!(core.camera.height, crate::consts::HEIGHT_MIN);
}

// =============================================================
// Commands
// =============================================================

#[test]
fn preset_after_gestures_restores_reset_view() {
    let mut core = ready_core();
    core.on_pointer_down(MOUSE, pt(0.0, 0.0), Button::Primary);
    core.on_pointer_move(MOUSE, pt(300.0, -120.0));
    core.on_pointer_up(MOUSE, pt(300.0, -120.0));
    assert_eq!(core.apply_preset(Preset::Reset), vec![Action::RenderNeeded]);
    assert_eq!(core.camera, Camera::default());
}

#[test]
fn select_floor_refocuses_and_notifies() {
    let mut core = ready_core();
    let before = core.camera.height;
    let actions = core.select_floor(3);
    assert_eq!(actions, vec![Action::RenderNeeded, Action::FloorChanged(3)]);
    assert_eq!(core.current_floor(), 3);
    let target = crate::camera::refocus_target(3);
    assert!((core.camera.height - (before + (target - before) * 0.5)).abs() < 1e-9);

    let current: Vec<FloorId> = core
        .objects()
        .iter()
        .filter_map(|o| match o.kind {
            scene::ObjectKind::Floor { current: true, .. } => Some(o.floor_id),
            _ => None,
        })
        .collect();
    assert_eq!(current, vec![3]);
}

#[test]
fn select_unknown_floor_is_ignored() {
    let mut core = ready_core();
    assert!(core.select_floor(9).is_empty());
    assert_eq!(core.current_floor(), 1);
}

#[test]
fn set_toggles_rebuilds_without_connections() {
    let mut core = ready_core();
    let has_connection = |core: &EngineCore| core.objects().iter().any(|o| o.kind_name() == "connection");
    assert!(has_connection(&core));
    let toggles = Toggles { show_connections: false, ..Toggles::default() };
    assert_eq!(core.set_toggles(toggles), vec![Action::RenderNeeded]);
    assert!(!has_connection(&core));
    assert!(!core.frame_params().show_connections);
}

#[test]
fn floor_descriptors_list_all_floors() {
    let core = ready_core();
    let names: Vec<String> = core.floor_descriptors().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["Ground", "First", "Second"]);
}

// =============================================================
// Auto-rotate
// =============================================================

#[test]
fn auto_rotate_advances_angle_per_tick() {
    let mut core = ready_core();
    let start = core.camera.angle;
    core.start_auto_rotate(0.0);
    assert_eq!(core.on_auto_rotate_tick(100.0), vec![Action::RenderNeeded]);
    assert_eq!(core.on_auto_rotate_tick(200.0), vec![Action::RenderNeeded]);
    assert!((core.camera.angle - (start + 0.1)).abs() < 1e-9);
}

#[test]
fn auto_rotate_is_suppressed_while_rotating() {
    let mut core = ready_core();
    core.start_auto_rotate(0.0);
    core.on_pointer_down(MOUSE, pt(0.0, 0.0), Button::Primary);
    let angle = core.camera.angle;
    for tick in 1..=5 {
        assert!(core.on_auto_rotate_tick(f64::from(tick) * 100.0).is_empty());
    }
    assert_eq!(core.camera.angle, angle);

    core.on_pointer_up(MOUSE, pt(0.0, 0.0));
    assert_eq!(core.on_auto_rotate_tick(600.0), vec![Action::RenderNeeded]);
    assert!(core.camera.angle > angle);
}

#[test]
fn auto_rotate_expires_after_duration() {
    let mut core = ready_core();
    core.start_auto_rotate(1_000.0);
    assert_eq!(core.on_auto_rotate_tick(10_900.0), vec![Action::RenderNeeded]);
    assert_eq!(core.on_auto_rotate_tick(11_000.0), vec![Action::AutoRotateStopped]);
    assert!(!core.is_auto_rotating());
    assert!(core.on_auto_rotate_tick(11_100.0).is_empty());
}

#[test]
fn stop_auto_rotate_cancels_once() {
    let mut core = ready_core();
    core.start_auto_rotate(0.0);
    assert_eq!(core.stop_auto_rotate(), vec![Action::AutoRotateStopped]);
    assert!(core.stop_auto_rotate().is_empty());
    let angle = core.camera.angle;
    assert!(core.on_auto_rotate_tick(100.0).is_empty());
    assert_eq!(core.camera.angle, angle);
}

#[test]
fn auto_rotate_uses_configured_step() {
    let config = RendererConfig { auto_rotate_step: 0.5, ..RendererConfig::default() };
    let mut core = EngineCore::create(inputs(), config);
    let start = core.camera.angle;
    core.start_auto_rotate(0.0);
    core.on_auto_rotate_tick(100.0);
    assert_eq!(core.camera.angle, start + 0.5);
}
