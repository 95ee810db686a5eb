#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::map::{MapDescription, PathPoint, Toggles};
use crate::scene;
use crate::surface::{DrawCall, RecordingSurface};

// =============================================================
// Helpers
// =============================================================

fn two_floor_map() -> MapDescription {
    serde_json::from_value(json!({
        "floors": {
            "1": {
                "name": "Ground",
                "rooms": [{ "id": "101", "name": "Lobby", "x": 3, "y": 2 }],
                "entrance": { "x": 0, "y": 7 }
            },
            "2": {
                "name": "Upper",
                "rooms": [{ "id": "201", "name": "Library", "x": 5, "y": 4 }]
            }
        },
        "vertical_connections": [
            { "id": "elevator_1_2_0", "type": "elevator", "start_floor": 1, "end_floor": 2, "start_pos": { "x": 9, "y": 5 } }
        ]
    }))
    .unwrap()
}

fn frame(map: &MapDescription, current_floor: FloorId) -> FrameParams {
    FrameParams {
        width: 800.0,
        height: 600.0,
        dpr: 2.0,
        current_floor,
        footprint: map.footprint(),
        cell_px: 18.0,
        show_labels: true,
        show_connections: true,
        show_hint: false,
        debug_overlay: false,
    }
}

fn paint(objects: &[RenderObject], frame: &FrameParams) -> RecordingSurface {
    let mut surface = RecordingSurface::new();
    draw(&mut surface, objects, &Camera::default(), frame).unwrap();
    surface
}

fn route() -> Vec<PathPoint> {
    vec![PathPoint::new(1.0, 1.0, 1), PathPoint::new(2.0, 1.0, 1), PathPoint::new(2.0, 3.0, 1)]
}

// =============================================================
// Projection
// =============================================================

#[test]
fn project_origin_on_first_floor_is_origin() {
    let p = project(0.0, 0.0, 0.0, 1);
    assert_eq!(p, Point::new(0.0, 0.0));
}

#[test]
fn project_depth_shifts_right_and_down() {
    let p = project(10.0, 0.0, 5.0, 1);
    assert!((p.x - 13.0).abs() < 1e-9);
    assert!((p.y - 1.5).abs() < 1e-9);
}

#[test]
fn project_lifts_upper_floors() {
    let ground = project(2.0, 0.0, 2.0, 1);
    let upper = project(2.0, 0.0, 2.0, 2);
    assert!((ground.y - upper.y - FLOOR_LIFT).abs() < 1e-9);
    assert_eq!(ground.x, upper.x);
}

// =============================================================
// Empty scene
// =============================================================

#[test]
fn empty_list_draws_placeholder_without_camera_transform() {
    let map = MapDescription::default();
    let surface = paint(&[], &frame(&map, 1));
    assert!(!surface.has_transform());
    assert_eq!(surface.texts(), vec![PLACEHOLDER_TEXT]);
    assert!(matches!(surface.calls.first(), Some(DrawCall::ResetTransform { dpr }) if *dpr == 2.0));
}

#[test]
fn background_gradient_is_always_painted() {
    let map = MapDescription::default();
    let surface = paint(&[], &frame(&map, 1));
    assert!(surface.calls.iter().any(|c| matches!(c, DrawCall::VerticalGradient { .. })));
}

// =============================================================
// Full scene
// =============================================================

#[test]
fn save_and_restore_are_balanced() {
    let map = two_floor_map();
    let objects = scene::build(&map, 1, &route(), Toggles::default());
    let surface = paint(&objects, &frame(&map, 1));
    assert_eq!(surface.depth(), 0);
    assert!(surface.max_depth() >= 2);
    let saves = surface.calls.iter().filter(|c| **c == DrawCall::Save).count();
    let restores = surface.calls.iter().filter(|c| **c == DrawCall::Restore).count();
    assert_eq!(saves, restores);
}

#[test]
fn camera_transform_is_applied_in_order() {
    let map = two_floor_map();
    let objects = scene::build(&map, 1, &[], Toggles::default());
    let surface = paint(&objects, &frame(&map, 1));
    let camera = Camera::default();

    let transforms: Vec<&DrawCall> = surface.calls.iter().filter(|c| c.is_transform()).take(4).collect();
    assert_eq!(transforms[0], &DrawCall::Translate { x: 400.0, y: 600.0 * ANCHOR_Y_RATIO });
    assert_eq!(
        transforms[1],
        &DrawCall::Scale { x: camera.scale(), y: camera.scale() * VERTICAL_SQUASH }
    );
    assert_eq!(transforms[2], &DrawCall::Rotate { radians: camera.rotation() });
    assert_eq!(
        transforms[3],
        &DrawCall::Transform { a: 1.0, b: 0.0, c: SHEAR_X, d: 1.0, e: 0.0, f: 0.0 }
    );
}

#[test]
fn path_markers_use_start_step_and_end_colors() {
    let map = two_floor_map();
    let objects = scene::build(&map, 1, &route(), Toggles::default());
    let surface = paint(&objects, &frame(&map, 1));
    let fills = surface.fill_styles();
    assert!(fills.contains(&shade::PATH_START));
    assert!(fills.contains(&shade::PATH_STEP));
    assert!(fills.contains(&shade::PATH_END));
}

#[test]
fn hidden_path_paints_no_markers() {
    let map = two_floor_map();
    let toggles = Toggles { show_path: false, ..Toggles::default() };
    let objects = scene::build(&map, 1, &route(), toggles);
    let surface = paint(&objects, &frame(&map, 1));
    assert!(!surface.fill_styles().contains(&shade::PATH_START));
}

#[test]
fn markers_on_unknown_floors_are_skipped() {
    let map = two_floor_map();
    let path = vec![PathPoint::new(1.0, 1.0, 9), PathPoint::new(2.0, 1.0, 9)];
    let objects = scene::build(&map, 1, &path, Toggles::default());
    let surface = paint(&objects, &frame(&map, 1));
    assert!(!surface.fill_styles().contains(&shade::PATH_START));
    assert!(!surface.fill_styles().contains(&shade::PATH_END));
}

#[test]
fn elevator_pillar_uses_elevator_color() {
    let map = two_floor_map();
    let objects = scene::build(&map, 1, &[], Toggles::default());
    let surface = paint(&objects, &frame(&map, 1));
    assert!(surface.fill_styles().contains(&shade::ELEVATOR));
    assert!(surface.calls.contains(&DrawCall::StrokeStyle { color: shade::ELEVATOR.into() }));
}

#[test]
fn nearer_room_is_painted_over_farther_room() {
    let map: MapDescription = serde_json::from_value(json!({
        "floors": {
            "1": {
                "name": "Ground",
                "rooms": [
                    { "id": "n", "name": "Near", "x": 9, "y": 0 },
                    { "id": "f", "name": "Far", "x": 1, "y": 0 }
                ]
            }
        }
    }))
    .unwrap();
    let objects = scene::build(&map, 1, &[], Toggles::default());
    let surface = paint(&objects, &frame(&map, 1));

    let label_at = |name: &str| {
        surface
            .calls
            .iter()
            .position(|c| matches!(c, DrawCall::FillText { text, .. } if text == name))
            .unwrap()
    };
    let far_label = label_at("Far");
    let near_label = label_at("Near");
    assert!(far_label < near_label);

    // The near room's front face is filled after everything of the far room.
    let near_front = surface.calls[..near_label]
        .iter()
        .rposition(|c| matches!(c, DrawCall::FillRect { .. }))
        .unwrap();
    assert!(near_front > far_label);
}

#[test]
fn labels_are_drawn_when_enabled() {
    let map = two_floor_map();
    let objects = scene::build(&map, 1, &[], Toggles::default());
    let surface = paint(&objects, &frame(&map, 1));
    let texts = surface.texts();
    assert!(texts.contains(&"Lobby"));
    assert!(texts.contains(&"Library"));
    assert!(texts.contains(&ENTRANCE_LABEL));
    assert!(texts.contains(&"Ground"));
}

#[test]
fn labels_are_omitted_when_disabled() {
    let map = two_floor_map();
    let objects = scene::build(&map, 1, &[], Toggles::default());
    let params = FrameParams { show_labels: false, ..frame(&map, 1) };
    let surface = paint(&objects, &params);
    assert!(surface.texts().is_empty());
}

#[test]
fn inactive_floors_are_translucent() {
    let map = two_floor_map();
    let objects = scene::build(&map, 1, &[], Toggles::default());
    let surface = paint(&objects, &frame(&map, 1));
    let alphas = surface
        .calls
        .iter()
        .filter(|c| matches!(c, DrawCall::GlobalAlpha { alpha } if *alpha == INACTIVE_FLOOR_ALPHA))
        .count();
    assert_eq!(alphas, 1);
    assert!(surface.fill_styles().contains(&shade::SLAB_CURRENT));
}

// =============================================================
// Overlays
// =============================================================

#[test]
fn hint_is_drawn_outside_camera_transform() {
    let map = two_floor_map();
    let objects = scene::build(&map, 1, &[], Toggles::default());
    let params = FrameParams { show_hint: true, show_labels: false, ..frame(&map, 1) };
    let surface = paint(&objects, &params);
    assert_eq!(surface.texts(), vec![HINT_TEXT]);
    let hint_at = surface
        .calls
        .iter()
        .position(|c| matches!(c, DrawCall::FillText { text, .. } if text == HINT_TEXT))
        .unwrap();
    let last_restore = surface.calls.iter().rposition(|c| *c == DrawCall::Restore).unwrap();
    assert!(hint_at > last_restore);
}

#[test]
fn debug_overlay_reports_floor_and_camera() {
    let map = two_floor_map();
    let objects = scene::build(&map, 2, &[], Toggles::default());
    let params = FrameParams { debug_overlay: true, show_labels: false, ..frame(&map, 2) };
    let surface = paint(&objects, &params);
    let texts = surface.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("floor 2 | angle 3.00 | height 15.0"));
}
