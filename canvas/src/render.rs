//! Rendering: paints the scene onto a [`Surface`].
//!
//! This module receives read-only views of the render list and camera and
//! produces pixels; it does not mutate application state. Slabs are painted
//! first as their own pass, then every other object in depth order, each as a
//! small pseudo-3D shape whose faces are shaded from one base color.
//!
//! All fallible surface calls propagate via `Result<(), SurfaceError>`. The
//! caller ([`crate::engine::EngineCore::paint`]) decides what to do with it.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use crate::camera::{Camera, Point};
use crate::consts::{
    ANCHOR_Y_RATIO, CONNECTION_OFFSET, ENTRANCE_CAP_RATIO, ENTRANCE_HEIGHT, ENTRANCE_RADIUS, FLOOR_LIFT,
    INACTIVE_FLOOR_ALPHA, ISO_X_PER_Z, ISO_Y_PER_HEIGHT, ISO_Y_PER_Z, MARKER_CAP_RATIO, MARKER_HEIGHT,
    MARKER_RADIUS, PILLAR_HEIGHT, PILLAR_ISO_OFFSET, PILLAR_WIDTH, ROOM_HEIGHT, ROOM_ISO_OFFSET, ROOM_SIZE,
    SHEAR_X, SLAB_THICKNESS, VERTICAL_SQUASH,
};
use crate::depth::paint_order;
use crate::map::{ConnectionKind, FloorId, GridPos};
use crate::scene::{ObjectKind, RenderObject, floor_baseline};
use crate::shade::{self, FacePalette};
use crate::surface::{SavedState, Surface, SurfaceError};

pub const PLACEHOLDER_TEXT: &str = "No 3D data for this map";
pub const HINT_TEXT: &str = "Drag to rotate · Scroll to tilt";
pub const ENTRANCE_LABEL: &str = "Entrance";

const LABEL_FONT: &str = "11px sans-serif";
const OVERLAY_FONT: &str = "12px monospace";
const PLACEHOLDER_FONT: &str = "16px sans-serif";

/// Per-paint parameters that are not part of the scene or camera.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Surface width in CSS pixels.
    pub width: f64,
    /// Surface height in CSS pixels.
    pub height: f64,
    /// Device pixel ratio.
    pub dpr: f64,
    pub current_floor: FloorId,
    /// Largest slab footprint `(width, depth)`, used to center the map.
    pub footprint: (f64, f64),
    /// Screen pixels per grid cell before camera scaling.
    pub cell_px: f64,
    pub show_labels: bool,
    pub show_connections: bool,
    pub show_hint: bool,
    pub debug_overlay: bool,
}

/// Isometric projection of a world position, in grid units.
///
/// `iso_x = x + z * 0.6`, `iso_y = (-y * 0.3 - floor_offset) + z * 0.3`
/// where `floor_offset` lifts each floor above the first.
#[must_use]
pub fn project(x: f64, y: f64, z: f64, floor_id: FloorId) -> Point {
    let floor_offset = f64::from(floor_id.saturating_sub(1)) * FLOOR_LIFT;
    Point {
        x: x + z * ISO_X_PER_Z,
        y: (-y * ISO_Y_PER_HEIGHT - floor_offset) + z * ISO_Y_PER_Z,
    }
}

/// Draw the full frame.
///
/// # Errors
///
/// Returns `Err` if any surface call fails. The saved transform is restored
/// before the error is returned.
pub fn draw<S: Surface + ?Sized>(
    surface: &mut S,
    objects: &[RenderObject],
    camera: &Camera,
    frame: &FrameParams,
) -> Result<(), SurfaceError> {
    // Layer 1: clear and background.
    surface.reset_transform(frame.dpr)?;
    surface.clear_rect(0.0, 0.0, frame.width, frame.height);
    surface.fill_vertical_gradient(0.0, 0.0, frame.width, frame.height, shade::BACKGROUND_TOP, shade::BACKGROUND_BOTTOM)?;

    if objects.is_empty() {
        return draw_placeholder(surface, frame);
    }

    // Layer 2: scene in camera space.
    {
        let mut scoped = SavedState::new(&mut *surface);
        apply_camera(&mut *scoped, camera, frame)?;

        let order = paint_order(objects);
        for slab in &order.floors {
            draw_floor(&mut *scoped, slab, frame)?;
        }
        for obj in &order.objects {
            draw_object(&mut *scoped, obj, frame)?;
        }
    }

    // Layer 3: screen-space overlays.
    if frame.show_hint {
        draw_hint(surface, frame)?;
    }
    if frame.debug_overlay {
        draw_debug_overlay(surface, camera, frame)?;
    }
    Ok(())
}

fn apply_camera<S: Surface + ?Sized>(surface: &mut S, camera: &Camera, frame: &FrameParams) -> Result<(), SurfaceError> {
    let scale = camera.scale();
    surface.translate(frame.width * 0.5, frame.height * ANCHOR_Y_RATIO)?;
    surface.scale(scale, scale * VERTICAL_SQUASH)?;
    surface.rotate(camera.rotation())?;
    surface.transform(1.0, 0.0, SHEAR_X, 1.0, 0.0, 0.0)?;

    let (w, d) = frame.footprint;
    let center = project(w * 0.5, 0.0, d * 0.5, 1);
    surface.translate(-center.x * frame.cell_px, -center.y * frame.cell_px)
}

// =============================================================
// Floors
// =============================================================

fn draw_floor<S: Surface + ?Sized>(surface: &mut S, obj: &RenderObject, frame: &FrameParams) -> Result<(), SurfaceError> {
    let ObjectKind::Floor { name, width, depth, current } = &obj.kind else {
        return Ok(());
    };
    let cell = frame.cell_px;
    let corner = |x: f64, z: f64| {
        let p = project(x, obj.y, z, obj.floor_id);
        Point::new(p.x * cell, p.y * cell)
    };
    let back_left = corner(0.0, 0.0);
    let back_right = corner(*width, 0.0);
    let front_right = corner(*width, *depth);
    let front_left = corner(0.0, *depth);
    let t = SLAB_THICKNESS * cell;

    let mut scoped = SavedState::new(surface);
    let palette = if *current {
        FacePalette::from_base(shade::SLAB_CURRENT)
    } else {
        scoped.set_global_alpha(INACTIVE_FLOOR_ALPHA);
        FacePalette::from_base(&shade::mix(shade::SLAB, shade::SLAB_TINT, 0.5))
    };

    fill_polygon(&mut *scoped, &[back_left, back_right, front_right, front_left], &palette.top);
    fill_polygon(
        &mut *scoped,
        &[back_right, front_right, lowered(front_right, t), lowered(back_right, t)],
        &palette.side,
    );
    fill_polygon(
        &mut *scoped,
        &[front_left, front_right, lowered(front_right, t), lowered(front_left, t)],
        &palette.front,
    );

    scoped.set_stroke_style(shade::OUTLINE);
    scoped.set_line_width(1.0);
    trace_polygon(&mut *scoped, &[back_left, back_right, front_right, front_left]);
    scoped.stroke();

    if frame.show_labels {
        scoped.set_fill_style(shade::LABEL);
        scoped.set_font(LABEL_FONT);
        scoped.set_text_align("left");
        scoped.set_text_baseline("bottom");
        scoped.fill_text(name, back_left.x, back_left.y - 4.0)?;
    }
    Ok(())
}

// =============================================================
// Object dispatch
// =============================================================

fn draw_object<S: Surface + ?Sized>(surface: &mut S, obj: &RenderObject, frame: &FrameParams) -> Result<(), SurfaceError> {
    let at = project(obj.x, obj.y, obj.z, obj.floor_id);

    let mut scoped = SavedState::new(surface);
    scoped.translate(at.x * frame.cell_px, at.y * frame.cell_px)?;

    match &obj.kind {
        ObjectKind::Floor { .. } => Ok(()),
        ObjectKind::Room { name, .. } => draw_room(&mut *scoped, obj.floor_id, name, frame),
        ObjectKind::Entrance => draw_entrance(&mut *scoped, frame),
        ObjectKind::Connection { kind, end_floor, end_pos, .. } => {
            draw_connection(&mut *scoped, obj, at, *kind, *end_floor, *end_pos, frame)
        }
        ObjectKind::PathMarker { index, len } => draw_path_marker(&mut *scoped, *index, *len, frame),
    }
}

fn draw_room<S: Surface + ?Sized>(
    surface: &mut S,
    floor_id: FloorId,
    name: &str,
    frame: &FrameParams,
) -> Result<(), SurfaceError> {
    let size = ROOM_SIZE * frame.cell_px;
    let height = ROOM_HEIGHT * frame.cell_px;
    let palette = FacePalette::from_base(&shade::room_color(floor_id));
    draw_cuboid(surface, size, height, ROOM_ISO_OFFSET, &palette);

    if frame.show_labels {
        draw_label(surface, name, 0.0, -height * 0.5, "middle")?;
    }
    Ok(())
}

fn draw_entrance<S: Surface + ?Sized>(surface: &mut S, frame: &FrameParams) -> Result<(), SurfaceError> {
    let radius = ENTRANCE_RADIUS * frame.cell_px;
    let height = ENTRANCE_HEIGHT * frame.cell_px;
    let palette = FacePalette::from_base(shade::ENTRANCE);
    draw_cylinder(surface, radius, height, ENTRANCE_CAP_RATIO, &palette)?;

    if frame.show_labels {
        let above = height + radius * ENTRANCE_CAP_RATIO + 4.0;
        draw_label(surface, ENTRANCE_LABEL, 0.0, -above, "bottom")?;
    }
    Ok(())
}

fn draw_connection<S: Surface + ?Sized>(
    surface: &mut S,
    obj: &RenderObject,
    at: Point,
    kind: ConnectionKind,
    end_floor: FloorId,
    end_pos: Option<GridPos>,
    frame: &FrameParams,
) -> Result<(), SurfaceError> {
    let cell = frame.cell_px;
    let width = PILLAR_WIDTH * cell;
    let height = PILLAR_HEIGHT * cell;
    let color = shade::connection_color(kind);
    draw_cuboid(surface, width, height, PILLAR_ISO_OFFSET, &FacePalette::from_base(color));

    if frame.show_connections && end_floor != obj.floor_id {
        let end = end_pos.unwrap_or(GridPos { x: obj.x, y: obj.z });
        let target = project(end.x, floor_baseline(end_floor) - CONNECTION_OFFSET, end.y, end_floor);
        surface.set_stroke_style(color);
        surface.set_line_width(2.0);
        surface.begin_path();
        surface.move_to(0.0, -height);
        surface.line_to((target.x - at.x) * cell, (target.y - at.y) * cell - height);
        surface.stroke();
    }
    Ok(())
}

fn draw_path_marker<S: Surface + ?Sized>(
    surface: &mut S,
    index: usize,
    len: usize,
    frame: &FrameParams,
) -> Result<(), SurfaceError> {
    let radius = MARKER_RADIUS * frame.cell_px;
    let height = MARKER_HEIGHT * frame.cell_px;
    let palette = FacePalette::from_base(shade::path_marker_color(index, len));
    draw_cylinder(surface, radius, height, MARKER_CAP_RATIO, &palette)
}

// =============================================================
// Shape primitives
// =============================================================

/// Box standing on the origin: front face, side face offset by `iso`, top.
fn draw_cuboid<S: Surface + ?Sized>(surface: &mut S, size: f64, height: f64, iso: (f64, f64), palette: &FacePalette) {
    let half = size * 0.5;
    let ox = iso.0 * size;
    let oy = iso.1 * size;

    fill_polygon(
        surface,
        &[
            Point::new(half, -height),
            Point::new(half + ox, -height + oy),
            Point::new(half + ox, oy),
            Point::new(half, 0.0),
        ],
        &palette.side,
    );
    fill_polygon(
        surface,
        &[
            Point::new(-half, -height),
            Point::new(half, -height),
            Point::new(half + ox, -height + oy),
            Point::new(-half + ox, -height + oy),
        ],
        &palette.top,
    );

    surface.set_fill_style(&palette.front);
    surface.fill_rect(-half, -height, size, height);
    surface.set_stroke_style(shade::OUTLINE);
    surface.set_line_width(1.0);
    trace_polygon(
        surface,
        &[
            Point::new(-half, -height),
            Point::new(half, -height),
            Point::new(half, 0.0),
            Point::new(-half, 0.0),
        ],
    );
    surface.stroke();
}

/// Upright cylinder standing on the origin: rounded base, body, flat cap.
fn draw_cylinder<S: Surface + ?Sized>(
    surface: &mut S,
    radius: f64,
    height: f64,
    cap_ratio: f64,
    palette: &FacePalette,
) -> Result<(), SurfaceError> {
    let ry = radius * cap_ratio;

    surface.set_fill_style(&palette.side);
    surface.begin_path();
    surface.ellipse(0.0, 0.0, radius, ry, 0.0, PI)?;
    surface.fill();
    surface.fill_rect(-radius, -height, radius * 2.0, height);

    surface.set_fill_style(&palette.front);
    surface.fill_rect(-radius * 0.5, -height, radius, height);

    surface.set_fill_style(&palette.top);
    surface.begin_path();
    surface.ellipse(0.0, -height, radius, ry, 0.0, 2.0 * PI)?;
    surface.fill();
    surface.set_stroke_style(shade::OUTLINE);
    surface.set_line_width(1.0);
    surface.stroke();
    Ok(())
}

fn draw_label<S: Surface + ?Sized>(surface: &mut S, text: &str, x: f64, y: f64, baseline: &str) -> Result<(), SurfaceError> {
    surface.set_fill_style(shade::LABEL);
    surface.set_font(LABEL_FONT);
    surface.set_text_align("center");
    surface.set_text_baseline(baseline);
    surface.fill_text(text, x, y)
}

// =============================================================
// Screen-space layers
// =============================================================

fn draw_placeholder<S: Surface + ?Sized>(surface: &mut S, frame: &FrameParams) -> Result<(), SurfaceError> {
    surface.set_fill_style(shade::LABEL);
    surface.set_font(PLACEHOLDER_FONT);
    surface.set_text_align("center");
    surface.set_text_baseline("middle");
    surface.fill_text(PLACEHOLDER_TEXT, frame.width * 0.5, frame.height * 0.5)
}

fn draw_hint<S: Surface + ?Sized>(surface: &mut S, frame: &FrameParams) -> Result<(), SurfaceError> {
    surface.set_fill_style(&shade::with_alpha(shade::LABEL, 0.7));
    surface.set_font(LABEL_FONT);
    surface.set_text_align("center");
    surface.set_text_baseline("bottom");
    surface.fill_text(HINT_TEXT, frame.width * 0.5, frame.height - 12.0)
}

fn draw_debug_overlay<S: Surface + ?Sized>(
    surface: &mut S,
    camera: &Camera,
    frame: &FrameParams,
) -> Result<(), SurfaceError> {
    let line = format!(
        "floor {} | angle {:.2} | height {:.1}",
        frame.current_floor, camera.angle, camera.height
    );
    surface.set_fill_style(shade::LABEL);
    surface.set_font(OVERLAY_FONT);
    surface.set_text_align("left");
    surface.set_text_baseline("top");
    surface.fill_text(&line, 8.0, 8.0)
}

// =============================================================
// Helpers
// =============================================================

/// Move a screen point down by `by` pixels.
fn lowered(p: Point, by: f64) -> Point {
    Point::new(p.x, p.y + by)
}

fn trace_polygon<S: Surface + ?Sized>(surface: &mut S, points: &[Point]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    surface.begin_path();
    surface.move_to(first.x, first.y);
    for p in rest {
        surface.line_to(p.x, p.y);
    }
    surface.close_path();
}

fn fill_polygon<S: Surface + ?Sized>(surface: &mut S, points: &[Point], color: &str) {
    surface.set_fill_style(color);
    trace_polygon(surface, points);
    surface.fill();
}
