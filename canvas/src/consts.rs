//! Shared numeric constants for the canvas3d crate.

// ── Camera ──────────────────────────────────────────────────────

/// Lowest camera height reachable by drag or wheel.
pub const HEIGHT_MIN: f64 = 2.0;

/// Highest camera height reachable by drag or wheel.
pub const HEIGHT_MAX: f64 = 35.0;

/// Angle units added per horizontal drag pixel.
pub const ANGLE_SENSITIVITY: f64 = 0.02;

/// Height units removed per vertical drag pixel (dragging up raises the camera).
pub const HEIGHT_SENSITIVITY: f64 = 0.05;

/// Height units added per wheel delta pixel.
pub const WHEEL_SENSITIVITY: f64 = 0.01;

/// Radians of surface rotation per camera angle unit.
pub const ROTATION_PER_ANGLE: f64 = 0.08;

/// Base scale at camera height 5.
pub const SCALE_BASE: f64 = 0.6;

/// Scale gained per height unit above 5.
pub const SCALE_PER_HEIGHT: f64 = 0.04;

/// Floor refocus target height for floor 1.
pub const REFOCUS_BASE_HEIGHT: f64 = 12.0;

/// Extra refocus height per floor above the first.
pub const REFOCUS_PER_FLOOR: f64 = 3.0;

/// Fraction of the remaining distance covered by one refocus.
pub const REFOCUS_BLEND: f64 = 0.5;

// ── World layout ────────────────────────────────────────────────

/// Vertical distance between consecutive floor slabs, in world units.
pub const FLOOR_SPACING: f64 = 8.0;

/// Baseline drop for rooms relative to their slab.
pub const ROOM_OFFSET: f64 = 0.2;

/// Baseline drop for entrance markers relative to their slab.
pub const ENTRANCE_OFFSET: f64 = 0.3;

/// Baseline drop for connection pillars relative to their start slab.
pub const CONNECTION_OFFSET: f64 = 0.25;

/// Baseline drop for path markers relative to their slab.
pub const PATH_OFFSET: f64 = 0.5;

/// Default slab footprint width in grid cells.
pub const DEFAULT_FLOOR_WIDTH: f64 = 20.0;

/// Default slab footprint depth in grid cells.
pub const DEFAULT_FLOOR_DEPTH: f64 = 15.0;

// ── Projection ──────────────────────────────────────────────────

/// Screen x shift per world z unit.
pub const ISO_X_PER_Z: f64 = 0.6;

/// Screen y shift per world z unit.
pub const ISO_Y_PER_Z: f64 = 0.3;

/// Screen lift per world y unit.
pub const ISO_Y_PER_HEIGHT: f64 = 0.3;

/// Additional screen lift per floor above the first, in grid units.
pub const FLOOR_LIFT: f64 = 3.0;

/// Depth key weight on world z.
pub const DEPTH_Z_WEIGHT: f64 = 0.5;

/// Depth key weight on world y.
pub const DEPTH_Y_WEIGHT: f64 = 0.1;

/// Vertical compression applied on top of the height scale.
pub const VERTICAL_SQUASH: f64 = 0.75;

/// Horizontal shear that fakes perspective skew.
pub const SHEAR_X: f64 = -0.15;

/// Anchor height as a fraction of the surface height.
pub const ANCHOR_Y_RATIO: f64 = 0.42;

// ── Shape tuning ────────────────────────────────────────────────
//
// Each shape owns its own iso offsets; they are tuned per shape rather than
// derived from one projection.

/// Slab thickness in grid units.
pub const SLAB_THICKNESS: f64 = 0.35;

/// Room cuboid footprint in grid units.
pub const ROOM_SIZE: f64 = 0.8;

/// Room cuboid height in grid units.
pub const ROOM_HEIGHT: f64 = 0.9;

/// Room side-face iso offset (x, y) per unit of depth.
pub const ROOM_ISO_OFFSET: (f64, f64) = (0.5, -0.3);

/// Entrance cylinder radius in grid units.
pub const ENTRANCE_RADIUS: f64 = 0.45;

/// Entrance cylinder height in grid units.
pub const ENTRANCE_HEIGHT: f64 = 0.7;

/// Entrance cap ellipse flattening.
pub const ENTRANCE_CAP_RATIO: f64 = 0.4;

/// Connection pillar width in grid units.
pub const PILLAR_WIDTH: f64 = 0.5;

/// Connection pillar height in grid units.
pub const PILLAR_HEIGHT: f64 = 1.4;

/// Connection pillar side-face iso offset (x, y).
pub const PILLAR_ISO_OFFSET: (f64, f64) = (0.35, -0.2);

/// Path marker radius in grid units.
pub const MARKER_RADIUS: f64 = 0.25;

/// Path marker height in grid units.
pub const MARKER_HEIGHT: f64 = 0.3;

/// Path marker cap ellipse flattening.
pub const MARKER_CAP_RATIO: f64 = 0.5;

// ── Rendering ───────────────────────────────────────────────────

/// Alpha for slabs that are not the current floor.
pub const INACTIVE_FLOOR_ALPHA: f64 = 0.4;

/// Room hue base in degrees.
pub const ROOM_HUE_BASE: u32 = 200;

/// Room hue step per floor in degrees.
pub const ROOM_HUE_STEP: u32 = 60;

/// Room hue range in degrees.
pub const ROOM_HUE_RANGE: u32 = 120;
