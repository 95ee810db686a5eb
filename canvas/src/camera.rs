#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{
    ANGLE_SENSITIVITY, HEIGHT_MAX, HEIGHT_MIN, HEIGHT_SENSITIVITY, REFOCUS_BASE_HEIGHT, REFOCUS_BLEND,
    REFOCUS_PER_FLOOR, ROTATION_PER_ANGLE, SCALE_BASE, SCALE_PER_HEIGHT, WHEEL_SENSITIVITY,
};

/// A point in screen space (CSS pixels) or in projected grid space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A named, fixed camera configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Reset,
    Top,
    Side,
    Perspective,
}

impl Preset {
    /// The `(angle, height, distance)` triple for this preset.
    #[must_use]
    pub fn triple(self) -> (f64, f64, f64) {
        match self {
            Self::Reset => (3.0, 15.0, 20.0),
            Self::Top => (0.0, 25.0, 15.0),
            Self::Side => (8.0, 12.0, 25.0),
            Self::Perspective => (5.0, 18.0, 22.0),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Top => "top",
            Self::Side => "side",
            Self::Perspective => "perspective",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a preset name is not one of the four known views.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown camera preset `{0}` (expected reset, top, side or perspective)")]
pub struct PresetParseError(pub String);

impl FromStr for Preset {
    type Err = PresetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reset" => Ok(Self::Reset),
            "top" => Ok(Self::Top),
            "side" => Ok(Self::Side),
            "perspective" => Ok(Self::Perspective),
            _ => Err(PresetParseError(s.to_owned())),
        }
    }
}

/// Orbit camera for the isometric scene.
///
/// `angle` is an unbounded accumulator; the painter rotates the surface by
/// `angle * ROTATION_PER_ANGLE` radians. `height` is always inside
/// `[HEIGHT_MIN, HEIGHT_MAX]`. `distance` is only carried by presets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub angle: f64,
    pub height: f64,
    pub distance: f64,
}

impl Default for Camera {
    fn default() -> Self {
        let (angle, height, distance) = Preset::Reset.triple();
        Self { angle, height, distance }
    }
}

impl Camera {
    /// Rotate with horizontal drag, raise or lower with vertical drag.
    /// Non-finite deltas are dropped.
    pub fn apply_drag(&mut self, dx: f64, dy: f64) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.angle += dx * ANGLE_SENSITIVITY;
        self.height = clamp_height(self.height - dy * HEIGHT_SENSITIVITY);
    }

    /// Wheel delta adjusts height only.
    pub fn apply_wheel(&mut self, delta_y: f64) {
        self.height = clamp_height(self.height + delta_y * WHEEL_SENSITIVITY);
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        let (angle, height, distance) = preset.triple();
        self.angle = angle;
        self.height = height;
        self.distance = distance;
    }

    /// Move height halfway toward the target for `floor_id`.
    pub fn refocus_floor(&mut self, floor_id: u32) {
        let target = refocus_target(floor_id);
        self.height = clamp_height(self.height + (target - self.height) * REFOCUS_BLEND);
    }

    /// Surface scale derived from height.
    #[must_use]
    pub fn scale(&self) -> f64 {
        SCALE_BASE + (self.height - 5.0) * SCALE_PER_HEIGHT
    }

    /// Surface rotation in radians.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.angle * ROTATION_PER_ANGLE
    }
}

/// Height the camera settles toward when `floor_id` is selected.
#[must_use]
pub fn refocus_target(floor_id: u32) -> f64 {
    let above_ground = f64::from(floor_id.saturating_sub(1));
    clamp_height(REFOCUS_BASE_HEIGHT + above_ground * REFOCUS_PER_FLOOR)
}

fn clamp_height(height: f64) -> f64 {
    if height.is_nan() {
        return HEIGHT_MIN;
    }
    height.clamp(HEIGHT_MIN, HEIGHT_MAX)
}
