//! Color helpers for pseudo-3D face shading.
//!
//! All helpers take CSS hex colors (`#RGB` or `#RRGGBB`). Input that does not
//! parse is returned unchanged rather than rejected, so a bad palette entry
//! degrades to a flat color instead of breaking the paint.

#[cfg(test)]
#[path = "shade_test.rs"]
mod shade_test;

use crate::consts::{ROOM_HUE_BASE, ROOM_HUE_RANGE, ROOM_HUE_STEP};
use crate::map::{ConnectionKind, FloorId};

pub const PATH_START: &str = "#22c55e";
pub const PATH_END: &str = "#ef4444";
pub const PATH_STEP: &str = "#facc15";

pub const ELEVATOR: &str = "#e11d48";
pub const STAIR: &str = "#14b8a6";
pub const OTHER_CONNECTION: &str = "#f97316";

pub const ENTRANCE: &str = "#16a34a";

pub const SLAB: &str = "#cbd5e1";
pub const SLAB_CURRENT: &str = "#60a5fa";
pub const SLAB_TINT: &str = "#94a3b8";

pub const BACKGROUND_TOP: &str = "#0f172a";
pub const BACKGROUND_BOTTOM: &str = "#1e293b";

pub const LABEL: &str = "#f8fafc";
pub const OUTLINE: &str = "rgba(15, 23, 42, 0.35)";

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => Some((
            hex_byte(&hex[0..1].repeat(2))?,
            hex_byte(&hex[1..2].repeat(2))?,
            hex_byte(&hex[2..3].repeat(2))?,
        )),
        6 => Some((hex_byte(&hex[0..2])?, hex_byte(&hex[2..4])?, hex_byte(&hex[4..6])?)),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn hex_byte(pair: &str) -> Option<u8> {
    let mut digits = pair.chars();
    let hi = digits.next()?.to_digit(16)?;
    let lo = digits.next()?.to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

fn to_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Blend `color` toward `target` by `amount` in `[0, 1]`.
///
/// Returns `color` unchanged when either input fails to parse.
#[must_use]
pub fn mix(color: &str, target: &str, amount: f64) -> String {
    let (Some(from), Some(to)) = (parse_hex_rgb(color), parse_hex_rgb(target)) else {
        return color.to_owned();
    };
    let t = amount.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| channel(f64::from(a) + (f64::from(b) - f64::from(a)) * t);
    to_hex((lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2)))
}

/// Blend toward white.
#[must_use]
pub fn lighten(color: &str, amount: f64) -> String {
    mix(color, "#ffffff", amount)
}

/// Blend toward black.
#[must_use]
pub fn darken(color: &str, amount: f64) -> String {
    mix(color, "#000000", amount)
}

/// `rgba(...)` form of `color` at `alpha`; unparseable input is returned as is.
#[must_use]
pub fn with_alpha(color: &str, alpha: f64) -> String {
    match parse_hex_rgb(color) {
        Some((r, g, b)) => format!("rgba({r}, {g}, {b}, {})", alpha.clamp(0.0, 1.0)),
        None => color.to_owned(),
    }
}

/// Convert HSL (degrees, percent, percent) to `#rrggbb`.
#[must_use]
pub fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let h = hue.rem_euclid(360.0) / 360.0;
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    if s <= 0.0 {
        let v = channel(l * 255.0);
        return to_hex((v, v, v));
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);
    to_hex((channel(r * 255.0), channel(g * 255.0), channel(b * 255.0)))
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Three face colors for an extruded shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacePalette {
    pub top: String,
    pub front: String,
    pub side: String,
}

impl FacePalette {
    /// Lit top, base front, shaded side.
    #[must_use]
    pub fn from_base(base: &str) -> Self {
        Self {
            top: lighten(base, 0.25),
            front: base.to_owned(),
            side: darken(base, 0.25),
        }
    }
}

/// Room hue for a floor: `200 + (floor * 60) mod 120` degrees.
#[must_use]
pub fn room_hue(floor_id: FloorId) -> u32 {
    ROOM_HUE_BASE + (floor_id % ROOM_HUE_RANGE) * ROOM_HUE_STEP % ROOM_HUE_RANGE
}

#[must_use]
pub fn room_color(floor_id: FloorId) -> String {
    hsl_to_hex(f64::from(room_hue(floor_id)), 65.0, 55.0)
}

#[must_use]
pub fn connection_color(kind: ConnectionKind) -> &'static str {
    match kind {
        ConnectionKind::Elevator => ELEVATOR,
        ConnectionKind::Stair => STAIR,
        ConnectionKind::Other => OTHER_CONNECTION,
    }
}

/// Route marker color: green start, red destination, yellow in between.
#[must_use]
pub fn path_marker_color(index: usize, len: usize) -> &'static str {
    if index == 0 {
        PATH_START
    } else if index + 1 >= len {
        PATH_END
    } else {
        PATH_STEP
    }
}
