//! Depth ordering for the painter's algorithm.

#[cfg(test)]
#[path = "depth_test.rs"]
mod depth_test;

use std::cmp::Ordering;

use crate::consts::{DEPTH_Y_WEIGHT, DEPTH_Z_WEIGHT};
use crate::scene::RenderObject;

/// Synthetic depth key: `x + z * 0.5 + y * 0.1`.
#[must_use]
pub fn depth_key(obj: &RenderObject) -> f64 {
    obj.x + obj.z * DEPTH_Z_WEIGHT + obj.y * DEPTH_Y_WEIGHT
}

/// Total order on render objects: floor ascending, then depth ascending.
///
/// A larger depth key is nearer the camera, so it paints later and covers
/// what lies behind it.
#[must_use]
pub fn compare(a: &RenderObject, b: &RenderObject) -> Ordering {
    a.floor_id
        .cmp(&b.floor_id)
        .then_with(|| depth_key(a).total_cmp(&depth_key(b)))
}

/// Objects split into the two paint passes.
#[derive(Debug, Default)]
pub struct PaintOrder<'a> {
    /// Slabs, lowest floor first.
    pub floors: Vec<&'a RenderObject>,
    /// Everything else in painting order.
    pub objects: Vec<&'a RenderObject>,
}

/// Stable-sort `objects` and split slabs from the rest.
///
/// Equal keys keep build order. Invisible objects are dropped.
#[must_use]
pub fn paint_order(objects: &[RenderObject]) -> PaintOrder<'_> {
    let mut sorted: Vec<&RenderObject> = objects.iter().filter(|o| o.visible).collect();
    sorted.sort_by(|a, b| compare(a, b));

    let (floors, objects): (Vec<_>, Vec<_>) = sorted.into_iter().partition(|o| o.is_floor());
    PaintOrder { floors, objects }
}
