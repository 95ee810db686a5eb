//! Scene builder: flattens the map, the route and the toggles into typed
//! render objects with resolved world coordinates.
//!
//! World axes: `x` runs along a floor's grid columns, `z` along its grid rows
//! (the map's `y`), and `y` is the vertical offset of the floor a thing sits
//! on. The list is rebuilt from scratch on every input change; nothing here
//! reads the camera.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::Serialize;

use crate::consts::{CONNECTION_OFFSET, ENTRANCE_OFFSET, FLOOR_SPACING, PATH_OFFSET, ROOM_OFFSET};
use crate::map::{ConnectionKind, FloorId, GridPos, MapDescription, PathPoint, Toggles};

/// Variant-specific payload of a [`RenderObject`].
///
/// Each variant carries a reference back to its source entity (room id,
/// connection index, path index) alongside what its painter needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "object", rename_all = "snake_case")]
pub enum ObjectKind {
    /// A floor slab.
    Floor {
        name: String,
        width: f64,
        depth: f64,
        /// Whether this slab is the floor being viewed.
        current: bool,
    },
    /// A room cuboid.
    Room { id: String, name: String },
    /// An entrance cylinder.
    Entrance,
    /// A stair/elevator pillar placed at the connection's start position.
    Connection {
        /// Index into the map's vertical connections.
        index: usize,
        kind: ConnectionKind,
        end_floor: FloorId,
        end_pos: Option<GridPos>,
    },
    /// One route step.
    PathMarker {
        /// Position in the route; 0 is the start.
        index: usize,
        /// Route length, so the painter can tell the destination apart.
        len: usize,
    },
}

/// A typed scene entry with resolved world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderObject {
    pub floor_id: FloorId,
    pub x: f64,
    pub z: f64,
    pub y: f64,
    /// False when the object references a floor the map does not have.
    pub visible: bool,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl RenderObject {
    #[must_use]
    pub fn is_floor(&self) -> bool {
        matches!(self.kind, ObjectKind::Floor { .. })
    }

    /// Short variant name used in logs and CLI output.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ObjectKind::Floor { .. } => "floor",
            ObjectKind::Room { .. } => "room",
            ObjectKind::Entrance => "entrance",
            ObjectKind::Connection { .. } => "connection",
            ObjectKind::PathMarker { .. } => "path",
        }
    }
}

/// Vertical offset of a floor's slab.
#[must_use]
pub fn floor_baseline(floor_id: FloorId) -> f64 {
    f64::from(floor_id.saturating_sub(1)) * FLOOR_SPACING
}

/// Build the full render list.
///
/// Returns an empty list for a map with no floors; the caller shows the
/// "no 3D data" placeholder instead of painting.
#[must_use]
pub fn build(map: &MapDescription, current_floor: FloorId, path: &[PathPoint], toggles: Toggles) -> Vec<RenderObject> {
    if !map.is_multi_floor() {
        return Vec::new();
    }
    if map.floors.contains_key(&0) {
        log::warn!("ignoring floor 0: floor ids start at 1");
    }

    let mut out = Vec::new();

    for (id, floor) in map.floors() {
        let base = floor_baseline(id);
        out.push(RenderObject {
            floor_id: id,
            x: 0.0,
            z: 0.0,
            y: base,
            visible: true,
            kind: ObjectKind::Floor {
                name: floor.name.clone(),
                width: floor.width,
                depth: floor.height_grid,
                current: id == current_floor,
            },
        });

        for room in &floor.rooms {
            out.push(RenderObject {
                floor_id: id,
                x: room.x,
                z: room.y,
                y: base - ROOM_OFFSET,
                visible: true,
                kind: ObjectKind::Room { id: room.id.clone(), name: room.name.clone() },
            });
        }

        if let Some(entrance) = floor.entrance {
            out.push(RenderObject {
                floor_id: id,
                x: entrance.x,
                z: entrance.y,
                y: base - ENTRANCE_OFFSET,
                visible: true,
                kind: ObjectKind::Entrance,
            });
        }
    }

    if toggles.show_connections {
        for (index, conn) in map.vertical_connections.iter().enumerate() {
            out.push(RenderObject {
                floor_id: conn.start_floor.max(1),
                x: conn.start_pos.x,
                z: conn.start_pos.y,
                y: floor_baseline(conn.start_floor) - CONNECTION_OFFSET,
                visible: map.has_floor(conn.start_floor),
                kind: ObjectKind::Connection {
                    index,
                    kind: conn.kind,
                    end_floor: conn.end_floor,
                    end_pos: conn.end_pos,
                },
            });
        }
    }

    if toggles.show_path {
        let len = path.len();
        for (index, point) in path.iter().enumerate() {
            out.push(RenderObject {
                floor_id: point.floor.max(1),
                x: point.x,
                z: point.y,
                y: floor_baseline(point.floor) - PATH_OFFSET,
                visible: map.has_floor(point.floor),
                kind: ObjectKind::PathMarker { index, len },
            });
        }
    }

    log::debug!("scene rebuilt: {} objects, current floor {current_floor}", out.len());
    out
}
