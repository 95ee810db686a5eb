//! Map model: the read-only multi-floor map description and route handed in by
//! the host.
//!
//! These types mirror the JSON the map service produces. The host owns them and
//! passes a fresh copy on every change; the renderer only reads them. The
//! scene builder turns them into render objects, and [`FloorDescriptor`] is a
//! small projection for floor-selector UI outside the renderer.

#[cfg(test)]
#[path = "map_test.rs"]
mod map_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FLOOR_DEPTH, DEFAULT_FLOOR_WIDTH};

/// Floor identifier. Valid floors are numbered from 1.
pub type FloorId = u32;

/// A position on a floor's grid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: f64,
    pub y: f64,
}

/// A room door on a floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

/// A building entrance position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entrance {
    pub x: f64,
    pub y: f64,
}

/// One floor of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorData {
    /// Display name, e.g. `"Ground"`.
    pub name: String,
    /// Rooms in declaration order.
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Grid width in cells; sizes the slab.
    #[serde(default = "default_floor_width")]
    pub width: f64,
    /// Grid depth in cells; sizes the slab.
    #[serde(default = "default_floor_depth", alias = "heightGrid")]
    pub height_grid: f64,
    /// Entrance located on this floor, if any.
    #[serde(default)]
    pub entrance: Option<Entrance>,
}

impl FloorData {
    /// A floor with the default grid footprint and no rooms.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rooms: Vec::new(),
            width: DEFAULT_FLOOR_WIDTH,
            height_grid: DEFAULT_FLOOR_DEPTH,
            entrance: None,
        }
    }
}

fn default_floor_width() -> f64 {
    DEFAULT_FLOOR_WIDTH
}

fn default_floor_depth() -> f64 {
    DEFAULT_FLOOR_DEPTH
}

/// What a vertical connection is built from. Drives its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Stair,
    Elevator,
    /// Ramps, escalators and anything else the map service reports.
    #[serde(other)]
    Other,
}

/// A stair, elevator, or other link between two floors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalConnection {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: ConnectionKind,
    #[serde(alias = "startFloor")]
    pub start_floor: FloorId,
    #[serde(alias = "endFloor")]
    pub end_floor: FloorId,
    #[serde(alias = "startPos")]
    pub start_pos: GridPos,
    #[serde(default, alias = "endPos")]
    pub end_pos: Option<GridPos>,
}

/// The full multi-floor map as supplied by the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapDescription {
    /// Floors keyed by id. An empty map means there is no 3D data.
    #[serde(default)]
    pub floors: BTreeMap<FloorId, FloorData>,
    /// The map-level entrance summary.
    #[serde(default)]
    pub entrance: Option<Entrance>,
    #[serde(default, alias = "verticalConnections")]
    pub vertical_connections: Vec<VerticalConnection>,
}

impl MapDescription {
    /// Parse a map description from the map service's JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error for malformed input.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Valid floors (id ≥ 1) in ascending id order.
    pub fn floors(&self) -> impl Iterator<Item = (FloorId, &FloorData)> {
        self.floors
            .iter()
            .filter(|(id, _)| **id >= 1)
            .map(|(id, floor)| (*id, floor))
    }

    /// Whether there is anything to show in 3D.
    #[must_use]
    pub fn is_multi_floor(&self) -> bool {
        self.floors().next().is_some()
    }

    #[must_use]
    pub fn has_floor(&self, id: FloorId) -> bool {
        id >= 1 && self.floors.contains_key(&id)
    }

    #[must_use]
    pub fn lowest_floor(&self) -> Option<FloorId> {
        self.floors().map(|(id, _)| id).next()
    }

    /// The requested floor when it exists, else the lowest floor, else 1.
    #[must_use]
    pub fn resolve_floor(&self, requested: FloorId) -> FloorId {
        if self.has_floor(requested) {
            return requested;
        }
        self.lowest_floor().unwrap_or(1)
    }

    /// Largest slab footprint over all floors, as `(width, depth)`.
    #[must_use]
    pub fn footprint(&self) -> (f64, f64) {
        self.floors()
            .fold((0.0_f64, 0.0_f64), |(w, d), (_, floor)| (w.max(floor.width), d.max(floor.height_grid)))
    }

    /// Summaries for a floor selector.
    #[must_use]
    pub fn floor_descriptors(&self) -> Vec<FloorDescriptor> {
        self.floors()
            .map(|(id, floor)| FloorDescriptor { id, name: floor.name.clone(), room_count: floor.rooms.len() })
            .collect()
    }
}

/// Floor summary for selector UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorDescriptor {
    pub id: FloorId,
    pub name: String,
    pub room_count: usize,
}

/// One step of the active route. Accepts `[x, y, floor]` or an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "floorId", alias = "floor_id")]
    pub floor: FloorId,
}

impl PathPoint {
    #[must_use]
    pub fn new(x: f64, y: f64, floor: FloorId) -> Self {
        Self { x, y, floor }
    }
}

/// Visibility toggles. Each change triggers a full scene rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggles {
    #[serde(alias = "showConnections")]
    pub show_connections: bool,
    #[serde(alias = "showLabels")]
    pub show_labels: bool,
    #[serde(alias = "showPath")]
    pub show_path: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self { show_connections: true, show_labels: true, show_path: true }
    }
}
