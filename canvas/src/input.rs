//! Input model: pointer buttons, wheel deltas, and the gesture state machine.
//!
//! `InputState` is the gesture tracked between pointer-down and pointer-up.
//! `AutoRotate` is the timed spin started by the host; it only advances the
//! camera while no gesture is active.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// DOM `PointerEvent.pointerId`; mice report a single fixed id.
pub type PointerId = i32;

/// Vertical wheel / trackpad scroll delta. Horizontal scroll has no camera
/// mapping and is not carried.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// The user is orbiting the camera by dragging.
    Rotating {
        /// The contact that started the gesture; other pointers are ignored.
        pointer_id: PointerId,
        /// Screen position of the previous pointer event.
        last_screen: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether `pointer` is the contact driving the current gesture.
    #[must_use]
    pub fn is_tracking(&self, pointer: PointerId) -> bool {
        matches!(self, Self::Rotating { pointer_id, .. } if *pointer_id == pointer)
    }

    /// Advance a rotation gesture to `screen`, returning the delta since the
    /// previous event. `None` when idle or when `pointer` did not start the
    /// gesture.
    pub fn track(&mut self, pointer: PointerId, screen: Point) -> Option<Point> {
        match self {
            Self::Rotating { pointer_id, last_screen } if *pointer_id == pointer => {
                let delta = Point::new(screen.x - last_screen.x, screen.y - last_screen.y);
                *last_screen = screen;
                Some(delta)
            }
            _ => None,
        }
    }
}

/// A running auto-rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoRotate {
    /// Host clock reading when the rotation started.
    pub started_at_ms: f64,
    /// Rotation ends once this much time has passed.
    pub duration_ms: f64,
    /// Angle added per tick.
    pub step: f64,
}

impl AutoRotate {
    #[must_use]
    pub fn new(started_at_ms: f64, duration_ms: f64, step: f64) -> Self {
        Self { started_at_ms, duration_ms, step }
    }

    /// Whether the rotation has run its course at `now_ms`.
    #[must_use]
    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.started_at_ms >= self.duration_ms
    }
}
