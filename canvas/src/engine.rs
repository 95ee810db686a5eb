use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Point, Preset};
use crate::config::RendererConfig;
use crate::input::{AutoRotate, Button, InputState, PointerId, WheelDelta};
use crate::map::{FloorDescriptor, FloorId, MapDescription, PathPoint, Toggles};
use crate::render::{self, FrameParams};
use crate::scene::{self, RenderObject};
use crate::surface::{Surface, SurfaceError};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from engine handlers for the host to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The surface should be repainted.
    RenderNeeded,
    /// The viewer explicitly selected a floor.
    FloorChanged(FloorId),
    /// Auto-rotation ended; the host should drop its timer.
    AutoRotateStopped,
}

/// Everything the scene is built from. A change to any field rebuilds the
/// render list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneInputs {
    pub map: MapDescription,
    #[serde(alias = "currentFloor")]
    pub current_floor: FloorId,
    pub path: Vec<PathPoint>,
    pub toggles: Toggles,
}

/// Where the instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Created; waiting for a drawable surface.
    #[default]
    Pending,
    /// Surface acquired; paints go through.
    Ready,
    /// Torn down; every handler is a no-op.
    Destroyed,
}

/// Viewport size in CSS pixels plus device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0, dpr: 1.0 }
    }
}

/// Core renderer state: all logic that does not depend on the browser.
///
/// Separated from [`crate::web::IsoCanvas`] so it can be tested without
/// WASM/browser dependencies. The host feeds it events and clock readings and
/// acts on the returned [`Action`]s.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub inputs: SceneInputs,
    pub config: RendererConfig,
    pub camera: Camera,
    pub input: InputState,
    pub viewport: Viewport,
    objects: Vec<RenderObject>,
    auto_rotate: Option<AutoRotate>,
    show_hint: bool,
    lifecycle: Lifecycle,
}

impl EngineCore {
    /// Build the initial scene. Nothing is painted until
    /// [`mark_surface_ready`](Self::mark_surface_ready).
    #[must_use]
    pub fn create(inputs: SceneInputs, config: RendererConfig) -> Self {
        let show_hint = config.show_hint;
        let mut core = Self {
            inputs,
            config,
            camera: Camera::default(),
            input: InputState::default(),
            viewport: Viewport::default(),
            objects: Vec::new(),
            auto_rotate: None,
            show_hint,
            lifecycle: Lifecycle::Pending,
        };
        core.rebuild();
        core
    }

    fn is_destroyed(&self) -> bool {
        self.lifecycle == Lifecycle::Destroyed
    }

    fn rebuild(&mut self) {
        self.inputs.current_floor = self.inputs.map.resolve_floor(self.inputs.current_floor);
        self.objects = scene::build(
            &self.inputs.map,
            self.inputs.current_floor,
            &self.inputs.path,
            self.inputs.toggles,
        );
    }

    // --- Lifecycle ---

    /// Record that a drawable surface of the given size is available.
    pub fn mark_surface_ready(&mut self, width: f64, height: f64, dpr: f64) -> Vec<Action> {
        if self.is_destroyed() {
            return vec![];
        }
        self.viewport = Viewport { width, height, dpr };
        self.lifecycle = Lifecycle::Ready;
        log::info!("surface ready: {width}x{height} @{dpr}, {} objects", self.objects.len());
        vec![Action::RenderNeeded]
    }

    /// Update viewport dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width: f64, height: f64, dpr: f64) -> Vec<Action> {
        if self.is_destroyed() {
            return vec![];
        }
        self.viewport = Viewport { width, height, dpr };
        vec![Action::RenderNeeded]
    }

    /// Replace the scene inputs and rebuild.
    pub fn on_inputs_changed(&mut self, inputs: SceneInputs) -> Vec<Action> {
        if self.is_destroyed() {
            return vec![];
        }
        self.inputs = inputs;
        self.rebuild();
        vec![Action::RenderNeeded]
    }

    /// Stop everything. Later events and paints are ignored.
    pub fn destroy(&mut self) -> Vec<Action> {
        let was_rotating = self.auto_rotate.take().is_some();
        self.lifecycle = Lifecycle::Destroyed;
        self.input = InputState::Idle;
        self.objects.clear();
        log::debug!("renderer destroyed");
        if was_rotating { vec![Action::AutoRotateStopped] } else { vec![] }
    }

    // --- Render ---

    /// Per-paint parameters for the current state.
    #[must_use]
    pub fn frame_params(&self) -> FrameParams {
        FrameParams {
            width: self.viewport.width,
            height: self.viewport.height,
            dpr: self.viewport.dpr,
            current_floor: self.inputs.current_floor,
            footprint: self.inputs.map.footprint(),
            cell_px: self.config.cell_px,
            show_labels: self.inputs.toggles.show_labels,
            show_connections: self.inputs.toggles.show_connections,
            show_hint: self.show_hint,
            debug_overlay: self.config.debug_overlay,
        }
    }

    /// Paint the cached scene. Returns `Ok(false)` without drawing until the
    /// surface is ready, and after destroy.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a surface call fails.
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<bool, SurfaceError> {
        if self.lifecycle != Lifecycle::Ready {
            return Ok(false);
        }
        render::draw(surface, &self.objects, &self.camera, &self.frame_params())?;
        Ok(true)
    }

    // --- Gestures ---

    /// Primary contact starts a rotation and retires the first-use hint.
    /// Further contacts are ignored until that pointer is released.
    pub fn on_pointer_down(&mut self, pointer: PointerId, screen_pt: Point, button: Button) -> Vec<Action> {
        if self.is_destroyed() || button != Button::Primary || !self.input.is_idle() {
            return vec![];
        }
        self.input = InputState::Rotating { pointer_id: pointer, last_screen: screen_pt };
        if self.show_hint {
            self.show_hint = false;
            return vec![Action::RenderNeeded];
        }
        vec![]
    }

    pub fn on_pointer_move(&mut self, pointer: PointerId, screen_pt: Point) -> Vec<Action> {
        let Some(delta) = self.input.track(pointer, screen_pt) else {
            return vec![];
        };
        self.camera.apply_drag(delta.x, delta.y);
        vec![Action::RenderNeeded]
    }

    /// Only the contact that started the gesture ends it.
    pub fn on_pointer_up(&mut self, pointer: PointerId, _screen_pt: Point) -> Vec<Action> {
        if self.input.is_tracking(pointer) {
            self.input = InputState::Idle;
        }
        vec![]
    }

    /// Wheel adjusts height in any gesture state.
    pub fn on_wheel(&mut self, delta: WheelDelta) -> Vec<Action> {
        if self.is_destroyed() {
            return vec![];
        }
        self.camera.apply_wheel(delta.dy);
        vec![Action::RenderNeeded]
    }

    // --- Commands ---

    pub fn apply_preset(&mut self, preset: Preset) -> Vec<Action> {
        if self.is_destroyed() {
            return vec![];
        }
        self.camera.apply_preset(preset);
        log::debug!("camera preset {preset}");
        vec![Action::RenderNeeded]
    }

    /// Switch to `floor_id`, refocus the camera on it and notify the host.
    /// Unknown floors are ignored.
    pub fn select_floor(&mut self, floor_id: FloorId) -> Vec<Action> {
        if self.is_destroyed() {
            return vec![];
        }
        if !self.inputs.map.has_floor(floor_id) {
            log::warn!("select_floor: floor {floor_id} is not in the map");
            return vec![];
        }
        self.inputs.current_floor = floor_id;
        self.camera.refocus_floor(floor_id);
        self.rebuild();
        vec![Action::RenderNeeded, Action::FloorChanged(floor_id)]
    }

    pub fn set_toggles(&mut self, toggles: Toggles) -> Vec<Action> {
        if self.is_destroyed() {
            return vec![];
        }
        self.inputs.toggles = toggles;
        self.rebuild();
        vec![Action::RenderNeeded]
    }

    // --- Auto-rotate ---

    /// Begin (or restart) a timed rotation. The host schedules ticks every
    /// `config.auto_rotate_period_ms`.
    pub fn start_auto_rotate(&mut self, now_ms: f64) {
        if self.is_destroyed() {
            return;
        }
        self.auto_rotate = Some(AutoRotate::new(
            now_ms,
            f64::from(self.config.auto_rotate_duration_ms),
            self.config.auto_rotate_step,
        ));
    }

    pub fn stop_auto_rotate(&mut self) -> Vec<Action> {
        if self.auto_rotate.take().is_some() {
            vec![Action::AutoRotateStopped]
        } else {
            vec![]
        }
    }

    /// One timer tick. Advances the angle only while no gesture is active.
    pub fn on_auto_rotate_tick(&mut self, now_ms: f64) -> Vec<Action> {
        let Some(spin) = self.auto_rotate else {
            return vec![];
        };
        if spin.expired(now_ms) {
            self.auto_rotate = None;
            return vec![Action::AutoRotateStopped];
        }
        if !self.input.is_idle() {
            return vec![];
        }
        self.camera.angle += spin.step;
        vec![Action::RenderNeeded]
    }

    // --- Queries ---

    #[must_use]
    pub fn is_auto_rotating(&self) -> bool {
        self.auto_rotate.is_some()
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[must_use]
    pub fn show_hint(&self) -> bool {
        self.show_hint
    }

    #[must_use]
    pub fn current_floor(&self) -> FloorId {
        self.inputs.current_floor
    }

    /// The cached render list.
    #[must_use]
    pub fn objects(&self) -> &[RenderObject] {
        &self.objects
    }

    #[must_use]
    pub fn floor_descriptors(&self) -> Vec<FloorDescriptor> {
        self.inputs.map.floor_descriptors()
    }
}
