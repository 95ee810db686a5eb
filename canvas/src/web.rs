//! Browser host: binds an [`EngineCore`] to a `<canvas>` element.
//!
//! Owns the 2D context, the DOM listeners and the auto-rotate timer, and
//! turns the core's [`Action`]s into paints, host callbacks and timer
//! cancellation. Everything runs on the browser's event loop; shared state
//! lives behind `Rc<RefCell<_>>` and no borrow is held across a dispatch.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::{Interval, Timeout};
use js_sys::Date;
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, PointerEvent, WheelEvent};

use crate::camera::{Point, Preset};
use crate::config::RendererConfig;
use crate::engine::{Action, EngineCore, SceneInputs};
use crate::input::{Button, WheelDelta};
use crate::map::{FloorDescriptor, FloorId, Toggles};

/// Why the renderer could not acquire a drawable surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    #[error("no canvas element was provided")]
    NoCanvas,
    #[error("2d context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("canvas has no measurable size ({width}x{height})")]
    Unmeasurable { width: i32, height: i32 },
    #[error("failed to attach `{event}` listener: {detail}")]
    Listener { event: &'static str, detail: String },
}

/// Route `log` records to the browser console. Returns false when a logger
/// was already installed.
pub fn init_logging(level: log::Level) -> bool {
    console_log::init_with_level(level).is_ok()
}

type Listener = Closure<dyn FnMut(Event)>;

struct Shared {
    core: RefCell<EngineCore>,
    context: RefCell<Option<CanvasRenderingContext2d>>,
    timer: RefCell<Option<Interval>>,
    on_floor_changed: RefCell<Box<dyn FnMut(FloorId)>>,
}

/// A renderer instance attached to one canvas element.
pub struct IsoCanvas {
    shared: Rc<Shared>,
    canvas: Option<HtmlCanvasElement>,
    listeners: Vec<(&'static str, Listener)>,
}

impl IsoCanvas {
    /// Build the scene and schedule surface acquisition for the next tick.
    ///
    /// If the surface cannot be acquired the error is logged and the
    /// instance stays un-painted; acquisition is not retried.
    pub fn create(
        canvas: Option<HtmlCanvasElement>,
        inputs: SceneInputs,
        config: RendererConfig,
        on_floor_changed: Box<dyn FnMut(FloorId)>,
    ) -> Self {
        let shared = Rc::new(Shared {
            core: RefCell::new(EngineCore::create(inputs, config)),
            context: RefCell::new(None),
            timer: RefCell::new(None),
            on_floor_changed: RefCell::new(on_floor_changed),
        });

        let mut host = Self { shared, canvas, listeners: Vec::new() };

        let Some(canvas) = host.canvas.clone() else {
            log::error!("renderer init failed: {}", InitError::NoCanvas);
            return host;
        };
        if let Err(err) = host.attach_listeners(&canvas) {
            log::error!("renderer init failed: {err}");
            return host;
        }

        let weak = Rc::downgrade(&host.shared);
        Timeout::new(0, move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            match acquire(&canvas) {
                Ok((context, width, height, dpr)) => {
                    *shared.context.borrow_mut() = Some(context);
                    let actions = shared.core.borrow_mut().mark_surface_ready(width, height, dpr);
                    dispatch(&shared, actions);
                }
                Err(err) => log::error!("renderer init failed: {err}"),
            }
        })
        .forget();

        host
    }

    fn attach_listeners(&mut self, canvas: &HtmlCanvasElement) -> Result<(), InitError> {
        self.listen(canvas, "pointerdown", |core, event| {
            let event = event.dyn_ref::<PointerEvent>()?;
            let button = Button::from_dom(event.button());
            Some(core.on_pointer_down(event.pointer_id(), offset(event), button))
        })?;
        self.listen(canvas, "pointermove", |core, event| {
            let event = event.dyn_ref::<PointerEvent>()?;
            Some(core.on_pointer_move(event.pointer_id(), offset(event)))
        })?;
        for name in ["pointerup", "pointercancel", "pointerleave"] {
            self.listen(canvas, name, |core, event| {
                let event = event.dyn_ref::<PointerEvent>()?;
                Some(core.on_pointer_up(event.pointer_id(), offset(event)))
            })?;
        }
        self.listen(canvas, "wheel", |core, event| {
            let event = event.dyn_ref::<WheelEvent>()?;
            event.prevent_default();
            Some(core.on_wheel(WheelDelta { dy: event.delta_y() }))
        })?;
        Ok(())
    }

    fn listen<F>(&mut self, canvas: &HtmlCanvasElement, event: &'static str, handler: F) -> Result<(), InitError>
    where
        F: Fn(&mut EngineCore, &Event) -> Option<Vec<Action>> + 'static,
    {
        let shared = Rc::clone(&self.shared);
        let closure: Listener = Closure::new(move |ev: Event| {
            let actions = handler(&mut shared.core.borrow_mut(), &ev);
            if let Some(actions) = actions {
                dispatch(&shared, actions);
            }
        });
        canvas
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|err| InitError::Listener { event, detail: describe(&err) })?;
        self.listeners.push((event, closure));
        Ok(())
    }

    // --- Host API ---

    pub fn on_inputs_changed(&self, inputs: SceneInputs) {
        let actions = self.shared.core.borrow_mut().on_inputs_changed(inputs);
        dispatch(&self.shared, actions);
    }

    pub fn select_floor(&self, floor_id: FloorId) {
        let actions = self.shared.core.borrow_mut().select_floor(floor_id);
        dispatch(&self.shared, actions);
    }

    pub fn apply_preset(&self, preset: Preset) {
        let actions = self.shared.core.borrow_mut().apply_preset(preset);
        dispatch(&self.shared, actions);
    }

    pub fn set_toggles(&self, toggles: Toggles) {
        let actions = self.shared.core.borrow_mut().set_toggles(toggles);
        dispatch(&self.shared, actions);
    }

    /// Re-measure the canvas after a layout change.
    pub fn resize(&self) {
        let Some(canvas) = self.canvas.as_ref() else {
            return;
        };
        match measure(canvas) {
            Ok((width, height, dpr)) => {
                size_backing_store(canvas, width, height, dpr);
                let actions = self.shared.core.borrow_mut().set_viewport(width, height, dpr);
                dispatch(&self.shared, actions);
            }
            Err(err) => log::warn!("resize skipped: {err}"),
        }
    }

    /// Start the timed spin. Ticks run every `auto_rotate_period_ms` until
    /// the configured duration elapses or [`stop_auto_rotate`](Self::stop_auto_rotate).
    pub fn start_auto_rotate(&self) {
        let period = {
            let mut core = self.shared.core.borrow_mut();
            core.start_auto_rotate(Date::now());
            if !core.is_auto_rotating() {
                return;
            }
            core.config.auto_rotate_period_ms
        };
        if self.shared.timer.borrow().is_some() {
            return;
        }

        let weak = Rc::downgrade(&self.shared);
        let tick = Interval::new(period, move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let actions = shared.core.borrow_mut().on_auto_rotate_tick(Date::now());
            dispatch(&shared, actions);
        });
        *self.shared.timer.borrow_mut() = Some(tick);
    }

    pub fn stop_auto_rotate(&self) {
        let actions = self.shared.core.borrow_mut().stop_auto_rotate();
        dispatch(&self.shared, actions);
    }

    #[must_use]
    pub fn floor_descriptors(&self) -> Vec<FloorDescriptor> {
        self.shared.core.borrow().floor_descriptors()
    }

    /// Detach listeners, cancel the timer and release the context.
    pub fn destroy(&mut self) {
        self.shared.core.borrow_mut().destroy();
        self.shared.timer.borrow_mut().take();
        self.shared.context.borrow_mut().take();
        if let Some(canvas) = self.canvas.as_ref() {
            for (event, listener) in &self.listeners {
                if let Err(err) = canvas.remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref()) {
                    log::warn!("failed to detach `{event}` listener: {}", describe(&err));
                }
            }
        }
        self.listeners.clear();
    }
}

impl Drop for IsoCanvas {
    fn drop(&mut self) {
        self.destroy();
    }
}

// =============================================================
// Dispatch
// =============================================================

fn dispatch(shared: &Rc<Shared>, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::RenderNeeded => paint(shared),
            Action::FloorChanged(floor_id) => (*shared.on_floor_changed.borrow_mut())(floor_id),
            Action::AutoRotateStopped => cancel_timer(shared),
        }
    }
}

fn paint(shared: &Shared) {
    let core = shared.core.borrow();
    let mut context = shared.context.borrow_mut();
    let Some(context) = context.as_mut() else {
        return;
    };
    if let Err(err) = core.paint(context) {
        log::warn!("paint failed: {err}");
    }
}

/// The stop may come from inside the timer's own callback, so the
/// `Interval` is dropped on the next tick instead.
fn cancel_timer(shared: &Rc<Shared>) {
    let weak: Weak<Shared> = Rc::downgrade(shared);
    Timeout::new(0, move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        if !shared.core.borrow().is_auto_rotating() {
            shared.timer.borrow_mut().take();
        }
    })
    .forget();
}

// =============================================================
// Surface acquisition
// =============================================================

fn acquire(canvas: &HtmlCanvasElement) -> Result<(CanvasRenderingContext2d, f64, f64, f64), InitError> {
    let (width, height, dpr) = measure(canvas)?;
    size_backing_store(canvas, width, height, dpr);
    let context = canvas
        .get_context("2d")
        .map_err(|err| InitError::ContextUnavailable(describe(&err)))?
        .ok_or_else(|| InitError::ContextUnavailable("get_context returned null".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| InitError::ContextUnavailable("not a CanvasRenderingContext2d".into()))?;
    Ok((context, width, height, dpr))
}

fn measure(canvas: &HtmlCanvasElement) -> Result<(f64, f64, f64), InitError> {
    let (width, height) = (canvas.client_width(), canvas.client_height());
    if width <= 0 || height <= 0 {
        return Err(InitError::Unmeasurable { width, height });
    }
    let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio()).max(1.0);
    Ok((f64::from(width), f64::from(height), dpr))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn size_backing_store(canvas: &HtmlCanvasElement, width: f64, height: f64, dpr: f64) {
    canvas.set_width((width * dpr).round() as u32);
    canvas.set_height((height * dpr).round() as u32);
}

fn offset(event: &PointerEvent) -> Point {
    Point::new(f64::from(event.offset_x()), f64::from(event.offset_y()))
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
