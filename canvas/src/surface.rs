//! Drawing surface abstraction.
//!
//! The painter only talks to a [`Surface`]: the browser's
//! [`web_sys::CanvasRenderingContext2d`] in production and a
//! [`RecordingSurface`] in tests and the CLI. Fallible calls return
//! [`SurfaceError`] so the painter can propagate with `?`.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::ops::{Deref, DerefMut};

use serde::Serialize;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

/// A drawing call failed on the underlying context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("surface call `{call}` failed: {detail}")]
pub struct SurfaceError {
    pub call: &'static str,
    pub detail: String,
}

impl SurfaceError {
    #[must_use]
    pub fn new(call: &'static str, detail: impl Into<String>) -> Self {
        Self { call, detail: detail.into() }
    }
}

/// The subset of the 2D canvas API the painter uses.
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);

    /// Replace the current transform with a pure device-pixel-ratio scale.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the context rejects the transform.
    fn reset_transform(&mut self, dpr: f64) -> Result<(), SurfaceError>;

    /// # Errors
    ///
    /// Returns `Err` if the context rejects the transform.
    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceError>;

    /// # Errors
    ///
    /// Returns `Err` if the context rejects the transform.
    fn scale(&mut self, x: f64, y: f64) -> Result<(), SurfaceError>;

    /// # Errors
    ///
    /// Returns `Err` if the context rejects the transform.
    fn rotate(&mut self, radians: f64) -> Result<(), SurfaceError>;

    /// Multiply the current transform by `[a c e; b d f]`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the context rejects the transform.
    #[allow(clippy::many_single_char_names)]
    fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), SurfaceError>;

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    /// Fill a rectangle with a top-to-bottom linear gradient.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a color stop is rejected.
    fn fill_vertical_gradient(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        top: &str,
        bottom: &str,
    ) -> Result<(), SurfaceError>;

    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_global_alpha(&mut self, alpha: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    /// Add an axis-aligned elliptical arc to the current path.
    ///
    /// # Errors
    ///
    /// Returns `Err` for negative radii.
    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, start: f64, end: f64) -> Result<(), SurfaceError>;

    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: &str);
    fn set_text_baseline(&mut self, baseline: &str);

    /// # Errors
    ///
    /// Returns `Err` if the context rejects the text call.
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError>;
}

// =============================================================
// Scoped transform
// =============================================================

/// Saves the surface state on creation and restores it on drop.
///
/// Anything done through the guard (transforms, styles) is undone on every
/// exit path, including `?` early returns.
pub struct SavedState<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> SavedState<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: Surface + ?Sized> Deref for SavedState<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for SavedState<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for SavedState<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

// =============================================================
// Browser canvas
// =============================================================

fn js_err(call: &'static str) -> impl FnOnce(JsValue) -> SurfaceError {
    move |err| SurfaceError::new(call, format!("{err:?}"))
}

impl Surface for CanvasRenderingContext2d {
    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn reset_transform(&mut self, dpr: f64) -> Result<(), SurfaceError> {
        self.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
            .map_err(js_err("set_transform"))
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceError> {
        CanvasRenderingContext2d::translate(self, x, y).map_err(js_err("translate"))
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), SurfaceError> {
        CanvasRenderingContext2d::scale(self, x, y).map_err(js_err("scale"))
    }

    fn rotate(&mut self, radians: f64) -> Result<(), SurfaceError> {
        CanvasRenderingContext2d::rotate(self, radians).map_err(js_err("rotate"))
    }

    fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), SurfaceError> {
        CanvasRenderingContext2d::transform(self, a, b, c, d, e, f).map_err(js_err("transform"))
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        CanvasRenderingContext2d::clear_rect(self, x, y, w, h);
    }

    fn fill_vertical_gradient(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        top: &str,
        bottom: &str,
    ) -> Result<(), SurfaceError> {
        let gradient = self.create_linear_gradient(x, y, x, y + h);
        gradient
            .add_color_stop(0.0, top)
            .map_err(js_err("add_color_stop"))?;
        gradient
            .add_color_stop(1.0, bottom)
            .map_err(js_err("add_color_stop"))?;
        self.set_fill_style_canvas_gradient(&gradient);
        CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
        Ok(())
    }

    fn set_fill_style(&mut self, color: &str) {
        self.set_fill_style_str(color);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        CanvasRenderingContext2d::set_line_width(self, width);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        CanvasRenderingContext2d::set_global_alpha(self, alpha);
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn close_path(&mut self) {
        CanvasRenderingContext2d::close_path(self);
    }

    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }

    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
    }

    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, start: f64, end: f64) -> Result<(), SurfaceError> {
        CanvasRenderingContext2d::ellipse(self, x, y, rx, ry, 0.0, start, end).map_err(js_err("ellipse"))
    }

    fn set_font(&mut self, font: &str) {
        CanvasRenderingContext2d::set_font(self, font);
    }

    fn set_text_align(&mut self, align: &str) {
        CanvasRenderingContext2d::set_text_align(self, align);
    }

    fn set_text_baseline(&mut self, baseline: &str) {
        CanvasRenderingContext2d::set_text_baseline(self, baseline);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError> {
        CanvasRenderingContext2d::fill_text(self, text, x, y).map_err(js_err("fill_text"))
    }
}

// =============================================================
// Recording surface
// =============================================================

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCall {
    Save,
    Restore,
    ResetTransform { dpr: f64 },
    Translate { x: f64, y: f64 },
    Scale { x: f64, y: f64 },
    Rotate { radians: f64 },
    Transform { a: f64, b: f64, c: f64, d: f64, e: f64, f: f64 },
    ClearRect { x: f64, y: f64, w: f64, h: f64 },
    VerticalGradient { x: f64, y: f64, w: f64, h: f64, top: String, bottom: String },
    FillStyle { color: String },
    StrokeStyle { color: String },
    LineWidth { width: f64 },
    GlobalAlpha { alpha: f64 },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    ClosePath,
    Fill,
    Stroke,
    FillRect { x: f64, y: f64, w: f64, h: f64 },
    Ellipse { x: f64, y: f64, rx: f64, ry: f64 },
    Font { font: String },
    TextAlign { align: String },
    TextBaseline { baseline: String },
    FillText { text: String, x: f64, y: f64 },
}

impl DrawCall {
    /// Whether this call changes the coordinate transform.
    #[must_use]
    pub fn is_transform(&self) -> bool {
        matches!(self, Self::Translate { .. } | Self::Scale { .. } | Self::Rotate { .. } | Self::Transform { .. })
    }
}

/// In-memory surface that records every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    depth: usize,
    max_depth: usize,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current save-stack depth; zero when every save was restored.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Deepest save-stack depth reached.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[must_use]
    pub fn has_transform(&self) -> bool {
        self.calls.iter().any(DrawCall::is_transform)
    }

    /// All text drawn, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All fill colors set, in order.
    #[must_use]
    pub fn fill_styles(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillStyle { color } => Some(color.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.depth = 0;
        self.max_depth = 0;
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.calls.push(DrawCall::Restore);
    }

    fn reset_transform(&mut self, dpr: f64) -> Result<(), SurfaceError> {
        self.calls.push(DrawCall::ResetTransform { dpr });
        Ok(())
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.calls.push(DrawCall::Translate { x, y });
        Ok(())
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.calls.push(DrawCall::Scale { x, y });
        Ok(())
    }

    fn rotate(&mut self, radians: f64) -> Result<(), SurfaceError> {
        self.calls.push(DrawCall::Rotate { radians });
        Ok(())
    }

    fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), SurfaceError> {
        self.calls.push(DrawCall::Transform { a, b, c, d, e, f });
        Ok(())
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.calls.push(DrawCall::ClearRect { x, y, w, h });
    }

    fn fill_vertical_gradient(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        top: &str,
        bottom: &str,
    ) -> Result<(), SurfaceError> {
        self.calls.push(DrawCall::VerticalGradient { x, y, w, h, top: top.to_owned(), bottom: bottom.to_owned() });
        Ok(())
    }

    fn set_fill_style(&mut self, color: &str) {
        self.calls.push(DrawCall::FillStyle { color: color.to_owned() });
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.calls.push(DrawCall::StrokeStyle { color: color.to_owned() });
    }

    fn set_line_width(&mut self, width: f64) {
        self.calls.push(DrawCall::LineWidth { width });
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.calls.push(DrawCall::GlobalAlpha { alpha });
    }

    fn begin_path(&mut self) {
        self.calls.push(DrawCall::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.calls.push(DrawCall::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.calls.push(DrawCall::LineTo { x, y });
    }

    fn close_path(&mut self) {
        self.calls.push(DrawCall::ClosePath);
    }

    fn fill(&mut self) {
        self.calls.push(DrawCall::Fill);
    }

    fn stroke(&mut self) {
        self.calls.push(DrawCall::Stroke);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.calls.push(DrawCall::FillRect { x, y, w, h });
    }

    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, _start: f64, _end: f64) -> Result<(), SurfaceError> {
        if rx < 0.0 || ry < 0.0 {
            return Err(SurfaceError::new("ellipse", "negative radius"));
        }
        self.calls.push(DrawCall::Ellipse { x, y, rx, ry });
        Ok(())
    }

    fn set_font(&mut self, font: &str) {
        self.calls.push(DrawCall::Font { font: font.to_owned() });
    }

    fn set_text_align(&mut self, align: &str) {
        self.calls.push(DrawCall::TextAlign { align: align.to_owned() });
    }

    fn set_text_baseline(&mut self, baseline: &str) {
        self.calls.push(DrawCall::TextBaseline { baseline: baseline.to_owned() });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.calls.push(DrawCall::FillText { text: text.to_owned(), x, y });
        Ok(())
    }
}
