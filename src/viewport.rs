//! Viewport: zoom, pan, grid, and client ↔ content coordinate conversion.
//!
//! Client space is CSS pixels relative to the page; the canvas element sits
//! at [`CanvasGeometry::offset_x`] / [`CanvasGeometry::offset_y`] within it.
//! Content space is the drawing's own coordinate system:
//!
//! ```text
//! content = (client - offset) / zoom - pan
//! client  = (content + pan) * zoom + offset
//! ```
//!
//! `zoom` always stays inside `[min_zoom, max_zoom]`. Operations that need
//! the canvas (fitting, visible bounds) quietly do nothing until a
//! [`CanvasGeometry`] has been supplied.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use tracing::{debug, warn};

use crate::animation::ZoomAnimation;
use crate::consts::{
    DEFAULT_GRID_SIZE, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_ZOOM_DURATION_MS, FIT_BOUNDS_PADDING,
    FIT_WINDOW_PADDING_PX,
};
use crate::geom::{Bounds, Point};

/// Placement of the canvas element and the size of its visible container, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    /// Left edge of the canvas element in client space.
    pub offset_x: f64,
    /// Top edge of the canvas element in client space.
    pub offset_y: f64,
    /// Width of the scrolling container that shows the canvas.
    pub container_width: f64,
    /// Height of the scrolling container that shows the canvas.
    pub container_height: f64,
}

impl CanvasGeometry {
    #[must_use]
    pub fn new(offset_x: f64, offset_y: f64, container_width: f64, container_height: f64) -> Self {
        Self { offset_x, offset_y, container_width, container_height }
    }

    fn is_valid(&self) -> bool {
        self.offset_x.is_finite()
            && self.offset_y.is_finite()
            && self.container_width.is_finite()
            && self.container_height.is_finite()
            && self.container_width >= 0.0
            && self.container_height >= 0.0
    }
}

/// Natural size of the background image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

/// Zoom/pan/grid state of the editing surface.
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    min_zoom: f64,
    max_zoom: f64,
    snap_to_grid: bool,
    grid_size: f64,
    user_set_zoom: bool,
    /// Last client-space pointer position while a pan is in progress.
    pan_anchor: Option<Point>,
    animation: ZoomAnimation,
    canvas: Option<CanvasGeometry>,
    visible: Option<Bounds>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            snap_to_grid: false,
            grid_size: DEFAULT_GRID_SIZE,
            user_set_zoom: false,
            pan_anchor: None,
            animation: ZoomAnimation::Idle,
            canvas: None,
            visible: None,
        }
    }
}

impl Viewport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom as a rounded percentage, as shown in the status bar.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn zoom_percent(&self) -> i32 {
        (self.zoom * 100.0).round() as i32
    }

    #[must_use]
    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    #[must_use]
    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    #[must_use]
    pub fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    #[must_use]
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    /// Whether the current zoom came from an explicit user request rather than a fit.
    #[must_use]
    pub fn user_set_zoom(&self) -> bool {
        self.user_set_zoom
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_animating()
    }

    #[must_use]
    pub fn canvas(&self) -> Option<CanvasGeometry> {
        self.canvas
    }

    /// Visible content-space rectangle as of the last [`Viewport::update_viewport_bounds`].
    #[must_use]
    pub fn viewport_bounds(&self) -> Option<Bounds> {
        self.visible
    }

    // --- Canvas wiring ---

    /// Supply (or clear) the canvas placement. Invalid geometry is treated as absent.
    pub fn set_canvas_geometry(&mut self, canvas: Option<CanvasGeometry>) {
        self.canvas = canvas.filter(CanvasGeometry::is_valid);
        self.update_viewport_bounds();
    }

    // --- Conversions ---

    /// Client point to content point, snapped to the grid when grid snapping is on.
    #[must_use]
    pub fn client_to_content(&self, client_x: f64, client_y: f64) -> Option<Point> {
        let p = self.client_to_content_raw(client_x, client_y)?;
        Some(if self.snap_to_grid { self.snap_point_to_grid(p) } else { p })
    }

    /// Client point to content point without grid snapping.
    #[must_use]
    pub fn client_to_content_raw(&self, client_x: f64, client_y: f64) -> Option<Point> {
        if !client_x.is_finite() || !client_y.is_finite() {
            return None;
        }
        let (ox, oy) = self.offset();
        Some(Point::new((client_x - ox) / self.zoom - self.pan_x, (client_y - oy) / self.zoom - self.pan_y))
    }

    /// Content point to client point; inverse of [`Viewport::client_to_content_raw`].
    #[must_use]
    pub fn content_to_client(&self, x: f64, y: f64) -> Option<Point> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let (ox, oy) = self.offset();
        Some(Point::new((x + self.pan_x) * self.zoom + ox, (y + self.pan_y) * self.zoom + oy))
    }

    fn offset(&self) -> (f64, f64) {
        self.canvas.map_or((0.0, 0.0), |c| (c.offset_x, c.offset_y))
    }

    /// Round a content point to the nearest grid intersection.
    #[must_use]
    pub fn snap_point_to_grid(&self, p: Point) -> Point {
        Point::new(snap_value(p.x, self.grid_size), snap_value(p.y, self.grid_size))
    }

    // --- Zoom ---

    fn clamp_zoom(&self, z: f64) -> f64 {
        z.clamp(self.min_zoom, self.max_zoom)
    }

    /// Set the zoom explicitly, clamped to the limits. Cancels any animation.
    ///
    /// Returns `false` when the input is not finite.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() {
            warn!(zoom, "ignoring non-finite zoom");
            return false;
        }
        self.animation = ZoomAnimation::Idle;
        self.zoom = self.clamp_zoom(zoom);
        self.user_set_zoom = true;
        self.update_viewport_bounds();
        true
    }

    /// Change the zoom limits and re-clamp the current zoom.
    ///
    /// Rejects non-finite, non-positive, or inverted limits and keeps the old ones.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) -> bool {
        let valid = min_zoom.is_finite() && max_zoom.is_finite() && min_zoom > 0.0 && min_zoom <= max_zoom;
        if !valid {
            warn!(min_zoom, max_zoom, "ignoring invalid zoom limits");
            return false;
        }
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.clamp_zoom(self.zoom);
        if let ZoomAnimation::Animating { start_zoom, target_zoom, start_ms, duration_ms } = self.animation {
            self.animation = ZoomAnimation::Animating {
                start_zoom: self.clamp_zoom(start_zoom),
                target_zoom: self.clamp_zoom(target_zoom),
                start_ms,
                duration_ms,
            };
        }
        self.update_viewport_bounds();
        true
    }

    /// Change the zoom by `delta`. When `anchor` (client space) is given the
    /// content point under it stays where it is on screen.
    pub fn zoom_by(&mut self, delta: f64, anchor: Option<Point>) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let new_zoom = self.clamp_zoom(self.zoom + delta);
        let anchored = anchor
            .filter(|a| a.is_finite())
            .and_then(|a| self.client_to_content_raw(a.x, a.y).map(|content| (a, content)));
        let (ox, oy) = self.offset();
        self.animation = ZoomAnimation::Idle;
        self.zoom = new_zoom;
        self.user_set_zoom = true;
        if let Some((a, content)) = anchored {
            self.pan_x = (a.x - ox) / new_zoom - content.x;
            self.pan_y = (a.y - oy) / new_zoom - content.y;
        }
        self.update_viewport_bounds();
        true
    }

    /// Start an eased zoom towards `target`. Returns `false` when already there.
    pub fn smooth_zoom_to(&mut self, target: f64, duration_ms: Option<f64>, now_ms: f64) -> bool {
        if !target.is_finite() {
            return false;
        }
        let target = self.clamp_zoom(target);
        if (target - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        let duration = duration_ms.unwrap_or(DEFAULT_ZOOM_DURATION_MS);
        self.animation = ZoomAnimation::start(self.zoom, target, now_ms, duration);
        self.user_set_zoom = true;
        debug!(from = self.zoom, to = target, duration, "zoom animation started");
        true
    }

    /// Zoom the running animation would show at `now_ms`, or the current zoom when idle.
    #[must_use]
    pub fn zoom_at(&self, now_ms: f64) -> f64 {
        self.animation.value_at(now_ms).unwrap_or(self.zoom)
    }

    /// Advance the zoom animation to `now_ms`. Returns `true` while a frame was produced.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(z) = self.animation.value_at(now_ms) else {
            return false;
        };
        self.zoom = self.clamp_zoom(z);
        if self.animation.finished_at(now_ms) {
            self.animation = ZoomAnimation::Idle;
        }
        self.update_viewport_bounds();
        true
    }

    /// Stop any running zoom animation where it is.
    pub fn stop_animation(&mut self) {
        self.animation = ZoomAnimation::Idle;
    }

    /// Fit the background image into the container, minus a fixed padding, and reset pan.
    pub fn fit_to_window(&mut self, image: Option<ImageSize>) -> bool {
        let (Some(image), Some(canvas)) = (image, self.canvas) else {
            return false;
        };
        if !(image.width > 0.0 && image.height > 0.0 && image.width.is_finite() && image.height.is_finite()) {
            return false;
        }
        let usable_w = (canvas.container_width - FIT_WINDOW_PADDING_PX).max(1.0);
        let usable_h = (canvas.container_height - FIT_WINDOW_PADDING_PX).max(1.0);
        let scale = (usable_w / image.width).min(usable_h / image.height);
        self.animation = ZoomAnimation::Idle;
        self.zoom = self.clamp_zoom(scale);
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        self.user_set_zoom = false;
        self.update_viewport_bounds();
        debug!(zoom = self.zoom, "fit to window");
        true
    }

    /// Fit a content-space box plus `padding` on every side and centre it in the container.
    pub fn zoom_to_fit_bounds(&mut self, bounds: Option<&Bounds>, padding: Option<f64>) -> bool {
        let (Some(b), Some(canvas)) = (bounds, self.canvas) else {
            return false;
        };
        let padding = padding.filter(|p| p.is_finite() && *p >= 0.0).unwrap_or(FIT_BOUNDS_PADDING);
        let content_w = b.width + padding * 2.0;
        let content_h = b.height + padding * 2.0;
        if !(content_w > 0.0 && content_h > 0.0 && content_w.is_finite() && content_h.is_finite()) {
            return false;
        }
        if canvas.container_width <= 0.0 || canvas.container_height <= 0.0 {
            return false;
        }
        let scale = (canvas.container_width / content_w).min(canvas.container_height / content_h);
        let zoom = self.clamp_zoom(scale);
        self.animation = ZoomAnimation::Idle;
        self.zoom = zoom;
        self.pan_x = canvas.container_width / (2.0 * zoom) - b.center_x;
        self.pan_y = canvas.container_height / (2.0 * zoom) - b.center_y;
        self.user_set_zoom = false;
        self.update_viewport_bounds();
        debug!(zoom, "zoom to fit bounds");
        true
    }

    /// Recompute the visible content rectangle. Keeps the previous value without a canvas.
    pub fn update_viewport_bounds(&mut self) {
        let Some(canvas) = self.canvas else {
            return;
        };
        self.visible = Some(Bounds::from_xywh(
            -self.pan_x,
            -self.pan_y,
            canvas.container_width / self.zoom,
            canvas.container_height / self.zoom,
        ));
    }

    // --- Pan ---

    pub fn set_pan(&mut self, pan_x: f64, pan_y: f64) {
        if pan_x.is_finite() && pan_y.is_finite() {
            self.pan_x = pan_x;
            self.pan_y = pan_y;
            self.update_viewport_bounds();
        }
    }

    /// Begin a pan gesture at client point `(x, y)`.
    pub fn start_pan(&mut self, x: f64, y: f64) {
        if x.is_finite() && y.is_finite() {
            self.pan_anchor = Some(Point::new(x, y));
        }
    }

    /// Add the pointer delta since the last call to the pan offset. No-op unless panning.
    pub fn update_pan(&mut self, x: f64, y: f64) -> bool {
        let Some(last) = self.pan_anchor else {
            return false;
        };
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        self.pan_x += x - last.x;
        self.pan_y += y - last.y;
        self.pan_anchor = Some(Point::new(x, y));
        self.update_viewport_bounds();
        true
    }

    pub fn stop_pan(&mut self) {
        self.pan_anchor = None;
    }

    // --- Grid ---

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.snap_to_grid = enabled;
    }

    /// Accept only positive finite sizes; anything else keeps the previous value.
    pub fn set_grid_size(&mut self, size: f64) -> bool {
        if size.is_finite() && size > 0.0 {
            self.grid_size = size;
            true
        } else {
            warn!(size, "ignoring invalid grid size");
            false
        }
    }

    // --- Lifecycle ---

    /// Back to 100% (clamped), no pan, no user zoom.
    pub fn reset(&mut self) {
        self.animation = ZoomAnimation::Idle;
        self.zoom = self.clamp_zoom(1.0);
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        self.user_set_zoom = false;
        self.pan_anchor = None;
        self.update_viewport_bounds();
    }

    /// Drop the canvas reference and any in-flight gesture or animation.
    pub fn destroy(&mut self) {
        self.canvas = None;
        self.visible = None;
        self.pan_anchor = None;
        self.animation = ZoomAnimation::Idle;
    }
}

/// Round `v` to the nearest multiple of `grid`.
#[must_use]
pub fn snap_value(v: f64, grid: f64) -> f64 {
    if grid > 0.0 && grid.is_finite() { (v / grid).round() * grid } else { v }
}
