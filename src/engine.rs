use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::align::{self, Alignment, Axis};
use crate::bounds::combined_bounds;
use crate::config::EngineOptions;
use crate::consts::{DUPLICATE_OFFSET, WHEEL_ZOOM_STEP};
use crate::doc::LayerStore;
use crate::geom::{Bounds, Point, Rect};
use crate::hit::{self, Frame, Handle, HandleDescriptor, HandleMetrics};
use crate::input::{Button, Gesture, Modifiers, WheelDelta};
use crate::layer::{Layer, LayerId};
use crate::marquee::MarqueeSelection;
use crate::render;
use crate::selection::SelectionSet;
use crate::snap::{GuideLine, SnapGuideEngine};
use crate::transform::TransformController;
use crate::viewport::{CanvasGeometry, ImageSize, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers and commands for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Redraw the canvas.
    RenderNeeded,
    /// Record an undo checkpoint with this label.
    SaveCheckpoint(String),
    /// Update the zoom readout.
    ZoomChanged { zoom_percent: i32 },
    /// The selected ids changed to this list.
    SelectionChanged(Vec<LayerId>),
    /// Set the canvas CSS cursor.
    SetCursor(String),
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub store: LayerStore,
    pub selection: SelectionSet,
    pub viewport: Viewport,
    pub transform: TransformController,
    pub marquee: MarqueeSelection,
    pub snap: SnapGuideEngine,
    gesture: Gesture,
    /// Space bar held: primary drags pan instead of selecting.
    space_held: bool,
    /// Selection in place when a shift-marquee started.
    marquee_base: Vec<LayerId>,
    image: Option<ImageSize>,
    cursor: String,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from host options. Invalid options are logged and replaced by defaults.
    #[must_use]
    pub fn with_options(options: &EngineOptions) -> Self {
        let mut core = Self::new();
        core.apply_options(options);
        core
    }

    /// Apply host options, falling back to defaults when they fail validation.
    pub fn apply_options(&mut self, options: &EngineOptions) {
        let defaults = EngineOptions::default();
        let options = match options.validate() {
            Ok(()) => options,
            Err(e) => {
                warn!(error = %e, "rejecting engine options, using defaults");
                &defaults
            }
        };
        self.viewport.set_zoom_limits(options.min_zoom, options.max_zoom);
        self.viewport.set_grid_size(options.grid_size);
        self.viewport.set_snap_to_grid(options.snap_to_grid);
        self.snap.set_threshold(options.snap_threshold);
        self.snap.set_enabled(options.smart_guides);
    }

    // --- Data inputs ---

    /// Replace every layer with a snapshot from the host, dropping stale selection ids.
    pub fn load_layers(&mut self, layers: Vec<Layer>) -> Vec<Action> {
        self.cancel_gesture();
        self.store.load_snapshot(layers);
        let mut actions = vec![Action::RenderNeeded];
        if self.selection.retain_existing(&self.store) {
            actions.push(self.selection_changed());
        }
        actions
    }

    pub fn set_canvas_geometry(&mut self, canvas: Option<CanvasGeometry>) {
        self.viewport.set_canvas_geometry(canvas);
    }

    /// Natural size of the background image, used by fit-to-window.
    pub fn set_background_size(&mut self, image: Option<ImageSize>) {
        self.image = image;
    }

    pub fn set_space_held(&mut self, held: bool) {
        self.space_held = held;
    }

    // --- Queries ---

    #[must_use]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    #[must_use]
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.store.get(id)
    }

    /// Frame around the selected unlocked layers.
    #[must_use]
    pub fn selection_frame(&self) -> Option<Frame> {
        Frame::for_selection(&self.store, &self.selection.active_layer_ids(&self.store))
    }

    /// Handles to draw around the current selection.
    #[must_use]
    pub fn handles(&self) -> Vec<HandleDescriptor> {
        self.selection_frame()
            .map(|f| f.handles(HandleMetrics::for_zoom(self.viewport.zoom())))
            .unwrap_or_default()
    }

    /// Marquee rectangle in canvas pixels while a marquee is being dragged.
    #[must_use]
    pub fn marquee_rect(&self) -> Option<Rect> {
        if !self.marquee.is_active() {
            return None;
        }
        let zoom = self.viewport.zoom();
        let pan = self.viewport.pan();
        let r = self.marquee.rect();
        Some(Rect { x: (r.x + pan.x) * zoom, y: (r.y + pan.y) * zoom, width: r.width * zoom, height: r.height * zoom })
    }

    /// Active smart guides in canvas pixels.
    #[must_use]
    pub fn guide_lines(&self, width: f64, height: f64) -> Vec<GuideLine> {
        let zoom = self.viewport.zoom();
        let pan = self.viewport.pan();
        self.snap.guide_lines(zoom, pan.x * zoom, pan.y * zoom, width, height)
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        match button {
            Button::Middle => self.begin_pan(client),
            Button::Primary if self.space_held => self.begin_pan(client),
            Button::Primary => self.primary_down(client, modifiers),
            Button::Secondary => Vec::new(),
        }
    }

    pub fn on_pointer_move(&mut self, client: Point, modifiers: Modifiers) -> Vec<Action> {
        if self.gesture == Gesture::Panning {
            return if self.viewport.update_pan(client.x, client.y) { vec![Action::RenderNeeded] } else { Vec::new() };
        }
        let Some(content) = self.viewport.client_to_content_raw(client.x, client.y) else {
            return Vec::new();
        };
        match self.gesture {
            Gesture::Idle => self.hover(content),
            Gesture::Panning => Vec::new(),
            Gesture::Dragging => self.drag_to(content),
            Gesture::Resizing(_) => {
                if self.transform.update_resize(&mut self.store, content, modifiers) {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            Gesture::Rotating => {
                if self.transform.update_rotation(&mut self.store, content, modifiers) {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            Gesture::Marquee => self.marquee_to(content),
        }
    }

    pub fn on_pointer_up(&mut self, client: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let gesture = std::mem::take(&mut self.gesture);
        let mut actions = Vec::new();
        let label = match gesture {
            Gesture::Idle => return actions,
            Gesture::Panning => {
                self.viewport.stop_pan();
                None
            }
            Gesture::Dragging => {
                self.snap.clear_guides();
                self.transform.finish_drag().then_some("Move")
            }
            Gesture::Resizing(_) => self.transform.finish_resize().then_some("Resize"),
            Gesture::Rotating => self.transform.finish_rotation().then_some("Rotate"),
            Gesture::Marquee => {
                self.marquee.finish();
                self.marquee_base.clear();
                None
            }
        };
        debug!(?gesture, checkpoint = label.is_some(), "gesture finished");
        actions.push(Action::RenderNeeded);
        if let Some(label) = label {
            actions.push(Action::SaveCheckpoint(label.to_owned()));
        }
        if let Some(content) = self.viewport.client_to_content_raw(client.x, client.y) {
            actions.extend(self.hover(content));
        }
        actions
    }

    /// Ctrl/Cmd + wheel zooms around the pointer; a plain wheel scrolls the view.
    pub fn on_wheel(&mut self, client: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if !delta.dx.is_finite() || !delta.dy.is_finite() {
            return Vec::new();
        }
        if modifiers.command() {
            if delta.dy == 0.0 {
                return Vec::new();
            }
            let step = if delta.dy < 0.0 { WHEEL_ZOOM_STEP } else { -WHEEL_ZOOM_STEP };
            self.viewport.zoom_by(step, Some(client));
            return vec![self.zoom_changed(), Action::RenderNeeded];
        }
        let zoom = self.viewport.zoom();
        let pan = self.viewport.pan();
        self.viewport.set_pan(pan.x - delta.dx / zoom, pan.y - delta.dy / zoom);
        vec![Action::RenderNeeded]
    }

    /// Abort the gesture in progress, restoring any layers it touched.
    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        let gesture = std::mem::take(&mut self.gesture);
        if gesture.is_idle() {
            return Vec::new();
        }
        self.transform.cancel(&mut self.store);
        self.marquee.cancel();
        self.marquee_base.clear();
        self.viewport.stop_pan();
        self.snap.clear_guides();
        debug!(?gesture, "gesture cancelled");
        vec![Action::RenderNeeded]
    }

    fn begin_pan(&mut self, client: Point) -> Vec<Action> {
        self.viewport.start_pan(client.x, client.y);
        if !self.viewport.is_panning() {
            return Vec::new();
        }
        self.gesture = Gesture::Panning;
        vec![self.set_cursor("grabbing")]
    }

    fn primary_down(&mut self, client: Point, modifiers: Modifiers) -> Vec<Action> {
        let Some(content) = self.viewport.client_to_content_raw(client.x, client.y) else {
            return Vec::new();
        };
        let metrics = HandleMetrics::for_zoom(self.viewport.zoom());
        if let Some(frame) = self.selection_frame() {
            if let Some(handle) = hit::hit_test_handles(&frame, content, metrics) {
                return self.begin_handle(handle, &frame, content);
            }
        }

        let mut actions = Vec::new();
        let hit_id = hit::hit_test_layer(&self.store, content, metrics.half_size)
            .filter(|l| !l.locked)
            .map(|l| l.id.clone());
        match hit_id {
            Some(id) => {
                if modifiers.shift {
                    self.selection.toggle(&id);
                    actions.push(self.selection_changed());
                } else if self.selection.contains(&id) {
                    // Keep the group for dragging; the clicked layer anchors alignment.
                    self.selection.set_key_object(Some(&id));
                } else {
                    self.selection.select(id.clone());
                    actions.push(self.selection_changed());
                }
                if self.selection.contains(&id) && self.transform.start_drag(&self.store, &self.selection, content) {
                    self.gesture = Gesture::Dragging;
                    actions.push(self.set_cursor("move"));
                }
            }
            None => {
                if modifiers.shift {
                    self.marquee_base = self.selection.ids().to_vec();
                } else {
                    self.marquee_base.clear();
                    if !self.selection.is_empty() {
                        self.selection.clear();
                        actions.push(self.selection_changed());
                    }
                }
                if self.marquee.start(content) {
                    self.gesture = Gesture::Marquee;
                    actions.push(self.set_cursor("crosshair"));
                }
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn begin_handle(&mut self, handle: Handle, frame: &Frame, content: Point) -> Vec<Action> {
        let started = if handle == Handle::Rotate {
            self.transform.start_rotation(&self.store, &self.selection, content).then_some(Gesture::Rotating)
        } else {
            self.transform
                .start_resize(&self.store, &self.selection, handle, content)
                .then_some(Gesture::Resizing(handle))
        };
        let Some(gesture) = started else {
            return Vec::new();
        };
        self.gesture = gesture;
        let cursor = if handle == Handle::Rotate { "grabbing" } else { hit::resize_cursor(handle, frame.rotation) };
        vec![self.set_cursor(cursor), Action::RenderNeeded]
    }

    fn drag_to(&mut self, content: Point) -> Vec<Action> {
        let grid = self.viewport.snap_to_grid().then(|| self.viewport.grid_size());
        let Some(mut delta) = self.transform.drag_delta(content, grid) else {
            return Vec::new();
        };
        if self.snap.is_enabled() {
            if let Some(start) = self.transform.snapshot_bounds() {
                let excluded = self.transform.layer_ids();
                let snapped = self.snap.calculate_snapped_position_excluding(
                    &self.store,
                    &start,
                    start.left + delta.x,
                    start.top + delta.y,
                    &excluded,
                );
                delta = Point::new(snapped.x - start.left, snapped.y - start.top);
            }
        }
        if self.transform.apply_drag_delta(&mut self.store, delta) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    fn marquee_to(&mut self, content: Point) -> Vec<Action> {
        let hits = self.marquee.update(&self.store, content);
        let mut ids = self.marquee_base.clone();
        ids.extend(hits);
        let before = self.selection.ids().to_vec();
        self.selection.set_selection(ids);
        let mut actions = Vec::new();
        if self.selection.ids() != before.as_slice() {
            actions.push(self.selection_changed());
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn hover(&mut self, content: Point) -> Vec<Action> {
        let metrics = HandleMetrics::for_zoom(self.viewport.zoom());
        let cursor = match self.selection_frame() {
            Some(frame) => match hit::hit_test_handles(&frame, content, metrics) {
                Some(Handle::Rotate) => Some("grab"),
                Some(h) => Some(hit::resize_cursor(h, frame.rotation)),
                None => None,
            },
            None => None,
        };
        let cursor = cursor.unwrap_or_else(|| {
            let over_layer = hit::hit_test_layer(&self.store, content, metrics.half_size).is_some_and(|l| !l.locked);
            if over_layer { "move" } else { "default" }
        });
        if self.cursor == cursor { Vec::new() } else { vec![self.set_cursor(cursor)] }
    }

    // --- Selection commands ---

    pub fn select(&mut self, id: &str) -> Vec<Action> {
        if !self.store.contains(id) {
            return Vec::new();
        }
        self.selection.select(id);
        vec![self.selection_changed(), Action::RenderNeeded]
    }

    pub fn select_all(&mut self) -> Vec<Action> {
        self.selection.select_all(&self.store);
        vec![self.selection_changed(), Action::RenderNeeded]
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.selection.clear();
        vec![self.selection_changed(), Action::RenderNeeded]
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        if self.selection.delete_selected(&mut self.store) == 0 {
            return Vec::new();
        }
        vec![self.selection_changed(), Action::RenderNeeded, Action::SaveCheckpoint("Delete".into())]
    }

    pub fn duplicate_selected(&mut self) -> Vec<Action> {
        if self.selection.duplicate_selected(&mut self.store, DUPLICATE_OFFSET, DUPLICATE_OFFSET).is_empty() {
            return Vec::new();
        }
        vec![self.selection_changed(), Action::RenderNeeded, Action::SaveCheckpoint("Duplicate".into())]
    }

    // --- Alignment commands ---

    pub fn align(&mut self, alignment: Alignment) -> Vec<Action> {
        Self::changed(align::align(&mut self.store, &self.selection, alignment), "Align")
    }

    pub fn distribute(&mut self, axis: Axis) -> Vec<Action> {
        Self::changed(align::distribute(&mut self.store, &self.selection, axis), "Distribute")
    }

    fn changed(moved: usize, label: &str) -> Vec<Action> {
        if moved == 0 { Vec::new() } else { vec![Action::RenderNeeded, Action::SaveCheckpoint(label.to_owned())] }
    }

    // --- Zoom commands ---

    pub fn set_zoom(&mut self, zoom: f64) -> Vec<Action> {
        if self.viewport.set_zoom(zoom) { vec![self.zoom_changed(), Action::RenderNeeded] } else { Vec::new() }
    }

    /// Start an eased zoom; frames are produced by [`EngineCore::tick`].
    pub fn smooth_zoom_to(&mut self, target: f64, duration_ms: Option<f64>, now_ms: f64) -> Vec<Action> {
        if self.viewport.smooth_zoom_to(target, duration_ms, now_ms) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Advance the zoom animation. Empty once it has settled.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Action> {
        if self.viewport.tick(now_ms) { vec![self.zoom_changed(), Action::RenderNeeded] } else { Vec::new() }
    }

    pub fn fit_to_window(&mut self) -> Vec<Action> {
        if self.viewport.fit_to_window(self.image) { vec![self.zoom_changed(), Action::RenderNeeded] } else { Vec::new() }
    }

    /// Frame the selection, or every layer when nothing is selected.
    pub fn zoom_to_selection(&mut self, padding: Option<f64>) -> Vec<Action> {
        let target: Option<Bounds> = if self.selection.is_empty() {
            combined_bounds(self.store.iter())
        } else {
            combined_bounds(self.selection.ids().iter().filter_map(|id| self.store.get(id)))
        };
        if self.viewport.zoom_to_fit_bounds(target.as_ref(), padding) {
            vec![self.zoom_changed(), Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        self.viewport.reset();
        vec![self.zoom_changed(), Action::RenderNeeded]
    }

    // --- Grid / guides ---

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.viewport.set_snap_to_grid(enabled);
    }

    pub fn set_grid_size(&mut self, size: f64) -> bool {
        self.viewport.set_grid_size(size)
    }

    pub fn set_smart_guides(&mut self, enabled: bool) -> Vec<Action> {
        self.snap.set_enabled(enabled);
        vec![Action::RenderNeeded]
    }

    // --- Lifecycle ---

    /// Release callbacks, caches and the canvas reference.
    pub fn destroy(&mut self) {
        self.cancel_gesture();
        self.marquee.destroy();
        self.snap.destroy();
        self.viewport.destroy();
    }

    // --- Action helpers ---

    fn selection_changed(&self) -> Action {
        Action::SelectionChanged(self.selection.ids().to_vec())
    }

    fn zoom_changed(&self) -> Action {
        Action::ZoomChanged { zoom_percent: self.viewport.zoom_percent() }
    }

    fn set_cursor(&mut self, cursor: &str) -> Action {
        cursor.clone_into(&mut self.cursor);
        Action::SetCursor(cursor.to_owned())
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: Option<HtmlCanvasElement>,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// `options_json` is the host's options object; unparsable or invalid
    /// options are logged and the defaults used instead.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, options_json: Option<&str>) -> Self {
        let options = match options_json.map(EngineOptions::from_json) {
            None => EngineOptions::default(),
            Some(Ok(options)) => options,
            Some(Err(e)) => {
                warn!(error = %e, "ignoring engine options");
                EngineOptions::default()
            }
        };
        let mut engine = Self { canvas: Some(canvas), core: EngineCore::with_options(&options) };
        engine.sync_canvas_geometry();
        engine
    }

    /// Re-read the canvas position and its container's size from the DOM.
    pub fn sync_canvas_geometry(&mut self) {
        let geometry = self.canvas.as_ref().and_then(|canvas| {
            let parent = canvas.parent_element()?;
            let rect = canvas.get_bounding_client_rect();
            Some(CanvasGeometry::new(
                rect.left(),
                rect.top(),
                f64::from(parent.client_width()),
                f64::from(parent.client_height()),
            ))
        });
        self.core.set_canvas_geometry(geometry);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.sync_canvas_geometry();
        self.core.on_pointer_down(client, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, client: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(client, modifiers)
    }

    pub fn on_pointer_up(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(client, button, modifiers)
    }

    pub fn on_wheel(&mut self, client: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.sync_canvas_geometry();
        self.core.on_wheel(client, delta, modifiers)
    }

    // --- Viewport ---

    pub fn smooth_zoom_to(&mut self, target: f64, duration_ms: Option<f64>) -> Vec<Action> {
        self.core.smooth_zoom_to(target, duration_ms, js_sys::Date::now())
    }

    /// Advance the zoom animation to the current time. Call once per animation frame.
    pub fn tick(&mut self) -> Vec<Action> {
        self.core.tick(js_sys::Date::now())
    }

    pub fn fit_to_window(&mut self) -> Vec<Action> {
        self.sync_canvas_geometry();
        self.core.fit_to_window()
    }

    /// Grid toggle from a JS value, using JS truthiness.
    pub fn set_snap_to_grid(&mut self, value: &JsValue) {
        self.core.set_snap_to_grid(value.is_truthy());
    }

    // --- Render ---

    /// Paint the interaction overlay (smart guides and marquee) on top of the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context cannot be obtained or a `Canvas2D` call fails.
    pub fn render_overlay(&self) -> Result<(), JsValue> {
        let Some(canvas) = &self.canvas else {
            return Ok(());
        };
        let Some(ctx) = canvas.get_context("2d")? else {
            return Ok(());
        };
        let ctx: CanvasRenderingContext2d = ctx.dyn_into()?;
        let lines = self.core.guide_lines(f64::from(canvas.width()), f64::from(canvas.height()));
        render::draw_guides(&ctx, &lines)?;
        if let Some(rect) = self.core.marquee_rect() {
            render::draw_marquee(&ctx, &rect)?;
        }
        Ok(())
    }

    // --- Lifecycle ---

    /// Drop the canvas element and every callback. The engine is inert afterwards.
    pub fn destroy(&mut self) {
        self.canvas = None;
        self.core.destroy();
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.canvas.is_none()
    }
}
