//! Transform controller: the drag / resize / rotate state machine.
//!
//! Each gesture snapshots the layers it touches when it starts and rebuilds
//! them from those snapshots on every update, so updates are absolute rather
//! than cumulative and [`TransformController::cancel`] can restore the
//! starting state exactly. Only one gesture runs at a time; starting another
//! while one is active is refused.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use tracing::debug;

use crate::consts::{MIN_LAYER_SIZE, ROTATION_SNAP_DEG};
use crate::doc::LayerStore;
use crate::geom::{Bounds, Point, normalize_degrees_360};
use crate::hit::{Frame, Handle};
use crate::input::Modifiers;
use crate::layer::{Layer, LayerId};
use crate::selection::SelectionSet;
use crate::viewport::snap_value;

/// Active transform and the state needed to recompute it from scratch.
#[derive(Debug, Clone, Default)]
pub enum TransformMode {
    #[default]
    Idle,
    Dragging {
        anchor: Point,
        snapshots: Vec<Layer>,
        changed: bool,
    },
    Resizing {
        handle: Handle,
        frame: Frame,
        start: Point,
        snapshots: Vec<Layer>,
        changed: bool,
    },
    Rotating {
        pivot: Point,
        start_angle: f64,
        snapshots: Vec<Layer>,
        changed: bool,
    },
}

#[derive(Debug, Clone, Default)]
pub struct TransformController {
    mode: TransformMode,
}

impl TransformController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> &TransformMode {
        &self.mode
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.mode, TransformMode::Idle)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.mode, TransformMode::Dragging { .. })
    }

    #[must_use]
    pub fn is_resizing(&self) -> bool {
        matches!(self.mode, TransformMode::Resizing { .. })
    }

    #[must_use]
    pub fn is_rotating(&self) -> bool {
        matches!(self.mode, TransformMode::Rotating { .. })
    }

    /// Handle being dragged during a resize.
    #[must_use]
    pub fn active_handle(&self) -> Option<Handle> {
        match &self.mode {
            TransformMode::Resizing { handle, .. } => Some(*handle),
            _ => None,
        }
    }

    /// Ids of the layers the running gesture moves.
    #[must_use]
    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.snapshots().iter().map(|l| l.id.clone()).collect()
    }

    /// Combined box of the layers as they were when the gesture started.
    #[must_use]
    pub fn snapshot_bounds(&self) -> Option<Bounds> {
        crate::bounds::combined_bounds(self.snapshots())
    }

    fn snapshots(&self) -> &[Layer] {
        match &self.mode {
            TransformMode::Idle => &[],
            TransformMode::Dragging { snapshots, .. }
            | TransformMode::Resizing { snapshots, .. }
            | TransformMode::Rotating { snapshots, .. } => snapshots,
        }
    }

    fn take_snapshots(store: &LayerStore, selection: &SelectionSet) -> Vec<Layer> {
        selection.active_layers(store).into_iter().cloned().collect()
    }

    // --- Drag ---

    /// Begin moving the selected unlocked layers from content point `point`.
    pub fn start_drag(&mut self, store: &LayerStore, selection: &SelectionSet, point: Point) -> bool {
        if !self.is_idle() || !point.is_finite() {
            return false;
        }
        let snapshots = Self::take_snapshots(store, selection);
        if snapshots.is_empty() {
            return false;
        }
        debug!(count = snapshots.len(), "drag started");
        self.mode = TransformMode::Dragging { anchor: point, snapshots, changed: false };
        true
    }

    /// Offset from the drag anchor to `point`, grid-snapped when `grid` is given.
    #[must_use]
    pub fn drag_delta(&self, point: Point, grid: Option<f64>) -> Option<Point> {
        let TransformMode::Dragging { anchor, .. } = &self.mode else {
            return None;
        };
        if !point.is_finite() {
            return None;
        }
        let d = point.sub(*anchor);
        Some(match grid {
            Some(g) => Point::new(snap_value(d.x, g), snap_value(d.y, g)),
            None => d,
        })
    }

    /// Set every dragged layer to its snapshot moved by `delta`.
    pub fn apply_drag_delta(&mut self, store: &mut LayerStore, delta: Point) -> bool {
        let TransformMode::Dragging { snapshots, changed, .. } = &mut self.mode else {
            return false;
        };
        if !delta.is_finite() {
            return false;
        }
        for snap in snapshots.iter() {
            if let Some(layer) = store.get_mut(&snap.id) {
                *layer = snap.clone();
                layer.translate(delta.x, delta.y);
            }
        }
        *changed |= delta.x != 0.0 || delta.y != 0.0;
        true
    }

    /// [`Self::drag_delta`] followed by [`Self::apply_drag_delta`].
    pub fn update_drag(&mut self, store: &mut LayerStore, point: Point, grid: Option<f64>) -> bool {
        match self.drag_delta(point, grid) {
            Some(delta) => self.apply_drag_delta(store, delta),
            None => false,
        }
    }

    /// End a drag. Returns `true` when layers actually moved and a checkpoint is due.
    pub fn finish_drag(&mut self) -> bool {
        self.finish_if(|m| matches!(m, TransformMode::Dragging { .. }), "drag")
    }

    // --- Resize ---

    /// Begin resizing the selection frame by `handle` from content point `point`.
    pub fn start_resize(
        &mut self,
        store: &LayerStore,
        selection: &SelectionSet,
        handle: Handle,
        point: Point,
    ) -> bool {
        if !self.is_idle() || !handle.is_resize() || !point.is_finite() {
            return false;
        }
        let snapshots = Self::take_snapshots(store, selection);
        let ids: Vec<LayerId> = snapshots.iter().map(|l| l.id.clone()).collect();
        let Some(frame) = Frame::for_selection(store, &ids) else {
            return false;
        };
        debug!(handle = handle.as_str(), count = snapshots.len(), "resize started");
        self.mode = TransformMode::Resizing { handle, frame, start: point, snapshots, changed: false };
        true
    }

    /// Resize towards content point `point`. Shift keeps the aspect ratio,
    /// Alt resizes about the centre.
    pub fn update_resize(&mut self, store: &mut LayerStore, point: Point, modifiers: Modifiers) -> bool {
        let TransformMode::Resizing { handle, frame, start, snapshots, changed } = &mut self.mode else {
            return false;
        };
        if !point.is_finite() {
            return false;
        }
        let local_delta = frame.to_local().apply_vector(point.sub(*start));
        let local = resize_box(&frame.bounds, *handle, local_delta, modifiers.shift, modifiers.alt);
        let center = frame.to_world().apply(local.center());
        let target = Bounds::from_center(center, local.width / 2.0, local.height / 2.0);
        for snap in snapshots.iter() {
            if let Some(layer) = store.get_mut(&snap.id) {
                *layer = snap.clone();
                layer.shape.map_box(&frame.bounds, &target);
            }
        }
        *changed |= target != frame.bounds;
        true
    }

    /// End a resize. Returns `true` when a resize was active and changed geometry.
    pub fn finish_resize(&mut self) -> bool {
        self.finish_if(|m| matches!(m, TransformMode::Resizing { .. }), "resize")
    }

    // --- Rotate ---

    /// Begin rotating the selection about its centre from content point `point`.
    pub fn start_rotation(&mut self, store: &LayerStore, selection: &SelectionSet, point: Point) -> bool {
        if !self.is_idle() || !point.is_finite() {
            return false;
        }
        let snapshots = Self::take_snapshots(store, selection);
        let ids: Vec<LayerId> = snapshots.iter().map(|l| l.id.clone()).collect();
        let Some(frame) = Frame::for_selection(store, &ids) else {
            return false;
        };
        let pivot = frame.bounds.center();
        let start_angle = angle(pivot, point);
        debug!(count = snapshots.len(), "rotation started");
        self.mode = TransformMode::Rotating { pivot, start_angle, snapshots, changed: false };
        true
    }

    /// Rotate by the angle swept around the pivot since the start. Shift snaps to 15° steps.
    pub fn update_rotation(&mut self, store: &mut LayerStore, point: Point, modifiers: Modifiers) -> bool {
        let TransformMode::Rotating { pivot, start_angle, snapshots, changed } = &mut self.mode else {
            return false;
        };
        if !point.is_finite() {
            return false;
        }
        let swept = (angle(*pivot, point) - *start_angle).to_degrees();
        for snap in snapshots.iter() {
            if let Some(layer) = store.get_mut(&snap.id) {
                *layer = snap.clone();
                let mut rotation = normalize_degrees_360(snap.rotation + swept);
                if modifiers.shift {
                    rotation = normalize_degrees_360((rotation / ROTATION_SNAP_DEG).round() * ROTATION_SNAP_DEG);
                }
                *changed |= (rotation - snap.rotation).abs() > f64::EPSILON;
                layer.rotation = rotation;
            }
        }
        true
    }

    /// End a rotation. Returns `true` when a rotation was active and changed something.
    pub fn finish_rotation(&mut self) -> bool {
        self.finish_if(|m| matches!(m, TransformMode::Rotating { .. }), "rotation")
    }

    // --- Shared ---

    /// End whatever gesture is running. Returns `true` when a checkpoint is due.
    pub fn finish(&mut self) -> bool {
        self.finish_if(|_| true, "transform")
    }

    /// Restore every snapshot and return to idle.
    pub fn cancel(&mut self, store: &mut LayerStore) -> bool {
        let mode = std::mem::take(&mut self.mode);
        let restored = match mode {
            TransformMode::Idle => return false,
            TransformMode::Dragging { snapshots, .. }
            | TransformMode::Resizing { snapshots, .. }
            | TransformMode::Rotating { snapshots, .. } => snapshots,
        };
        for snap in restored {
            if let Some(layer) = store.get_mut(&snap.id) {
                *layer = snap;
            }
        }
        debug!("transform cancelled");
        true
    }

    fn finish_if(&mut self, is_kind: impl Fn(&TransformMode) -> bool, label: &'static str) -> bool {
        if !is_kind(&self.mode) {
            return false;
        }
        let changed = match std::mem::take(&mut self.mode) {
            TransformMode::Idle => false,
            TransformMode::Dragging { changed, .. }
            | TransformMode::Resizing { changed, .. }
            | TransformMode::Rotating { changed, .. } => changed,
        };
        debug!(gesture = label, changed, "transform finished");
        changed
    }
}

/// Angle of `p` around `pivot` in radians, clockwise positive on a y-down canvas.
fn angle(pivot: Point, p: Point) -> f64 {
    (p.y - pivot.y).atan2(p.x - pivot.x)
}

/// New local box after dragging `handle` by `d` (already in the box's local axes).
///
/// Only the edges the handle owns move. The edge opposite the handle stays put
/// unless `from_center`, in which case the centre stays put and both edges
/// move. Owned extents never fall below [`MIN_LAYER_SIZE`].
fn resize_box(b: &Bounds, handle: Handle, d: Point, keep_aspect: bool, from_center: bool) -> Bounds {
    let (ux, uy) = handle.unit();
    let factor = if from_center { 2.0 } else { 1.0 };
    let grow = |extent: f64, u: f64, delta: f64| if u == 0.0 { extent } else { extent + delta * u * factor };
    let mut w = grow(b.width, ux, d.x);
    let mut h = grow(b.height, uy, d.y);

    let aspect = keep_aspect && b.width > 0.0 && b.height > 0.0;
    if aspect {
        let sx = w / b.width;
        let sy = h / b.height;
        let s = match (ux != 0.0, uy != 0.0) {
            (true, true) => {
                if (sx - 1.0).abs() >= (sy - 1.0).abs() {
                    sx
                } else {
                    sy
                }
            }
            (true, false) => sx,
            _ => sy,
        };
        let s = s.max(MIN_LAYER_SIZE / b.width).max(MIN_LAYER_SIZE / b.height);
        w = b.width * s;
        h = b.height * s;
    }
    if ux != 0.0 {
        w = w.max(MIN_LAYER_SIZE);
    }
    if uy != 0.0 {
        h = h.max(MIN_LAYER_SIZE);
    }

    let place = |lo: f64, hi: f64, center: f64, u: f64, extent: f64| {
        if from_center || u == 0.0 {
            center
        } else if u > 0.0 {
            lo + extent / 2.0
        } else {
            hi - extent / 2.0
        }
    };
    let cx = place(b.left, b.right, b.center_x, ux, w);
    let cy = place(b.top, b.bottom, b.center_y, uy, h);
    Bounds::from_center(Point::new(cx, cy), w / 2.0, h / 2.0)
}
