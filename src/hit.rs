//! Hit testing: selection frame handles and layer bodies, rotation-aware.
//!
//! A [`Frame`] is an unrotated box plus a clockwise rotation about its
//! centre. Handles are laid out on the unrotated box; a query point is
//! brought into that local space with the inverse rotation before any
//! comparison, so rotated layers need no special cases.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::bounds::{bounds, combined_bounds};
use crate::consts::{HANDLE_HALF_SIZE_PX, ROTATE_HANDLE_OFFSET_PX};
use crate::doc::LayerStore;
use crate::geom::{Affine, Bounds, Point};
use crate::layer::{Layer, LayerId};

/// A grab handle on the selection frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
    /// Rotation knob above the top edge.
    Rotate,
}

impl Handle {
    /// The eight resize handles, clockwise from the top.
    pub const RESIZE: [Handle; 8] =
        [Handle::N, Handle::Ne, Handle::E, Handle::Se, Handle::S, Handle::Sw, Handle::W, Handle::Nw];

    #[must_use]
    pub fn is_resize(self) -> bool {
        self != Self::Rotate
    }

    /// Position on the unit box: `-1` left/top, `0` middle, `1` right/bottom.
    #[must_use]
    pub fn unit(self) -> (f64, f64) {
        match self {
            Self::N | Self::Rotate => (0.0, -1.0),
            Self::Ne => (1.0, -1.0),
            Self::E => (1.0, 0.0),
            Self::Se => (1.0, 1.0),
            Self::S => (0.0, 1.0),
            Self::Sw => (-1.0, 1.0),
            Self::W => (-1.0, 0.0),
            Self::Nw => (-1.0, -1.0),
        }
    }

    /// The handle diagonally or directly across the box.
    #[must_use]
    pub fn opposite(self) -> Handle {
        match self {
            Self::N | Self::Rotate => Self::S,
            Self::Ne => Self::Sw,
            Self::E => Self::W,
            Self::Se => Self::Nw,
            Self::S => Self::N,
            Self::Sw => Self::Ne,
            Self::W => Self::E,
            Self::Nw => Self::Se,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::Ne => "ne",
            Self::E => "e",
            Self::Se => "se",
            Self::S => "s",
            Self::Sw => "sw",
            Self::W => "w",
            Self::Nw => "nw",
            Self::Rotate => "rotate",
        }
    }

    fn octant(self) -> Option<usize> {
        Self::RESIZE.iter().position(|h| *h == self)
    }
}

const RESIZE_CURSORS: [&str; 8] =
    ["n-resize", "ne-resize", "e-resize", "se-resize", "s-resize", "sw-resize", "w-resize", "nw-resize"];

/// CSS cursor for a handle on a frame rotated by `rotation` degrees.
///
/// Resize cursors turn with the frame in 45° steps.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn resize_cursor(handle: Handle, rotation: f64) -> &'static str {
    let Some(base) = handle.octant() else {
        return "grab";
    };
    let steps = if rotation.is_finite() { (rotation / 45.0).round().rem_euclid(8.0) as usize } else { 0 };
    RESIZE_CURSORS[(base + steps) % 8]
}

/// Screen-size of the handles expressed in content units for a given zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMetrics {
    /// Half-width of each square handle's hit region.
    pub half_size: f64,
    /// Distance from the top edge to the rotation knob; `None` hides it.
    pub rotate_offset: Option<f64>,
}

impl HandleMetrics {
    /// Metrics that stay a constant size on screen at `zoom`.
    #[must_use]
    pub fn for_zoom(zoom: f64) -> Self {
        let zoom = if zoom > 0.0 && zoom.is_finite() { zoom } else { 1.0 };
        Self { half_size: HANDLE_HALF_SIZE_PX / zoom, rotate_offset: Some(ROTATE_HANDLE_OFFSET_PX / zoom) }
    }
}

/// A handle and where it sits in content space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleDescriptor {
    pub handle: Handle,
    pub x: f64,
    pub y: f64,
    pub cursor: &'static str,
}

/// Selection frame: unrotated box plus clockwise rotation (degrees) about its centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub bounds: Bounds,
    pub rotation: f64,
}

impl Frame {
    #[must_use]
    pub fn new(bounds: Bounds, rotation: f64) -> Self {
        let rotation = if rotation.is_finite() { rotation } else { 0.0 };
        Self { bounds, rotation }
    }

    /// Frame of the given selection: one layer keeps its own rotation,
    /// several layers share their combined box with no rotation.
    #[must_use]
    pub fn for_selection(store: &LayerStore, ids: &[LayerId]) -> Option<Frame> {
        let layers: Vec<&Layer> = ids.iter().filter_map(|id| store.get(id)).collect();
        match layers.as_slice() {
            [] => None,
            [only] => bounds(only).map(|b| Frame::new(b, only.rotation)),
            many => combined_bounds(many.iter().copied()).map(|b| Frame::new(b, 0.0)),
        }
    }

    /// Transform from the frame's local (unrotated) space to content space.
    #[must_use]
    pub fn to_world(&self) -> Affine {
        Affine::rotate_about(self.bounds.center(), self.rotation.to_radians())
    }

    /// Transform from content space into the frame's local space.
    #[must_use]
    pub fn to_local(&self) -> Affine {
        Affine::rotate_about(self.bounds.center(), -self.rotation.to_radians())
    }

    /// Local-space position of a handle.
    #[must_use]
    pub fn local_handle_point(&self, handle: Handle, rotate_offset: f64) -> Point {
        let (ux, uy) = handle.unit();
        let b = &self.bounds;
        let x = b.center_x + ux * b.width / 2.0;
        let y = b.center_y + uy * b.height / 2.0;
        if handle == Handle::Rotate { Point::new(x, y - rotate_offset) } else { Point::new(x, y) }
    }

    /// Content-space position of a handle.
    #[must_use]
    pub fn handle_point(&self, handle: Handle, rotate_offset: f64) -> Point {
        self.to_world().apply(self.local_handle_point(handle, rotate_offset))
    }

    /// Every handle shown for this frame, resize handles first.
    #[must_use]
    pub fn handles(&self, metrics: HandleMetrics) -> Vec<HandleDescriptor> {
        let mut out: Vec<HandleDescriptor> = Handle::RESIZE
            .iter()
            .map(|&h| {
                let p = self.handle_point(h, 0.0);
                HandleDescriptor { handle: h, x: p.x, y: p.y, cursor: resize_cursor(h, self.rotation) }
            })
            .collect();
        if let Some(offset) = metrics.rotate_offset {
            let p = self.handle_point(Handle::Rotate, offset);
            out.push(HandleDescriptor { handle: Handle::Rotate, x: p.x, y: p.y, cursor: "grab" });
        }
        out
    }

    /// Whether `point` lies inside the rotated box.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.bounds.contains(self.to_local().apply(point))
    }
}

/// The handle whose square hit region contains `point`, nearest first.
#[must_use]
pub fn hit_test_handles(frame: &Frame, point: Point, metrics: HandleMetrics) -> Option<Handle> {
    if !point.is_finite() || metrics.half_size.is_nan() || metrics.half_size < 0.0 {
        return None;
    }
    let local = frame.to_local().apply(point);
    let candidates = Handle::RESIZE
        .iter()
        .map(|&h| (h, frame.local_handle_point(h, 0.0)))
        .chain(metrics.rotate_offset.map(|o| (Handle::Rotate, frame.local_handle_point(Handle::Rotate, o))));
    candidates
        .filter(|(_, hp)| (local.x - hp.x).abs() <= metrics.half_size && (local.y - hp.y).abs() <= metrics.half_size)
        .min_by(|(_, a), (_, b)| local.distance_to(*a).total_cmp(&local.distance_to(*b)))
        .map(|(h, _)| h)
}

/// Topmost visible layer whose rotated box, grown by `tolerance` content units
/// on every side, contains `point`. The slack lets thin lines be picked.
#[must_use]
pub fn hit_test_layer(store: &LayerStore, point: Point, tolerance: f64) -> Option<&Layer> {
    if !point.is_finite() {
        return None;
    }
    let pad = if tolerance.is_finite() && tolerance > 0.0 { tolerance } else { 0.0 };
    store
        .iter()
        .rev()
        .filter(|l| l.visible)
        .find(|l| bounds(l).is_some_and(|b| Frame::new(b.inflated(pad), l.rotation).contains(point)))
}
