//! Rubber-band marquee selection.
//!
//! While active, every [`MarqueeSelection::update`] recomputes the normalized
//! rectangle between the start and current points and the ids of the
//! selectable layers it touches. Touching edges count as a hit.

#[cfg(test)]
#[path = "marquee_test.rs"]
mod marquee_test;

use std::fmt;

use tracing::debug;

use crate::bounds::bounds;
use crate::doc::LayerStore;
use crate::geom::{Bounds, Point, Rect};
use crate::layer::{Layer, LayerId};

/// Receives the ids under the marquee after each update.
pub type SelectionCallback = Box<dyn FnMut(&[LayerId])>;

/// Replaces the default bounds calculation for hit candidates.
pub type BoundsFn = Box<dyn Fn(&Layer) -> Option<Bounds>>;

#[derive(Default)]
pub struct MarqueeSelection {
    active: bool,
    start: Point,
    end: Point,
    hits: Vec<LayerId>,
    on_select: Option<SelectionCallback>,
    bounds_fn: Option<BoundsFn>,
}

impl fmt::Debug for MarqueeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarqueeSelection")
            .field("active", &self.active)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("hits", &self.hits)
            .field("on_select", &self.on_select.is_some())
            .field("bounds_fn", &self.bounds_fn.is_some())
            .finish()
    }
}

impl MarqueeSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_on_select(&mut self, callback: Option<SelectionCallback>) {
        self.on_select = callback;
    }

    pub fn set_bounds_fn(&mut self, bounds_fn: Option<BoundsFn>) {
        self.bounds_fn = bounds_fn;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begin a marquee at content point `point`.
    pub fn start(&mut self, point: Point) -> bool {
        if !point.is_finite() {
            return false;
        }
        self.active = true;
        self.start = point;
        self.end = point;
        self.hits.clear();
        true
    }

    /// Extend the marquee to `point` and return the selectable layers it touches.
    /// Returns an empty list, and skips the callback, while inactive.
    pub fn update(&mut self, store: &LayerStore, point: Point) -> Vec<LayerId> {
        if !self.active || !point.is_finite() {
            return Vec::new();
        }
        self.end = point;
        let area = self.rect().to_bounds();
        let hits: Vec<LayerId> = store
            .iter()
            .filter(|l| l.is_selectable())
            .filter(|l| {
                let b = match &self.bounds_fn {
                    Some(f) => f(l),
                    None => bounds(l),
                };
                b.is_some_and(|b| b.intersects(&area))
            })
            .map(|l| l.id.clone())
            .collect();
        if let Some(cb) = self.on_select.as_mut() {
            cb(&hits);
        }
        self.hits.clone_from(&hits);
        hits
    }

    /// End the marquee, returning the ids from the last update.
    pub fn finish(&mut self) -> Vec<LayerId> {
        if !self.active {
            return Vec::new();
        }
        self.active = false;
        self.start = Point::default();
        self.end = Point::default();
        debug!(count = self.hits.len(), "marquee finished");
        std::mem::take(&mut self.hits)
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.start = Point::default();
        self.end = Point::default();
        self.hits.clear();
    }

    /// The normalized marquee rectangle; all zeros while inactive.
    #[must_use]
    pub fn rect(&self) -> Rect {
        if self.active { Rect::from_corners(self.start, self.end) } else { Rect::default() }
    }

    /// Drop the callbacks and any in-flight marquee.
    pub fn destroy(&mut self) {
        self.cancel();
        self.on_select = None;
        self.bounds_fn = None;
    }
}
