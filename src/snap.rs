//! Smart guides: a cached index of other layers' edges and centres, and the
//! snapping of a dragged box onto them.
//!
//! The index is rebuilt only when its key changes. The key is the store's
//! identity and mutation version plus the sorted set of excluded ids, so a
//! repeated query during one drag frame hands back the same `Rc`.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use std::rc::Rc;

use serde::Serialize;
use tracing::{trace, warn};
use uuid::Uuid;

use crate::bounds::bounds;
use crate::consts::DEFAULT_SNAP_THRESHOLD;
use crate::doc::LayerStore;
use crate::geom::Bounds;
use crate::layer::LayerId;

/// One candidate line from another layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapPoint {
    pub value: f64,
    pub source_layer_id: LayerId,
    pub is_center: bool,
}

/// Candidate lines: `horizontal` holds y values (top, centre, bottom),
/// `vertical` holds x values (left, centre, right).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapPoints {
    pub horizontal: Vec<SnapPoint>,
    pub vertical: Vec<SnapPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideKind {
    /// Constant x, spans the full height.
    Vertical,
    /// Constant y, spans the full width.
    Horizontal,
}

/// A guide to draw, in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Guide {
    #[serde(rename = "type")]
    pub kind: GuideKind,
    pub value: f64,
    pub is_center: bool,
}

/// A guide converted to a screen-space segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub is_center: bool,
}

/// Outcome of snapping a proposed top-left position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapResult {
    pub x: f64,
    pub y: f64,
    pub snapped_x: bool,
    pub snapped_y: bool,
    pub guides: Vec<Guide>,
}

impl SnapResult {
    fn unsnapped(x: f64, y: f64) -> Self {
        Self { x, y, snapped_x: false, snapped_y: false, guides: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SnapKey {
    store: Uuid,
    version: u64,
    excluded: Vec<LayerId>,
}

#[derive(Debug, Clone)]
pub struct SnapGuideEngine {
    enabled: bool,
    threshold: f64,
    cache: Option<(SnapKey, Rc<SnapPoints>)>,
    active_guides: Vec<Guide>,
}

impl Default for SnapGuideEngine {
    fn default() -> Self {
        Self { enabled: true, threshold: DEFAULT_SNAP_THRESHOLD, cache: None, active_guides: Vec::new() }
    }
}

impl SnapGuideEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning snapping off also drops the guides on screen.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.active_guides.clear();
        }
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Accept only non-negative finite thresholds.
    pub fn set_threshold(&mut self, threshold: f64) -> bool {
        if threshold.is_finite() && threshold >= 0.0 {
            self.threshold = threshold;
            true
        } else {
            warn!(threshold, "ignoring invalid snap threshold");
            false
        }
    }

    /// Guides produced by the most recent snap computation.
    #[must_use]
    pub fn active_guides(&self) -> &[Guide] {
        &self.active_guides
    }

    pub fn clear_guides(&mut self) {
        self.active_guides.clear();
    }

    /// Drop the cached index; the next query rebuilds it.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    pub fn destroy(&mut self) {
        self.cache = None;
        self.active_guides.clear();
    }

    /// Edges and centres of every visible layer not in `excluded`.
    pub fn build_snap_points(&mut self, store: &LayerStore, excluded: &[LayerId]) -> Rc<SnapPoints> {
        let mut sorted = excluded.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let key = SnapKey { store: store.identity(), version: store.version_excluding(&sorted), excluded: sorted };
        if let Some((cached_key, points)) = &self.cache {
            if *cached_key == key {
                trace!(version = key.version, "snap index cache hit");
                return Rc::clone(points);
            }
        }

        let mut points = SnapPoints::default();
        for layer in store.iter().filter(|l| l.visible) {
            if key.excluded.binary_search(&layer.id).is_ok() {
                continue;
            }
            let Some(b) = bounds(layer) else {
                continue;
            };
            let id = &layer.id;
            for (value, is_center) in [(b.top, false), (b.center_y, true), (b.bottom, false)] {
                points.horizontal.push(SnapPoint { value, source_layer_id: id.clone(), is_center });
            }
            for (value, is_center) in [(b.left, false), (b.center_x, true), (b.right, false)] {
                points.vertical.push(SnapPoint { value, source_layer_id: id.clone(), is_center });
            }
        }
        trace!(
            version = key.version,
            horizontal = points.horizontal.len(),
            vertical = points.vertical.len(),
            "snap index rebuilt"
        );
        let points = Rc::new(points);
        self.cache = Some((key, Rc::clone(&points)));
        points
    }

    /// Closest candidate within the threshold. The earliest wins a tie.
    #[must_use]
    pub fn find_nearest_snap<'a>(&self, value: f64, points: &'a [SnapPoint]) -> Option<&'a SnapPoint> {
        if !value.is_finite() {
            return None;
        }
        points
            .iter()
            .map(|p| (p, (value - p.value).abs()))
            .filter(|(_, d)| *d <= self.threshold)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(p, _)| p)
    }

    /// Snap layer `layer_id` proposed at top-left `(x, y)`, ignoring the layer itself.
    pub fn calculate_snapped_position(&mut self, store: &LayerStore, layer_id: &str, x: f64, y: f64) -> SnapResult {
        let Some(b) = store.get(layer_id).and_then(bounds) else {
            self.active_guides.clear();
            return SnapResult::unsnapped(x, y);
        };
        self.calculate_snapped_position_excluding(store, &b, x, y, &[layer_id.to_owned()])
    }

    /// Snap a box sized like `frame` proposed at top-left `(x, y)` against every
    /// visible layer not in `excluded`.
    pub fn calculate_snapped_position_excluding(
        &mut self,
        store: &LayerStore,
        frame: &Bounds,
        x: f64,
        y: f64,
        excluded: &[LayerId],
    ) -> SnapResult {
        if !self.enabled || !x.is_finite() || !y.is_finite() {
            self.active_guides.clear();
            return SnapResult::unsnapped(x, y);
        }
        let points = self.build_snap_points(store, excluded);
        let mut result = SnapResult::unsnapped(x, y);

        if let Some((offset, hit)) = self.best_axis_snap(x, frame.width, &points.vertical) {
            result.x = hit.value - offset;
            result.snapped_x = true;
            result.guides.push(Guide { kind: GuideKind::Vertical, value: hit.value, is_center: hit.is_center });
        }
        if let Some((offset, hit)) = self.best_axis_snap(y, frame.height, &points.horizontal) {
            result.y = hit.value - offset;
            result.snapped_y = true;
            result.guides.push(Guide { kind: GuideKind::Horizontal, value: hit.value, is_center: hit.is_center });
        }
        self.active_guides.clone_from(&result.guides);
        result
    }

    /// Best match of the box's start, centre or end edge along one axis,
    /// with the edge's offset from `start`.
    fn best_axis_snap<'a>(&self, start: f64, extent: f64, points: &'a [SnapPoint]) -> Option<(f64, &'a SnapPoint)> {
        [0.0, extent / 2.0, extent]
            .into_iter()
            .filter_map(|offset| self.find_nearest_snap(start + offset, points).map(|p| (offset, p)))
            .min_by(|(oa, a), (ob, b)| (start + oa - a.value).abs().total_cmp(&(start + ob - b.value).abs()))
    }

    /// Active guides as full-span screen segments, `screen = content * zoom + pan`.
    #[must_use]
    pub fn guide_lines(&self, zoom: f64, pan_x: f64, pan_y: f64, width: f64, height: f64) -> Vec<GuideLine> {
        if !self.enabled {
            return Vec::new();
        }
        self.active_guides
            .iter()
            .map(|g| match g.kind {
                GuideKind::Vertical => {
                    let sx = g.value * zoom + pan_x;
                    GuideLine { x1: sx, y1: 0.0, x2: sx, y2: height, is_center: g.is_center }
                }
                GuideKind::Horizontal => {
                    let sy = g.value * zoom + pan_y;
                    GuideLine { x1: 0.0, y1: sy, x2: width, y2: sy, is_center: g.is_center }
                }
            })
            .collect()
    }
}
