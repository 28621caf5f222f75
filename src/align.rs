//! Alignment and distribution of the selected layers.
//!
//! Only selected layers that exist, are unlocked and have bounds take part.
//! Alignment needs at least two of them, distribution at least three; below
//! that nothing moves. Every function returns how many layers it moved so
//! the caller can decide whether a redraw and checkpoint are due.

#[cfg(test)]
#[path = "align_test.rs"]
mod align_test;

use tracing::debug;

use crate::bounds::bounds;
use crate::doc::LayerStore;
use crate::geom::Bounds;
use crate::layer::LayerId;
use crate::selection::SelectionSet;

/// Fewest participating layers for an align operation.
pub const MIN_ALIGN_COUNT: usize = 2;

/// Fewest participating layers for a distribute operation.
pub const MIN_DISTRIBUTE_COUNT: usize = 3;

/// Which edge or centre line to line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    /// Horizontal centres (`center_x`).
    CenterH,
    /// Vertical centres (`center_y`).
    CenterV,
}

impl Alignment {
    fn coordinate(self, b: &Bounds) -> f64 {
        match self {
            Self::Left => b.left,
            Self::Right => b.right,
            Self::Top => b.top,
            Self::Bottom => b.bottom,
            Self::CenterH => b.center_x,
            Self::CenterV => b.center_y,
        }
    }

    /// Anchor value taken from the whole selection when there is no key object.
    fn selection_anchor(self, combined: &Bounds) -> f64 {
        self.coordinate(combined)
    }

    fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right | Self::CenterH => Axis::Horizontal,
            Self::Top | Self::Bottom | Self::CenterV => Axis::Vertical,
        }
    }
}

/// Direction of a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn center(self, b: &Bounds) -> f64 {
        match self {
            Self::Horizontal => b.center_x,
            Self::Vertical => b.center_y,
        }
    }

    fn delta(self, d: f64) -> (f64, f64) {
        match self {
            Self::Horizontal => (d, 0.0),
            Self::Vertical => (0.0, d),
        }
    }
}

fn participants(store: &LayerStore, selection: &SelectionSet) -> Vec<(LayerId, Bounds)> {
    selection
        .active_layers(store)
        .into_iter()
        .filter_map(|l| bounds(l).map(|b| (l.id.clone(), b)))
        .collect()
}

fn shift(store: &mut LayerStore, id: &str, axis: Axis, d: f64) -> bool {
    if d == 0.0 || !d.is_finite() {
        return false;
    }
    let (dx, dy) = axis.delta(d);
    match store.get_mut(id) {
        Some(layer) => {
            layer.translate(dx, dy);
            true
        }
        None => false,
    }
}

/// Line up the selection on `alignment`, anchored on the key object when it
/// takes part, else on the selection's combined box.
pub fn align(store: &mut LayerStore, selection: &SelectionSet, alignment: Alignment) -> usize {
    let items = participants(store, selection);
    if items.len() < MIN_ALIGN_COUNT {
        return 0;
    }
    let key = selection.key_layer_id(store).and_then(|k| items.iter().find(|(id, _)| id == k)).cloned();
    let anchor = match &key {
        Some((_, b)) => alignment.coordinate(b),
        None => {
            let Some(combined) = items.iter().map(|(_, b)| *b).reduce(|a, b| a.union(&b)) else {
                return 0;
            };
            alignment.selection_anchor(&combined)
        }
    };
    let axis = alignment.axis();
    let mut moved = 0;
    for (id, b) in &items {
        if key.as_ref().is_some_and(|(k, _)| k == id) {
            continue;
        }
        if shift(store, id, axis, anchor - alignment.coordinate(b)) {
            moved += 1;
        }
    }
    debug!(?alignment, anchor, moved, keyed = key.is_some(), "aligned selection");
    moved
}

/// Space the selection's centres evenly between the outermost two along `axis`.
///
/// Layers are ordered by centre with a stable sort, so equal centres keep
/// their selection order. The first and last never move.
#[allow(clippy::cast_precision_loss)]
pub fn distribute(store: &mut LayerStore, selection: &SelectionSet, axis: Axis) -> usize {
    let mut items = participants(store, selection);
    if items.len() < MIN_DISTRIBUTE_COUNT {
        return 0;
    }
    items.sort_by(|(_, a), (_, b)| axis.center(a).total_cmp(&axis.center(b)));
    let n = items.len();
    let first = axis.center(&items[0].1);
    let last = axis.center(&items[n - 1].1);
    let step = (last - first) / (n - 1) as f64;
    let mut moved = 0;
    for (i, (id, b)) in items.iter().enumerate().take(n - 1).skip(1) {
        let target = first + i as f64 * step;
        if shift(store, id, axis, target - axis.center(b)) {
            moved += 1;
        }
    }
    debug!(?axis, moved, step, "distributed selection");
    moved
}

pub fn align_left(store: &mut LayerStore, selection: &SelectionSet) -> usize {
    align(store, selection, Alignment::Left)
}

pub fn align_right(store: &mut LayerStore, selection: &SelectionSet) -> usize {
    align(store, selection, Alignment::Right)
}

pub fn align_top(store: &mut LayerStore, selection: &SelectionSet) -> usize {
    align(store, selection, Alignment::Top)
}

pub fn align_bottom(store: &mut LayerStore, selection: &SelectionSet) -> usize {
    align(store, selection, Alignment::Bottom)
}

pub fn align_center_h(store: &mut LayerStore, selection: &SelectionSet) -> usize {
    align(store, selection, Alignment::CenterH)
}

pub fn align_center_v(store: &mut LayerStore, selection: &SelectionSet) -> usize {
    align(store, selection, Alignment::CenterV)
}

pub fn distribute_horizontal(store: &mut LayerStore, selection: &SelectionSet) -> usize {
    distribute(store, selection, Axis::Horizontal)
}

pub fn distribute_vertical(store: &mut LayerStore, selection: &SelectionSet) -> usize {
    distribute(store, selection, Axis::Vertical)
}
