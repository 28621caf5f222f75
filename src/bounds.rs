//! Bounds calculator: maps a layer to its axis-aligned bounding box.
//!
//! Boxes ignore `rotation`; they describe the layer in its own unrotated
//! frame, which is the frame resize handles live in. [`rotated_bounds`] gives
//! the on-screen footprint of a rotated layer when that is needed instead.

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;

use crate::consts::{DEFAULT_FONT_SIZE, TEXT_CHAR_WIDTH_RATIO, TEXT_LINE_HEIGHT_RATIO};
use crate::geom::{Affine, Bounds, Point};
use crate::layer::{Layer, Shape};

/// Bounding box of a layer, or `None` for malformed geometry.
///
/// Malformed means any non-finite number, or a point-defined path, polygon
/// or star with no points (and, for polygons and stars, no radius either).
#[must_use]
pub fn bounds(layer: &Layer) -> Option<Bounds> {
    shape_bounds(&layer.shape)
}

/// Bounding box of a bare shape. See [`bounds`].
#[must_use]
pub fn shape_bounds(shape: &Shape) -> Option<Bounds> {
    if !shape.is_finite() {
        return None;
    }
    match shape {
        Shape::Rectangle { x, y, width, height } => Some(Bounds::from_xywh(*x, *y, *width, *height)),
        Shape::Circle { x, y, radius } => Some(Bounds::from_center(Point::new(*x, *y), *radius, *radius)),
        Shape::Ellipse { x, y, radius_x, radius_y } => {
            Some(Bounds::from_center(Point::new(*x, *y), *radius_x, *radius_y))
        }
        Shape::Line(s) | Shape::Arrow(s) => {
            let mut pts = vec![Point::new(s.x1, s.y1), Point::new(s.x2, s.y2)];
            pts.extend(s.control());
            Bounds::from_points(pts)
        }
        Shape::Polygon(p) | Shape::Star(p) => {
            if p.points.is_empty() {
                p.radius.map(|r| Bounds::from_center(Point::new(p.x, p.y), r, r))
            } else {
                Bounds::from_points(p.points.iter().copied())
            }
        }
        Shape::Text { x, y, text, font_size } => {
            let size = text_font_size(*font_size);
            let chars = text.chars().count() as f64;
            let width = (chars * size * TEXT_CHAR_WIDTH_RATIO).max(size);
            let height = size * TEXT_LINE_HEIGHT_RATIO;
            Some(Bounds::from_xywh(*x, *y - size, width, height))
        }
        Shape::Path { points } => Bounds::from_points(points.iter().copied()),
    }
}

/// Effective font size: the layer's own when positive, else the default.
#[must_use]
pub fn text_font_size(font_size: Option<f64>) -> f64 {
    match font_size {
        Some(s) if s > 0.0 && s.is_finite() => s,
        _ => DEFAULT_FONT_SIZE,
    }
}

/// Axis-aligned box of a layer after applying its rotation about its centre.
#[must_use]
pub fn rotated_bounds(layer: &Layer) -> Option<Bounds> {
    let b = bounds(layer)?;
    if layer.rotation == 0.0 || !layer.rotation.is_finite() {
        return Some(b);
    }
    let t = Affine::rotate_about(b.center(), layer.rotation.to_radians());
    Bounds::from_points(b.corners().map(|c| t.apply(c)))
}

/// Union of the boxes of all layers that have one.
pub fn combined_bounds<'a, I>(layers: I) -> Option<Bounds>
where
    I: IntoIterator<Item = &'a Layer>,
{
    layers
        .into_iter()
        .filter_map(bounds)
        .reduce(|acc, b| acc.union(&b))
}
