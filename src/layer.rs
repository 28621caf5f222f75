//! Layer model: the shape sum type and its per-variant geometry operations.
//!
//! A [`Layer`] is one drawable object. Its geometry lives in [`Shape`], a
//! closed set of variants matched exhaustively by every geometry routine, so
//! adding a shape kind is a compile-time decision. Layers travel as JSON
//! objects tagged by `"type"`, with the common flags (`id`, `visible`,
//! `locked`, `rotation`) on the same object.

#[cfg(test)]
#[path = "layer_test.rs"]
mod layer_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::{Bounds, Point};

/// Unique, stable identifier of a layer.
pub type LayerId = String;

/// Generate a fresh layer id.
#[must_use]
pub fn new_layer_id() -> LayerId {
    Uuid::new_v4().to_string()
}

fn default_true() -> bool {
    true
}

/// One drawable shape with its lock and visibility flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(default = "new_layer_id")]
    pub id: LayerId,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    /// Clockwise rotation in degrees around the bounds centre.
    #[serde(default)]
    pub rotation: f64,
    #[serde(flatten)]
    pub shape: Shape,
}

impl Layer {
    /// Visible, unlocked layer with a fresh id.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self { id: new_layer_id(), visible: true, locked: false, rotation: 0.0, shape }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<LayerId>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Visible and unlocked: may be picked by marquee and moved by tools.
    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.visible && !self.locked
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.shape.translate(dx, dy);
    }
}

/// End points of a line or arrow, with an optional quadratic control point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_y: Option<f64>,
}

impl Segment {
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2, control_x: None, control_y: None }
    }

    #[must_use]
    pub fn with_control(mut self, x: f64, y: f64) -> Self {
        self.control_x = Some(x);
        self.control_y = Some(y);
        self
    }

    /// The control point, only when both of its coordinates are present.
    #[must_use]
    pub fn control(&self) -> Option<Point> {
        match (self.control_x, self.control_y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }

    fn points(&self) -> Vec<Point> {
        let mut pts = vec![Point::new(self.x1, self.y1), Point::new(self.x2, self.y2)];
        pts.extend(self.control());
        pts
    }
}

/// Polygon or star: either explicit vertices or a regular figure around `x, y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Point>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<u32>,
}

impl Polygon {
    #[must_use]
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points, x: 0.0, y: 0.0, radius: None, inner_radius: None, sides: None }
    }

    #[must_use]
    pub fn regular(x: f64, y: f64, radius: f64, sides: u32) -> Self {
        Self { points: Vec::new(), x, y, radius: Some(radius), inner_radius: None, sides: Some(sides) }
    }
}

/// Geometry of a layer, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Shape {
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
    },
    Ellipse {
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
    },
    Line(Segment),
    Arrow(Segment),
    Polygon(Polygon),
    Star(Polygon),
    Text {
        x: f64,
        y: f64,
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f64>,
    },
    Path {
        #[serde(default)]
        points: Vec<Point>,
    },
}

impl Shape {
    #[must_use]
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rectangle { x, y, width, height }
    }

    #[must_use]
    pub fn circle(x: f64, y: f64, radius: f64) -> Self {
        Self::Circle { x, y, radius }
    }

    #[must_use]
    pub fn text(x: f64, y: f64, text: impl Into<String>, font_size: Option<f64>) -> Self {
        Self::Text { x, y, text: text.into(), font_size }
    }

    /// Lowercase kind name as used in the `"type"` tag.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "rectangle",
            Self::Circle { .. } => "circle",
            Self::Ellipse { .. } => "ellipse",
            Self::Line(_) => "line",
            Self::Arrow(_) => "arrow",
            Self::Polygon(_) => "polygon",
            Self::Star(_) => "star",
            Self::Text { .. } => "text",
            Self::Path { .. } => "path",
        }
    }

    /// Every geometry number is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        let pts_ok = |pts: &[Point]| pts.iter().all(|p| p.is_finite());
        match self {
            Self::Rectangle { x, y, width, height } => [x, y, width, height].iter().all(|v| v.is_finite()),
            Self::Circle { x, y, radius } => [x, y, radius].iter().all(|v| v.is_finite()),
            Self::Ellipse { x, y, radius_x, radius_y } => [x, y, radius_x, radius_y].iter().all(|v| v.is_finite()),
            Self::Line(s) | Self::Arrow(s) => pts_ok(&s.points()) && opt_finite(s.control_x) && opt_finite(s.control_y),
            Self::Polygon(p) | Self::Star(p) => {
                pts_ok(&p.points)
                    && p.x.is_finite()
                    && p.y.is_finite()
                    && opt_finite(p.radius)
                    && opt_finite(p.inner_radius)
            }
            Self::Text { x, y, font_size, .. } => x.is_finite() && y.is_finite() && opt_finite(*font_size),
            Self::Path { points } => pts_ok(points),
        }
    }

    /// Move every coordinate of the shape by `(dx, dy)`.
    ///
    /// Lines and arrows move both endpoints and the control point; paths and
    /// point-defined polygons move every vertex.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Rectangle { x, y, .. }
            | Self::Circle { x, y, .. }
            | Self::Ellipse { x, y, .. }
            | Self::Text { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Self::Line(s) | Self::Arrow(s) => {
                s.x1 += dx;
                s.y1 += dy;
                s.x2 += dx;
                s.y2 += dy;
                if let Some(cx) = s.control_x.as_mut() {
                    *cx += dx;
                }
                if let Some(cy) = s.control_y.as_mut() {
                    *cy += dy;
                }
            }
            Self::Polygon(p) | Self::Star(p) => {
                p.x += dx;
                p.y += dy;
                translate_points(&mut p.points, dx, dy);
            }
            Self::Path { points } => translate_points(points, dx, dy),
        }
    }

    /// Re-fit the shape from box `from` into box `to`, scaling each axis independently.
    ///
    /// Radius-defined shapes scale their radius by the dominant axis factor;
    /// text scales its font size the same way.
    pub fn map_box(&mut self, from: &Bounds, to: &Bounds) {
        let m = BoxMap::new(from, to);
        match self {
            Self::Rectangle { x, y, width, height } => {
                let x0 = m.x(*x);
                let y0 = m.y(*y);
                let x1 = m.x(*x + *width);
                let y1 = m.y(*y + *height);
                *x = x0.min(x1);
                *y = y0.min(y1);
                *width = (x1 - x0).abs();
                *height = (y1 - y0).abs();
            }
            Self::Circle { x, y, radius } => {
                *x = m.x(*x);
                *y = m.y(*y);
                *radius = (*radius * m.dominant()).abs();
            }
            Self::Ellipse { x, y, radius_x, radius_y } => {
                *x = m.x(*x);
                *y = m.y(*y);
                *radius_x = (*radius_x * m.sx).abs();
                *radius_y = (*radius_y * m.sy).abs();
            }
            Self::Line(s) | Self::Arrow(s) => {
                s.x1 = m.x(s.x1);
                s.y1 = m.y(s.y1);
                s.x2 = m.x(s.x2);
                s.y2 = m.y(s.y2);
                s.control_x = s.control_x.map(|v| m.x(v));
                s.control_y = s.control_y.map(|v| m.y(v));
            }
            Self::Polygon(p) | Self::Star(p) => {
                p.x = m.x(p.x);
                p.y = m.y(p.y);
                p.radius = p.radius.map(|r| (r * m.dominant()).abs());
                p.inner_radius = p.inner_radius.map(|r| (r * m.dominant()).abs());
                for pt in &mut p.points {
                    *pt = m.point(*pt);
                }
            }
            Self::Text { x, y, font_size, .. } => {
                let size = crate::bounds::text_font_size(*font_size);
                let new_size = (size * m.dominant()).abs().max(1.0);
                let top = m.y(*y - size);
                *x = m.x(*x);
                *y = top + new_size;
                *font_size = Some(new_size);
            }
            Self::Path { points } => {
                for pt in points.iter_mut() {
                    *pt = m.point(*pt);
                }
            }
        }
    }
}

fn opt_finite(v: Option<f64>) -> bool {
    v.is_none_or(f64::is_finite)
}

fn translate_points(points: &mut [Point], dx: f64, dy: f64) {
    for p in points {
        p.x += dx;
        p.y += dy;
    }
}

/// Per-axis linear map between two boxes. A zero-extent source axis maps by
/// centre translation only.
struct BoxMap<'a> {
    from: &'a Bounds,
    to: &'a Bounds,
    sx: f64,
    sy: f64,
}

impl<'a> BoxMap<'a> {
    fn new(from: &'a Bounds, to: &'a Bounds) -> Self {
        let sx = if from.width > 0.0 { to.width / from.width } else { 1.0 };
        let sy = if from.height > 0.0 { to.height / from.height } else { 1.0 };
        Self { from, to, sx, sy }
    }

    fn x(&self, v: f64) -> f64 {
        if self.from.width > 0.0 {
            self.to.left + (v - self.from.left) * self.sx
        } else {
            v + (self.to.center_x - self.from.center_x)
        }
    }

    fn y(&self, v: f64) -> f64 {
        if self.from.height > 0.0 {
            self.to.top + (v - self.from.top) * self.sy
        } else {
            v + (self.to.center_y - self.from.center_y)
        }
    }

    fn point(&self, p: Point) -> Point {
        Point::new(self.x(p.x), self.y(p.y))
    }

    /// The axis factor that moved furthest from 1.
    fn dominant(&self) -> f64 {
        if (self.sx - 1.0).abs() >= (self.sy - 1.0).abs() { self.sx } else { self.sy }
    }
}
