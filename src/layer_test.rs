#![allow(clippy::float_cmp)]

use proptest::prelude::*;
use serde_json::json;

use super::*;
use crate::bounds::bounds;

// =============================================================
// Serde
// =============================================================

#[test]
fn layer_deserializes_tagged_rectangle_with_defaults() {
    let l: Layer = serde_json::from_value(json!({
        "type": "rectangle", "id": "r1", "x": 1, "y": 2, "width": 3, "height": 4
    }))
    .unwrap();
    assert_eq!(l.id, "r1");
    assert!(l.visible);
    assert!(!l.locked);
    assert_eq!(l.rotation, 0.0);
    assert_eq!(l.shape, Shape::rectangle(1.0, 2.0, 3.0, 4.0));
}

#[test]
fn layer_without_id_gets_generated_one() {
    let a: Layer = serde_json::from_value(json!({ "type": "circle", "x": 0, "y": 0, "radius": 5 })).unwrap();
    let b: Layer = serde_json::from_value(json!({ "type": "circle", "x": 0, "y": 0, "radius": 5 })).unwrap();
    assert!(!a.id.is_empty());
    assert_ne!(a.id, b.id);
}

#[test]
fn layer_camel_case_fields() {
    let l: Layer = serde_json::from_value(json!({
        "type": "ellipse", "id": "e", "x": 0, "y": 0, "radiusX": 10, "radiusY": 4, "locked": true, "rotation": 30
    }))
    .unwrap();
    assert!(l.locked);
    assert_eq!(l.rotation, 30.0);
    assert_eq!(l.shape, Shape::Ellipse { x: 0.0, y: 0.0, radius_x: 10.0, radius_y: 4.0 });
}

#[test]
fn arrow_with_control_point_round_trips_through_json() {
    let l = Layer::new(Shape::Arrow(Segment::new(0.0, 0.0, 10.0, 10.0).with_control(5.0, -5.0))).with_id("a");
    let v = serde_json::to_value(&l).unwrap();
    assert_eq!(v["type"], "arrow");
    assert_eq!(v["controlX"], 5.0);
    let back: Layer = serde_json::from_value(v).unwrap();
    assert_eq!(back, l);
}

#[test]
fn text_font_size_key_is_camel_case() {
    let l: Layer = serde_json::from_value(json!({ "type": "text", "x": 5, "y": 6, "text": "hi", "fontSize": 20 })).unwrap();
    assert_eq!(l.shape, Shape::text(5.0, 6.0, "hi", Some(20.0)));
}

#[test]
fn unknown_type_is_rejected() {
    let r: Result<Layer, _> = serde_json::from_value(json!({ "type": "hexagon", "x": 0, "y": 0 }));
    assert!(r.is_err());
}

#[test]
fn kind_matches_tag() {
    assert_eq!(Shape::rectangle(0.0, 0.0, 1.0, 1.0).kind(), "rectangle");
    assert_eq!(Shape::Path { points: Vec::new() }.kind(), "path");
    assert_eq!(Shape::Star(Polygon::regular(0.0, 0.0, 1.0, 5)).kind(), "star");
}

// =============================================================
// Translate
// =============================================================

#[test]
fn translate_line_moves_both_endpoints_and_control() {
    let mut s = Shape::Line(Segment::new(0.0, 0.0, 10.0, 20.0).with_control(5.0, 5.0));
    s.translate(3.0, -2.0);
    assert_eq!(s, Shape::Line(Segment::new(3.0, -2.0, 13.0, 18.0).with_control(8.0, 3.0)));
}

#[test]
fn translate_path_moves_every_point() {
    let mut s = Shape::Path { points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)] };
    s.translate(10.0, 10.0);
    assert_eq!(s, Shape::Path { points: vec![Point::new(10.0, 10.0), Point::new(11.0, 11.0)] });
}

#[test]
fn translate_polygon_moves_center_and_points() {
    let mut p = Polygon::regular(5.0, 5.0, 10.0, 6);
    p.points = vec![Point::new(0.0, 0.0)];
    let mut s = Shape::Polygon(p);
    s.translate(1.0, 2.0);
    let Shape::Polygon(p) = s else { unreachable!() };
    assert_eq!((p.x, p.y), (6.0, 7.0));
    assert_eq!(p.points, vec![Point::new(1.0, 2.0)]);
}

#[test]
fn translate_text_moves_anchor() {
    let mut s = Shape::text(1.0, 1.0, "t", None);
    s.translate(4.0, 5.0);
    assert_eq!(s, Shape::text(5.0, 6.0, "t", None));
}

// =============================================================
// map_box
// =============================================================

#[test]
fn map_box_rectangle_scales_into_target() {
    let mut s = Shape::rectangle(0.0, 0.0, 100.0, 50.0);
    let from = Bounds::from_xywh(0.0, 0.0, 100.0, 50.0);
    let to = Bounds::from_xywh(10.0, 20.0, 200.0, 25.0);
    s.map_box(&from, &to);
    assert_eq!(s, Shape::rectangle(10.0, 20.0, 200.0, 25.0));
}

#[test]
fn map_box_line_in_group_keeps_relative_position() {
    let mut s = Shape::Line(Segment::new(50.0, 0.0, 100.0, 100.0));
    let from = Bounds::from_xywh(0.0, 0.0, 100.0, 100.0);
    let to = Bounds::from_xywh(0.0, 0.0, 200.0, 100.0);
    s.map_box(&from, &to);
    assert_eq!(s, Shape::Line(Segment::new(100.0, 0.0, 200.0, 100.0)));
}

#[test]
fn map_box_zero_width_source_translates_only() {
    let mut s = Shape::Line(Segment::new(10.0, 0.0, 10.0, 100.0));
    let from = Bounds::from_xywh(10.0, 0.0, 0.0, 100.0);
    let to = Bounds::from_xywh(30.0, 0.0, 0.0, 50.0);
    s.map_box(&from, &to);
    assert_eq!(s, Shape::Line(Segment::new(30.0, 0.0, 30.0, 50.0)));
}

#[test]
fn map_box_circle_uses_dominant_axis() {
    let mut s = Shape::circle(50.0, 50.0, 50.0);
    let from = Bounds::from_xywh(0.0, 0.0, 100.0, 100.0);
    let to = Bounds::from_xywh(0.0, 0.0, 100.0, 160.0);
    s.map_box(&from, &to);
    assert_eq!(s, Shape::circle(50.0, 80.0, 80.0));
}

#[test]
fn map_box_ellipse_scales_each_radius() {
    let mut s = Shape::Ellipse { x: 50.0, y: 25.0, radius_x: 50.0, radius_y: 25.0 };
    let from = Bounds::from_xywh(0.0, 0.0, 100.0, 50.0);
    let to = Bounds::from_xywh(0.0, 0.0, 50.0, 100.0);
    s.map_box(&from, &to);
    assert_eq!(s, Shape::Ellipse { x: 25.0, y: 50.0, radius_x: 25.0, radius_y: 50.0 });
}

#[test]
fn map_box_text_scales_font_and_keeps_top_left() {
    let l = Layer::new(Shape::text(0.0, 20.0, "abcd", Some(20.0)));
    let from = bounds(&l).unwrap();
    let to = Bounds::from_xywh(from.left, from.top, from.width * 2.0, from.height * 2.0);
    let mut s = l.shape.clone();
    s.map_box(&from, &to);
    let Shape::Text { x, y, font_size, .. } = s else { unreachable!() };
    assert_eq!(x, 0.0);
    assert_eq!(font_size, Some(40.0));
    assert_eq!(y - 40.0, from.top);
}

// =============================================================
// Properties
// =============================================================

/// Every coordinate-bearing field of a shape, in declaration order.
/// Optional fields keep their `None` so a lost control point shows up.
fn coordinates(shape: &Shape) -> Vec<Option<f64>> {
    let pts = |points: &[Point]| points.iter().flat_map(|p| [Some(p.x), Some(p.y)]).collect::<Vec<_>>();
    match shape {
        Shape::Rectangle { x, y, width, height } => vec![Some(*x), Some(*y), Some(*width), Some(*height)],
        Shape::Circle { x, y, radius } => vec![Some(*x), Some(*y), Some(*radius)],
        Shape::Ellipse { x, y, radius_x, radius_y } => vec![Some(*x), Some(*y), Some(*radius_x), Some(*radius_y)],
        Shape::Line(s) | Shape::Arrow(s) => {
            vec![Some(s.x1), Some(s.y1), Some(s.x2), Some(s.y2), s.control_x, s.control_y]
        }
        Shape::Polygon(p) | Shape::Star(p) => {
            let mut v = pts(&p.points);
            v.extend([Some(p.x), Some(p.y), p.radius, p.inner_radius]);
            v
        }
        Shape::Text { x, y, font_size, .. } => vec![Some(*x), Some(*y), *font_size],
        Shape::Path { points } => pts(points),
    }
}

fn same_coordinates(a: &Shape, b: &Shape) -> bool {
    let (ca, cb) = (coordinates(a), coordinates(b));
    a.kind() == b.kind()
        && ca.len() == cb.len()
        && ca.iter().zip(&cb).all(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => (x - y).abs() < 1e-9,
            (None, None) => true,
            _ => false,
        })
}

proptest! {
    #[test]
    fn translate_round_trip_restores_geometry(
        x in -500.0..500.0f64,
        y in -500.0..500.0f64,
        dx in -300.0..300.0f64,
        dy in -300.0..300.0f64,
    ) {
        let star = Polygon { inner_radius: Some(6.0), ..Polygon::regular(x, y, 15.0, 5) };
        let shapes = vec![
            Shape::rectangle(x, y, 40.0, 30.0),
            Shape::circle(x, y, 12.0),
            Shape::Ellipse { x, y, radius_x: 20.0, radius_y: 8.0 },
            Shape::Line(Segment::new(x, y, x + 25.0, y + 4.0)),
            Shape::Arrow(Segment::new(x, y, x + 10.0, y - 5.0).with_control(x + 3.0, y + 3.0)),
            Shape::Polygon(Polygon::from_points(vec![Point::new(x, y), Point::new(x + 9.0, y), Point::new(x, y + 7.0)])),
            Shape::Star(star),
            Shape::Path { points: vec![Point::new(x, y), Point::new(y, x)] },
            Shape::text(x, y, "abc", Some(14.0)),
        ];
        for original in shapes {
            let mut s = original.clone();
            s.translate(dx, dy);
            s.translate(-dx, -dy);
            prop_assert!(same_coordinates(&original, &s), "{original:?} became {s:?}");
            if let (Shape::Polygon(a) | Shape::Star(a), Shape::Polygon(b) | Shape::Star(b)) = (&original, &s) {
                prop_assert_eq!(a.sides, b.sides);
            }
            if let (Shape::Text { text: a, .. }, Shape::Text { text: b, .. }) = (&original, &s) {
                prop_assert_eq!(a, b);
            }
        }
    }
}
