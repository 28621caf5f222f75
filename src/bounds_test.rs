#![allow(clippy::float_cmp)]

use proptest::prelude::*;

use super::*;
use crate::layer::{Polygon, Segment};

fn layer(shape: Shape) -> Layer {
    Layer::new(shape)
}

// =============================================================
// Per-variant rules
// =============================================================

#[test]
fn rectangle_bounds_basic() {
    let b = bounds(&layer(Shape::rectangle(10.0, 20.0, 100.0, 50.0))).unwrap();
    assert_eq!((b.left, b.top, b.right, b.bottom), (10.0, 20.0, 110.0, 70.0));
    assert_eq!((b.width, b.height), (100.0, 50.0));
    assert_eq!((b.center_x, b.center_y), (60.0, 45.0));
}

#[test]
fn rectangle_negative_size_is_normalized() {
    let b = bounds(&layer(Shape::rectangle(100.0, 100.0, -40.0, -30.0))).unwrap();
    assert_eq!((b.left, b.top), (60.0, 70.0));
    assert_eq!((b.width, b.height), (40.0, 30.0));
}

#[test]
fn circle_bounds_is_square_around_center() {
    let b = bounds(&layer(Shape::circle(50.0, 50.0, 25.0))).unwrap();
    assert_eq!((b.left, b.top, b.width, b.height), (25.0, 25.0, 50.0, 50.0));
}

#[test]
fn ellipse_bounds_uses_both_radii() {
    let b = bounds(&layer(Shape::Ellipse { x: 0.0, y: 0.0, radius_x: 30.0, radius_y: 10.0 })).unwrap();
    assert_eq!((b.left, b.top, b.width, b.height), (-30.0, -10.0, 60.0, 20.0));
}

#[test]
fn line_bounds_reversed_endpoints() {
    let b = bounds(&layer(Shape::Line(Segment::new(200.0, 150.0, 50.0, 10.0)))).unwrap();
    assert_eq!((b.left, b.top, b.right, b.bottom), (50.0, 10.0, 200.0, 150.0));
}

#[test]
fn arrow_bounds_include_control_point() {
    let seg = Segment::new(0.0, 0.0, 100.0, 0.0).with_control(50.0, -40.0);
    let b = bounds(&layer(Shape::Arrow(seg))).unwrap();
    assert_eq!((b.top, b.bottom), (-40.0, 0.0));
}

#[test]
fn arrow_bounds_ignore_half_control_point() {
    let mut seg = Segment::new(0.0, 0.0, 100.0, 0.0);
    seg.control_y = Some(-40.0);
    let b = bounds(&layer(Shape::Arrow(seg))).unwrap();
    assert_eq!(b.height, 0.0);
}

#[test]
fn polygon_points_bounds() {
    let poly = Polygon::from_points(vec![Point::new(0.0, 10.0), Point::new(20.0, 0.0), Point::new(40.0, 30.0)]);
    let b = bounds(&layer(Shape::Polygon(poly))).unwrap();
    assert_eq!((b.left, b.top, b.right, b.bottom), (0.0, 0.0, 40.0, 30.0));
}

#[test]
fn star_without_points_bounds_like_circle() {
    let b = bounds(&layer(Shape::Star(Polygon::regular(100.0, 100.0, 30.0, 5)))).unwrap();
    assert_eq!((b.left, b.top, b.width, b.height), (70.0, 70.0, 60.0, 60.0));
}

#[test]
fn polygon_without_points_or_radius_is_none() {
    let poly = Polygon::from_points(Vec::new());
    assert!(bounds(&layer(Shape::Polygon(poly))).is_none());
}

#[test]
fn path_with_zero_points_is_none() {
    assert!(bounds(&layer(Shape::Path { points: Vec::new() })).is_none());
}

#[test]
fn path_bounds_cover_all_points() {
    let pts = vec![Point::new(5.0, 5.0), Point::new(-5.0, 15.0), Point::new(10.0, 0.0)];
    let b = bounds(&layer(Shape::Path { points: pts })).unwrap();
    assert_eq!((b.left, b.top, b.right, b.bottom), (-5.0, 0.0, 10.0, 15.0));
}

#[test]
fn text_bounds_top_is_above_baseline() {
    let b = bounds(&layer(Shape::text(10.0, 100.0, "hello", Some(20.0)))).unwrap();
    assert_eq!(b.left, 10.0);
    assert!(b.top < 100.0);
    assert!(b.height >= 20.0);
}

#[test]
fn text_width_grows_with_length_and_size() {
    let short = bounds(&layer(Shape::text(0.0, 0.0, "ab", Some(20.0)))).unwrap();
    let long = bounds(&layer(Shape::text(0.0, 0.0, "abcdefgh", Some(20.0)))).unwrap();
    let big = bounds(&layer(Shape::text(0.0, 0.0, "abcdefgh", Some(40.0)))).unwrap();
    assert!(long.width > short.width);
    assert!(big.width > long.width);
}

#[test]
fn text_default_font_size_applies() {
    let b = bounds(&layer(Shape::text(0.0, 50.0, "x", None))).unwrap();
    assert!(b.height >= DEFAULT_FONT_SIZE);
    assert_eq!(b.top, 50.0 - DEFAULT_FONT_SIZE);
}

#[test]
fn text_empty_string_still_has_width() {
    let b = bounds(&layer(Shape::text(0.0, 0.0, "", Some(24.0)))).unwrap();
    assert!(b.width >= 24.0);
}

#[test]
fn non_finite_geometry_is_none() {
    assert!(bounds(&layer(Shape::rectangle(f64::NAN, 0.0, 10.0, 10.0))).is_none());
    assert!(bounds(&layer(Shape::circle(0.0, 0.0, f64::INFINITY))).is_none());
    let pts = vec![Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)];
    assert!(bounds(&layer(Shape::Path { points: pts })).is_none());
}

// =============================================================
// Derived helpers
// =============================================================

#[test]
fn rotated_bounds_of_unrotated_layer_match_bounds() {
    let l = layer(Shape::rectangle(0.0, 0.0, 100.0, 50.0));
    assert_eq!(rotated_bounds(&l), bounds(&l));
}

#[test]
fn rotated_bounds_quarter_turn_swaps_extent() {
    let l = layer(Shape::rectangle(0.0, 0.0, 100.0, 50.0)).rotated(90.0);
    let b = rotated_bounds(&l).unwrap();
    assert!((b.width - 50.0).abs() < 1e-9);
    assert!((b.height - 100.0).abs() < 1e-9);
    assert!((b.center_x - 50.0).abs() < 1e-9);
    assert!((b.center_y - 25.0).abs() < 1e-9);
}

#[test]
fn combined_bounds_unions_and_skips_malformed() {
    let layers = [
        layer(Shape::rectangle(0.0, 0.0, 10.0, 10.0)),
        layer(Shape::Path { points: Vec::new() }),
        layer(Shape::circle(100.0, 100.0, 5.0)),
    ];
    let b = combined_bounds(layers.iter()).unwrap();
    assert_eq!((b.left, b.top, b.right, b.bottom), (0.0, 0.0, 105.0, 105.0));
}

#[test]
fn combined_bounds_of_nothing_is_none() {
    assert!(combined_bounds(std::iter::empty()).is_none());
}

// =============================================================
// Properties
// =============================================================

fn arb_shape() -> impl Strategy<Value = Shape> {
    let v = -1000.0..1000.0f64;
    prop_oneof![
        (v.clone(), v.clone(), v.clone(), v.clone()).prop_map(|(x, y, w, h)| Shape::rectangle(x, y, w, h)),
        (v.clone(), v.clone(), v.clone()).prop_map(|(x, y, r)| Shape::circle(x, y, r)),
        (v.clone(), v.clone(), v.clone(), v.clone())
            .prop_map(|(x, y, radius_x, radius_y)| Shape::Ellipse { x, y, radius_x, radius_y }),
        (v.clone(), v.clone(), v.clone(), v.clone()).prop_map(|(a, b, c, d)| Shape::Line(Segment::new(a, b, c, d))),
        (v.clone(), v.clone(), v.clone(), v.clone(), v.clone(), v.clone())
            .prop_map(|(a, b, c, d, e, f)| Shape::Arrow(Segment::new(a, b, c, d).with_control(e, f))),
        prop::collection::vec((v.clone(), v.clone()), 1..8).prop_map(|pts| Shape::Path {
            points: pts.into_iter().map(|(x, y)| Point::new(x, y)).collect(),
        }),
        (v.clone(), v.clone(), "[a-z ]{0,20}", prop::option::of(-10.0..80.0f64))
            .prop_map(|(x, y, t, fs)| Shape::text(x, y, t, fs)),
    ]
}

proptest! {
    #[test]
    fn bounds_are_never_negative(shape in arb_shape()) {
        let b = bounds(&Layer::new(shape)).unwrap();
        prop_assert!(b.width >= 0.0);
        prop_assert!(b.height >= 0.0);
        prop_assert!((b.right - b.left - b.width).abs() < 1e-9);
        prop_assert!((b.bottom - b.top - b.height).abs() < 1e-9);
    }
}
