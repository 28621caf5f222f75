#![allow(clippy::float_cmp)]

use proptest::prelude::*;

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn with_canvas(w: f64, h: f64) -> Viewport {
    let mut vp = Viewport::new();
    vp.set_canvas_geometry(Some(CanvasGeometry::new(10.0, 20.0, w, h)));
    vp
}

// --- Defaults ---

#[test]
fn default_state() {
    let vp = Viewport::new();
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.pan(), Point::new(0.0, 0.0));
    assert_eq!(vp.zoom_limits(), (DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM));
    assert!(!vp.snap_to_grid());
    assert_eq!(vp.grid_size(), DEFAULT_GRID_SIZE);
    assert!(!vp.is_panning());
    assert!(vp.viewport_bounds().is_none());
}

// --- Conversions ---

#[test]
fn client_to_content_applies_offset_zoom_and_pan() {
    let mut vp = with_canvas(800.0, 600.0);
    vp.set_zoom(2.0);
    vp.set_pan(5.0, -5.0);
    let p = vp.client_to_content(110.0, 220.0).unwrap();
    assert!(approx_eq(p.x, 45.0));
    assert!(approx_eq(p.y, 105.0));
}

#[test]
fn client_to_content_without_canvas_uses_zero_offset() {
    let vp = Viewport::new();
    assert_eq!(vp.client_to_content(30.0, 40.0), Some(Point::new(30.0, 40.0)));
}

#[test]
fn non_finite_client_point_is_none() {
    let vp = Viewport::new();
    assert!(vp.client_to_content(f64::NAN, 0.0).is_none());
    assert!(vp.client_to_content_raw(0.0, f64::INFINITY).is_none());
    assert!(vp.content_to_client(f64::NAN, 1.0).is_none());
}

#[test]
fn grid_snap_applies_only_to_snapped_conversion() {
    let mut vp = Viewport::new();
    vp.set_snap_to_grid(true);
    vp.set_grid_size(10.0);
    assert_eq!(vp.client_to_content(14.0, 26.0), Some(Point::new(10.0, 30.0)));
    assert_eq!(vp.client_to_content_raw(14.0, 26.0), Some(Point::new(14.0, 26.0)));
}

// --- Zoom limits ---

#[test]
fn set_zoom_clamps_below_minimum() {
    let mut vp = Viewport::new();
    vp.set_zoom(0.01);
    assert_eq!(vp.zoom(), DEFAULT_MIN_ZOOM);
}

#[test]
fn set_zoom_clamps_above_maximum() {
    let mut vp = Viewport::new();
    vp.set_zoom(10.0);
    assert_eq!(vp.zoom(), DEFAULT_MAX_ZOOM);
}

#[test]
fn set_zoom_marks_user_zoom_and_ignores_nan() {
    let mut vp = Viewport::new();
    assert!(vp.set_zoom(2.0));
    assert!(vp.user_set_zoom());
    assert!(!vp.set_zoom(f64::NAN));
    assert_eq!(vp.zoom(), 2.0);
}

#[test]
fn set_zoom_limits_reclamps_and_rejects_inverted() {
    let mut vp = Viewport::new();
    vp.set_zoom(4.0);
    assert!(vp.set_zoom_limits(0.5, 2.0));
    assert_eq!(vp.zoom(), 2.0);
    assert!(!vp.set_zoom_limits(3.0, 1.0));
    assert!(!vp.set_zoom_limits(0.0, 1.0));
    assert_eq!(vp.zoom_limits(), (0.5, 2.0));
}

#[test]
fn zoom_percent_rounds() {
    let mut vp = Viewport::new();
    vp.set_zoom(1.2345);
    assert_eq!(vp.zoom_percent(), 123);
}

// --- Anchored zoom ---

#[test]
fn zoom_by_keeps_anchor_content_point_fixed() {
    let mut vp = with_canvas(800.0, 600.0);
    vp.set_pan(-30.0, 12.0);
    let anchor = Point::new(410.0, 320.0);
    let before = vp.client_to_content_raw(anchor.x, anchor.y).unwrap();
    vp.zoom_by(0.5, Some(anchor));
    let after = vp.client_to_content_raw(anchor.x, anchor.y).unwrap();
    assert_eq!(vp.zoom(), 1.5);
    assert!(approx_eq(before.x, after.x));
    assert!(approx_eq(before.y, after.y));
}

#[test]
fn zoom_by_without_anchor_keeps_pan() {
    let mut vp = Viewport::new();
    vp.set_pan(7.0, 8.0);
    vp.zoom_by(-0.5, None);
    assert_eq!(vp.zoom(), 0.5);
    assert_eq!(vp.pan(), Point::new(7.0, 8.0));
}

// --- Smooth zoom ---

#[test]
fn smooth_zoom_reaches_target_and_stops() {
    let mut vp = Viewport::new();
    assert!(vp.smooth_zoom_to(2.0, None, 0.0));
    assert!(vp.is_animating());
    assert!(vp.tick(150.0));
    assert!(vp.zoom() > 1.0 && vp.zoom() < 2.0);
    assert!(vp.tick(DEFAULT_ZOOM_DURATION_MS));
    assert_eq!(vp.zoom(), 2.0);
    assert!(!vp.is_animating());
    assert!(!vp.tick(400.0));
}

#[test]
fn smooth_zoom_never_overshoots() {
    let mut vp = Viewport::new();
    vp.smooth_zoom_to(3.0, Some(100.0), 0.0);
    for t in 0..=20 {
        let z = vp.zoom_at(f64::from(t) * 7.0);
        assert!((1.0..=3.0).contains(&z));
    }
}

#[test]
fn smooth_zoom_to_current_is_noop() {
    let mut vp = Viewport::new();
    assert!(!vp.smooth_zoom_to(1.0, None, 0.0));
    assert!(!vp.is_animating());
}

#[test]
fn smooth_zoom_clamps_target() {
    let mut vp = Viewport::new();
    vp.smooth_zoom_to(50.0, Some(10.0), 0.0);
    vp.tick(10.0);
    assert_eq!(vp.zoom(), DEFAULT_MAX_ZOOM);
}

#[test]
fn set_zoom_cancels_animation() {
    let mut vp = Viewport::new();
    vp.smooth_zoom_to(3.0, None, 0.0);
    vp.set_zoom(0.5);
    assert!(!vp.is_animating());
    assert_eq!(vp.zoom(), 0.5);
}

// --- Fitting ---

#[test]
fn fit_to_window_scales_image_into_padded_container() {
    let mut vp = with_canvas(840.0, 640.0);
    vp.set_pan(100.0, 100.0);
    vp.set_zoom(3.0);
    assert!(vp.fit_to_window(Some(ImageSize { width: 1600.0, height: 600.0 })));
    assert!(approx_eq(vp.zoom(), 0.5));
    assert_eq!(vp.pan(), Point::new(0.0, 0.0));
    assert!(!vp.user_set_zoom());
}

#[test]
fn fit_to_window_without_image_or_canvas_is_noop() {
    let mut vp = Viewport::new();
    assert!(!vp.fit_to_window(Some(ImageSize { width: 100.0, height: 100.0 })));
    let mut vp = with_canvas(800.0, 600.0);
    assert!(!vp.fit_to_window(None));
    assert!(!vp.fit_to_window(Some(ImageSize { width: 0.0, height: 100.0 })));
    assert_eq!(vp.zoom(), 1.0);
}

#[test]
fn zoom_to_fit_bounds_centres_box() {
    let mut vp = with_canvas(800.0, 600.0);
    let b = Bounds::from_xywh(100.0, 100.0, 300.0, 200.0);
    assert!(vp.zoom_to_fit_bounds(Some(&b), Some(50.0)));
    assert!(approx_eq(vp.zoom(), 2.0));
    let c = vp.content_to_client(b.center_x, b.center_y).unwrap();
    assert!(approx_eq(c.x, 10.0 + 400.0));
    assert!(approx_eq(c.y, 20.0 + 300.0));
}

#[test]
fn zoom_to_fit_bounds_needs_canvas() {
    let mut vp = Viewport::new();
    let b = Bounds::from_xywh(0.0, 0.0, 10.0, 10.0);
    assert!(!vp.zoom_to_fit_bounds(Some(&b), None));
    assert!(!vp.zoom_to_fit_bounds(None, None));
}

// --- Visible bounds ---

#[test]
fn viewport_bounds_track_zoom_and_pan() {
    let mut vp = with_canvas(800.0, 600.0);
    vp.set_zoom(2.0);
    vp.set_pan(-50.0, -25.0);
    let b = vp.viewport_bounds().unwrap();
    assert_eq!(b.left, 50.0);
    assert_eq!(b.top, 25.0);
    assert_eq!(b.width, 400.0);
    assert_eq!(b.height, 300.0);
}

#[test]
fn update_viewport_bounds_without_canvas_keeps_previous() {
    let mut vp = Viewport::new();
    vp.update_viewport_bounds();
    assert!(vp.viewport_bounds().is_none());
}

// --- Pan ---

#[test]
fn pan_gesture_adds_pointer_delta() {
    let mut vp = Viewport::new();
    vp.start_pan(100.0, 100.0);
    assert!(vp.is_panning());
    assert!(vp.update_pan(110.0, 95.0));
    assert!(vp.update_pan(120.0, 95.0));
    assert_eq!(vp.pan(), Point::new(20.0, -5.0));
    vp.stop_pan();
    assert!(!vp.update_pan(500.0, 500.0));
    assert_eq!(vp.pan(), Point::new(20.0, -5.0));
}

// --- Grid ---

#[test]
fn set_grid_size_rejects_invalid() {
    let mut vp = Viewport::new();
    assert!(!vp.set_grid_size(0.0));
    assert!(!vp.set_grid_size(-5.0));
    assert!(!vp.set_grid_size(f64::NAN));
    assert_eq!(vp.grid_size(), DEFAULT_GRID_SIZE);
    assert!(vp.set_grid_size(25.0));
    assert_eq!(vp.grid_size(), 25.0);
}

#[test]
fn snap_value_rounds_to_nearest_multiple() {
    assert_eq!(snap_value(29.0, 20.0), 20.0);
    assert_eq!(snap_value(31.0, 20.0), 40.0);
    assert_eq!(snap_value(-11.0, 20.0), -20.0);
    assert_eq!(snap_value(7.0, 0.0), 7.0);
}

// --- Lifecycle ---

#[test]
fn reset_returns_to_identity_view() {
    let mut vp = with_canvas(800.0, 600.0);
    vp.set_zoom(3.0);
    vp.set_pan(9.0, 9.0);
    vp.reset();
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.pan(), Point::new(0.0, 0.0));
    assert!(!vp.user_set_zoom());
}

#[test]
fn destroy_drops_canvas_and_animation() {
    let mut vp = with_canvas(800.0, 600.0);
    vp.smooth_zoom_to(2.0, None, 0.0);
    vp.start_pan(0.0, 0.0);
    vp.destroy();
    assert!(vp.canvas().is_none());
    assert!(!vp.is_animating());
    assert!(!vp.is_panning());
    assert_eq!(vp.client_to_content_raw(10.0, 20.0), Some(Point::new(10.0, 20.0)));
}

// --- Properties ---

proptest! {
    #[test]
    fn client_content_round_trip(
        cx in -5000.0f64..5000.0,
        cy in -5000.0f64..5000.0,
        zoom in 0.1f64..5.0,
        px in -1000.0f64..1000.0,
        py in -1000.0f64..1000.0,
    ) {
        let mut vp = with_canvas(800.0, 600.0);
        vp.set_zoom(zoom);
        vp.set_pan(px, py);
        let content = vp.client_to_content_raw(cx, cy).unwrap();
        let back = vp.content_to_client(content.x, content.y).unwrap();
        prop_assert!((back.x - cx).abs() < 1e-6);
        prop_assert!((back.y - cy).abs() < 1e-6);
    }

    #[test]
    fn zoom_always_within_limits(z in -100.0f64..100.0) {
        let mut vp = Viewport::new();
        vp.set_zoom(z);
        let (min, max) = vp.zoom_limits();
        prop_assert!(vp.zoom() >= min && vp.zoom() <= max);
    }
}
