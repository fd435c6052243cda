#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn room_bounds(w: f64, h: f64) -> Bounds {
    Bounds { min_x: 0.0, max_x: w, min_y: 0.0, max_y: h }
}

// --- Defaults ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    let p = Point::new(12.0, -3.0);
    assert_eq!(cam.room_to_screen(p), p);
    assert_eq!(cam.screen_to_room(p), p);
}

// --- fit ---

#[test]
fn fit_exact_scale_one() {
    // 620 - 120 = 500 available for a 500-wide room; 470 - 120 = 350 for 350.
    let cam = Camera::fit(620.0, 470.0, room_bounds(500.0, 350.0), 1.0);
    assert_eq!(cam.scale, 1.0);
    assert_eq!(cam.offset_x, 60.0);
    assert_eq!(cam.offset_y, 60.0);
}

#[test]
fn fit_uses_limiting_axis() {
    let cam = Camera::fit(1120.0, 470.0, room_bounds(500.0, 350.0), 1.0);
    // width allows 2.0, height allows 1.0
    assert_eq!(cam.scale, 1.0);
}

#[test]
fn fit_centers_room_in_viewport() {
    let bounds = Bounds { min_x: -40.0, max_x: 260.0, min_y: 10.0, max_y: 110.0 };
    let cam = Camera::fit(800.0, 600.0, bounds, 1.0);
    let c = cam.room_to_screen(bounds.center());
    assert!(point_approx_eq(c, Point::new(400.0, 300.0)));
}

#[test]
fn zoom_keeps_room_center_fixed() {
    let bounds = room_bounds(500.0, 350.0);
    for zoom in [0.5, 0.8, 1.0, 1.7, 3.0] {
        let cam = Camera::fit(1024.0, 768.0, bounds, zoom);
        let c = cam.room_to_screen(bounds.center());
        assert!(point_approx_eq(c, Point::new(512.0, 384.0)), "zoom {zoom}");
    }
}

#[test]
fn zoom_scales_linearly() {
    let bounds = room_bounds(500.0, 350.0);
    let base = Camera::fit(620.0, 470.0, bounds, 1.0);
    let zoomed = Camera::fit(620.0, 470.0, bounds, 2.0);
    assert!(approx_eq(zoomed.scale, base.scale * 2.0));
}

#[test]
fn zoom_is_clamped() {
    let bounds = room_bounds(500.0, 350.0);
    let base = Camera::fit(620.0, 470.0, bounds, 1.0);
    assert!(approx_eq(Camera::fit(620.0, 470.0, bounds, 100.0).scale, base.scale * 3.0));
    assert!(approx_eq(Camera::fit(620.0, 470.0, bounds, 0.01).scale, base.scale * 0.5));
}

#[test]
fn degenerate_room_has_finite_scale() {
    let flat = Bounds { min_x: 5.0, max_x: 5.0, min_y: 0.0, max_y: 0.0 };
    let cam = Camera::fit(300.0, 300.0, flat, 1.0);
    assert!(cam.scale.is_finite());
    assert!(cam.scale > 0.0);
}

#[test]
fn zero_viewport_has_finite_positive_scale() {
    let cam = Camera::fit(0.0, 0.0, room_bounds(500.0, 350.0), 1.0);
    assert!(cam.scale.is_finite());
    assert!(cam.scale > 0.0);
}

// --- Round trips ---

#[test]
fn screen_room_round_trip() {
    let cam = Camera::fit(1000.0, 700.0, room_bounds(437.0, 291.0), 1.37);
    for &(x, y) in &[(0.0, 0.0), (123.4, -56.7), (-1e4, 3e3), (437.0, 291.0)] {
        let p = Point::new(x, y);
        let back = cam.screen_to_room(cam.room_to_screen(p));
        assert!((back.x - p.x).abs() < 1e-6 && (back.y - p.y).abs() < 1e-6, "{p:?} -> {back:?}");
    }
}

#[test]
fn distance_conversions_are_inverse() {
    let cam = Camera { scale: 2.5, offset_x: 0.0, offset_y: 0.0 };
    assert_eq!(cam.screen_dist_to_room(10.0), 4.0);
    assert_eq!(cam.room_dist_to_screen(4.0), 10.0);
}
