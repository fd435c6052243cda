//! Snapping and overlap checks.
//!
//! Position snapping and angle snapping are independent. Position snapping
//! aligns the moving item's AABB edges with room bounds and neighbouring
//! items, axis by axis. Angle snapping pulls a rotation onto a cardinal
//! angle or onto the orientation of a nearby wall.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::consts::{ANGLE_SNAP_DEG, CARDINAL_ANGLES, WALL_SNAP_DIST};
use crate::doc::{Document, Item, Room};
use crate::geometry::{self, Point};

/// Closest of `targets` to `value` if it lies within `threshold`, otherwise
/// `value`. On ties the earlier target wins.
#[must_use]
pub fn snap_value(value: f64, targets: &[f64], threshold: f64) -> f64 {
    let mut best = value;
    let mut best_delta = f64::INFINITY;
    for &target in targets {
        let delta = (target - value).abs();
        if delta < best_delta {
            best_delta = delta;
            best = target;
        }
    }
    if best_delta <= threshold { best } else { value }
}

/// Snap a proposed center for `item` against room bounds and the other items.
///
/// Returns `proposed` unchanged when snapping is disabled. Each axis snaps
/// on its own, so an item can lock onto an x edge and a y edge at once.
#[must_use]
pub fn snap_position(doc: &Document, item: &Item, proposed: Point) -> Point {
    if !doc.settings.snap {
        return proposed;
    }

    let room = doc.room().bounds();
    let mut targets_x = vec![room.min_x, room.max_x];
    let mut targets_y = vec![room.min_y, room.max_y];
    for other in doc.others(&item.id) {
        let b = other.bounds();
        targets_x.extend([b.min_x, b.max_x, (b.min_x + b.max_x) / 2.0]);
        targets_y.extend([b.min_y, b.max_y, (b.min_y + b.max_y) / 2.0]);
    }

    let candidate = item.bounds_at(proposed, item.w, item.h);
    let half_w = candidate.width() / 2.0;
    let half_h = candidate.height() / 2.0;
    let threshold = doc.settings.snap_distance;

    let centers_x = edge_aligned_centers(&targets_x, half_w);
    let centers_y = edge_aligned_centers(&targets_y, half_h);
    Point::new(
        snap_value(proposed.x, &centers_x, threshold),
        snap_value(proposed.y, &centers_y, threshold),
    )
}

/// Centers that put either edge of a box with half-extent `half` on a target.
fn edge_aligned_centers(targets: &[f64], half: f64) -> Vec<f64> {
    targets
        .iter()
        .map(|t| t - half)
        .chain(targets.iter().map(|t| t + half))
        .collect()
}

/// Whether `item`, moved to `center` and resized to `w` × `h`, would overlap
/// any other item's AABB.
#[must_use]
pub fn overlaps_any(doc: &Document, item: &Item, center: Point, w: f64, h: f64) -> bool {
    let candidate = item.bounds_at(center, w, h);
    doc.others(&item.id)
        .any(|other| geometry::rects_overlap(&candidate, &other.bounds()))
}

/// The room edge closest to a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub start: Point,
    pub end: Point,
    pub distance: f64,
}

impl WallHit {
    /// The wall's orientation and its opposite, in degrees.
    #[must_use]
    pub fn angles(&self) -> [f64; 2] {
        let base = geometry::segment_angle(self.start, self.end);
        [base, geometry::normalize_angle(base + 180.0)]
    }

    #[must_use]
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }
}

/// Nearest edge of a closed room to `point`. `None` below three points.
#[must_use]
pub fn nearest_wall(room: &Room, point: Point) -> Option<WallHit> {
    room.edges()
        .map(|(start, end)| WallHit {
            start,
            end,
            distance: geometry::distance_point_to_segment(point, start, end),
        })
        .fold(None, |best: Option<WallHit>, hit| match best {
            Some(b) if b.distance <= hit.distance => Some(b),
            _ => Some(hit),
        })
}

/// Snap `angle` onto the circularly nearest of `targets` within `tolerance`
/// degrees; otherwise return the normalized input.
#[must_use]
pub fn snap_angle_to(angle: f64, targets: &[f64], tolerance: f64) -> f64 {
    let angle = geometry::normalize_angle(angle);
    let mut best = angle;
    let mut best_delta = f64::INFINITY;
    for &target in targets {
        let delta = geometry::normalize_angle(angle - target);
        let delta = delta.min(360.0 - delta);
        if delta < best_delta {
            best_delta = delta;
            best = target;
        }
    }
    if best_delta <= tolerance {
        geometry::normalize_angle(best)
    } else {
        angle
    }
}

/// Snap a rotation for an item centered at `center`: cardinal angles always,
/// plus the nearest wall's orientation when the center is close to it.
#[must_use]
pub fn snap_angle(angle: f64, center: Point, room: &Room) -> f64 {
    let mut targets = CARDINAL_ANGLES.to_vec();
    if let Some(wall) = nearest_wall(room, center) {
        if wall.distance <= WALL_SNAP_DIST {
            targets.extend(wall.angles());
        }
    }
    snap_angle_to(angle, &targets, ANGLE_SNAP_DEG)
}
