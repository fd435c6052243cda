#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::consts::VIEW_PADDING_PX;
use crate::doc::clamp_zoom;
use crate::geometry::{Bounds, Point};

/// Affine room-to-screen mapping: `screen = room * scale + offset`.
///
/// Built by [`Camera::fit`] from the viewport, the room's bounding box and
/// the zoom setting. It is recomputed on every event rather than stored, so
/// it always matches the current room outline and viewport size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Pixels per room unit.
    pub scale: f64,
    /// Screen x of the room origin.
    pub offset_x: f64,
    /// Screen y of the room origin.
    pub offset_y: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { scale: 1.0, offset_x: 0.0, offset_y: 0.0 }
    }
}

impl Camera {
    /// Fit `room` into a `viewport_w` × `viewport_h` viewport.
    ///
    /// The base scale fits the room inside the padded viewport; `zoom`
    /// multiplies it around the room center, which stays on the viewport
    /// center at every zoom level. Degenerate rooms and viewports are floored
    /// to one unit so the scale is always finite and positive.
    #[must_use]
    pub fn fit(viewport_w: f64, viewport_h: f64, room: Bounds, zoom: f64) -> Self {
        let room_w = room.width().max(1.0);
        let room_h = room.height().max(1.0);
        let avail_w = (viewport_w - VIEW_PADDING_PX * 2.0).max(1.0);
        let avail_h = (viewport_h - VIEW_PADDING_PX * 2.0).max(1.0);
        let base_scale = (avail_w / room_w).min(avail_h / room_h);
        let scale = base_scale * clamp_zoom(zoom);

        let anchor = room.center();
        Self {
            scale,
            offset_x: viewport_w / 2.0 - anchor.x * scale,
            offset_y: viewport_h / 2.0 - anchor.y * scale,
        }
    }

    /// Convert a room-space point to screen pixels.
    #[must_use]
    pub fn room_to_screen(&self, room: Point) -> Point {
        Point {
            x: room.x * self.scale + self.offset_x,
            y: room.y * self.scale + self.offset_y,
        }
    }

    /// Convert a screen-space point (pixels) to room coordinates.
    #[must_use]
    pub fn screen_to_room(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset_x) / self.scale,
            y: (screen.y - self.offset_y) / self.scale,
        }
    }

    /// Convert a screen-space distance (pixels) to room units.
    #[must_use]
    pub fn screen_dist_to_room(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }

    /// Convert a room-space distance to pixels.
    #[must_use]
    pub fn room_dist_to_screen(&self, room_dist: f64) -> f64 {
        room_dist * self.scale
    }
}
