//! Picking: which item, corner or handle lies under the cursor.
//!
//! Item bodies are tested in room space against the rotated rectangle.
//! Handles are tested in screen space so their grab radius stays constant in
//! pixels whatever the zoom.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Camera;
use crate::consts::{CORNER_PICK_RADIUS_PX, ROTATE_HANDLE_OFFSET_PX, ROTATE_PICK_RADIUS_PX};
use crate::doc::{Document, Item, ItemId};
use crate::geometry::{self, Point};

/// Which part of an item was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Corner(Corner),
    RotateHandle,
}

/// Logical corner of an item, named in its unrotated frame.
///
/// A corner keeps its role when the item rotates: `Nw` is always the local
/// `(-w/2, -h/2)` corner, wherever it ends up on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Nw,
    Ne,
    Se,
    Sw,
}

impl Corner {
    /// Same order as [`geometry::rect_corners`].
    pub const ALL: [Corner; 4] = [Corner::Nw, Corner::Ne, Corner::Se, Corner::Sw];

    /// Direction of this corner from the center along the local axes.
    #[must_use]
    pub fn signs(self) -> (f64, f64) {
        match self {
            Self::Nw => (-1.0, -1.0),
            Self::Ne => (1.0, -1.0),
            Self::Se => (1.0, 1.0),
            Self::Sw => (-1.0, 1.0),
        }
    }

    /// The diagonally opposite corner.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Nw => Self::Se,
            Self::Ne => Self::Sw,
            Self::Se => Self::Nw,
            Self::Sw => Self::Ne,
        }
    }

    /// CSS cursor shown while hovering this corner.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Nw | Self::Se => "nwse-resize",
            Self::Ne | Self::Sw => "nesw-resize",
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    pub item_id: ItemId,
    pub part: HitPart,
}

/// Topmost item containing `room_pt`. Later items are drawn on top, so the
/// list is walked backwards.
#[must_use]
pub fn pick_item(doc: &Document, room_pt: Point) -> Option<&Item> {
    doc.items().iter().rev().find(|item| item.contains(room_pt))
}

/// Screen positions of the four corners, tagged with their logical role.
#[must_use]
pub fn corner_screen_positions(item: &Item, camera: &Camera) -> [(Corner, Point); 4] {
    let corners = item.corners();
    let mut out = [(Corner::Nw, Point::default()); 4];
    for (slot, (corner, room_pt)) in out.iter_mut().zip(Corner::ALL.into_iter().zip(corners)) {
        *slot = (corner, camera.room_to_screen(room_pt));
    }
    out
}

/// Screen position of the rotate handle: above the item's top edge midpoint,
/// along the item's rotated "up" direction.
#[must_use]
pub fn rotate_handle_position(item: &Item, camera: &Camera) -> Point {
    let angle = item.rotation.to_radians();
    let top_mid = item.center() + geometry::rotate(Point::new(0.0, -item.h / 2.0), angle);
    camera.room_to_screen(top_mid) + geometry::rotate(Point::new(0.0, -ROTATE_HANDLE_OFFSET_PX), angle)
}

/// Corner of `item` within grab range of `screen_pt`, if any.
#[must_use]
pub fn pick_corner(item: &Item, screen_pt: Point, camera: &Camera) -> Option<Corner> {
    corner_screen_positions(item, camera)
        .into_iter()
        .find(|(_, pos)| pos.distance(screen_pt) <= CORNER_PICK_RADIUS_PX)
        .map(|(corner, _)| corner)
}

/// Whether `screen_pt` is within grab range of the rotate handle.
#[must_use]
pub fn pick_rotate_handle(item: &Item, screen_pt: Point, camera: &Camera) -> bool {
    rotate_handle_position(item, camera).distance(screen_pt) <= ROTATE_PICK_RADIUS_PX
}

/// Resolve what lies under `screen_pt`. Handles of the selected item win
/// over bodies: rotate handle first, then corners, then the topmost body.
#[must_use]
pub fn hit_test(doc: &Document, camera: &Camera, screen_pt: Point, selected: Option<ItemId>) -> Option<Hit> {
    if let Some(item) = selected.and_then(|id| doc.get(&id)) {
        if pick_rotate_handle(item, screen_pt, camera) {
            return Some(Hit { item_id: item.id, part: HitPart::RotateHandle });
        }
        if let Some(corner) = pick_corner(item, screen_pt, camera) {
            return Some(Hit { item_id: item.id, part: HitPart::Corner(corner) });
        }
    }

    let room_pt = camera.screen_to_room(screen_pt);
    pick_item(doc, room_pt).map(|item| Hit { item_id: item.id, part: HitPart::Body })
}
