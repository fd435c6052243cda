//! Distance read-outs for the selected item.

#[cfg(test)]
#[path = "measure_test.rs"]
mod measure_test;

use crate::doc::{Document, Item, ItemId};
use crate::geometry::Point;
use crate::snap;

/// A measured distance drawn as a line between two room-space points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measure {
    pub from: Point,
    pub to: Point,
    /// Distance in room units. Not necessarily `from.distance(to)`.
    pub distance: f64,
}

impl Measure {
    #[must_use]
    pub fn midpoint(&self) -> Point {
        self.from.midpoint(self.to)
    }
}

/// Measurements shown around one item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurements {
    /// Item center to the nearest wall; the line ends at the wall midpoint.
    pub wall: Option<Measure>,
    /// Edge gap to the closest other item; the line joins the two centers.
    pub neighbour: Option<(ItemId, Measure)>,
}

/// Distance from the item's center to the nearest room edge.
#[must_use]
pub fn wall_distance(doc: &Document, item: &Item) -> Option<Measure> {
    let center = item.center();
    snap::nearest_wall(doc.room(), center).map(|wall| Measure {
        from: center,
        to: wall.midpoint(),
        distance: wall.distance,
    })
}

/// The other item whose AABB is closest to this item's AABB.
#[must_use]
pub fn nearest_neighbour(doc: &Document, item: &Item) -> Option<(ItemId, Measure)> {
    let own = item.bounds();
    doc.others(&item.id)
        .map(|other| (other, own.gap(&other.bounds())))
        .fold(None, |best: Option<(&Item, f64)>, (other, gap)| match best {
            Some((_, d)) if d <= gap => best,
            _ => Some((other, gap)),
        })
        .map(|(other, gap)| {
            (other.id, Measure { from: item.center(), to: other.center(), distance: gap })
        })
}

/// All measurements for the item `id`, or none when it does not exist.
#[must_use]
pub fn measure(doc: &Document, id: &ItemId) -> Measurements {
    doc.get(id).map_or_else(Measurements::default, |item| Measurements {
        wall: wall_distance(doc, item),
        neighbour: nearest_neighbour(doc, item),
    })
}
