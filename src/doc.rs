//! Document model: the rooms of a plan, their items, and the editor settings.
//!
//! A [`Document`] is a plain value. History snapshots are clones of it and
//! "did this gesture change anything" is a structural `==`, so every field
//! that matters to the user lives here and nothing transient does (the
//! selection and in-flight gesture state belong to [`crate::input`]).
//!
//! Item sizes are floored to [`MIN_ITEM_SIZE`] and rotations normalized to
//! `[0, 360)` by the setters; code that mutates items should go through them.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::catalog::ItemKind;
use crate::consts::{MIN_ITEM_SIZE, ZOOM_MAX, ZOOM_MIN};
use crate::geometry::{self, Bounds, Point};

/// Unique identifier for an item.
pub type ItemId = Uuid;

/// Which side of a door or window its swing arc hinges from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pivot {
    Left,
    Right,
}

impl Pivot {
    /// The other side.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Parse `left`/`right` (case-insensitive).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Identifier of a room within a plan.
pub type RoomId = String;

/// One room of the plan: its outline and the items placed in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Stable id; the plan file names its active room by it.
    #[serde(default)]
    pub id: RoomId,
    /// Display name shown in the editor.
    #[serde(default)]
    pub name: String,
    /// Unit label for all room-space values (display only).
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Polygon vertices; edge `i` joins point `i` to point `(i + 1) % len`.
    #[serde(default)]
    pub points: Vec<Point>,
    /// Items in draw order; the last one is on top.
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Default name of the `n`th room (1-based).
#[must_use]
pub fn room_name(n: usize) -> String {
    format!("Room {n}")
}

fn default_unit() -> String {
    "cm".to_owned()
}

impl Default for Room {
    fn default() -> Self {
        Self::rectangle(500.0, 350.0)
    }
}

impl Room {
    /// An empty axis-aligned `width` × `height` room anchored at the origin.
    #[must_use]
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self {
            id: "room-1".to_owned(),
            name: room_name(1),
            unit: default_unit(),
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(width, 0.0),
                Point::new(width, height),
                Point::new(0.0, height),
            ],
            items: Vec::new(),
        }
    }

    /// Bounding box of the polygon, or the unit box when there are no points.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        geometry::axis_aligned_bounds(&self.points)
    }

    /// Center of the bounding box; new items are placed here.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Whether the outline is a closed polygon usable for wall queries.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.points.len() >= 3
    }

    /// Polygon edges as `(start, end)` pairs. Empty unless the room is closed.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = if self.is_closed() { self.points.len() } else { 0 };
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Repair a deserialized room. `n` is its 1-based position in the plan.
    /// Items without a usable position land on the room center.
    fn sanitize(&mut self, n: usize) {
        self.points.retain(|p| p.x.is_finite() && p.y.is_finite());
        if self.name.trim().is_empty() {
            self.name = room_name(n);
        }
        if self.unit.trim().is_empty() {
            self.unit = default_unit();
        }
        let center = self.center();
        for item in &mut self.items {
            if !item.x.is_finite() {
                item.x = center.x;
            }
            if !item.y.is_finite() {
                item.y = center.y;
            }
            item.sanitize();
        }
    }
}

/// A placed rectangle in room space.
///
/// Deserialization is lenient: unknown type tags become
/// [`ItemKind::Generic`], and missing or malformed fields are left for
/// [`Item::sanitize`] to fill from the kind's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemWire")]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub label: String,
    /// Center x in room units.
    pub x: f64,
    /// Center y in room units.
    pub y: f64,
    /// Width in room units, never below [`MIN_ITEM_SIZE`].
    pub w: f64,
    /// Height in room units, never below [`MIN_ITEM_SIZE`].
    pub h: f64,
    /// Clockwise rotation in degrees, in `[0, 360)`.
    pub rotation: f64,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivot: Option<Pivot>,
}

/// An item as found in a plan file, before any field is trusted.
#[derive(Deserialize)]
struct ItemWire {
    #[serde(default)]
    id: Value,
    #[serde(default, rename = "type")]
    kind: Value,
    #[serde(default)]
    label: Value,
    #[serde(default)]
    x: Value,
    #[serde(default)]
    y: Value,
    #[serde(default)]
    w: Value,
    #[serde(default)]
    h: Value,
    #[serde(default)]
    rotation: Value,
    #[serde(default)]
    color: Value,
    #[serde(default)]
    pivot: Value,
}

impl From<ItemWire> for Item {
    fn from(wire: ItemWire) -> Self {
        let spec = ItemSpec {
            kind: Some(wire.kind.as_str().map_or(ItemKind::Generic, ItemKind::from_tag)),
            label: wire.label.as_str().map(str::to_owned),
            x: wire.x.as_f64(),
            y: wire.y.as_f64(),
            w: wire.w.as_f64(),
            h: wire.h.as_f64(),
            rotation: wire.rotation.as_f64(),
            color: wire.color.as_str().map(str::to_owned),
            pivot: wire.pivot.as_str().and_then(Pivot::from_tag),
        };
        // The room places unpositioned items once its outline is known.
        let mut item = Self::from_spec(&spec, Point::new(f64::NAN, f64::NAN));
        if let Some(Ok(id)) = wire.id.as_str().map(|s| Uuid::parse_str(s.trim())) {
            item.id = id;
        }
        item
    }
}

impl Item {
    /// Build an item from a construction request, falling back per field to
    /// the catalog defaults of its kind and to `center` for the position.
    #[must_use]
    pub fn from_spec(spec: &ItemSpec, center: Point) -> Self {
        let kind = spec.kind.unwrap_or(ItemKind::Generic);
        let defaults = kind.defaults();
        let pivot = spec
            .pivot
            .or_else(|| kind.is_opening().then_some(Pivot::Left));
        let label = spec
            .label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(defaults.label);
        let color = spec
            .color
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(defaults.color);

        let mut item = Self {
            id: Uuid::new_v4(),
            kind,
            label: label.to_owned(),
            x: finite_or(spec.x, center.x),
            y: finite_or(spec.y, center.y),
            w: defaults.w,
            h: defaults.h,
            rotation: 0.0,
            color: color.to_owned(),
            pivot,
        };
        item.set_size(finite_or(spec.w, defaults.w), finite_or(spec.h, defaults.h));
        item.set_rotation(finite_or(spec.rotation, 0.0));
        item
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_center(&mut self, center: Point) {
        self.x = center.x;
        self.y = center.y;
    }

    /// Set the size, flooring each dimension to [`MIN_ITEM_SIZE`].
    pub fn set_size(&mut self, w: f64, h: f64) {
        self.w = w.max(MIN_ITEM_SIZE);
        self.h = h.max(MIN_ITEM_SIZE);
    }

    /// Set the rotation in degrees, normalized to `[0, 360)`.
    pub fn set_rotation(&mut self, deg: f64) {
        self.rotation = geometry::normalize_angle(deg);
    }

    /// Room-space corners (NW, NE, SE, SW of the unrotated frame).
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        geometry::rect_corners(self.center(), self.w, self.h, self.rotation)
    }

    /// Axis-aligned bounds of the rotated rectangle.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds_at(self.center(), self.w, self.h)
    }

    /// Bounds this item would have at another center and size, keeping its rotation.
    #[must_use]
    pub fn bounds_at(&self, center: Point, w: f64, h: f64) -> Bounds {
        geometry::axis_aligned_bounds(&geometry::rect_corners(center, w, h, self.rotation))
    }

    /// Whether `room_pt` lies inside the rotated rectangle (edges included).
    #[must_use]
    pub fn contains(&self, room_pt: Point) -> bool {
        let local = geometry::rotate(room_pt - self.center(), -self.rotation.to_radians());
        local.x.abs() <= self.w / 2.0 && local.y.abs() <= self.h / 2.0
    }

    /// Bring a deserialized item back inside the model's invariants.
    pub fn sanitize(&mut self) {
        let defaults = self.kind.defaults();
        if !self.x.is_finite() {
            self.x = 0.0;
        }
        if !self.y.is_finite() {
            self.y = 0.0;
        }
        let w = if self.w.is_finite() { self.w } else { defaults.w };
        let h = if self.h.is_finite() { self.h } else { defaults.h };
        self.set_size(w, h);
        let rotation = if self.rotation.is_finite() { self.rotation } else { 0.0 };
        self.set_rotation(rotation);
        if self.label.trim().is_empty() {
            defaults.label.clone_into(&mut self.label);
        }
        if self.color.trim().is_empty() {
            defaults.color.clone_into(&mut self.color);
        }
        if !self.kind.is_opening() {
            self.pivot = None;
        }
    }
}

fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

/// Request to construct an item. Every field is optional; missing ones fall
/// back to the kind's catalog defaults (see [`Item::from_spec`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemSpec {
    pub kind: Option<ItemKind>,
    pub label: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
    pub rotation: Option<f64>,
    pub color: Option<String>,
    pub pivot: Option<Pivot>,
}

impl ItemSpec {
    /// A request carrying only a kind.
    #[must_use]
    pub fn of_kind(kind: ItemKind) -> Self {
        Self { kind: Some(kind), ..Self::default() }
    }
}

/// Editor settings stored with the plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Snap positions to room bounds and neighbouring items.
    pub snap: bool,
    /// Refuse moves and resizes that would overlap another item.
    pub avoid_overlap: bool,
    /// Draw wall and neighbour distances for the selected item.
    pub show_measures: bool,
    /// Position snap threshold in room units.
    pub snap_distance: f64,
    /// View zoom factor, within `[ZOOM_MIN, ZOOM_MAX]`.
    pub zoom: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snap: true,
            avoid_overlap: true,
            show_measures: true,
            snap_distance: 5.0,
            zoom: 1.0,
        }
    }
}

/// Clamp a zoom factor into the supported range. Non-finite input resets to 1.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(ZOOM_MIN, ZOOM_MAX)
    } else {
        1.0
    }
}

/// The full editable state: every room with its items, which room is being
/// edited, and the settings.
///
/// There is always at least one room and the active index is always valid.
/// Item-level accessors ([`Document::get`], [`Document::insert`], ...) act
/// on the active room.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "DocumentWire")]
pub struct Document {
    rooms: Vec<Room>,
    active: usize,
    pub settings: Settings,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Room::default())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentWire {
    #[serde(default)]
    rooms: Vec<Room>,
    #[serde(default)]
    active_room_id: Option<RoomId>,
    #[serde(default)]
    settings: Settings,
}

impl From<DocumentWire> for Document {
    fn from(wire: DocumentWire) -> Self {
        let active = wire
            .active_room_id
            .as_deref()
            .and_then(|id| wire.rooms.iter().position(|r| r.id == id))
            .unwrap_or(0);
        let mut doc = Self { rooms: wire.rooms, active, settings: wire.settings };
        doc.sanitize();
        doc
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentRef<'a> {
    rooms: &'a [Room],
    active_room_id: &'a str,
    settings: &'a Settings,
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DocumentRef { rooms: &self.rooms, active_room_id: self.active_room_id(), settings: &self.settings }
            .serialize(serializer)
    }
}

impl Document {
    /// A plan with a single room.
    #[must_use]
    pub fn new(room: Room) -> Self {
        Self { rooms: vec![room], active: 0, settings: Settings::default() }
    }

    /// A plan whose only room is the default one, holding `items`.
    #[must_use]
    pub fn with_items(items: Vec<Item>) -> Self {
        Self::new(Room { items, ..Room::default() })
    }

    // --- Rooms ---

    /// Every room, in tab order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// The room being edited.
    #[must_use]
    pub fn room(&self) -> &Room {
        &self.rooms[self.active]
    }

    pub fn room_mut(&mut self) -> &mut Room {
        &mut self.rooms[self.active]
    }

    /// Position of the active room in [`Document::rooms`].
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active_room_id(&self) -> &str {
        &self.room().id
    }

    /// Switch to the room with this id. Returns `false` for an unknown id or
    /// the room that is already active.
    pub fn set_active_room(&mut self, id: &str) -> bool {
        match self.rooms.iter().position(|r| r.id == id) {
            Some(index) if index != self.active => {
                self.active = index;
                true
            }
            _ => false,
        }
    }

    /// Append `room` and make it the active one. A blank or taken id is
    /// replaced; the id the room was stored under is returned.
    pub fn add_room(&mut self, mut room: Room) -> RoomId {
        if room.id.trim().is_empty() || self.rooms.iter().any(|r| r.id == room.id) {
            room.id = self.next_room_id();
        }
        let id = room.id.clone();
        self.rooms.push(room);
        self.active = self.rooms.len() - 1;
        id
    }

    /// First `room-N` id not in use, counting up from the room count.
    fn next_room_id(&self) -> RoomId {
        let mut n = self.rooms.len();
        loop {
            n += 1;
            let id = format!("room-{n}");
            if self.rooms.iter().all(|r| r.id != id) {
                return id;
            }
        }
    }

    // --- Items of the active room ---

    /// Items of the active room, bottom to top.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.room().items
    }

    /// Return a reference to an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items().iter().find(|i| i.id == *id)
    }

    /// Return a mutable reference to an item by id.
    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.room_mut().items.iter_mut().find(|i| i.id == *id)
    }

    /// Append an item on top of the stack.
    pub fn insert(&mut self, item: Item) {
        self.room_mut().items.push(item);
    }

    /// Remove an item by id, returning it if it was present.
    pub fn remove(&mut self, id: &ItemId) -> Option<Item> {
        let items = &mut self.room_mut().items;
        let index = items.iter().position(|i| i.id == *id)?;
        Some(items.remove(index))
    }

    /// Items other than `id`.
    pub fn others<'a>(&'a self, id: &'a ItemId) -> impl Iterator<Item = &'a Item> + 'a {
        self.items().iter().filter(move |i| i.id != *id)
    }

    /// Number of items in the active room.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items().len()
    }

    /// Returns `true` if the active room holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    // --- Comparison and repair ---

    /// Equality that ignores the view zoom. History uses it, so zooming alone
    /// never produces an undo step.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.rooms == other.rooms
            && self.active == other.active
            && Settings { zoom: other.settings.zoom, ..self.settings } == other.settings
    }

    /// Re-establish model invariants after deserialization.
    pub fn sanitize(&mut self) {
        if self.rooms.is_empty() {
            self.rooms.push(Room::default());
        }
        if self.active >= self.rooms.len() {
            self.active = 0;
        }
        let taken: HashSet<RoomId> = self.rooms.iter().map(|r| r.id.clone()).collect();
        let mut room_ids = HashSet::new();
        let mut item_ids = HashSet::new();
        let mut counter = 0;
        for (index, room) in self.rooms.iter_mut().enumerate() {
            if room.id.trim().is_empty() || !room_ids.insert(room.id.clone()) {
                room.id = loop {
                    counter += 1;
                    let id = format!("room-{counter}");
                    if !taken.contains(&id) && !room_ids.contains(&id) {
                        break id;
                    }
                };
                room_ids.insert(room.id.clone());
            }
            room.sanitize(index + 1);
            // Duplicate ids would make selection ambiguous.
            for item in &mut room.items {
                while !item_ids.insert(item.id) {
                    item.id = Uuid::new_v4();
                }
            }
        }
        self.settings.zoom = clamp_zoom(self.settings.zoom);
        if !self.settings.snap_distance.is_finite() || self.settings.snap_distance < 0.0 {
            self.settings.snap_distance = Settings::default().snap_distance;
        }
    }
}
