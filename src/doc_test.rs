#![allow(clippy::float_cmp)]

use super::*;

fn make_item(kind: ItemKind, x: f64, y: f64, w: f64, h: f64) -> Item {
    Item::from_spec(
        &ItemSpec { kind: Some(kind), x: Some(x), y: Some(y), w: Some(w), h: Some(h), ..ItemSpec::default() },
        Point::default(),
    )
}

// =============================================================
// Pivot
// =============================================================

#[test]
fn pivot_flips() {
    assert_eq!(Pivot::Left.flipped(), Pivot::Right);
    assert_eq!(Pivot::Right.flipped(), Pivot::Left);
}

#[test]
fn pivot_from_tag() {
    assert_eq!(Pivot::from_tag("Right"), Some(Pivot::Right));
    assert_eq!(Pivot::from_tag(" left "), Some(Pivot::Left));
    assert_eq!(Pivot::from_tag("up"), None);
}

#[test]
fn pivot_serde_lowercase() {
    assert_eq!(serde_json::to_string(&Pivot::Right).unwrap(), "\"right\"");
}

// =============================================================
// Room
// =============================================================

#[test]
fn room_default_is_rectangle() {
    let room = Room::default();
    assert_eq!(room.points.len(), 4);
    assert_eq!(room.unit, "cm");
    let b = room.bounds();
    assert_eq!((b.min_x, b.max_x, b.min_y, b.max_y), (0.0, 500.0, 0.0, 350.0));
}

#[test]
fn room_without_points_uses_unit_box() {
    let room = Room { points: vec![], ..Room::default() };
    assert_eq!(room.bounds(), Bounds::UNIT);
    assert_eq!(room.center(), Point::new(0.5, 0.5));
}

#[test]
fn room_edges_wrap_around() {
    let room = Room::rectangle(10.0, 5.0);
    let edges: Vec<_> = room.edges().collect();
    assert_eq!(edges.len(), 4);
    assert_eq!(edges[3], (Point::new(0.0, 5.0), Point::new(0.0, 0.0)));
}

#[test]
fn room_with_two_points_has_no_edges() {
    let room = Room { points: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)], ..Room::default() };
    assert!(!room.is_closed());
    assert_eq!(room.edges().count(), 0);
}

// =============================================================
// Item construction
// =============================================================

#[test]
fn from_spec_uses_catalog_defaults() {
    let item = Item::from_spec(&ItemSpec::of_kind(ItemKind::Bed), Point::new(10.0, 20.0));
    assert_eq!(item.kind, ItemKind::Bed);
    assert_eq!(item.label, "Bed");
    assert_eq!((item.w, item.h), (200.0, 140.0));
    assert_eq!((item.x, item.y), (10.0, 20.0));
    assert_eq!(item.color, "#60a5fa");
    assert_eq!(item.pivot, None);
}

#[test]
fn from_spec_without_kind_is_generic() {
    let item = Item::from_spec(&ItemSpec::default(), Point::default());
    assert_eq!(item.kind, ItemKind::Generic);
    assert_eq!(item.label, "Item");
}

#[test]
fn from_spec_openings_default_to_left_pivot() {
    let door = Item::from_spec(&ItemSpec::of_kind(ItemKind::Door), Point::default());
    assert_eq!(door.pivot, Some(Pivot::Left));
    let window = Item::from_spec(
        &ItemSpec { kind: Some(ItemKind::Window), pivot: Some(Pivot::Right), ..ItemSpec::default() },
        Point::default(),
    );
    assert_eq!(window.pivot, Some(Pivot::Right));
}

#[test]
fn from_spec_non_finite_numbers_fall_back() {
    let spec = ItemSpec {
        kind: Some(ItemKind::Table),
        x: Some(f64::NAN),
        w: Some(f64::INFINITY),
        rotation: Some(f64::NAN),
        ..ItemSpec::default()
    };
    let item = Item::from_spec(&spec, Point::new(7.0, 8.0));
    assert_eq!(item.x, 7.0);
    assert_eq!(item.w, 120.0);
    assert_eq!(item.rotation, 0.0);
}

#[test]
fn from_spec_floors_size_and_normalizes_rotation() {
    let spec = ItemSpec { w: Some(1.0), h: Some(-3.0), rotation: Some(-90.0), ..ItemSpec::default() };
    let item = Item::from_spec(&spec, Point::default());
    assert_eq!((item.w, item.h), (MIN_ITEM_SIZE, MIN_ITEM_SIZE));
    assert_eq!(item.rotation, 270.0);
}

#[test]
fn from_spec_blank_label_uses_default() {
    let spec = ItemSpec { kind: Some(ItemKind::Heating), label: Some("   ".into()), ..ItemSpec::default() };
    assert_eq!(Item::from_spec(&spec, Point::default()).label, "Radiator");
}

#[test]
fn from_spec_ids_are_unique() {
    let a = Item::from_spec(&ItemSpec::default(), Point::default());
    let b = Item::from_spec(&ItemSpec::default(), Point::default());
    assert_ne!(a.id, b.id);
}

// =============================================================
// Item geometry
// =============================================================

#[test]
fn item_bounds_unrotated() {
    let item = make_item(ItemKind::Table, 100.0, 100.0, 100.0, 50.0);
    let b = item.bounds();
    assert_eq!((b.min_x, b.max_x, b.min_y, b.max_y), (50.0, 150.0, 75.0, 125.0));
}

#[test]
fn item_contains_respects_rotation() {
    let mut item = make_item(ItemKind::Table, 0.0, 0.0, 100.0, 10.0);
    assert!(item.contains(Point::new(45.0, 0.0)));
    assert!(!item.contains(Point::new(0.0, 45.0)));
    item.set_rotation(90.0);
    assert!(!item.contains(Point::new(45.0, 0.0)));
    assert!(item.contains(Point::new(0.0, 45.0)));
}

#[test]
fn item_contains_edges() {
    let item = make_item(ItemKind::Table, 0.0, 0.0, 10.0, 10.0);
    assert!(item.contains(Point::new(5.0, 5.0)));
    assert!(!item.contains(Point::new(5.1, 0.0)));
}

#[test]
fn set_size_enforces_floor() {
    let mut item = make_item(ItemKind::Table, 0.0, 0.0, 10.0, 10.0);
    item.set_size(2.0, 50.0);
    assert_eq!((item.w, item.h), (5.0, 50.0));
}

#[test]
fn sanitize_repairs_deserialized_item() {
    let json = r#"{"type":"sofa","x":1,"y":2,"w":1,"h":2,"rotation":-45,"pivot":"left"}"#;
    let mut item: Item = serde_json::from_str(json).unwrap();
    item.sanitize();
    assert_eq!(item.kind, ItemKind::Seating);
    assert_eq!((item.w, item.h), (5.0, 5.0));
    assert_eq!(item.rotation, 315.0);
    assert_eq!(item.label, "Sofa");
    assert_eq!(item.color, "#f59e0b");
    assert_eq!(item.pivot, None);
}

// =============================================================
// Settings
// =============================================================

#[test]
fn settings_defaults() {
    let s = Settings::default();
    assert!(s.snap);
    assert!(s.avoid_overlap);
    assert!(s.show_measures);
    assert_eq!(s.snap_distance, 5.0);
    assert_eq!(s.zoom, 1.0);
}

#[test]
fn settings_missing_fields_use_defaults() {
    let s: Settings = serde_json::from_str(r#"{"snap":false}"#).unwrap();
    assert!(!s.snap);
    assert!(s.avoid_overlap);
}

#[test]
fn clamp_zoom_range() {
    assert_eq!(clamp_zoom(0.1), ZOOM_MIN);
    assert_eq!(clamp_zoom(10.0), ZOOM_MAX);
    assert_eq!(clamp_zoom(1.5), 1.5);
    assert_eq!(clamp_zoom(f64::NAN), 1.0);
}

// =============================================================
// Document
// =============================================================

#[test]
fn document_insert_get_remove() {
    let mut doc = Document::default();
    let item = make_item(ItemKind::Bed, 0.0, 0.0, 10.0, 10.0);
    let id = item.id;
    doc.insert(item);
    assert_eq!(doc.len(), 1);
    assert!(doc.get(&id).is_some());
    assert!(doc.remove(&id).is_some());
    assert!(doc.is_empty());
    assert!(doc.remove(&id).is_none());
}

#[test]
fn document_others_excludes_id() {
    let mut doc = Document::default();
    let a = make_item(ItemKind::Bed, 0.0, 0.0, 10.0, 10.0);
    let b = make_item(ItemKind::Table, 0.0, 0.0, 10.0, 10.0);
    let a_id = a.id;
    doc.insert(a);
    doc.insert(b);
    assert_eq!(doc.others(&a_id).count(), 1);
}

#[test]
fn document_clone_compares_structurally() {
    let mut doc = Document::default();
    doc.insert(make_item(ItemKind::Bed, 1.0, 2.0, 10.0, 10.0));
    let snapshot = doc.clone();
    assert_eq!(doc, snapshot);
    doc.room_mut().items[0].x = 3.0;
    assert_ne!(doc, snapshot);
}

#[test]
fn document_sanitize_clamps_settings() {
    let mut doc = Document::default();
    doc.settings.zoom = 9.0;
    doc.settings.snap_distance = f64::NAN;
    doc.sanitize();
    assert_eq!(doc.settings.zoom, ZOOM_MAX);
    assert_eq!(doc.settings.snap_distance, 5.0);
}

#[test]
fn document_sanitize_reassigns_duplicate_ids() {
    let item = Item::from_spec(&ItemSpec::of_kind(ItemKind::Bed), Point::default());
    let mut doc = Document::with_items(vec![item.clone(), item.clone()]);
    doc.room_mut().name = "  ".to_owned();
    doc.sanitize();
    assert_eq!(doc.items()[0].id, item.id);
    assert_ne!(doc.items()[1].id, item.id);
    assert_eq!(doc.room().name, "Room 1");
}

#[test]
fn same_content_ignores_zoom_only() {
    let doc = Document::default();
    let mut zoomed = doc.clone();
    zoomed.settings.zoom = 2.0;
    assert!(doc.same_content(&zoomed));
    assert_ne!(doc, zoomed);

    zoomed.settings.snap = false;
    assert!(!doc.same_content(&zoomed));
}

#[test]
fn sanitize_restores_a_room_when_none_remain() {
    let mut doc: Document = serde_json::from_str(r#"{"rooms": []}"#).unwrap();
    doc.sanitize();
    assert_eq!(doc.rooms().len(), 1);
    assert_eq!(doc.active_index(), 0);
}

#[test]
fn item_ids_stay_unique_across_rooms() {
    let item = Item::from_spec(&ItemSpec::of_kind(ItemKind::Bed), Point::default());
    let mut doc = Document::with_items(vec![item.clone()]);
    doc.add_room(Room { items: vec![item.clone()], ..Room::default() });
    doc.sanitize();
    assert_eq!(doc.rooms()[0].items[0].id, item.id);
    assert_ne!(doc.rooms()[1].items[0].id, item.id);
}

// =============================================================
// Rooms
// =============================================================

#[test]
fn add_room_activates_and_renames_taken_id() {
    let mut doc = Document::default();
    let id = doc.add_room(Room::default());
    assert_eq!(id, "room-2");
    assert_eq!(doc.rooms().len(), 2);
    assert_eq!(doc.active_index(), 1);
    assert_eq!(doc.active_room_id(), "room-2");

    let id = doc.add_room(Room { id: "attic".to_owned(), ..Room::default() });
    assert_eq!(id, "attic");
    let id = doc.add_room(Room { id: " ".to_owned(), ..Room::default() });
    assert_eq!(id, "room-4");
}

#[test]
fn item_accessors_follow_active_room() {
    let mut doc = Document::with_items(vec![make_item(ItemKind::Bed, 0.0, 0.0, 10.0, 10.0)]);
    doc.add_room(Room::default());
    assert!(doc.is_empty());
    doc.insert(make_item(ItemKind::Table, 0.0, 0.0, 10.0, 10.0));
    assert_eq!(doc.items()[0].kind, ItemKind::Table);

    assert!(doc.set_active_room("room-1"));
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.items()[0].kind, ItemKind::Bed);
}

#[test]
fn set_active_room_rejects_unknown_and_current() {
    let mut doc = Document::default();
    doc.add_room(Room::default());
    assert!(!doc.set_active_room("room-2"));
    assert!(!doc.set_active_room("nope"));
    assert_eq!(doc.active_index(), 1);
}

#[test]
fn document_serializes_active_room_id() {
    let mut doc = Document::default();
    doc.add_room(Room::default());
    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(value["activeRoomId"], "room-2");
    assert_eq!(value["rooms"][1]["id"], "room-2");
    assert_eq!(value["settings"]["showMeasures"], true);

    let back: Document = serde_json::from_value(value).unwrap();
    assert_eq!(back, doc);
}
