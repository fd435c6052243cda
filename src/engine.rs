use tracing::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::Camera;
use crate::catalog::{ItemKind, Library, Preset};
use crate::consts::{BUTTON_ZOOM_STEP, MIN_ITEM_SIZE, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT};
use crate::doc::{Document, Item, ItemId, ItemSpec, Pivot, Room, clamp_zoom, room_name};
use crate::export::{self, ImportError, PlanFile};
use crate::geometry::{self, Point};
use crate::history::History;
use crate::hit::{self, Hit, HitPart};
use crate::input::{Button, Extent, InputState, Key, Modifiers, UiState, WheelDelta};
use crate::markup;
use crate::persist::{self, LocalStorage, PersistError, Store};
use crate::render::{self, Viewport};
use crate::snap;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    SetCursor(String),
    /// A history entry was committed. The plan should be saved.
    DocumentChanged,
    /// Something persisted changed without a history entry (zoom, presets).
    SaveRequested,
    SelectionChanged(Option<ItemId>),
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub doc: Document,
    pub ui: UiState,
    pub input: InputState,
    pub history: History,
    pub library: Library,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        let mut doc = Document::default();
        markup::parse(markup::DEFAULT_MARKUP).apply_to(&mut doc);
        Self::with_document(doc, Library::default())
    }
}

impl EngineCore {
    /// A core holding the sample plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_document(doc: Document, library: Library) -> Self {
        let history = History::new(&doc);
        Self {
            doc,
            ui: UiState::default(),
            input: InputState::default(),
            history,
            library,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }

    // --- Data inputs ---

    /// Replace everything with a saved plan and start a fresh history.
    pub fn restore_plan(&mut self, plan: PlanFile) {
        self.library = plan.library;
        self.doc = plan.document;
        self.doc.sanitize();
        self.history.reset(&self.doc);
        self.input = InputState::Idle;
        self.ui.selected_id = None;
        info!(items = self.doc.len(), "plan restored");
    }

    /// Load a plan as an undoable edit; the preset library is replaced too.
    pub fn load_plan(&mut self, plan: PlanFile) -> Vec<Action> {
        self.library = plan.library;
        self.load_document(plan.document)
    }

    /// Replace the document as an undoable edit.
    pub fn load_document(&mut self, mut doc: Document) -> Vec<Action> {
        doc.sanitize();
        self.doc = doc;
        self.input = InputState::Idle;
        let mut actions = self.set_selection(None);
        actions.extend(self.commit());
        actions
    }

    /// Parse a JSON plan file and load it.
    ///
    /// # Errors
    ///
    /// Returns the import error when the file is unreadable or from a newer
    /// format; the current plan is left untouched.
    pub fn import_json(&mut self, text: &str) -> Result<Vec<Action>, ImportError> {
        match PlanFile::from_json(text) {
            Ok(plan) => Ok(self.load_plan(plan)),
            Err(e) => {
                warn!(error = %e, "plan import rejected");
                Err(e)
            }
        }
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.viewport_width = if width_css.is_finite() { width_css.max(0.0) } else { 0.0 };
        self.viewport_height = if height_css.is_finite() { height_css.max(0.0) } else { 0.0 };
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        vec![Action::RenderNeeded]
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = self.end_gesture();
        match button {
            Button::Primary => actions.extend(self.begin_gesture(screen_pt, modifiers)),
            Button::Secondary => actions.extend(self.on_context_menu(screen_pt)),
            Button::Middle => {}
        }
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let room_pt = self.camera().screen_to_room(screen_pt);
        match self.input {
            InputState::Idle => self.hover(screen_pt),
            InputState::Dragging { .. } => self.drag(room_pt),
            InputState::Resizing { .. } => self.resize(room_pt),
            InputState::Rotating { .. } | InputState::FreeRotating { .. } => self.rotate(room_pt),
        }
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.end_gesture()
    }

    /// The pointer left the canvas; ends the gesture like a release.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.end_gesture()
    }

    pub fn on_wheel(&mut self, _screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        let factor = if delta.dy < 0.0 { WHEEL_ZOOM_IN } else { WHEEL_ZOOM_OUT };
        self.set_zoom(self.doc.settings.zoom * factor)
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Delete" | "Backspace" => self.delete_selected(),
            k if modifiers.command() && k.eq_ignore_ascii_case("z") => self.undo(),
            k if modifiers.command() && k.eq_ignore_ascii_case("y") => self.redo(),
            _ => Vec::new(),
        }
    }

    // --- Gestures ---

    fn begin_gesture(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let camera = self.camera();
        let room_pt = camera.screen_to_room(screen_pt);

        if modifiers.alt {
            if let Some(item) = hit::pick_item(&self.doc, room_pt) {
                let (id, center) = (item.id, item.center());
                let snapshot = Box::new(self.doc.clone());
                return self.start(InputState::FreeRotating { id, center, snapshot });
            }
        }

        let Some(Hit { item_id: id, part }) = hit::hit_test(&self.doc, &camera, screen_pt, self.ui.selected_id) else {
            let mut actions = self.set_selection(None);
            actions.push(Action::RenderNeeded);
            return actions;
        };
        let Some(item) = self.doc.get(&id) else {
            return Vec::new();
        };
        let snapshot = Box::new(self.doc.clone());
        let center = item.center();
        let state = match part {
            HitPart::RotateHandle => InputState::Rotating { id, center, snapshot },
            HitPart::Corner(corner) => {
                let (sx, sy) = corner.signs();
                InputState::Resizing {
                    id,
                    corner,
                    start_center: center,
                    rotation: item.rotation,
                    anchor_local: Point::new(-sx * item.w / 2.0, -sy * item.h / 2.0),
                    last_valid: Extent { x: item.x, y: item.y, w: item.w, h: item.h },
                    snapshot,
                }
            }
            HitPart::Body => InputState::Dragging { id, grab_offset: room_pt - center, last_valid: center, snapshot },
        };
        self.start(state)
    }

    fn start(&mut self, state: InputState) -> Vec<Action> {
        let target = state.target();
        self.input = state;
        debug!(id = ?target, "gesture start");
        let mut actions = self.set_selection(target);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Finish the active gesture. One history entry is committed if the
    /// document ended up different from where the gesture started.
    fn end_gesture(&mut self) -> Vec<Action> {
        let state = std::mem::take(&mut self.input);
        let Some(snapshot) = state.snapshot() else {
            return Vec::new();
        };
        let mut actions = vec![Action::SetCursor("default".to_owned())];
        if !snapshot.same_content(&self.doc) {
            debug!(id = ?state.target(), "gesture committed");
            actions.extend(self.commit());
        }
        actions
    }

    fn hover(&self, screen_pt: Point) -> Vec<Action> {
        let camera = self.camera();
        let cursor = self.ui.selected_id.and_then(|id| self.doc.get(&id)).map_or("default", |item| {
            if hit::pick_rotate_handle(item, screen_pt, &camera) {
                "grab"
            } else {
                hit::pick_corner(item, screen_pt, &camera).map_or("default", |corner| corner.cursor())
            }
        });
        vec![Action::SetCursor(cursor.to_owned())]
    }

    /// Move toward the snapped cursor position. A colliding position holds
    /// the item at the last valid one.
    fn drag(&mut self, room_pt: Point) -> Vec<Action> {
        let InputState::Dragging { id, grab_offset, last_valid, .. } = self.input else {
            return Vec::new();
        };
        let Some(item) = self.doc.get(&id) else {
            return Vec::new();
        };
        let snapped = snap::snap_position(&self.doc, item, room_pt - grab_offset);
        let blocked = self.doc.settings.avoid_overlap && snap::overlaps_any(&self.doc, item, snapped, item.w, item.h);
        let next = if blocked { last_valid } else { snapped };

        if let Some(item) = self.doc.get_mut(&id) {
            item.set_center(next);
        }
        if let InputState::Dragging { last_valid, .. } = &mut self.input {
            *last_valid = next;
        }
        vec![Action::RenderNeeded]
    }

    /// Resize in the item's frame at gesture start, keeping the opposite
    /// corner fixed.
    fn resize(&mut self, room_pt: Point) -> Vec<Action> {
        let InputState::Resizing { id, corner, start_center, rotation, anchor_local: anchor, last_valid, .. } = self.input
        else {
            return Vec::new();
        };
        let angle = rotation.to_radians();
        let local = geometry::rotate(room_pt - start_center, -angle);
        let (sx, sy) = corner.signs();
        let lx = if sx * (local.x - anchor.x) < MIN_ITEM_SIZE { anchor.x + sx * MIN_ITEM_SIZE } else { local.x };
        let ly = if sy * (local.y - anchor.y) < MIN_ITEM_SIZE { anchor.y + sy * MIN_ITEM_SIZE } else { local.y };
        let w = (lx - anchor.x).abs();
        let h = (ly - anchor.y).abs();
        let center = start_center + geometry::rotate(Point::new((anchor.x + lx) / 2.0, (anchor.y + ly) / 2.0), angle);

        let Some(item) = self.doc.get(&id) else {
            return Vec::new();
        };
        let blocked = self.doc.settings.avoid_overlap && snap::overlaps_any(&self.doc, item, center, w, h);
        let next = if blocked { last_valid } else { Extent { x: center.x, y: center.y, w, h } };

        if let Some(item) = self.doc.get_mut(&id) {
            item.set_center(Point::new(next.x, next.y));
            item.set_size(next.w, next.h);
        }
        if let InputState::Resizing { last_valid, .. } = &mut self.input {
            *last_valid = next;
        }
        vec![Action::RenderNeeded]
    }

    /// Point the item's x axis at the cursor, rounded to whole degrees.
    fn rotate(&mut self, room_pt: Point) -> Vec<Action> {
        let (InputState::Rotating { id, center, .. } | InputState::FreeRotating { id, center, .. }) = self.input else {
            return Vec::new();
        };
        let delta = room_pt - center;
        let raw = geometry::normalize_angle(delta.y.atan2(delta.x).to_degrees().round());
        let angle = snap::snap_angle(raw, center, self.doc.room());
        if let Some(item) = self.doc.get_mut(&id) {
            item.set_rotation(angle);
        }
        vec![Action::RenderNeeded]
    }

    /// Right click: flip the swing side of a door or window.
    fn on_context_menu(&mut self, screen_pt: Point) -> Vec<Action> {
        let room_pt = self.camera().screen_to_room(screen_pt);
        match hit::pick_item(&self.doc, room_pt) {
            Some(item) if item.kind.is_opening() => {
                let id = item.id;
                self.toggle_pivot(&id)
            }
            _ => Vec::new(),
        }
    }

    // --- Explicit user actions ---

    /// Add an item of `kind` with its catalog defaults.
    pub fn add_item(&mut self, kind: ItemKind) -> Vec<Action> {
        self.place(&ItemSpec::of_kind(kind))
    }

    pub fn add_preset(&mut self, preset: &Preset) -> Vec<Action> {
        self.place(&preset.to_spec())
    }

    /// Add the library preset with this id. Unknown ids are ignored.
    pub fn add_preset_by_id(&mut self, preset_id: &str) -> Vec<Action> {
        match self.library.preset(preset_id).map(Preset::to_spec) {
            Some(spec) => self.place(&spec),
            None => Vec::new(),
        }
    }

    /// Add a generic item of the given size. Sizes must be positive.
    pub fn add_custom(&mut self, label: &str, w: f64, h: f64, color: &str) -> Vec<Action> {
        if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
            return Vec::new();
        }
        self.place(&ItemSpec {
            kind: Some(ItemKind::Generic),
            label: Some(label.to_owned()),
            w: Some(w),
            h: Some(h),
            color: Some(color.to_owned()),
            ..ItemSpec::default()
        })
    }

    /// Store a custom size in the preset library. Sizes must be positive.
    pub fn save_custom_preset(&mut self, category: &str, label: &str, w: f64, h: f64, color: &str) -> Vec<Action> {
        if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
            return Vec::new();
        }
        let color = Some(color.trim()).filter(|c| !c.is_empty()).map(str::to_owned);
        let id = self.library.add_custom(category, label, w, h, color);
        info!(preset = %id, "custom preset saved");
        vec![Action::SaveRequested]
    }

    fn place(&mut self, spec: &ItemSpec) -> Vec<Action> {
        let item = Item::from_spec(spec, self.doc.room().center());
        let id = item.id;
        debug!(%id, kind = item.kind.tag(), "item added");
        self.doc.insert(item);
        let mut actions = self.set_selection(Some(id));
        actions.extend(self.commit());
        actions
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected_id else {
            return Vec::new();
        };
        self.doc.remove(&id);
        let mut actions = self.set_selection(None);
        actions.extend(self.commit());
        actions
    }

    /// Rotate the selected item by `delta` degrees (the toolbar uses ±90).
    pub fn rotate_selected(&mut self, delta: f64) -> Vec<Action> {
        let Some(item) = self.ui.selected_id.and_then(|id| self.doc.get_mut(&id)) else {
            return Vec::new();
        };
        item.set_rotation(item.rotation + delta);
        self.commit()
    }

    /// Flip the hinge side of a door or window and select it.
    pub fn toggle_pivot(&mut self, id: &ItemId) -> Vec<Action> {
        let Some(item) = self.doc.get_mut(id) else {
            return Vec::new();
        };
        if !item.kind.is_opening() {
            return Vec::new();
        }
        item.pivot = Some(item.pivot.unwrap_or(Pivot::Left).flipped());
        let mut actions = self.set_selection(Some(*id));
        actions.extend(self.commit());
        actions
    }

    pub fn set_snap(&mut self, on: bool) -> Vec<Action> {
        self.doc.settings.snap = on;
        self.commit()
    }

    pub fn set_avoid_overlap(&mut self, on: bool) -> Vec<Action> {
        self.doc.settings.avoid_overlap = on;
        self.commit()
    }

    pub fn set_show_measures(&mut self, on: bool) -> Vec<Action> {
        self.doc.settings.show_measures = on;
        self.commit()
    }

    /// Set the position snap threshold. Negative or non-finite values are ignored.
    pub fn set_snap_distance(&mut self, distance: f64) -> Vec<Action> {
        if !distance.is_finite() || distance < 0.0 {
            return Vec::new();
        }
        self.doc.settings.snap_distance = distance;
        self.commit()
    }

    /// Set the zoom factor (clamped). Saved with the plan but not undoable.
    pub fn set_zoom(&mut self, zoom: f64) -> Vec<Action> {
        let zoom = clamp_zoom(zoom);
        if (zoom - self.doc.settings.zoom).abs() < f64::EPSILON {
            return Vec::new();
        }
        self.doc.settings.zoom = zoom;
        vec![Action::SaveRequested, Action::RenderNeeded]
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.set_zoom(self.doc.settings.zoom * BUTTON_ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.set_zoom(self.doc.settings.zoom / BUTTON_ZOOM_STEP)
    }

    pub fn zoom_reset(&mut self) -> Vec<Action> {
        self.set_zoom(1.0)
    }

    /// Rename the active room. A blank name restores the default.
    pub fn set_room_name(&mut self, name: &str) -> Vec<Action> {
        let fallback = room_name(self.doc.active_index() + 1);
        self.doc.room_mut().name = match name.trim() {
            "" => fallback,
            trimmed => trimmed.to_owned(),
        };
        self.commit()
    }

    /// Add an empty room covering the bounding box of the active one and
    /// switch to it.
    pub fn add_room(&mut self) -> Vec<Action> {
        let current = self.doc.room();
        let b = current.bounds();
        let room = Room {
            id: String::new(),
            name: room_name(self.doc.rooms().len() + 1),
            unit: current.unit.clone(),
            points: vec![
                Point::new(b.min_x, b.min_y),
                Point::new(b.max_x, b.min_y),
                Point::new(b.max_x, b.max_y),
                Point::new(b.min_x, b.max_y),
            ],
            items: Vec::new(),
        };
        let id = self.doc.add_room(room);
        info!(room = %id, rooms = self.doc.rooms().len(), "room added");
        self.switched_room()
    }

    /// Make the room with this id the one being edited. Unknown ids and the
    /// already active room are ignored.
    pub fn set_active_room(&mut self, id: &str) -> Vec<Action> {
        if !self.doc.set_active_room(id) {
            return Vec::new();
        }
        debug!(room = id, "active room changed");
        self.switched_room()
    }

    fn switched_room(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        let mut actions = self.set_selection(None);
        actions.extend(self.commit());
        actions
    }

    pub fn add_room_point(&mut self, point: Point) -> Vec<Action> {
        if !(point.x.is_finite() && point.y.is_finite()) {
            return Vec::new();
        }
        self.doc.room_mut().points.push(point);
        self.commit()
    }

    /// Drop the last outline point.
    pub fn remove_room_point(&mut self) -> Vec<Action> {
        if self.doc.room_mut().points.pop().is_none() {
            return Vec::new();
        }
        self.commit()
    }

    /// Replace the outline. Needs at least three finite points.
    pub fn set_room_points(&mut self, points: Vec<Point>) -> Vec<Action> {
        if points.len() < 3 || points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Vec::new();
        }
        self.doc.room_mut().points = points;
        self.commit()
    }

    /// Replace the active room's outline and items with the content of a
    /// markup text.
    pub fn apply_markup(&mut self, text: &str) -> Vec<Action> {
        let parsed = markup::parse(text);
        parsed.apply_to(&mut self.doc);
        self.input = InputState::Idle;
        info!(items = self.doc.len(), points = self.doc.room().points.len(), "markup applied");
        let mut actions = self.set_selection(None);
        actions.extend(self.commit());
        actions
    }

    #[must_use]
    pub fn export_markup(&self) -> String {
        markup::serialize(&self.doc)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        self.plan().to_json()
    }

    #[must_use]
    pub fn export_svg(&self) -> String {
        export::build_svg(&self.doc)
    }

    // --- History ---

    pub fn undo(&mut self) -> Vec<Action> {
        let Some(doc) = self.history.undo() else {
            return Vec::new();
        };
        info!(depth = self.history.len(), "undo");
        self.restore(doc)
    }

    pub fn redo(&mut self) -> Vec<Action> {
        let Some(doc) = self.history.redo() else {
            return Vec::new();
        };
        info!(depth = self.history.len(), "redo");
        self.restore(doc)
    }

    /// Swap in a history entry. The view zoom is not part of the edit
    /// history and is kept.
    fn restore(&mut self, mut doc: Document) -> Vec<Action> {
        doc.settings.zoom = self.doc.settings.zoom;
        self.doc = doc;
        self.input = InputState::Idle;
        let still_there = self.ui.selected_id.filter(|id| self.doc.get(id).is_some());
        let mut actions = self.set_selection(still_there);
        actions.extend([Action::DocumentChanged, Action::RenderNeeded]);
        actions
    }

    fn commit(&mut self) -> Vec<Action> {
        if self.history.commit(&self.doc) {
            vec![Action::DocumentChanged, Action::RenderNeeded]
        } else {
            vec![Action::RenderNeeded]
        }
    }

    fn set_selection(&mut self, id: Option<ItemId>) -> Vec<Action> {
        if self.ui.selected_id == id {
            return Vec::new();
        }
        self.ui.selected_id = id;
        vec![Action::SelectionChanged(id)]
    }

    // --- Queries ---

    /// The currently selected item, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ItemId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Camera fitted to the current viewport, room and zoom.
    #[must_use]
    pub fn camera(&self) -> Camera {
        Camera::fit(self.viewport_width, self.viewport_height, self.doc.room().bounds(), self.doc.settings.zoom)
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport { width: self.viewport_width, height: self.viewport_height, dpr: self.dpr }
    }

    /// The document and library as a plan file.
    #[must_use]
    pub fn plan(&self) -> PlanFile {
        PlanFile::new(self.doc.clone(), self.library.clone())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas
/// element and local storage.
pub struct Engine {
    canvas: HtmlCanvasElement,
    store: Option<LocalStorage>,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to the given canvas and restore the saved plan.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let store = match LocalStorage::open() {
            Ok(store) => Some(store),
            Err(e) => {
                warn!(error = %e, "local storage unavailable; plan will not be saved");
                None
            }
        };
        let mut core = EngineCore::new();
        if let Some(store) = &store {
            match persist::load_plan(store) {
                Some(plan) => core.restore_plan(plan),
                None => core.library = persist::load_library(store),
            }
        }
        Self { canvas, store, core }
    }

    /// Run an explicit user action on the core, saving if it asks for it.
    pub fn perform(&mut self, action: impl FnOnce(&mut EngineCore) -> Vec<Action>) -> Vec<Action> {
        let actions = action(&mut self.core);
        self.after(actions)
    }

    // --- Viewport ---

    /// Update viewport dimensions and size the canvas backing store to match.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        let actions = self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width(device_px(self.core.viewport_width * self.core.dpr));
        self.canvas.set_height(device_px(self.core.viewport_height * self.core.dpr));
        actions
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_pointer_down(screen_pt, button, modifiers);
        self.after(actions)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_pointer_up(screen_pt, button, modifiers);
        self.after(actions)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let actions = self.core.on_pointer_leave();
        self.after(actions)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_wheel(screen_pt, delta, modifiers);
        self.after(actions)
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_key_down(key, modifiers);
        self.after(actions)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a canvas call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let mut ctx = self.context()?;
        render::draw(&mut ctx, &self.core.doc, &self.core.camera(), &self.core.ui, self.core.viewport())
    }

    /// The canvas content as a PNG data URL.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas cannot be encoded (e.g. it is tainted).
    pub fn export_png(&self) -> Result<String, JsValue> {
        self.canvas.to_data_url_with_type("image/png")
    }

    fn context(&self) -> Result<CanvasRenderingContext2d, JsValue> {
        self.canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)
    }

    fn after(&mut self, actions: Vec<Action>) -> Vec<Action> {
        if actions.iter().any(|a| matches!(a, Action::DocumentChanged | Action::SaveRequested)) {
            self.save();
        }
        actions
    }

    fn save(&mut self) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        if let Err(e) = save_all(store, &self.core.plan()) {
            warn!(error = %e, "saving plan failed");
        }
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ItemId> {
        self.core.selection()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }
}

fn save_all(store: &mut dyn Store, plan: &PlanFile) -> Result<(), PersistError> {
    persist::save_plan(store, plan)?;
    persist::save_library(store, &plan.library)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn device_px(css_px: f64) -> u32 {
    css_px.round().max(0.0) as u32
}
