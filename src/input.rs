//! Input model: modifier keys, mouse buttons, and the gesture state machine.
//!
//! `InputState` is the active gesture between pointer-down and pointer-up (or
//! pointer-leave). Every active variant owns a snapshot of the document taken
//! when the gesture started; on release the engine compares the live document
//! against it to decide whether the gesture produced a history entry.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::{Document, ItemId};
use crate::geometry::Point;
use crate::hit::Corner;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    /// Alt / Option: press on any item to rotate it freely.
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl, or Cmd on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    /// Right button; opens the context action (pivot flip).
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// UI state visible to the renderer but not part of the document.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub selected_id: Option<ItemId>,
}

/// Center and size of an item, as remembered by a resize gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// The gesture in progress.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture; pointer moves only update the hover cursor.
    #[default]
    Idle,
    /// Moving an item by its body.
    Dragging {
        id: ItemId,
        /// Cursor minus item center at press time, in room units.
        grab_offset: Point,
        /// Last center that did not collide with another item.
        last_valid: Point,
        snapshot: Box<Document>,
    },
    /// Resizing an item from one corner while the opposite corner stays put.
    Resizing {
        id: ItemId,
        /// The corner being dragged.
        corner: Corner,
        /// Item center at press time; origin of the local frame.
        start_center: Point,
        /// Item rotation at press time, in degrees.
        rotation: f64,
        /// The fixed corner in the local frame.
        anchor_local: Point,
        last_valid: Extent,
        snapshot: Box<Document>,
    },
    /// Rotating the selected item with its rotate handle.
    Rotating {
        id: ItemId,
        center: Point,
        snapshot: Box<Document>,
    },
    /// Rotating any item with Alt held.
    FreeRotating {
        id: ItemId,
        center: Point,
        snapshot: Box<Document>,
    },
}

impl InputState {
    /// Document as it was when the current gesture started.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Document> {
        match self {
            Self::Idle => None,
            Self::Dragging { snapshot, .. }
            | Self::Resizing { snapshot, .. }
            | Self::Rotating { snapshot, .. }
            | Self::FreeRotating { snapshot, .. } => Some(snapshot),
        }
    }

    /// Item the current gesture acts on.
    #[must_use]
    pub fn target(&self) -> Option<ItemId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. }
            | Self::Resizing { id, .. }
            | Self::Rotating { id, .. }
            | Self::FreeRotating { id, .. } => Some(*id),
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
