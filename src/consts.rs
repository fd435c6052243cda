//! Shared numeric constants for the planner crate.

// ── Geometry ────────────────────────────────────────────────────

/// Smallest width or height an item may take, in room units.
pub const MIN_ITEM_SIZE: f64 = 5.0;

// ── Viewport ────────────────────────────────────────────────────

/// Margin kept free around the room when fitting it to the viewport, in pixels.
pub const VIEW_PADDING_PX: f64 = 60.0;

/// Lower zoom bound.
pub const ZOOM_MIN: f64 = 0.5;

/// Upper zoom bound.
pub const ZOOM_MAX: f64 = 3.0;

/// Zoom multiplier applied per wheel notch towards the user (scroll up).
pub const WHEEL_ZOOM_IN: f64 = 1.08;

/// Zoom multiplier applied per wheel notch away from the user (scroll down).
pub const WHEEL_ZOOM_OUT: f64 = 0.92;

/// Zoom multiplier for the zoom-in / zoom-out buttons.
pub const BUTTON_ZOOM_STEP: f64 = 1.1;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space grab radius around a resize corner.
pub const CORNER_PICK_RADIUS_PX: f64 = 14.0;

/// Screen-space grab radius around the rotate handle.
pub const ROTATE_PICK_RADIUS_PX: f64 = 12.0;

/// Distance from the top edge midpoint to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 28.0;

// ── Snapping ────────────────────────────────────────────────────

/// Angular tolerance for rotation snapping, in degrees.
pub const ANGLE_SNAP_DEG: f64 = 3.0;

/// An item center closer than this to a wall also snaps to the wall's angle.
pub const WALL_SNAP_DIST: f64 = 10.0;

/// Cardinal rotation targets, in degrees.
pub const CARDINAL_ANGLES: [f64; 4] = [0.0, 90.0, 180.0, 270.0];

// ── History ─────────────────────────────────────────────────────

/// Maximum number of retained undo snapshots.
pub const HISTORY_LIMIT: usize = 50;

// ── Rendering ───────────────────────────────────────────────────

/// Side length of a resize corner square, in screen pixels.
pub const HANDLE_SIZE_PX: f64 = 12.0;

/// Radius of the rotate handle circle, in screen pixels.
pub const ROTATE_HANDLE_RADIUS_PX: f64 = 8.0;

/// Gap between an item and its selection outline, in screen pixels.
pub const SELECTION_OUTSET_PX: f64 = 4.0;
