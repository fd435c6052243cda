//! Interaction engine for a 2D room floor-plan editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser, and as a
//! plain library for the headless CLI. It owns the editing model: a room
//! outline with rectangular items placed in it, the pointer gestures that
//! move, resize and rotate those items (with snapping and overlap
//! avoidance), undo/redo, the room markup format, and JSON/SVG export. The
//! host JavaScript layer only forwards DOM events to [`engine::Engine`] and
//! reacts to the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Room, items and settings |
//! | [`catalog`] | Item kinds with their defaults, and the preset library |
//! | [`geometry`] | Points, bounds, rotated rectangles, angles |
//! | [`camera`] | Room-to-screen fit and coordinate conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Picking items, corners and the rotate handle |
//! | [`snap`] | Position and angle snapping, overlap checks |
//! | [`measure`] | Distances to the nearest wall and nearest item |
//! | [`history`] | Undo/redo over document snapshots |
//! | [`markup`] | The text room description format |
//! | [`export`] | JSON plan files and SVG export |
//! | [`persist`] | Saving the plan and presets to key/value storage |
//! | [`render`] | Scene drawing onto a 2D surface |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod camera;
pub mod catalog;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod export;
pub mod geometry;
pub mod history;
pub mod hit;
pub mod input;
pub mod markup;
pub mod measure;
pub mod persist;
pub mod render;
pub mod snap;
