//! Plan file (JSON) and SVG export.
//!
//! The JSON plan file is the interchange and persistence format: the whole
//! document plus the preset library under a format version. Imports are
//! sanitized before they reach the engine.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use serde::{Deserialize, Serialize};

use crate::catalog::Library;
use crate::doc::Document;

/// Current plan file format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid plan json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported plan version {found} (newest known is {FORMAT_VERSION})")]
    UnsupportedVersion { found: u32 },
}

/// A saved plan: the document plus the user's preset library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanFile {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(flatten)]
    pub document: Document,
    #[serde(default)]
    pub library: Library,
}

#[derive(Deserialize)]
struct VersionHeader {
    #[serde(default = "default_version")]
    version: u32,
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

impl PlanFile {
    #[must_use]
    pub fn new(document: Document, library: Library) -> Self {
        Self { version: FORMAT_VERSION, document, library }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and sanitize a plan file.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::UnsupportedVersion`] for files written by a
    /// newer format, [`ImportError::Json`] for anything unreadable.
    pub fn from_json(text: &str) -> Result<Self, ImportError> {
        let header: VersionHeader = serde_json::from_str(text)?;
        if header.version > FORMAT_VERSION {
            return Err(ImportError::UnsupportedVersion { found: header.version });
        }
        let mut plan: PlanFile = serde_json::from_str(text)?;
        plan.version = FORMAT_VERSION;
        plan.document.sanitize();
        Ok(plan)
    }
}

/// Render the room and its items as a standalone SVG document.
///
/// Coordinates are translated so the room's bounding box starts at the
/// origin; one SVG unit is one room unit.
#[must_use]
pub fn build_svg(doc: &Document) -> String {
    let bounds = doc.room().bounds();
    let width = bounds.width();
    let height = bounds.height();
    let room_points = doc
        .room()
        .points
        .iter()
        .map(|p| format!("{},{}", p.x - bounds.min_x, p.y - bounds.min_y))
        .collect::<Vec<_>>()
        .join(" ");

    let rects: String = doc
        .items()
        .iter()
        .map(|item| {
            let x = item.x - bounds.min_x;
            let y = item.y - bounds.min_y;
            let rotate = if item.rotation.abs() < f64::EPSILON {
                String::new()
            } else {
                format!(" transform=\"rotate({} {x} {y})\"", item.rotation)
            };
            format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"#111827\"{rotate} />",
                x - item.w / 2.0,
                y - item.h / 2.0,
                item.w,
                item.h,
                escape_attr(&item.color),
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n  \
         <polygon points=\"{room_points}\" fill=\"#f9fafb\" stroke=\"#111827\" stroke-width=\"2\" />\n  \
         {rects}\n\
         </svg>"
    )
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
