//! Plain-text room description: parse and serialize.
//!
//! The format is line based. Top-level `key: value` lines set room fields,
//! `points:` / `walls:` / `items:` open list sections, `#` starts a comment.
//! Item entries begin with `- ` and continue with indented `key: value`
//! lines:
//!
//! ```text
//! # Room
//! name: Living room
//! unit: cm
//!
//! points:
//! - 0,0
//! - 500,0
//! - 500,350
//!
//! items:
//! - type: sofa
//!   x: 140
//!   y: 90
//! - door
//! ```
//!
//! Parsing never fails. Lines that do not fit the grammar are skipped and
//! unreadable numbers are left unset, so item construction falls back to the
//! catalog defaults.

#[cfg(test)]
#[path = "markup_test.rs"]
mod markup_test;

use crate::catalog::ItemKind;
use crate::doc::{Document, Item, ItemSpec, Pivot, Room};
use crate::geometry::{self, Point};

/// Plan loaded on first start.
pub const DEFAULT_MARKUP: &str = "# Room
unit: cm

points:
- 0,0
- 500,0
- 500,350
- 0,350

items:
- type: sofa
  x: 140
  y: 90
  w: 180
  h: 80
  rotation: 0
- type: table
  x: 320
  y: 210
  w: 120
  h: 70
  rotation: 0
- type: door
  x: 250
  y: 0
  w: 80
  h: 15
  rotation: 0
- type: window
  x: 500
  y: 170
  w: 80
  h: 15
  rotation: 90
- type: radiator
  x: 30
  y: 280
  w: 120
  h: 30
  rotation: 0
";

/// Fallback room size when the text gives neither points nor walls.
const FALLBACK_WIDTH: f64 = 400.0;
const FALLBACK_HEIGHT: f64 = 300.0;

/// Result of parsing a room description.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMarkup {
    /// Room name, when the text sets one.
    pub name: Option<String>,
    pub unit: String,
    /// Outline; a rectangle is synthesized when the text lists no points.
    pub points: Vec<Point>,
    pub items: Vec<ItemSpec>,
}

impl ParsedMarkup {
    /// Replace the outline and every item of the active room of `doc` with
    /// the parsed content. Items without a position land on the new room's
    /// center. Other rooms are untouched.
    pub fn apply_to(&self, doc: &mut Document) {
        let room = doc.room_mut();
        if let Some(name) = &self.name {
            room.name.clone_from(name);
        }
        room.unit.clone_from(&self.unit);
        room.points.clone_from(&self.points);
        let center = room.center();
        room.items = self.items.iter().map(|spec| Item::from_spec(spec, center)).collect();
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Top,
    Points,
    Walls,
    Items,
}

/// An item entry as raw `key: value` pairs, in source order.
#[derive(Default)]
struct RawItem(Vec<(String, String)>);

impl RawItem {
    fn set(&mut self, key: String, value: String) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(parse_number)
    }

    fn into_spec(self) -> ItemSpec {
        let tag = self.get("type").or_else(|| self.get("kind")).or_else(|| self.get("label"));
        ItemSpec {
            kind: tag.map(ItemKind::from_tag),
            label: self.get("label").or_else(|| self.get("name")).map(str::to_owned),
            x: self.number("x"),
            y: self.number("y"),
            w: self.number("w"),
            h: self.number("h"),
            rotation: self.number("rotation"),
            color: self.get("color").map(str::to_owned),
            pivot: self.get("pivot").or_else(|| self.get("hinge")).and_then(Pivot::from_tag),
        }
    }
}

/// Parse a room description.
#[must_use]
pub fn parse(text: &str) -> ParsedMarkup {
    let mut name = None;
    let mut unit = "cm".to_owned();
    let mut width = FALLBACK_WIDTH;
    let mut height = FALLBACK_HEIGHT;
    let mut points = Vec::new();
    let mut walls = Vec::new();
    let mut items = Vec::new();
    let mut current: Option<RawItem> = None;
    let mut section = Section::Top;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let header = match line.to_ascii_lowercase().as_str() {
            "points:" => Some(Section::Points),
            "walls:" => Some(Section::Walls),
            "items:" => Some(Section::Items),
            _ => None,
        };
        if let Some(next) = header {
            items.extend(current.take().map(RawItem::into_spec));
            section = next;
            continue;
        }

        match section {
            Section::Points if line.starts_with('-') => {
                if let [x, y, ..] = scan_numbers(line)[..] {
                    points.push(Point::new(x, y));
                }
                continue;
            }
            Section::Walls if line.starts_with('-') => {
                walls.extend(scan_numbers(line).first());
                continue;
            }
            Section::Items => {
                if line.starts_with('-') {
                    items.extend(current.take().map(RawItem::into_spec));
                    let rest = line.trim_start_matches('-').trim_start();
                    let mut item = RawItem::default();
                    match parse_key_value(rest) {
                        Some((key, value)) => item.set(key, value),
                        None => item.set("type".to_owned(), rest.to_owned()),
                    }
                    current = Some(item);
                } else if let (Some(item), Some((key, value))) = (current.as_mut(), parse_key_value(line)) {
                    item.set(key, value);
                }
                continue;
            }
            _ => {}
        }

        if let Some((key, value)) = parse_key_value(line) {
            match key.as_str() {
                "name" => name = Some(value),
                "unit" => unit = value,
                "width" => width = parse_number(&value).unwrap_or(width),
                "height" => height = parse_number(&value).unwrap_or(height),
                _ => {}
            }
        }
    }
    items.extend(current.take().map(RawItem::into_spec));

    if points.is_empty() {
        if let [w, h, ..] = walls[..] {
            width = w;
            height = h;
        }
        points = Room::rectangle(width, height).points;
    }

    ParsedMarkup { name, unit, points, items }
}

/// Write the active room of `doc` in the markup format. Lengths are rounded
/// to 0.1 and rotation to whole degrees. Line breaks inside text values are
/// folded into spaces so every value stays on its own line.
#[must_use]
pub fn serialize(doc: &Document) -> String {
    let room = doc.room();
    let mut lines = vec![
        "# Room".to_owned(),
        format!("name: {}", one_line(&room.name)),
        format!("unit: {}", one_line(&room.unit)),
        String::new(),
        "points:".to_owned(),
    ];
    lines.extend(
        room.points
            .iter()
            .map(|p| format!("- {},{}", round_tenth(p.x), round_tenth(p.y))),
    );
    lines.push(String::new());
    lines.push("items:".to_owned());
    for item in &room.items {
        lines.push(format!("- type: {}", item.kind.tag()));
        lines.push(format!("  label: {}", one_line(&item.label)));
        lines.push(format!("  x: {}", round_tenth(item.x)));
        lines.push(format!("  y: {}", round_tenth(item.y)));
        lines.push(format!("  w: {}", round_tenth(item.w)));
        lines.push(format!("  h: {}", round_tenth(item.h)));
        if let Some(pivot) = item.pivot {
            lines.push(format!("  pivot: {}", pivot.tag()));
        }
        lines.push(format!("  rotation: {}", geometry::normalize_angle(item.rotation.round()) + 0.0));
        if !item.color.is_empty() {
            lines.push(format!("  color: {}", one_line(&item.color)));
        }
    }
    lines.push(String::new());
    lines.join("\n")
}

fn one_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Round to one decimal. Adding zero folds `-0` into `0` for display.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0 + 0.0
}

/// Split `key: value`. Keys are ASCII alphanumerics, `_` or `-` and are
/// lowercased; the value is trimmed and may end up empty.
fn parse_key_value(line: &str) -> Option<(String, String)> {
    let (key, rest) = line.split_once(':')?;
    let key = key.trim_end();
    let valid_key = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if !valid_key || rest.is_empty() {
        return None;
    }
    Some((key.to_ascii_lowercase(), rest.trim().to_owned()))
}

/// Every `-?digits(.digits)?` run in `line`, left to right.
fn scan_numbers(line: &str) -> Vec<f64> {
    let bytes = line.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let negative = bytes[i] == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
        if !negative && !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        if negative {
            i += 1;
        }
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if bytes.get(i) == Some(&b'.') && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
            i += 1;
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
        }
        if let Ok(n) = line[start..i].parse::<f64>() {
            out.push(n);
        }
    }
    out
}

/// Read the leading number of `value` (`"120cm"` reads as 120). Non-finite
/// results count as unreadable.
fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let end = value
        .bytes()
        .position(|b| !(b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E')))
        .unwrap_or(value.len());
    for len in (1..=end).rev() {
        if let Ok(n) = value[..len].parse::<f64>() {
            return n.is_finite().then_some(n);
        }
    }
    None
}
