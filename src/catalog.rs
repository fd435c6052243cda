//! Item catalog and preset library.
//!
//! [`ItemKind`] is the closed set of item types. Every kind maps to a
//! [`KindDefaults`] record, so building an item never depends on a lookup
//! that can miss: unknown type tags resolve to [`ItemKind::Generic`].
//!
//! The preset [`Library`] is a user-editable list of named sizes grouped in
//! categories. It is persisted next to the plan but lives outside the undo
//! history.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use serde::{Deserialize, Serialize};

use crate::doc::{ItemSpec, Pivot};

/// The type of a placed item.
///
/// Serialized as its lowercase tag. Any string deserializes: tags go
/// through [`ItemKind::from_tag`], so aliases, odd casing and unknown tags
/// are all accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ItemKind {
    /// Sofas, armchairs, chairs.
    Seating,
    /// Dining or coffee table.
    Table,
    /// Bed of any size.
    Bed,
    /// Wardrobes, shelves, cabinets.
    Storage,
    /// Door opening; carries a swing pivot.
    Door,
    /// Window opening; carries a swing pivot.
    Window,
    /// Radiators and other heaters.
    Heating,
    /// Anything else.
    Generic,
}

impl From<String> for ItemKind {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

/// Default label, size and colour for an [`ItemKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindDefaults {
    pub label: &'static str,
    pub w: f64,
    pub h: f64,
    pub color: &'static str,
}

impl ItemKind {
    /// Every kind, in catalog order.
    pub const ALL: [ItemKind; 8] = [
        Self::Seating,
        Self::Table,
        Self::Bed,
        Self::Storage,
        Self::Door,
        Self::Window,
        Self::Heating,
        Self::Generic,
    ];

    /// Resolve a free-form type tag. Unknown or empty tags become `Generic`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "seating" | "sofa" | "chair" | "couch" => Self::Seating,
            "table" => Self::Table,
            "bed" => Self::Bed,
            "storage" | "wardrobe" => Self::Storage,
            "door" => Self::Door,
            "window" => Self::Window,
            "heating" | "radiator" => Self::Heating,
            _ => Self::Generic,
        }
    }

    /// Canonical tag written by the markup serializer.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Seating => "seating",
            Self::Table => "table",
            Self::Bed => "bed",
            Self::Storage => "storage",
            Self::Door => "door",
            Self::Window => "window",
            Self::Heating => "heating",
            Self::Generic => "generic",
        }
    }

    /// Catalog defaults for this kind.
    #[must_use]
    pub fn defaults(self) -> KindDefaults {
        match self {
            Self::Seating => KindDefaults { label: "Sofa", w: 180.0, h: 80.0, color: "#f59e0b" },
            Self::Table => KindDefaults { label: "Table", w: 120.0, h: 70.0, color: "#a16207" },
            Self::Bed => KindDefaults { label: "Bed", w: 200.0, h: 140.0, color: "#60a5fa" },
            Self::Storage => KindDefaults { label: "Wardrobe", w: 120.0, h: 60.0, color: "#475569" },
            Self::Door => KindDefaults { label: "Door", w: 80.0, h: 15.0, color: "#92400e" },
            Self::Window => KindDefaults { label: "Window", w: 80.0, h: 15.0, color: "#38bdf8" },
            Self::Heating => KindDefaults { label: "Radiator", w: 120.0, h: 30.0, color: "#9ca3af" },
            Self::Generic => KindDefaults { label: "Item", w: 80.0, h: 40.0, color: "#94a3b8" },
        }
    }

    /// Whether items of this kind are openings with a swing pivot.
    #[must_use]
    pub fn is_opening(self) -> bool {
        matches!(self, Self::Door | Self::Window)
    }
}

// =============================================================
// Presets
// =============================================================

/// A named item size the user can drop into the room in one click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub w: f64,
    pub h: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<Pivot>,
}

impl Preset {
    /// Construction request for an item built from this preset.
    #[must_use]
    pub fn to_spec(&self) -> ItemSpec {
        ItemSpec {
            kind: Some(self.kind),
            label: Some(self.label.clone()),
            w: Some(self.w),
            h: Some(self.h),
            rotation: self.rotation,
            color: self.color.clone(),
            pivot: self.pivot,
            ..ItemSpec::default()
        }
    }
}

/// A group of presets shown together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetCategory {
    pub id: String,
    pub label: String,
    pub presets: Vec<Preset>,
}

/// The user's preset library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    pub categories: Vec<PresetCategory>,
}

impl Default for Library {
    fn default() -> Self {
        fn preset(id: &str, label: &str, kind: ItemKind, w: f64, h: f64) -> Preset {
            Preset {
                id: id.to_owned(),
                label: label.to_owned(),
                kind,
                w,
                h,
                rotation: None,
                color: None,
                pivot: None,
            }
        }

        Self {
            categories: vec![
                PresetCategory {
                    id: "living".to_owned(),
                    label: "Living room".to_owned(),
                    presets: vec![
                        preset("sofa-2", "Two-seat sofa", ItemKind::Seating, 180.0, 80.0),
                        preset("sofa-3", "Three-seat sofa", ItemKind::Seating, 220.0, 90.0),
                        preset("table-120", "Table 120 × 70", ItemKind::Table, 120.0, 70.0),
                        preset("chair-45", "Chair 45 × 45", ItemKind::Seating, 45.0, 45.0),
                    ],
                },
                PresetCategory {
                    id: "openings".to_owned(),
                    label: "Openings".to_owned(),
                    presets: vec![
                        preset("door-70", "Door 70", ItemKind::Door, 70.0, 15.0),
                        preset("door-80", "Door 80", ItemKind::Door, 80.0, 15.0),
                        preset("door-90", "Door 90", ItemKind::Door, 90.0, 15.0),
                        preset("window-80", "Window 80", ItemKind::Window, 80.0, 15.0),
                        preset("window-120", "Window 120", ItemKind::Window, 120.0, 15.0),
                        Preset {
                            rotation: Some(90.0),
                            ..preset("window-80v", "Window 80 vertical", ItemKind::Window, 80.0, 15.0)
                        },
                    ],
                },
            ],
        }
    }
}

impl Library {
    /// Find a preset by id across all categories.
    #[must_use]
    pub fn preset(&self, id: &str) -> Option<&Preset> {
        self.categories
            .iter()
            .flat_map(|c| c.presets.iter())
            .find(|p| p.id == id)
    }

    /// Append a custom preset to `category_label`, creating the category if no
    /// existing one matches case-insensitively. Returns the new preset's id.
    pub fn add_custom(&mut self, category_label: &str, label: &str, w: f64, h: f64, color: Option<String>) -> String {
        let category_label = match category_label.trim() {
            "" => "Custom",
            other => other,
        };
        let label = match label.trim() {
            "" => ItemKind::Generic.defaults().label,
            other => other,
        };
        let index = self
            .categories
            .iter()
            .position(|c| c.label.eq_ignore_ascii_case(category_label))
            .unwrap_or_else(|| {
                self.categories.push(PresetCategory {
                    id: format!("cat-{}", uuid::Uuid::new_v4().simple()),
                    label: category_label.to_owned(),
                    presets: Vec::new(),
                });
                self.categories.len() - 1
            });

        let id = format!("preset-{}", uuid::Uuid::new_v4().simple());
        self.categories[index].presets.push(Preset {
            id: id.clone(),
            label: label.to_owned(),
            kind: ItemKind::Generic,
            w: w.max(crate::consts::MIN_ITEM_SIZE),
            h: h.max(crate::consts::MIN_ITEM_SIZE),
            rotation: None,
            color,
            pivot: None,
        });
        id
    }
}
