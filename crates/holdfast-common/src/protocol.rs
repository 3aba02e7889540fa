//! Page-level data exchanged between backends and the engine.
//!
//! Backends answer queries with [`ElementSnapshot`]s: a point-in-time copy of
//! everything the resolver needs to decide whether an element is the one an
//! intent is after. Snapshots are plain data; acting on an element goes back
//! through the backend using the snapshot's [`ElementId`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Backend-assigned handle. Valid until the next navigation.
pub type ElementId = u32;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Check if one rectangle is completely inside another.
pub fn is_inside(inner: &Rect, outer: &Rect) -> bool {
    inner.x >= outer.x
        && inner.y >= outer.y
        && inner.x + inner.width <= outer.x + outer.width
        && inner.y + inner.height <= outer.y + outer.height
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementSnapshot {
    pub id: ElementId,
    /// Lower-case tag name ("input", "label", "li", ...)
    pub tag: String,
    /// Rendered text content (`textContent`), untrimmed.
    pub text: String,
    /// Current form value for inputs, selects and textareas.
    pub value: Option<String>,
    #[serde(deserialize_with = "deserialize_nullable_string_map")]
    pub attributes: HashMap<String, String>,
    pub rect: Rect,
    pub visible: bool,
    pub enabled: bool,
    pub checked: bool,
}

impl ElementSnapshot {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn is_form_control(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "select" | "textarea")
    }

    pub fn is_actionable(&self) -> bool {
        self.visible && self.enabled
    }
}

fn deserialize_nullable_string_map<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<HashMap<String, Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
    pub status: u16, // generic status code (e.g. 200)
}
