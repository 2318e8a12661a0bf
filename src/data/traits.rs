//! Trait glossary: id -> display name and rules text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wrapper key used by older glossary files.
pub const LEGACY_WRAPPER_KEY: &str = "mountVehicleTraits";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitInfo {
    pub name: String,
    pub desc: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraitGlossary {
    entries: BTreeMap<String, TraitInfo>,
}

impl TraitGlossary {
    /// Accepts a list of `{id, name, desc}`, a map `id -> {name, desc}`, or a
    /// map wrapped under a single key (`mountVehicleTraits` or any other).
    pub fn from_value(value: &Value) -> Self {
        let entries = match value {
            Value::Array(items) => items.iter().filter_map(listed_entry).collect(),
            Value::Object(map) => keyed_entries(unwrap_legacy(map)),
            _ => BTreeMap::new(),
        };
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&TraitInfo> {
        self.entries.get(id)
    }

    /// Glossary entry, or a title-cased label with empty text for unknown ids.
    pub fn resolve(&self, id: &str) -> TraitInfo {
        self.entries.get(id).cloned().unwrap_or_else(|| TraitInfo {
            name: trait_label(id),
            desc: String::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn listed_entry(item: &Value) -> Option<(String, TraitInfo)> {
    let id = item.get("id")?.as_str().filter(|id| !id.is_empty())?;
    Some((id.to_string(), info_from(id, item)))
}

fn unwrap_legacy(map: &Map<String, Value>) -> &Map<String, Value> {
    if let Some(Value::Object(inner)) = map.get(LEGACY_WRAPPER_KEY) {
        return inner;
    }
    if map.len() == 1 {
        if let Some(Value::Object(inner)) = map.values().next() {
            if !inner.is_empty() && inner.values().all(Value::is_object) {
                return inner;
            }
        }
    }
    map
}

fn keyed_entries(map: &Map<String, Value>) -> BTreeMap<String, TraitInfo> {
    map.iter()
        .filter(|(_, entry)| entry.is_object())
        .map(|(id, entry)| (id.clone(), info_from(id, entry)))
        .collect()
}

fn info_from(id: &str, entry: &Value) -> TraitInfo {
    let text = |key: &str| entry.get(key).and_then(Value::as_str).unwrap_or_default();
    let name = text("name");
    TraitInfo {
        name: if name.is_empty() { id.to_string() } else { name.to_string() },
        desc: text("desc").to_string(),
    }
}

/// `heavy_armor` -> `Heavy Armor`.
pub fn trait_label(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut prev_word = false;
    for c in id.chars() {
        let c = if c == '_' { ' ' } else { c };
        let word = c.is_alphanumeric();
        if word && !prev_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_word = word;
    }
    out
}
