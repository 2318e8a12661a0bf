//! The one mutable entity: what the user has picked.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::lenient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewStats {
    #[serde(default, deserialize_with = "lenient::int")]
    pub dex_mod: i32,
    #[serde(default, deserialize_with = "lenient::int")]
    pub prof_bonus: i32,
}

/// Weapon chosen for one mounting point. `weapon_id: None` is the empty slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountSelection {
    #[serde(default)]
    pub weapon_id: Option<String>,
    #[serde(default)]
    pub qty: u32,
}

impl MountSelection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn weapon(weapon_id: impl Into<String>, qty: u32) -> Self {
        Self {
            weapon_id: Some(weapon_id.into()),
            qty,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weapon_id.is_none()
    }
}

/// Owned editing state. Derivation reads it; only [`crate::loadout::LoadoutSession`]
/// replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadoutConfiguration {
    pub base_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saddle_id: Option<String>,
    /// Application order. No duplicates.
    #[serde(default)]
    pub mod_ids: Vec<String>,
    #[serde(default)]
    pub mount_selections: BTreeMap<String, MountSelection>,
    #[serde(default)]
    pub proficiencies: BTreeMap<String, bool>,
    #[serde(default)]
    pub crew_stats: BTreeMap<String, CrewStats>,
}

impl LoadoutConfiguration {
    /// Fresh configuration for a base: no saddle, mods, weapons or crew numbers.
    pub fn for_base(base_id: impl Into<String>) -> Self {
        Self {
            base_id: base_id.into(),
            ..Self::default()
        }
    }

    pub fn has_mod(&self, mod_id: &str) -> bool {
        self.mod_ids.iter().any(|id| id == mod_id)
    }

    pub fn is_proficient(&self, point_id: &str) -> bool {
        self.proficiencies.get(point_id).copied().unwrap_or(false)
    }

    pub fn crew(&self, group_id: &str) -> CrewStats {
        self.crew_stats.get(group_id).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn minimal_configuration_parses() {
        let config: LoadoutConfiguration =
            serde_json::from_value(json!({"baseId": "griffon"})).unwrap();
        assert_eq!(config, LoadoutConfiguration::for_base("griffon"));
        assert_eq!(config.crew("pilot"), CrewStats::default());
        assert!(!config.is_proficient("bow"));
    }

    #[test]
    fn crew_numbers_tolerate_strings() {
        let stats: CrewStats =
            serde_json::from_value(json!({"dexMod": "3", "profBonus": null})).unwrap();
        assert_eq!(stats, CrewStats { dex_mod: 3, prof_bonus: 0 });
    }
}
