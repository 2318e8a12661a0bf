//! The portable loadout document.
//!
//! This is the only contract an importer may rely on: every value in it is
//! already derived (mods applied, encumbrance penalties included), so a
//! consumer never needs the reference catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::lenient;
use crate::data::{Action, BaseKind, CreatureSize, WeaponKind};
use crate::loadout::{AttackAbility, CrewStats, EncumbranceTier, LoadoutConfiguration, MountSelection};

pub const SCHEMA: &str = "mountforge.loadout/1";

fn current_schema() -> String {
    SCHEMA.to_string()
}

fn ranged() -> WeaponKind {
    WeaponKind::Ranged
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadoutDocument {
    #[serde(default = "current_schema")]
    pub schema: String,
    pub base_id: String,
    #[serde(default)]
    pub base_name: String,
    #[serde(default)]
    pub base_type: BaseKind,
    #[serde(default)]
    pub base_size: CreatureSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saddle_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saddle_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub mod_ids: Vec<String>,
    #[serde(default)]
    pub mods: Vec<DocumentEntry>,
    #[serde(default)]
    pub stats: DocumentStats,
    #[serde(default)]
    pub movement: DocumentMovement,
    #[serde(default)]
    pub encumbrance: DocumentEncumbrance,
    #[serde(
        default,
        deserialize_with = "lenient::opt_strings",
        skip_serializing_if = "Option::is_none"
    )]
    pub weapon_allowlist: Option<Vec<String>>,
    #[serde(default)]
    pub traits: Vec<DocumentEntry>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub bonus_actions: Vec<Action>,
    #[serde(default)]
    pub reactions: Vec<Action>,
    #[serde(default)]
    pub legendary_actions: Vec<Action>,
    #[serde(default)]
    pub mounted_weapons: Vec<DocumentMountedWeapon>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub points: i32,
    #[serde(default)]
    pub crew_stats: BTreeMap<String, CrewStats>,
    #[serde(default)]
    pub proficiencies: BTreeMap<String, bool>,
}

/// A trait or mod with its resolved text. Importers may also meet a bare id
/// string here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEntry")]
pub struct DocumentEntry {
    pub id: String,
    pub name: String,
    pub desc: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Id(String),
    Entry {
        #[serde(default)]
        id: String,
        #[serde(default)]
        name: String,
        #[serde(default)]
        desc: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
}

impl From<RawEntry> for DocumentEntry {
    fn from(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Id(id) => Self {
                name: id.clone(),
                id,
                desc: String::new(),
            },
            RawEntry::Entry {
                id,
                name,
                desc,
                description,
            } => Self {
                id,
                name,
                desc: desc.or(description).unwrap_or_default(),
            },
        }
    }
}

impl DocumentEntry {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    #[serde(default, deserialize_with = "lenient::int")]
    pub ac: i32,
    #[serde(default, deserialize_with = "lenient::int")]
    pub hp: i32,
    #[serde(rename = "str", default, deserialize_with = "lenient::int")]
    pub strength: i32,
    #[serde(default, deserialize_with = "lenient::int")]
    pub dex: i32,
    #[serde(default, deserialize_with = "lenient::int")]
    pub con: i32,
    /// After the encumbrance penalty.
    #[serde(default, deserialize_with = "lenient::int")]
    pub agility: i32,
}

/// Primary mode plus `<mode>` / `<mode>_max` pairs for every mode present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMovement {
    #[serde(default)]
    pub mode: String,
    #[serde(default, deserialize_with = "lenient::int")]
    pub standard: i32,
    #[serde(default, deserialize_with = "lenient::int")]
    pub max: i32,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub climb_rate: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<String>,
    #[serde(flatten)]
    pub modes: BTreeMap<String, Value>,
}

pub const MAX_SUFFIX: &str = "_max";

impl DocumentMovement {
    pub fn insert_mode(&mut self, mode: &str, standard: i32, max: i32) {
        self.modes.insert(mode.to_string(), Value::from(standard));
        self.modes.insert(format!("{mode}{MAX_SUFFIX}"), Value::from(max));
    }

    /// `(standard, max)` for a mode; a missing half reads as 0.
    pub fn mode(&self, mode: &str) -> Option<(i32, i32)> {
        let standard = self.modes.get(mode);
        let max = self.modes.get(&format!("{mode}{MAX_SUFFIX}"));
        if standard.is_none() && max.is_none() {
            return None;
        }
        let read = |v: Option<&Value>| v.map(lenient::int_from_value).unwrap_or(0);
        Some((read(standard), read(max)))
    }

    /// Modes with both a `<mode>` and a `<mode>_max` key, in key order.
    pub fn mode_names(&self) -> Vec<&str> {
        self.modes
            .keys()
            .filter(|key| !key.ends_with(MAX_SUFFIX))
            .filter(|key| self.modes.contains_key(&format!("{key}{MAX_SUFFIX}")))
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentEncumbrance {
    #[serde(default, deserialize_with = "lenient::float")]
    pub carried_weight: f64,
    #[serde(default, deserialize_with = "lenient::float")]
    pub capacity: f64,
    #[serde(default)]
    pub state: EncumbranceTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMountedWeapon {
    pub mount_id: String,
    #[serde(default)]
    pub mount_label: String,
    #[serde(default)]
    pub arc: String,
    #[serde(default)]
    pub crew_group: String,
    pub weapon_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub qty: u32,
    #[serde(default = "ranged")]
    pub attack_type: WeaponKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability: Option<AttackAbility>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub attack_bonus: i32,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub reach: Option<String>,
    #[serde(default)]
    pub traits: Vec<DocumentEntry>,
}

impl DocumentMountedWeapon {
    pub fn is_melee(&self) -> bool {
        self.attack_type == WeaponKind::Melee || self.reach.is_some()
    }
}

impl LoadoutDocument {
    /// Configuration to resume editing from. Crew numbers, proficiencies and
    /// weapon picks come back as exported; the next derivation re-checks them.
    pub fn to_configuration(&self) -> LoadoutConfiguration {
        LoadoutConfiguration {
            base_id: self.base_id.clone(),
            saddle_id: self.saddle_id.clone(),
            mod_ids: self.mod_ids.clone(),
            mount_selections: self
                .mounted_weapons
                .iter()
                .map(|mw| (mw.mount_id.clone(), MountSelection::weapon(mw.weapon_id.clone(), mw.qty)))
                .collect(),
            proficiencies: self.proficiencies.clone(),
            crew_stats: self.crew_stats.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sparse_document_fills_defaults() {
        let doc: LoadoutDocument = serde_json::from_value(json!({
            "baseId": "griffon",
            "baseType": "mount",
            "traits": ["keen_sight", {"id": "flyby", "name": "Flyby", "description": "No opportunity attacks."}],
            "movement": {"mode": "fly", "standard": 60, "max": 90, "fly": 60, "fly_max": 90, "acceleration": "1d4"}
        }))
        .unwrap();

        assert_eq!(doc.schema, SCHEMA);
        assert_eq!(doc.base_type, BaseKind::Mount);
        assert_eq!(doc.traits[0].display_name(), "keen_sight");
        assert_eq!(doc.traits[1].desc, "No opportunity attacks.");
        assert_eq!(doc.movement.mode("fly"), Some((60, 90)));
        assert_eq!(doc.movement.acceleration.as_deref(), Some("1d4"));
        assert_eq!(doc.movement.mode_names(), vec!["fly"]);
    }

    #[test]
    fn configuration_is_rebuilt_from_mounted_weapons() {
        let doc: LoadoutDocument = serde_json::from_value(json!({
            "baseId": "griffon",
            "saddleId": "war_saddle",
            "modIds": ["wind_vanes"],
            "mountedWeapons": [
                {"mountId": "left", "weaponId": "light_crossbow", "qty": 2, "attackType": "ranged"}
            ],
            "crewStats": {"gunner": {"dexMod": 3, "profBonus": 2}},
            "proficiencies": {"left": true}
        }))
        .unwrap();

        let config = doc.to_configuration();
        assert_eq!(config.saddle_id.as_deref(), Some("war_saddle"));
        assert_eq!(config.mount_selections["left"], MountSelection::weapon("light_crossbow", 2));
        assert!(config.is_proficient("left"));
        assert_eq!(config.crew("gunner").dex_mod, 3);
    }
}
