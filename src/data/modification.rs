//! Mods: optional upgrades layered onto a base.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::base::MovementBlock;
use crate::data::lenient;
use crate::data::saddle::MountingPoint;

const MOVEMENT_BONUS_SUFFIX: &str = "Bonus";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mod {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::int")]
    pub points: i32,
    #[serde(default)]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<ModRequirements>,
    #[serde(default)]
    pub effects: ModEffects,
}

/// AND across categories, OR within one. An empty category is no restriction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModRequirements {
    #[serde(default, deserialize_with = "lenient::strings")]
    pub base_type: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub ids: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModEffects {
    #[serde(default, deserialize_with = "lenient::strings")]
    pub add_traits: Vec<String>,
    #[serde(default)]
    pub add_mounting_points: Vec<MountingPoint>,
    #[serde(default)]
    pub stat_bonuses: BTreeMap<String, Value>,
    #[serde(default)]
    pub set: BTreeMap<String, Value>,
    /// `<mode>Bonus` blocks and anything else the record carries.
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl ModEffects {
    /// Movement bonus blocks keyed by mode (`flyBonus` -> `fly`).
    pub fn movement_bonuses(&self) -> Vec<(String, MovementBlock)> {
        self.other
            .iter()
            .filter_map(|(key, value)| {
                let mode = key.strip_suffix(MOVEMENT_BONUS_SUFFIX)?;
                if mode.is_empty() || !value.is_object() {
                    return None;
                }
                let block = MovementBlock::deserialize(value).ok()?;
                Some((mode.to_string(), block))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn movement_bonus_keys_are_collected_by_mode() {
        let m: Mod = serde_json::from_value(json!({
            "id": "wind_vanes",
            "effects": {
                "flyBonus": {"standard": 10, "max": 20},
                "swimBonus": {"standard": "5"},
                "statBonuses": {"agility": 1},
                "oddBonus": 3
            }
        }))
        .unwrap();
        let bonuses = m.effects.movement_bonuses();
        assert_eq!(
            bonuses,
            vec![
                ("fly".to_string(), MovementBlock::new(10, 20)),
                ("swim".to_string(), MovementBlock::new(5, 5)),
            ]
        );
        assert_eq!(m.effects.stat_bonuses.get("agility"), Some(&json!(1)));
    }

    #[test]
    fn requirements_accept_scalar_categories() {
        let m: Mod = serde_json::from_value(json!({
            "id": "armored_hull",
            "requires": {"baseType": "vehicle"}
        }))
        .unwrap();
        let requires = m.requires.unwrap();
        assert_eq!(requires.base_type, vec!["vehicle"]);
        assert!(requires.ids.is_empty());
    }
}
