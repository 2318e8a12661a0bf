use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::lenient;
use crate::data::size::SlotSize;

/// Reserved selection id meaning "no weapon on this mounting point".
pub const NO_WEAPON_ID: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponKind {
    Melee,
    Ranged,
}

impl WeaponKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Melee => "melee",
            Self::Ranged => "ranged",
        }
    }

    pub const fn attack_label(self) -> &'static str {
        match self {
            Self::Melee => "Melee Weapon Attack",
            Self::Ranged => "Ranged Weapon Attack",
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: SlotSize,
    #[serde(default, deserialize_with = "lenient::float")]
    pub weight: f64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub points: i32,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub damage: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub range: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub reach: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_type: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub traits: Vec<String>,
}

impl Weapon {
    /// Melee when `attackType`/`type` says so or a reach is declared; ranged otherwise.
    pub fn kind(&self) -> WeaponKind {
        let declared_melee = [self.attack_type.as_deref(), self.type_tag.as_deref()]
            .into_iter()
            .flatten()
            .any(|tag| tag.trim().eq_ignore_ascii_case("melee"));
        if declared_melee || self.reach.is_some() {
            WeaponKind::Melee
        } else {
            WeaponKind::Ranged
        }
    }

    pub fn is_melee(&self) -> bool {
        self.kind() == WeaponKind::Melee
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn weapon(value: serde_json::Value) -> Weapon {
        serde_json::from_value(value).expect("weapon fixture should parse")
    }

    #[test]
    fn kind_is_inferred_from_type_or_reach() {
        assert_eq!(
            weapon(json!({"id": "a", "attackType": "melee"})).kind(),
            WeaponKind::Melee
        );
        assert_eq!(
            weapon(json!({"id": "b", "type": "Melee"})).kind(),
            WeaponKind::Melee
        );
        assert_eq!(
            weapon(json!({"id": "c", "reach": "10 ft."})).kind(),
            WeaponKind::Melee
        );
        assert_eq!(
            weapon(json!({"id": "d", "range": 120})).kind(),
            WeaponKind::Ranged
        );
    }

    #[test]
    fn numeric_range_is_kept_as_text() {
        let w = weapon(json!({"id": "d", "range": 120, "weight": "12"}));
        assert_eq!(w.range.as_deref(), Some("120"));
        assert_eq!(w.weight, 12.0);
    }
}
