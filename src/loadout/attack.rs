use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{Base, Weapon, WeaponKind};
use crate::loadout::config::CrewStats;

/// `floor((score - 10) / 2)`.
pub fn ability_modifier(score: i32) -> i32 {
    score.saturating_sub(10).div_euclid(2)
}

/// Ability a mounted weapon attacks with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackAbility {
    #[serde(rename = "STR")]
    Strength,
    #[serde(rename = "DEX")]
    Dexterity,
}

impl AttackAbility {
    /// Melee mounted weapons are the creature's own body; ranged ones are crewed.
    pub fn for_weapon(weapon: &Weapon) -> Self {
        match weapon.kind() {
            WeaponKind::Melee => Self::Strength,
            WeaponKind::Ranged => Self::Dexterity,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
        }
    }
}

impl fmt::Display for AttackAbility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base STR modifier (melee) or crew DEX modifier (ranged), plus the crew's
/// proficiency bonus when the point is proficient. A base without a strength
/// score (0 after lenient parsing) contributes 0, not -5.
pub fn mounted_weapon_attack_bonus(weapon: &Weapon, base: &Base, crew: CrewStats, proficient: bool) -> i32 {
    let ability = match AttackAbility::for_weapon(weapon) {
        AttackAbility::Strength if base.strength <= 0 => 0,
        AttackAbility::Strength => ability_modifier(base.strength),
        AttackAbility::Dexterity => crew.dex_mod,
    };
    let proficiency = if proficient { crew.prof_bonus } else { 0 };
    ability.saturating_add(proficiency)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::data::BaseKind;

    fn base(strength: i32) -> Base {
        serde_json::from_value::<Base>(json!({"id": "b", "strength": strength}))
            .unwrap()
            .normalized(BaseKind::Mount)
    }

    fn weapon(value: serde_json::Value) -> Weapon {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn modifiers_round_down() {
        assert_eq!(ability_modifier(18), 4);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(0), -5);
    }

    #[test]
    fn extreme_scores_saturate() {
        assert_eq!(ability_modifier(i32::MIN), i32::MIN / 2);
        assert_eq!(ability_modifier(i32::MAX), (i32::MAX - 10) / 2);
    }

    #[test]
    fn melee_uses_base_strength_and_ranged_uses_crew_dex() {
        let crew = CrewStats {
            dex_mod: 3,
            prof_bonus: 2,
        };
        let lance = weapon(json!({"id": "lance", "reach": "10 ft."}));
        let xbow = weapon(json!({"id": "xbow"}));

        assert_eq!(mounted_weapon_attack_bonus(&lance, &base(18), crew, false), 4);
        assert_eq!(mounted_weapon_attack_bonus(&lance, &base(18), crew, true), 6);
        assert_eq!(mounted_weapon_attack_bonus(&xbow, &base(18), crew, false), 3);
        assert_eq!(mounted_weapon_attack_bonus(&xbow, &base(18), crew, true), 5);
    }

    #[test]
    fn missing_stats_contribute_zero() {
        let xbow = weapon(json!({"id": "xbow"}));
        let claws = weapon(json!({"id": "claws", "attackType": "melee"}));
        assert_eq!(mounted_weapon_attack_bonus(&xbow, &base(0), CrewStats::default(), true), 0);
        assert_eq!(mounted_weapon_attack_bonus(&claws, &base(0), CrewStats::default(), false), 0);
    }
}
