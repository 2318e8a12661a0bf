//! Fold applied mods onto a base's stat block.
//!
//! Every legal mod contributes in a fixed sub-order: trait additions, flat
//! stat bonuses, movement bonuses. Those are additive and summed across mods.
//! `set` overrides run last, mod by mod in configuration order, so the last
//! override of a field wins no matter where its mod sits in the list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::data::lenient::{self, number_from_value, sanitize_multiplier};
use crate::data::{Base, CreatureSize, Mod, MovementBlock, Saddle};
use crate::loadout::compat::is_mod_allowed;
use crate::loadout::stacking::BonusStack;

/// Numeric base fields a mod may adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatField {
    Strength,
    Dex,
    Con,
    Agility,
    ArmorClass,
    HitPoints,
    CarryMultiplier,
    Points,
}

impl StatField {
    pub fn parse(key: &str) -> Option<Self> {
        let field = match key.trim().to_ascii_lowercase().as_str() {
            "strength" | "str" => Self::Strength,
            "dex" | "dexterity" => Self::Dex,
            "con" | "constitution" => Self::Con,
            "agility" => Self::Agility,
            "baseac" | "ac" => Self::ArmorClass,
            "basehp" | "hp" => Self::HitPoints,
            "carrymultiplier" => Self::CarryMultiplier,
            "points" => Self::Points,
            _ => return None,
        };
        Some(field)
    }

    fn int_slot(self, base: &mut Base) -> Option<&mut i32> {
        match self {
            Self::Strength => Some(&mut base.strength),
            Self::Dex => Some(&mut base.dex),
            Self::Con => Some(&mut base.con),
            Self::Agility => Some(&mut base.agility),
            Self::ArmorClass => Some(&mut base.base_ac),
            Self::HitPoints => Some(&mut base.base_hp),
            Self::Points => Some(&mut base.points),
            Self::CarryMultiplier => None,
        }
    }

    /// Integer fields take the rounded delta.
    pub fn add(self, base: &mut Base, delta: f64) {
        match self.int_slot(base) {
            Some(slot) => *slot = slot.saturating_add(round_to_i32(delta)),
            None => base.carry_multiplier = sanitize_multiplier(Some(base.carry_multiplier + delta)),
        }
    }

    pub fn set(self, base: &mut Base, value: &Value) {
        match self.int_slot(base) {
            Some(slot) => *slot = lenient::int_from_value(value),
            None => base.carry_multiplier = sanitize_multiplier(number_from_value(value)),
        }
    }
}

fn round_to_i32(value: f64) -> i32 {
    value.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpeedComponent {
    Standard,
    Max,
}

pub type SpeedKey = (String, SpeedComponent);

/// A base after mods. Override keys with no typed home land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedBase {
    #[serde(flatten)]
    pub base: Base,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl DerivedBase {
    pub fn from_base(base: &Base) -> Self {
        Self {
            base: base.clone(),
            extra: BTreeMap::new(),
        }
    }
}

/// Append new trait ids, keeping order and skipping ones already present.
pub fn add_traits(traits: &mut Vec<String>, modification: &Mod) {
    for trait_id in &modification.effects.add_traits {
        if !traits.contains(trait_id) {
            traits.push(trait_id.clone());
        }
    }
}

pub fn stat_bonuses(modification: &Mod) -> BonusStack<StatField> {
    let mut stack = BonusStack::new();
    for (key, value) in &modification.effects.stat_bonuses {
        let Some(field) = StatField::parse(key) else {
            debug!(mod_id = %modification.id, key = %key, "ignoring unknown stat bonus");
            continue;
        };
        stack.add(field, number_from_value(value).unwrap_or(0.0));
    }
    stack
}

pub fn movement_bonuses(modification: &Mod) -> BonusStack<SpeedKey> {
    let mut stack = BonusStack::new();
    for (mode, block) in modification.effects.movement_bonuses() {
        stack.add((mode.clone(), SpeedComponent::Standard), f64::from(block.standard));
        stack.add((mode, SpeedComponent::Max), f64::from(block.max));
    }
    stack
}

pub fn apply_stat_totals(base: &mut Base, totals: &BonusStack<StatField>) {
    for (field, total) in totals.iter() {
        field.add(base, total);
    }
}

/// Modes that did not exist start at `{0, 0}`.
pub fn apply_movement_totals(base: &mut Base, totals: &BonusStack<SpeedKey>) {
    for ((mode, component), total) in totals.iter() {
        let block = base.movement.entry(mode.clone()).or_default();
        let delta = round_to_i32(total);
        match component {
            SpeedComponent::Standard => block.standard = block.standard.saturating_add(delta),
            SpeedComponent::Max => block.max = block.max.saturating_add(delta),
        }
    }
}

pub fn apply_overrides(derived: &mut DerivedBase, modification: &Mod) {
    for (key, value) in &modification.effects.set {
        apply_override(derived, key, value);
    }
}

fn apply_override(derived: &mut DerivedBase, key: &str, value: &Value) {
    if let Some(field) = StatField::parse(key) {
        field.set(&mut derived.base, value);
        return;
    }
    let base = &mut derived.base;
    match key {
        "name" => {
            if let Some(name) = lenient::text_from_value(value) {
                base.name = name;
            }
        }
        "size" => base.size = value.as_str().map(CreatureSize::from_name).unwrap_or_default(),
        "tags" => base.tags = lenient::strings_from_value(value),
        "traits" => base.traits = lenient::strings_from_value(value),
        "weaponAllowlist" => {
            base.weapon_allowlist = match value {
                Value::Null => None,
                other => Some(lenient::strings_from_value(other)),
            }
        }
        "climbRate" => base.climb_rate = lenient::text_from_value(value),
        "acceleration" => base.acceleration = lenient::text_from_value(value),
        mode if is_movement_override(base, mode, value) => {
            if let Ok(block) = MovementBlock::deserialize(value) {
                base.movement.insert(mode.to_string(), block);
            }
        }
        other => {
            debug!(key = %other, "keeping unrecognized override verbatim");
            derived.extra.insert(other.to_string(), value.clone());
        }
    }
}

/// Known modes take any object; a new mode name needs a `standard` or `max`.
fn is_movement_override(base: &Base, key: &str, value: &Value) -> bool {
    let Some(block) = value.as_object() else {
        return false;
    };
    crate::data::MOVEMENT_PRIORITY.contains(&key)
        || base.movement.contains_key(key)
        || block.contains_key("standard")
        || block.contains_key("max")
}

/// Derive the stat block. Works on a copy of `base`; mods that are not legal
/// for this base and saddle are skipped without error.
pub fn derive_base(base: &Base, saddle: Option<&Saddle>, mods: &[&Mod]) -> DerivedBase {
    let mut derived = DerivedBase::from_base(base);
    let mut stats = BonusStack::new();
    let mut speeds = BonusStack::new();

    let legal: Vec<&Mod> = mods
        .iter()
        .copied()
        .filter(|modification| {
            let allowed = is_mod_allowed(modification, base, saddle);
            if !allowed {
                debug!(mod_id = %modification.id, base_id = %base.id, "skipping mod that no longer applies");
            }
            allowed
        })
        .collect();

    for modification in &legal {
        add_traits(&mut derived.base.traits, modification);
        stats.merge_from(&stat_bonuses(modification));
        speeds.merge_from(&movement_bonuses(modification));
    }
    apply_stat_totals(&mut derived.base, &stats);
    apply_movement_totals(&mut derived.base, &speeds);

    for modification in &legal {
        apply_overrides(&mut derived, modification);
    }
    derived
}
