//! Carried weight against carrying capacity, and what it costs.
//!
//! This is the only place encumbrance is computed. The statblock and the
//! export document both read the [`Encumbrance`] stored on a derivation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{Base, Catalog, MovementBlock, Saddle, MOVEMENT_PRIORITY, NO_WEAPON_ID};
use crate::loadout::config::MountSelection;

pub const CARRY_PER_STRENGTH: f64 = 15.0;
pub const HEAVY_SPEED_PENALTY: i32 = 20;
pub const NO_MOVEMENT_MODE: &str = "none";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EncumbranceTier {
    #[default]
    Normal,
    Encumbered,
    #[serde(rename = "Heavily Encumbered")]
    HeavilyEncumbered,
    Overloaded,
}

impl EncumbranceTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Encumbered => "Encumbered",
            Self::HeavilyEncumbered => "Heavily Encumbered",
            Self::Overloaded => "Overloaded",
        }
    }

    pub fn halves_agility(self) -> bool {
        self >= Self::Encumbered
    }

    pub fn slows_movement(self) -> bool {
        self >= Self::HeavilyEncumbered
    }
}

impl fmt::Display for EncumbranceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Encumbrance {
    pub payload: f64,
    pub capacity: f64,
    /// Agility after the tier's penalty.
    pub agility: i32,
    pub movement_mode: String,
    pub standard_speed: i32,
    /// Primary mode max speed after the tier's penalty.
    pub max_speed: i32,
    pub tier: EncumbranceTier,
}

/// `strength × 15 × size multiplier × carry multiplier`.
pub fn capacity(base: &Base) -> f64 {
    f64::from(base.strength) * CARRY_PER_STRENGTH * base.size.capacity_multiplier() * base.carry_multiplier
}

/// Saddle weight plus every selected weapon's weight times its quantity.
pub fn payload(saddle: Option<&Saddle>, selections: &BTreeMap<String, MountSelection>, catalog: &Catalog) -> f64 {
    let saddle_weight = saddle.map_or(0.0, |s| s.weight);
    let weapons: f64 = selections
        .values()
        .filter_map(|selection| {
            let weapon_id = selection.weapon_id.as_deref().filter(|id| *id != NO_WEAPON_ID)?;
            let weapon = catalog.weapon(weapon_id)?;
            Some(weapon.weight * f64::from(selection.qty))
        })
        .sum();
    saddle_weight + weapons
}

pub fn tier_for(payload: f64, capacity: f64) -> EncumbranceTier {
    if payload > 1.5 * capacity {
        EncumbranceTier::Overloaded
    } else if payload > capacity {
        EncumbranceTier::HeavilyEncumbered
    } else if payload > 0.5 * capacity {
        EncumbranceTier::Encumbered
    } else {
        EncumbranceTier::Normal
    }
}

/// First of fly, ground, swim, burrow, climb the base defines.
pub fn primary_movement(base: &Base) -> Option<(&'static str, MovementBlock)> {
    MOVEMENT_PRIORITY
        .iter()
        .find_map(|mode| base.movement.get(*mode).map(|block| (*mode, *block)))
}

pub fn derive_encumbrance(
    base: &Base,
    saddle: Option<&Saddle>,
    selections: &BTreeMap<String, MountSelection>,
    catalog: &Catalog,
) -> Encumbrance {
    let payload = payload(saddle, selections, catalog);
    let capacity = capacity(base);
    let tier = tier_for(payload, capacity);

    let agility = if tier.halves_agility() {
        (f64::from(base.agility) / 2.0).ceil() as i32
    } else {
        base.agility
    };

    let (movement_mode, block) = primary_movement(base).unwrap_or((NO_MOVEMENT_MODE, MovementBlock::default()));
    let max_speed = if tier.slows_movement() {
        block.max.saturating_sub(HEAVY_SPEED_PENALTY).max(0)
    } else {
        block.max
    };

    Encumbrance {
        payload,
        capacity,
        agility,
        movement_mode: movement_mode.to_string(),
        standard_speed: block.standard,
        max_speed,
        tier,
    }
}
