//! Read-only reference catalog, loaded once per process.

use crate::data::base::Base;
use crate::data::modification::Mod;
use crate::data::saddle::{Saddle, NO_SADDLE_ID};
use crate::data::traits::TraitGlossary;
use crate::data::weapon::Weapon;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Mounts first, then vehicles, each in file order.
    pub bases: Vec<Base>,
    pub saddles: Vec<Saddle>,
    pub weapons: Vec<Weapon>,
    pub mods: Vec<Mod>,
    pub traits: TraitGlossary,
}

impl Catalog {
    pub fn from_parts(
        mounts: Vec<Base>,
        vehicles: Vec<Base>,
        saddles: Vec<Saddle>,
        weapons: Vec<Weapon>,
        mods: Vec<Mod>,
        traits: TraitGlossary,
    ) -> Self {
        let mut bases = mounts;
        bases.extend(vehicles);
        Self {
            bases,
            saddles,
            weapons,
            mods,
            traits,
        }
    }

    pub fn base(&self, id: &str) -> Option<&Base> {
        self.bases.iter().find(|b| b.id == id)
    }

    pub fn saddle(&self, id: &str) -> Option<&Saddle> {
        self.saddles.iter().find(|s| s.id == id)
    }

    /// Catalog entry for the no-saddle sentinel, or the synthetic stand-in.
    pub fn no_saddle(&self) -> Saddle {
        self.saddle(NO_SADDLE_ID).cloned().unwrap_or_else(Saddle::sentinel)
    }

    pub fn weapon(&self, id: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.id == id)
    }

    pub fn modification(&self, id: &str) -> Option<&Mod> {
        self.mods.iter().find(|m| m.id == id)
    }
}
