//! Owned editing session over one loadout.
//!
//! Every mutation builds a candidate configuration, checks it, and either
//! commits it (replacing the owned value and re-deriving once) or returns
//! [`Edit::Rejected`] with the session untouched.

use thiserror::Error;
use tracing::debug;

use crate::data::{Catalog, NO_WEAPON_ID};
use crate::export::{export_document, LoadoutDocument};
use crate::loadout::compat::{is_mod_allowed, legal_saddles};
use crate::loadout::config::{CrewStats, LoadoutConfiguration, MountSelection};
use crate::loadout::pipeline::{derive, derive_for_base, Derivation, LoadoutError, Slot};
use crate::loadout::weapons::{is_weapon_legal, max_quantity};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("unknown base '{0}'")]
    UnknownBase(String),
    #[error("saddle '{0}' is not available for this base")]
    IllegalSaddle(String),
    #[error("unknown mod '{0}'")]
    UnknownMod(String),
    #[error("mod '{0}' is already applied")]
    DuplicateMod(String),
    #[error("mod '{0}' is not available for this loadout")]
    IllegalMod(String),
    #[error("mod '{0}' is not applied")]
    ModNotApplied(String),
    #[error("no mounting point '{0}'")]
    UnknownMountingPoint(String),
    #[error("weapon '{weapon_id}' cannot be mounted on '{point_id}'")]
    IllegalWeapon { point_id: String, weapon_id: String },
    #[error("quantity {qty} exceeds the maximum of {max} on '{point_id}'")]
    QuantityOutOfRange { point_id: String, qty: u32, max: u32 },
    #[error("no crew group '{0}'")]
    UnknownCrewGroup(String),
}

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Applied,
    Rejected(Rejection),
}

impl Edit {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[derive(Debug, Clone)]
pub struct LoadoutSession<'a> {
    catalog: &'a Catalog,
    derivation: Derivation,
}

impl<'a> LoadoutSession<'a> {
    /// Start on a base with its first legal saddle selected.
    pub fn new(catalog: &'a Catalog, base_id: &str) -> Result<Self, LoadoutError> {
        let base = catalog
            .base(base_id)
            .ok_or_else(|| LoadoutError::UnknownBase(base_id.to_string()))?;
        let config = fresh_configuration(catalog, base_id);
        Ok(Self {
            catalog,
            derivation: derive_for_base(catalog, base, &config),
        })
    }

    pub fn from_configuration(catalog: &'a Catalog, config: &LoadoutConfiguration) -> Result<Self, LoadoutError> {
        Ok(Self {
            catalog,
            derivation: derive(catalog, config)?,
        })
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn configuration(&self) -> &LoadoutConfiguration {
        &self.derivation.configuration
    }

    pub fn derivation(&self) -> &Derivation {
        &self.derivation
    }

    pub fn into_derivation(self) -> Derivation {
        self.derivation
    }

    /// Switching bases resets everything else.
    pub fn select_base(&mut self, base_id: &str) -> Edit {
        if self.catalog.base(base_id).is_none() {
            return Edit::Rejected(Rejection::UnknownBase(base_id.to_string()));
        }
        self.commit(fresh_configuration(self.catalog, base_id))
    }

    pub fn select_saddle(&mut self, saddle_id: Option<&str>) -> Edit {
        let mut config = self.configuration().clone();
        if let Some(id) = saddle_id {
            if !self.derivation.legal_saddle_ids.iter().any(|legal| legal == id) {
                return Edit::Rejected(Rejection::IllegalSaddle(id.to_string()));
            }
        }
        config.saddle_id = saddle_id.map(str::to_string);
        self.commit(config)
    }

    pub fn add_mod(&mut self, mod_id: &str) -> Edit {
        let Some(modification) = self.catalog.modification(mod_id) else {
            return Edit::Rejected(Rejection::UnknownMod(mod_id.to_string()));
        };
        if self.configuration().has_mod(mod_id) {
            return Edit::Rejected(Rejection::DuplicateMod(mod_id.to_string()));
        }
        let Some(base) = self.catalog.base(&self.configuration().base_id) else {
            return Edit::Rejected(Rejection::UnknownBase(self.configuration().base_id.clone()));
        };
        if !is_mod_allowed(modification, base, self.derivation.saddle.as_ref()) {
            return Edit::Rejected(Rejection::IllegalMod(mod_id.to_string()));
        }
        let mut config = self.configuration().clone();
        config.mod_ids.push(mod_id.to_string());
        self.commit(config)
    }

    pub fn remove_mod(&mut self, mod_id: &str) -> Edit {
        if !self.configuration().has_mod(mod_id) {
            return Edit::Rejected(Rejection::ModNotApplied(mod_id.to_string()));
        }
        let mut config = self.configuration().clone();
        config.mod_ids.retain(|id| id != mod_id);
        self.commit(config)
    }

    /// Select a weapon for a point (`None` or `"none"` empties it). A new
    /// weapon starts at quantity 1; re-selecting keeps the clamped quantity.
    pub fn set_mount_weapon(&mut self, point_id: &str, weapon_id: Option<&str>) -> Edit {
        let slot = match self.slot(point_id) {
            Ok(slot) => slot,
            Err(rejection) => return Edit::Rejected(rejection),
        };
        let mut config = self.configuration().clone();
        let weapon_id = weapon_id.filter(|id| *id != NO_WEAPON_ID);
        let Some(weapon_id) = weapon_id else {
            config
                .mount_selections
                .insert(point_id.to_string(), MountSelection::empty());
            return self.commit(config);
        };

        let weapon = self
            .catalog
            .weapon(weapon_id)
            .filter(|weapon| is_weapon_legal(&slot.point, weapon, self.derivation.base()));
        let Some(weapon) = weapon else {
            return Edit::Rejected(Rejection::IllegalWeapon {
                point_id: point_id.to_string(),
                weapon_id: weapon_id.to_string(),
            });
        };
        let max = max_quantity(&slot.point, weapon);
        let qty = if slot.selection.weapon_id.as_deref() == Some(weapon_id) {
            slot.selection.qty.clamp(1, max)
        } else {
            1
        };
        config
            .mount_selections
            .insert(point_id.to_string(), MountSelection::weapon(weapon_id, qty));
        self.commit(config)
    }

    /// Quantity 0 empties the slot. More than the point holds is rejected.
    pub fn set_mount_quantity(&mut self, point_id: &str, qty: u32) -> Edit {
        let slot = match self.slot(point_id) {
            Ok(slot) => slot,
            Err(rejection) => return Edit::Rejected(rejection),
        };
        let mut config = self.configuration().clone();
        if qty == 0 {
            config
                .mount_selections
                .insert(point_id.to_string(), MountSelection::empty());
            return self.commit(config);
        }
        let max = slot
            .selection
            .weapon_id
            .as_deref()
            .and_then(|id| self.catalog.weapon(id))
            .map_or(0, |weapon| max_quantity(&slot.point, weapon));
        if qty > max {
            return Edit::Rejected(Rejection::QuantityOutOfRange {
                point_id: point_id.to_string(),
                qty,
                max,
            });
        }
        config.mount_selections.insert(
            point_id.to_string(),
            MountSelection {
                weapon_id: slot.selection.weapon_id,
                qty,
            },
        );
        self.commit(config)
    }

    pub fn set_proficiency(&mut self, point_id: &str, proficient: bool) -> Edit {
        if let Err(rejection) = self.slot(point_id) {
            return Edit::Rejected(rejection);
        }
        let mut config = self.configuration().clone();
        config.proficiencies.insert(point_id.to_string(), proficient);
        self.commit(config)
    }

    pub fn set_crew_dex(&mut self, group_id: &str, dex_mod: i32) -> Edit {
        self.update_crew(group_id, |stats| stats.dex_mod = dex_mod)
    }

    pub fn set_crew_prof_bonus(&mut self, group_id: &str, prof_bonus: i32) -> Edit {
        self.update_crew(group_id, |stats| stats.prof_bonus = prof_bonus)
    }

    pub fn export(&self) -> LoadoutDocument {
        export_document(&self.derivation, self.catalog)
    }

    fn update_crew(&mut self, group_id: &str, update: impl FnOnce(&mut CrewStats)) -> Edit {
        if !self.derivation.crew_groups.iter().any(|g| g.id == group_id) {
            return Edit::Rejected(Rejection::UnknownCrewGroup(group_id.to_string()));
        }
        let mut config = self.configuration().clone();
        update(config.crew_stats.entry(group_id.to_string()).or_default());
        self.commit(config)
    }

    fn slot(&self, point_id: &str) -> Result<Slot, Rejection> {
        self.derivation
            .slots
            .iter()
            .find(|slot| slot.point.id == point_id)
            .cloned()
            .ok_or_else(|| Rejection::UnknownMountingPoint(point_id.to_string()))
    }

    fn commit(&mut self, config: LoadoutConfiguration) -> Edit {
        let Some(base) = self.catalog.base(&config.base_id) else {
            return Edit::Rejected(Rejection::UnknownBase(config.base_id));
        };
        self.derivation = derive_for_base(self.catalog, base, &config);
        debug!(base_id = %config.base_id, points = self.derivation.points, "loadout re-derived");
        Edit::Applied
    }
}

fn fresh_configuration(catalog: &Catalog, base_id: &str) -> LoadoutConfiguration {
    let mut config = LoadoutConfiguration::for_base(base_id);
    if let Some(base) = catalog.base(base_id) {
        config.saddle_id = legal_saddles(base, catalog).first().map(|s| s.id.clone());
    }
    config
}
