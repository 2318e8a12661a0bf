//! One full derivation pass over a configuration.
//!
//! compatibility -> mounting points -> stats -> weapon revalidation ->
//! encumbrance -> attack bonuses. The pass also returns the healed
//! configuration: selections for vanished points are dropped, illegal ones
//! reset, quantities clamped, and every current crew group given stats.
//! Running it again on the healed configuration changes nothing.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::{Base, Catalog, CrewGroup, Mod, MountingPoint, Saddle, Weapon, WeaponKind};
use crate::loadout::attack::{mounted_weapon_attack_bonus, AttackAbility};
use crate::loadout::compat::{is_mod_allowed, legal_mods, legal_saddles, resolve_saddle};
use crate::loadout::config::{LoadoutConfiguration, MountSelection};
use crate::loadout::encumbrance::{derive_encumbrance, Encumbrance};
use crate::loadout::mounting::{crew_groups, derive_mounting_points, resolve_crew_group};
use crate::loadout::stats::{derive_base, DerivedBase};
use crate::loadout::weapons::{fitting_weapons, max_quantity, revalidate_selection, SlotHealing};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadoutError {
    #[error("unknown base '{0}'")]
    UnknownBase(String),
    #[error("unknown saddle '{0}'")]
    UnknownSaddle(String),
    #[error("unknown mod '{0}'")]
    UnknownMod(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponOption {
    pub weapon_id: String,
    pub name: String,
    pub max_qty: u32,
}

/// A mounting point as the editor sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub point: MountingPoint,
    pub crew_group: CrewGroup,
    pub options: Vec<WeaponOption>,
    pub selection: MountSelection,
    pub proficient: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MountedWeapon {
    pub point_id: String,
    pub point_label: String,
    pub arc: String,
    pub crew_group: String,
    pub weapon: Weapon,
    pub qty: u32,
    pub attack_type: WeaponKind,
    pub ability: AttackAbility,
    pub attack_bonus: i32,
    pub proficient: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Derivation {
    pub configuration: LoadoutConfiguration,
    pub saddle: Option<Saddle>,
    pub legal_saddle_ids: Vec<String>,
    pub legal_mod_ids: Vec<String>,
    /// Configured mods that are legal right now, in application order.
    pub applied_mod_ids: Vec<String>,
    pub derived: DerivedBase,
    pub crew_groups: Vec<CrewGroup>,
    pub slots: Vec<Slot>,
    pub encumbrance: Encumbrance,
    pub mounted_weapons: Vec<MountedWeapon>,
    pub points: i32,
}

impl Derivation {
    pub fn base(&self) -> &Base {
        &self.derived.base
    }
}

/// Derive a configuration, rejecting ids the catalog does not know.
pub fn derive(catalog: &Catalog, config: &LoadoutConfiguration) -> Result<Derivation, LoadoutError> {
    let base = catalog
        .base(&config.base_id)
        .ok_or_else(|| LoadoutError::UnknownBase(config.base_id.clone()))?;
    if let Some(saddle_id) = config.saddle_id.as_deref() {
        if catalog.saddle(saddle_id).is_none() && !is_sentinel(saddle_id, base, catalog) {
            return Err(LoadoutError::UnknownSaddle(saddle_id.to_string()));
        }
    }
    if let Some(unknown) = config.mod_ids.iter().find(|id| catalog.modification(id).is_none()) {
        return Err(LoadoutError::UnknownMod(unknown.clone()));
    }
    Ok(derive_for_base(catalog, base, config))
}

fn is_sentinel(saddle_id: &str, base: &Base, catalog: &Catalog) -> bool {
    legal_saddles(base, catalog).iter().any(|s| s.id == saddle_id)
}

/// Derive against a known base. Never fails: unknown or illegal ids degrade
/// to "not selected".
pub fn derive_for_base(catalog: &Catalog, base: &Base, config: &LoadoutConfiguration) -> Derivation {
    let mut healed = config.clone();
    healed.base_id = base.id.clone();

    let legal = legal_saddles(base, catalog);
    let saddle = resolve_saddle(base, config.saddle_id.as_deref(), catalog);
    if saddle.is_none() && config.saddle_id.is_some() {
        debug!(saddle_id = ?config.saddle_id, base_id = %base.id, "dropping saddle not legal for base");
    }
    healed.saddle_id = saddle.as_ref().map(|s| s.id.clone());

    let mods = configured_mods(catalog, &mut healed);
    let derived = derive_base(base, saddle.as_ref(), &mods);
    let points = derive_mounting_points(base, saddle.as_ref(), &mods);
    let groups = crew_groups(base, saddle.as_ref());
    for group in &groups {
        healed.crew_stats.entry(group.id.clone()).or_default();
    }

    heal_selections(&mut healed, &points, &derived.base, catalog);
    let slots = build_slots(&healed, &points, &groups, &derived.base, catalog);
    let encumbrance = derive_encumbrance(&derived.base, saddle.as_ref(), &healed.mount_selections, catalog);
    let mounted_weapons = mounted_weapons(&healed, &slots, &derived.base, catalog);

    let applied: Vec<&Mod> = mods
        .iter()
        .copied()
        .filter(|m| is_mod_allowed(m, base, saddle.as_ref()))
        .collect();
    let weapon_points = mounted_weapons
        .iter()
        .map(|mw| mw.weapon.points.saturating_mul(i32::try_from(mw.qty).unwrap_or(i32::MAX)));
    let points_total = [derived.base.points, saddle.as_ref().map_or(0, |s| s.points)]
        .into_iter()
        .chain(applied.iter().map(|m| m.points))
        .chain(weapon_points)
        .fold(0_i32, i32::saturating_add);

    Derivation {
        legal_saddle_ids: legal.iter().map(|s| s.id.clone()).collect(),
        legal_mod_ids: legal_mods(base, saddle.as_ref(), catalog)
            .iter()
            .map(|m| m.id.clone())
            .collect(),
        applied_mod_ids: applied.iter().map(|m| m.id.clone()).collect(),
        configuration: healed,
        saddle,
        derived,
        crew_groups: groups,
        slots,
        encumbrance,
        mounted_weapons,
        points: points_total,
    }
}

/// Known mods in configuration order, first occurrence only. Illegal mods
/// stay configured; derivation skips them.
fn configured_mods<'a>(catalog: &'a Catalog, healed: &mut LoadoutConfiguration) -> Vec<&'a Mod> {
    let mut mods: Vec<&Mod> = Vec::new();
    for id in &healed.mod_ids {
        match catalog.modification(id) {
            Some(m) if !mods.iter().any(|seen| seen.id == m.id) => mods.push(m),
            Some(_) => debug!(mod_id = %id, "dropping duplicate mod"),
            None => warn!(mod_id = %id, "dropping unknown mod"),
        }
    }
    healed.mod_ids = mods.iter().map(|m| m.id.clone()).collect();
    mods
}

fn heal_selections(healed: &mut LoadoutConfiguration, points: &[MountingPoint], base: &Base, catalog: &Catalog) {
    let present = |id: &str| points.iter().any(|p| p.id == id);
    healed.mount_selections.retain(|id, _| {
        let keep = present(id.as_str());
        if !keep {
            debug!(point_id = %id, "dropping selection for vanished mounting point");
        }
        keep
    });
    healed.proficiencies.retain(|id, _| present(id.as_str()));

    for point in points {
        let Some(selection) = healed.mount_selections.get(&point.id) else {
            continue;
        };
        match revalidate_selection(point, selection, base, catalog) {
            SlotHealing::Unchanged => {}
            SlotHealing::Adjusted(selection) => {
                healed.mount_selections.insert(point.id.clone(), selection);
            }
            SlotHealing::Cleared => {
                debug!(point_id = %point.id, weapon_id = ?selection.weapon_id, "clearing illegal selection");
                healed.mount_selections.insert(point.id.clone(), MountSelection::empty());
                healed.proficiencies.insert(point.id.clone(), false);
            }
        }
    }
}

fn build_slots(
    healed: &LoadoutConfiguration,
    points: &[MountingPoint],
    groups: &[CrewGroup],
    base: &Base,
    catalog: &Catalog,
) -> Vec<Slot> {
    points
        .iter()
        .map(|point| Slot {
            crew_group: resolve_crew_group(point, groups),
            options: fitting_weapons(point, base, catalog)
                .into_iter()
                .map(|weapon| WeaponOption {
                    weapon_id: weapon.id.clone(),
                    name: weapon.name.clone(),
                    max_qty: max_quantity(point, weapon),
                })
                .collect(),
            selection: healed
                .mount_selections
                .get(&point.id)
                .cloned()
                .unwrap_or_default(),
            proficient: healed.is_proficient(&point.id),
            point: point.clone(),
        })
        .collect()
}

fn mounted_weapons(healed: &LoadoutConfiguration, slots: &[Slot], base: &Base, catalog: &Catalog) -> Vec<MountedWeapon> {
    slots
        .iter()
        .filter_map(|slot| {
            let weapon = catalog.weapon(slot.selection.weapon_id.as_deref()?)?;
            let crew = healed.crew(&slot.crew_group.id);
            Some(MountedWeapon {
                point_id: slot.point.id.clone(),
                point_label: slot.point.label.clone(),
                arc: slot.point.arc.clone(),
                crew_group: slot.crew_group.id.clone(),
                weapon: weapon.clone(),
                qty: slot.selection.qty,
                attack_type: weapon.kind(),
                ability: AttackAbility::for_weapon(weapon),
                attack_bonus: mounted_weapon_attack_bonus(weapon, base, crew, slot.proficient),
                proficient: slot.proficient,
            })
        })
        .collect()
}
