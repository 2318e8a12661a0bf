//! Which weapons fit a mounting point, and how many.

use crate::data::{Base, Catalog, MountingPoint, Weapon, WeaponKind, NO_WEAPON_ID};
use crate::loadout::config::MountSelection;

/// Ranged weapons subdivide the point (`floor(point / weapon)` units); melee
/// weapons never do and are 1 if they fit at all. A point of unknown size
/// holds nothing and a weapon of unknown size fits nowhere.
pub fn max_quantity(point: &MountingPoint, weapon: &Weapon) -> u32 {
    let point_units = point.size.units().unwrap_or(0);
    let Some(weapon_units) = weapon.size.units() else {
        return 0;
    };
    if point_units == 0 {
        return 0;
    }
    match weapon.kind() {
        WeaponKind::Melee => u32::from(point_units >= weapon_units),
        WeaponKind::Ranged => point_units / weapon_units,
    }
}

/// Point-level allowlist if present (it replaces the base list outright),
/// else the base-level one. `None` means unrestricted.
pub fn effective_allowlist<'a>(point: &'a MountingPoint, base: &'a Base) -> Option<&'a [String]> {
    point
        .weapon_allowlist
        .as_deref()
        .or(base.weapon_allowlist.as_deref())
}

pub fn is_weapon_legal(point: &MountingPoint, weapon: &Weapon, base: &Base) -> bool {
    if weapon.id == NO_WEAPON_ID || max_quantity(point, weapon) == 0 {
        return false;
    }
    if !point.weapon_type.accepts(weapon.kind()) {
        return false;
    }
    effective_allowlist(point, base).map_or(true, |allowed| allowed.iter().any(|id| *id == weapon.id))
}

/// Selectable weapons for the point, in catalog order.
pub fn fitting_weapons<'a>(point: &MountingPoint, base: &Base, catalog: &'a Catalog) -> Vec<&'a Weapon> {
    catalog
        .weapons
        .iter()
        .filter(|weapon| is_weapon_legal(point, weapon, base))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotHealing {
    Unchanged,
    /// Still legal; the stored value needs normalizing (quantity clamp, `none`).
    Adjusted(MountSelection),
    /// No longer legal: reset to empty and not proficient.
    Cleared,
}

/// Check an existing selection against the point as it is now.
pub fn revalidate_selection(
    point: &MountingPoint,
    selection: &MountSelection,
    base: &Base,
    catalog: &Catalog,
) -> SlotHealing {
    let Some(weapon_id) = selection.weapon_id.as_deref() else {
        return if selection.qty == 0 {
            SlotHealing::Unchanged
        } else {
            SlotHealing::Adjusted(MountSelection::empty())
        };
    };
    if weapon_id == NO_WEAPON_ID {
        return SlotHealing::Adjusted(MountSelection::empty());
    }
    let Some(weapon) = catalog.weapon(weapon_id) else {
        return SlotHealing::Cleared;
    };
    if !is_weapon_legal(point, weapon, base) {
        return SlotHealing::Cleared;
    }
    let qty = selection.qty.clamp(1, max_quantity(point, weapon));
    if qty == selection.qty {
        SlotHealing::Unchanged
    } else {
        SlotHealing::Adjusted(MountSelection::weapon(weapon_id, qty))
    }
}
