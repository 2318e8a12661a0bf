//! Effective mounting points and crew groups for a base + saddle + mods.

use std::collections::BTreeSet;

use tracing::debug;

use crate::data::{Base, CrewGroup, Mod, MountingPoint, Saddle};
use crate::loadout::compat::is_mod_allowed;

/// Points the vehicle or saddle brings, cloned out of the catalog.
pub fn native_mounting_points(base: &Base, saddle: Option<&Saddle>) -> Vec<MountingPoint> {
    if base.is_vehicle() {
        return base.mounting_points.clone();
    }
    saddle.map(|s| s.mounting_points.clone()).unwrap_or_default()
}

/// Native points in their own order, then points added by legal mods in
/// application order. An added point whose id is taken becomes
/// `<id>_<modId>` (with a numeric suffix if that is taken too).
pub fn derive_mounting_points(base: &Base, saddle: Option<&Saddle>, mods: &[&Mod]) -> Vec<MountingPoint> {
    let mut points = native_mounting_points(base, saddle);
    let mut taken: BTreeSet<String> = points.iter().map(|p| p.id.clone()).collect();

    for modification in mods {
        if !is_mod_allowed(modification, base, saddle) {
            continue;
        }
        for point in &modification.effects.add_mounting_points {
            let mut point = point.clone();
            if taken.contains(&point.id) {
                let renamed = unique_id(&format!("{}_{}", point.id, modification.id), &taken);
                debug!(from = %point.id, to = %renamed, mod_id = %modification.id, "renamed colliding mounting point");
                point.id = renamed;
            }
            taken.insert(point.id.clone());
            points.push(point);
        }
    }
    points
}

fn unique_id(candidate: &str, taken: &BTreeSet<String>) -> String {
    if !taken.contains(candidate) {
        return candidate.to_string();
    }
    (2..)
        .map(|n| format!("{candidate}_{n}"))
        .find(|id| !taken.contains(id))
        .unwrap_or_else(|| candidate.to_string())
}

/// Vehicle groups, else saddle groups, else the synthetic operator.
pub fn crew_groups(base: &Base, saddle: Option<&Saddle>) -> Vec<CrewGroup> {
    if base.is_vehicle() && !base.crew_groups.is_empty() {
        return base.crew_groups.clone();
    }
    if let Some(saddle) = saddle.filter(|s| !s.crew_groups.is_empty()) {
        return saddle.crew_groups.clone();
    }
    vec![CrewGroup::operator()]
}

/// The point's own `crewGroup`, else the first group, else the operator.
/// A named group missing from `groups` keeps its id (label = id).
pub fn resolve_crew_group(point: &MountingPoint, groups: &[CrewGroup]) -> CrewGroup {
    if let Some(id) = point.crew_group.as_deref().filter(|id| !id.is_empty()) {
        return groups
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .unwrap_or_else(|| CrewGroup {
                id: id.to_string(),
                label: id.to_string(),
            });
    }
    groups.first().cloned().unwrap_or_else(CrewGroup::operator)
}
