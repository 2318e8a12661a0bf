//! Which saddles and mods a base may use.
//!
//! Nothing here is cached. Mod legality depends on the active saddle, so it is
//! re-evaluated on every derivation pass.

use crate::data::{Base, Catalog, Mod, Saddle, NO_SADDLE_ID};

const NO_SADDLE_TAG: &str = "tentacle";

/// Mounts that can only ride bare (tag `tentacle` or trait `no_saddle`).
pub fn is_no_saddle_only(base: &Base) -> bool {
    base.has_tag(NO_SADDLE_TAG) || base.has_trait(NO_SADDLE_ID)
}

/// Size must match; then, if the saddle restricts ids or tags, one must match.
pub fn saddle_fits(saddle: &Saddle, base: &Base) -> bool {
    if !saddle.allowed_sizes.contains(&base.size) {
        return false;
    }
    let restricted = !saddle.allowed_mount_ids.is_empty() || !saddle.allowed_mount_tags.is_empty();
    !restricted
        || saddle.allowed_mount_ids.iter().any(|id| *id == base.id)
        || saddle.allowed_mount_tags.iter().any(|tag| base.has_tag(tag))
}

/// Legal saddles in catalog order. Empty for vehicles, and for mounts nothing
/// fits; callers treat that as a valid state.
pub fn legal_saddles(base: &Base, catalog: &Catalog) -> Vec<Saddle> {
    if base.is_vehicle() {
        return Vec::new();
    }
    if is_no_saddle_only(base) {
        return vec![catalog.no_saddle()];
    }
    catalog
        .saddles
        .iter()
        .filter(|saddle| saddle.id != NO_SADDLE_ID && saddle_fits(saddle, base))
        .cloned()
        .collect()
}

/// The saddle a configuration may actually use: the requested one if it is
/// legal for the base, otherwise none.
pub fn resolve_saddle(base: &Base, saddle_id: Option<&str>, catalog: &Catalog) -> Option<Saddle> {
    let saddle_id = saddle_id?;
    legal_saddles(base, catalog)
        .into_iter()
        .find(|saddle| saddle.id == saddle_id)
}

pub fn is_mod_allowed(modification: &Mod, base: &Base, saddle: Option<&Saddle>) -> bool {
    let Some(requires) = &modification.requires else {
        return true;
    };
    let type_ok = requires.base_type.is_empty()
        || requires.base_type.iter().any(|kind| base.kind.matches(kind));
    let id_ok = requires.ids.is_empty()
        || requires
            .ids
            .iter()
            .any(|id| *id == base.id || saddle.is_some_and(|s| s.id == *id));
    let tag_ok = requires.tags.is_empty() || requires.tags.iter().any(|tag| base.has_tag(tag));
    type_ok && id_ok && tag_ok
}

pub fn legal_mods<'a>(base: &Base, saddle: Option<&Saddle>, catalog: &'a Catalog) -> Vec<&'a Mod> {
    catalog
        .mods
        .iter()
        .filter(|modification| is_mod_allowed(modification, base, saddle))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::data::{BaseKind, TraitGlossary};

    fn base(value: serde_json::Value, kind: BaseKind) -> Base {
        serde_json::from_value::<Base>(value).unwrap().normalized(kind)
    }

    fn saddle(value: serde_json::Value) -> Saddle {
        serde_json::from_value(value).unwrap()
    }

    fn catalog(saddles: Vec<Saddle>, mods: Vec<Mod>) -> Catalog {
        Catalog::from_parts(Vec::new(), Vec::new(), saddles, Vec::new(), mods, TraitGlossary::default())
    }

    #[test]
    fn saddles_need_size_and_any_restriction_match() {
        let griffon = base(
            json!({"id": "griffon", "size": "Large", "tags": ["griffon"]}),
            BaseKind::Mount,
        );
        let generic = saddle(json!({"id": "riding", "allowedSizes": ["Large", "Huge"]}));
        let by_tag = saddle(json!({"id": "war", "allowedSizes": ["Large"], "allowedMountTags": ["griffon"]}));
        let by_id = saddle(json!({"id": "howdah", "allowedSizes": ["Large"], "allowedMountIds": ["wyvern"]}));
        let too_small = saddle(json!({"id": "pony", "allowedSizes": ["Medium"]}));

        let legal = legal_saddles(&griffon, &catalog(vec![generic, by_tag, by_id, too_small], Vec::new()));
        let ids: Vec<_> = legal.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["riding", "war"]);
    }

    #[test]
    fn tentacled_mounts_only_get_the_sentinel() {
        let kraken = base(
            json!({"id": "kraken", "size": "Large", "tags": ["tentacle"]}),
            BaseKind::Mount,
        );
        let generic = saddle(json!({"id": "riding", "allowedSizes": ["Large"]}));
        let legal = legal_saddles(&kraken, &catalog(vec![generic], Vec::new()));
        assert_eq!(legal.len(), 1);
        assert_eq!(legal[0].id, NO_SADDLE_ID);
        assert!(legal[0].mounting_points.is_empty());
    }

    #[test]
    fn vehicles_take_no_saddle() {
        let skiff = base(json!({"id": "skiff", "size": "Huge"}), BaseKind::Vehicle);
        let generic = saddle(json!({"id": "riding", "allowedSizes": ["Huge"]}));
        assert!(legal_saddles(&skiff, &catalog(vec![generic], Vec::new())).is_empty());
    }

    #[test]
    fn mod_requirements_and_across_categories() {
        let griffon = base(
            json!({"id": "griffon", "size": "Large", "tags": ["flying"]}),
            BaseKind::Mount,
        );
        let war = saddle(json!({"id": "war_saddle", "allowedSizes": ["Large"]}));
        let m: Mod = serde_json::from_value(json!({
            "id": "turret",
            "requires": {"baseType": ["MOUNT"], "ids": ["war_saddle"], "tags": ["flying", "swimming"]}
        }))
        .unwrap();

        assert!(is_mod_allowed(&m, &griffon, Some(&war)));
        assert!(!is_mod_allowed(&m, &griffon, None));

        let vehicle_only: Mod = serde_json::from_value(json!({
            "id": "hull",
            "requires": {"baseType": "vehicle"}
        }))
        .unwrap();
        assert!(!is_mod_allowed(&vehicle_only, &griffon, Some(&war)));

        let open: Mod = serde_json::from_value(json!({"id": "paint"})).unwrap();
        assert!(is_mod_allowed(&open, &griffon, None));
    }
}
