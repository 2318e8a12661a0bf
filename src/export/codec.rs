//! Build, encode and decode loadout documents.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

use crate::data::Catalog;
use crate::export::document::{
    DocumentEncumbrance, DocumentEntry, DocumentMountedWeapon, DocumentMovement, DocumentStats,
    LoadoutDocument, SCHEMA,
};
use crate::loadout::{
    derive, is_weapon_legal, max_quantity, CrewStats, Derivation, LoadoutConfiguration, LoadoutError, MountedWeapon,
};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("could not find JSON in document text")]
    NoJson,
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported document schema '{0}'")]
    UnsupportedSchema(String),
}

/// Snapshot a derivation as a document. Mounted weapons are checked once more
/// against the current points and allowlists; any that fail are left out.
pub fn export_document(derivation: &Derivation, catalog: &Catalog) -> LoadoutDocument {
    let base = derivation.base();
    let config = &derivation.configuration;
    let enc = &derivation.encumbrance;

    let mut movement = DocumentMovement {
        mode: enc.movement_mode.clone(),
        standard: enc.standard_speed,
        max: enc.max_speed,
        climb_rate: base.climb_rate.clone(),
        acceleration: base.acceleration.clone(),
        ..DocumentMovement::default()
    };
    for (mode, block) in &base.movement {
        let max = if *mode == enc.movement_mode { enc.max_speed } else { block.max };
        movement.insert_mode(mode, block.standard, max);
    }

    let mods = derivation
        .applied_mod_ids
        .iter()
        .filter_map(|id| catalog.modification(id))
        .map(|m| DocumentEntry {
            id: m.id.clone(),
            name: m.name.clone(),
            desc: m.desc.clone(),
        })
        .collect();

    let traits = base
        .traits
        .iter()
        .map(|id| {
            let info = catalog.traits.resolve(id);
            DocumentEntry {
                id: id.clone(),
                name: info.name,
                desc: info.desc,
            }
        })
        .collect();

    let mounted_weapons = derivation
        .mounted_weapons
        .iter()
        .filter(|mw| still_legal(derivation, mw))
        .map(|mw| mounted_entry(mw, catalog))
        .collect();

    LoadoutDocument {
        schema: SCHEMA.to_string(),
        base_id: base.id.clone(),
        base_name: base.name.clone(),
        base_type: base.kind,
        base_size: base.size,
        saddle_id: derivation.saddle.as_ref().map(|s| s.id.clone()),
        saddle_name: derivation.saddle.as_ref().map(|s| s.name.clone()),
        mod_ids: derivation.applied_mod_ids.clone(),
        mods,
        stats: DocumentStats {
            ac: base.base_ac,
            hp: base.base_hp,
            strength: base.strength,
            dex: base.dex,
            con: base.con,
            agility: enc.agility,
        },
        movement,
        encumbrance: DocumentEncumbrance {
            carried_weight: enc.payload,
            capacity: enc.capacity,
            state: enc.tier,
        },
        weapon_allowlist: base.weapon_allowlist.clone(),
        traits,
        actions: base.actions.clone(),
        bonus_actions: base.bonus_actions.clone(),
        reactions: base.reactions.clone(),
        legendary_actions: base.legendary_actions.clone(),
        mounted_weapons,
        points: derivation.points,
        crew_stats: current_crew_stats(derivation),
        proficiencies: config.proficiencies.clone(),
    }
}

/// Stats for the crew groups this loadout has now, plus any group a mounted
/// weapon names. Entries kept from an earlier saddle stay in the session only.
fn current_crew_stats(derivation: &Derivation) -> BTreeMap<String, CrewStats> {
    let config = &derivation.configuration;
    derivation
        .crew_groups
        .iter()
        .map(|group| group.id.as_str())
        .chain(derivation.mounted_weapons.iter().map(|mw| mw.crew_group.as_str()))
        .map(|id| (id.to_string(), config.crew(id)))
        .collect()
}

fn still_legal(derivation: &Derivation, mw: &MountedWeapon) -> bool {
    let legal = derivation
        .slots
        .iter()
        .find(|slot| slot.point.id == mw.point_id)
        .is_some_and(|slot| {
            is_weapon_legal(&slot.point, &mw.weapon, derivation.base())
                && mw.qty >= 1
                && mw.qty <= max_quantity(&slot.point, &mw.weapon)
        });
    if !legal {
        warn!(point_id = %mw.point_id, weapon_id = %mw.weapon.id, "omitting illegal mounted weapon from export");
    }
    legal
}

fn mounted_entry(mw: &MountedWeapon, catalog: &Catalog) -> DocumentMountedWeapon {
    let weapon = &mw.weapon;
    let melee = weapon.is_melee();
    DocumentMountedWeapon {
        mount_id: mw.point_id.clone(),
        mount_label: mw.point_label.clone(),
        arc: mw.arc.clone(),
        crew_group: mw.crew_group.clone(),
        weapon_id: weapon.id.clone(),
        name: weapon.name.clone(),
        qty: mw.qty,
        attack_type: mw.attack_type,
        ability: Some(mw.ability),
        attack_bonus: mw.attack_bonus,
        damage: weapon.damage.clone(),
        range: if melee { None } else { weapon.range.clone() },
        reach: if melee {
            Some(weapon.reach.clone().unwrap_or_else(|| DEFAULT_REACH.to_string()))
        } else {
            None
        },
        traits: weapon
            .traits
            .iter()
            .map(|id| {
                let info = catalog.traits.resolve(id);
                DocumentEntry {
                    id: id.clone(),
                    name: info.name,
                    desc: info.desc,
                }
            })
            .collect(),
    }
}

pub const DEFAULT_REACH: &str = "5 ft";

/// Derive a configuration and export it.
pub fn export_configuration(catalog: &Catalog, config: &LoadoutConfiguration) -> Result<LoadoutDocument, LoadoutError> {
    let derivation = derive(catalog, config)?;
    Ok(export_document(&derivation, catalog))
}

pub fn to_json(document: &LoadoutDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

/// Parse a document from raw JSON or from text that wraps it (a rich-text
/// note with HTML tags and entities, or prose around the JSON).
pub fn parse_document(text: &str) -> Result<LoadoutDocument, DocumentError> {
    let mut text = text.trim().to_string();
    if looks_like_html(&text) {
        text = strip_html(&text);
    }
    let text = decode_entities(&text);
    let json = extract_json(text.trim()).ok_or(DocumentError::NoJson)?;
    let document: LoadoutDocument = serde_json::from_str(json)?;
    if document.schema != SCHEMA {
        return Err(DocumentError::UnsupportedSchema(document.schema));
    }
    Ok(document)
}

fn looks_like_html(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.starts_with('<')
        || lower.contains("<br")
        || ["</p>", "</div>", "</span>", "</pre>", "</code>"]
            .iter()
            .any(|tag| lower.contains(tag))
}

fn strip_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            '\u{a0}' => out.push(' '),
            _ => out.push(c),
        }
    }
    out.replace("&nbsp;", " ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// From the first `{` or `[` to the last `}` or `]`.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let end = text.rfind(['}', ']'])?;
    (end > start).then(|| &text[start..=end])
}
