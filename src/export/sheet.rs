//! Rebuild a character sheet from a document alone, the way a tabletop
//! import tool would. Every action carries its own roll-template command so
//! each can be triggered on its own.

use serde::Serialize;

use crate::data::action::{sentence, signed};
use crate::data::{Action, MOVEMENT_PRIORITY};
use crate::export::codec::DEFAULT_REACH;
use crate::export::document::{DocumentMountedWeapon, DocumentMovement, LoadoutDocument};
use crate::loadout::ability_modifier;

/// Speed listing order after the primary mode.
const SPEED_ORDER: [&str; 5] = ["fly", "swim", "ground", "burrow", "climb"];
const NO_SPEED: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityScore {
    pub ability: &'static str,
    pub score: i32,
    pub modifier: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetTrait {
    pub name: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackRoll {
    pub bonus: i32,
    pub range_text: String,
    pub damage: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionSection {
    Action,
    BonusAction,
    Reaction,
    Legendary,
    Mounted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetAction {
    pub section: ActionSection,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack: Option<AttackRoll>,
    /// Chat command that posts the action.
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheet {
    pub name: String,
    pub base_id: String,
    pub armor_class: i32,
    pub hit_points: i32,
    pub abilities: Vec<AbilityScore>,
    pub speed: String,
    pub traits: Vec<SheetTrait>,
    pub actions: Vec<SheetAction>,
}

impl CharacterSheet {
    pub fn from_document(doc: &LoadoutDocument) -> Self {
        let stats = &doc.stats;
        let abilities = [("STR", stats.strength), ("DEX", stats.dex), ("CON", stats.con)]
            .into_iter()
            .map(|(ability, score)| AbilityScore {
                ability,
                score,
                modifier: ability_modifier(score),
            })
            .collect();

        Self {
            name: doc.base_name.clone(),
            base_id: doc.base_id.clone(),
            armor_class: stats.ac,
            hit_points: stats.hp,
            abilities,
            speed: speed_text(&doc.movement),
            traits: sheet_traits(doc),
            actions: sheet_actions(doc),
        }
    }
}

/// `fly 60 ft. (max 90 ft.); ground 30 ft.`; primary mode first, `speed`
/// reads as `ground`, empty modes and repeats are dropped.
pub fn speed_text(movement: &DocumentMovement) -> String {
    let mut parts: Vec<(String, String)> = Vec::new();
    let mut push = |mode: &str, standard: i32, max: i32| {
        let mode = mode.to_ascii_lowercase();
        if (standard == 0 && max == 0) || parts.iter().any(|(seen, _)| *seen == mode) {
            return;
        }
        let text = if max != 0 && max != standard {
            format!("{mode} {standard} ft. (max {max} ft.)")
        } else {
            format!("{mode} {standard} ft.")
        };
        parts.push((mode, text));
    };

    let primary = match movement.mode.to_ascii_lowercase().as_str() {
        "speed" => "ground".to_string(),
        other => other.to_string(),
    };
    if !primary.is_empty() && primary != "none" {
        push(&primary, movement.standard, movement.max);
    }
    for mode in SPEED_ORDER {
        if let Some((standard, max)) = movement.mode(mode) {
            push(mode, standard, max);
        }
    }
    for mode in movement.mode_names() {
        if MOVEMENT_PRIORITY.contains(&mode) {
            continue;
        }
        if let Some((standard, max)) = movement.mode(mode) {
            push(mode, standard, max);
        }
    }

    if parts.is_empty() {
        NO_SPEED.to_string()
    } else {
        parts.into_iter().map(|(_, text)| text).collect::<Vec<_>>().join("; ")
    }
}

fn sheet_traits(doc: &LoadoutDocument) -> Vec<SheetTrait> {
    let mut traits: Vec<SheetTrait> = doc
        .traits
        .iter()
        .map(|t| SheetTrait {
            name: t.display_name().to_string(),
            desc: if t.desc.is_empty() { t.id.clone() } else { t.desc.clone() },
        })
        .collect();

    let named = |name: &str, desc: String| SheetTrait {
        name: name.to_string(),
        desc,
    };
    if let Some(accel) = doc.movement.acceleration.as_deref() {
        traits.push(named("Acceleration", accel.to_string()));
    }
    if let Some(rate) = doc.movement.climb_rate.as_deref() {
        traits.push(named("Climb Rate", rate.to_string()));
    }
    traits.push(named("Agility", doc.stats.agility.to_string()));

    if !doc.crew_stats.is_empty() {
        let lines: Vec<String> = doc
            .crew_stats
            .iter()
            .map(|(group, crew)| {
                format!(
                    "{group}: DEX {}, PB {}",
                    signed(crew.dex_mod),
                    signed(crew.prof_bonus)
                )
            })
            .collect();
        traits.push(named("Crew", lines.join("\n")));
    }

    if doc.mods.is_empty() {
        for id in &doc.mod_ids {
            traits.push(named(&format!("Mod: {id}"), id.clone()));
        }
    } else {
        for m in &doc.mods {
            let desc = [m.desc.as_str(), m.id.as_str(), m.name.as_str()]
                .into_iter()
                .find(|s| !s.is_empty())
                .unwrap_or_default();
            traits.push(named(&format!("Mod: {}", m.display_name()), desc.to_string()));
        }
    }
    traits
}

fn sheet_actions(doc: &LoadoutDocument) -> Vec<SheetAction> {
    let mut actions: Vec<SheetAction> = doc.actions.iter().map(|a| native_action(ActionSection::Action, a)).collect();

    let accel = doc.movement.acceleration.as_deref().map(str::trim).filter(|a| !a.is_empty());
    let has_accel_action = doc
        .actions
        .iter()
        .any(|a| a.name().eq_ignore_ascii_case("acceleration"));
    if let Some(accel) = accel.filter(|_| !has_accel_action) {
        let description = format!("Acceleration: [[{accel}]]");
        actions.push(SheetAction {
            section: ActionSection::Action,
            command: non_attack_command("Acceleration", &description),
            name: "Acceleration".to_string(),
            description,
            attack: None,
        });
    }

    for (section, list) in [
        (ActionSection::BonusAction, &doc.bonus_actions),
        (ActionSection::Reaction, &doc.reactions),
        (ActionSection::Legendary, &doc.legendary_actions),
    ] {
        actions.extend(list.iter().map(|a| native_action(section, a)));
    }

    actions.extend(doc.mounted_weapons.iter().map(mounted_action));
    actions
}

fn native_action(section: ActionSection, action: &Action) -> SheetAction {
    let name = if action.name().is_empty() { "Action" } else { action.name() };
    let description = action.description();
    let attack = match action {
        Action::Attack(a) => Some(AttackRoll {
            bonus: a.to_hit,
            range_text: match (&a.range, &a.reach) {
                (Some(range), _) => format!("Range {range}"),
                (None, Some(reach)) => format!("Reach {reach}"),
                (None, None) => String::new(),
            },
            damage: a.damage.clone().unwrap_or_default(),
        }),
        _ => None,
    };
    let command = match &attack {
        Some(roll) => attack_command(name, roll, &description),
        None => non_attack_command(name, &description),
    };
    SheetAction {
        section,
        name: name.to_string(),
        description,
        attack,
        command,
    }
}

fn mounted_action(mw: &DocumentMountedWeapon) -> SheetAction {
    let name = format!("Mounted: {}", mw.name);
    let melee = mw.is_melee();
    let label = if melee { "Melee Weapon Attack" } else { "Ranged Weapon Attack" };
    let reach = mw.reach.as_deref().unwrap_or(DEFAULT_REACH);

    let (range_text, range_line) = if melee {
        (format!("Reach {reach}"), format!("{} ", sentence(&format!("Reach: {reach}"))))
    } else {
        match mw.range.as_deref() {
            Some(range) => (format!("Range {range}"), format!("{} ", sentence(&format!("Range: {range}")))),
            None => (String::new(), String::new()),
        }
    };
    let damage = mw.damage.clone().unwrap_or_default();

    let mut description = format!(
        "{} ×{} ({}). {label}: {} to hit. {range_line}Hit: {}",
        mw.name,
        mw.qty,
        mw.arc,
        signed(mw.attack_bonus),
        sentence(if damage.is_empty() { "—" } else { damage.as_str() }),
    );
    if !mw.traits.is_empty() {
        let names: Vec<&str> = mw.traits.iter().map(|t| t.display_name()).collect();
        description.push_str(&format!(" Traits: {}.", names.join(", ")));
    }

    let roll = AttackRoll {
        bonus: mw.attack_bonus,
        range_text,
        damage,
    };
    SheetAction {
        section: ActionSection::Mounted,
        command: attack_command(&name, &roll, &description),
        name,
        description,
        attack: Some(roll),
    }
}

/// Keep user text from closing a roll-template field early.
pub fn escape_braces(text: &str) -> String {
    text.replace("{{", "〔〔").replace("}}", "〕〕")
}

pub fn attack_command(name: &str, roll: &AttackRoll, description: &str) -> String {
    let name = escape_braces(name);
    let mut cmd = format!(
        "&{{template:npcaction}} {{{{name={name}}}}} {{{{rname={name}}}}} {{{{attack=1}}}} {{{{r1=[[1d20+{}]]}}}} {{{{always=1}}}}",
        roll.bonus
    );
    if !roll.range_text.is_empty() {
        cmd.push_str(&format!(" {{{{range={}}}}}", escape_braces(&roll.range_text)));
    }
    if !roll.damage.is_empty() {
        cmd.push_str(&format!(
            " {{{{damage=1}}}} {{{{dmg1flag=1}}}} {{{{dmg1=[[{}]]}}}}",
            escape_braces(&roll.damage)
        ));
    }
    if !description.is_empty() {
        cmd.push_str(&format!(" {{{{description={}}}}}", escape_braces(description)));
    }
    cmd
}

pub fn non_attack_command(name: &str, description: &str) -> String {
    let name = escape_braces(name);
    let mut cmd = format!("&{{template:npcaction}} {{{{name={name}}}}} {{{{rname={name}}}}}");
    if !description.is_empty() {
        cmd.push_str(&format!(" {{{{description={}}}}}", escape_braces(description)));
    }
    cmd
}
