//! Plain-text statblock of a derivation.

use std::fmt::Write as _;

use crate::data::action::signed;
use crate::data::{Action, Catalog};
use crate::loadout::{ability_modifier, Derivation};

pub fn render(derivation: &Derivation, catalog: &Catalog) -> String {
    let base = derivation.base();
    let enc = &derivation.encumbrance;
    let mut out = String::new();

    let name = if base.name.is_empty() { &base.id } else { &base.name };
    let _ = writeln!(out, "{name}");
    let _ = writeln!(out, "{} {}", base.size, base.kind.as_str());
    if let Some(saddle) = &derivation.saddle {
        let _ = writeln!(out, "Saddle: {}", if saddle.name.is_empty() { &saddle.id } else { &saddle.name });
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Armor Class {}", base.base_ac);
    let _ = writeln!(out, "Hit Points {}", base.base_hp);
    let _ = writeln!(out, "Speed {}", speed_line(derivation));
    if let Some(rate) = &base.climb_rate {
        let _ = writeln!(out, "Climb Rate {rate}");
    }
    if let Some(accel) = &base.acceleration {
        let _ = writeln!(out, "Acceleration {accel}");
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "STR {}  DEX {}  CON {}",
        score(base.strength),
        score(base.dex),
        score(base.con)
    );
    let _ = write!(out, "Agility {}", enc.agility);
    if enc.tier.halves_agility() {
        let _ = write!(out, " (halved from {} while {})", base.agility, enc.tier);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Encumbrance {} ({} / {} lb.)",
        enc.tier,
        trim_float(enc.payload),
        trim_float(enc.capacity)
    );
    let _ = writeln!(out, "Points {}", derivation.points);

    for (title, actions) in [
        ("Actions", &base.actions),
        ("Bonus Actions", &base.bonus_actions),
        ("Reactions", &base.reactions),
        ("Legendary Actions", &base.legendary_actions),
    ] {
        write_actions(&mut out, title, actions);
    }

    if !derivation.mounted_weapons.is_empty() {
        let _ = writeln!(out, "\nMounted Weapons");
        for mw in &derivation.mounted_weapons {
            let weapon = &mw.weapon;
            let label = if mw.point_label.is_empty() { &mw.point_id } else { &mw.point_label };
            let _ = write!(
                out,
                "- {label}: {} ×{} ({}, {} {} to hit",
                weapon.name,
                mw.qty,
                mw.attack_type.attack_label(),
                mw.ability,
                signed(mw.attack_bonus)
            );
            if let Some(damage) = &weapon.damage {
                let _ = write!(out, ", {damage}");
            }
            let _ = write!(out, ")");
            if !mw.crew_group.is_empty() {
                let _ = write!(out, " [crew: {}]", mw.crew_group);
            }
            let _ = writeln!(out);
        }
    }

    if !base.traits.is_empty() {
        let _ = writeln!(out, "\nTraits");
        for id in &base.traits {
            let info = catalog.traits.resolve(id);
            if info.desc.is_empty() {
                let _ = writeln!(out, "- {}", info.name);
            } else {
                let _ = writeln!(out, "- {}: {}", info.name, info.desc);
            }
        }
    }

    out
}

fn score(value: i32) -> String {
    format!("{value} ({})", signed(ability_modifier(value)))
}

fn speed_line(derivation: &Derivation) -> String {
    let base = derivation.base();
    let enc = &derivation.encumbrance;
    let parts: Vec<String> = base
        .movement
        .iter()
        .map(|(mode, block)| {
            let max = if *mode == enc.movement_mode { enc.max_speed } else { block.max };
            if max != block.standard {
                format!("{mode} {} ft. (max {max} ft.)", block.standard)
            } else {
                format!("{mode} {} ft.", block.standard)
            }
        })
        .collect();
    if parts.is_empty() {
        "—".to_string()
    } else {
        parts.join(", ")
    }
}

fn write_actions(out: &mut String, title: &str, actions: &[Action]) {
    if actions.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{title}");
    for action in actions {
        let _ = writeln!(out, "- {}. {}", action.name(), action.description());
    }
}

fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
