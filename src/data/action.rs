//! Native actions of a base: attacks, saving-throw effects, and plain text.
//!
//! Reference files describe actions as loose objects keyed by a `kind` string.
//! They are parsed through [`RawAction`] into the [`Action`] union and written
//! back out in the same loose shape, so a document round-trips through the
//! external import tool unchanged.

use serde::{Deserialize, Serialize};

use crate::data::lenient;
use crate::data::weapon::WeaponKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAction", into = "RawAction")]
pub enum Action {
    Attack(AttackAction),
    Save(SaveAction),
    Text(TextAction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackAction {
    pub name: String,
    pub attack_type: WeaponKind,
    pub to_hit: i32,
    pub reach: Option<String>,
    pub range: Option<String>,
    pub target: Option<String>,
    pub damage: Option<String>,
    pub extra: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveAction {
    pub name: String,
    pub ability: Option<String>,
    pub dc: Option<i32>,
    pub range: Option<String>,
    pub area: Option<String>,
    pub on_fail: Option<SaveOutcome>,
    pub on_save: Option<SaveOutcome>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextAction {
    pub name: String,
    pub text: Option<String>,
}

/// Result of a saving throw: either prose or a structured breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SaveOutcome {
    Text(String),
    Detail {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        damage: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        effect: Option<String>,
    },
}

impl SaveOutcome {
    pub fn describe(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()).filter(|t| !t.trim().is_empty()),
            Self::Detail {
                damage,
                condition,
                effect,
            } => {
                let mut parts = Vec::new();
                if let Some(damage) = damage {
                    if damage == "half" {
                        parts.push("half damage".to_string());
                    } else {
                        parts.push(damage.clone());
                    }
                }
                parts.extend(condition.iter().cloned());
                parts.extend(effect.iter().cloned());
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(", "))
                }
            }
        }
    }
}

/// `+3`, `-1`, `+0`.
pub fn signed(value: i32) -> String {
    if value >= 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

/// `text` closed with a period unless it already ends in punctuation.
pub fn sentence(text: &str) -> String {
    let text = text.trim_end();
    if text.ends_with(['.', '!', '?']) {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

impl Action {
    pub fn name(&self) -> &str {
        match self {
            Self::Attack(a) => &a.name,
            Self::Save(s) => &s.name,
            Self::Text(t) => &t.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Attack(_) => "attack",
            Self::Save(_) => "save",
            Self::Text(_) => "text",
        }
    }

    /// One-line rules text for the action, without its name.
    pub fn description(&self) -> String {
        match self {
            Self::Attack(a) => {
                let mut out = format!("{}: {} to hit, ", a.attack_type.attack_label(), signed(a.to_hit));
                if let Some(reach) = &a.reach {
                    out.push_str(&format!("reach {reach}, "));
                }
                if let Some(range) = &a.range {
                    out.push_str(&format!("range {range}, "));
                }
                out.push_str(a.target.as_deref().unwrap_or("one target"));
                out.push_str(". Hit: ");
                out.push_str(&sentence(a.damage.as_deref().unwrap_or("—")));
                for tail in [&a.extra, &a.notes].into_iter().flatten() {
                    out.push(' ');
                    out.push_str(tail);
                }
                out
            }
            Self::Save(s) => {
                let dc = s.dc.map(|dc| dc.to_string()).unwrap_or_else(|| "—".to_string());
                let ability = s.ability.as_deref().unwrap_or("DEX");
                let mut out = format!("Each creature must make a DC {dc} {ability} saving throw.");
                if let Some(area) = &s.area {
                    out.push_str(&format!(" Area: {area}."));
                }
                if let Some(range) = &s.range {
                    out.push_str(&format!(" Range: {range}."));
                }
                if let Some(fail) = s.on_fail.as_ref().and_then(SaveOutcome::describe) {
                    out.push_str(&format!(" Failure: {fail}."));
                }
                if let Some(success) = s.on_save.as_ref().and_then(SaveOutcome::describe) {
                    out.push_str(&format!(" Success: {success}."));
                }
                if let Some(notes) = &s.notes {
                    out.push(' ');
                    out.push_str(notes);
                }
                out
            }
            Self::Text(t) => t.text.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attack_type: Option<String>,
    #[serde(rename = "type", default, skip_serializing)]
    type_tag: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_int", skip_serializing_if = "Option::is_none")]
    to_hit: Option<i32>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    reach: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    damage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extra: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    save: Option<RawSave>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    on_fail: Option<SaveOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    on_save: Option<SaveOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing)]
    desc: Option<String>,
    #[serde(default, skip_serializing)]
    description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawSave {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ability: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_int", skip_serializing_if = "Option::is_none")]
    dc: Option<i32>,
}

impl From<RawAction> for Action {
    fn from(raw: RawAction) -> Self {
        let kind = raw.kind.as_deref().map(|k| k.trim().to_ascii_lowercase());
        match kind.as_deref() {
            Some("attack") => {
                let ranged = [raw.attack_type.as_deref(), raw.type_tag.as_deref()]
                    .into_iter()
                    .flatten()
                    .any(|t| t.trim().eq_ignore_ascii_case("ranged"));
                Self::Attack(AttackAction {
                    name: raw.name,
                    attack_type: if ranged {
                        WeaponKind::Ranged
                    } else {
                        WeaponKind::Melee
                    },
                    to_hit: raw.to_hit.unwrap_or(0),
                    reach: raw.reach,
                    range: raw.range,
                    target: raw.target,
                    damage: raw.damage,
                    extra: raw.extra,
                    notes: raw.notes,
                })
            }
            Some("save") => {
                let save = raw.save.unwrap_or_default();
                Self::Save(SaveAction {
                    name: raw.name,
                    ability: save.ability,
                    dc: save.dc,
                    range: raw.range,
                    area: raw.area,
                    on_fail: raw.on_fail,
                    on_save: raw.on_save,
                    notes: raw.notes,
                })
            }
            _ => Self::Text(TextAction {
                name: raw.name,
                text: raw.text.or(raw.desc).or(raw.description).or(raw.notes),
            }),
        }
    }
}

impl From<Action> for RawAction {
    fn from(action: Action) -> Self {
        match action {
            Action::Attack(a) => RawAction {
                kind: Some("attack".to_string()),
                name: a.name,
                attack_type: Some(a.attack_type.as_str().to_string()),
                to_hit: Some(a.to_hit),
                reach: a.reach,
                range: a.range,
                target: a.target,
                damage: a.damage,
                extra: a.extra,
                notes: a.notes,
                ..RawAction::default()
            },
            Action::Save(s) => RawAction {
                kind: Some("save".to_string()),
                name: s.name,
                range: s.range,
                area: s.area,
                save: Some(RawSave {
                    ability: s.ability,
                    dc: s.dc,
                }),
                on_fail: s.on_fail,
                on_save: s.on_save,
                notes: s.notes,
                ..RawAction::default()
            },
            Action::Text(t) => RawAction {
                kind: Some("text".to_string()),
                name: t.name,
                text: t.text,
                ..RawAction::default()
            },
        }
    }
}
