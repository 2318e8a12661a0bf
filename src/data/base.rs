//! Base records: the mount or vehicle a loadout is built on.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::action::Action;
use crate::data::lenient;
use crate::data::saddle::{CrewGroup, MountingPoint};
use crate::data::size::CreatureSize;

/// Named movement modes with first-class fields in reference data, in
/// primary-mode priority order.
pub const MOVEMENT_PRIORITY: [&str; 5] = ["fly", "ground", "swim", "burrow", "climb"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseKind {
    #[default]
    #[serde(alias = "mount")]
    Mount,
    #[serde(alias = "vehicle")]
    Vehicle,
}

impl BaseKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mount => "Mount",
            Self::Vehicle => "Vehicle",
        }
    }

    pub fn matches(self, raw: &str) -> bool {
        raw.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for BaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Speed of one movement mode in feet: cruising and maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawMovementBlock")]
pub struct MovementBlock {
    pub standard: i32,
    pub max: i32,
}

#[derive(Deserialize)]
struct RawMovementBlock {
    #[serde(default)]
    standard: Value,
    #[serde(default)]
    max: Value,
}

impl From<RawMovementBlock> for MovementBlock {
    fn from(raw: RawMovementBlock) -> Self {
        let standard = lenient::int_from_value(&raw.standard);
        let max = match lenient::number_from_value(&raw.max) {
            Some(_) => lenient::int_from_value(&raw.max),
            None => standard,
        };
        Self { standard, max }
    }
}

impl MovementBlock {
    pub const fn new(standard: i32, max: i32) -> Self {
        Self { standard, max }
    }

    pub fn add(&mut self, other: MovementBlock) {
        self.standard = self.standard.saturating_add(other.standard);
        self.max = self.max.saturating_add(other.max);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Base {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Set from the catalog file the record came from.
    #[serde(skip_deserializing)]
    pub kind: BaseKind,
    #[serde(default)]
    pub size: CreatureSize,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub strength: i32,
    #[serde(default, deserialize_with = "lenient::int")]
    pub dex: i32,
    #[serde(default, deserialize_with = "lenient::int")]
    pub con: i32,
    #[serde(default, deserialize_with = "lenient::int")]
    pub agility: i32,
    #[serde(rename = "baseAC", default, deserialize_with = "lenient::int")]
    pub base_ac: i32,
    #[serde(rename = "baseHP", default, deserialize_with = "lenient::int")]
    pub base_hp: i32,
    #[serde(
        default = "lenient::default_multiplier",
        deserialize_with = "lenient::multiplier"
    )]
    pub carry_multiplier: f64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub points: i32,
    #[serde(default)]
    pub movement: BTreeMap<String, MovementBlock>,
    #[serde(default, skip_serializing)]
    fly: Option<MovementBlock>,
    #[serde(default, skip_serializing)]
    ground: Option<MovementBlock>,
    #[serde(default, skip_serializing)]
    swim: Option<MovementBlock>,
    #[serde(default, skip_serializing)]
    burrow: Option<MovementBlock>,
    #[serde(default, skip_serializing)]
    climb: Option<MovementBlock>,
    #[serde(default, skip_serializing)]
    speed: Option<MovementBlock>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub climb_rate: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub acceleration: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub traits: Vec<String>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub bonus_actions: Vec<Action>,
    #[serde(default)]
    pub reactions: Vec<Action>,
    #[serde(default)]
    pub legendary_actions: Vec<Action>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_strings",
        skip_serializing_if = "Option::is_none"
    )]
    pub weapon_allowlist: Option<Vec<String>>,
    #[serde(default)]
    pub crew_groups: Vec<CrewGroup>,
    #[serde(default)]
    pub mounting_points: Vec<MountingPoint>,
}

impl Base {
    /// Stamp the kind and fold top-level movement blocks into `movement`.
    /// Top-level blocks win over same-named `movement` entries; a legacy
    /// `speed` block stands in for `ground`.
    pub fn normalized(mut self, kind: BaseKind) -> Self {
        self.kind = kind;
        let legacy_ground = self.speed.take();
        let named = [
            ("fly", self.fly.take()),
            ("ground", self.ground.take().or(legacy_ground)),
            ("swim", self.swim.take()),
            ("burrow", self.burrow.take()),
            ("climb", self.climb.take()),
        ];
        for (mode, block) in named {
            if let Some(block) = block {
                self.movement.insert(mode.to_string(), block);
            }
        }
        self
    }

    pub fn is_vehicle(&self) -> bool {
        self.kind == BaseKind::Vehicle
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn has_trait(&self, trait_id: &str) -> bool {
        self.traits.iter().any(|t| t == trait_id)
    }
}
