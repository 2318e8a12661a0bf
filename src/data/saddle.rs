use serde::{Deserialize, Serialize};

use crate::data::lenient;
use crate::data::size::{CreatureSize, SlotSize};
use crate::data::weapon::WeaponKind;

/// Reserved id of the only saddle a no-saddle-only mount may use.
pub const NO_SADDLE_ID: &str = "no_saddle";

pub const DEFAULT_CREW_GROUP_ID: &str = "operator";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewGroup {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

impl CrewGroup {
    /// Synthetic group used when neither vehicle nor saddle declares crew.
    pub fn operator() -> Self {
        Self {
            id: DEFAULT_CREW_GROUP_ID.to_string(),
            label: "Operator".to_string(),
        }
    }
}

/// Weapon kinds a mounting point accepts. Unrecognized values read as ranged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum WeaponType {
    #[default]
    Ranged,
    Melee,
    Both,
}

impl From<String> for WeaponType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "melee" => Self::Melee,
            "both" => Self::Both,
            _ => Self::Ranged,
        }
    }
}

impl WeaponType {
    pub fn accepts(self, kind: WeaponKind) -> bool {
        match self {
            Self::Both => true,
            Self::Melee => kind == WeaponKind::Melee,
            Self::Ranged => kind == WeaponKind::Ranged,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountingPoint {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub arc: String,
    #[serde(default)]
    pub size: SlotSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew_group: Option<String>,
    #[serde(default)]
    pub weapon_type: WeaponType,
    /// Replaces (never narrows) the base-level allowlist for this point.
    #[serde(
        default,
        deserialize_with = "lenient::opt_strings",
        skip_serializing_if = "Option::is_none"
    )]
    pub weapon_allowlist: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Saddle {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::float")]
    pub weight: f64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub points: i32,
    #[serde(default)]
    pub allowed_sizes: Vec<CreatureSize>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub allowed_mount_ids: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub allowed_mount_tags: Vec<String>,
    #[serde(default)]
    pub mounting_points: Vec<MountingPoint>,
    #[serde(default)]
    pub crew_groups: Vec<CrewGroup>,
}

impl Saddle {
    /// Stand-in for the reserved saddle when the catalog does not define one.
    pub fn sentinel() -> Self {
        Self {
            id: NO_SADDLE_ID.to_string(),
            name: "No Saddle".to_string(),
            weight: 0.0,
            points: 0,
            allowed_sizes: Vec::new(),
            allowed_mount_ids: Vec::new(),
            allowed_mount_tags: Vec::new(),
            mounting_points: Vec::new(),
            crew_groups: Vec::new(),
        }
    }
}
