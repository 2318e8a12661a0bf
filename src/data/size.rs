use std::fmt;

use serde::{Deserialize, Serialize};

/// Creature size of a base. Drives carrying capacity and saddle fit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum CreatureSize {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
    Gargantuan,
    #[default]
    #[serde(other)]
    Unknown,
}

impl CreatureSize {
    pub const fn capacity_multiplier(self) -> f64 {
        match self {
            Self::Tiny => 0.5,
            Self::Small | Self::Medium => 1.0,
            Self::Large => 2.0,
            Self::Huge => 4.0,
            Self::Gargantuan => 8.0,
            Self::Unknown => 1.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "tiny" => Self::Tiny,
            "small" => Self::Small,
            "medium" => Self::Medium,
            "large" => Self::Large,
            "huge" => Self::Huge,
            "gargantuan" => Self::Gargantuan,
            _ => Self::Unknown,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tiny => "Tiny",
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
            Self::Huge => "Huge",
            Self::Gargantuan => "Gargantuan",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CreatureSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size class of a mounting point or a weapon, measured in capacity units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SlotSize {
    XS,
    S,
    M,
    L,
    XL,
    #[default]
    #[serde(other)]
    Unknown,
}

impl SlotSize {
    /// XS=1, S=2, M=4, L=8, XL=16. Unknown sizes have no units.
    pub const fn units(self) -> Option<u32> {
        match self {
            Self::XS => Some(1),
            Self::S => Some(2),
            Self::M => Some(4),
            Self::L => Some(8),
            Self::XL => Some(16),
            Self::Unknown => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::XS => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
            Self::Unknown => "?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sizes_deserialize_to_fallback() {
        let size: CreatureSize = serde_json::from_str("\"Colossal\"").unwrap();
        assert_eq!(size, CreatureSize::Unknown);
        assert_eq!(size.capacity_multiplier(), 1.0);

        let slot: SlotSize = serde_json::from_str("\"XXL\"").unwrap();
        assert_eq!(slot.units(), None);
    }

    #[test]
    fn slot_units_double_per_step() {
        let units: Vec<u32> = [SlotSize::XS, SlotSize::S, SlotSize::M, SlotSize::L, SlotSize::XL]
            .iter()
            .filter_map(|s| s.units())
            .collect();
        assert_eq!(units, vec![1, 2, 4, 8, 16]);
    }
}
