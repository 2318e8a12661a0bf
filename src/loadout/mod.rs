pub mod attack;
pub mod compat;
pub mod config;
pub mod encumbrance;
pub mod mounting;
pub mod pipeline;
pub mod session;
pub mod stacking;
pub mod stats;
pub mod weapons;

pub use attack::{ability_modifier, mounted_weapon_attack_bonus, AttackAbility};
pub use compat::{is_mod_allowed, is_no_saddle_only, legal_mods, legal_saddles, saddle_fits};
pub use config::{CrewStats, LoadoutConfiguration, MountSelection};
pub use encumbrance::{derive_encumbrance, Encumbrance, EncumbranceTier};
pub use mounting::{crew_groups, derive_mounting_points, resolve_crew_group};
pub use pipeline::{derive, derive_for_base, Derivation, LoadoutError, MountedWeapon, Slot, WeaponOption};
pub use session::{Edit, LoadoutSession, Rejection};
pub use stacking::BonusStack;
pub use stats::{derive_base, DerivedBase, StatField};
pub use weapons::{effective_allowlist, fitting_weapons, is_weapon_legal, max_quantity};
