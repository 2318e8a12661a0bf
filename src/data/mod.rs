pub mod action;
pub mod base;
pub mod catalog;
pub mod lenient;
pub mod loader;
pub mod modification;
pub mod saddle;
pub mod size;
pub mod traits;
pub mod weapon;

pub use action::{Action, AttackAction, SaveAction, SaveOutcome, TextAction};
pub use base::{Base, BaseKind, MovementBlock, MOVEMENT_PRIORITY};
pub use catalog::Catalog;
pub use loader::{load_catalog, CatalogError, DEFAULT_DATA_DIR};
pub use modification::{Mod, ModEffects, ModRequirements};
pub use saddle::{CrewGroup, MountingPoint, Saddle, WeaponType, DEFAULT_CREW_GROUP_ID, NO_SADDLE_ID};
pub use size::{CreatureSize, SlotSize};
pub use traits::{trait_label, TraitGlossary, TraitInfo};
pub use weapon::{Weapon, WeaponKind, NO_WEAPON_ID};
