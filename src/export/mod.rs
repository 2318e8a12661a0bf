pub mod codec;
pub mod document;
pub mod sheet;

pub use codec::{export_configuration, export_document, parse_document, to_json, DocumentError};
pub use document::{
    DocumentEncumbrance, DocumentEntry, DocumentMountedWeapon, DocumentMovement, DocumentStats,
    LoadoutDocument, SCHEMA,
};
pub use sheet::{
    attack_command, escape_braces, non_attack_command, speed_text, AbilityScore, ActionSection,
    AttackRoll, CharacterSheet, SheetAction, SheetTrait,
};
