//! mountforge: mount and vehicle loadout derivation.
//!
//! A loadout is a base (mount or vehicle), an optional saddle, applied mods and
//! per-mounting-point weapon selections. [`loadout`] derives the full stat block
//! from the read-only [`data::Catalog`]; [`export`] turns the derived state into
//! a portable document and reconstructs a character sheet from one.

pub mod cli;
pub mod config;
pub mod data;
pub mod export;
pub mod loadout;
pub mod server;
pub mod statblock;
