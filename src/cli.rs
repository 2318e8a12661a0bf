use std::fs;

use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::data::{load_catalog, Catalog};
use crate::export::{export_document, parse_document, to_json, CharacterSheet};
use crate::loadout::{derive, Derivation, LoadoutConfiguration};
use crate::server::{self, api};
use crate::statblock;

const USAGE: &str = "usage: mountforge <bases|derive|export|import|serve>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Bases,
    Derive,
    Export,
    Import,
    Serve,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("bases") => Some(Command::Bases),
        Some("derive") => Some(Command::Derive),
        Some("export") => Some(Command::Export),
        Some("import") => Some(Command::Import),
        Some("serve") => Some(Command::Serve),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = AppConfig::from_env();
    match parse_command(args) {
        Some(Command::Bases) => handle_bases(&config),
        Some(Command::Derive) => handle_derive(&config, args),
        Some(Command::Export) => handle_export(&config, args),
        Some(Command::Import) => handle_import(args),
        Some(Command::Serve) => handle_serve(&config),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_bases(config: &AppConfig) -> i32 {
    let Some(catalog) = open_catalog(config) else {
        return 1;
    };
    print_json(&api::bases_summary(&catalog))
}

fn handle_derive(config: &AppConfig, args: &[String]) -> i32 {
    let Some(path) = args.get(2).filter(|arg| !arg.starts_with("--")) else {
        eprintln!("usage: mountforge derive <config.json> [--json]");
        return 2;
    };
    let as_json = args.iter().any(|arg| arg == "--json");

    let Some(catalog) = open_catalog(config) else {
        return 1;
    };
    let Some(derivation) = derive_file(&catalog, path) else {
        return 1;
    };

    if as_json {
        print_json(&derivation)
    } else {
        print!("{}", statblock::render(&derivation, &catalog));
        0
    }
}

fn handle_export(config: &AppConfig, args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: mountforge export <config.json>");
        return 2;
    };
    let Some(catalog) = open_catalog(config) else {
        return 1;
    };
    let Some(derivation) = derive_file(&catalog, path) else {
        return 1;
    };

    match to_json(&export_document(&derivation, &catalog)) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize document: {err}");
            1
        }
    }
}

fn handle_import(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: mountforge import <document-file>");
        return 2;
    };
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("failed to read '{path}': {err}");
            return 1;
        }
    };
    match parse_document(&text) {
        Ok(document) => print_json(&CharacterSheet::from_document(&document)),
        Err(err) => {
            eprintln!("import failed: {err}");
            1
        }
    }
}

fn handle_serve(config: &AppConfig) -> i32 {
    let Some(catalog) = open_catalog(config) else {
        return 1;
    };
    match server::run_server(&config.bind_addr, &catalog) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn open_catalog(config: &AppConfig) -> Option<Catalog> {
    match load_catalog(&config.data_dir) {
        Ok(catalog) => Some(catalog),
        Err(err) => {
            eprintln!("failed to load catalog: {err}");
            None
        }
    }
}

fn derive_file(catalog: &Catalog, path: &str) -> Option<Derivation> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("failed to read '{path}': {err}");
            return None;
        }
    };
    let loadout: LoadoutConfiguration = match serde_json::from_str(&text) {
        Ok(loadout) => loadout,
        Err(err) => {
            eprintln!("invalid configuration '{path}': {err}");
            return None;
        }
    };
    debug!(base_id = %loadout.base_id, "deriving configuration from {path}");
    match derive(catalog, &loadout) {
        Ok(derivation) => Some(derivation),
        Err(err) => {
            eprintln!("derive failed: {err}");
            None
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command(&args(&["mountforge", "bases"])), Some(Command::Bases));
        assert_eq!(parse_command(&args(&["mountforge", "derive", "x.json"])), Some(Command::Derive));
        assert_eq!(parse_command(&args(&["mountforge", "serve"])), Some(Command::Serve));
        assert_eq!(parse_command(&args(&["mountforge", "simulate"])), None);
        assert_eq!(parse_command(&args(&["mountforge"])), None);
    }

    #[test]
    fn missing_arguments_are_usage_errors() {
        assert_eq!(run_with_args(&args(&["mountforge"])), 2);
        assert_eq!(run_with_args(&args(&["mountforge", "import"])), 2);
        assert_eq!(run_with_args(&args(&["mountforge", "derive", "--json"])), 2);
    }
}
