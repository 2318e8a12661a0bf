use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::data::{BaseKind, Catalog, CreatureSize};
use crate::export::{export_document, parse_document, CharacterSheet, DocumentError, LoadoutDocument};
use crate::loadout::{derive, Derivation, LoadoutConfiguration, LoadoutError};
use crate::statblock;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Loadout(#[from] LoadoutError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseSummary {
    pub id: String,
    pub name: String,
    pub kind: BaseKind,
    pub size: CreatureSize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BasesResponse {
    pub status: &'static str,
    pub bases: Vec<BaseSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeriveResponse {
    pub status: &'static str,
    pub derivation: Derivation,
    pub statblock: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportResponse {
    pub status: &'static str,
    pub document: LoadoutDocument,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    pub status: &'static str,
    pub sheet: CharacterSheet,
    /// Configuration to resume editing from.
    pub configuration: LoadoutConfiguration,
}

pub fn health_payload(catalog: &Catalog) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "status": "ok",
        "service": "mountforge-api",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog": {
            "bases": catalog.bases.len(),
            "saddles": catalog.saddles.len(),
            "weapons": catalog.weapons.len(),
            "mods": catalog.mods.len(),
            "traits": catalog.traits.len(),
        }
    }))
}

pub fn bases_summary(catalog: &Catalog) -> Vec<BaseSummary> {
    catalog
        .bases
        .iter()
        .map(|base| BaseSummary {
            id: base.id.clone(),
            name: base.name.clone(),
            kind: base.kind,
            size: base.size,
        })
        .collect()
}

pub fn bases_payload(catalog: &Catalog) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&BasesResponse {
        status: "ok",
        bases: bases_summary(catalog),
    })
}

pub fn derive_payload(catalog: &Catalog, body: &str) -> Result<String, ApiError> {
    let config: LoadoutConfiguration = serde_json::from_str(body)?;
    let derivation = derive(catalog, &config)?;
    let statblock = statblock::render(&derivation, catalog);
    Ok(serde_json::to_string_pretty(&DeriveResponse {
        status: "ok",
        derivation,
        statblock,
    })?)
}

pub fn export_payload(catalog: &Catalog, body: &str) -> Result<String, ApiError> {
    let config: LoadoutConfiguration = serde_json::from_str(body)?;
    let derivation = derive(catalog, &config)?;
    Ok(serde_json::to_string_pretty(&ExportResponse {
        status: "ok",
        document: export_document(&derivation, catalog),
    })?)
}

/// The body is the document text as pasted, not a JSON envelope.
pub fn import_payload(body: &str) -> Result<String, ApiError> {
    let document = parse_document(body)?;
    Ok(serde_json::to_string_pretty(&ImportResponse {
        status: "ok",
        sheet: CharacterSheet::from_document(&document),
        configuration: document.to_configuration(),
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_body_is_a_parse_error() {
        let err = derive_payload(&Catalog::default(), "{not json").unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
        assert!(err.to_string().starts_with("invalid request body"));
    }

    #[test]
    fn unknown_base_is_a_loadout_error() {
        let err = export_payload(&Catalog::default(), r#"{"baseId": "ghost"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Loadout(LoadoutError::UnknownBase(ref id)) if id == "ghost"));
        assert_eq!(err.to_string(), "unknown base 'ghost'");
    }

    #[test]
    fn import_reconstructs_sheet() {
        let payload = import_payload(r#"{"baseId": "griffon", "baseName": "Griffon", "stats": {"ac": 13}}"#).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["sheet"]["name"], "Griffon");
        assert_eq!(value["sheet"]["armorClass"], 13);
        assert_eq!(value["configuration"]["baseId"], "griffon");
    }
}
