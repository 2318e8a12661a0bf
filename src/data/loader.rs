//! Load the reference catalog from a data directory.
//!
//! Each table lives in `<dir>/<name>.json`, or `<name>.yaml` / `<name>.yml`
//! when no JSON file exists. A table is either a top-level list or an object
//! holding the list under the table's name (`{"mounts": [...]}`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::data::base::{Base, BaseKind};
use crate::data::catalog::Catalog;
use crate::data::traits::TraitGlossary;

pub const DEFAULT_DATA_DIR: &str = "data";

pub const TABLES: [&str; 6] = ["mounts", "vehicles", "saddles", "weapons", "mods", "traits"];

const EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{table} data not found in {dir}")]
    Missing { table: &'static str, dir: PathBuf },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

pub fn load_catalog(dir: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let dir = dir.as_ref();
    let mounts: Vec<Base> = load_table(dir, "mounts")?;
    let vehicles: Vec<Base> = load_table(dir, "vehicles")?;
    let saddles = load_table(dir, "saddles")?;
    let weapons = load_table(dir, "weapons")?;
    let mods = load_table(dir, "mods")?;
    let traits = TraitGlossary::from_value(&read_table_value(dir, "traits")?);

    let catalog = Catalog::from_parts(
        mounts.into_iter().map(|b| b.normalized(BaseKind::Mount)).collect(),
        vehicles.into_iter().map(|b| b.normalized(BaseKind::Vehicle)).collect(),
        saddles,
        weapons,
        mods,
        traits,
    );
    info!(
        dir = %dir.display(),
        bases = catalog.bases.len(),
        saddles = catalog.saddles.len(),
        weapons = catalog.weapons.len(),
        mods = catalog.mods.len(),
        traits = catalog.traits.len(),
        "reference catalog loaded"
    );
    Ok(catalog)
}

fn load_table<T: DeserializeOwned>(dir: &Path, table: &'static str) -> Result<Vec<T>, CatalogError> {
    let (path, value) = read_table(dir, table)?;
    let list = match value {
        Value::Object(mut map) => map.remove(table).unwrap_or(Value::Array(Vec::new())),
        other => other,
    };
    serde_json::from_value(list).map_err(|err| CatalogError::Parse {
        path,
        message: err.to_string(),
    })
}

fn read_table_value(dir: &Path, table: &'static str) -> Result<Value, CatalogError> {
    read_table(dir, table).map(|(_, value)| value)
}

fn read_table(dir: &Path, table: &'static str) -> Result<(PathBuf, Value), CatalogError> {
    let path = locate(dir, table).ok_or_else(|| CatalogError::Missing {
        table,
        dir: dir.to_path_buf(),
    })?;
    let raw = fs::read_to_string(&path).map_err(|source| CatalogError::Read {
        path: path.clone(),
        source,
    })?;
    let value = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&raw).map_err(|err| err.to_string())
    } else {
        serde_yaml::from_str(&raw).map_err(|err| err.to_string())
    };
    let value = value.map_err(|message| CatalogError::Parse {
        path: path.clone(),
        message,
    })?;
    debug!(path = %path.display(), "read reference table");
    Ok((path, value))
}

fn locate(dir: &Path, table: &str) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{table}.{ext}")))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn unique_temp_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let dir = std::env::temp_dir().join(format!("mountforge-{label}-{nanos}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_minimal(dir: &Path) {
        fs::write(
            dir.join("mounts.json"),
            r#"[{"id":"griffon","name":"Griffon","size":"Large","strength":18,"fly":{"standard":60,"max":90}}]"#,
        )
        .unwrap();
        fs::write(dir.join("vehicles.json"), r#"{"vehicles":[{"id":"skiff","name":"Skiff"}]}"#).unwrap();
        fs::write(dir.join("saddles.json"), "[]").unwrap();
        fs::write(dir.join("weapons.json"), "[]").unwrap();
        fs::write(dir.join("mods.json"), "[]").unwrap();
        fs::write(dir.join("traits.yaml"), "hover:\n  name: Hover\n  desc: Hangs in place.\n").unwrap();
    }

    #[test]
    fn loads_json_and_yaml_tables() {
        let dir = unique_temp_dir("load");
        write_minimal(&dir);

        let catalog = load_catalog(&dir).unwrap();
        assert_eq!(catalog.bases.len(), 2);
        assert_eq!(catalog.base("griffon").unwrap().kind, BaseKind::Mount);
        assert_eq!(catalog.base("skiff").unwrap().kind, BaseKind::Vehicle);
        assert_eq!(catalog.traits.resolve("hover").desc, "Hangs in place.");

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_table_is_an_error() {
        let dir = unique_temp_dir("missing");
        write_minimal(&dir);
        fs::remove_file(dir.join("weapons.json")).unwrap();

        let err = load_catalog(&dir).unwrap_err();
        assert!(matches!(err, CatalogError::Missing { table: "weapons", .. }));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn malformed_table_is_an_error() {
        let dir = unique_temp_dir("malformed");
        write_minimal(&dir);
        fs::write(dir.join("mods.json"), "{not json").unwrap();

        let err = load_catalog(&dir).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));

        let _ = fs::remove_dir_all(dir);
    }
}
