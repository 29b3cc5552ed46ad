//! App pack loader
//!
//! Reads a pack (or overlay) from disk, picks the parser from the file
//! extension (`.toml` → TOML, anything else → JSON) and enforces the
//! required-field schema.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::PackError;
use crate::merge::AppPackOverlay;
use crate::pack::AppPack;

/// Read, parse and schema-check an app pack.
pub fn load_app_pack(path: impl AsRef<Path>) -> Result<AppPack, PackError> {
    let path = path.as_ref();
    let pack: AppPack = read_document(path)?;
    pack.check_required()?;
    debug!(
        app = %pack.app.id,
        entities = pack.entities.len(),
        transactions = pack.transactions.len(),
        "loaded app pack"
    );
    Ok(pack)
}

/// Read and parse an overlay. Overlays have no required fields.
pub fn load_overlay(path: impl AsRef<Path>) -> Result<AppPackOverlay, PackError> {
    let path = path.as_ref();
    let overlay: AppPackOverlay = read_document(path)?;
    debug!(path = %path.display(), "loaded overlay");
    Ok(overlay)
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, PackError> {
    let src = std::fs::read_to_string(path).map_err(|source| PackError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if is_toml(path) {
        toml::from_str(&src).map_err(|source| PackError::Toml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(&src).map_err(|source| PackError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::SAMPLE_JSON;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_valid_pack() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "pack.json", SAMPLE_JSON);
        let pack = load_app_pack(&path).unwrap();
        assert_eq!(pack.app.id, "dealer-ops");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_app_pack(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PackError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "pack.json", "{ \"app\": ");
        let err = load_app_pack(&path).unwrap_err();
        assert!(matches!(err, PackError::Json { .. }));
        assert!(err.to_string().contains("pack.json"));
    }

    #[test]
    fn schema_check_runs_after_parse() {
        let dir = TempDir::new().unwrap();
        let json = r#"{ "app": { "id": "x", "smart_code": "HERA.X.Y.Z.W.v1" } }"#;
        let path = write(&dir, "pack.json", json);
        assert!(matches!(load_app_pack(&path), Err(PackError::NoEntities)));
    }

    #[test]
    fn toml_extension_selects_toml_parser() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "pack.TOML", "[app\nid = 1");
        assert!(matches!(load_app_pack(&path), Err(PackError::Toml { .. })));
    }

    #[test]
    fn loads_overlay() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "overlay.json",
            r#"{ "app": { "id": "other", "smart_code": "HERA.X.Y.Z.W.v2" } }"#,
        );
        let overlay = load_overlay(&path).unwrap();
        assert_eq!(overlay.app.unwrap().id, "other");
        assert!(overlay.entities.is_none());
    }
}
