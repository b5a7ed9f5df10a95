//! Test fixture loader for wire payloads and delivery scenarios.
//!
//! `payloads/valid` and `payloads/malformed` hold single wire payloads;
//! `scenarios` holds ordered delivery sequences with their expected end
//! state.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A sequence of deliveries and the store state it should converge to.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub description: String,
    /// Wire payloads in broker delivery order.
    pub deliveries: Vec<serde_json::Value>,
    /// Entity versions once every delivery has been processed.
    pub expected_versions: BTreeMap<String, u64>,
    /// Number of changes the store should have committed.
    pub expected_applied: usize,
}

impl Scenario {
    /// Deliveries re-encoded as raw payload strings.
    pub fn raw_deliveries(&self) -> Vec<String> {
        self.deliveries.iter().map(|v| v.to_string()).collect()
    }
}

/// Root directory of the fixture files.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixture_path(relative_path).exists()
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let content = load_payload(relative_path);
    let path = fixture_path(relative_path);
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as a raw wire payload, without parsing it.
///
/// # Panics
/// Panics if the file doesn't exist.
pub fn load_payload(relative_path: &str) -> String {
    let path = fixture_path(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
        .trim_end()
        .to_string()
}

/// Load a delivery scenario.
pub fn load_scenario(name: &str) -> Scenario {
    load_fixture(&format!("scenarios/{name}.json"))
}

/// List all JSON files in a fixture subdirectory, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixture_path(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "json").then_some(path)
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_directories_exist() {
        for dir in ["payloads/valid", "payloads/malformed", "scenarios"] {
            assert!(fixture_exists(dir), "Missing fixture directory: {dir}");
        }
    }

    #[test]
    fn valid_payloads_are_json_objects() {
        let files = list_fixtures("payloads/valid");
        assert!(!files.is_empty());
        for file in &files {
            let content = std::fs::read_to_string(file).unwrap();
            let value: serde_json::Value = serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse {}: {}", file.display(), e));
            assert!(value.is_object(), "{} is not an object", file.display());
        }
    }

    #[test]
    fn scenarios_load() {
        for file in list_fixtures("scenarios") {
            let content = std::fs::read_to_string(&file).unwrap();
            let scenario: Scenario = serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse {}: {}", file.display(), e));
            assert!(!scenario.deliveries.is_empty());
        }
    }
}
