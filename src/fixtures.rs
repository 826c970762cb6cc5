// src/fixtures.rs
//
// Fixture file loading for tests: raw text, JSON, newline-delimited JSON
// records, and YAML. Resolution fails loudly; a missing fixture is a test
// bug, not a condition to handle.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use eyre::{eyre, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Environment variable overriding the fixture directory.
const FIXTURE_DIR_VAR: &str = "FIXTURE_DIR";

/// Loader rooted at a fixture directory.
pub struct Fixtures {
    dir: PathBuf,
}

impl Fixtures {
    /// Resolve the fixture directory: `FIXTURE_DIR` if set, otherwise
    /// `tests/fixtures` under the consuming crate's manifest directory.
    /// Errors when no existing directory can be found.
    pub fn new() -> Result<Self> {
        let dir = match env::var(FIXTURE_DIR_VAR) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                let manifest = env::var("CARGO_MANIFEST_DIR")
                    .map_err(|_| eyre!("unable to find the test directory: CARGO_MANIFEST_DIR is not set"))?;
                PathBuf::from(manifest).join("tests").join("fixtures")
            }
        };

        if !dir.is_dir() {
            return Err(eyre!("fixture directory {} does not exist", dir.display()));
        }

        debug!("using fixture directory {}", dir.display());
        Ok(Self { dir })
    }

    /// Use an explicit fixture directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute path to a fixture, erroring when it does not exist.
    pub fn path(&self, fixture: &str) -> Result<PathBuf> {
        let path = self.dir.join(fixture);
        if !path.is_file() {
            return Err(eyre!("fixture {} does not exist in {}", fixture, self.dir.display()));
        }
        Ok(path)
    }

    /// Whether `fixture` names an existing file under the fixture directory.
    pub fn is_fixture(&self, fixture: &str) -> bool {
        !fixture.is_empty() && self.dir.join(fixture).is_file()
    }

    /// Contents of a fixture file.
    pub fn raw(&self, fixture: &str) -> Result<String> {
        let path = self.path(fixture)?;
        fs::read_to_string(&path).map_err(|e| eyre!("failed to read fixture {}: {}", path.display(), e))
    }

    /// Fixture contents parsed as JSON.
    pub fn json(&self, fixture: &str) -> Result<Value> {
        serde_json::from_str(&self.raw(fixture)?)
            .map_err(|e| eyre!("failed to parse fixture {} as JSON: {}", fixture, e))
    }

    /// Fixture contents deserialized into a concrete type.
    pub fn json_as<T: DeserializeOwned>(&self, fixture: &str) -> Result<T> {
        serde_json::from_str(&self.raw(fixture)?)
            .map_err(|e| eyre!("failed to parse fixture {} as JSON: {}", fixture, e))
    }

    /// Fixture contents parsed as newline-delimited JSON records. Blank
    /// lines and lines that do not parse to an object or array are skipped.
    pub fn json_lines(&self, fixture: &str) -> Result<Vec<Value>> {
        let data = self.raw(fixture)?;
        let records = data
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str::<Value>(line).ok())
            .filter(|value| value.is_object() || value.is_array())
            .collect();
        Ok(records)
    }

    /// Fixture contents parsed as YAML.
    pub fn yaml(&self, fixture: &str) -> Result<serde_yaml::Value> {
        serde_yaml::from_str(&self.raw(fixture)?)
            .map_err(|e| eyre!("failed to parse fixture {} as YAML: {}", fixture, e))
    }
}

/// Assert two serializable values are structurally equal, ignoring map key
/// order. With non-map values this is a plain equality assertion.
pub fn assert_same_json<E: Serialize, A: Serialize>(expected: &E, actual: &A) {
    let expected = serde_json::to_value(expected)
        .unwrap_or_else(|e| panic!("expected value is not JSON-encodable: {}", e));
    let actual = serde_json::to_value(actual)
        .unwrap_or_else(|e| panic!("actual value is not JSON-encodable: {}", e));

    assert_eq!(
        expected, actual,
        "values differ structurally:\nexpected: {}\nactual:   {}",
        expected, actual,
    );
}
