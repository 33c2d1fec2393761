//! Schema loading and caching.

use super::loader::parse_schema;
use super::types::SchemaVersion;
use super::Version;
use crate::base::constants::{SCHEMA_DIR_ENV, SCHEMA_FILE_NAME};
use crate::error::{Error, Result};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tracing::{debug, trace};

/// Loads schema versions and caches them for the store's lifetime.
///
/// Schemas are the release resources shipped with the simulation engine,
/// read from directories laid out as
/// `<dir>/V<major>-<minor>-<patch>/Energy+.schema.epJSON` and searched in
/// the order they were added. There is no fallback to a nearby version: a
/// version that is not found is an error listing what is available.
///
/// Stores are independent; tests and callers working with different versions
/// can each construct their own. [`SchemaStore::global`] is the one shared
/// instance, offered only as a convenience.
#[derive(Debug, Default)]
pub struct SchemaStore {
    search_dirs: Vec<PathBuf>,
    cache: RwLock<FxHashMap<Version, Arc<SchemaVersion>>>,
}

/// Process-wide default store, built on first access.
static GLOBAL: LazyLock<SchemaStore> = LazyLock::new(|| {
    let mut store = SchemaStore::new();
    if let Some(dir) = std::env::var_os(SCHEMA_DIR_ENV) {
        debug!("adding schema directory from {}: {:?}", SCHEMA_DIR_ENV, dir);
        store.add_dir(PathBuf::from(dir));
    }
    store
});

impl SchemaStore {
    /// A store with no schema directories yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that searches `dir`.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        let mut store = Self::new();
        store.add_dir(dir);
        store
    }

    /// Add a directory to search, after the ones already configured.
    pub fn add_dir(&mut self, dir: impl Into<PathBuf>) {
        self.search_dirs.push(dir.into());
    }

    /// The shared default store.
    ///
    /// This is the only process-wide state in the crate. Its cache fills on
    /// demand and is never invalidated, since schema resources are immutable.
    pub fn global() -> &'static SchemaStore {
        &GLOBAL
    }

    /// Every version this store can load, ascending.
    pub fn available_versions(&self) -> Vec<Version> {
        let mut versions: Vec<Version> = self
            .search_dirs
            .iter()
            .flat_map(|dir| scan_dir(dir))
            .collect();
        versions.sort();
        versions.dedup();
        versions
    }

    /// Whether `version` is already compiled and cached.
    pub fn is_cached(&self, version: Version) -> bool {
        self.cache.read().contains_key(&version)
    }

    /// Load a schema version, compiling it on first use.
    ///
    /// Concurrent first loads of the same version compile it once: the
    /// cache is re-checked under the write lock before any file I/O.
    pub fn load(&self, version: Version) -> Result<Arc<SchemaVersion>> {
        if let Some(schema) = self.cache.read().get(&version) {
            trace!("schema cache hit for {}", version);
            return Ok(Arc::clone(schema));
        }

        let mut cache = self.cache.write();
        if let Some(schema) = cache.get(&version) {
            return Ok(Arc::clone(schema));
        }

        let source = self.read_source(version)?;
        let schema = Arc::new(parse_schema(version, &source)?);
        debug!("loaded schema {} ({} object types)", version, schema.len());
        cache.insert(version, Arc::clone(&schema));
        Ok(schema)
    }

    /// Load the newest available version.
    pub fn latest(&self) -> Result<Arc<SchemaVersion>> {
        let newest = self
            .available_versions()
            .into_iter()
            .max()
            .ok_or_else(|| Error::SchemaNotFound {
                requested: Version::new(0, 0, 0),
                available: Vec::new(),
            })?;
        self.load(newest)
    }

    fn read_source(&self, version: Version) -> Result<String> {
        for dir in &self.search_dirs {
            let path = dir.join(version.dir_name()).join(SCHEMA_FILE_NAME);
            if path.is_file() {
                debug!("reading schema {} from {}", version, path.display());
                return Ok(std::fs::read_to_string(&path)?);
            }
        }
        Err(Error::SchemaNotFound {
            requested: version,
            available: self.available_versions(),
        })
    }
}

/// A store over the schema fixtures shipped with the test suite.
#[cfg(test)]
pub(crate) fn fixture_store() -> SchemaStore {
    SchemaStore::with_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/schemas"))
}

/// Versions present in a schema directory.
fn scan_dir(dir: &Path) -> Vec<Version> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().join(SCHEMA_FILE_NAME).is_file())
        .filter_map(|entry| {
            let name = entry.file_name();
            let name = name.to_str()?;
            if !name.starts_with('V') {
                return None;
            }
            Version::parse(name)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = r#"{
        "epJSON_schema_version": "9.9.0",
        "properties": {
            "Widget": {
                "patternProperties": { ".*": { "properties": { "size": {"type": "number"} } } },
                "name": {"is_required": true},
                "legacy_idd": { "fields": ["name", "size"] }
            }
        }
    }"#;

    fn write_schema(root: &Path, version: Version, json: &str) {
        let dir = root.join(version.dir_name());
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(SCHEMA_FILE_NAME), json).unwrap();
    }

    #[test]
    fn test_fixture_version_loads() {
        let store = fixture_store();
        let schema = store.load(Version::new(24, 1, 0)).unwrap();
        assert_eq!(schema.version(), Version::new(24, 1, 0));
        assert!(schema.object_type("Zone").is_some());
    }

    #[test]
    fn test_empty_store_has_nothing_to_load() {
        let store = SchemaStore::new();
        assert!(store.available_versions().is_empty());
        assert!(matches!(
            store.load(Version::new(24, 1, 0)),
            Err(Error::SchemaNotFound { ref available, .. }) if available.is_empty()
        ));
        assert!(matches!(store.latest(), Err(Error::SchemaNotFound { .. })));
    }

    #[test]
    fn test_missing_version_lists_available() {
        let store = fixture_store();
        let err = store.load(Version::new(8, 9, 0)).unwrap_err();
        match err {
            Error::SchemaNotFound {
                requested,
                available,
            } => {
                assert_eq!(requested, Version::new(8, 9, 0));
                assert_eq!(available, vec![Version::new(24, 1, 0)]);
            }
            other => panic!("expected SchemaNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_no_fallback_to_nearby_version() {
        let store = fixture_store();
        assert!(store.load(Version::new(24, 1, 1)).is_err());
        assert!(store.load(Version::new(24, 2, 0)).is_err());
    }

    #[test]
    fn test_cache_returns_same_instance() {
        let store = fixture_store();
        let a = store.load(Version::new(24, 1, 0)).unwrap();
        assert!(store.is_cached(Version::new(24, 1, 0)));
        let b = store.load(Version::new(24, 1, 0)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_directory_schemas_are_discovered() {
        let tmp = tempfile::tempdir().unwrap();
        write_schema(tmp.path(), Version::new(9, 9, 0), TINY);
        let mut store = SchemaStore::with_dir(tmp.path());
        assert_eq!(store.available_versions(), vec![Version::new(9, 9, 0)]);
        let schema = store.load(Version::new(9, 9, 0)).unwrap();
        assert!(schema.object_type("widget").is_some());

        store.add_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/schemas"));
        assert_eq!(
            store.available_versions(),
            vec![Version::new(9, 9, 0), Version::new(24, 1, 0)]
        );
        assert_eq!(store.latest().unwrap().version(), Version::new(24, 1, 0));
    }

    #[test]
    fn test_earlier_directory_wins() {
        let tmp = tempfile::tempdir().unwrap();
        write_schema(tmp.path(), Version::new(24, 1, 0), TINY);
        let mut store = SchemaStore::with_dir(tmp.path());
        store.add_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/schemas"));
        let schema = store.load(Version::new(24, 1, 0)).unwrap();
        assert!(schema.object_type("Widget").is_some());
        assert!(schema.object_type("Zone").is_none());
    }

    #[test]
    fn test_independent_stores_do_not_share_cache() {
        let a = fixture_store();
        let b = fixture_store();
        a.load(Version::new(24, 1, 0)).unwrap();
        assert!(!b.is_cached(Version::new(24, 1, 0)));
    }

    #[test]
    fn test_concurrent_first_load_compiles_once() {
        let store = Arc::new(fixture_store());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.load(Version::new(24, 1, 0)).unwrap())
            })
            .collect();
        let loaded: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(loaded.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn test_global_store_is_shared() {
        assert!(std::ptr::eq(SchemaStore::global(), SchemaStore::global()));
    }
}
