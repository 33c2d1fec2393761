//! Shared fixtures and assertions for the integration tests.

#![allow(dead_code)]

pub mod model_assertions;

use epmodel::{Document, LoadOptions, SchemaStore};
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One schema store for the whole test binary, so each version is parsed once.
pub static STORE: Lazy<SchemaStore> = Lazy::new(|| SchemaStore::with_dir(schemas_dir()));

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Schema resources, laid out the way `SchemaStore` expects.
pub fn schemas_dir() -> PathBuf {
    fixtures_dir().join("schemas")
}

pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Fixture files with the given extension (any case), sorted by path.
pub fn fixtures_with_extension(extension: &str) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(fixtures_dir())
        .into_iter()
        .filter_entry(|entry| entry.path() != schemas_dir())
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .collect();
    paths.sort();
    paths
}

/// Every model fixture, text and structured.
pub fn all_fixtures() -> Vec<PathBuf> {
    let mut paths = fixtures_with_extension("idf");
    paths.extend(fixtures_with_extension("epJSON"));
    paths
}

pub fn load_fixture(name: &str) -> Document {
    Document::from_path(fixture(name), &STORE, &LoadOptions::default()).unwrap()
}

pub fn load_text(text: &str) -> Document {
    Document::load_text(text, &STORE, &LoadOptions::default()).unwrap()
}
