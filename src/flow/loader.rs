// SPDX-License-Identifier: MIT

//! Document loader - JSON and YAML file loading and parsing

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::flow::document::Document;
use crate::flow::state::Values;
use crate::kit::error::Result;

/// Loads documents (and scripted answers) from JSON or YAML files
pub struct DocumentLoader;

impl DocumentLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a document from a `.json`, `.yaml` or `.yml` file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        read(path.as_ref())
    }

    /// Load a list of per-page answer maps, as fed to `next()` in order
    pub fn load_answers<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Values>> {
        read(path.as_ref())
    }

    /// Parse a document from a JSON string
    pub fn parse_json(content: &str) -> Result<Document> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a document from a YAML string
    pub fn parse_yaml(content: &str) -> Result<Document> {
        Ok(serde_yaml::from_str(content)?)
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn read<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(serde_yaml::from_str(&content)?)
    }
}
