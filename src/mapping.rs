//! Path mappings and the YAML/JSON sources they are decoded from

use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;

/// One `{path, url}` record of a YAML mapping document
///
/// Missing fields decode to an empty string and are merged like any other value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct YamlEntry {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub url: String,
}

/// Immutable map from an exact request path to its redirect target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMapping {
    paths: HashMap<String, String>,
}

impl PathMapping {
    /// Fold entries in order; a later duplicate path overrides an earlier one
    pub fn from_entries<I, P, U>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, U)>,
        P: Into<String>,
        U: Into<String>,
    {
        let mut paths = HashMap::new();
        for (path, url) in entries {
            paths.insert(path.into(), url.into());
        }
        Self { paths }
    }

    /// Decode a YAML sequence of `{path, url}` records
    pub fn from_yaml(yaml: &[u8]) -> Result<Self> {
        let entries = parse_yaml(yaml)?;
        Ok(Self::from_entries(
            entries.into_iter().map(|entry| (entry.path, entry.url)),
        ))
    }

    /// Decode a JSON object whose keys are paths and values are URLs
    pub fn from_json(json: &[u8]) -> Result<Self> {
        let paths: HashMap<String, String> = serde_json::from_slice(json)?;
        Ok(Self { paths })
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.paths.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.paths.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}

impl From<HashMap<String, String>> for PathMapping {
    fn from(paths: HashMap<String, String>) -> Self {
        Self { paths }
    }
}

impl<P: Into<String>, U: Into<String>> FromIterator<(P, U)> for PathMapping {
    fn from_iter<I: IntoIterator<Item = (P, U)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

/// Decode the ordered YAML records without merging them
pub fn parse_yaml(yaml: &[u8]) -> Result<Vec<YamlEntry>> {
    // An empty document is null, which we read as no entries
    if yaml.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_slice(yaml)?)
}
