//! Run - a single recorded experiment execution

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Config keys starting with this character are internal to the tracking
/// service and never flattened into run tables.
pub const RESERVED_PREFIX: char = '_';

/// Key that marks a summary value as a file-backed media reference.
const MEDIA_TYPE_KEY: &str = "_type";

/// Summary outputs of a run (accuracy, loss, ...).
///
/// Besides scalars, a summary may hold references to large file-backed
/// values (images, tables, histograms). Those are stored by the tracking
/// service as JSON objects tagged with `"_type"` and are left out of
/// [`RunSummary::json_dict`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RunSummary {
    values: Map<String, Value>,
}

impl RunSummary {
    /// Create a summary from a key/value mapping.
    #[must_use]
    pub const fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Get a summary value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Number of summary entries, media references included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the summary has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Summary entries without file-backed media references.
    #[must_use]
    pub fn json_dict(&self) -> Map<String, Value> {
        self.values
            .iter()
            .filter(|(_, value)| !is_media_reference(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

fn is_media_reference(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.contains_key(MEDIA_TYPE_KEY))
}

/// Run represents one execution recorded by the tracking service.
///
/// Runs are read-only inputs to the exporter: a name, the config the
/// run was launched with, and the summary it reported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Run {
    name: String,
    #[serde(default)]
    config: Map<String, Value>,
    #[serde(default)]
    summary: Option<RunSummary>,
}

impl Run {
    /// Create a run with empty config and summary.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: Map::new(),
            summary: Some(RunSummary::default()),
        }
    }

    /// Create a builder for constructing a run with config and summary values.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> RunBuilder {
        RunBuilder::new(name)
    }

    /// Get the run name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the full config, reserved keys included.
    #[must_use]
    pub const fn config(&self) -> &Map<String, Value> {
        &self.config
    }

    /// Config entries whose keys do not start with [`RESERVED_PREFIX`].
    #[must_use]
    pub fn public_config(&self) -> Map<String, Value> {
        self.config
            .iter()
            .filter(|(key, _)| !key.starts_with(RESERVED_PREFIX))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Get the run summary.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingAttribute` if the run carries no summary.
    pub fn summary(&self) -> Result<&RunSummary> {
        self.summary
            .as_ref()
            .ok_or_else(|| Error::MissingAttribute(format!("run '{}' has no summary", self.name)))
    }
}

/// Builder for `Run`.
#[derive(Debug)]
pub struct RunBuilder {
    name: String,
    config: Map<String, Value>,
    summary: Option<Map<String, Value>>,
}

impl RunBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: Map::new(),
            summary: Some(Map::new()),
        }
    }

    /// Set a config value.
    #[must_use]
    pub fn config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Set a summary value.
    #[must_use]
    pub fn summary(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.summary
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Drop the summary entirely (as for runs fetched without one).
    #[must_use]
    pub fn without_summary(mut self) -> Self {
        self.summary = None;
        self
    }

    /// Build the `Run`.
    #[must_use]
    pub fn build(self) -> Run {
        Run {
            name: self.name,
            config: self.config,
            summary: self.summary.map(RunSummary::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_public_config_drops_reserved_keys() {
        let run = Run::builder("run-1")
            .config("lr", 0.1)
            .config("_wandb", json!({"cli_version": "0.8"}))
            .build();

        let config = run.public_config();
        assert_eq!(config.len(), 1);
        assert!(config.contains_key("lr"));
        assert_eq!(run.config().len(), 2);
    }

    #[test]
    fn test_json_dict_skips_media() {
        let run = Run::builder("run-1")
            .summary("acc", 0.9)
            .summary("examples", json!({"_type": "images", "count": 8}))
            .summary("meta", json!({"epochs": 3}))
            .build();

        let summary = run.summary().unwrap();
        assert_eq!(summary.len(), 3);
        let dict = summary.json_dict();
        assert_eq!(dict.len(), 2);
        assert!(!dict.contains_key("examples"));
    }

    #[test]
    fn test_missing_summary_errors() {
        let run = Run::builder("orphan").without_summary().build();
        let err = run.summary().unwrap_err();
        assert!(err.to_string().contains("orphan"));
    }

    #[test]
    fn test_run_deserialize_defaults() {
        let run: Run = serde_json::from_value(json!({"name": "bare"})).unwrap();
        assert_eq!(run.name(), "bare");
        assert!(run.config().is_empty());
        assert!(run.summary().is_err());
    }
}
