//! Section - a titled unit of a report
//!
//! The tracking service stores a section's panels as nested JSON:
//!
//! ```text
//! { "name": "...",
//!   "panels": { "views": { "0": { "config": [ { "viewType": ..., "config": {...} }, ... ] } } } }
//! ```
//!
//! Panels are resolved into [`Panel`] once, when the section is loaded.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{Error, Result};

/// `viewType` of panels holding markdown text.
pub const MARKDOWN_PANEL: &str = "Markdown Panel";

/// The only view whose panels are read.
const PRIMARY_VIEW: &str = "0";

/// A panel inside a report section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    /// Markdown text to be converted to LaTeX.
    Markdown {
        /// Raw markdown source
        text: String,
    },
    /// Any other panel kind (plots, run comparers, ...); not exported.
    Other {
        /// The panel's `viewType`
        view_type: String,
    },
}

impl Panel {
    /// Create a markdown panel.
    #[must_use]
    pub fn markdown(text: impl Into<String>) -> Self {
        Self::Markdown { text: text.into() }
    }

    /// Create a non-markdown panel of the given kind.
    #[must_use]
    pub fn other(view_type: impl Into<String>) -> Self {
        Self::Other {
            view_type: view_type.into(),
        }
    }

    fn from_json(value: &Value) -> Result<Self> {
        let view_type = value
            .get("viewType")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MalformedSection("panel without viewType".to_string()))?;

        if view_type != MARKDOWN_PANEL {
            return Ok(Self::other(view_type));
        }

        let text = value
            .pointer("/config/value")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::MalformedSection("markdown panel without config.value".to_string())
            })?;
        Ok(Self::markdown(text))
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Markdown { text } => json!({
                "viewType": MARKDOWN_PANEL,
                "config": { "value": text },
            }),
            Self::Other { view_type } => json!({ "viewType": view_type, "config": {} }),
        }
    }
}

/// Section of a report: a name plus its panels in display order.
///
/// Serializes to and from the tracking service's nested panel layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Section {
    name: String,
    panels: Vec<Panel>,
}

impl Section {
    /// Create a section from already-resolved panels.
    #[must_use]
    pub fn new(name: impl Into<String>, panels: Vec<Panel>) -> Self {
        Self {
            name: name.into(),
            panels,
        }
    }

    /// Load a section from the tracking service's JSON layout.
    ///
    /// Only the panels of view `"0"` are read.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedSection` if the name or the
    /// `panels -> views -> "0" -> config` path is missing, or a panel
    /// cannot be resolved.
    pub fn from_json(value: &Value) -> Result<Self> {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MalformedSection("section without name".to_string()))?;

        let views = value
            .pointer("/panels/views")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                Error::MalformedSection(format!("section '{name}' has no panels.views"))
            })?;

        if views.len() > 1 {
            tracing::debug!(
                section = name,
                views = views.len(),
                "only view {PRIMARY_VIEW} is exported"
            );
        }

        let configs = views
            .get(PRIMARY_VIEW)
            .and_then(|view| view.get("config"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                Error::MalformedSection(format!(
                    "section '{name}' has no panels.views.{PRIMARY_VIEW}.config"
                ))
            })?;

        let panels = configs
            .iter()
            .map(Panel::from_json)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(name, panels))
    }

    /// Get the section name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the panels in display order.
    #[must_use]
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Markdown sources of the section's markdown panels, in order.
    pub fn markdown(&self) -> impl Iterator<Item = &str> {
        self.panels.iter().filter_map(|panel| match panel {
            Panel::Markdown { text } => Some(text.as_str()),
            Panel::Other { .. } => None,
        })
    }
}

impl TryFrom<Value> for Section {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_json(&value)
    }
}

impl From<Section> for Value {
    fn from(section: Section) -> Self {
        let panels: Vec<Value> = section.panels.iter().map(Panel::to_json).collect();
        let mut views = serde_json::Map::new();
        views.insert(PRIMARY_VIEW.to_string(), json!({ "config": panels }));
        json!({
            "name": section.name,
            "panels": { "views": views },
        })
    }
}
