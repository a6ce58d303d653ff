//! Report - an ordered document of sections over tracked runs

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Run, Section};
use crate::charts::{chart_prefix, ChartIndex};
use crate::Result;

/// What the exporter needs from a report owned by the tracking service.
pub trait ReportSource {
    /// Owner of the report; becomes the document author.
    fn entity(&self) -> &str;

    /// Display name of the report; becomes the document title.
    fn name(&self) -> &str;

    /// Sections in display order.
    fn sections(&self) -> &[Section];

    /// Runs shown by the section at `index` in [`ReportSource::sections`].
    ///
    /// # Errors
    ///
    /// Returns error if the runs cannot be enumerated.
    fn runs(&self, index: usize) -> Result<Vec<Run>>;

    /// Write chart images into `dir` as `section_<index>...` files and
    /// return where each section's charts landed.
    ///
    /// # Errors
    ///
    /// Returns error if the images cannot be fetched or written.
    fn download_charts(&self, dir: &Path) -> Result<ChartIndex>;
}

/// Encoded chart image attached to a section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartImage {
    file_name: String,
    bytes: Vec<u8>,
}

impl ChartImage {
    /// Create a chart image.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Get the file name (without the section prefix).
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Get the encoded image bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// In-memory report: sections, their runs, and their chart images.
///
/// Runs and chart images are both keyed by section position, so two
/// sections sharing a name keep their own runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportSnapshot {
    entity: String,
    name: String,
    #[serde(default)]
    sections: Vec<Section>,
    #[serde(default)]
    runs: Vec<Vec<Run>>,
    #[serde(default)]
    charts: BTreeMap<usize, Vec<ChartImage>>,
}

impl ReportSnapshot {
    /// Create an empty report.
    #[must_use]
    pub fn new(entity: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Load a report from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is invalid or a section is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append a section together with the runs it shows.
    pub fn add_section(&mut self, section: Section, runs: Vec<Run>) {
        // a snapshot loaded from JSON may list fewer run groups than sections
        self.runs.resize_with(self.sections.len(), Vec::new);
        self.runs.push(runs);
        self.sections.push(section);
    }

    /// Attach a chart image to the section at `index`.
    pub fn add_chart(&mut self, index: usize, chart: ChartImage) {
        self.charts.entry(index).or_default().push(chart);
    }
}

impl ReportSource for ReportSnapshot {
    fn entity(&self) -> &str {
        &self.entity
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn sections(&self) -> &[Section] {
        &self.sections
    }

    fn runs(&self, index: usize) -> Result<Vec<Run>> {
        Ok(self.runs.get(index).cloned().unwrap_or_default())
    }

    fn download_charts(&self, dir: &Path) -> Result<ChartIndex> {
        fs::create_dir_all(dir)?;

        let mut index = ChartIndex::new();
        for (&section, images) in &self.charts {
            for image in images {
                let path = dir.join(format!("{}_{}", chart_prefix(section), image.file_name()));
                fs::write(&path, image.bytes())?;
                tracing::debug!(section, path = %path.display(), "chart written");
                index.insert(section, path);
            }
        }
        Ok(index)
    }
}
