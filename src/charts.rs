//! Chart images per report section
//!
//! Chart images live in a local directory (`charts/` by default) and are
//! named by section position: `section_<index>...`. Downloading returns a
//! [`ChartIndex`] directly; [`ChartIndex::discover`] rebuilds one from
//! whatever is already on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::Result;

/// Default directory for downloaded chart images.
pub const DEFAULT_CHARTS_DIR: &str = "charts";

/// File name prefix for the charts of section `index`.
#[must_use]
pub fn chart_prefix(index: usize) -> String {
    format!("section_{index}")
}

/// Mapping from section index to chart image paths, sorted per section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartIndex {
    by_section: BTreeMap<usize, Vec<PathBuf>>,
}

impl ChartIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chart path to a section. Each section's paths stay sorted,
    /// matching the order [`ChartIndex::discover`] finds them in.
    pub fn insert(&mut self, section: usize, path: impl Into<PathBuf>) {
        let path = path.into();
        let paths = self.by_section.entry(section).or_default();
        let at = paths.partition_point(|existing| *existing <= path);
        paths.insert(at, path);
    }

    /// Chart paths for a section (empty if none).
    #[must_use]
    pub fn charts(&self, section: usize) -> &[PathBuf] {
        self.by_section
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of chart paths across all sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_section.values().map(Vec::len).sum()
    }

    /// Check if no section has charts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build an index from chart files already present in `dir`, for
    /// sections `0..section_count`.
    ///
    /// # Errors
    ///
    /// Returns error if the glob pattern is invalid or a matched path
    /// cannot be read.
    pub fn discover(dir: &Path, section_count: usize) -> Result<Self> {
        let mut index = Self::new();
        for section in 0..section_count {
            for path in section_charts(dir, section)? {
                index.insert(section, path);
            }
        }
        Ok(index)
    }
}

/// Chart files in `dir` belonging to section `index`, sorted by path.
///
/// Matches `section_<index>*` where the character after the index is not
/// a digit, so section 1 never picks up `section_10_*`.
///
/// # Errors
///
/// Returns error if the glob pattern is invalid or a matched path cannot
/// be read.
pub fn section_charts(dir: &Path, index: usize) -> Result<Vec<PathBuf>> {
    let prefix = chart_prefix(index);
    let pattern = format!(
        "{}/{prefix}*",
        glob::Pattern::escape(&dir.to_string_lossy())
    );

    let mut charts = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        let belongs = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_prefix(&prefix))
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_ascii_digit()));
        if belongs {
            charts.push(path);
        }
    }
    charts.sort();
    Ok(charts)
}
