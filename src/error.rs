//! Error types for runtex
//!
//! Failures from wrapped capabilities (markdown conversion, chart
//! download, Arrow, the tracking logger) pass through unchanged; nothing
//! here retries or recovers.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// runtex error types
#[derive(Error, Debug)]
pub enum Error {
    /// An object in the tracking data model lacks an attribute the pipeline reads
    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    /// Section panel layout does not follow `panels -> views -> "0" -> config`
    #[error("Malformed section: {0}")]
    MalformedSection(String),

    /// Markdown-to-LaTeX conversion failed
    #[error("Markup conversion failed: {0}")]
    Conversion(String),

    /// Invalid input (mismatched lengths, empty class sets, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tracking-service log emission failed
    #[error("Tracking error: {0}")]
    Tracking(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid chart glob pattern
    #[error("Chart pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Unreadable chart path during discovery
    #[error("Chart discovery error: {0}")]
    Glob(#[from] glob::GlobError),
}
