//! Error types shared by the resolver and the loader.
//!
//! Two failure classes exist and they never mix:
//! - [`ConfigError`] is fatal and raised at build time, before any artifact is written.
//! - [`AssetLoadDegradation`] is non-fatal and raised at run time; the loader records it
//!   and still reaches `Ready`.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Malformed project or dependency map configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The dependency map declares a category other than `js`, `css` or `ie`.
  #[error("unknown dependency map category '{category}' (expected js, css or ie)")]
  UnknownCategory {
    /// Category key found in the map.
    category: String,
  },
  /// A value that must be a JSON object was something else.
  #[error("expected an object at '{path}'")]
  NotAMapping {
    /// Dotted location of the offending value.
    path: String,
  },
  /// A component's identifier list is not an array.
  #[error("identifier list for '{component}' in category '{category}' must be an array")]
  NotASequence {
    /// Category the entry belongs to.
    category: String,
    /// Component name.
    component: String,
  },
  /// An identifier list contains a non-string or blank value.
  #[error("identifier #{index} for '{component}' in category '{category}' must be a non-empty string")]
  InvalidIdentifier {
    /// Category the entry belongs to.
    category: String,
    /// Component name.
    component: String,
    /// Position of the bad value within the list.
    index: usize,
  },
  /// The build output directory would overlap the project's own sources.
  #[error("output directory '{output_dir}' {reason}")]
  InvalidOutputDir {
    /// Configured output directory.
    output_dir: String,
    /// What is wrong with it.
    reason: &'static str,
  },
  /// Failed to read a configuration file from disk.
  #[error("failed to read {}: {source}", path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },
  /// Failed to parse a configuration file.
  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_json::Error,
  },
}

/// Reasons the supplementary manifest could not contribute stylesheets.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssetLoadDegradation {
  /// The manifest could not be fetched.
  #[error("supplementary manifest fetch failed: {0}")]
  Fetch(String),
  /// The manifest was fetched but is not a valid dependency manifest.
  #[error("supplementary manifest is malformed: {0}")]
  Parse(String),
  /// The fetch did not finish in time.
  #[error("supplementary manifest fetch timed out after {0:?}")]
  Timeout(Duration),
}
