//! Library concatenation with all inputs read before any output is written.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

/// Text inserted between concatenated files.
pub const CONCAT_SEPARATOR: &str = "\r\n\r\n";

/// One concatenated artifact and its ordered inputs, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConcatTarget {
  /// Input files in cascade order.
  pub src: Vec<String>,
  /// Output file.
  pub dest: String,
}

/// Concatenated artifact held in memory until every target has been read.
#[derive(Debug)]
pub struct PreparedArtifact {
  /// Absolute output path.
  pub dest: PathBuf,
  /// Joined file contents.
  pub contents: String,
}

/// Read every input of `target`, failing on the first missing file.
pub fn prepare_concat(project_dir: &Path, target: &ConcatTarget) -> Result<PreparedArtifact> {
  let mut parts = Vec::with_capacity(target.src.len());
  for source in &target.src {
    let path = project_dir.join(source);
    let content = fs::read_to_string(&path)
      .with_context(|| format!("failed to read library file {}", path.display()))?;
    parts.push(content);
  }

  Ok(PreparedArtifact {
    dest: project_dir.join(&target.dest),
    contents: parts.join(CONCAT_SEPARATOR),
  })
}

/// Write prepared artifacts, creating parent directories as needed.
pub fn write_artifacts(artifacts: &[PreparedArtifact]) -> Result<Vec<PathBuf>> {
  let mut written = Vec::with_capacity(artifacts.len());
  for artifact in artifacts {
    if let Some(parent) = artifact.dest.parent() {
      fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&artifact.dest, &artifact.contents)
      .with_context(|| format!("failed to write {}", artifact.dest.display()))?;
    debug!(path = %artifact.dest.display(), bytes = artifact.contents.len(), "wrote artifact");
    written.push(artifact.dest.clone());
  }
  Ok(written)
}
