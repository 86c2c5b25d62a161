//! Project configuration loader describing components, exclusions and output layout.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::asset_paths::{AssetPathTable, PathTableOptions};
use crate::error::ConfigError;
use crate::models::DependencyMap;
use crate::selection::ExclusionSet;

/// Name of the configuration file searched for in the project root.
pub const DEFAULT_CONFIG_FILE: &str = "scaffold.config.json";

/// Source directory of images mirrored into the build output.
pub const IMAGES_DIR: &str = "images";

/// Source directory of data files mirrored into the build output.
pub const DATA_DIR: &str = "data";

/// Feature switches selected when the project was scaffolded.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectFeatures {
  /// Styles are compiled by compass into `.tmp/` instead of served from `styles/`.
  pub use_compass: bool,
}

impl Default for ProjectFeatures {
  fn default() -> Self {
    Self { use_compass: true }
  }
}

/// Discoverable project configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectConfig {
  /// Project name; used as the module name and in every artifact file name.
  pub name: String,
  /// Project version embedded in versioned artifact names.
  pub version: String,
  /// Directory holding installed third-party components.
  pub library_root: String,
  /// Build output directory.
  pub output_dir: String,
  /// Directory the style compiler writes production stylesheets to.
  pub compiled_css_dir: String,
  /// Declared third-party components.
  pub dependency_map: DependencyMap,
  /// Component names bundled by the module loader rather than concatenated.
  pub exclusions: Vec<String>,
  /// Feature switches.
  pub features: ProjectFeatures,
  /// Base URL the deploy step publishes under.
  pub remote_base: String,
  /// Path of the supplementary manifest fetched in local mode.
  pub manifest_path: String,
  /// Query parameter that may override the deployment mode on local hosts.
  pub override_param: String,
  /// Upper bound for the supplementary manifest fetch, in milliseconds.
  pub fetch_timeout_ms: u64,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      name: "project".into(),
      version: "0.0.0".into(),
      library_root: "bower_components".into(),
      output_dir: "dist".into(),
      compiled_css_dir: ".tmp/dist_css".into(),
      dependency_map: DependencyMap::default(),
      exclusions: Vec::new(),
      features: ProjectFeatures::default(),
      remote_base: "https://s3.amazonaws.com/data.minnpost/projects".into(),
      manifest_path: "bower.json".into(),
      override_param: "mpDeployment".into(),
      fetch_timeout_ms: 5_000,
    }
  }
}

impl ProjectConfig {
  /// Load configuration from the provided project directory.
  ///
  /// A missing file yields the defaults. A file that exists but cannot be read or parsed
  /// is an error, so a malformed dependency map is never silently replaced.
  pub fn discover(project_dir: &Path) -> Result<Self, ConfigError> {
    let candidate = project_dir.join(DEFAULT_CONFIG_FILE);
    if !candidate.exists() {
      debug!(path = %candidate.display(), "no project configuration found, using defaults");
      return Ok(Self::default());
    }
    Self::from_path(&candidate)
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    config.validate()?;
    Ok(config)
  }

  /// Check the settings that decide where the build writes and prunes files.
  ///
  /// The output directory must be a relative path below the project root and must not
  /// be, contain, or sit inside the mirrored `images/` and `data/` sources.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let invalid = |reason| ConfigError::InvalidOutputDir {
      output_dir: self.output_dir.clone(),
      reason,
    };

    let mut normal = Vec::new();
    for component in Path::new(self.output_dir.trim()).components() {
      match component {
        Component::Normal(part) => normal.push(part),
        Component::CurDir => {}
        Component::ParentDir => return Err(invalid("must not leave the project root")),
        Component::RootDir | Component::Prefix(_) => {
          return Err(invalid("must be relative to the project root"));
        }
      }
    }

    match normal.first() {
      None => Err(invalid("must name a directory below the project root")),
      Some(first) if *first == IMAGES_DIR || *first == DATA_DIR => {
        Err(invalid("must not be inside the mirrored images or data directories"))
      }
      Some(_) => Ok(()),
    }
  }

  /// Exclusion set including the implicit view and data-binding components.
  pub fn exclusion_set(&self) -> ExclusionSet {
    ExclusionSet::new(self.exclusions.iter().cloned())
  }

  /// Asset path table for this project.
  pub fn path_table(&self) -> AssetPathTable {
    AssetPathTable::new(&PathTableOptions {
      project_name: &self.name,
      output_dir: &self.output_dir,
      remote_base: &self.remote_base,
      use_compass: self.features.use_compass,
    })
  }

  /// Timeout applied to the supplementary manifest fetch.
  pub fn fetch_timeout(&self) -> Duration {
    Duration::from_millis(self.fetch_timeout_ms)
  }
}

impl ProjectConfig {
  /// Build output directory resolved against the project root.
  pub fn output_dir_path(&self, project_dir: &Path) -> PathBuf {
    project_dir.join(&self.output_dir)
  }

  /// Supplementary manifest resolved against the project root.
  pub fn manifest_file(&self, project_dir: &Path) -> PathBuf {
    project_dir.join(&self.manifest_path)
  }
}
