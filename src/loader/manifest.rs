//! Fetching and interpreting the supplementary dependency manifest.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::AssetLoadDegradation;
use crate::models::{ComponentEntry, DependencyMap, DeploymentMode, FilteredDependencyMap};

/// Somewhere the supplementary manifest can be read from.
#[allow(async_fn_in_trait)]
pub trait ManifestSource {
  /// Human readable location used in diagnostics.
  fn describe(&self) -> String;

  /// Fetch the raw manifest text.
  async fn fetch(&self) -> Result<String>;
}

/// Manifest read from the local filesystem.
#[derive(Debug, Clone)]
pub struct FileManifestSource {
  path: PathBuf,
}

impl FileManifestSource {
  /// Read the manifest at `path`.
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
    }
  }
}

impl ManifestSource for FileManifestSource {
  fn describe(&self) -> String {
    self.path.display().to_string()
  }

  async fn fetch(&self) -> Result<String> {
    tokio::fs::read_to_string(&self.path)
      .await
      .with_context(|| format!("failed to read {}", self.path.display()))
  }
}

/// Manifest served over HTTP next to the running page.
#[derive(Debug, Clone)]
pub struct HttpManifestSource {
  client: reqwest::Client,
  url: String,
}

impl HttpManifestSource {
  /// Fetch the manifest from `url`.
  pub fn new(url: impl Into<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      url: url.into(),
    }
  }
}

impl ManifestSource for HttpManifestSource {
  fn describe(&self) -> String {
    self.url.clone()
  }

  async fn fetch(&self) -> Result<String> {
    let response = self
      .client
      .get(&self.url)
      .send()
      .await
      .with_context(|| format!("failed to request {}", self.url))?;

    if !response.status().is_success() {
      bail!("request to {} returned HTTP {}", self.url, response.status());
    }

    response
      .text()
      .await
      .with_context(|| format!("failed to read response body from {}", self.url))
  }
}

/// Either kind of manifest source, picked from a location string.
#[derive(Debug, Clone)]
pub enum ManifestEndpoint {
  /// Local file.
  File(FileManifestSource),
  /// HTTP(S) URL.
  Http(HttpManifestSource),
}

impl ManifestEndpoint {
  /// URLs starting with `http://` or `https://` are fetched over HTTP; anything else is a path.
  pub fn parse(location: &str) -> Self {
    let lowered = location.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
      Self::Http(HttpManifestSource::new(location))
    } else {
      Self::File(FileManifestSource::new(location))
    }
  }
}

impl ManifestSource for ManifestEndpoint {
  fn describe(&self) -> String {
    match self {
      Self::File(source) => source.describe(),
      Self::Http(source) => source.describe(),
    }
  }

  async fn fetch(&self) -> Result<String> {
    match self {
      Self::File(source) => source.fetch().await,
      Self::Http(source) => source.fetch().await,
    }
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SupplementaryManifest {
  #[serde(default)]
  dependency_map: IndexMap<String, StylesheetEntry>,
}

/// Stylesheet fields of a manifest component; everything else is ignored unread.
#[derive(Debug, Default, Deserialize)]
struct StylesheetEntry {
  #[serde(default)]
  css: Vec<String>,
  #[serde(default)]
  ie: Vec<String>,
}

/// Outcome of loading the supplementary manifest.
#[derive(Debug, Clone, Default)]
pub struct SupplementaryMap {
  /// Stylesheet categories of the manifest; empty when unavailable.
  pub map: FilteredDependencyMap,
  /// Why the manifest did not contribute, when it failed.
  pub degradation: Option<AssetLoadDegradation>,
}

/// Parse manifest text into its `css` and `ie` categories.
pub fn parse_supplementary_manifest(
  text: &str,
) -> Result<FilteredDependencyMap, AssetLoadDegradation> {
  let manifest: SupplementaryManifest =
    serde_json::from_str(text).map_err(|err| AssetLoadDegradation::Parse(err.to_string()))?;

  let components = manifest
    .dependency_map
    .into_iter()
    .map(|(name, entry)| ComponentEntry {
      name,
      js: Vec::new(),
      css: entry.css,
      ie: entry.ie,
    });

  Ok(FilteredDependencyMap::new(DependencyMap::from_components(
    components,
  )))
}

/// Load the supplementary manifest for `mode`.
///
/// Only [`DeploymentMode::Local`] performs I/O. Fetch failures, malformed manifests and
/// timeouts produce an empty map together with the recorded degradation.
pub async fn load_supplementary_map<S: ManifestSource>(
  mode: DeploymentMode,
  source: &S,
  timeout: Duration,
) -> SupplementaryMap {
  if mode != DeploymentMode::Local {
    return SupplementaryMap::default();
  }

  debug!(source = %source.describe(), "fetching supplementary manifest");
  let result = match tokio::time::timeout(timeout, source.fetch()).await {
    Ok(Ok(text)) => parse_supplementary_manifest(&text),
    Ok(Err(err)) => Err(AssetLoadDegradation::Fetch(format!("{err:#}"))),
    Err(_) => Err(AssetLoadDegradation::Timeout(timeout)),
  };

  match result {
    Ok(map) => SupplementaryMap {
      map,
      degradation: None,
    },
    Err(degradation) => {
      warn!(source = %source.describe(), "{degradation}; continuing without supplementary stylesheets");
      SupplementaryMap {
        map: FilteredDependencyMap::empty(),
        degradation: Some(degradation),
      }
    }
  }
}
