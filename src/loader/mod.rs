//! Run-time asset loader selecting and injecting stylesheets for the active deployment.
//!
//! The loader runs once per application start:
//!
//! 1. resolve the [`DeploymentMode`] from the host and optional override,
//! 2. in local mode, fetch the supplementary manifest (the only suspension point),
//! 3. append every stylesheet link to the [`DocumentHead`],
//! 4. report [`Ready`].
//!
//! Rendering must wait for [`AssetLoader::start`] to return, since layout depends on the
//! stylesheets being present. `start` always returns; manifest problems only degrade
//! styling.

mod inject;
mod legacy;
mod manifest;
mod mode;
mod state;

use std::time::Duration;

use tracing::info;

pub use inject::{DocumentHead, HtmlHead, RecordingHead, inject_assets};
pub use legacy::{LEGACY_MSIE_MAX, is_legacy_browser, msie_version};
pub use manifest::{
  FileManifestSource, HttpManifestSource, ManifestEndpoint, ManifestSource, SupplementaryMap,
  load_supplementary_map, parse_supplementary_manifest,
};
pub use mode::{is_local_host, override_from_query, resolve_mode, split_location};
pub use state::LoaderState;

use crate::asset_paths::AssetPathTable;
use crate::config::ProjectConfig;
use crate::error::AssetLoadDegradation;
use crate::models::{AssetPathSet, DeploymentMode};
use state::StateTrail;

/// Facts about the running page supplied by the embedding application.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
  /// Document host, including the port when present.
  pub host: String,
  /// Explicit deployment override, typically read from the query string.
  pub override_value: Option<String>,
  /// Whether the browser needs the legacy stylesheets.
  pub legacy_browser: bool,
}

impl RunContext {
  /// Build a context from a document URL and an optional user agent.
  pub fn from_location(
    location: &str,
    override_param: &str,
    user_agent: Option<&str>,
  ) -> Result<Self, url::ParseError> {
    let (host, query) = split_location(location)?;
    Ok(Self {
      host,
      override_value: query
        .as_deref()
        .and_then(|query| override_from_query(query, override_param)),
      legacy_browser: user_agent.is_some_and(is_legacy_browser),
    })
  }
}

/// Settings the loader needs besides the path table.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
  /// Root that supplementary identifiers are resolved under.
  pub library_root: String,
  /// Upper bound for the supplementary manifest fetch.
  pub fetch_timeout: Duration,
}

/// Result of a completed loader run.
#[derive(Debug, Clone)]
pub struct Ready {
  /// Mode the loader resolved.
  pub mode: DeploymentMode,
  /// Path set that was active.
  pub paths: AssetPathSet,
  /// Number of stylesheet links appended.
  pub stylesheets: usize,
  /// Set when the supplementary manifest could not contribute.
  pub degradation: Option<AssetLoadDegradation>,
  /// States passed through, starting with [`LoaderState::Unstarted`].
  pub states: Vec<LoaderState>,
}

/// One-shot loader; [`AssetLoader::start`] consumes it.
#[derive(Debug)]
pub struct AssetLoader<S> {
  table: AssetPathTable,
  source: S,
  options: LoaderOptions,
}

impl<S: ManifestSource> AssetLoader<S> {
  /// Create a loader over an explicit path table.
  pub fn new(table: AssetPathTable, source: S, options: LoaderOptions) -> Self {
    Self {
      table,
      source,
      options,
    }
  }

  /// Create a loader using the project's path table, library root and fetch timeout.
  pub fn from_config(config: &ProjectConfig, source: S) -> Self {
    Self::new(config.path_table(), source, LoaderOptions {
      library_root: config.library_root.clone(),
      fetch_timeout: config.fetch_timeout(),
    })
  }

  /// Resolve, fetch and inject, then report readiness.
  pub async fn start<H: DocumentHead>(self, context: &RunContext, head: &mut H) -> Ready {
    let mut trail = StateTrail::new();

    let mode = resolve_mode(&context.host, context.override_value.as_deref());
    trail.advance(LoaderState::ModeResolved);

    let SupplementaryMap { map, degradation } =
      load_supplementary_map(mode, &self.source, self.options.fetch_timeout).await;
    if mode == DeploymentMode::Local {
      trail.advance(LoaderState::LocalMapFetched);
    }

    let paths = self.table.get(mode).clone();
    let stylesheets = inject_assets(
      &paths,
      &map,
      context.legacy_browser,
      &self.options.library_root,
      head,
    );
    trail.advance(LoaderState::AssetsInjected);

    trail.advance(LoaderState::Ready);
    info!(%mode, stylesheets, degraded = degradation.is_some(), "assets ready");

    Ready {
      mode,
      paths,
      stylesheets,
      degradation,
      states: trail.into_states(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::asset_paths::PathTableOptions;
  use manifest::tests::{FailingSource, StaticSource};

  fn table() -> AssetPathTable {
    AssetPathTable::new(&PathTableOptions {
      project_name: "app",
      output_dir: "dist",
      remote_base: "https://cdn.example.com/projects",
      use_compass: true,
    })
  }

  fn options() -> LoaderOptions {
    LoaderOptions {
      library_root: "bower_components".into(),
      fetch_timeout: Duration::from_secs(1),
    }
  }

  fn context(host: &str, override_value: Option<&str>, legacy_browser: bool) -> RunContext {
    RunContext {
      host: host.into(),
      override_value: override_value.map(String::from),
      legacy_browser,
    }
  }

  const MANIFEST: &str = r#"{ "dependencyMap": {
    "leaflet": { "css": ["leaflet/leaflet"], "ie": ["leaflet/leaflet.ie"] }
  } }"#;

  #[tokio::test]
  async fn local_run_injects_supplementary_then_baseline() {
    let loader = AssetLoader::new(table(), StaticSource::new(MANIFEST), options());
    let mut head = RecordingHead::default();

    let ready = loader.start(&context("localhost:9000", None, false), &mut head).await;

    assert_eq!(ready.mode, DeploymentMode::Local);
    assert_eq!(head.links(), [
      "bower_components/leaflet/leaflet.css",
      ".tmp/css/main.css",
    ]);
    assert_eq!(ready.stylesheets, 2);
    assert_eq!(ready.states, vec![
      LoaderState::Unstarted,
      LoaderState::ModeResolved,
      LoaderState::LocalMapFetched,
      LoaderState::AssetsInjected,
      LoaderState::Ready,
    ]);
  }

  #[tokio::test]
  async fn remote_run_skips_manifest() {
    let source = StaticSource::new(MANIFEST);
    let loader = AssetLoader::new(table(), source, options());
    let mut head = RecordingHead::default();

    let ready = loader
      .start(&context("www.example.com", Some("local"), true), &mut head)
      .await;

    assert_eq!(ready.mode, DeploymentMode::Deploy);
    assert_eq!(head.links(), [
      "https://cdn.example.com/projects/app/app.libs.min.css",
      "https://cdn.example.com/projects/app/app.latest.min.css",
      "https://cdn.example.com/projects/app/app.libs.min.ie.css",
      "https://cdn.example.com/projects/app/app.latest.min.ie.css",
    ]);
    assert!(!ready.states.contains(&LoaderState::LocalMapFetched));
  }

  #[tokio::test]
  async fn fetch_failure_still_reaches_ready() {
    let loader = AssetLoader::new(table(), FailingSource, options());
    let mut head = RecordingHead::default();

    let ready = loader.start(&context("localhost", None, false), &mut head).await;

    assert_eq!(ready.states.last(), Some(&LoaderState::Ready));
    assert!(matches!(ready.degradation, Some(AssetLoadDegradation::Fetch(_))));
    assert_eq!(head.links(), [".tmp/css/main.css"]);
  }

  #[tokio::test]
  async fn override_selects_build_paths_locally() {
    let loader = AssetLoader::new(table(), StaticSource::new(MANIFEST), options());
    let mut head = RecordingHead::default();

    let ready = loader
      .start(&context("localhost:9000", Some("build"), false), &mut head)
      .await;

    assert_eq!(ready.mode, DeploymentMode::Build);
    assert_eq!(ready.paths.images, "dist/images/");
    assert_eq!(head.links(), ["dist/app.libs.min.css", "dist/app.latest.min.css"]);
  }

  #[test]
  fn context_from_location_reads_override_and_user_agent() {
    let context = RunContext::from_location(
      "http://localhost:9000/?mpDeployment=deploy",
      "mpDeployment",
      Some("Mozilla/4.0 (compatible; MSIE 7.0; Windows NT 5.1)"),
    )
    .unwrap();

    assert_eq!(context.host, "localhost:9000");
    assert_eq!(context.override_value.as_deref(), Some("deploy"));
    assert!(context.legacy_browser);
  }

  #[test]
  fn context_from_bare_host_location_stays_local() {
    let context =
      RunContext::from_location("localhost:9000/?mpDeployment=build", "mpDeployment", None).unwrap();

    assert_eq!(context.host, "localhost:9000");
    assert_eq!(
      resolve_mode(&context.host, context.override_value.as_deref()),
      DeploymentMode::Build
    );
  }
}
