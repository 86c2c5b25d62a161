//! Build orchestrator turning the project configuration into output artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::asset_paths::AssetPathTable;
use crate::bundle::concat::{ConcatTarget, PreparedArtifact, prepare_concat, write_artifacts};
use crate::bundle::mirror::{CopySelection, mirror_directory};
use crate::config::{DATA_DIR, IMAGES_DIR, ProjectConfig};
use crate::models::{Category, FilteredDependencyMap};
use crate::resolver::{build_concat_list, build_library_exclusion_list, filter};

/// File name of the serialised build plan inside the output directory.
pub const BUILD_PLAN_FILE: &str = "build-plan.json";

/// Settings handed to the module optimiser.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizerSettings {
  /// Name of the application module.
  pub name: String,
  /// Modules left out of the optimised bundle.
  pub exclude: Vec<String>,
  /// Module resolution root.
  pub base_url: String,
  /// Module loader configuration file.
  pub main_config_file: String,
  /// Optimised bundle output path.
  pub out: String,
}

/// Minifier input and output.
#[derive(Debug, Clone, Serialize)]
pub struct MinifyTarget {
  /// Compiled script.
  pub src: String,
  /// Minified output.
  pub dest: String,
}

/// Static directory mirrored into the output.
#[derive(Debug, Clone, Serialize)]
pub struct CopyRule {
  /// Source directory.
  pub cwd: String,
  /// Which files are copied.
  pub selection: CopySelection,
  /// Destination directory.
  pub dest: String,
}

/// Everything the build needs, resolved from the project configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlan {
  /// Dependency map after exclusions.
  pub filtered_map: FilteredDependencyMap,
  /// Module optimiser settings.
  pub optimizer: OptimizerSettings,
  /// Third-party libraries concatenated by this crate.
  pub libraries: Vec<ConcatTarget>,
  /// Concatenations of outputs produced by the optimiser and style compiler.
  pub artifacts: Vec<ConcatTarget>,
  /// Minifier runs.
  pub minify: Vec<MinifyTarget>,
  /// Static directories mirrored into the output.
  pub copies: Vec<CopyRule>,
  /// Asset path table compiled into the application.
  pub paths: AssetPathTable,
}

impl BuildPlan {
  /// Resolve the plan for a validated configuration.
  pub fn resolve(config: &ProjectConfig) -> Self {
    let name = &config.name;
    let version = &config.version;
    let out = config.output_dir.trim_end_matches('/');
    let css_dir = config.compiled_css_dir.trim_end_matches('/');
    let root = &config.library_root;

    let filtered_map = filter(&config.dependency_map, &config.exclusion_set());
    let optimizer_out = format!("{out}/{name}.latest.js");

    let libraries = vec![
      ConcatTarget {
        src: build_concat_list(&filtered_map, Category::Js, root),
        dest: format!("{out}/{name}.libs.js"),
      },
      ConcatTarget {
        src: build_concat_list(&filtered_map, Category::Css, root),
        dest: format!("{out}/{name}.libs.css"),
      },
      ConcatTarget {
        src: build_concat_list(&filtered_map, Category::Ie, root),
        dest: format!("{out}/{name}.libs.ie.css"),
      },
    ];

    let main_css = format!("{css_dir}/main.css");
    let main_ie_css = format!("{css_dir}/main.ie.css");
    let artifacts = vec![
      ConcatTarget {
        src: vec![optimizer_out.clone()],
        dest: format!("{out}/{name}.{version}.js"),
      },
      ConcatTarget {
        src: vec![main_css.clone()],
        dest: format!("{out}/{name}.{version}.css"),
      },
      ConcatTarget {
        src: vec![main_css],
        dest: format!("{out}/{name}.latest.css"),
      },
      ConcatTarget {
        src: vec![main_ie_css.clone()],
        dest: format!("{out}/{name}.{version}.ie.css"),
      },
      ConcatTarget {
        src: vec![main_ie_css],
        dest: format!("{out}/{name}.latest.ie.css"),
      },
    ];

    let minify = vec![
      MinifyTarget {
        src: optimizer_out.clone(),
        dest: format!("{out}/{name}.{version}.min.js"),
      },
      MinifyTarget {
        src: optimizer_out.clone(),
        dest: format!("{out}/{name}.latest.min.js"),
      },
    ];

    let copies = vec![
      CopyRule {
        cwd: IMAGES_DIR.into(),
        selection: CopySelection::TopLevelFiles,
        dest: format!("{out}/{IMAGES_DIR}"),
      },
      CopyRule {
        cwd: DATA_DIR.into(),
        selection: CopySelection::Recursive {
          extension: "json".into(),
        },
        dest: format!("{out}/{DATA_DIR}"),
      },
    ];

    let optimizer = OptimizerSettings {
      name: name.clone(),
      exclude: build_library_exclusion_list(&filtered_map),
      base_url: "js".into(),
      main_config_file: "js/config.js".into(),
      out: optimizer_out,
    };

    Self {
      filtered_map,
      optimizer,
      libraries,
      artifacts,
      minify,
      copies,
      paths: config.path_table(),
    }
  }
}

/// Files produced by [`ProjectBuilder::build`].
#[derive(Debug)]
pub struct BuildReport {
  /// Plan the build followed.
  pub plan: BuildPlan,
  /// Library artifacts written.
  pub libraries: Vec<PathBuf>,
  /// Number of mirrored image and data files.
  pub copied: usize,
  /// Artifacts of earlier builds removed from the output directory.
  pub removed: Vec<PathBuf>,
  /// Location of the serialised plan.
  pub plan_path: PathBuf,
}

/// High-level helper writing the library artifacts, static copies and plan.
pub struct ProjectBuilder<'a> {
  project_dir: &'a Path,
  config: &'a ProjectConfig,
}

impl<'a> ProjectBuilder<'a> {
  /// Create a builder for a project directory and its configuration.
  pub fn new(project_dir: &'a Path, config: &'a ProjectConfig) -> Self {
    Self {
      project_dir,
      config,
    }
  }

  /// Run the build.
  ///
  /// Every library input is read before the first file is written, so a missing
  /// library leaves the output directory untouched. Artifacts of earlier builds are
  /// removed before the new ones are written.
  pub fn build(&self) -> Result<BuildReport> {
    self.config.validate()?;
    let plan = BuildPlan::resolve(self.config);

    let prepared = plan
      .libraries
      .iter()
      .map(|target| prepare_concat(self.project_dir, target))
      .collect::<Result<Vec<PreparedArtifact>>>()?;

    let output_dir = self.config.output_dir_path(self.project_dir);
    fs::create_dir_all(&output_dir)
      .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let removed = remove_stale_artifacts(&output_dir, &self.config.name)?;
    let libraries = write_artifacts(&prepared)?;

    let mut copied = 0;
    for rule in &plan.copies {
      copied += mirror_directory(
        &self.project_dir.join(&rule.cwd),
        &self.project_dir.join(&rule.dest),
        &rule.selection,
      )?;
    }

    let plan_path = output_dir.join(BUILD_PLAN_FILE);
    let plan_json = serde_json::to_string_pretty(&plan)?;
    fs::write(&plan_path, plan_json)
      .with_context(|| format!("failed to write {}", plan_path.display()))?;

    info!(
      libraries = libraries.len(),
      copied,
      removed = removed.len(),
      output = %output_dir.display(),
      "build finished"
    );

    Ok(BuildReport {
      plan,
      libraries,
      copied,
      removed,
      plan_path,
    })
  }
}

/// Delete the top-level scripts and stylesheets named after the project, plus the old plan.
///
/// Other files in the output directory are left alone.
fn remove_stale_artifacts(output_dir: &Path, project_name: &str) -> Result<Vec<PathBuf>> {
  let prefix = format!("{project_name}.");
  let mut removed = Vec::new();

  for entry in fs::read_dir(output_dir)
    .with_context(|| format!("failed to read {}", output_dir.display()))?
  {
    let entry = entry?;
    if !entry.file_type()?.is_file() {
      continue;
    }

    let file_name = entry.file_name();
    let file_name = file_name.to_string_lossy();
    let owned = file_name == BUILD_PLAN_FILE
      || (file_name.starts_with(&prefix)
        && (file_name.ends_with(".js") || file_name.ends_with(".css")));
    if owned {
      let path = entry.path();
      fs::remove_file(&path).with_context(|| format!("failed to remove {}", path.display()))?;
      removed.push(path);
    }
  }

  removed.sort();
  Ok(removed)
}
