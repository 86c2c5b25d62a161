#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod builder;
pub mod bundle;
pub mod cli;
pub mod config;
pub mod deploy;
pub mod error;
pub mod loader;
pub mod models;
pub mod resolver;
pub mod selection;

pub use builder::{BuildPlan, BuildReport, ProjectBuilder};
pub use config::ProjectConfig;
pub use error::{AssetLoadDegradation, ConfigError};
pub use loader::{AssetLoader, DocumentHead, LoaderState, Ready, RunContext};
pub use models::{
  AssetPathSet, Category, ComponentEntry, DependencyMap, DeploymentMode, FilteredDependencyMap,
};
pub use selection::{ComponentExclusion, ExclusionSet};
