//! Command-line interface over the resolver, builder, loader and deploy plan.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::builder::{BuildPlan, ProjectBuilder};
use crate::config::ProjectConfig;
use crate::deploy::{DeployCredentials, upload_plan};
use crate::loader::{AssetLoader, HtmlHead, ManifestEndpoint, RunContext, resolve_mode};

/// Resolve component dependencies at build time and deployment assets at run time.
#[derive(Debug, Parser)]
#[command(name = "scaffold-assets", version, about)]
pub struct Cli {
  /// Enable debug logging.
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Project root containing `scaffold.config.json`.
  #[arg(long, global = true, default_value = ".", env = "SCAFFOLD_PROJECT")]
  pub project: PathBuf,

  /// Command to run.
  #[command(subcommand)]
  pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
  /// Print the resolved build plan as JSON.
  Plan,
  /// Concatenate libraries, mirror images and data, and write the build plan.
  Build,
  /// Print the deployment mode for a host.
  Mode {
    /// Document host, e.g. `localhost:9000`.
    #[arg(long)]
    host: String,
    /// Explicit override value.
    #[arg(long = "override")]
    override_value: Option<String>,
  },
  /// Run the asset loader for a page URL and print the stylesheet links.
  Links {
    /// Full document URL, e.g. `http://localhost:9000/?mpDeployment=build`.
    #[arg(long)]
    location: String,
    /// Browser user agent used for legacy stylesheet detection.
    #[arg(long)]
    user_agent: Option<String>,
    /// Supplementary manifest path or URL; defaults to the configured manifest.
    #[arg(long)]
    manifest: Option<String>,
    /// HTML page to splice the links into instead of printing them alone.
    #[arg(long)]
    html: Option<PathBuf>,
  },
  /// Check credentials and print the upload plan for the build output.
  Deploy,
}

impl Cli {
  /// Execute the selected command.
  pub async fn execute(self) -> Result<()> {
    let config = ProjectConfig::discover(&self.project)
      .with_context(|| format!("invalid project configuration in {}", self.project.display()))?;
    debug!(project = %self.project.display(), name = %config.name, "loaded configuration");

    match self.command {
      Command::Plan => {
        let plan = BuildPlan::resolve(&config);
        println!("{}", serde_json::to_string_pretty(&plan)?);
      }
      Command::Build => {
        let report = ProjectBuilder::new(&self.project, &config).build()?;
        for path in &report.libraries {
          println!("{}", path.display());
        }
        println!("{}", report.plan_path.display());
      }
      Command::Mode {
        host,
        override_value,
      } => {
        println!("{}", resolve_mode(&host, override_value.as_deref()));
      }
      Command::Links {
        location,
        user_agent,
        manifest,
        html,
      } => {
        let context =
          RunContext::from_location(&location, &config.override_param, user_agent.as_deref())
            .with_context(|| format!("invalid document location '{location}'"))?;
        let manifest = manifest.unwrap_or_else(|| {
          config
            .manifest_file(&self.project)
            .to_string_lossy()
            .into_owned()
        });

        let loader = AssetLoader::from_config(&config, ManifestEndpoint::parse(&manifest));
        let mut head = HtmlHead::default();
        let ready = loader.start(&context, &mut head).await;
        debug!(mode = %ready.mode, stylesheets = ready.stylesheets, "loader finished");

        match html {
          Some(path) => {
            let page = fs::read_to_string(&path)
              .with_context(|| format!("failed to read {}", path.display()))?;
            println!("{}", head.splice_into(&page)?);
          }
          None => println!("{}", head.render()),
        }
      }
      Command::Deploy => {
        let credentials = DeployCredentials::from_env()?;
        debug!(access_key = %credentials.access_key, "deploy credentials present");
        let plan = upload_plan(&config.output_dir_path(&self.project), &config.name)?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_links_command() {
    let cli = Cli::parse_from([
      "scaffold-assets",
      "--project",
      "site",
      "links",
      "--location",
      "http://localhost:9000/",
      "--user-agent",
      "MSIE 7.0",
    ]);

    assert_eq!(cli.project, PathBuf::from("site"));
    assert!(matches!(cli.command, Command::Links { ref user_agent, .. } if user_agent.as_deref() == Some("MSIE 7.0")));
  }

  #[test]
  fn parses_mode_override() {
    let cli = Cli::parse_from(["scaffold-assets", "mode", "--host", "localhost", "--override", "build"]);
    assert!(matches!(cli.command, Command::Mode { ref override_value, .. } if override_value.as_deref() == Some("build")));
  }
}
