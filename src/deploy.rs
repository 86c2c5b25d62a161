//! Upload plan for publishing the build output to remote object storage.
//!
//! Only the plan is produced here; the transfer itself belongs to the storage tooling.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use crate::builder::BUILD_PLAN_FILE;

/// Bucket receiving deployed projects.
pub const DEPLOY_BUCKET: &str = "data.minnpost";

/// Access policy applied to uploaded objects.
pub const DEPLOY_ACCESS: &str = "public-read";

/// Environment variable holding the storage access key.
pub const ACCESS_KEY_VAR: &str = "AWS_ACCESS_KEY_ID";

/// Environment variable holding the storage secret key.
pub const SECRET_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";

/// Storage credentials read from the process environment.
#[derive(Clone)]
pub struct DeployCredentials {
  /// Access key id.
  pub access_key: String,
  secret_key: String,
}

impl DeployCredentials {
  /// Read both credentials from the environment.
  pub fn from_env() -> Result<Self> {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  /// Read both credentials through `lookup`; blank values count as missing.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let read = |name: &str| {
      lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| anyhow!("environment variable {name} must be set to deploy"))
    };

    Ok(Self {
      access_key: read(ACCESS_KEY_VAR)?,
      secret_key: read(SECRET_KEY_VAR)?,
    })
  }

  /// Secret key.
  pub fn secret_key(&self) -> &str {
    &self.secret_key
  }
}

impl fmt::Debug for DeployCredentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DeployCredentials")
      .field("access_key", &self.access_key)
      .field("secret_key", &"<redacted>")
      .finish()
  }
}

/// Single file and the object key it is uploaded to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadEntry {
  /// File on disk.
  pub local: PathBuf,
  /// Object key within the bucket.
  pub key: String,
}

/// Every upload needed to publish a build.
#[derive(Debug, Clone, Serialize)]
pub struct UploadPlan {
  /// Target bucket.
  pub bucket: String,
  /// Access policy.
  pub access: String,
  /// Uploads, sorted by key.
  pub entries: Vec<UploadEntry>,
}

/// List every file below `output_dir` with its key under `projects/{project_name}/`.
///
/// The serialised build plan is internal to the build and is not uploaded.
pub fn upload_plan(output_dir: &Path, project_name: &str) -> Result<UploadPlan> {
  if !output_dir.is_dir() {
    return Err(anyhow!(
      "build output {} does not exist; run the build first",
      output_dir.display()
    ));
  }

  let mut files = Vec::new();
  collect_files(output_dir, Path::new(""), &mut files)?;

  let prefix = format!("projects/{project_name}");
  let mut entries: Vec<UploadEntry> = files
    .into_iter()
    .filter(|relative| relative.as_path() != Path::new(BUILD_PLAN_FILE))
    .map(|relative| {
      let key = format!(
        "{}/{}",
        prefix,
        relative.to_string_lossy().replace('\\', "/")
      );
      UploadEntry {
        local: output_dir.join(&relative),
        key,
      }
    })
    .collect();
  entries.sort_by(|a, b| a.key.cmp(&b.key));

  Ok(UploadPlan {
    bucket: DEPLOY_BUCKET.into(),
    access: DEPLOY_ACCESS.into(),
    entries,
  })
}

fn collect_files(root: &Path, relative: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
  let dir = root.join(relative);
  for entry in fs::read_dir(&dir).with_context(|| format!("failed to read {}", dir.display()))? {
    let entry = entry?;
    let child = relative.join(entry.file_name());
    let file_type = entry.file_type()?;
    if file_type.is_dir() {
      collect_files(root, &child, files)?;
    } else if file_type.is_file() {
      files.push(child);
    }
  }
  Ok(())
}
