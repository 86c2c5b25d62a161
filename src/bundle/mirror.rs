//! Mirroring static images and data into the build output.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use same_file::is_same_file;
use serde::Serialize;

/// Which files of a source directory are mirrored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum CopySelection {
  /// Regular files directly inside the directory.
  TopLevelFiles,
  /// Files anywhere below the directory with the given extension.
  Recursive {
    /// Extension without the leading dot.
    extension: String,
  },
}

/// Collect mirrored files, relative to `root`. A missing root yields no files.
pub fn collect_sources(root: &Path, selection: &CopySelection) -> Result<BTreeSet<PathBuf>> {
  let mut found = BTreeSet::new();
  if !root.is_dir() {
    return Ok(found);
  }
  collect_into(root, Path::new(""), selection, &mut found)?;
  Ok(found)
}

fn collect_into(
  root: &Path,
  relative: &Path,
  selection: &CopySelection,
  found: &mut BTreeSet<PathBuf>,
) -> Result<()> {
  let dir = root.join(relative);
  for entry in fs::read_dir(&dir).with_context(|| format!("failed to read {}", dir.display()))? {
    let entry = entry?;
    let file_type = entry.file_type()?;
    let child = relative.join(entry.file_name());

    match selection {
      CopySelection::TopLevelFiles => {
        if file_type.is_file() {
          found.insert(child);
        }
      }
      CopySelection::Recursive { extension } => {
        if file_type.is_dir() {
          collect_into(root, &child, selection, found)?;
        } else if file_type.is_file()
          && child
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension.as_str()))
        {
          found.insert(child);
        }
      }
    }
  }
  Ok(())
}

/// Mirror the selected files of `source_root` into `mirror_root`, pruning stale entries.
///
/// Returns the number of mirrored files.
pub fn mirror_directory(
  source_root: &Path,
  mirror_root: &Path,
  selection: &CopySelection,
) -> Result<usize> {
  let files = collect_sources(source_root, selection)?;

  if !mirror_root.exists() {
    fs::create_dir_all(mirror_root)
      .with_context(|| format!("failed to create {}", mirror_root.display()))?;
  }
  prune_mirror_tree(mirror_root, &files)
    .with_context(|| format!("failed to prune {}", mirror_root.display()))?;

  for relative in &files {
    let destination = mirror_root.join(relative);
    if let Some(parent) = destination.parent() {
      fs::create_dir_all(parent)?;
    }
    install_file(&source_root.join(relative), &destination)
      .with_context(|| format!("failed to install {}", destination.display()))?;
  }

  Ok(files.len())
}

fn prune_mirror_tree(root: &Path, keep_files: &BTreeSet<PathBuf>) -> std::io::Result<()> {
  if !root.exists() {
    return Ok(());
  }

  prune_mirror_subtree(root, Path::new(""), keep_files)?;
  Ok(())
}

fn prune_mirror_subtree(
  root: &Path,
  relative: &Path,
  keep_files: &BTreeSet<PathBuf>,
) -> std::io::Result<bool> {
  let current_path = root.join(relative);

  let mut has_required_descendants = false;
  let entries = match fs::read_dir(&current_path) {
    Ok(entries) => entries,
    Err(err) if err.kind() == ErrorKind::NotFound => return Ok(true),
    Err(err) => return Err(err),
  };

  for entry in entries {
    let entry = entry?;
    let child_relative = relative.join(entry.file_name());
    let entry_path = entry.path();

    if entry.file_type()?.is_dir() {
      if prune_mirror_subtree(root, &child_relative, keep_files)? {
        fs::remove_dir_all(&entry_path)?;
      } else {
        has_required_descendants = true;
      }
    } else if keep_files.contains(&child_relative) {
      has_required_descendants = true;
    } else {
      fs::remove_file(&entry_path)?;
    }
  }

  Ok(!has_required_descendants && !relative.as_os_str().is_empty())
}

fn install_file(source: &Path, destination: &Path) -> std::io::Result<()> {
  if destination.exists() {
    if is_same_file(source, destination)? {
      return Ok(());
    }
    fs::remove_file(destination)?;
  }

  match fs::hard_link(source, destination) {
    Ok(_) => Ok(()),
    Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
    Err(_) => fs::copy(source, destination).map(|_| ()),
  }
}
