//! Exclusion rules deciding which script components stay out of the library concatenation.

use std::collections::BTreeSet;

/// Component name of the view library, always bundled by the module loader.
pub const VIEW_LIBRARY_COMPONENT: &str = "ractive";

/// Component name of the data-binding library, always bundled by the module loader.
pub const DATA_BINDING_COMPONENT: &str = "backbone";

/// Trait describing which components are pulled into the optimised bundle.
pub trait ComponentExclusion {
  /// Returns `true` when the component's scripts must not be concatenated separately.
  fn is_excluded(&self, component: &str) -> bool;
}

/// Set of excluded component names, always containing the two implicit exclusions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
  names: BTreeSet<String>,
}

impl Default for ExclusionSet {
  fn default() -> Self {
    Self::new(Vec::<String>::new())
  }
}

impl ExclusionSet {
  /// Build a set from user-declared names plus the implicit exclusions.
  pub fn new<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut names = normalise_list(names.into_iter().map(Into::into));
    names.insert(VIEW_LIBRARY_COMPONENT.to_string());
    names.insert(DATA_BINDING_COMPONENT.to_string());
    Self { names }
  }

  /// Returns `true` when only the implicit exclusions are present.
  pub fn is_implicit_only(&self) -> bool {
    self.names.len() == 2
  }
}

impl ComponentExclusion for ExclusionSet {
  fn is_excluded(&self, component: &str) -> bool {
    self.names.contains(component.trim())
  }
}

/// Convert a list of raw names into a sorted, de-duplicated set.
///
/// Values are trimmed and empty entries are discarded.
fn normalise_list(values: impl IntoIterator<Item = String>) -> BTreeSet<String> {
  values
    .into_iter()
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
    .collect()
}
