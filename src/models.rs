//! Data structures shared by the build-time resolver and the run-time loader.

use std::fmt;
use std::ops::Deref;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// File category a component identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  /// Script libraries.
  Js,
  /// Standard stylesheets.
  Css,
  /// Stylesheets only loaded for legacy browsers.
  Ie,
}

impl Category {
  /// Every category in canonical order.
  pub const ALL: [Category; 3] = [Category::Js, Category::Css, Category::Ie];

  /// Key used for the category in dependency maps.
  pub fn key(self) -> &'static str {
    match self {
      Category::Js => "js",
      Category::Css => "css",
      Category::Ie => "ie",
    }
  }

  /// File extension appended to identifiers of this category.
  pub fn extension(self) -> &'static str {
    match self {
      Category::Js => "js",
      Category::Css | Category::Ie => "css",
    }
  }

  /// Parse a dependency map key.
  pub fn from_key(key: &str) -> Result<Self, ConfigError> {
    match key {
      "js" => Ok(Category::Js),
      "css" => Ok(Category::Css),
      "ie" => Ok(Category::Ie),
      other => Err(ConfigError::UnknownCategory {
        category: other.to_string(),
      }),
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

/// A named third-party dependency and the files it contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ComponentEntry {
  /// Unique component name; taken from the enclosing map key.
  #[serde(skip)]
  pub name: String,
  /// Module identifiers, without extension.
  #[serde(default)]
  pub js: Vec<String>,
  /// Stylesheet identifiers, without extension.
  #[serde(default)]
  pub css: Vec<String>,
  /// Legacy-browser stylesheet identifiers, without extension.
  #[serde(default)]
  pub ie: Vec<String>,
}

impl ComponentEntry {
  /// Identifiers the component declares for `category`.
  pub fn identifiers(&self, category: Category) -> &[String] {
    match category {
      Category::Js => &self.js,
      Category::Css => &self.css,
      Category::Ie => &self.ie,
    }
  }
}

/// Component name to identifier list for a single category, in declaration order.
pub type CategoryMap = IndexMap<String, Vec<String>>;

/// Ordered, categorised registry of components and their file identifiers.
///
/// Declaration order of both categories and entries is kept because it becomes the
/// concatenation order, and therefore the cascade order, of the emitted artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencyMap {
  categories: IndexMap<Category, CategoryMap>,
}

impl DependencyMap {
  /// Validate an arbitrary JSON value into a dependency map.
  pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
    let object = value.as_object().ok_or_else(|| ConfigError::NotAMapping {
      path: "dependencyMap".into(),
    })?;

    let mut categories = IndexMap::new();
    for (key, body) in object {
      let category = Category::from_key(key)?;
      let entries = body.as_object().ok_or_else(|| ConfigError::NotAMapping {
        path: format!("dependencyMap.{key}"),
      })?;

      let mut category_map = CategoryMap::new();
      for (component, list) in entries {
        let items = list.as_array().ok_or_else(|| ConfigError::NotASequence {
          category: key.clone(),
          component: component.clone(),
        })?;

        let mut identifiers = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
          let identifier = item
            .as_str()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::InvalidIdentifier {
              category: key.clone(),
              component: component.clone(),
              index,
            })?;
          identifiers.push(identifier.to_string());
        }
        category_map.insert(component.clone(), identifiers);
      }
      categories.insert(category, category_map);
    }

    Ok(Self { categories })
  }

  /// Build a category-oriented map from component-oriented entries.
  ///
  /// Categories appear in `js`, `css`, `ie` order; a component only appears in a category
  /// when it declares at least one identifier for it.
  pub fn from_components(components: impl IntoIterator<Item = ComponentEntry>) -> Self {
    let components: Vec<ComponentEntry> = components.into_iter().collect();
    let mut categories = IndexMap::new();

    for category in Category::ALL {
      let category_map: CategoryMap = components
        .iter()
        .filter(|entry| !entry.identifiers(category).is_empty())
        .map(|entry| (entry.name.clone(), entry.identifiers(category).to_vec()))
        .collect();
      if !category_map.is_empty() {
        categories.insert(category, category_map);
      }
    }

    Self { categories }
  }

  /// Entries declared for `category`, if the category is present.
  pub fn category(&self, category: Category) -> Option<&CategoryMap> {
    self.categories.get(&category)
  }

  /// Categories in declaration order.
  pub fn categories(&self) -> impl Iterator<Item = (Category, &CategoryMap)> {
    self.categories.iter().map(|(category, map)| (*category, map))
  }

  /// Returns `true` when no category declares any entry.
  pub fn is_empty(&self) -> bool {
    self.categories.values().all(|map| map.is_empty())
  }

  pub(crate) fn from_parts(categories: IndexMap<Category, CategoryMap>) -> Self {
    Self { categories }
  }
}

impl<'de> Deserialize<'de> for DependencyMap {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let value = Value::deserialize(deserializer)?;
    Self::from_value(&value).map_err(serde::de::Error::custom)
  }
}

/// Dependency map with the exclusion set applied to its `js` category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilteredDependencyMap(DependencyMap);

impl FilteredDependencyMap {
  /// A map with no categories, used when no supplementary manifest is available.
  pub fn empty() -> Self {
    Self::default()
  }

  pub(crate) fn new(map: DependencyMap) -> Self {
    Self(map)
  }
}

impl Deref for FilteredDependencyMap {
  type Target = DependencyMap;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

/// Where the running application loads its assets from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
  /// Served from the project sources on a development host.
  Local,
  /// Served from the local build output directory.
  Build,
  /// Served from the remote deployment.
  Deploy,
}

impl DeploymentMode {
  /// Every mode, in table order.
  pub const ALL: [DeploymentMode; 3] = [
    DeploymentMode::Local,
    DeploymentMode::Build,
    DeploymentMode::Deploy,
  ];

  /// Parse a mode name; unknown names yield `None`.
  pub fn from_name(name: &str) -> Option<Self> {
    match name.trim() {
      "local" => Some(DeploymentMode::Local),
      "build" => Some(DeploymentMode::Build),
      "deploy" => Some(DeploymentMode::Deploy),
      _ => None,
    }
  }

  /// Lowercase name of the mode.
  pub fn name(self) -> &'static str {
    match self {
      DeploymentMode::Local => "local",
      DeploymentMode::Build => "build",
      DeploymentMode::Deploy => "deploy",
    }
  }
}

impl fmt::Display for DeploymentMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Stylesheet and base URLs active for one deployment mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssetPathSet {
  /// Stylesheets loaded for every browser, in load order.
  pub css: Vec<String>,
  /// Stylesheets loaded after `css` for legacy browsers only.
  pub ie: Vec<String>,
  /// Base URL for images.
  pub images: String,
  /// Base URL for data files.
  pub data: String,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn parses_categories_in_declaration_order() {
    let map = DependencyMap::from_value(&json!({
      "css": { "b": ["b/b"], "a": ["a/a"] },
      "js": { "z": ["z/z"] }
    }))
    .unwrap();

    let categories: Vec<Category> = map.categories().map(|(category, _)| category).collect();
    assert_eq!(categories, vec![Category::Css, Category::Js]);

    let names: Vec<&String> = map.category(Category::Css).unwrap().keys().collect();
    assert_eq!(names, vec!["b", "a"]);
  }

  #[test]
  fn rejects_unknown_category() {
    let err = DependencyMap::from_value(&json!({ "fonts": {} })).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownCategory { ref category } if category == "fonts"));
  }

  #[test]
  fn rejects_non_sequence_identifier_list() {
    let err = DependencyMap::from_value(&json!({ "js": { "jquery": "jquery/jquery" } })).unwrap_err();
    assert!(matches!(err, ConfigError::NotASequence { ref component, .. } if component == "jquery"));
  }

  #[test]
  fn rejects_non_string_identifiers() {
    let err = DependencyMap::from_value(&json!({ "css": { "leaflet": ["ok", 3] } })).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidIdentifier { index: 1, .. }));
  }

  #[test]
  fn rejects_category_without_mapping() {
    let err = DependencyMap::from_value(&json!({ "ie": ["x"] })).unwrap_err();
    assert!(matches!(err, ConfigError::NotAMapping { ref path } if path == "dependencyMap.ie"));
  }

  #[test]
  fn builds_category_map_from_components() {
    let map = DependencyMap::from_components(vec![
      ComponentEntry {
        name: "leaflet".into(),
        js: vec!["leaflet/leaflet-src".into()],
        css: vec!["leaflet/leaflet".into()],
        ie: vec!["leaflet/leaflet.ie".into()],
      },
      ComponentEntry {
        name: "highcharts".into(),
        js: vec!["highcharts/highcharts".into()],
        ..Default::default()
      },
    ]);

    let js: Vec<&String> = map.category(Category::Js).unwrap().keys().collect();
    assert_eq!(js, vec!["leaflet", "highcharts"]);
    assert_eq!(map.category(Category::Css).unwrap().len(), 1);
    assert_eq!(map.category(Category::Ie).unwrap().len(), 1);
  }

  #[test]
  fn deployment_mode_names_round_trip() {
    for mode in DeploymentMode::ALL {
      assert_eq!(DeploymentMode::from_name(mode.name()), Some(mode));
    }
    assert_eq!(DeploymentMode::from_name("staging"), None);
  }
}
