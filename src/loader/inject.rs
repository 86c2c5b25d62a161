//! Stylesheet injection into a document head.

use anyhow::{Result, anyhow};

use crate::asset_paths::stylesheet_href;
use crate::models::{AssetPathSet, Category, FilteredDependencyMap};
use crate::resolver::flatten;

/// Target that stylesheet links are appended to.
pub trait DocumentHead {
  /// Append a `<link rel="stylesheet">` for `href` after every earlier link.
  fn append_stylesheet(&mut self, href: &str);
}

/// Head that only records hrefs in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RecordingHead {
  links: Vec<String>,
}

impl RecordingHead {
  /// Recorded hrefs, oldest first.
  pub fn links(&self) -> &[String] {
    &self.links
  }
}

impl DocumentHead for RecordingHead {
  fn append_stylesheet(&mut self, href: &str) {
    self.links.push(href.to_string());
  }
}

/// Head that renders link tags for a static HTML page.
#[derive(Debug, Clone, Default)]
pub struct HtmlHead {
  tags: Vec<String>,
}

impl HtmlHead {
  /// Rendered tags, one per line.
  pub fn render(&self) -> String {
    self.tags.join("\n")
  }

  /// Insert the rendered tags right before the closing `</head>` of `html`.
  pub fn splice_into(&self, html: &str) -> Result<String> {
    // ASCII lowercasing keeps byte offsets, so the position indexes `html` too.
    let position = html
      .to_ascii_lowercase()
      .find("</head>")
      .ok_or_else(|| anyhow!("document has no closing </head> tag"))?;

    let mut output = String::with_capacity(html.len() + self.tags.len() * 64);
    output.push_str(&html[..position]);
    for tag in &self.tags {
      output.push_str("  ");
      output.push_str(tag);
      output.push('\n');
    }
    output.push_str(&html[position..]);
    Ok(output)
  }
}

impl DocumentHead for HtmlHead {
  fn append_stylesheet(&mut self, href: &str) {
    self.tags.push(format!(
      r#"<link rel="stylesheet" href="{}" type="text/css" />"#,
      escape_attribute(href)
    ));
  }
}

fn escape_attribute(value: &str) -> String {
  value
    .replace('&', "&amp;")
    .replace('"', "&quot;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
}

/// Append every stylesheet for the active path set and supplementary map.
///
/// Order: supplementary `css`, path set `css`, then for legacy browsers supplementary `ie`
/// and path set `ie`, so legacy overrides load last. Returns the number of links appended.
pub fn inject_assets<H: DocumentHead>(
  path_set: &AssetPathSet,
  supplementary: &FilteredDependencyMap,
  legacy_browser: bool,
  library_root: &str,
  head: &mut H,
) -> usize {
  let mut count = 0;
  let mut append = |href: &str| {
    head.append_stylesheet(href);
    count += 1;
  };

  let mut categories = vec![(Category::Css, &path_set.css)];
  if legacy_browser {
    categories.push((Category::Ie, &path_set.ie));
  }

  for (category, baseline) in categories {
    if let Some(entries) = supplementary.category(category) {
      for identifier in flatten(entries) {
        append(stylesheet_href(library_root, &identifier).as_str());
      }
    }
    for href in baseline {
      append(href.as_str());
    }
  }

  count
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::DependencyMap;
  use serde_json::json;

  fn supplementary() -> FilteredDependencyMap {
    FilteredDependencyMap::new(
      DependencyMap::from_value(&json!({
        "css": { "s": ["s1"] },
        "ie": { "s": ["si"] }
      }))
      .unwrap(),
    )
  }

  fn path_set() -> AssetPathSet {
    AssetPathSet {
      css: vec!["p1".into(), "p2".into()],
      ie: vec!["pi".into()],
      images: "images/".into(),
      data: "data/".into(),
    }
  }

  #[test]
  fn supplementary_styles_load_before_baseline() {
    let mut head = RecordingHead::default();
    let count = inject_assets(&path_set(), &supplementary(), false, "", &mut head);

    assert_eq!(count, 3);
    assert_eq!(head.links(), ["s1.css", "p1", "p2"]);
  }

  #[test]
  fn legacy_styles_load_last() {
    let mut head = RecordingHead::default();
    let count = inject_assets(&path_set(), &supplementary(), true, "", &mut head);

    assert_eq!(count, 5);
    assert_eq!(head.links(), ["s1.css", "p1", "p2", "si.css", "pi"]);
  }

  #[test]
  fn supplementary_identifiers_resolve_under_library_root() {
    let mut head = RecordingHead::default();
    inject_assets(&path_set(), &supplementary(), false, "bower_components", &mut head);
    assert_eq!(head.links()[0], "bower_components/s1.css");
  }

  #[test]
  fn empty_supplementary_map_only_injects_baseline() {
    let mut head = RecordingHead::default();
    inject_assets(&path_set(), &FilteredDependencyMap::empty(), false, "bower_components", &mut head);
    assert_eq!(head.links(), ["p1", "p2"]);
  }

  #[test]
  fn html_head_renders_and_splices_links() {
    let mut head = HtmlHead::default();
    head.append_stylesheet("dist/app.latest.min.css");
    head.append_stylesheet("a\"b.css");

    assert_eq!(
      head.render(),
      "<link rel=\"stylesheet\" href=\"dist/app.latest.min.css\" type=\"text/css\" />\n\
       <link rel=\"stylesheet\" href=\"a&quot;b.css\" type=\"text/css\" />"
    );

    let page = head
      .splice_into("<html><head><title>x</title></HEAD><body></body></html>")
      .unwrap();
    let link = page.find("app.latest.min.css").unwrap();
    let close = page.find("</HEAD>").unwrap();
    assert!(link < close);
  }

  #[test]
  fn splice_matches_mixed_case_head_after_multibyte_text() {
    let mut head = HtmlHead::default();
    head.append_stylesheet("app.css");

    let page = head
      .splice_into("<head><title>Élection</title></Head><body></body>")
      .unwrap();
    assert_eq!(
      page,
      "<head><title>Élection</title>  <link rel=\"stylesheet\" href=\"app.css\" type=\"text/css\" />\n</Head><body></body>"
    );
  }

  #[test]
  fn splice_requires_head() {
    let head = HtmlHead::default();
    assert!(head.splice_into("<body></body>").is_err());
  }
}
