use indexmap::IndexMap;

use crate::models::{Category, CategoryMap, DependencyMap, FilteredDependencyMap};
use crate::selection::ComponentExclusion;

/// Remove excluded components from the `js` category.
///
/// `css` and `ie` pass through untouched, and every surviving entry keeps its position.
/// Shape problems are rejected when the [`DependencyMap`] is parsed, so filtering itself
/// cannot fail.
pub fn filter<E: ComponentExclusion>(map: &DependencyMap, exclusions: &E) -> FilteredDependencyMap {
    let categories: IndexMap<Category, CategoryMap> = map
        .categories()
        .map(|(category, entries)| {
            let entries = match category {
                Category::Js => entries
                    .iter()
                    .filter(|(name, _)| !exclusions.is_excluded(name))
                    .map(|(name, identifiers)| (name.clone(), identifiers.clone()))
                    .collect(),
                Category::Css | Category::Ie => entries.clone(),
            };
            (category, entries)
        })
        .collect();

    FilteredDependencyMap::new(DependencyMap::from_parts(categories))
}

/// Concatenate every entry's identifiers in declaration order.
///
/// Duplicates are kept; callers building a file set decide how to collapse them.
pub fn flatten(entries: &CategoryMap) -> Vec<String> {
    entries
        .values()
        .flat_map(|identifiers| identifiers.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::ExclusionSet;
    use serde_json::json;

    fn sample_map() -> DependencyMap {
        DependencyMap::from_value(&json!({
            "js": {
                "jquery": ["jquery/jquery"],
                "ractive": ["ractive/ractive"],
                "underscore": ["underscore/underscore"],
                "leaflet": ["leaflet/leaflet-src", "leaflet/plugins/label"]
            },
            "css": {
                "leaflet": ["leaflet/leaflet"],
                "ractive": ["ractive/theme"]
            },
            "ie": {
                "leaflet": ["leaflet/leaflet.ie"]
            }
        }))
        .unwrap()
    }

    #[test]
    fn drops_excluded_script_components_in_order() {
        let map = sample_map();
        let filtered = filter(&map, &ExclusionSet::new(["underscore"]));

        let js = filtered.category(Category::Js).unwrap();
        assert_eq!(flatten(js), vec![
            "jquery/jquery".to_string(),
            "leaflet/leaflet-src".to_string(),
            "leaflet/plugins/label".to_string(),
        ]);
    }

    #[test]
    fn leaves_stylesheet_categories_untouched() {
        let map = sample_map();
        let filtered = filter(&map, &ExclusionSet::new(["leaflet", "ractive"]));

        assert_eq!(filtered.category(Category::Css), map.category(Category::Css));
        assert_eq!(filtered.category(Category::Ie), map.category(Category::Ie));
    }

    #[test]
    fn keeps_every_identifier_of_non_excluded_components_exactly_once() {
        let map = sample_map();
        let exclusions = ExclusionSet::new(["jquery"]);
        let filtered = filter(&map, &exclusions);
        let flat = flatten(filtered.category(Category::Js).unwrap());

        for (name, identifiers) in map.category(Category::Js).unwrap() {
            for identifier in identifiers {
                let count = flat.iter().filter(|value| *value == identifier).count();
                let expected = usize::from(!exclusions.is_excluded(name));
                assert_eq!(count, expected, "{identifier}");
            }
        }
    }

    #[test]
    fn flatten_keeps_duplicates() {
        let map = DependencyMap::from_value(&json!({
            "css": { "a": ["shared", "a"], "b": ["shared"] }
        }))
        .unwrap();

        assert_eq!(flatten(map.category(Category::Css).unwrap()), vec![
            "shared".to_string(),
            "a".to_string(),
            "shared".to_string(),
        ]);
    }
}
