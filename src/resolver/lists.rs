use std::collections::HashSet;

use crate::asset_paths::make_library_path;
use crate::models::{Category, FilteredDependencyMap};

use super::flatten;

/// Module name the optimiser uses for the view library.
pub const VIEW_LIBRARY_MODULE: &str = "Ractive";

/// Module name the optimiser uses for the data-binding library.
pub const DATA_BINDING_MODULE: &str = "Backbone";

/// Module names the optimiser must leave out of the bundle.
///
/// These are the `js` component names of the filtered map, concatenated separately into
/// the library artifact, followed by the two sentinel module names.
pub fn build_library_exclusion_list(filtered: &FilteredDependencyMap) -> Vec<String> {
    let components = filtered
        .category(Category::Js)
        .into_iter()
        .flat_map(|entries| entries.keys().cloned());
    let sentinels = [VIEW_LIBRARY_MODULE, DATA_BINDING_MODULE]
        .into_iter()
        .map(String::from);

    first_occurrences(components.chain(sentinels))
}

/// Library files to concatenate for `category`, in cascade order.
///
/// Identifiers are resolved under `library_root` with the category's extension. A path
/// that already appeared earlier in the list is dropped; nothing else is reordered.
pub fn build_concat_list(
    filtered: &FilteredDependencyMap,
    category: Category,
    library_root: &str,
) -> Vec<String> {
    let Some(entries) = filtered.category(category) else {
        return Vec::new();
    };

    first_occurrences(
        flatten(entries)
            .iter()
            .map(|identifier| make_library_path(library_root, identifier, category)),
    )
}

fn first_occurrences(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
