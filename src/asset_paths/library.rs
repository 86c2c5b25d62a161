use crate::models::Category;

use super::is_absolute_reference;

/// Resolve a library identifier to the path of its file under the library root.
///
/// The generated path always uses forward slashes so that build plans and stylesheet
/// links are identical on every platform.
pub fn make_library_path(library_root: &str, identifier: &str, category: Category) -> String {
    let root = library_root.trim_end_matches(['/', '\\']);
    let identifier = identifier.trim_start_matches(['/', '\\']);
    let path = if root.is_empty() {
        format!("{}.{}", identifier, category.extension())
    } else {
        format!("{}/{}.{}", root, identifier, category.extension())
    };
    path.replace('\\', "/")
}

/// Resolve a supplementary stylesheet identifier to the href that should be linked.
pub fn stylesheet_href(library_root: &str, identifier: &str) -> String {
    if is_absolute_reference(identifier) {
        identifier.to_string()
    } else {
        make_library_path(library_root, identifier, Category::Css)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_root_identifier_and_extension() {
        let result = make_library_path("bower_components", "leaflet/dist/leaflet", Category::Css);
        assert_eq!(result, "bower_components/leaflet/dist/leaflet.css");
    }

    #[test]
    fn uses_script_extension_for_js() {
        let result = make_library_path("bower_components/", "jquery/jquery", Category::Js);
        assert_eq!(result, "bower_components/jquery/jquery.js");
    }

    #[test]
    fn ie_identifiers_resolve_to_stylesheets() {
        let result = make_library_path("lib", "leaflet/leaflet.ie", Category::Ie);
        assert_eq!(result, "lib/leaflet/leaflet.ie.css");
    }

    #[test]
    fn normalises_backslashes_from_windows_inputs() {
        let result = make_library_path("bower_components", "select2\\select2", Category::Css);
        assert_eq!(result, "bower_components/select2/select2.css");
    }

    #[test]
    fn passes_absolute_stylesheets_through() {
        let href = stylesheet_href("bower_components", "https://cdn.example.com/a.css");
        assert_eq!(href, "https://cdn.example.com/a.css");
    }
}
