use regex::Regex;

fn absolute_reference_patterns() -> &'static [Regex] {
    use std::sync::OnceLock;

    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            vec![
                Regex::new(r"(?i)^https?://").expect("invalid http(s) regex"),
                Regex::new(r"^//").expect("invalid protocol-relative regex"),
                Regex::new(r"(?i)^data:").expect("invalid data URI regex"),
            ]
        })
        .as_slice()
}

/// Determine whether a stylesheet reference already points at a complete location.
///
/// Such references are linked as-is instead of being resolved against the library root.
pub fn is_absolute_reference(value: &str) -> bool {
    absolute_reference_patterns()
        .iter()
        .any(|pattern| pattern.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::is_absolute_reference;

    #[test]
    fn detects_http_urls() {
        assert!(is_absolute_reference("https://cdn.example.com/x.css"));
        assert!(is_absolute_reference("HTTP://cdn.example.com/x.css"));
    }

    #[test]
    fn detects_protocol_relative_urls() {
        assert!(is_absolute_reference("//cdn.example.com/x.css"));
    }

    #[test]
    fn keeps_library_identifiers_relative() {
        assert!(!is_absolute_reference("leaflet/dist/leaflet"));
    }
}
