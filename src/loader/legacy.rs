//! User-agent classification for browsers needing the separate legacy stylesheets.

use regex::Regex;

/// Highest Internet Explorer version that receives the legacy stylesheets.
pub const LEGACY_MSIE_MAX: u32 = 8;

fn msie_pattern() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"(?i)\bMSIE\s+(\d+)").expect("invalid MSIE regex"))
}

/// Internet Explorer major version announced by a user agent, if any.
pub fn msie_version(user_agent: &str) -> Option<u32> {
  msie_pattern()
    .captures(user_agent)
    .and_then(|caps| caps.get(1))
    .and_then(|version| version.as_str().parse().ok())
}

/// Returns `true` for user agents that need the legacy stylesheet set.
pub fn is_legacy_browser(user_agent: &str) -> bool {
  msie_version(user_agent).is_some_and(|version| version <= LEGACY_MSIE_MAX)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detects_old_internet_explorer() {
    let ua = "Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.1; Trident/4.0)";
    assert_eq!(msie_version(ua), Some(8));
    assert!(is_legacy_browser(ua));
  }

  #[test]
  fn newer_internet_explorer_is_not_legacy() {
    let ua = "Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.2; Trident/6.0)";
    assert_eq!(msie_version(ua), Some(10));
    assert!(!is_legacy_browser(ua));
  }

  #[test]
  fn other_browsers_are_not_legacy() {
    let ua = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
    assert_eq!(msie_version(ua), None);
    assert!(!is_legacy_browser(ua));
  }
}
