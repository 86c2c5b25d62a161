//! Deployment mode resolution from the document location.

use tracing::debug;
use url::Url;

use crate::models::DeploymentMode;

/// Returns `true` when `host` (optionally with a port) names a development machine.
pub fn is_local_host(host: &str) -> bool {
  let host = host.trim().to_ascii_lowercase();
  let hostname = match host.strip_prefix('[') {
    Some(rest) => rest.split(']').next().unwrap_or_default(),
    None => host.split(':').next().unwrap_or_default(),
  };

  hostname == "localhost"
    || hostname.ends_with(".localhost")
    || hostname == "127.0.0.1"
    || hostname == "::1"
}

/// Decide the deployment mode for a host and an optional override value.
///
/// The override is only honoured on local hosts so that a production page can never be
/// redirected to another asset set by a query parameter. Unrecognised hosts resolve to
/// [`DeploymentMode::Deploy`], whose fully qualified URLs work from anywhere.
pub fn resolve_mode(host: &str, override_value: Option<&str>) -> DeploymentMode {
  if !is_local_host(host) {
    return DeploymentMode::Deploy;
  }

  match override_value.and_then(DeploymentMode::from_name) {
    Some(mode) => {
      debug!(%host, %mode, "deployment mode overridden");
      mode
    }
    None => DeploymentMode::Local,
  }
}

/// Extract the value of `param` from a URL query string.
///
/// A leading `?` is accepted. The first occurrence wins.
pub fn override_from_query(query: &str, param: &str) -> Option<String> {
  let query = query.trim_start_matches('?');
  url::form_urlencoded::parse(query.as_bytes())
    .find(|(key, _)| key == param)
    .map(|(_, value)| value.into_owned())
}

/// Split a document URL into its `host[:port]` and query string.
///
/// A location without a scheme, such as `localhost:9000/`, is read as `http://`. A URL
/// without a host is rejected.
pub fn split_location(location: &str) -> Result<(String, Option<String>), url::ParseError> {
  let location = location.trim();
  let url = if location.contains("://") {
    Url::parse(location)?
  } else {
    Url::parse(&format!("http://{location}"))?
  };

  let host = match (url.host_str(), url.port()) {
    (Some(""), _) | (None, _) => return Err(url::ParseError::EmptyHost),
    (Some(host), Some(port)) => format!("{host}:{port}"),
    (Some(host), None) => host.to_string(),
  };
  Ok((host, url.query().map(str::to_string)))
}
