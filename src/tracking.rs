//! Click tracking: UTM tagging and the optional redirect hop.

use crate::template::has_markers;
use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

/// Link tracking settings for one compile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackingConfig {
    /// Route clicks through `endpoint` before forwarding to the destination
    pub enable_tracking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_id: Option<String>,
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl TrackingConfig {
    /// Configured UTM parameters with non-empty values
    pub fn utm_params(&self) -> Vec<(&'static str, &str)> {
        [
            ("utm_source", &self.utm_source),
            ("utm_medium", &self.utm_medium),
            ("utm_campaign", &self.utm_campaign),
            ("utm_content", &self.utm_content),
            ("utm_term", &self.utm_term),
            ("utm_id", &self.utm_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| filled(value).map(|v| (key, v)))
        .collect()
    }

    fn redirect_endpoint(&self) -> Option<&str> {
        if self.enable_tracking {
            filled(&self.endpoint)
        } else {
            None
        }
    }

    pub fn resolve(&self, url: &str, link_tracking_disabled: bool) -> String {
        resolve(url, link_tracking_disabled, self)
    }
}

/// Final destination for a link.
///
/// Empty URLs, templated URLs, non-http(s) schemes and unparseable URLs are
/// returned unchanged, as is every URL whose link opted out of tracking.
pub fn resolve(url: &str, link_tracking_disabled: bool, config: &TrackingConfig) -> String {
    if link_tracking_disabled || !is_rewritable(url) {
        return url.to_string();
    }

    let tagged = add_utm_params(url, config);
    let resolved = match config.redirect_endpoint() {
        Some(endpoint) => redirect_url(endpoint, &tagged, config),
        None => tagged,
    };
    if resolved != url {
        log::trace!("rewrote link {} -> {}", url, resolved);
    }
    resolved
}

fn is_rewritable(url: &str) -> bool {
    if url.trim().is_empty() || has_markers(url) {
        return false;
    }
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Adds missing UTM parameters. The query is re-serialized sorted by key;
/// everything before it and the fragment are kept as written.
fn add_utm_params(url: &str, config: &TrackingConfig) -> String {
    let params = config.utm_params();
    if params.is_empty() {
        return url.to_string();
    }

    let (without_fragment, fragment) = match url.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (url, None),
    };
    let (base, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));

    let mut pairs: Vec<(String, String)> =
        form_urlencoded::parse(query.as_bytes()).into_owned().collect();
    if pairs.iter().any(|(key, _)| key == "utm_source") {
        return url.to_string();
    }
    for (key, value) in params {
        if !pairs.iter().any(|(existing, _)| existing == key) {
            pairs.push((key.to_string(), value.to_string()));
        }
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(&pairs)
        .finish();
    let mut out = format!("{}?{}", base, query);
    if let Some(frag) = fragment {
        out.push('#');
        out.push_str(frag);
    }
    out
}

/// `{endpoint}?mid=..&url=..&wid=..`, omitting identifiers that are not set
fn redirect_url(endpoint: &str, destination: &str, config: &TrackingConfig) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    if let Some(mid) = filled(&config.message_id) {
        serializer.append_pair("mid", mid);
    }
    serializer.append_pair("url", destination);
    if let Some(wid) = filled(&config.workspace_id) {
        serializer.append_pair("wid", wid);
    }
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{}{}{}", endpoint, separator, serializer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utm(source: &str) -> TrackingConfig {
        TrackingConfig {
            utm_source: Some(source.to_string()),
            ..TrackingConfig::default()
        }
    }

    #[test]
    fn test_adds_utm_source() {
        assert_eq!(
            resolve("https://example.com", false, &utm("x")),
            "https://example.com?utm_source=x"
        );
    }

    #[test]
    fn test_existing_utm_source_is_kept() {
        let url = "https://example.com?utm_source=orig";
        assert_eq!(resolve(url, false, &utm("x")), url);
    }

    #[test]
    fn test_skips_non_http_and_templated() {
        assert_eq!(resolve("mailto:a@b.com", false, &utm("x")), "mailto:a@b.com");
        assert_eq!(resolve("tel:+15550100", false, &utm("x")), "tel:+15550100");
        assert_eq!(resolve("{{ var }}", false, &utm("x")), "{{ var }}");
        assert_eq!(resolve("", false, &utm("x")), "");
        assert_eq!(resolve("not a url", false, &utm("x")), "not a url");
    }

    #[test]
    fn test_link_opt_out_wins() {
        let mut config = utm("x");
        config.enable_tracking = true;
        config.endpoint = Some("https://t.example.com/visit".to_string());
        assert_eq!(
            resolve("https://example.com", true, &config),
            "https://example.com"
        );
    }

    #[test]
    fn test_query_sorted_and_fragment_kept() {
        let config = TrackingConfig {
            utm_source: Some("newsletter".to_string()),
            utm_medium: Some("email".to_string()),
            utm_campaign: Some("spring sale".to_string()),
            utm_content: Some(String::new()),
            ..TrackingConfig::default()
        };
        assert_eq!(
            resolve("https://shop.example.com/p?z=1&a=2#top", false, &config),
            "https://shop.example.com/p?a=2&utm_campaign=spring+sale&utm_medium=email&utm_source=newsletter&z=1#top"
        );
    }

    #[test]
    fn test_existing_utm_parameter_not_overwritten() {
        let config = TrackingConfig {
            utm_source: Some("x".to_string()),
            utm_medium: Some("email".to_string()),
            ..TrackingConfig::default()
        };
        assert_eq!(
            resolve("https://example.com/?utm_medium=social", false, &config),
            "https://example.com/?utm_medium=social&utm_source=x"
        );
    }

    #[test]
    fn test_no_utm_configured_is_unchanged() {
        let url = "https://example.com/?b=1&a=2";
        assert_eq!(resolve(url, false, &TrackingConfig::default()), url);
    }

    #[test]
    fn test_redirect_mode() {
        let config = TrackingConfig {
            enable_tracking: true,
            endpoint: Some("https://t.example.com/visit".to_string()),
            workspace_id: Some("ws1".to_string()),
            message_id: Some("m-42".to_string()),
            utm_source: Some("x".to_string()),
            ..TrackingConfig::default()
        };
        assert_eq!(
            resolve("https://example.com/a", false, &config),
            "https://t.example.com/visit?mid=m-42&url=https%3A%2F%2Fexample.com%2Fa%3Futm_source%3Dx&wid=ws1"
        );
        assert_eq!(resolve("mailto:a@b.com", false, &config), "mailto:a@b.com");
    }

    #[test]
    fn test_redirect_requires_endpoint() {
        let config = TrackingConfig {
            enable_tracking: true,
            ..TrackingConfig::default()
        };
        assert_eq!(resolve("https://example.com", false, &config), "https://example.com");
    }
}
