//! Library side of the `config-locator` binary: settings overlay, property flags and output
//! formatting, kept here so they can be unit tested.

use config::LocatorSettings;
use locator::ServiceEndpoint;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    #[error("invalid property `{0}`: expected KEY=VALUE")]
    Property(String),
}

/// Command-line values that override loaded settings. `None` keeps the loaded value.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverlay {
    pub meta: Option<String>,
    pub app_id: Option<String>,
    pub ip: Option<String>,
}

impl SettingsOverlay {
    pub fn apply(&self, mut settings: LocatorSettings) -> LocatorSettings {
        if let Some(meta) = &self.meta {
            settings = settings.with_meta_domain(meta.as_str());
        }
        if let Some(app_id) = &self.app_id {
            settings = settings.with_app_id(app_id.as_str());
        }
        if let Some(ip) = &self.ip {
            settings = settings.with_local_ip(ip.as_str());
        }
        settings
    }
}

/// Splits `KEY=VALUE`. The key is trimmed and must not be empty; the value is kept as is.
pub fn parse_property(raw: &str) -> Result<(String, String), ArgError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ArgError::Property(raw.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ArgError::Property(raw.to_string()));
    }
    Ok((key.to_string(), value.to_string()))
}

/// One line per endpoint: `homepageUrl appName instanceId`.
pub fn format_text(endpoints: &[ServiceEndpoint]) -> String {
    endpoints
        .iter()
        .map(|e| format!("{} {} {}", e.homepage_url, e.app_name, e.instance_id))
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON array in the meta service's own record format.
pub fn format_json(
    endpoints: &[ServiceEndpoint],
    pretty: bool,
) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(endpoints)
    } else {
        serde_json::to_string(endpoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_property_splits_on_first_equals() {
        assert_eq!(
            parse_property("apollo.configService=http://a:8080?x=1").unwrap(),
            (
                "apollo.configService".to_string(),
                "http://a:8080?x=1".to_string()
            )
        );
    }

    #[test]
    fn parse_property_rejects_missing_key_or_separator() {
        assert!(parse_property("novalue").is_err());
        assert!(parse_property(" =v").is_err());
    }

    #[test]
    fn overlay_replaces_only_given_values() {
        let base = LocatorSettings::default().with_app_id("from-file");
        let overlay = SettingsOverlay {
            meta: Some("http://meta:8080/".to_string()),
            ..Default::default()
        };
        let s = overlay.apply(base);
        assert_eq!(s.meta_domain, "http://meta:8080");
        assert_eq!(s.app_id, "from-file");
        assert_eq!(s.local_ip, None);
    }

    #[test]
    fn text_output_lists_one_endpoint_per_line() {
        let endpoints = vec![
            ServiceEndpoint::new("http://a", "cs", "1"),
            ServiceEndpoint::new("http://b", "cs", "2"),
        ];
        assert_eq!(format_text(&endpoints), "http://a cs 1\nhttp://b cs 2");
    }

    #[test]
    fn json_output_uses_camel_case_fields() {
        let endpoints = vec![ServiceEndpoint::new("http://a", "cs", "1")];
        assert_eq!(
            format_json(&endpoints, false).unwrap(),
            r#"[{"homepageUrl":"http://a","appName":"cs","instanceId":"1"}]"#
        );
    }
}
