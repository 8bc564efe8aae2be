//! Parse the host-level `server.properties` file into a key-value map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::LoadError;

/// Location of `server.properties` when nothing else is configured.
pub fn default_server_properties_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("C:/opt/settings/server.properties")
    } else {
        PathBuf::from("/opt/settings/server.properties")
    }
}

/// Properties read from the host's `server.properties`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerProperties {
    values: HashMap<String, String>,
}

impl ServerProperties {
    /// An empty property set (no file on this host).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a property set from literal pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses properties from text.
    pub fn parse(content: &str) -> Self {
        Self {
            values: parse_properties(content),
        }
    }

    /// Loads `path`. A missing file yields an empty set.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "server properties not found");
            return Ok(Self::empty());
        }
        let content = std::fs::read_to_string(path).map_err(LoadError::PropertiesRead)?;
        Ok(Self::parse(&content))
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for `key`, or `default` when absent.
    pub fn get_or<'a>(&'a self, key: &str, default: Option<&'a str>) -> Option<&'a str> {
        self.get(key).or(default)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Minimal `.properties` parser: one `key=value` or `key: value` per line.
///
/// * The separator is whichever of `=` or `:` appears first; keys and values are trimmed.
/// * Lines starting with `#` or `!` (after trim) are comments.
/// * A value wrapped in matching double or single quotes is unwrapped.
/// * No line continuation and no unicode escapes.
fn parse_properties(content: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some(idx) = line.find(['=', ':']) else {
            continue;
        };
        let key = line[..idx].trim();
        let value = line[idx + 1..].trim();
        let value = ['"', '\'']
            .iter()
            .find_map(|q| value.strip_prefix(*q).and_then(|s| s.strip_suffix(*q)))
            .unwrap_or(value);
        if !key.is_empty() {
            out.insert(key.to_string(), value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_equals_and_colon_separators() {
        let m = parse_properties("env=DEV\nidc: SHAOY\n");
        assert_eq!(m.get("env"), Some(&"DEV".to_string()));
        assert_eq!(m.get("idc"), Some(&"SHAOY".to_string()));
    }

    #[test]
    fn url_value_keeps_its_colons() {
        let m = parse_properties("apollo.configService=http://a:8080,http://b:8080\n");
        assert_eq!(
            m.get("apollo.configService"),
            Some(&"http://a:8080,http://b:8080".to_string())
        );
    }

    #[test]
    fn skip_comments_and_empty() {
        let m = parse_properties("\n# comment\n! also comment\nKEY=val\n  \n");
        assert_eq!(m.get("KEY"), Some(&"val".to_string()));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn quoted_values_are_unwrapped() {
        let m = parse_properties("A=\"quoted value\"\nB='single'\n");
        assert_eq!(m.get("A"), Some(&"quoted value".to_string()));
        assert_eq!(m.get("B"), Some(&"single".to_string()));
    }

    #[test]
    fn line_without_separator_and_empty_key_skipped() {
        let m = parse_properties("NOT_KEY_VALUE\n=value_only\nKEY=ok\n");
        assert_eq!(m.get("KEY"), Some(&"ok".to_string()));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn empty_value_is_kept() {
        let m = parse_properties("KEY=\n");
        assert_eq!(m.get("KEY"), Some(&"".to_string()));
    }

    #[test]
    fn get_or_falls_back_to_default() {
        let props = ServerProperties::from_pairs([("a", "1")]);
        assert_eq!(props.get_or("a", None), Some("1"));
        assert_eq!(props.get_or("missing", Some("d")), Some("d"));
        assert_eq!(props.get_or("missing", None), None);
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let props = ServerProperties::load(&dir.path().join("server.properties")).unwrap();
        assert!(props.is_empty());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.properties");
        std::fs::write(&path, "env=PRO\napollo.configService=http://cs:8080\n").unwrap();
        let props = ServerProperties::load(&path).unwrap();
        assert_eq!(props.get("env"), Some("PRO"));
        assert_eq!(props.get("apollo.configService"), Some("http://cs:8080"));
    }
}
