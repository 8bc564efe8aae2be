//! Process-level property registry.
//!
//! Values set here are visible to every locator in the process and take priority over
//! the environment and `server.properties` when looking for an address override.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

static PROPERTIES: Lazy<RwLock<HashMap<String, String>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Sets `key` to `value`, returning the previous value.
pub fn set_property(key: impl Into<String>, value: impl Into<String>) -> Option<String> {
    let mut props = PROPERTIES.write().unwrap_or_else(|e| e.into_inner());
    props.insert(key.into(), value.into())
}

/// Current value of `key`.
pub fn property(key: &str) -> Option<String> {
    let props = PROPERTIES.read().unwrap_or_else(|e| e.into_inner());
    props.get(key).cloned()
}

/// Removes `key`, returning its value.
pub fn clear_property(key: &str) -> Option<String> {
    let mut props = PROPERTIES.write().unwrap_or_else(|e| e.into_inner());
    props.remove(key)
}
