//! Load the `[locator]` table from `$XDG_CONFIG_HOME/<app>/config.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::settings::TimeUnit;
use crate::LoadError;

fn xdg_config_path(app_name: &str) -> Result<Option<PathBuf>, LoadError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| LoadError::XdgPath("no config directory on this platform".to_string()))?;
    let path = config_dir.join(app_name).join("config.toml");
    if path.exists() {
        Ok(Some(path))
    } else {
        Ok(None)
    }
}

/// Raw `[locator]` table. Every field is optional; unset fields fall back to defaults.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LocatorTable {
    pub meta_domain: Option<String>,
    pub app_id: Option<String>,
    pub local_ip: Option<String>,
    pub refresh_interval: Option<u64>,
    pub refresh_interval_unit: Option<TimeUnit>,
    pub retry_interval: Option<u64>,
    pub retry_interval_unit: Option<TimeUnit>,
    pub server_properties: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    locator: LocatorTable,
}

/// Returns the `[locator]` table for `app_name`. Missing file or section returns an empty table.
pub fn load_locator_table(app_name: &str) -> Result<LocatorTable, LoadError> {
    match xdg_config_path(app_name)? {
        Some(path) => read_locator_table(&path),
        None => Ok(LocatorTable::default()),
    }
}

/// Reads the `[locator]` table from an explicit `config.toml` path.
pub fn read_locator_table(path: &Path) -> Result<LocatorTable, LoadError> {
    let content = std::fs::read_to_string(path).map_err(LoadError::XdgRead)?;
    let config: ConfigFile = toml::from_str(&content)?;
    Ok(config.locator)
}
