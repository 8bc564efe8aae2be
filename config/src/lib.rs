//! Local host configuration for the config service locator.
//!
//! Two things live here:
//!
//! * [`ServerProperties`]: the host-wide `server.properties` file (Java `.properties` syntax),
//!   consulted as the last override source for config service addresses.
//! * [`LocatorSettings`]: meta domain, app id, local IP and intervals, resolved with priority
//!   **process env > XDG `config.toml` `[locator]` table > defaults**.

mod server_properties;
mod settings;
mod xdg_toml;

use thiserror::Error;

pub use server_properties::{default_server_properties_path, ServerProperties};
pub use settings::{
    refresh_period, retry_delay, LocatorSettings, TimeUnit, DEFAULT_META_DOMAIN,
    DEFAULT_REFRESH_INTERVAL, DEFAULT_RETRY_INTERVAL, ENV_APP_ID, ENV_LOCAL_IP, ENV_META,
    MAX_INTERVAL, MIN_REFRESH_INTERVAL,
};
pub use xdg_toml::{load_locator_table, read_locator_table, LocatorTable};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read server properties: {0}")]
    PropertiesRead(std::io::Error),
}
