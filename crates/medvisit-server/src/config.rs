//! Server configuration.
//!
//! Loaded from a TOML file at startup (path from `--config`, the
//! `MEDVISIT_CONFIG` environment variable, or `medvisit.toml`), with every
//! section optional.

use std::net::SocketAddr;

use medvisit_auth::AuthConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Access-engine configuration (bootstrap admin email, listing caps).
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns a message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        let level = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&level.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        if self.auth.admin_list_cap == 0 {
            return Err("auth.admin_list_cap must be > 0".into());
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

pub mod loader {
    use std::path::PathBuf;

    use super::AppConfig;

    /// Loads and validates configuration. A missing file yields the
    /// defaults; a present but malformed file is an error.
    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let pathbuf = PathBuf::from(path.unwrap_or("medvisit.toml"));
        let cfg: AppConfig = if pathbuf.exists() {
            let raw = std::fs::read_to_string(&pathbuf)
                .map_err(|e| format!("config read error ({}): {e}", pathbuf.display()))?;
            toml::from_str(&raw).map_err(|e| format!("config parse error: {e}"))?
        } else {
            AppConfig::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
