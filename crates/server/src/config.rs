//! Server settings read from the environment.

use crate::error::ServerError;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CATALOG_PATH: &str = "netflix_titles.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Listener address; the service only binds to loopback
    pub host: IpAddr,
    pub port: u16,
    /// Catalog CSV the model is trained on
    pub catalog_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
        }
    }
}

impl Settings {
    /// Read `PORT` and `CATALOG_PATH`, falling back to defaults.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(port) = lookup("PORT") {
            settings.port = port
                .trim()
                .parse::<u16>()
                .map_err(|e| ServerError::Config(format!("Invalid PORT {port:?}: {e}")))?;
        }
        if let Some(path) = lookup("CATALOG_PATH") {
            settings.catalog_path = PathBuf::from(path);
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), ServerError> {
        validate_port(self.port)?;
        if self.catalog_path.as_os_str().is_empty() {
            return Err(ServerError::Config("CATALOG_PATH cannot be empty".into()));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Validates that the port is in valid range (1-65535).
fn validate_port(port: u16) -> Result<(), ServerError> {
    if port == 0 {
        return Err(ServerError::Config("Port cannot be 0".into()));
    }
    Ok(())
}
