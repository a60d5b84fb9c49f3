use crate::error::AppError;
use frame_client::{ClientConfig, FetchParameters, TransportConfig, KNOWN_ORDERINGS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file when no argument is given
pub const CONFIG_ENV: &str = "PHOTOFRAME_CONFIG";

/// Photo frame settings, read from TOML. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrameConfig {
    pub backend_url: String,
    /// Images per page
    pub count: u32,
    pub ordering: String,
    /// Seconds between automatic refreshes; 0 fetches once and exits
    pub refresh_interval_secs: u64,
    /// Seconds each image stays on screen
    pub slide_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        let parameters = FetchParameters::default();
        Self {
            backend_url: "http://localhost:8080".to_string(),
            count: parameters.count,
            ordering: parameters.ordering,
            refresh_interval_secs: 300,
            slide_interval_secs: 15,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl FrameConfig {
    pub fn from_toml(s: &str) -> Result<Self, AppError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load from `path`, or fall back to defaults when there is none
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            log::info!("No config file given, using defaults");
            return Ok(Self::default());
        };

        log::info!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Config path from the first CLI argument, else from `PHOTOFRAME_CONFIG`
    pub fn locate(mut args: impl Iterator<Item = String>) -> Option<PathBuf> {
        args.next()
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.count == 0 {
            return Err(AppError::Validation("count must be at least 1".to_string()));
        }
        if self.slide_interval_secs == 0 {
            return Err(AppError::Validation(
                "slide_interval_secs must be at least 1".to_string(),
            ));
        }
        frame_client::service::images_endpoint(&self.backend_url)?;

        // The backend decides what it accepts; only warn here
        if !KNOWN_ORDERINGS.contains(&self.ordering.as_str()) {
            log::warn!(
                "Ordering '{}' is not one of {:?}; sending it anyway",
                self.ordering,
                KNOWN_ORDERINGS
            );
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.backend_url.clone(),
            parameters: FetchParameters {
                count: self.count,
                ordering: self.ordering.clone(),
            },
        }
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            ..TransportConfig::default()
        }
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }

    pub fn slide_interval(&self) -> Duration {
        Duration::from_secs(self.slide_interval_secs)
    }
}
