//! Optional `resxcodec.toml` configuration.
//!
//! ```toml
//! active = "Resources/Strings.de.resx"
//!
//! [view]
//! max_width = 60
//! ```

use std::path::{Path, PathBuf};

use resxcodec::FocusTracker;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "resxcodec.toml";
pub const ACTIVE_ENV: &str = "RESXCODEC_ACTIVE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Document used by commands run without `-i`.
    pub active: Option<PathBuf>,
    pub view: ViewConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Display width values are truncated to.
    pub max_width: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { max_width: 50 }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("Invalid configuration: {}", e))
    }

    /// Loads `path`, or `resxcodec.toml` in the working directory if it exists.
    ///
    /// An explicitly given file must exist. `RESXCODEC_ACTIVE` overrides `active`.
    pub async fn load(path: Option<&Path>) -> Result<Self, String> {
        let mut config = match path {
            Some(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| format!("Cannot read config '{}': {}", path.display(), e))?;
                Self::from_toml(&text)?
            }
            None => match tokio::fs::read_to_string(DEFAULT_CONFIG_FILE).await {
                Ok(text) => Self::from_toml(&text)?,
                Err(_) => Self::default(),
            },
        };

        if let Some(active) = std::env::var_os(ACTIVE_ENV).filter(|v| !v.is_empty()) {
            config.active = Some(PathBuf::from(active));
        }
        debug!(?config, "loaded configuration");
        Ok(config)
    }

    pub fn focus(&self) -> FocusTracker {
        FocusTracker::with_active(self.active.clone())
    }
}
