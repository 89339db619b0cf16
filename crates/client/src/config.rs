//! Backend endpoint configuration.
//!
//! Each field resolves independently: explicit override, then environment
//! variable, then the config file, then the built-in default.
//!
//! # Example
//!
//! ```toml
//! [backend]
//! api_base_url = "https://sts.example.com/api"
//! proxy_url = "https://forms.example.com/api/sts-proxy"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000/api/sts-proxy";

pub const API_BASE_URL_ENV: &str = "STS_API_BASE_URL";
pub const PROXY_URL_ENV: &str = "STS_PROXY_URL";

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "sts.toml";

// ── Types ─────────────────────────────────────────────────────────────

/// Resolved endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StsConfig {
    /// Backend API base; signature image paths are resolved against its host.
    pub api_base_url: String,
    /// Base of the `<slug>` proxy endpoints.
    pub proxy_url: String,
}

impl Default for StsConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            proxy_url: DEFAULT_PROXY_URL.to_string(),
        }
    }
}

/// Values given explicitly, e.g. on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub proxy_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    backend: BackendSection,
}

/// `[backend]` section.
#[derive(Debug, Default, Deserialize)]
struct BackendSection {
    api_base_url: Option<String>,
    proxy_url: Option<String>,
}

// ── Loading ───────────────────────────────────────────────────────────

impl StsConfig {
    /// Resolve the configuration from the process environment.
    ///
    /// `path` must exist when given. Without it, `./sts.toml` is read if present.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => read_config_file(path)?,
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    read_config_file(implicit)?
                } else {
                    ConfigFile::default()
                }
            }
        };
        Ok(resolve(file, overrides, |key| std::env::var(key).ok()))
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(file)
}

fn resolve(
    file: ConfigFile,
    overrides: &ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> StsConfig {
    let pick = |flag: &Option<String>, key: &str, from_file: Option<String>, default: &str| {
        flag.clone()
            .or_else(|| env(key))
            .or(from_file)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };

    StsConfig {
        api_base_url: pick(
            &overrides.api_base_url,
            API_BASE_URL_ENV,
            file.backend.api_base_url,
            DEFAULT_API_BASE_URL,
        ),
        proxy_url: pick(
            &overrides.proxy_url,
            PROXY_URL_ENV,
            file.backend.proxy_url,
            DEFAULT_PROXY_URL,
        ),
    }
}
