//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/midoctl/midoctl.toml`
//! 3. Environment variables: `MIDOCTL_*` prefix
//! 4. Command-line flags (`--os-url`, `--os-token`), applied by the CLI layer

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Default Neutron API endpoint.
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:9696";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the Neutron API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the Neutron server (without `/v2.0`)
    pub endpoint_url: String,
    /// Pre-issued authentication token, sent as `X-Auth-Token`
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Skip TLS certificate verification
    pub insecure: bool,
    /// Extra CA bundle (PEM) for TLS verification
    pub ca_cert: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            insecure: false,
            ca_cert: None,
        }
    }
}

/// Raw settings for intermediate parsing (every field optional).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub endpoint_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub insecure: Option<bool>,
    pub ca_cert: Option<PathBuf>,
}

/// Get the XDG config directory for midoctl.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "midoctl").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("midoctl.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input untouched on lookup failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            endpoint_url: overlay
                .endpoint_url
                .clone()
                .unwrap_or_else(|| self.endpoint_url.clone()),
            token: overlay.token.clone().or_else(|| self.token.clone()),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
            insecure: overlay.insecure.unwrap_or(self.insecure),
            ca_cert: overlay.ca_cert.clone().or_else(|| self.ca_cert.clone()),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(ca_cert) = &self.ca_cert {
            let expanded = expand_env_vars(ca_cert.to_string_lossy().as_ref());
            self.ca_cert = Some(PathBuf::from(expanded));
        }
    }

    /// Load settings from defaults, the global config file and `MIDOCTL_*` variables.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings using an explicit config file (missing files are skipped).
    ///
    /// The result is not validated: command-line overrides still apply on top,
    /// so callers validate after [`Settings::with_overrides`].
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply MIDOCTL_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("MIDOCTL").try_parsing(true))
            .build()
            .map_err(config_err)?;

        let raw: RawSettings = config.try_deserialize().map_err(config_err)?;
        Ok(settings.merge_with(&raw))
    }

    /// Apply command-line overrides (highest precedence).
    pub fn with_overrides(mut self, endpoint_url: Option<&str>, token: Option<&str>) -> Self {
        if let Some(url) = endpoint_url {
            self.endpoint_url = url.to_string();
        }
        if let Some(token) = token {
            self.token = Some(token.to_string());
        }
        self
    }

    pub fn validate(&self) -> Result<(), ApplicationError> {
        let url = self.endpoint_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ApplicationError::Config {
                message: format!("endpoint_url must be an http(s) URL: {url:?}"),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ApplicationError::Config {
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML, with the token masked.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        let mut shown = self.clone();
        if shown.token.is_some() {
            shown.token = Some("********".to_string());
        }
        toml::to_string_pretty(&shown).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# midoctl configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/midoctl/midoctl.toml
#   Env:    MIDOCTL_* environment variables (e.g. MIDOCTL_ENDPOINT_URL)
#   Flags:  --os-url / --os-token (or OS_URL / OS_TOKEN)

# Neutron API endpoint, without the /v2.0 suffix
# endpoint_url = "{DEFAULT_ENDPOINT_URL}"

# Pre-issued Keystone token sent as X-Auth-Token
# token = "gAAAAAB..."

# Request timeout in seconds
# timeout_secs = {DEFAULT_TIMEOUT_SECS}

# Skip TLS certificate verification
# insecure = false

# Additional CA bundle in PEM format
# ca_cert = "~/.config/midoctl/ca.pem"
"#
        )
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
