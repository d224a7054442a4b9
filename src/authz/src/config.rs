//! Authorization configuration section

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Domain name used when the configured default is empty
pub const DEFAULT_DOMAIN: &str = "default";

/// The `[authz]` configuration section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthzConfig {
    /// Domain `get_default` resolves to; falls back to "default"
    #[serde(default)]
    pub default_domain: String,

    /// Domains known at startup
    #[serde(default)]
    pub domains: Vec<DomainEntry>,
}

/// One configured domain
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DomainEntry {
    /// Domain name
    pub name: String,

    /// Path to the domain's model definition file
    #[serde(default)]
    pub model_path: String,

    /// Inline model definition (takes precedence over `model_path`)
    #[serde(default)]
    pub model_text: String,

    /// Eagerly construct the engine at startup instead of on first request
    #[serde(default)]
    pub auto_load: bool,
}

impl AuthzConfig {
    /// Load the section from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .context("Failed to read authz configuration file")?;

        let config: AuthzConfig =
            toml::from_str(&contents).context("Failed to parse authz configuration file")?;

        Ok(config)
    }

    /// Parse the section from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse authz configuration")
    }

    /// The effective default domain name.
    pub fn default_domain(&self) -> &str {
        if self.default_domain.is_empty() {
            DEFAULT_DOMAIN
        } else {
            &self.default_domain
        }
    }
}
