//! Presenter configuration.
//!
//! The only process-wide setting is the name of the three request
//! parameters a presenter reads. They default to `count`, `include` and
//! `policies` and can be renamed in code or from a TOML file:
//!
//! ```toml
//! [params]
//! count = "count_only"
//! include = "includes"
//! policies = "with_policies"
//! ```
//!
//! ```rust
//! use prax_presenter_core::config::PresenterConfig;
//!
//! let config = PresenterConfig::from_str("[params]\ninclude = \"includes\"").unwrap();
//! assert_eq!(config.params.include, "includes");
//! assert_eq!(config.params.count, "count");
//! ```

use std::path::Path;
use std::sync::LazyLock;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{PresenterError, PresenterResult};

static CONFIGURATION: LazyLock<RwLock<PresenterConfig>> =
    LazyLock::new(|| RwLock::new(PresenterConfig::default()));

/// Top-level presenter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PresenterConfig {
    /// Request parameter names.
    #[serde(default)]
    pub params: ParamKeys,
}

impl PresenterConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> PresenterResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PresenterError::ConfigurationIo {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> PresenterResult<Self> {
        toml::from_str(content).map_err(|e| PresenterError::InvalidConfiguration { source: e })
    }
}

/// Names of the request parameters read by presenters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParamKeys {
    /// Parameter requesting a count only.
    #[serde(default = "default_count_key")]
    pub count: String,

    /// Parameter listing the collections to include.
    #[serde(default = "default_include_key")]
    pub include: String,

    /// Parameter requesting policy resolution.
    #[serde(default = "default_policies_key")]
    pub policies: String,
}

impl Default for ParamKeys {
    fn default() -> Self {
        Self {
            count: default_count_key(),
            include: default_include_key(),
            policies: default_policies_key(),
        }
    }
}

fn default_count_key() -> String {
    "count".to_string()
}

fn default_include_key() -> String {
    "include".to_string()
}

fn default_policies_key() -> String {
    "policies".to_string()
}

/// Snapshot of the process-wide configuration.
pub fn configuration() -> PresenterConfig {
    CONFIGURATION.read().clone()
}

/// Update the process-wide configuration.
///
/// ```rust
/// use prax_presenter_core::config::{self, PresenterConfig};
///
/// config::configure(|config| config.params.include = "includes".into());
/// assert_eq!(config::configuration().params.include, "includes");
/// # config::configure(|config| *config = PresenterConfig::default());
/// ```
pub fn configure<F>(f: F)
where
    F: FnOnce(&mut PresenterConfig),
{
    let mut config = CONFIGURATION.write();
    f(&mut config);
    tracing::debug!(
        count = %config.params.count,
        include = %config.params.include,
        policies = %config.params.policies,
        "Presenter configuration updated"
    );
}
