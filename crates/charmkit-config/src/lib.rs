//! Configuration shared by charmkit charms.
//!
//! Two kinds of configuration live here. [`RuntimeConfig`] governs how the
//! charm process itself behaves (log filter and format) and is layered by
//! `ortho_config` from defaults, an optional `charmkit.toml`, `CHARMKIT_*`
//! environment variables and command-line flags. [`CharmConfig`] is the set of
//! operator-facing charm options supplied by the host on every hook.

mod charm;
mod defaults;
mod logging;

use serde::{Deserialize, Serialize};

pub use charm::{CharmConfig, ConfigValue, ConfigValueError};
pub use defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use ortho_config::{OrthoConfig, OrthoError};

/// Process-level settings for a charm hook invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "CHARMKIT")]
pub struct RuntimeConfig {
    /// `tracing` filter expression, e.g. `info,charmkit::status=debug`.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for structured logs.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl RuntimeConfig {
    /// Returns the configured log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
