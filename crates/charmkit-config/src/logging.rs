use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Supported logging output formats for charm hook invocations.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON, one object per event, suitable for the host's log
    /// forwarding.
    #[default]
    Json,
    /// Human-readable single line output for `debug-log` sessions.
    Compact,
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;
