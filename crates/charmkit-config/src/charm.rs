//! Charm option values as supplied by the host.
//!
//! The host hands the charm its options as a flat JSON object (the output of
//! `config-get --all --format=json`). Options without a value and without a
//! default are reported as `null`; those are treated as unset and never
//! stored, so "present" always means "has a value".

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single charm option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// `boolean` option.
    Bool(bool),
    /// `int` option.
    Int(i64),
    /// `float` option.
    Float(f64),
    /// `string` option.
    String(String),
}

impl ConfigValue {
    /// Returns the string payload, if this is a string option.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean option.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer option.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns a floating point view of numeric options.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "charm integer options are small enough to be exact in f64"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns `true` for an empty string option.
    #[must_use]
    pub fn is_empty_string(&self) -> bool {
        matches!(self, Self::String(value) if value.is_empty())
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::String(value) => formatter.write_str(value),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Errors raised while parsing host-supplied charm options.
#[derive(Debug, Error)]
pub enum ConfigValueError {
    /// The payload was not a JSON object of scalar values.
    #[error("failed to parse charm options: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The set of charm options currently in effect.
///
/// # Example
///
/// ```
/// use charmkit_config::{CharmConfig, ConfigValue};
///
/// let config = CharmConfig::from_json(r#"{"source": "cloud:jammy-zed", "key": null}"#)
///     .expect("valid options");
/// assert_eq!(config.get("source"), Some(&ConfigValue::from("cloud:jammy-zed")));
/// assert!(!config.contains_key("key"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharmConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl CharmConfig {
    /// Creates an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the host's JSON option dump, dropping `null` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigValueError::Parse`] when the payload is not an object
    /// of scalar values.
    pub fn from_json(payload: &str) -> Result<Self, ConfigValueError> {
        let raw: BTreeMap<String, Option<ConfigValue>> = serde_json::from_str(payload)?;
        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect())
    }

    /// Builder-style insertion, convenient for fixtures.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets an option, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Unsets an option.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.values.remove(key)
    }

    /// Looks up an option.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Returns `true` when the option has a value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterates over options in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the number of options with a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no option has a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CharmConfig
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn from_json_drops_null_options() {
        let config = CharmConfig::from_json(
            r#"{"source": "distro", "key": null, "debug": false, "workers": 4, "ratio": 0.5}"#,
        )
        .expect("parse options");
        assert_eq!(config.len(), 4);
        assert!(!config.contains_key("key"));
        assert_eq!(config.get("debug"), Some(&ConfigValue::Bool(false)));
        assert_eq!(config.get("workers"), Some(&ConfigValue::Int(4)));
        assert_eq!(config.get("ratio"), Some(&ConfigValue::Float(0.5)));
    }

    #[test]
    fn from_json_rejects_non_object_payload() {
        let error = CharmConfig::from_json("[1, 2]").expect_err("array must be rejected");
        assert!(error.to_string().contains("failed to parse charm options"));
    }

    #[rstest]
    #[case::string(ConfigValue::from("lz4"), "lz4")]
    #[case::boolean(ConfigValue::from(true), "true")]
    #[case::integer(ConfigValue::from(65_536_i64), "65536")]
    #[case::float(ConfigValue::from(0.875), "0.875")]
    fn display_renders_the_bare_value(#[case] value: ConfigValue, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[test]
    fn integers_widen_to_floats() {
        assert_eq!(ConfigValue::Int(2).as_f64(), Some(2.0));
        assert_eq!(ConfigValue::from("2").as_f64(), None);
    }

    #[test]
    fn builder_and_remove() {
        let mut config = CharmConfig::new().with("source", "cloud:focal-victoria");
        assert!(config.contains_key("source"));
        assert_eq!(
            config.remove("source"),
            Some(ConfigValue::from("cloud:focal-victoria"))
        );
        assert!(config.is_empty());
    }
}
