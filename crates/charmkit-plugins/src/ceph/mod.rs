//! Ceph client charms.
//!
//! Every Ceph client charm exposes the same set of BlueStore compression
//! options. [`CephClientPlugin`] registers a status check that blocks the
//! unit while any of them holds an invalid value, and
//! [`get_bluestore_compression`] turns the valid ones into keyword arguments
//! for pool creation requests.

use std::collections::BTreeMap;

use charmkit::checks::{CheckRegistry, Model, Plugin};
use charmkit::host::ConfigStore;
use charmkit::{CharmError, UnitStatus};
use charmkit_config::ConfigValue;
use thiserror::Error;
use tracing::debug;

const CEPH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::ceph");

/// Name of the status check registered by [`CephClientPlugin`].
pub const BLUESTORE_COMPRESSION_CHECK: &str = "bluestore-compression";

/// Compression algorithms BlueStore understands.
pub const COMPRESSION_ALGORITHMS: &[&str] = &["lz4", "snappy", "zlib", "zstd"];

/// Compression modes BlueStore understands.
pub const COMPRESSION_MODES: &[&str] = &["none", "passive", "aggressive", "force"];

const OPTION_PREFIX: &str = "bluestore-";

#[derive(Debug, Clone, Copy)]
enum OptionKind {
    OneOf(&'static [&'static str]),
    Ratio,
    Size,
}

const COMPRESSION_OPTIONS: [(&str, OptionKind); 9] = [
    (
        "bluestore-compression-algorithm",
        OptionKind::OneOf(COMPRESSION_ALGORITHMS),
    ),
    (
        "bluestore-compression-mode",
        OptionKind::OneOf(COMPRESSION_MODES),
    ),
    ("bluestore-compression-required-ratio", OptionKind::Ratio),
    ("bluestore-compression-min-blob-size", OptionKind::Size),
    ("bluestore-compression-min-blob-size-hdd", OptionKind::Size),
    ("bluestore-compression-min-blob-size-ssd", OptionKind::Size),
    ("bluestore-compression-max-blob-size", OptionKind::Size),
    ("bluestore-compression-max-blob-size-hdd", OptionKind::Size),
    ("bluestore-compression-max-blob-size-ssd", OptionKind::Size),
];

/// Validated compression options keyed by keyword argument name
/// (`compression_mode`, `compression_min_blob_size_hdd`, ...).
pub type CompressionKwargs = BTreeMap<String, ConfigValue>;

/// A BlueStore compression option holds a value Ceph would reject.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressionError {
    /// The value is not one of the accepted choices.
    #[error("{option} must be one of {}; got '{value}'", .allowed.join(", "))]
    NotAllowed {
        /// Offending option.
        option: &'static str,
        /// Value found in the charm options.
        value: String,
        /// Accepted choices.
        allowed: &'static [&'static str],
    },
    /// The value has the wrong type.
    #[error("{option} must be {expected}; got '{value}'")]
    WrongType {
        /// Offending option.
        option: &'static str,
        /// Description of the expected type.
        expected: &'static str,
        /// Value found in the charm options.
        value: String,
    },
    /// The value is outside the accepted range.
    #[error("{option} must be {range}; got '{value}'")]
    OutOfRange {
        /// Offending option.
        option: &'static str,
        /// Description of the accepted range.
        range: &'static str,
        /// Value found in the charm options.
        value: String,
    },
}

/// Reads and validates the BlueStore compression options.
///
/// Unset options and empty strings are ignored. Returns `Ok(None)` when no
/// compression option is configured at all.
///
/// # Errors
///
/// Returns the first [`CompressionError`] found, in option order.
pub fn get_bluestore_compression(
    config: &dyn ConfigStore,
) -> Result<Option<CompressionKwargs>, CompressionError> {
    let mut kwargs = CompressionKwargs::new();
    for (option, kind) in COMPRESSION_OPTIONS {
        let Some(value) = config.get(option).filter(|value| !value.is_empty_string()) else {
            continue;
        };
        validate(option, kind, &value)?;
        kwargs.insert(keyword_for(option), value);
    }
    Ok((!kwargs.is_empty()).then_some(kwargs))
}

fn keyword_for(option: &str) -> String {
    option
        .strip_prefix(OPTION_PREFIX)
        .unwrap_or(option)
        .replace('-', "_")
}

fn validate(
    option: &'static str,
    kind: OptionKind,
    value: &ConfigValue,
) -> Result<(), CompressionError> {
    match kind {
        OptionKind::OneOf(allowed) => {
            let text = value.as_str().ok_or_else(|| CompressionError::WrongType {
                option,
                expected: "a string",
                value: value.to_string(),
            })?;
            if allowed.contains(&text) {
                Ok(())
            } else {
                Err(CompressionError::NotAllowed {
                    option,
                    value: text.to_owned(),
                    allowed,
                })
            }
        }
        OptionKind::Ratio => {
            let ratio = value.as_f64().ok_or_else(|| CompressionError::WrongType {
                option,
                expected: "a number",
                value: value.to_string(),
            })?;
            if (0.0..=1.0).contains(&ratio) {
                Ok(())
            } else {
                Err(CompressionError::OutOfRange {
                    option,
                    range: "between 0 and 1",
                    value: value.to_string(),
                })
            }
        }
        OptionKind::Size => {
            let size = value.as_i64().ok_or_else(|| CompressionError::WrongType {
                option,
                expected: "an integer",
                value: value.to_string(),
            })?;
            if size >= 0 {
                Ok(())
            } else {
                Err(CompressionError::OutOfRange {
                    option,
                    range: "zero or greater",
                    value: value.to_string(),
                })
            }
        }
    }
}

/// Status check reporting invalid compression options.
///
/// Valid or absent options yield an Active status without a message, so the
/// check never changes a healthy unit's status text.
#[must_use]
pub fn check_bluestore_compression(model: &Model<'_>) -> UnitStatus {
    match get_bluestore_compression(model.config) {
        Ok(_) => UnitStatus::ready(),
        Err(error) => {
            debug!(
                target: CEPH_TARGET,
                event = "compression_rejected",
                app = model.app_name,
                %error,
                "BlueStore compression options are invalid"
            );
            UnitStatus::blocked(format!("Invalid configuration: {error}"))
        }
    }
}

/// Plugin contributing the BlueStore compression check.
#[derive(Debug, Clone, Copy, Default)]
pub struct CephClientPlugin;

impl Plugin for CephClientPlugin {
    fn register(&self, checks: &mut CheckRegistry) -> Result<(), CharmError> {
        checks.register_fn(BLUESTORE_COMPRESSION_CHECK, |model| {
            Ok(check_bluestore_compression(model))
        })
    }
}
