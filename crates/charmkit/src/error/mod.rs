//! Errors raised by charm lifecycle handlers.
//!
//! Only two things can fail a handler outright: the package manager during
//! install, which is fatal for the hook, and charm-supplied hook code. Every
//! other problem (missing options, missing relations, unhealthy services) is
//! reported through the unit status instead of an error.

use strum::Display;
use thiserror::Error;

/// Package manager operations performed by the install handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum PackageOperation {
    /// Registering an additional package source.
    AddSource,
    /// Refreshing the package index.
    UpdateIndex,
    /// Installing the charm's payload packages.
    Install,
}

/// Failure reported by a [`PackageManager`](crate::host::PackageManager).
#[derive(Debug, Error)]
#[error("{operation} failed: {message}")]
pub struct PackageError {
    /// Operation that failed.
    pub operation: PackageOperation,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl PackageError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(operation: PackageOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        operation: PackageOperation,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            operation,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable message describing the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Errors returned by charm construction and lifecycle handlers.
#[derive(Debug, Error)]
pub enum CharmError {
    /// A package operation failed during install. The hook must abort.
    #[error("fatal package failure: {0}")]
    Package(#[from] PackageError),

    /// A status check was registered twice under the same name.
    #[error("status check '{name}' is already registered")]
    DuplicateCheck {
        /// Name that was registered twice.
        name: String,
    },

    /// A status check was registered without a name.
    #[error("status check name must not be empty")]
    EmptyCheckName,

    /// Charm-specific hook code failed.
    #[error("{hook} hook failed: {message}")]
    Hook {
        /// Hook that was running.
        hook: String,
        /// Description of the failure.
        message: String,
        /// Optional underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CharmError {
    /// Builds a [`CharmError::Hook`] wrapping an underlying error.
    #[must_use]
    pub fn hook(
        hook: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Hook {
            hook: hook.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns `true` when the driver must abort the hook process.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Package(_))
    }
}

#[cfg(test)]
mod tests;
