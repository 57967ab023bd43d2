//! Pluggable status checks.
//!
//! Charms and plugins contribute to the unit status by registering named
//! checks in a [`CheckRegistry`] while the charm is being built. Checks run
//! in registration order every time the status is evaluated. A check returns
//! an Active status to let evaluation continue (its message, if any, joins
//! the final Active message), any other status to stop evaluation, or
//! [`NoOpinion`] to be skipped.

use std::fmt;

use thiserror::Error;

use crate::error::CharmError;
use crate::host::{ConfigStore, RelationStore};
use crate::status::UnitStatus;

/// Read-only view of the host handed to status checks.
#[derive(Clone, Copy)]
pub struct Model<'a> {
    /// Name of the application this unit belongs to.
    pub app_name: &'a str,
    /// Charm options.
    pub config: &'a dyn ConfigStore,
    /// Established relations.
    pub relations: &'a dyn RelationStore,
}

impl fmt::Debug for Model<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Model")
            .field("app_name", &self.app_name)
            .finish_non_exhaustive()
    }
}

/// Signal returned by a check that has nothing to contribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Error)]
#[error("status check declined to report")]
pub struct NoOpinion;

/// Result of running a single status check.
pub type CheckOutcome = Result<UnitStatus, NoOpinion>;

/// A contributor to the unit status.
pub trait StatusCheck {
    /// Inspects the model and reports a status, or declines.
    ///
    /// # Errors
    ///
    /// Returns [`NoOpinion`] when the check does not apply to this charm.
    fn check(&self, model: &Model<'_>) -> CheckOutcome;
}

struct FnCheck<F>(F);

impl<F> StatusCheck for FnCheck<F>
where
    F: Fn(&Model<'_>) -> CheckOutcome,
{
    fn check(&self, model: &Model<'_>) -> CheckOutcome {
        (self.0)(model)
    }
}

struct RegisteredCheck {
    name: String,
    check: Box<dyn StatusCheck>,
}

/// Ordered collection of uniquely named status checks.
///
/// # Example
///
/// ```
/// use charmkit::checks::CheckRegistry;
/// use charmkit::UnitStatus;
///
/// let mut registry = CheckRegistry::new();
/// registry
///     .register_fn("always-ready", |_model| Ok(UnitStatus::ready()))
///     .expect("registration succeeds");
/// assert_eq!(registry.names(), vec!["always-ready"]);
/// ```
#[derive(Default)]
pub struct CheckRegistry {
    checks: Vec<RegisteredCheck>,
}

impl CheckRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a check.
    ///
    /// # Errors
    ///
    /// Returns [`CharmError::EmptyCheckName`] for a blank name and
    /// [`CharmError::DuplicateCheck`] when the name is already taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        check: impl StatusCheck + 'static,
    ) -> Result<(), CharmError> {
        let check_name = name.into();
        if check_name.trim().is_empty() {
            return Err(CharmError::EmptyCheckName);
        }
        if self.contains(&check_name) {
            return Err(CharmError::DuplicateCheck { name: check_name });
        }
        tracing::debug!(
            target: "charmkit::checks",
            event = "check_registered",
            check = %check_name,
            position = self.checks.len(),
            "registered status check"
        );
        self.checks.push(RegisteredCheck {
            name: check_name,
            check: Box::new(check),
        });
        Ok(())
    }

    /// Appends a closure as a check.
    ///
    /// # Errors
    ///
    /// Same as [`CheckRegistry::register`].
    pub fn register_fn<F>(&mut self, name: impl Into<String>, check: F) -> Result<(), CharmError>
    where
        F: Fn(&Model<'_>) -> CheckOutcome + 'static,
    {
        self.register(name, FnCheck(check))
    }

    /// Returns `true` when a check with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.checks.iter().any(|entry| entry.name == name)
    }

    /// Check names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.checks.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// Iterates over checks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn StatusCheck)> {
        self.checks
            .iter()
            .map(|entry| (entry.name.as_str(), entry.check.as_ref()))
    }

    /// Returns the number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns `true` when no checks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl fmt::Debug for CheckRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CheckRegistry")
            .field("checks", &self.names())
            .finish()
    }
}

/// A bundle of status checks contributed by a reusable charm plugin.
pub trait Plugin {
    /// Registers the plugin's checks.
    ///
    /// # Errors
    ///
    /// Propagates registration failures such as duplicate names.
    fn register(&self, checks: &mut CheckRegistry) -> Result<(), CharmError>;
}
