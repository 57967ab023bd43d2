//! Contracts for the collaborators the hosting framework provides.
//!
//! The charm never talks to the host directly. Each concern (options,
//! relations, packages, service control, service health, status reporting)
//! sits behind a small trait so the lifecycle controller can be driven by the
//! real host in production and by fakes or mocks in tests.

use std::collections::BTreeMap;
use std::fmt;

use charmkit_config::{CharmConfig, ConfigValue};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::PackageError;
use crate::status::UnitStatus;

/// Read access to the charm's options.
pub trait ConfigStore {
    /// Returns the value of an option, or `None` when it is unset.
    fn get(&self, key: &str) -> Option<ConfigValue>;

    /// Returns the names of every option that has a value.
    fn keys(&self) -> Vec<String>;

    /// Returns `true` when the option has a value.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl ConfigStore for CharmConfig {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        Self::get(self, key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.iter().map(|(key, _)| key.to_owned()).collect()
    }
}

/// Host-assigned identifier of an established relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationId(pub u32);

impl fmt::Display for RelationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Key/value bucket a unit publishes on a relation.
pub type RelationData = BTreeMap<String, String>;

/// Access to established relations.
pub trait RelationStore {
    /// Lists the established relations on the named endpoint.
    fn relations(&self, endpoint: &str) -> Vec<RelationId>;

    /// Returns `true` when at least one relation exists on the endpoint.
    fn has_relation(&self, endpoint: &str) -> bool {
        !self.relations(endpoint).is_empty()
    }

    /// Merges `data` into this unit's bucket on the given relation.
    fn update_unit_data(&mut self, relation: RelationId, data: RelationData);
}

/// Thin wrapper over the operating system's package manager.
pub trait PackageManager {
    /// Registers an additional package source, optionally signed by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError`] when the source cannot be added.
    fn add_source(&mut self, source: &str, key: Option<&str>) -> Result<(), PackageError>;

    /// Refreshes the package index.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError`] when the refresh fails and `fatal` is set.
    fn update_index(&mut self, fatal: bool) -> Result<(), PackageError>;

    /// Installs the named packages.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError`] when installation fails and `fatal` is set.
    fn install(&mut self, packages: &[String], fatal: bool) -> Result<(), PackageError>;
}

/// Action requested from the service lifecycle collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ServiceAction {
    /// Stop and disable the payload services.
    Pause,
    /// Enable and start the payload services.
    Resume,
}

/// Result of a pause or resume request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManageOutcome {
    /// Whether every service reached the requested state.
    pub succeeded: bool,
    /// Diagnostic messages produced while managing the services.
    pub messages: Vec<String>,
}

impl ManageOutcome {
    /// Outcome reporting success without diagnostics.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            succeeded: true,
            messages: Vec::new(),
        }
    }

    /// Outcome reporting failure with the given diagnostics.
    #[must_use]
    pub const fn failure(messages: Vec<String>) -> Self {
        Self {
            succeeded: false,
            messages,
        }
    }
}

/// Pauses and resumes payload services.
pub trait ServiceLifecycle {
    /// Applies `action` to every service in `services`.
    fn manage(&mut self, action: ServiceAction, services: &[String]) -> ManageOutcome;
}

/// Report returned by a [`ServiceHealth`] probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport {
    /// Suggested workload status, when something is wrong.
    pub status: Option<String>,
    /// Description of the problem, when something is wrong.
    pub message: Option<String>,
}

impl HealthReport {
    /// Report for a fully running payload.
    #[must_use]
    pub const fn healthy() -> Self {
        Self {
            status: None,
            message: None,
        }
    }

    /// Report describing a problem.
    #[must_use]
    pub fn unhealthy(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            message: Some(message.into()),
        }
    }
}

/// Checks whether payload services are running and listening.
pub trait ServiceHealth {
    /// Probes `services` and, when non-empty, `ports`.
    fn check_running(&self, services: &[String], ports: &[u16]) -> HealthReport;
}

/// Destination for the unit's workload status. The last write wins.
pub trait StatusSink {
    /// Publishes a new status.
    fn set_status(&mut self, status: UnitStatus);
}

/// Bundle of host collaborators handed to a charm.
pub struct Host {
    /// Name of the application this unit belongs to.
    pub app_name: String,
    /// Charm options.
    pub config: Box<dyn ConfigStore>,
    /// Established relations.
    pub relations: Box<dyn RelationStore>,
    /// Package manager.
    pub packages: Box<dyn PackageManager>,
    /// Service pause/resume control.
    pub services: Box<dyn ServiceLifecycle>,
    /// Service health probe.
    pub health: Box<dyn ServiceHealth>,
    /// Workload status sink.
    pub status: Box<dyn StatusSink>,
}

impl fmt::Debug for Host {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Host")
            .field("app_name", &self.app_name)
            .finish_non_exhaustive()
    }
}
