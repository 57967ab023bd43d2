//! Static description of a charm, fixed when the charm is authored.

use std::collections::{BTreeMap, BTreeSet};

/// Maps configuration files to the services that must restart when they
/// change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestartMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl RestartMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    #[must_use]
    pub fn with<I, S>(mut self, path: impl Into<String>, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(path, services);
        self
    }

    /// Associates a configuration file with its services, replacing any
    /// previous entry for the same file.
    pub fn insert<I, S>(&mut self, path: impl Into<String>, services: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(path.into(), services.into_iter().map(Into::into).collect());
    }

    /// Services restarted when `path` changes.
    #[must_use]
    pub fn services_for(&self, path: &str) -> &[String] {
        self.entries
            .get(path)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every service named in the map, de-duplicated, in name order.
    #[must_use]
    pub fn services(&self) -> Vec<String> {
        self.entries
            .values()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Packages, services, relations and options a charm declares up front.
///
/// # Example
///
/// ```
/// use charmkit::{CharmProfile, RestartMap};
///
/// let profile = CharmProfile::new()
///     .with_packages(["keystone-common"])
///     .with_required_relations(["shared-db"])
///     .with_restart_map(
///         RestartMap::new()
///             .with("/etc/f1.conf", ["apache2"])
///             .with("/etc/f2.conf", ["apache2", "ks-api"]),
///     );
/// assert_eq!(profile.services(), vec!["apache2", "ks-api"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharmProfile {
    /// Payload packages installed by the install hook.
    pub packages: Vec<String>,
    /// Configuration files and the services they affect.
    pub restart_map: RestartMap,
    /// Relations that must exist before the unit can be active, in the order
    /// they are reported when missing.
    pub required_relations: Vec<String>,
    /// Options that must be set before config-changed is handed to the charm.
    pub mandatory_config: Vec<String>,
}

impl CharmProfile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the payload packages.
    #[must_use]
    pub fn with_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages = packages.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the restart map.
    #[must_use]
    pub fn with_restart_map(mut self, restart_map: RestartMap) -> Self {
        self.restart_map = restart_map;
        self
    }

    /// Sets the required relations.
    #[must_use]
    pub fn with_required_relations<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_relations = relations.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the mandatory options.
    #[must_use]
    pub fn with_mandatory_config<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mandatory_config = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Services paused, resumed and health-checked on behalf of the charm.
    #[must_use]
    pub fn services(&self) -> Vec<String> {
        self.restart_map.services()
    }
}
