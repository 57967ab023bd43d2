//! Scenario world for the lifecycle behavioural suite.

use charmkit_config::CharmConfig;

use crate::host::HealthReport;
use crate::lifecycle::{Charm, CharmBuilder};
use crate::profile::{CharmProfile, RestartMap};
use crate::state::PersistedState;
use crate::status::{StatusKind, UnitStatus};
use crate::testing::TestHost;

/// Scenario world shared across BDD steps.
pub struct TestWorld {
    pub fakes: TestHost,
    profile: CharmProfile,
    config: CharmConfig,
    state: PersistedState,
    checks: Vec<(String, UnitStatus)>,
    charm: Option<Charm>,
}

impl TestWorld {
    /// Builds a world describing an API charm with two payload services.
    pub fn new() -> Self {
        let profile = CharmProfile::new()
            .with_packages(["keystone-common"])
            .with_restart_map(
                RestartMap::new()
                    .with("/etc/f1.conf", ["apache2"])
                    .with("/etc/f2.conf", ["apache2", "ks-api"]),
            );
        Self {
            fakes: TestHost::new(),
            profile,
            config: CharmConfig::new(),
            state: PersistedState::new(),
            checks: Vec::new(),
            charm: None,
        }
    }

    /// Declares the relations the charm requires.
    pub fn require_relations(&mut self, relations: &str) {
        let names: Vec<String> = relations
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect();
        self.profile = self.profile.clone().with_required_relations(names);
    }

    /// Declares the options that must be set before configuration runs.
    pub fn require_options(&mut self, options: &str) {
        let names: Vec<String> = options.split(',').map(|name| name.trim().to_owned()).collect();
        self.profile = self.profile.clone().with_mandatory_config(names);
    }

    /// Sets a charm option.
    pub fn set_option(&mut self, key: &str, value: &str) {
        self.config.insert(key, value);
    }

    /// Establishes a relation on `endpoint`.
    pub fn relate(&self, endpoint: &str) {
        self.fakes.relations.add_relation(endpoint);
    }

    /// Mutable access to the flags the charm will start from.
    pub fn state_mut(&mut self) -> &mut PersistedState {
        self.charm
            .as_mut()
            .map_or(&mut self.state, |charm| charm.state_mut())
    }

    /// Adds a check that always reports `status`.
    pub fn add_check(&mut self, kind: StatusKind, message: &str) {
        let name = format!("check-{}", self.checks.len());
        self.checks.push((name, UnitStatus::new(kind, message)));
    }

    /// Makes the health probe report a stopped service.
    pub fn stop_service(&self, message: &str) {
        self.fakes
            .health
            .set_report(HealthReport::unhealthy("blocked", message));
    }

    /// Builds the charm on first use.
    pub fn charm(&mut self) -> &mut Charm {
        let fakes = &self.fakes;
        let profile = &self.profile;
        let config = &self.config;
        let state = self.state;
        let checks = &self.checks;
        self.charm.get_or_insert_with(|| {
            let mut builder = CharmBuilder::new(profile.clone()).state(state);
            for (name, status) in checks {
                let reported = status.clone();
                builder = builder
                    .check(name.clone(), move |_model| Ok(reported.clone()))
                    .expect("check registers");
            }
            builder
                .build(fakes.host("keystone", config.clone()))
                .expect("charm builds")
        })
    }

    /// Most recently published status.
    pub fn published(&self) -> Option<UnitStatus> {
        self.fakes.status.last()
    }
}
