//! In-memory host collaborators for exercising charms without a host.
//!
//! Every fake is a cheap handle over shared state: clone it, hand one clone
//! to the [`Host`] and keep the other to inspect what the charm did.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use charmkit_config::CharmConfig;

use crate::error::{PackageError, PackageOperation};
use crate::host::{
    HealthReport, Host, ManageOutcome, PackageManager, RelationData, RelationId, RelationStore,
    ServiceAction, ServiceHealth, ServiceLifecycle, StatusSink,
};
use crate::status::UnitStatus;

#[derive(Debug, Default)]
struct RelationsInner {
    next_id: u32,
    endpoints: BTreeMap<String, Vec<RelationId>>,
    unit_data: BTreeMap<RelationId, RelationData>,
}

/// Relation store backed by in-memory maps.
#[derive(Debug, Clone, Default)]
pub struct MemoryRelations {
    inner: Rc<RefCell<RelationsInner>>,
}

impl MemoryRelations {
    /// Creates a store with no relations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Establishes a new relation on `endpoint` and returns its id.
    pub fn add_relation(&self, endpoint: &str) -> RelationId {
        let mut inner = self.inner.borrow_mut();
        let id = RelationId(inner.next_id);
        inner.next_id += 1;
        inner
            .endpoints
            .entry(endpoint.to_owned())
            .or_default()
            .push(id);
        id
    }

    /// Returns the data this unit published on `relation`.
    #[must_use]
    pub fn unit_data(&self, relation: RelationId) -> RelationData {
        self.inner
            .borrow()
            .unit_data
            .get(&relation)
            .cloned()
            .unwrap_or_default()
    }
}

impl RelationStore for MemoryRelations {
    fn relations(&self, endpoint: &str) -> Vec<RelationId> {
        self.inner
            .borrow()
            .endpoints
            .get(endpoint)
            .cloned()
            .unwrap_or_default()
    }

    fn update_unit_data(&mut self, relation: RelationId, data: RelationData) {
        self.inner
            .borrow_mut()
            .unit_data
            .entry(relation)
            .or_default()
            .extend(data);
    }
}

/// Package manager call captured by [`RecordingPackages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageCall {
    /// `add_source(source, key)`.
    AddSource {
        /// Source line.
        source: String,
        /// Optional signing key.
        key: Option<String>,
    },
    /// `update_index(fatal)`.
    UpdateIndex {
        /// Whether failures were fatal.
        fatal: bool,
    },
    /// `install(packages, fatal)`.
    Install {
        /// Requested packages.
        packages: Vec<String>,
        /// Whether failures were fatal.
        fatal: bool,
    },
}

#[derive(Debug, Default)]
struct PackagesInner {
    calls: Vec<PackageCall>,
    failing: Option<PackageOperation>,
}

/// Package manager that records calls and can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingPackages {
    inner: Rc<RefCell<PackagesInner>>,
}

impl RecordingPackages {
    /// Creates a package manager where every operation succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `operation` fail from now on.
    pub fn fail_on(&self, operation: PackageOperation) {
        self.inner.borrow_mut().failing = Some(operation);
    }

    /// Calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<PackageCall> {
        self.inner.borrow().calls.clone()
    }

    fn record(&self, operation: PackageOperation, call: PackageCall) -> Result<(), PackageError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(call);
        if inner.failing == Some(operation) {
            return Err(PackageError::new(operation, "injected failure"));
        }
        Ok(())
    }
}

impl PackageManager for RecordingPackages {
    fn add_source(&mut self, source: &str, key: Option<&str>) -> Result<(), PackageError> {
        self.record(
            PackageOperation::AddSource,
            PackageCall::AddSource {
                source: source.to_owned(),
                key: key.map(str::to_owned),
            },
        )
    }

    fn update_index(&mut self, fatal: bool) -> Result<(), PackageError> {
        self.record(
            PackageOperation::UpdateIndex,
            PackageCall::UpdateIndex { fatal },
        )
    }

    fn install(&mut self, packages: &[String], fatal: bool) -> Result<(), PackageError> {
        self.record(
            PackageOperation::Install,
            PackageCall::Install {
                packages: packages.to_vec(),
                fatal,
            },
        )
    }
}

/// Service controller that records requests and always succeeds.
#[derive(Debug, Clone, Default)]
pub struct RecordingServices {
    calls: Rc<RefCell<Vec<(ServiceAction, Vec<String>)>>>,
}

impl RecordingServices {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<(ServiceAction, Vec<String>)> {
        self.calls.borrow().clone()
    }
}

impl ServiceLifecycle for RecordingServices {
    fn manage(&mut self, action: ServiceAction, services: &[String]) -> ManageOutcome {
        self.calls.borrow_mut().push((action, services.to_vec()));
        ManageOutcome::success()
    }
}

/// Health probe returning a configurable report.
#[derive(Debug, Clone, Default)]
pub struct StaticHealth {
    report: Rc<RefCell<HealthReport>>,
}

impl StaticHealth {
    /// Creates a probe reporting healthy services.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the report returned by future probes.
    pub fn set_report(&self, report: HealthReport) {
        *self.report.borrow_mut() = report;
    }
}

impl ServiceHealth for StaticHealth {
    fn check_running(&self, _services: &[String], _ports: &[u16]) -> HealthReport {
        self.report.borrow().clone()
    }
}

/// Status sink that keeps every status it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingStatus {
    history: Rc<RefCell<Vec<UnitStatus>>>,
}

impl RecordingStatus {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently published status.
    #[must_use]
    pub fn last(&self) -> Option<UnitStatus> {
        self.history.borrow().last().cloned()
    }

    /// Every status published so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<UnitStatus> {
        self.history.borrow().clone()
    }
}

impl StatusSink for RecordingStatus {
    fn set_status(&mut self, status: UnitStatus) {
        self.history.borrow_mut().push(status);
    }
}

/// A complete fake host with handles kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct TestHost {
    /// Relation store handle.
    pub relations: MemoryRelations,
    /// Package manager handle.
    pub packages: RecordingPackages,
    /// Service controller handle.
    pub services: RecordingServices,
    /// Health probe handle.
    pub health: StaticHealth,
    /// Status sink handle.
    pub status: RecordingStatus,
}

impl TestHost {
    /// Creates a host where everything succeeds and nothing is related.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a [`Host`] for `app_name` sharing this fake's state.
    #[must_use]
    pub fn host(&self, app_name: &str, config: CharmConfig) -> Host {
        Host {
            app_name: app_name.to_owned(),
            config: Box::new(config),
            relations: Box::new(self.relations.clone()),
            packages: Box::new(self.packages.clone()),
            services: Box::new(self.services.clone()),
            health: Box::new(self.health.clone()),
            status: Box::new(self.status.clone()),
        }
    }
}
