//! Lifecycle controller.
//!
//! A [`Charm`] owns the charm's static [`CharmProfile`], its registered
//! status checks, the [`PersistedState`] flags and the [`Host`]
//! collaborators. Each `on_*` handler maps one lifecycle signal onto those
//! flags and host calls, then republishes the unit status through the
//! [`StatusAggregator`]. Charm authors customise behaviour through the
//! [`CharmHooks`] trait and by registering checks on the [`CharmBuilder`].

mod hook;

pub use hook::Hook;

use tracing::{debug, error, info, warn};

use crate::aggregator::StatusAggregator;
use crate::checks::{CheckOutcome, CheckRegistry, Model, Plugin};
use crate::error::CharmError;
use crate::host::{ConfigStore, Host, RelationId, ServiceAction};
use crate::profile::CharmProfile;
use crate::state::PersistedState;
use crate::status::UnitStatus;

/// Tracing target for lifecycle handlers.
pub(crate) const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

/// Mutable access handed to charm hook code.
#[derive(Debug)]
pub struct HookContext<'a> {
    /// Host collaborators.
    pub host: &'a mut Host,
    /// Persisted lifecycle flags.
    pub state: &'a mut PersistedState,
}

impl HookContext<'_> {
    /// Read-only view of the host, as status checks see it.
    #[must_use]
    pub fn model(&self) -> Model<'_> {
        Model {
            app_name: &self.host.app_name,
            config: self.host.config.as_ref(),
            relations: self.host.relations.as_ref(),
        }
    }

    /// Publishes a status directly, bypassing aggregation.
    pub fn set_status(&mut self, status: UnitStatus) {
        self.host.status.set_status(status);
    }
}

/// Charm-specific behaviour layered on top of the base lifecycle.
///
/// Every method has a no-op default, so a charm only implements what it
/// needs.
pub trait CharmHooks {
    /// Registers the charm's own status checks. Runs once, when the charm
    /// is built, after any checks registered on the builder.
    ///
    /// # Errors
    ///
    /// Propagates registration failures such as duplicate names.
    fn register_checks(&self, checks: &mut CheckRegistry) -> Result<(), CharmError> {
        let _ = checks;
        Ok(())
    }

    /// Reacts to a configuration change once every mandatory option is set.
    ///
    /// # Errors
    ///
    /// Returns [`CharmError::Hook`] when the charm cannot apply the new
    /// configuration.
    fn on_config(&mut self, ctx: &mut HookContext<'_>) -> Result<(), CharmError> {
        let _ = ctx;
        Ok(())
    }

    /// Reacts to a change on an established relation.
    ///
    /// # Errors
    ///
    /// Returns [`CharmError::Hook`] when the charm cannot process the
    /// relation.
    fn on_relation_changed(
        &mut self,
        ctx: &mut HookContext<'_>,
        endpoint: &str,
        relation: RelationId,
    ) -> Result<(), CharmError> {
        let _ = (ctx, endpoint, relation);
        Ok(())
    }
}

impl CharmHooks for () {}

/// Assembles a [`Charm`].
///
/// Checks are evaluated in the order they are registered: builder
/// registrations first, then those added by [`CharmHooks::register_checks`].
#[derive(Debug)]
pub struct CharmBuilder<H = ()> {
    profile: CharmProfile,
    checks: CheckRegistry,
    hooks: H,
    state: PersistedState,
}

impl CharmBuilder<()> {
    /// Starts a builder for a charm without custom hooks.
    #[must_use]
    pub fn new(profile: CharmProfile) -> Self {
        Self {
            profile,
            checks: CheckRegistry::new(),
            hooks: (),
            state: PersistedState::new(),
        }
    }
}

impl<H: CharmHooks> CharmBuilder<H> {
    /// Registers every check contributed by a plugin.
    ///
    /// # Errors
    ///
    /// Propagates registration failures from the plugin.
    pub fn plugin(mut self, plugin: &dyn Plugin) -> Result<Self, CharmError> {
        plugin.register(&mut self.checks)?;
        Ok(self)
    }

    /// Registers a single named check.
    ///
    /// # Errors
    ///
    /// Returns [`CharmError::DuplicateCheck`] or
    /// [`CharmError::EmptyCheckName`].
    pub fn check<F>(mut self, name: impl Into<String>, check: F) -> Result<Self, CharmError>
    where
        F: Fn(&Model<'_>) -> CheckOutcome + 'static,
    {
        self.checks.register_fn(name, check)?;
        Ok(self)
    }

    /// Replaces the charm-specific hooks.
    #[must_use]
    pub fn hooks<T: CharmHooks>(self, hooks: T) -> CharmBuilder<T> {
        CharmBuilder {
            profile: self.profile,
            checks: self.checks,
            hooks,
            state: self.state,
        }
    }

    /// Restores flags persisted by a previous hook invocation.
    #[must_use]
    pub fn state(mut self, state: PersistedState) -> Self {
        self.state = state;
        self
    }

    /// Finishes construction.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`CharmHooks::register_checks`].
    pub fn build(self, host: Host) -> Result<Charm<H>, CharmError> {
        let Self {
            profile,
            mut checks,
            hooks,
            state,
        } = self;
        hooks.register_checks(&mut checks)?;
        debug!(
            target: LIFECYCLE_TARGET,
            event = "charm_built",
            app = %host.app_name,
            checks = checks.len(),
            "charm assembled"
        );
        Ok(Charm {
            profile,
            checks,
            hooks,
            state,
            host,
        })
    }
}

/// A charm bound to its host collaborators.
#[derive(Debug)]
pub struct Charm<H = ()> {
    profile: CharmProfile,
    checks: CheckRegistry,
    hooks: H,
    state: PersistedState,
    host: Host,
}

impl<H: CharmHooks> Charm<H> {
    /// Routes a parsed hook or action to its handler.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Charm::on_install`] and
    /// [`Charm::on_config_changed`].
    pub fn dispatch(&mut self, hook: Hook) -> Result<(), CharmError> {
        info!(
            target: LIFECYCLE_TARGET,
            event = "hook_dispatched",
            hook = hook.as_str(),
            "handling lifecycle signal"
        );
        match hook {
            Hook::Install => self.on_install(),
            Hook::ConfigChanged => self.on_config_changed(),
            Hook::UpdateStatus => {
                self.on_update_status();
                Ok(())
            }
            Hook::Pause => {
                self.on_pause_action();
                Ok(())
            }
            Hook::Resume => {
                self.on_resume_action();
                Ok(())
            }
            Hook::PreSeriesUpgrade => {
                self.on_pre_series_upgrade();
                Ok(())
            }
            Hook::PostSeriesUpgrade => {
                self.on_post_series_upgrade();
                Ok(())
            }
        }
    }

    /// Adds the configured package source, refreshes the index, installs
    /// the profile's packages and publishes the status.
    ///
    /// # Errors
    ///
    /// Returns [`CharmError::Package`] when any package operation fails. The
    /// status is not updated in that case.
    pub fn on_install(&mut self) -> Result<(), CharmError> {
        info!(target: LIFECYCLE_TARGET, event = "install_started", "installing packages");
        self.install_packages().inspect_err(|err| {
            error!(
                target: LIFECYCLE_TARGET,
                event = "install_failed",
                error = %err,
                "package installation failed"
            );
        })?;
        self.update_status();
        Ok(())
    }

    fn install_packages(&mut self) -> Result<(), CharmError> {
        if let Some(source) = option_text(self.host.config.as_ref(), "source") {
            let key = option_text(self.host.config.as_ref(), "key");
            self.host.packages.add_source(&source, key.as_deref())?;
        }
        self.host.packages.update_index(true)?;
        self.host.packages.install(&self.profile.packages, true)?;
        Ok(())
    }

    /// Verifies every mandatory option is set, then runs the charm's
    /// configuration hook. Missing options block the unit and skip the hook.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`CharmHooks::on_config`].
    pub fn on_config_changed(&mut self) -> Result<(), CharmError> {
        let missing = self.missing_config();
        if !missing.is_empty() {
            let message = format!("Missing option(s): {}", missing.join(","));
            warn!(
                target: LIFECYCLE_TARGET,
                event = "mandatory_config_missing",
                missing = ?missing,
                "mandatory options are unset"
            );
            self.host.status.set_status(UnitStatus::blocked(message));
            return Ok(());
        }
        let mut ctx = HookContext {
            host: &mut self.host,
            state: &mut self.state,
        };
        self.hooks.on_config(&mut ctx)
    }

    /// Mandatory options with no value, in declaration order.
    #[must_use]
    pub fn missing_config(&self) -> Vec<&str> {
        self.profile
            .mandatory_config
            .iter()
            .filter(|key| !self.host.config.contains(key))
            .map(String::as_str)
            .collect()
    }

    /// Republishes the status.
    pub fn on_update_status(&mut self) -> UnitStatus {
        self.update_status()
    }

    /// Pauses the payload services and marks the unit paused.
    pub fn on_pause_action(&mut self) -> UnitStatus {
        self.manage_services(ServiceAction::Pause);
        self.state.is_paused = true;
        self.update_status()
    }

    /// Resumes the payload services and clears the paused flag.
    pub fn on_resume_action(&mut self) -> UnitStatus {
        self.manage_services(ServiceAction::Resume);
        self.state.is_paused = false;
        self.update_status()
    }

    /// Pauses the payload ahead of a series upgrade.
    pub fn on_pre_series_upgrade(&mut self) -> UnitStatus {
        self.manage_services(ServiceAction::Pause);
        self.state.is_paused = true;
        self.state.series_upgrade = true;
        self.update_status()
    }

    /// Resumes the payload once a series upgrade has finished.
    pub fn on_post_series_upgrade(&mut self) -> UnitStatus {
        self.manage_services(ServiceAction::Resume);
        self.state.is_paused = false;
        self.state.series_upgrade = false;
        self.update_status()
    }

    /// Hands a relation change to the charm's hooks.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`CharmHooks::on_relation_changed`].
    pub fn on_relation_changed(
        &mut self,
        endpoint: &str,
        relation: RelationId,
    ) -> Result<(), CharmError> {
        debug!(
            target: LIFECYCLE_TARGET,
            event = "relation_changed",
            endpoint,
            relation = %relation,
            "relation data changed"
        );
        let mut ctx = HookContext {
            host: &mut self.host,
            state: &mut self.state,
        };
        self.hooks.on_relation_changed(&mut ctx, endpoint, relation)
    }

    // The flags record operator intent, so they are flipped by the callers
    // whatever the collaborator reports.
    fn manage_services(&mut self, action: ServiceAction) {
        let services = self.services();
        let outcome = self.host.services.manage(action, &services);
        if outcome.succeeded {
            debug!(
                target: LIFECYCLE_TARGET,
                event = "services_managed",
                action = %action,
                services = ?services,
                "payload services updated"
            );
        } else {
            warn!(
                target: LIFECYCLE_TARGET,
                event = "services_manage_failed",
                action = %action,
                services = ?services,
                messages = ?outcome.messages,
                "payload services did not reach the requested state"
            );
        }
    }
}

impl<H> Charm<H> {
    /// Payload services, de-duplicated and sorted by name.
    #[must_use]
    pub fn services(&self) -> Vec<String> {
        self.profile.services()
    }

    /// Computes the current status without publishing it.
    #[must_use]
    pub fn evaluate(&self) -> UnitStatus {
        let services = self.services();
        let model = Model {
            app_name: &self.host.app_name,
            config: self.host.config.as_ref(),
            relations: self.host.relations.as_ref(),
        };
        StatusAggregator::new(
            &self.checks,
            &self.state,
            &self.profile.required_relations,
            &services,
        )
        .evaluate(&model, self.host.health.as_ref())
    }

    /// Computes the status and publishes it to the host.
    pub fn update_status(&mut self) -> UnitStatus {
        let status = self.evaluate();
        info!(
            target: LIFECYCLE_TARGET,
            event = "status_updated",
            status = %status,
            "unit status updated"
        );
        self.host.status.set_status(status.clone());
        status
    }

    /// Current lifecycle flags.
    #[must_use]
    pub const fn state(&self) -> &PersistedState {
        &self.state
    }

    /// Mutable access to the lifecycle flags.
    pub const fn state_mut(&mut self) -> &mut PersistedState {
        &mut self.state
    }

    /// Host collaborators.
    #[must_use]
    pub const fn host(&self) -> &Host {
        &self.host
    }

    /// Mutable access to the host collaborators.
    pub const fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    /// Static charm description.
    #[must_use]
    pub const fn profile(&self) -> &CharmProfile {
        &self.profile
    }

    /// Registered status checks.
    #[must_use]
    pub const fn checks(&self) -> &CheckRegistry {
        &self.checks
    }

    /// Charm-specific hooks.
    #[must_use]
    pub const fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Consumes the charm, returning the flags the driver should persist.
    #[must_use]
    pub fn into_state(self) -> PersistedState {
        self.state
    }
}

fn option_text(config: &dyn ConfigStore, key: &str) -> Option<String> {
    config
        .get(key)
        .filter(|value| !value.is_empty_string())
        .map(|value| value.to_string())
}
