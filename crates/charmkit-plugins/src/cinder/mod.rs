//! Cinder storage backend subordinates.
//!
//! A storage backend charm runs alongside the principal Cinder charm and
//! tells it, over the `storage-backend` relation, which backend it provides
//! and which `cinder.conf` section to render for it. Charms describe their
//! backend through [`CinderBackend`] and hand it to a
//! [`CinderStoragePlugin`], which implements the lifecycle hooks.

use charmkit::host::{ConfigStore, RelationData, RelationId};
use charmkit::lifecycle::{CharmHooks, HookContext};
use charmkit::status::READY_MESSAGE;
use charmkit::{CharmError, UnitStatus};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

const CINDER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::cinder");

/// Endpoint the principal Cinder charm relates on.
pub const STORAGE_BACKEND_ENDPOINT: &str = "storage-backend";

/// Configuration file the rendered sections belong to.
pub const CINDER_CONF: &str = "/etc/cinder/cinder.conf";

/// Errors raised while preparing backend data.
#[derive(Debug, Error)]
pub enum CinderError {
    /// The backend could not derive its configuration from the options.
    #[error("backend configuration is unavailable: {message}")]
    Configuration {
        /// Description of what is missing or wrong.
        message: String,
    },
    /// The subordinate configuration could not be serialised.
    #[error("failed to render subordinate configuration: {0}")]
    Render(#[from] serde_json::Error),
}

/// A concrete Cinder volume backend.
pub trait CinderBackend {
    /// Key/value pairs for the backend's `cinder.conf` section, in order.
    ///
    /// # Errors
    ///
    /// Returns [`CinderError::Configuration`] when the options do not
    /// describe a usable backend.
    fn cinder_configuration(
        &self,
        config: &dyn ConfigStore,
    ) -> Result<Vec<(String, String)>, CinderError>;

    /// Whether the backend keeps no state in the Cinder database.
    fn stateless(&self) -> bool {
        false
    }

    /// Whether the backend supports active-active volume services.
    fn active_active(&self) -> bool {
        false
    }
}

/// Lifecycle hooks publishing a [`CinderBackend`] to the principal charm.
#[derive(Debug, Clone, Default)]
pub struct CinderStoragePlugin<B> {
    backend: B,
}

impl<B: CinderBackend> CinderStoragePlugin<B> {
    /// Wraps a backend.
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The wrapped backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Renders the `subordinate_configuration` document.
    ///
    /// # Errors
    ///
    /// Propagates [`CinderError`] from the backend or from serialisation.
    pub fn render_config(
        &self,
        config: &dyn ConfigStore,
        app_name: &str,
    ) -> Result<String, CinderError> {
        let section = self.backend.cinder_configuration(config)?;
        let document = json!({
            "cinder": {
                CINDER_CONF: {
                    "sections": { app_name: section }
                }
            }
        });
        Ok(serde_json::to_string(&document)?)
    }

    /// Builds the data published on every `storage-backend` relation.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`Self::render_config`].
    pub fn backend_data(
        &self,
        config: &dyn ConfigStore,
        app_name: &str,
    ) -> Result<RelationData, CinderError> {
        let mut data = RelationData::new();
        data.insert(String::from("backend_name"), app_name.to_owned());
        data.insert(
            String::from("stateless"),
            capitalised_bool(self.backend.stateless()).to_owned(),
        );
        data.insert(
            String::from("active_active"),
            capitalised_bool(self.backend.active_active()).to_owned(),
        );
        data.insert(
            String::from("subordinate_configuration"),
            self.render_config(config, app_name)?,
        );
        Ok(data)
    }

    fn prepare(&self, ctx: &HookContext<'_>, hook: &str) -> Result<RelationData, CharmError> {
        let model = ctx.model();
        self.backend_data(model.config, model.app_name)
            .map_err(|error| CharmError::hook(hook, "cannot describe storage backend", error))
    }
}

// The principal charm expects capitalised boolean literals.
const fn capitalised_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

impl<B: CinderBackend> CharmHooks for CinderStoragePlugin<B> {
    fn on_config(&mut self, ctx: &mut HookContext<'_>) -> Result<(), CharmError> {
        let data = self.prepare(ctx, "config-changed")?;
        let relations = ctx.host.relations.relations(STORAGE_BACKEND_ENDPOINT);
        for relation in &relations {
            ctx.host.relations.update_unit_data(*relation, data.clone());
        }
        info!(
            target: CINDER_TARGET,
            event = "backend_published",
            relations = relations.len(),
            "storage backend published"
        );
        ctx.set_status(UnitStatus::active(READY_MESSAGE));
        Ok(())
    }

    fn on_relation_changed(
        &mut self,
        ctx: &mut HookContext<'_>,
        endpoint: &str,
        relation: RelationId,
    ) -> Result<(), CharmError> {
        if endpoint != STORAGE_BACKEND_ENDPOINT {
            return Ok(());
        }
        let data = self.prepare(ctx, "storage-backend-relation-changed")?;
        ctx.host.relations.update_unit_data(relation, data);
        debug!(
            target: CINDER_TARGET,
            event = "backend_published",
            relation = %relation,
            "storage backend published to relation"
        );
        Ok(())
    }
}
