//! Base layer for operating OpenStack-style charms.
//!
//! A charm is driven by lifecycle signals from its host: install,
//! configuration changes, periodic status refreshes, pause and resume
//! actions, series upgrades and relation changes. [`Charm`] maps each signal
//! onto a small set of persisted flags and host calls and then recomputes
//! the unit's externally visible [`UnitStatus`].
//!
//! Status is computed by the [`aggregator`] with a fixed precedence:
//! registered checks first, then series upgrade, paused services, missing
//! relations, stopped services and finally whether the charm has finished
//! configuring its payload. Active messages from the checks are merged into
//! a single de-duplicated message.
//!
//! Everything the host provides (options, relations, packages, service
//! control, health probes and the status sink) sits behind the traits in
//! [`host`], so charms can be exercised in-process with the fakes in
//! `testing` (enabled by the `test-support` feature).
//!
//! Release-specific charm variants are chosen through a [`ReleaseRegistry`],
//! and plugins contribute status checks through the [`Plugin`] trait.

pub mod adapters;
pub mod aggregator;
pub mod checks;
mod error;
pub mod host;
pub mod lifecycle;
mod profile;
pub mod release;
mod state;
pub mod status;
pub mod telemetry;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use aggregator::StatusAggregator;
pub use charmkit_config::{CharmConfig, ConfigValue, RuntimeConfig};
pub use checks::{CheckOutcome, CheckRegistry, Model, NoOpinion, Plugin, StatusCheck};
pub use error::{CharmError, PackageError, PackageOperation};
pub use host::Host;
pub use lifecycle::{Charm, CharmBuilder, CharmHooks, Hook, HookContext};
pub use profile::{CharmProfile, RestartMap};
pub use release::{ReleaseError, ReleaseRegistry};
pub use state::PersistedState;
pub use status::{StatusKind, UnitStatus};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
