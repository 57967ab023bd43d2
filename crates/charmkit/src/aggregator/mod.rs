//! Status aggregation.
//!
//! [`StatusAggregator::evaluate`] folds everything the charm knows about the
//! unit into a single [`UnitStatus`]. Conditions are consulted in a fixed
//! order and the first one that is not Active wins:
//!
//! 1. registered status checks, in registration order;
//! 2. an in-progress series upgrade;
//! 3. paused payload services;
//! 4. missing required relations;
//! 5. payload services that are not running;
//! 6. whether the charm has finished configuring the payload.
//!
//! When everything passes, the Active messages gathered from the checks are
//! merged with [`READY_MESSAGE`] by [`merge_active_messages`].

use crate::checks::{CheckRegistry, Model};
use crate::host::ServiceHealth;
use crate::state::PersistedState;
use crate::status::{
    CONFIGURING_MESSAGE, PAUSED_MESSAGE, READY_MESSAGE, SERIES_UPGRADE_MESSAGE, UnitStatus,
    merge_active_messages,
};

const LOG_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::status");

/// Borrowed inputs for one status evaluation.
#[derive(Debug, Clone, Copy)]
pub struct StatusAggregator<'a> {
    checks: &'a CheckRegistry,
    state: &'a PersistedState,
    required_relations: &'a [String],
    services: &'a [String],
}

impl<'a> StatusAggregator<'a> {
    /// Assembles the inputs for an evaluation.
    #[must_use]
    pub const fn new(
        checks: &'a CheckRegistry,
        state: &'a PersistedState,
        required_relations: &'a [String],
        services: &'a [String],
    ) -> Self {
        Self {
            checks,
            state,
            required_relations,
            services,
        }
    }

    /// Computes the unit status. Evaluation has no side effects beyond
    /// whatever the checks and the health probe do.
    #[must_use]
    pub fn evaluate(&self, model: &Model<'_>, health: &dyn ServiceHealth) -> UnitStatus {
        let mut active_messages = vec![READY_MESSAGE.to_owned()];

        for (name, check) in self.checks.iter() {
            match check.check(model) {
                Ok(UnitStatus::Active(message)) => {
                    if !message.is_empty() {
                        active_messages.push(message);
                    }
                }
                Ok(status) => {
                    tracing::debug!(
                        target: LOG_TARGET,
                        event = "check_halted",
                        check = %name,
                        status = %status,
                        "status check halted evaluation"
                    );
                    return status;
                }
                Err(_) => {
                    tracing::trace!(
                        target: LOG_TARGET,
                        event = "check_skipped",
                        check = %name,
                        "status check declined"
                    );
                }
            }
        }

        if self.state.series_upgrade {
            return UnitStatus::blocked(SERIES_UPGRADE_MESSAGE);
        }

        if self.state.is_paused {
            return UnitStatus::maintenance(PAUSED_MESSAGE);
        }

        let missing = self.missing_relations(model);
        if !missing.is_empty() {
            return UnitStatus::blocked(format!("Missing relations: {}", missing.join(", ")));
        }

        let report = health.check_running(self.services, &[]);
        if let Some(message) = report.message {
            return UnitStatus::blocked(message);
        }

        if self.state.is_started {
            UnitStatus::active(merge_active_messages(active_messages))
        } else {
            UnitStatus::waiting(CONFIGURING_MESSAGE)
        }
    }

    /// Required relations with no established relation, in declaration
    /// order.
    #[must_use]
    pub fn missing_relations(&self, model: &Model<'_>) -> Vec<&'a str> {
        self.required_relations
            .iter()
            .filter(|name| !model.relations.has_relation(name))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests;
