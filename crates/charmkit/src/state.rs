//! Flags that survive across hook invocations.

use serde::{Deserialize, Serialize};

/// Durable lifecycle flags owned by the charm.
///
/// All flags start out `false`. Only lifecycle handlers (and charm hook code
/// through [`HookContext`](crate::lifecycle::HookContext)) change them; the
/// driver is responsible for persisting the value between hooks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    /// The payload has been configured and started.
    #[serde(default)]
    pub is_started: bool,
    /// The payload services were paused by an operator or series upgrade.
    #[serde(default)]
    pub is_paused: bool,
    /// A series upgrade is in progress.
    #[serde(default)]
    pub series_upgrade: bool,
}

impl PersistedState {
    /// State of a freshly deployed unit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            is_started: false,
            is_paused: false,
            series_upgrade: false,
        }
    }
}
