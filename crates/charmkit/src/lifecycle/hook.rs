//! Names of the lifecycle signals a charm reacts to.

use strum::{Display, EnumString, IntoStaticStr};

/// Lifecycle hooks and actions routed by [`Charm::dispatch`](super::Charm::dispatch).
///
/// Names follow the host's spelling, so a hook can be parsed straight from
/// the dispatch path:
///
/// ```
/// use charmkit::lifecycle::Hook;
///
/// assert_eq!("config-changed".parse::<Hook>(), Ok(Hook::ConfigChanged));
/// assert_eq!(Hook::from_dispatch_path("actions/pause"), Some(Hook::Pause));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Hook {
    /// The unit is being installed.
    Install,
    /// One or more charm options changed.
    ConfigChanged,
    /// Periodic status refresh.
    UpdateStatus,
    /// The `pause` action.
    Pause,
    /// The `resume` action.
    Resume,
    /// The machine is about to be upgraded to a new series.
    PreSeriesUpgrade,
    /// The series upgrade has completed.
    PostSeriesUpgrade,
}

impl Hook {
    /// Parses the final segment of a dispatch path such as `hooks/install`
    /// or `actions/resume`. Unknown names yield `None`.
    #[must_use]
    pub fn from_dispatch_path(path: &str) -> Option<Self> {
        let name = path.rsplit('/').next().unwrap_or(path);
        name.parse().ok()
    }

    /// Returns the hook name as the host spells it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
