//! Unit status values and the Active message merge.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Base message contributed to every Active status.
pub const READY_MESSAGE: &str = "Unit is ready";

/// Message reported while a series upgrade is in progress.
pub const SERIES_UPGRADE_MESSAGE: &str =
    "Ready for do-release-upgrade and reboot. Set complete when finished.";

/// Message reported while the payload is paused.
pub const PAUSED_MESSAGE: &str = "Paused. Use 'resume' action to resume normal service.";

/// Message reported before the charm has finished configuring the payload.
pub const CONFIGURING_MESSAGE: &str = "Charm configuration in progress";

/// Externally visible workload status of a unit.
///
/// Status checks return the same type: `Active` lets evaluation continue,
/// anything else stops it. An empty message means "no message".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum UnitStatus {
    /// The unit is operating normally.
    Active(String),
    /// The unit needs operator intervention.
    Blocked(String),
    /// The unit is performing maintenance (e.g. paused).
    Maintenance(String),
    /// The unit is waiting on something outside its control.
    Waiting(String),
}

/// Variant tag of a [`UnitStatus`], as the host spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    /// See [`UnitStatus::Active`].
    Active,
    /// See [`UnitStatus::Blocked`].
    Blocked,
    /// See [`UnitStatus::Maintenance`].
    Maintenance,
    /// See [`UnitStatus::Waiting`].
    Waiting,
}

impl UnitStatus {
    /// Active status with the given message.
    #[must_use]
    pub fn active(message: impl Into<String>) -> Self {
        Self::Active(message.into())
    }

    /// Active status without a message.
    #[must_use]
    pub const fn ready() -> Self {
        Self::Active(String::new())
    }

    /// Blocked status with the given message.
    #[must_use]
    pub fn blocked(message: impl Into<String>) -> Self {
        Self::Blocked(message.into())
    }

    /// Maintenance status with the given message.
    #[must_use]
    pub fn maintenance(message: impl Into<String>) -> Self {
        Self::Maintenance(message.into())
    }

    /// Waiting status with the given message.
    #[must_use]
    pub fn waiting(message: impl Into<String>) -> Self {
        Self::Waiting(message.into())
    }

    /// Builds a status from its kind and message.
    #[must_use]
    pub fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        let text = message.into();
        match kind {
            StatusKind::Active => Self::Active(text),
            StatusKind::Blocked => Self::Blocked(text),
            StatusKind::Maintenance => Self::Maintenance(text),
            StatusKind::Waiting => Self::Waiting(text),
        }
    }

    /// Returns the variant tag.
    #[must_use]
    pub const fn kind(&self) -> StatusKind {
        match self {
            Self::Active(_) => StatusKind::Active,
            Self::Blocked(_) => StatusKind::Blocked,
            Self::Maintenance(_) => StatusKind::Maintenance,
            Self::Waiting(_) => StatusKind::Waiting,
        }
    }

    /// Returns the message, empty when none was given.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Active(message)
            | Self::Blocked(message)
            | Self::Maintenance(message)
            | Self::Waiting(message) => message.as_str(),
        }
    }

    /// Returns `true` for [`UnitStatus::Active`].
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message();
        if message.is_empty() {
            write!(formatter, "{}", self.kind())
        } else {
            write!(formatter, "{}: {message}", self.kind())
        }
    }
}

/// Merges Active messages into the single message shown to operators.
///
/// Messages are de-duplicated and sorted in descending order so that a
/// message sharing its start with a longer one ("Unit is ready" and "Unit is
/// ready and clustered") is visited after it. A message is dropped when an
/// already-kept message starts with it. Survivors are joined with `", "`.
///
/// ```
/// use charmkit::status::merge_active_messages;
///
/// let merged = merge_active_messages([
///     "Unit is ready",
///     "Unit is ready and awesome",
///     "Unit is ready and super",
/// ]);
/// assert_eq!(merged, "Unit is ready and super, Unit is ready and awesome");
/// ```
pub fn merge_active_messages<I, S>(messages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let unique: BTreeSet<String> = messages.into_iter().map(Into::into).collect();
    let mut kept: Vec<String> = Vec::with_capacity(unique.len());
    for message in unique.into_iter().rev() {
        if !kept.iter().any(|existing| existing.starts_with(message.as_str())) {
            kept.push(message);
        }
    }
    kept.join(", ")
}
