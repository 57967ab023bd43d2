use crate::logging::LogFormat;

/// Default log filter expression applied to hook invocations.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression applied to hook invocations.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}
