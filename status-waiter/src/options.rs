use crate::interval::Interval;
use crate::progress::ProgressSink;
use serde::{Deserialize, Serialize};
use snafu::{ensure, Snafu};
use std::fmt::{self, Debug, Display, Formatter};
use std::time::Duration;

/// The minimum spacing between progress notifications when the caller does not choose one.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(60);

/// An opaque status label reported by a remote resource. Labels are compared exactly and
/// case-sensitively; the poller attaches no meaning to them beyond membership in the caller's
/// state sets.
#[derive(Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(String);

impl Status {
    pub fn new<S: Into<String>>(status: S) -> Self {
        Self(status.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

// Debug like the underlying string so lists of statuses read as `["ok", "pending"]`.
impl Debug for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl From<&str> for Status {
    fn from(status: &str) -> Self {
        Self(status.into())
    }
}

impl From<String> for Status {
    fn from(status: String) -> Self {
        Self(status)
    }
}

impl AsRef<str> for Status {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What one poll of the remote resource observed: the status label it reported and, when the
/// caller's fetch closure chooses to keep it, the response the label was read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult<T> {
    /// The status the resource reported.
    pub status: Status,

    /// The response the status was extracted from, if the caller wants it handed back.
    pub value: Option<T>,
}

impl<T> FetchResult<T> {
    /// Creates a result carrying a status and no payload.
    pub fn new<S: Into<Status>>(status: S) -> Self {
        Self {
            status: status.into(),
            value: None,
        }
    }

    /// Creates a result carrying a status and the response it came from.
    pub fn with_value<S: Into<Status>>(status: S, value: T) -> Self {
        Self {
            status: status.into(),
            value: Some(value),
        }
    }
}

/// Configuration for one call to [`wait_for_status`](crate::wait_for_status). Build one of these
/// at the call site, hand it to the poller, and let it go; an `Options` drives exactly one wait
/// and holds no state afterward.
pub struct Options<T> {
    /// Total wall-clock budget for the wait. Must be greater than zero.
    pub timeout: Duration,

    /// How long to pause between poll attempts.
    pub interval: Interval,

    /// Minimum spacing between progress notifications.
    pub progress_interval: Duration,

    /// Statuses that end the wait successfully.
    pub success_states: Vec<Status>,

    /// Statuses that mean the resource is still converging and the wait should continue.
    pub transitional_states: Vec<Status>,

    /// Where to report progress while the resource is transitional.
    pub progress_sink: Option<ProgressSink<T>>,
}

impl<T> Default for Options<T> {
    fn default() -> Self {
        Self {
            timeout: Duration::ZERO,
            interval: Interval::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            success_states: Vec::new(),
            transitional_states: Vec::new(),
            progress_sink: None,
        }
    }
}

impl<T> Options<T> {
    /// Checks that this configuration can drive a wait: a nonzero timeout and no status listed
    /// as both a success state and a transitional state.
    pub(crate) fn validate(&self) -> Result<(), OptionsError> {
        ensure!(!self.timeout.is_zero(), ZeroTimeoutSnafu);
        for status in &self.success_states {
            ensure!(
                !self.transitional_states.contains(status),
                AmbiguousStatusSnafu {
                    status: status.clone()
                }
            );
        }
        Ok(())
    }

    /// Classifies a reported status against the configured state sets.
    pub(crate) fn classify(&self, status: &Status) -> StateKind {
        if self.success_states.contains(status) {
            StateKind::Success
        } else if self.transitional_states.contains(status) {
            StateKind::Transitional
        } else {
            StateKind::Unexpected
        }
    }
}

/// How a reported status relates to the configured state sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StateKind {
    Success,
    Transitional,
    Unexpected,
}

/// The error type returned when an [`Options`] value cannot drive a wait. The poller runs this
/// validation before its first fetch, so a misconfigured wait makes no calls at all.
#[derive(Debug, Snafu)]
pub enum OptionsError {
    #[snafu(display("The timeout must be greater than zero"))]
    ZeroTimeout,

    #[snafu(display(
        "Status '{}' is listed as both a success state and a transitional state",
        status
    ))]
    AmbiguousStatus { status: Status },
}
