use crate::options::{FetchResult, OptionsError, Status};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// The result type returned by [`wait_for_status`](crate::wait_for_status).
pub type WaitResult<T, E> = std::result::Result<FetchResult<T>, WaitError<E>>;

/// The error type returned by [`wait_for_status`](crate::wait_for_status). `E` is the error type
/// of the caller's fetch closure, handed back verbatim so the caller can tell "the status could
/// not be determined" apart from every other outcome.
#[derive(Debug)]
pub enum WaitError<E> {
    /// The options could not drive a wait. No fetch was attempted.
    InvalidOptions { source: OptionsError },

    /// A fetch attempt failed. The poller does not retry these; the fetch closure owns any
    /// transient-error handling.
    Fetch { source: E },

    /// The budget ran out while the resource was still transitional.
    Timeout {
        timeout: Duration,
        elapsed: Duration,
        attempts: u32,
        last_status: Option<Status>,
    },

    /// The resource reported a status that is neither a success state nor a transitional state.
    UnexpectedState {
        status: Status,
        wanted: Vec<Status>,
        attempts: u32,
    },

    /// The caller's cancellation token fired before the wait concluded.
    Cancelled { elapsed: Duration },
}

impl<E: Display> Display for WaitError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOptions { source } => write!(f, "Invalid wait options: {}", source),
            Self::Fetch { source } => {
                write!(f, "Unable to fetch the current status: {}", source)
            }
            Self::Timeout {
                timeout,
                elapsed,
                attempts,
                last_status,
            } => {
                write!(
                    f,
                    "Timed out after {} attempts over {:?} (budget {:?})",
                    attempts, elapsed, timeout
                )?;
                match last_status {
                    Some(status) => write!(f, ", last observed status '{}'", status),
                    None => write!(f, ", no status was observed"),
                }
            }
            Self::UnexpectedState {
                status,
                wanted,
                attempts,
            } => write!(
                f,
                "Unexpected status '{}' after {} attempts, wanted one of {:?}",
                status, attempts, wanted
            ),
            Self::Cancelled { elapsed } => {
                write!(f, "The wait was cancelled after {:?}", elapsed)
            }
        }
    }
}

impl<E> Error for WaitError<E>
where
    E: Error + 'static,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidOptions { source } => Some(source),
            Self::Fetch { source } => Some(source),
            Self::Timeout { .. } | Self::UnexpectedState { .. } | Self::Cancelled { .. } => None,
        }
    }
}

impl<E> From<OptionsError> for WaitError<E> {
    fn from(source: OptionsError) -> Self {
        Self::InvalidOptions { source }
    }
}
