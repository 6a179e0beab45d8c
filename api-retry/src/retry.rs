use log::warn;
use status_waiter::Interval;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::time::{Duration, Instant};

/// The total retry budget used when the caller does not choose one.
pub const DEFAULT_RETRY_TIMEOUT: Duration = Duration::from_secs(120);

/// How long to keep retrying one API call and how to space the attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total wall-clock budget across all attempts.
    pub timeout: Duration,

    /// How long to pause between attempts.
    pub interval: Interval,

    /// An upper bound on the number of attempts, when the caller wants one in addition to the
    /// time budget.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_RETRY_TIMEOUT,
            interval: Interval::Backoff {
                initial: Duration::from_millis(500),
                cap: Some(Duration::from_secs(10)),
            },
            max_attempts: None,
        }
    }
}

/// Calls `op` until it succeeds, `is_transient` declines to retry its error, or the policy's
/// budget runs out. At least one attempt is always made, and the helper never sleeps past its
/// own deadline.
///
/// This is for calls whose errors can be momentary, like an AWS API rejecting a reference to a
/// resource it has not finished propagating. It is not a status poller: a call that succeeds
/// while the resource behind it is still converging belongs with
/// [`wait_for_status`](status_waiter::wait_for_status) instead.
///
/// # Example
///
/// ```no_run
/// # use api_retry::{retry_when, RetryPolicy};
/// # #[derive(Debug)]
/// # struct ApiError {
/// #     throttled: bool,
/// # }
/// # impl std::fmt::Display for ApiError {
/// #     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
/// #         write!(f, "api error")
/// #     }
/// # }
/// # impl std::error::Error for ApiError {}
/// # async fn register_target() -> Result<(), ApiError> {
/// #     Ok(())
/// # }
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// retry_when(RetryPolicy::default(), register_target, |e| e.throttled).await?;
/// # Ok(())
/// # }
/// ```
pub async fn retry_when<T, E, F, Fut, P>(
    policy: RetryPolicy,
    mut op: F,
    is_transient: P,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let start = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        let result = op().await;
        attempts = attempts.saturating_add(1);

        let error = match result {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if !is_transient(&error) {
            return Err(RetryError::NonRetryable { source: error });
        }

        if let Some(max) = policy.max_attempts {
            if attempts >= max {
                return Err(RetryError::Exhausted {
                    attempts,
                    elapsed: start.elapsed(),
                    source: error,
                });
            }
        }

        let delay = policy.interval.delay(attempts);
        let elapsed = start.elapsed();
        if elapsed.saturating_add(delay) >= policy.timeout {
            return Err(RetryError::Exhausted {
                attempts,
                elapsed,
                source: error,
            });
        }

        warn!(
            "Attempt {} failed with '{}', retrying in {:?}",
            attempts, error, delay
        );
        tokio::time::sleep(delay).await;
    }
}

/// The error type returned by [`retry_when`]. `E` is the error type of the caller's operation;
/// [`RetryError::into_source`] recovers it verbatim.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The predicate declined to retry. The operation's error is handed back untouched after a
    /// single attempt at it.
    NonRetryable { source: E },

    /// Every attempt the policy allowed failed. The most recent error is handed back.
    Exhausted {
        attempts: u32,
        elapsed: Duration,
        source: E,
    },
}

impl<E> RetryError<E> {
    /// Unwraps to the underlying operation error, discarding the retry bookkeeping.
    pub fn into_source(self) -> E {
        match self {
            Self::NonRetryable { source } => source,
            Self::Exhausted { source, .. } => source,
        }
    }
}

impl<E: Display> Display for RetryError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonRetryable { source } => write!(f, "Not retrying: {}", source),
            Self::Exhausted {
                attempts,
                elapsed,
                source,
            } => write!(
                f,
                "Retries exhausted after {} attempts over {:?}: {}",
                attempts, elapsed, source
            ),
        }
    }
}

impl<E> Error for RetryError<E>
where
    E: Error + 'static,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NonRetryable { source } => Some(source),
            Self::Exhausted { source, .. } => Some(source),
        }
    }
}
