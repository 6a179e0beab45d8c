use crate::error::{WaitError, WaitResult};
use crate::options::{FetchResult, Options, StateKind};
use crate::progress::{ProgressMeta, Throttle};
use log::{debug, trace};
use std::future::Future;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Polls a remote resource until it reaches one of the caller's success states.
///
/// `fetch` is called once per attempt to read the resource's current status; it must be
/// read-only, since it may run any number of times. Each reported status is classified against
/// `options`: a success state ends the wait with that result, a transitional state schedules
/// another attempt after `options.interval`, and anything else fails the wait immediately. A
/// fetch error also ends the wait immediately, with the error handed back verbatim. While the
/// resource is transitional, `options.progress_sink` receives notifications spaced at least
/// `options.progress_interval` apart.
///
/// The wait runs entirely on the caller's task; nothing is spawned, and nothing outlives the
/// call. Cancelling `cancel` interrupts an in-flight fetch or sleep and returns
/// [`WaitError::Cancelled`].
///
/// # Example
///
/// ```no_run
/// # use status_waiter::{wait_for_status, FetchResult, Options, Status};
/// # use std::time::Duration;
/// # use tokio_util::sync::CancellationToken;
/// # #[derive(Debug)]
/// # struct ApiError;
/// # impl std::fmt::Display for ApiError {
/// #     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
/// #         write!(f, "api error")
/// #     }
/// # }
/// # impl std::error::Error for ApiError {}
/// # async fn describe_import() -> Result<FetchResult<String>, ApiError> {
/// #     Ok(FetchResult::new("completed"))
/// # }
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let options = Options {
///     timeout: Duration::from_secs(300),
///     success_states: vec![Status::new("completed")],
///     transitional_states: vec![Status::new("in-progress")],
///     ..Options::default()
/// };
/// let cancel = CancellationToken::new();
/// let outcome = wait_for_status(&cancel, describe_import, options).await?;
/// println!("import finished as '{}'", outcome.status);
/// # Ok(())
/// # }
/// ```
pub async fn wait_for_status<T, E, F, Fut>(
    cancel: &CancellationToken,
    mut fetch: F,
    mut options: Options<T>,
) -> WaitResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<FetchResult<T>, E>>,
{
    options.validate()?;

    let start = Instant::now();
    let mut throttle = Throttle::new(options.progress_interval);
    let mut attempts: u32 = 0;
    let mut last_status = None;

    debug!(
        "Waiting up to {:?} for one of {:?}",
        options.timeout, options.success_states
    );

    loop {
        if cancel.is_cancelled() {
            debug!("Cancelled after {} attempts", attempts);
            return Err(WaitError::Cancelled {
                elapsed: start.elapsed(),
            });
        }
        let elapsed = start.elapsed();
        if elapsed >= options.timeout {
            debug!("Budget exhausted after {} attempts", attempts);
            return Err(WaitError::Timeout {
                timeout: options.timeout,
                elapsed,
                attempts,
                last_status,
            });
        }

        let fetched = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Cancelled after {} attempts", attempts);
                return Err(WaitError::Cancelled {
                    elapsed: start.elapsed(),
                });
            }
            fetched = fetch() => fetched,
        };
        attempts = attempts.saturating_add(1);
        let result = match fetched {
            Ok(result) => result,
            Err(source) => {
                debug!("Fetch attempt {} failed", attempts);
                return Err(WaitError::Fetch { source });
            }
        };
        last_status = Some(result.status.clone());

        match options.classify(&result.status) {
            StateKind::Success => {
                debug!(
                    "Status '{}' is a success state, done after {} attempts",
                    result.status, attempts
                );
                return Ok(result);
            }
            StateKind::Transitional => {
                trace!("Status '{}' is transitional, attempt {}", result.status, attempts);
            }
            StateKind::Unexpected => {
                debug!(
                    "Status '{}' is neither a success state nor a transitional state",
                    result.status
                );
                return Err(WaitError::UnexpectedState {
                    status: result.status,
                    wanted: options.success_states,
                    attempts,
                });
            }
        }

        if let Some(sink) = options.progress_sink.as_mut() {
            if throttle.ready(Instant::now()) {
                let meta = ProgressMeta {
                    elapsed: start.elapsed(),
                    attempts,
                };
                sink(&result, &meta);
            }
        }

        // Sleep until the next attempt is due, but never past the deadline and never through a
        // cancellation.
        let delay = options.interval.delay(attempts);
        let remaining = options.timeout.saturating_sub(start.elapsed());
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Cancelled after {} attempts", attempts);
                return Err(WaitError::Cancelled {
                    elapsed: start.elapsed(),
                });
            }
            _ = tokio::time::sleep(delay.min(remaining)) => {}
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::options::Status;
    use std::sync::Mutex;
    use std::time::Duration;

    static MESSAGES: Mutex<Vec<String>> = Mutex::new(Vec::new());

    struct MemoryLogger;

    impl log::Log for MemoryLogger {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            metadata.target().starts_with(env!("CARGO_CRATE_NAME"))
        }

        fn log(&self, record: &log::Record<'_>) {
            if self.enabled(record.metadata()) {
                if let Ok(mut messages) = MESSAGES.lock() {
                    messages.push(record.args().to_string());
                }
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: MemoryLogger = MemoryLogger;

    fn captured() -> Vec<String> {
        MESSAGES
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    #[derive(Debug)]
    struct BrokenApi;

    impl std::fmt::Display for BrokenApi {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "broken api")
        }
    }

    impl std::error::Error for BrokenApi {}

    fn wait_options() -> Options<()> {
        Options {
            timeout: Duration::from_secs(5),
            success_states: vec![Status::new("ok")],
            transitional_states: vec![Status::new("pending")],
            ..Options::default()
        }
    }

    /// A fetch error and a cancellation each end the wait with a debug line, like the other
    /// outcomes do.
    #[tokio::test]
    async fn terminal_transitions_are_logged() {
        log::set_logger(&LOGGER).ok();
        log::set_max_level(log::LevelFilter::Debug);

        let cancel = CancellationToken::new();
        let failing = || async { Err::<FetchResult<()>, _>(BrokenApi) };
        let _ = wait_for_status(&cancel, failing, wait_options()).await;
        assert!(captured()
            .iter()
            .any(|line| line.contains("Fetch attempt 1 failed")));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let pending = || async { Ok::<_, BrokenApi>(FetchResult::<()>::new("pending")) };
        let _ = wait_for_status(&cancel, pending, wait_options()).await;
        assert!(captured()
            .iter()
            .any(|line| line.contains("Cancelled after 0 attempts")));
    }
}
