/*!

`status-waiter` polls a remote resource until it converges to a desired status. The caller
supplies a fetch closure that reads the resource's current status label, the sets of labels that
mean "done" and "still working", and a wall-clock budget; [`wait_for_status`] polls on a fixed or
backoff schedule until the resource reaches a success state, reporting throttled progress along
the way. Timeouts, unexpected statuses, fetch failures, and cancellation each come back as a
distinct [`WaitError`] so callers can react to them differently.

The poller knows nothing about any particular service. It never retries a failed fetch (wrap the
fetch closure with a retry helper if its errors can be transient) and never interprets a status
label beyond exact comparison with the caller's state sets.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

mod error;
mod interval;
mod options;
mod progress;
mod wait;

pub use error::{WaitError, WaitResult};
pub use interval::{Interval, DEFAULT_POLL_INTERVAL};
pub use options::{FetchResult, Options, OptionsError, Status, DEFAULT_PROGRESS_INTERVAL};
pub use progress::{ProgressMeta, ProgressSink};
pub use wait::wait_for_status;
