/*!

`api-retry` wraps individual cloud API calls with a bounded retry loop for errors that are
momentary rather than wrong, like an AWS API rejecting a reference to a resource it has not
finished propagating yet. The caller supplies the operation, a predicate that says which of its
errors are worth retrying, and a [`RetryPolicy`] bounding the attempts in time and count.

It also carries the small narrowing helpers for list-shaped lookup responses that are expected
to match exactly one resource. Waiting for a resource to *converge* is a different job; that is
[`status_waiter::wait_for_status`], whose [`Interval`](status_waiter::Interval) strategies this
crate shares.

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

mod results;
mod retry;

pub use results::{optional_single_result, single_result, SingleResultError};
pub use retry::{retry_when, RetryError, RetryPolicy, DEFAULT_RETRY_TIMEOUT};
