use api_retry::{retry_when, RetryError, RetryPolicy};
use status_waiter::Interval;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A stand-in for a cloud SDK error type.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CallError(&'static str);

impl std::fmt::Display for CallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "call failed: {}", self.0)
    }
}

impl std::error::Error for CallError {}

#[tokio::test]
async fn returns_the_first_success() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let op = move || {
        let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if attempt < 3 {
                Err(CallError("target not registered yet"))
            } else {
                Ok("registered")
            }
        }
    };
    let policy = RetryPolicy {
        timeout: Duration::from_secs(10),
        interval: Interval::Fixed(Duration::from_millis(1)),
        max_attempts: None,
    };

    let value = retry_when(policy, op, |_: &CallError| true)
        .await
        .expect("the call should eventually succeed");

    assert_eq!(value, "registered");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn a_non_retryable_error_is_returned_after_one_attempt() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let op = move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { Err::<(), _>(CallError("access denied")) }
    };

    let error = retry_when(RetryPolicy::default(), op, |_: &CallError| false)
        .await
        .expect_err("the call should fail");

    assert!(matches!(error, RetryError::NonRetryable { .. }));
    assert_eq!(error.into_source(), CallError("access denied"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn the_attempt_cap_bounds_retries() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let op = move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { Err::<(), _>(CallError("try again")) }
    };
    let policy = RetryPolicy {
        timeout: Duration::from_secs(60),
        interval: Interval::Fixed(Duration::from_millis(1)),
        max_attempts: Some(3),
    };

    let error = retry_when(policy, op, |_: &CallError| true)
        .await
        .expect_err("the call should fail");

    match error {
        RetryError::Exhausted {
            attempts, source, ..
        } => {
            assert_eq!(attempts, 3);
            assert_eq!(source, CallError("try again"));
        }
        other => panic!("Expected exhaustion, got: {}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn the_time_budget_bounds_retries() {
    let op = || async { Err::<(), _>(CallError("still propagating")) };
    let policy = RetryPolicy {
        timeout: Duration::from_millis(100),
        interval: Interval::Fixed(Duration::from_millis(40)),
        max_attempts: None,
    };

    let started = Instant::now();
    let error = retry_when(policy, op, |_: &CallError| true)
        .await
        .expect_err("the call should fail");

    match error {
        RetryError::Exhausted { attempts, .. } => assert!(attempts >= 2),
        other => panic!("Expected exhaustion, got: {}", other),
    }
    // The helper stops rather than sleeping through its deadline.
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn at_least_one_attempt_is_made_with_no_budget() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let op = move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { Ok::<_, CallError>(42) }
    };
    let policy = RetryPolicy {
        timeout: Duration::ZERO,
        interval: Interval::Fixed(Duration::from_millis(1)),
        max_attempts: None,
    };

    let value = retry_when(policy, op, |_: &CallError| true)
        .await
        .expect("a zero budget still allows the first attempt");

    assert_eq!(value, 42);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn a_failing_call_with_no_budget_exhausts_after_one_attempt() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let op = move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { Err::<(), _>(CallError("try again")) }
    };
    let policy = RetryPolicy {
        timeout: Duration::ZERO,
        interval: Interval::Fixed(Duration::from_millis(1)),
        max_attempts: None,
    };

    let error = retry_when(policy, op, |_: &CallError| true)
        .await
        .expect_err("the call should fail");

    match error {
        RetryError::Exhausted { attempts, .. } => assert_eq!(attempts, 1),
        other => panic!("Expected exhaustion, got: {}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
