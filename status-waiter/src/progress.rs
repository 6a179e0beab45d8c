use crate::options::FetchResult;
use std::time::{Duration, Instant};

/// A point-in-time summary of a running wait, handed to the progress sink alongside the latest
/// fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressMeta {
    /// Time elapsed since the wait began.
    pub elapsed: Duration,

    /// Fetch attempts completed so far, including the one that produced the current result.
    pub attempts: u32,
}

/// A callback that receives throttled notifications while the awaited resource is still in a
/// transitional state. Terminal outcomes are returned, never reported here.
pub type ProgressSink<T> = Box<dyn FnMut(&FetchResult<T>, &ProgressMeta) + Send>;

/// Spaces out repeated notifications. The first is always allowed through; each later one only
/// when at least `gap` has passed since the last notification that was allowed.
pub(crate) struct Throttle {
    gap: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub(crate) fn new(gap: Duration) -> Self {
        Self { gap, last: None }
    }

    pub(crate) fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.gap => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
