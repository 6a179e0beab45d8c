use std::time::Duration;

/// The delay used between poll attempts when the caller does not choose one.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

// Doubling stops at this exponent so the computed delay saturates instead of wrapping.
const MAX_BACKOFF_EXPONENT: u32 = 32;

/// How long to pause between poll attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    /// The same delay before every attempt.
    Fixed(Duration),

    /// A delay that doubles after each attempt, starting from `initial`. When `cap` is given the
    /// delay never grows beyond it.
    Backoff {
        initial: Duration,
        cap: Option<Duration>,
    },
}

impl Interval {
    /// Returns the delay to pause after the given 1-based attempt count. An attempt count of zero
    /// is treated as the first attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed(duration) => *duration,
            Self::Backoff { initial, cap } => {
                let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
                let delay = initial.saturating_mul(2u32.saturating_pow(exponent));
                match cap {
                    Some(cap) => delay.min(*cap),
                    None => delay,
                }
            }
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::Fixed(DEFAULT_POLL_INTERVAL)
    }
}
