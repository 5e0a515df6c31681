//! Cancellable polling used to wait on the node's eventually consistent state.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::config::DEFAULT_POLL_INTERVAL_MS;
use crate::error::{Error, Result};

/// Delay before the next poll attempt.
pub trait Backoff: Send + Sync {
    /// `attempt` counts the attempts that already came back unfinished, from 0.
    fn delay(&self, attempt: u32) -> Duration;
}

/// Waits the same interval between every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBackoff {
    interval: Duration,
}

impl FixedBackoff {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);

    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for FixedBackoff {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

impl Backoff for FixedBackoff {
    fn delay(&self, _attempt: u32) -> Duration {
        self.interval
    }
}

/// Doubles the delay per attempt, bounded by `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    base: Duration,
    max: Duration,
}

impl ExponentialBackoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }
}

impl Backoff for ExponentialBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        let multiplier = 1_u32 << attempt.min(20);
        self.base.saturating_mul(multiplier).min(self.max)
    }
}

/// Why a wait stopped before its condition held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    Canceled,
    DeadlineExceeded,
}

impl From<Interrupt> for Error {
    fn from(value: Interrupt) -> Self {
        match value {
            Interrupt::Canceled => Self::Canceled,
            Interrupt::DeadlineExceeded => Self::DeadlineExceeded,
        }
    }
}

/// Cancellation token plus an optional deadline, supplied by the caller of a
/// wait.
#[derive(Debug, Clone, Default)]
pub struct CancelScope {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelScope {
    /// A scope that only ends when canceled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self::new().deadline(deadline)
    }

    /// Set or tighten the deadline.
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    fn check(&self) -> std::result::Result<(), Interrupt> {
        if self.token.is_cancelled() {
            return Err(Interrupt::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Interrupt::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Resolves once the scope is canceled or its deadline passes.
    async fn interrupted(&self) -> Interrupt {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                () = self.token.cancelled() => Interrupt::Canceled,
                () = sleep_until(deadline) => Interrupt::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                Interrupt::Canceled
            }
        }
    }
}

/// Run `predicate` until it yields a value, fails, or `scope` ends.
///
/// `Ok(None)` means "not yet". A predicate error aborts the poll and is
/// returned unchanged. The scope is observed before every attempt, while an
/// attempt is in flight and while waiting out the backoff.
pub async fn poll_until<T, F, Fut>(
    scope: &CancelScope,
    backoff: &dyn Backoff,
    mut predicate: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let mut attempt: u32 = 0;
    loop {
        scope.check()?;

        let outcome = tokio::select! {
            biased;
            interrupt = scope.interrupted() => return Err(interrupt.into()),
            outcome = predicate() => outcome?,
        };
        if let Some(value) = outcome {
            return Ok(value);
        }

        let delay = backoff.delay(attempt);
        trace!(attempt, ?delay, "condition not met, backing off");
        attempt = attempt.saturating_add(1);

        tokio::select! {
            biased;
            interrupt = scope.interrupted() => return Err(interrupt.into()),
            () = sleep(delay) => {}
        }
    }
}
