#![forbid(unsafe_code)]

//! Trailing-edge debouncer driven by an explicit clock.
//!
//! Typing into the search box schedules the latest query; only once the
//! input has been quiet for the configured delay does [`Debouncer::poll`]
//! hand the value out. Every [`schedule`](Debouncer::schedule) supersedes the
//! previous pending value, so a burst of keystrokes collapses into a single
//! emission.
//!
//! Nothing here spawns timers. The owner calls `poll` from its tick and can
//! use [`time_until_ready`](Debouncer::time_until_ready) to size its next
//! wait. All methods take the current [`Instant`] so tests are deterministic.
//!
//! # Invariants
//!
//! 1. At most one value is pending.
//! 2. A value is emitted at most once, and only when
//!    `now - scheduled_at >= delay`.
//! 3. Tokens are unique per debouncer; a token is current only while its
//!    value is still pending.

use std::time::{Duration, Instant};

/// Identifies one scheduled value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingToken(u64);

#[derive(Debug)]
struct Pending<T> {
    value: T,
    scheduled_at: Instant,
    token: PendingToken,
}

/// Collapses bursts of values into the last one after a quiet period.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
    next_token: u64,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            next_token: 0,
        }
    }

    /// The quiet period.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value`, replacing (cancelling) whatever was pending.
    pub fn schedule(&mut self, value: T, now: Instant) -> PendingToken {
        let token = PendingToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        if let Some(previous) = self.pending.replace(Pending {
            value,
            scheduled_at: now,
            token,
        }) {
            tracing::trace!(superseded = previous.token.0, token = token.0, "debounce rescheduled");
        }
        token
    }

    /// Drop the pending value, returning it if there was one.
    pub fn cancel(&mut self) -> Option<T> {
        let pending = self.pending.take()?;
        tracing::trace!(token = pending.token.0, "debounce cancelled");
        Some(pending.value)
    }

    /// Emit the pending value if the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|p| now.saturating_duration_since(p.scheduled_at) >= self.delay);
        if !ready {
            return None;
        }
        let pending = self.pending.take()?;
        tracing::trace!(
            token = pending.token.0,
            waited_ms = now.saturating_duration_since(pending.scheduled_at).as_millis() as u64,
            "debounce fired"
        );
        Some(pending.value)
    }

    /// Emit the pending value immediately, ignoring the delay.
    pub fn flush(&mut self) -> Option<T> {
        let pending = self.pending.take()?;
        tracing::trace!(token = pending.token.0, "debounce flushed");
        Some(pending.value)
    }

    /// Remaining quiet time before `poll` would emit, or `None` when idle.
    #[must_use]
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        let pending = self.pending.as_ref()?;
        let elapsed = now.saturating_duration_since(pending.scheduled_at);
        Some(self.delay.saturating_sub(elapsed))
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether `token` still identifies the pending value.
    #[must_use]
    pub fn is_current(&self, token: PendingToken) -> bool {
        self.pending.as_ref().is_some_and(|p| p.token == token)
    }

    /// Peek at the pending value.
    #[must_use]
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }
}
