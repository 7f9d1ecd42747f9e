//! Deferred-execution policies for the single-threaded event loop.
//!
//! Nothing here owns a timer or a thread. The host loop passes the current
//! `Instant` to `poll`, and a policy answers whether its work is due. This
//! keeps scheduling deterministic and testable with synthetic clocks.
//!
//! - [`Debounce`]: coalesce pending requests into one scheduled run.
//! - [`Throttle`]: rate-limit runs, always executing the trailing request.

use std::time::{Duration, Instant};

/// Coalescing schedule: at most one run is pending at any time.
///
/// A request while a run is already scheduled is absorbed; it does not push
/// the deadline back, so a steady stream of requests cannot starve the run.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    /// Create a debounce with the given delay between first request and run.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Schedule a run unless one is pending.
    ///
    /// Returns `true` if this call scheduled a new run.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + self.delay);
        true
    }

    /// Schedule a run for `now`, bypassing the delay.
    pub fn request_immediate(&mut self, now: Instant) {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(now),
            None => now,
        });
    }

    /// Returns `true` (and clears the schedule) if the pending run is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a run is scheduled.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the pending run becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Rate limiter with guaranteed trailing execution.
///
/// Requests carry arguments; when several arrive within one interval only
/// the latest survives and is delivered once the interval has elapsed. The
/// first request after an idle period fires on the next poll.
#[derive(Debug, Clone)]
pub struct Throttle<A> {
    interval: Duration,
    last_fired: Option<Instant>,
    pending: Option<A>,
    requested_at: Option<Instant>,
}

impl<A> Throttle<A> {
    /// Create a throttle that fires at most once per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
            pending: None,
            requested_at: None,
        }
    }

    /// Request a run with `args` at `now`, replacing any earlier pending
    /// arguments. The pending run keeps the instant of its first request.
    pub fn request(&mut self, args: A, now: Instant) {
        if self.requested_at.is_none() {
            self.requested_at = Some(now);
        }
        self.pending = Some(args);
    }

    /// Take the pending arguments if a run is allowed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        self.pending.as_ref()?;
        let ready = match self.last_fired {
            Some(last) => now.duration_since(last) >= self.interval,
            None => true,
        };
        if !ready {
            return None;
        }
        self.last_fired = Some(now);
        self.requested_at = None;
        self.pending.take()
    }

    /// Whether a request is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Earliest instant at which the pending request may fire.
    pub fn deadline(&self) -> Option<Instant> {
        let requested = self.requested_at?;
        Some(match self.last_fired {
            Some(last) => (last + self.interval).max(requested),
            None => requested,
        })
    }
}
