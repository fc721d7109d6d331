//! Completion clocks.
//!
//! A clock holds every in-flight pairing until its duration has elapsed and
//! hands completions back one at a time. Timers are never cancelled.
//!
//! - [`TokioClock`] sleeps in real time, one task per pairing, scaled by a
//!   configurable time unit.
//! - [`VirtualClock`] is a discrete-event queue that pops the earliest
//!   completion immediately.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::{sleep_until, Instant};
use tracing::warn;

use crate::models::Pairing;

/// Roughly 30 years.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Fires a completion for every scheduled pairing after its duration.
///
/// Completions with different end times are returned in end-time order.
/// Completions with equal end times may come back in any order.
#[allow(async_fn_in_trait)]
pub trait CompletionClock {
    /// Starts the timer for a pairing.
    fn schedule(&mut self, pairing: Pairing);

    /// Waits for the next completion. `None` once nothing is pending.
    async fn next_due(&mut self) -> Option<Pairing>;

    /// Number of timers still pending.
    fn pending(&self) -> usize;
}

/// Real-time clock backed by tokio timers.
///
/// Each pairing sleeps until `origin + ends_at * unit`, so wall-clock firing
/// order matches simulation time even when scheduling is slightly late.
#[derive(Debug)]
pub struct TokioClock {
    unit: Duration,
    origin: Instant,
    timers: JoinSet<Pairing>,
}

impl TokioClock {
    /// Creates a clock whose simulation t=0 is now.
    pub fn new(unit: Duration) -> Self {
        Self {
            unit,
            origin: Instant::now(),
            timers: JoinSet::new(),
        }
    }

    /// Creates a clock with a time unit given in milliseconds.
    pub fn from_millis(unit_ms: u64) -> Self {
        Self::new(Duration::from_millis(unit_ms))
    }

    /// Wall-clock instant corresponding to simulation time `at`.
    ///
    /// Offsets past `u64::MAX` nanoseconds, or past what `Instant` can
    /// represent, are clamped to [`FAR_FUTURE`] after the origin.
    fn deadline(&self, at: u64) -> Instant {
        let nanos = self.unit.as_nanos().saturating_mul(u128::from(at));
        let offset = Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX));
        self.origin
            .checked_add(offset)
            .unwrap_or_else(|| self.origin + FAR_FUTURE)
    }

    /// Simulation t=0.
    pub fn origin(&self) -> Instant {
        self.origin
    }
}

impl CompletionClock for TokioClock {
    fn schedule(&mut self, pairing: Pairing) {
        let deadline = self.deadline(pairing.ends_at());
        self.timers.spawn(async move {
            sleep_until(deadline).await;
            pairing
        });
    }

    async fn next_due(&mut self) -> Option<Pairing> {
        loop {
            match self.timers.join_next().await? {
                Ok(pairing) => return Some(pairing),
                Err(e) => warn!(error = %e, "completion timer failed"),
            }
        }
    }

    fn pending(&self) -> usize {
        self.timers.len()
    }
}

#[derive(Debug)]
struct Due {
    ends_at: u64,
    seq: u64,
    pairing: Pairing,
}

impl PartialEq for Due {
    fn eq(&self, other: &Self) -> bool {
        (self.ends_at, self.seq) == (other.ends_at, other.seq)
    }
}

impl Eq for Due {}

impl PartialOrd for Due {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Due {
    // Reversed: BinaryHeap is a max-heap and we want the earliest first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.ends_at, other.seq).cmp(&(self.ends_at, self.seq))
    }
}

/// Discrete-event clock: completions pop in `(ends_at, schedule order)`
/// order without any real waiting.
#[derive(Debug, Default)]
pub struct VirtualClock {
    queue: BinaryHeap<Due>,
    next_seq: u64,
}

impl VirtualClock {
    /// Creates an empty clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// End time of the earliest pending completion.
    pub fn peek_time(&self) -> Option<u64> {
        self.queue.peek().map(|d| d.ends_at)
    }
}

impl CompletionClock for VirtualClock {
    fn schedule(&mut self, pairing: Pairing) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Due {
            ends_at: pairing.ends_at(),
            seq,
            pairing,
        });
    }

    async fn next_due(&mut self) -> Option<Pairing> {
        self.queue.pop().map(|d| d.pairing)
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}
