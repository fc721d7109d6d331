//! Progress tracking toward global completion.

/// Counts orders that reached `Done` against the fixed total.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: usize,
    done: usize,
    signalled: bool,
}

impl ProgressTracker {
    /// Creates a tracker for `total` orders.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            done: 0,
            signalled: false,
        }
    }

    /// Records one order reaching `Done`.
    ///
    /// Returns `true` exactly once: on the call that brings the count up to
    /// the total.
    pub fn record_done(&mut self) -> bool {
        self.done += 1;
        self.check_complete()
    }

    /// Signals completion if every order is already finished, which holds
    /// from the start for an empty batch.
    ///
    /// Returns `true` only on the call that signals.
    pub fn check_complete(&mut self) -> bool {
        if !self.signalled && self.done >= self.total {
            self.signalled = true;
            return true;
        }
        false
    }

    /// Orders finished so far.
    pub fn done(&self) -> usize {
        self.done
    }

    /// Total orders in the run.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Orders not yet finished.
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.done)
    }

    /// Whether the completion signal has been emitted.
    pub fn is_complete(&self) -> bool {
        self.signalled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_once() {
        let mut tracker = ProgressTracker::new(2);
        assert!(!tracker.record_done());
        assert!(!tracker.is_complete());
        assert_eq!(tracker.remaining(), 1);
        assert!(tracker.record_done());
        assert!(tracker.is_complete());
        // Stray extra completion must not re-signal
        assert!(!tracker.record_done());
        assert_eq!(tracker.done(), 3);
        assert_eq!(tracker.remaining(), 0);
    }

    #[test]
    fn test_empty_batch_completes_once() {
        let mut tracker = ProgressTracker::new(0);
        assert!(!tracker.is_complete());
        assert!(tracker.check_complete());
        assert!(tracker.is_complete());
        assert!(!tracker.check_complete());
        assert_eq!(tracker.remaining(), 0);
    }
}
