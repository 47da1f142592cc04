//! Poll scheduling for the remote store, with a single-flight guard.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::time::Instant;

#[derive(Debug)]
pub struct SyncScheduler {
    interval: Duration,
    last_poll: Option<Instant>,
    immediate: bool,
    in_flight: Arc<AtomicBool>,
}

/// Dropping it, including when the refresh future is cancelled, reopens
/// the scheduler.
#[derive(Debug)]
pub struct SyncPermit {
    in_flight: Arc<AtomicBool>,
}

impl Drop for SyncPermit {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

impl SyncScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_poll: None,
            immediate: false,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_poll(&self) -> Option<Instant> {
        self.last_poll
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Cleared when a refresh actually starts.
    pub fn request_immediate(&mut self) {
        self.immediate = true;
    }

    pub fn is_due(&self, now: Instant) -> bool {
        if self.immediate {
            return true;
        }
        match self.last_poll {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// `None` while a permit is outstanding. The poll timestamp is taken
    /// here, so a failed refresh waits out a full interval.
    pub fn try_begin(&mut self, now: Instant) -> Option<SyncPermit> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        self.last_poll = Some(now);
        self.immediate = false;
        Some(SyncPermit {
            in_flight: Arc::clone(&self.in_flight),
        })
    }
}
