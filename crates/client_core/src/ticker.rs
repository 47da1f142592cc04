use std::time::Duration;

use tokio::time::Instant;

/// Fires once per page period. A manual advance calls [`PageTicker::reset`]
/// so the next automatic page change is a full period away.
#[derive(Debug, Clone)]
pub struct PageTicker {
    period: Duration,
    last: Instant,
}

impl PageTicker {
    pub fn new(period: Duration, now: Instant) -> Self {
        Self { period, last: now }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last) >= self.period
    }

    pub fn reset(&mut self, now: Instant) {
        self.last = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn reset_restarts_the_phase() {
        let period = Duration::from_millis(2_600);
        let start = Instant::now();
        let mut ticker = PageTicker::new(period, start);
        assert!(!ticker.is_due(start + Duration::from_millis(2_599)));
        assert!(ticker.is_due(start + period));

        ticker.reset(start + Duration::from_millis(2_000));
        assert!(!ticker.is_due(start + period));
        assert!(ticker.is_due(start + Duration::from_millis(4_600)));
    }
}
