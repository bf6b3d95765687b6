// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{Duration, Instant};

/// Trailing-edge debouncer: each `schedule` replaces the pending value and restarts the delay.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, now: Instant, value: T) {
        self.pending = Some((now + self.delay, value));
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Remaining wait, zero once due. `None` when idle.
    pub fn time_left(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(deadline, _)| deadline.saturating_duration_since(now))
    }

    /// Takes the pending value if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.cancel(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::Debouncer;

    #[test]
    fn reschedule_restarts_the_delay_and_keeps_latest_value() {
        let delay = Duration::from_millis(200);
        let mut debouncer = Debouncer::new(delay);
        let t0 = Instant::now();

        debouncer.schedule(t0, "d");
        debouncer.schedule(t0 + Duration::from_millis(150), "do");
        assert_eq!(debouncer.take_due(t0 + Duration::from_millis(250)), None);
        assert_eq!(
            debouncer.time_left(t0 + Duration::from_millis(250)),
            Some(Duration::from_millis(100))
        );
        assert_eq!(debouncer.take_due(t0 + Duration::from_millis(350)), Some("do"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn cancel_drops_pending_value() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        let now = Instant::now();
        debouncer.schedule(now, 1);
        assert_eq!(debouncer.cancel(), Some(1));
        assert_eq!(debouncer.take_due(now + Duration::from_secs(1)), None);
    }
}
