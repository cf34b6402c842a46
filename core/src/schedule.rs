use web_time::{Duration, Instant};

use crate::RevealTicket;

/// Delay between the end of a round and showing the whole board.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(500);

/// Single-slot timer for the deferred reveal-all.
///
/// Nothing here runs on its own: the owner's event loop asks for
/// [`next_deadline`](Self::next_deadline) and calls [`take_due`](Self::take_due)
/// when it wakes up. Scheduling again replaces the previous entry.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealSchedule {
    delay: Duration,
    slot: Option<(RevealTicket, Instant)>,
}

impl RevealSchedule {
    pub fn new(delay: Duration) -> Self {
        if delay.is_zero() {
            log::warn!("reveal delay is zero, the board will show on the next tick");
        }
        Self { delay, slot: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, ticket: RevealTicket, now: Instant) {
        let deadline = now + self.delay;
        if let Some((previous, _)) = self.slot.replace((ticket, deadline)) {
            log::trace!("replaced pending reveal for round {}", previous.round());
        }
    }

    pub fn cancel(&mut self) -> Option<RevealTicket> {
        self.slot.take().map(|(ticket, _)| ticket)
    }

    pub fn pending(&self) -> Option<RevealTicket> {
        self.slot.map(|(ticket, _)| ticket)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.slot.map(|(_, deadline)| deadline)
    }

    /// How long the event loop may wait before the next tick matters.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Hands out the ticket once its deadline has passed, at most once.
    pub fn take_due(&mut self, now: Instant) -> Option<RevealTicket> {
        match self.slot {
            Some((ticket, deadline)) if now >= deadline => {
                self.slot = None;
                Some(ticket)
            }
            _ => None,
        }
    }
}

impl Default for RevealSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_DELAY)
    }
}
