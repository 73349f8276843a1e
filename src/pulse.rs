// src/pulse.rs
// Transient flags and single-slot delayed actions.
//
// Each flag owns exactly one pending clear. Firing it again replaces the deadline, so a
// clear scheduled by an earlier action can never switch off a flag set by a later one.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Pulse {
    duration: Duration,
    active: bool,
    generation: u64,
    deadline: Option<Instant>,
}

impl Pulse {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            active: false,
            generation: 0,
            deadline: None,
        }
    }

    /// Raise the flag until `now + duration`. Returns the new generation.
    pub fn fire(&mut self, now: Instant) -> u64 {
        self.active = true;
        self.generation += 1;
        self.deadline = Some(now + self.duration);
        self.generation
    }

    /// Clear the flag if its deadline has passed. Returns true when it was cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.active = false;
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.deadline = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Bumped on every `fire`; lets a renderer restart an animation for back-to-back pulses.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// One delayed action of type `T`. Scheduling replaces whatever was pending.
#[derive(Debug, Clone)]
pub struct Scheduled<T> {
    pending: Option<(Instant, T)>,
}

impl<T> Default for Scheduled<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Scheduled<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: Instant, action: T) {
        self.pending = Some((at, action));
    }

    /// Take the action if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((at, _)) if *at <= now => self.pending.take().map(|(_, action)| action),
            _ => None,
        }
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, action)| action)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pulse_clears_after_duration() {
        let t0 = Instant::now();
        let mut pulse = Pulse::new(ms(1000));
        pulse.fire(t0);
        assert!(pulse.is_active());
        assert!(!pulse.expire(t0 + ms(999)));
        assert!(pulse.is_active());
        assert!(pulse.expire(t0 + ms(1000)));
        assert!(!pulse.is_active());
        assert_eq!(pulse.deadline(), None);
    }

    #[test]
    fn test_refire_replaces_pending_clear() {
        let t0 = Instant::now();
        let mut pulse = Pulse::new(ms(1000));
        pulse.fire(t0);
        pulse.fire(t0 + ms(600));

        // The first clear would have landed here; the second firing superseded it.
        assert!(!pulse.expire(t0 + ms(1000)));
        assert!(pulse.is_active());
        assert!(pulse.expire(t0 + ms(1600)));
        assert_eq!(pulse.generation(), 2);
    }

    #[test]
    fn test_cancel() {
        let mut pulse = Pulse::new(ms(1000));
        pulse.fire(Instant::now());
        pulse.cancel();
        assert!(!pulse.is_active());
        assert!(pulse.deadline().is_none());
    }

    #[test]
    fn test_scheduled_single_slot() {
        let t0 = Instant::now();
        let mut slot = Scheduled::new();
        slot.schedule(t0 + ms(750), 1);
        slot.schedule(t0 + ms(900), 2);

        assert_eq!(slot.take_due(t0 + ms(800)), None);
        assert_eq!(slot.deadline(), Some(t0 + ms(900)));
        assert_eq!(slot.take_due(t0 + ms(900)), Some(2));
        assert!(!slot.is_pending());
        assert_eq!(slot.take_due(t0 + ms(2000)), None);
    }

    #[test]
    fn test_scheduled_cancel() {
        let mut slot = Scheduled::new();
        slot.schedule(Instant::now(), "advance");
        assert_eq!(slot.cancel(), Some("advance"));
        assert_eq!(slot.cancel(), None);
    }
}
