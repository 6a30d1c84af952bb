//! Decides whether a freshly built payload is worth sending

use std::time::{Duration, Instant};

use super::payload::{Fingerprint, PresencePayload};

pub const DEFAULT_MIN_PUSH_INTERVAL: Duration = Duration::from_secs(15);

/// Rate limit plus change detection for display pushes.
///
/// A push needs both enough time since the previous one and a different fingerprint.
/// Clears skip the rate limit but are still deduplicated.
#[derive(Debug, Clone)]
pub struct UpdateGate {
    min_interval: Duration,
    last_push: Option<Instant>,
    last_fingerprint: Option<Fingerprint>,
}

impl UpdateGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_push: None,
            last_fingerprint: None,
        }
    }

    fn rate_allows(&self, now: Instant) -> bool {
        match self.last_push {
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
            None => true,
        }
    }

    pub fn should_push(&self, payload: &PresencePayload, now: Instant) -> bool {
        self.rate_allows(now) && self.last_fingerprint != Some(payload.fingerprint())
    }

    pub fn mark_pushed(&mut self, payload: &PresencePayload, now: Instant) {
        self.last_fingerprint = Some(payload.fingerprint());
        self.last_push = Some(now);
    }

    pub fn should_clear(&self) -> bool {
        self.last_fingerprint != Some(Fingerprint::Cleared)
    }

    pub fn mark_cleared(&mut self, now: Instant) {
        self.last_fingerprint = Some(Fingerprint::Cleared);
        self.last_push = Some(now);
    }

    /// Forget what the display shows, e.g. after reconnecting to a fresh client.
    pub fn reset(&mut self) {
        self.last_fingerprint = None;
        self.last_push = None;
    }
}

impl Default for UpdateGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PUSH_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(state: &str) -> PresencePayload {
        PresencePayload::new("Playing Abrams").with_state(state)
    }

    #[test]
    fn first_payload_always_passes() {
        let gate = UpdateGate::default();
        assert!(gate.should_push(&payload("0/0/0 KDA"), Instant::now()));
    }

    #[test]
    fn timer_only_changes_are_deduplicated() {
        let mut gate = UpdateGate::default();
        let t0 = Instant::now();
        let first = PresencePayload {
            start_timestamp: Some(100),
            ..payload("1/0/0 KDA")
        };
        gate.mark_pushed(&first, t0);

        let drifted = PresencePayload {
            start_timestamp: Some(105),
            ..payload("1/0/0 KDA")
        };
        assert!(!gate.should_push(&drifted, t0 + Duration::from_secs(5)));
        assert!(!gate.should_push(&drifted, t0 + Duration::from_secs(60)));
    }

    #[test]
    fn dedup_compares_against_last_pushed_not_last_built() {
        let mut gate = UpdateGate::new(Duration::from_secs(15));
        let t0 = Instant::now();

        let first = payload("1/0/0 KDA");
        assert!(gate.should_push(&first, t0));
        gate.mark_pushed(&first, t0);

        let second = payload("2/0/0 KDA");
        assert!(!gate.should_push(&second, t0 + Duration::from_secs(2)));

        let third = payload("2/0/0 KDA");
        assert!(gate.should_push(&third, t0 + Duration::from_secs(16)));
    }

    #[test]
    fn clears_bypass_rate_but_not_dedup() {
        let mut gate = UpdateGate::default();
        let t0 = Instant::now();
        gate.mark_pushed(&payload("x"), t0);

        assert!(gate.should_clear());
        gate.mark_cleared(t0 + Duration::from_secs(1));
        assert!(!gate.should_clear());

        assert!(!gate.should_push(&payload("x"), t0 + Duration::from_secs(2)));
        assert!(gate.should_push(&payload("x"), t0 + Duration::from_secs(16)));
    }

    #[test]
    fn reset_forgets_history() {
        let mut gate = UpdateGate::default();
        let t0 = Instant::now();
        gate.mark_pushed(&payload("x"), t0);
        gate.reset();
        assert!(gate.should_push(&payload("x"), t0));
        assert!(gate.should_clear());
    }
}
