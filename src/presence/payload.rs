//! Strongly-typed presence payload and its dedup fingerprint

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::format::truncate_line;

/// Everything the display shows for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresencePayload {
    pub details: String,
    pub state: Option<String>,
    pub large_image: String,
    pub large_text: String,
    pub small_image: Option<String>,
    pub small_text: Option<String>,
    /// Epoch seconds the elapsed-time counter counts from.
    pub start_timestamp: Option<i64>,
    pub party_id: Option<String>,
    /// `(current, max)`, only present for parties larger than one.
    pub party_size: Option<(u32, u32)>,
}

impl PresencePayload {
    pub fn new(details: impl AsRef<str>) -> Self {
        Self {
            details: truncate_line(details.as_ref()),
            ..Self::default()
        }
    }

    pub fn with_state(mut self, state: impl AsRef<str>) -> Self {
        self.state = Some(truncate_line(state.as_ref()));
        self
    }

    pub fn with_large(mut self, image: impl Into<String>, text: impl Into<String>) -> Self {
        self.large_image = image.into();
        self.large_text = text.into();
        self
    }

    pub fn with_small(mut self, image: impl Into<String>, text: impl Into<String>) -> Self {
        self.small_image = Some(image.into());
        self.small_text = Some(text.into());
        self
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = DefaultHasher::new();
        self.details.hash(&mut hasher);
        self.state.hash(&mut hasher);
        self.large_image.hash(&mut hasher);
        self.large_text.hash(&mut hasher);
        self.small_image.hash(&mut hasher);
        self.small_text.hash(&mut hasher);
        self.party_id.hash(&mut hasher);
        self.party_size.hash(&mut hasher);
        // Only whether a timer runs counts, never its value.
        self.start_timestamp.is_some().hash(&mut hasher);
        Fingerprint::Payload(hasher.finish())
    }
}

/// Summary of what was last sent to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    Cleared,
    Payload(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PresencePayload {
        PresencePayload::new("Playing Abrams")
            .with_state("3/1/7 KDA")
            .with_large("abrams", "Abrams")
            .with_small("deadlock_logo", "Standard Match")
    }

    #[test]
    fn fingerprint_ignores_timer_drift() {
        let a = PresencePayload {
            start_timestamp: Some(1_700_000_000),
            ..sample()
        };
        let b = PresencePayload {
            start_timestamp: Some(1_700_000_042),
            ..sample()
        };
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_notices_the_timer_being_dropped() {
        let running = PresencePayload {
            start_timestamp: Some(1_700_000_000),
            ..sample()
        };
        assert_ne!(running.fingerprint(), sample().fingerprint());
    }

    #[test]
    fn fingerprint_tracks_visible_text() {
        let changed = sample().with_state("4/1/7 KDA");
        assert_ne!(changed.fingerprint(), sample().fingerprint());
        assert_ne!(sample().fingerprint(), Fingerprint::Cleared);
    }

    #[test]
    fn builder_helpers_truncate_lines() {
        let payload = PresencePayload::new("x".repeat(300)).with_state("y".repeat(300));
        assert_eq!(payload.details.len(), 128);
        assert_eq!(payload.state.map(|s| s.len()), Some(128));
    }
}
