//! Drives the presence pipeline: snapshot, phase, payload, gate, display

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::error::{DisplayError, TickError};
use crate::gsi::SnapshotStore;
use crate::process::ProcessProbe;

use super::assets::HeroAssets;
use super::builder::build;
use super::gate::UpdateGate;
use super::payload::PresencePayload;
use super::phase::{Phase, PhaseResolver};
use super::session::{DisplayClient, DisplaySession};
use super::status::StatusLine;

/// Start time of the match currently on screen, kept across ticks.
#[derive(Debug, Clone, Default)]
pub struct MatchSession {
    start: Option<i64>,
    previous_start: Option<i64>,
}

impl MatchSession {
    pub fn start_time(&self) -> Option<i64> {
        self.start
    }

    /// Records the phase seen at `now` (epoch seconds) and returns the match start, if any.
    ///
    /// A new match always starts strictly after the previous one.
    pub fn observe(&mut self, phase: Phase, now: i64) -> Option<i64> {
        if !phase.is_match() {
            if let Some(start) = self.start.take() {
                self.previous_start = Some(start);
            }
            return None;
        }

        if self.start.is_none() {
            let start = match self.previous_start {
                Some(previous) if now <= previous => previous + 1,
                _ => now,
            };
            self.start = Some(start);
        }
        self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    Pushed,
    Cleared,
    /// Nothing sent: the gate held the payload back.
    Unchanged,
    /// Nothing sent: no display connection.
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub phase: Phase,
    pub action: TickAction,
}

fn epoch_secs(time: SystemTime) -> i64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn status_text(phase: Phase, payload: Option<&PresencePayload>) -> String {
    match (phase, payload) {
        (Phase::Closed, _) => "Waiting for Deadlock...".to_string(),
        (Phase::TitleScreen, _) => "On Title Screen".to_string(),
        (Phase::Hideout, _) => "In Hideout".to_string(),
        (Phase::PartyHideout, _) => "In Party Hideout".to_string(),
        (Phase::Queue, _) => "In Queue".to_string(),
        (_, Some(payload)) => match &payload.state {
            Some(state) => format!("{} - {}", payload.details, state),
            None => payload.details.clone(),
        },
        (_, None) => "In Match".to_string(),
    }
}

/// Owns all per-tick state. Only the snapshot store is shared with other tasks.
pub struct PresenceManager<C, P, A> {
    session: DisplaySession<C>,
    probe: P,
    store: SnapshotStore,
    assets: A,
    resolver: PhaseResolver,
    gate: UpdateGate,
    match_session: MatchSession,
    status: StatusLine,
}

impl<C, P, A> PresenceManager<C, P, A>
where
    C: DisplayClient,
    P: ProcessProbe,
    A: HeroAssets,
{
    pub fn new(client: C, probe: P, store: SnapshotStore, assets: A) -> Self {
        Self {
            session: DisplaySession::new(client),
            probe,
            store,
            assets,
            resolver: PhaseResolver::default(),
            gate: UpdateGate::default(),
            match_session: MatchSession::default(),
            status: StatusLine::new(),
        }
    }

    pub fn with_resolver(mut self, resolver: PhaseResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_min_push_interval(mut self, min_interval: Duration) -> Self {
        self.gate = UpdateGate::new(min_interval);
        self
    }

    pub fn with_status(mut self, status: StatusLine) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn match_session(&self) -> &MatchSession {
        &self.match_session
    }

    pub fn session(&self) -> &DisplaySession<C> {
        &self.session
    }

    fn display_failed(&mut self, error: DisplayError, phase: Phase) -> TickError {
        if error.is_disconnect() {
            self.status.set("reconnecting to discord...", Some(phase), false);
        }
        TickError::Display(error)
    }

    /// Runs one pass of the pipeline at `now` / `wall`.
    pub async fn tick(&mut self, now: Instant, wall: SystemTime) -> Result<TickOutcome, TickError> {
        let running = self.probe.is_running();
        let read = self.store.read_at(now);
        let phase = self
            .resolver
            .resolve(running, read.snapshot.as_deref(), read.is_stale);

        let match_start = self.match_session.observe(phase, epoch_secs(wall));
        let snapshot = read.snapshot.as_deref().filter(|_| !read.is_stale);
        let payload = build(phase, snapshot, &self.assets, match_start);

        if !self.session.is_connected() {
            if !self.session.connect().await {
                self.status.set("Waiting for Discord...", Some(phase), false);
                return Ok(TickOutcome {
                    phase,
                    action: TickAction::Offline,
                });
            }
            // A fresh connection shows nothing until told otherwise.
            self.gate.reset();
        }

        let action = match &payload {
            None if self.gate.should_clear() => {
                if let Err(e) = self.session.clear().await {
                    return Err(self.display_failed(e, phase));
                }
                self.gate.mark_cleared(now);
                tracing::debug!("Presence cleared");
                TickAction::Cleared
            }
            Some(payload) if self.gate.should_push(payload, now) => {
                if let Err(e) = self.session.push(payload).await {
                    return Err(self.display_failed(e, phase));
                }
                self.gate.mark_pushed(payload, now);
                tracing::debug!("Presence updated: {} ({})", payload.details, phase);
                TickAction::Pushed
            }
            _ => TickAction::Unchanged,
        };

        self.status.set(status_text(phase, payload.as_ref()), Some(phase), true);
        Ok(TickOutcome { phase, action })
    }

    /// Ticks every `interval` until `cancel` fires, then closes the display session.
    ///
    /// Cancellation is only observed between ticks.
    pub async fn run(mut self, interval: Duration, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = tokio::time::Instant::now().into_std();
                    if let Err(e) = self.tick(now, SystemTime::now()).await {
                        tracing::error!("Presence tick failed: {}", e);
                    }
                }
                _ = cancel.cancelled() => {
                    tracing::info!("Presence loop shutting down");
                    break;
                }
            }
        }

        self.session.close().await;
        self.status.set("Stopped", None, false);
    }
}
