//! Maps raw game observations to a single high-level phase

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gsi::GameSnapshot;

/// What the player is doing right now. Exactly one holds per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Closed,
    TitleScreen,
    Hideout,
    PartyHideout,
    Queue,
    InMatch,
    PostMatch,
}

impl Phase {
    /// Whether a match is underway or just finished.
    pub fn is_match(self) -> bool {
        matches!(self, Self::InMatch | Self::PostMatch)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Closed => "closed",
            Self::TitleScreen => "title_screen",
            Self::Hideout => "hideout",
            Self::PartyHideout => "party_hideout",
            Self::Queue => "queue",
            Self::InMatch => "in_match",
            Self::PostMatch => "post_match",
        };
        f.write_str(name)
    }
}

/// Which signal moves a match into [`Phase::PostMatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostMatchTrigger {
    /// The game's own post-game state in the snapshot.
    #[default]
    GameOverFlag,
    /// Never report post-match; a finished match reads as in-match until it is left.
    Never,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseResolver {
    post_match: PostMatchTrigger,
}

impl PhaseResolver {
    pub fn new(post_match: PostMatchTrigger) -> Self {
        Self { post_match }
    }

    /// First matching rule wins. Stale snapshots count as absent.
    pub fn resolve(
        &self,
        process_running: bool,
        snapshot: Option<&GameSnapshot>,
        is_stale: bool,
    ) -> Phase {
        if !process_running {
            return Phase::Closed;
        }

        let snapshot = match snapshot {
            Some(snapshot) if !is_stale => snapshot,
            _ => return Phase::TitleScreen,
        };

        if snapshot.match_flag() {
            return match self.post_match {
                PostMatchTrigger::GameOverFlag if snapshot.match_ended() => Phase::PostMatch,
                _ => Phase::InMatch,
            };
        }

        if snapshot.queue_flag() {
            return Phase::Queue;
        }

        if snapshot.party_flag() {
            Phase::PartyHideout
        } else {
            Phase::Hideout
        }
    }
}

pub fn resolve(process_running: bool, snapshot: Option<&GameSnapshot>, is_stale: bool) -> Phase {
    PhaseResolver::default().resolve(process_running, snapshot, is_stale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gsi::GameState;

    fn snapshot(game_state: GameState) -> GameSnapshot {
        GameSnapshot {
            game_state,
            ..GameSnapshot::default()
        }
    }

    fn samples() -> Vec<Option<GameSnapshot>> {
        vec![
            None,
            Some(GameSnapshot::default()),
            Some(snapshot(GameState::Matchmaking)),
            Some(snapshot(GameState::InProgress)),
            Some(snapshot(GameState::PostGame)),
            Some(GameSnapshot {
                party_size: Some(3),
                ..GameSnapshot::default()
            }),
        ]
    }

    #[test]
    fn closed_whenever_process_is_not_running() {
        for sample in samples() {
            for stale in [false, true] {
                assert_eq!(resolve(false, sample.as_ref(), stale), Phase::Closed);
            }
        }
    }

    #[test]
    fn stale_snapshot_is_indistinguishable_from_none() {
        for sample in samples() {
            assert_eq!(
                resolve(true, sample.as_ref(), true),
                resolve(true, None, false)
            );
        }
        assert_eq!(resolve(true, None, false), Phase::TitleScreen);
    }

    #[test]
    fn fresh_snapshots_follow_the_decision_table() {
        let cases = [
            (GameSnapshot::default(), Phase::Hideout),
            (
                GameSnapshot {
                    party_size: Some(2),
                    ..GameSnapshot::default()
                },
                Phase::PartyHideout,
            ),
            (snapshot(GameState::Matchmaking), Phase::Queue),
            (snapshot(GameState::PreGame), Phase::InMatch),
            (snapshot(GameState::InProgress), Phase::InMatch),
            (snapshot(GameState::PostGame), Phase::PostMatch),
        ];

        for (sample, expected) in cases {
            assert_eq!(resolve(true, Some(&sample), false), expected, "{sample:?}");
        }
    }

    #[test]
    fn match_takes_precedence_over_queue_and_party() {
        let sample = GameSnapshot {
            game_state: GameState::InProgress,
            in_queue: true,
            party_size: Some(4),
            ..GameSnapshot::default()
        };
        assert_eq!(resolve(true, Some(&sample), false), Phase::InMatch);
    }

    #[test]
    fn post_match_can_be_disabled() {
        let resolver = PhaseResolver::new(PostMatchTrigger::Never);
        let ended = snapshot(GameState::PostGame);
        assert_eq!(resolver.resolve(true, Some(&ended), false), Phase::InMatch);
    }

    #[test]
    fn resolution_is_repeatable() {
        let sample = snapshot(GameState::InProgress);
        let first = resolve(true, Some(&sample), false);
        let second = resolve(true, Some(&sample), false);
        assert_eq!(first, second);
    }
}
