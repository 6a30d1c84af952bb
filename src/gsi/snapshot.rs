//! Structured game state as pushed by the game-state-integration feed

use serde::Deserialize;
use serde_json::Value;

use crate::error::SnapshotError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kda {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

/// Coarse lifecycle reported by the game in `map.game_state`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Idle,
    Matchmaking,
    PreGame,
    InProgress,
    PostGame,
    Other(String),
}

impl GameState {
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_ascii_lowercase();
        let name = lowered
            .strip_prefix("k_egamestate_")
            .or_else(|| lowered.strip_prefix("game_state_"))
            .unwrap_or(&lowered);

        match name {
            "" | "idle" | "hideout" | "init" => Self::Idle,
            "matchmaking" | "queue" | "in_queue" => Self::Matchmaking,
            "pre_game" | "pregame" | "wait_for_players" | "hero_selection" => Self::PreGame,
            "in_progress" | "game_in_progress" | "playing" => Self::InProgress,
            "post_game" | "postgame" | "game_over" => Self::PostGame,
            _ => Self::Other(raw.trim().to_string()),
        }
    }
}

/// Latest structured state of the running game. Replaced wholesale on every push.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    pub hero: Option<String>,
    pub kda: Option<Kda>,
    pub team_score: Option<(u32, u32)>,
    pub level: Option<u32>,
    pub souls: Option<u64>,
    pub team_net_worth: Option<(u64, u64)>,
    pub game_mode: Option<String>,
    pub match_id: Option<String>,
    pub game_state: GameState,
    pub party_size: Option<u32>,
    pub party_max: Option<u32>,
    pub in_queue: bool,
}

impl GameSnapshot {
    pub fn match_flag(&self) -> bool {
        matches!(
            self.game_state,
            GameState::PreGame | GameState::InProgress | GameState::PostGame
        )
    }

    /// The game reports the current match as finished.
    pub fn match_ended(&self) -> bool {
        self.game_state == GameState::PostGame
    }

    pub fn queue_flag(&self) -> bool {
        self.in_queue || self.game_state == GameState::Matchmaking
    }

    pub fn party_flag(&self) -> bool {
        self.party_size.is_some_and(|size| size > 1)
    }

    /// Parses a GSI JSON document. Missing sections are fine, wrongly shaped ones are not.
    pub fn from_json(body: &[u8]) -> Result<Self, SnapshotError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
        check_shape(&value)?;

        let doc: GsiDocument =
            serde_json::from_value(value).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
        Ok(doc.into())
    }
}

/// serde's derived visitors also accept arrays for structs, so every object level of the
/// document is checked up front.
fn check_shape(doc: &Value) -> Result<(), SnapshotError> {
    let Value::Object(doc) = doc else {
        return Err(SnapshotError::Malformed("document is not an object".to_string()));
    };

    for section in ["map", "player"] {
        section_object(doc.get(section), section)?;
    }
    if let Some(Value::Object(map)) = doc.get("map") {
        for pair in ["team_score", "team_net_worth"] {
            section_object(map.get(pair), pair)?;
        }
    }
    Ok(())
}

fn section_object(value: Option<&Value>, name: &str) -> Result<(), SnapshotError> {
    match value {
        None | Some(Value::Null) | Some(Value::Object(_)) => Ok(()),
        Some(_) => Err(SnapshotError::Malformed(format!("`{}` is not an object", name))),
    }
}

#[derive(Debug, Deserialize)]
struct GsiDocument {
    #[serde(default)]
    map: Option<GsiMap>,
    #[serde(default)]
    player: Option<GsiPlayer>,
}

#[derive(Debug, Default, Deserialize)]
struct GsiMap {
    game_state: Option<String>,
    game_mode: Option<String>,
    match_id: Option<IdOrName>,
    team_score: Option<TeamPair<u32>>,
    team_net_worth: Option<TeamPair<u64>>,
}

#[derive(Debug, Default, Deserialize)]
struct GsiPlayer {
    hero: Option<IdOrName>,
    kills: Option<u32>,
    deaths: Option<u32>,
    assists: Option<u32>,
    level: Option<u32>,
    souls: Option<u64>,
    party_size: Option<u32>,
    party_max: Option<u32>,
    #[serde(default)]
    in_queue: bool,
}

#[derive(Debug, Deserialize)]
struct TeamPair<T> {
    team0: Option<T>,
    team1: Option<T>,
}

impl<T> TeamPair<T> {
    fn both(self) -> Option<(T, T)> {
        Some((self.team0?, self.team1?))
    }
}

/// Heroes and match ids arrive either as numbers or strings depending on the build.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdOrName {
    Id(u64),
    Name(String),
}

impl IdOrName {
    fn into_string(self) -> Option<String> {
        match self {
            Self::Id(id) => Some(id.to_string()),
            Self::Name(name) => {
                let name = name.trim();
                (!name.is_empty()).then(|| name.to_string())
            }
        }
    }
}

impl From<GsiDocument> for GameSnapshot {
    fn from(doc: GsiDocument) -> Self {
        let map = doc.map.unwrap_or_default();
        let player = doc.player.unwrap_or_default();

        let kda = match (player.kills, player.deaths, player.assists) {
            (None, None, None) => None,
            (kills, deaths, assists) => Some(Kda {
                kills: kills.unwrap_or(0),
                deaths: deaths.unwrap_or(0),
                assists: assists.unwrap_or(0),
            }),
        };

        Self {
            hero: player.hero.and_then(IdOrName::into_string),
            kda,
            team_score: map.team_score.and_then(TeamPair::both),
            level: player.level,
            souls: player.souls,
            team_net_worth: map.team_net_worth.and_then(TeamPair::both),
            game_mode: map.game_mode.filter(|m| !m.trim().is_empty()),
            match_id: map.match_id.and_then(IdOrName::into_string),
            game_state: map
                .game_state
                .as_deref()
                .map(GameState::parse)
                .unwrap_or_default(),
            party_size: player.party_size,
            party_max: player.party_max,
            in_queue: player.in_queue,
        }
    }
}
