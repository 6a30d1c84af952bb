//! Turns a resolved phase and the latest snapshot into a presence payload

use crate::gsi::GameSnapshot;

use super::assets::HeroAssets;
use super::format::{format_souls, format_thousands, truncate_chars, MAX_LINE_CHARS};
use super::heroes::{game_mode_display, lookup_hero};
use super::payload::PresencePayload;
use super::phase::Phase;

pub const LOGO_IMAGE: &str = "deadlock_logo";
pub const LOGO_TEXT: &str = "Deadlock";
const DEFAULT_PARTY_MAX: u32 = 6;
const ENDED_MARKER: &str = " (ended)";

/// How a hero shows up on the display.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeroDisplay {
    name: String,
    image: Option<String>,
}

fn resolve_hero(snapshot: Option<&GameSnapshot>, assets: &dyn HeroAssets) -> Option<HeroDisplay> {
    let raw = snapshot?.hero.as_deref()?;

    match lookup_hero(raw) {
        Some(hero) => Some(HeroDisplay {
            name: hero.name.to_string(),
            image: assets
                .hero_image(&hero.id.to_string())
                .or_else(|| Some(hero.image.to_string())),
        }),
        None => Some(HeroDisplay {
            name: raw.to_string(),
            image: assets.hero_image(raw),
        }),
    }
}

fn party(snapshot: Option<&GameSnapshot>) -> Option<(u32, u32)> {
    let snapshot = snapshot?;
    let size = snapshot.party_size.filter(|size| *size > 1)?;
    let max = snapshot.party_max.unwrap_or(DEFAULT_PARTY_MAX).max(size);
    Some((size, max))
}

fn with_hero_art(payload: PresencePayload, hero: Option<&HeroDisplay>) -> PresencePayload {
    match hero {
        Some(HeroDisplay {
            name,
            image: Some(image),
        }) => payload.with_large(image.clone(), name.clone()),
        _ => payload.with_large(LOGO_IMAGE, LOGO_TEXT),
    }
}

fn with_party(mut payload: PresencePayload, snapshot: Option<&GameSnapshot>) -> PresencePayload {
    if let Some(size) = party(snapshot) {
        payload.party_size = Some(size);
        payload.party_id = Some(match snapshot.and_then(|s| s.match_id.as_deref()) {
            Some(match_id) => format!("match_{}", match_id),
            None => "deadlock_party".to_string(),
        });
    }
    payload
}

fn title_screen() -> PresencePayload {
    PresencePayload::new("On Title Screen").with_large(LOGO_IMAGE, LOGO_TEXT)
}

fn lobby(
    details: &str,
    snapshot: Option<&GameSnapshot>,
    assets: &dyn HeroAssets,
) -> PresencePayload {
    let hero = resolve_hero(snapshot, assets);
    let payload = PresencePayload::new(details).with_small(LOGO_IMAGE, LOGO_TEXT);
    with_party(with_hero_art(payload, hero.as_ref()), snapshot)
}

fn in_match(
    snapshot: Option<&GameSnapshot>,
    assets: &dyn HeroAssets,
    match_start: Option<i64>,
) -> PresencePayload {
    let hero = resolve_hero(snapshot, assets);
    let details = match &hero {
        Some(hero) => format!("Playing {}", hero.name),
        None => "In Match".to_string(),
    };

    let mut state_parts: Vec<String> = Vec::new();
    if let Some(s) = snapshot {
        if let Some(kda) = s.kda {
            state_parts.push(format!("{}/{}/{} KDA", kda.kills, kda.deaths, kda.assists));
        }
        if let Some((ours, theirs)) = s.team_score {
            state_parts.push(format!("Score: {} - {}", ours, theirs));
        }
        if let Some(level) = s.level {
            state_parts.push(format!("Lvl {}", level));
        }
        if let Some(souls) = s.souls {
            state_parts.push(format!("{} Souls", format_thousands(souls)));
        }
        if let Some((team0, team1)) = s.team_net_worth.filter(|(a, b)| *a > 0 || *b > 0) {
            state_parts.push(format!(
                "Souls: {} vs {}",
                format_souls(team0),
                format_souls(team1)
            ));
        }
    }

    let mut payload = with_hero_art(PresencePayload::new(details), hero.as_ref());
    if !state_parts.is_empty() {
        payload = payload.with_state(state_parts.join(" | "));
    }
    if let Some(mode) = snapshot.and_then(|s| s.game_mode.as_deref()) {
        payload = payload.with_small(LOGO_IMAGE, game_mode_display(mode));
    }
    payload.start_timestamp = match_start;

    with_party(payload, snapshot)
}

fn post_match(snapshot: Option<&GameSnapshot>, assets: &dyn HeroAssets) -> PresencePayload {
    let mut payload = in_match(snapshot, assets, None);
    let room = MAX_LINE_CHARS - ENDED_MARKER.chars().count();
    payload.details = format!("{}{}", truncate_chars(&payload.details, room), ENDED_MARKER);
    payload
}

/// Builds the payload for `phase`. `Closed` has no payload: the display is cleared instead.
///
/// `match_start` is only used for [`Phase::InMatch`]; the builder never reads the clock, so
/// identical inputs always give identical payloads.
pub fn build(
    phase: Phase,
    snapshot: Option<&GameSnapshot>,
    assets: &dyn HeroAssets,
    match_start: Option<i64>,
) -> Option<PresencePayload> {
    let payload = match phase {
        Phase::Closed => return None,
        Phase::TitleScreen => title_screen(),
        Phase::Hideout => lobby("In Hideout", snapshot, assets),
        Phase::PartyHideout => lobby("In Party Hideout", snapshot, assets),
        Phase::Queue => lobby("Finding Match", snapshot, assets),
        Phase::InMatch => in_match(snapshot, assets, match_start),
        Phase::PostMatch => post_match(snapshot, assets),
    };
    Some(payload)
}
