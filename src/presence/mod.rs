mod assets;
mod builder;
mod format;
mod gate;
mod heroes;
mod manager;
mod payload;
mod phase;
mod session;
mod status;

pub use assets::{spawn_asset_poller, HeroAssetCache, HeroAssets, NoAssets};
pub use builder::{build, LOGO_IMAGE, LOGO_TEXT};
pub use format::{format_souls, format_thousands, truncate_line};
pub use gate::UpdateGate;
pub use heroes::{lookup_hero, Hero};
pub use manager::{MatchSession, PresenceManager, TickAction, TickOutcome};
pub use payload::{Fingerprint, PresencePayload};
pub use phase::{resolve, Phase, PhaseResolver, PostMatchTrigger};
pub use session::{ConnectionState, DisplayClient, DisplaySession};
pub use status::{StatusLine, StatusReport};
