//! Discord Rich Presence display using discord-sdk

use std::num::NonZeroU32;
use std::time::{Duration, UNIX_EPOCH};

use discord_sdk::{
    activity::{ActivityBuilder, Assets, PartyPrivacy},
    registration::{Application, LaunchCommand},
    wheel::{UserSpoke, UserState, Wheel},
    Discord, Subscriptions,
};

use crate::error::DisplayError;
use crate::launch::DEADLOCK_STEAM_APP_ID;
use crate::presence::{DisplayClient, PresencePayload};

/// Timeout for waiting for Discord handshake
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Converts a payload into the activity Discord shows.
pub fn activity_for(payload: &PresencePayload) -> ActivityBuilder {
    let mut assets =
        Assets::default().large(payload.large_image.as_str(), Some(payload.large_text.as_str()));
    if let Some(small) = &payload.small_image {
        assets = assets.small(small.as_str(), payload.small_text.as_deref());
    }

    let mut activity = ActivityBuilder::new()
        .details(payload.details.as_str())
        .assets(assets);

    if let Some(state) = &payload.state {
        activity = activity.state(state.as_str());
    }

    if let Some(start) = payload.start_timestamp.and_then(|s| u64::try_from(s).ok()) {
        activity = activity.start_timestamp(UNIX_EPOCH + Duration::from_secs(start));
    }

    if let (Some(id), Some((size, max))) = (&payload.party_id, payload.party_size) {
        activity = activity.party(
            id.as_str(),
            NonZeroU32::new(size),
            NonZeroU32::new(max),
            PartyPrivacy::Private,
        );
    }

    activity
}

/// Discord connection owned by the display session.
pub struct DiscordClient {
    app_id: i64,
    discord: Option<Discord>,
    user: Option<UserSpoke>,
}

impl DiscordClient {
    pub fn new(app_id: i64) -> Self {
        if app_id > 0 {
            // Lets "Ask to Join" and profile links start the game through Steam
            if let Err(e) = discord_sdk::registration::register_app(Application {
                id: app_id,
                name: Some("Deadlock".to_string()),
                command: LaunchCommand::Steam(DEADLOCK_STEAM_APP_ID),
            }) {
                tracing::warn!("Failed to register Discord app: {:?}", e);
            }
        }

        Self {
            app_id,
            discord: None,
            user: None,
        }
    }

    fn link_down(&self) -> bool {
        match &self.user {
            Some(spoke) => matches!(&*spoke.0.borrow(), UserState::Disconnected(_)),
            None => true,
        }
    }

    fn live(&self) -> Result<&Discord, DisplayError> {
        match &self.discord {
            Some(discord) if !self.link_down() => Ok(discord),
            _ => Err(DisplayError::TransportClosed(
                "Discord connection closed".to_string(),
            )),
        }
    }

    fn classify(&self, error: discord_sdk::Error) -> DisplayError {
        if self.link_down() {
            DisplayError::TransportClosed(format!("{:?}", error))
        } else {
            DisplayError::Rejected(format!("{:?}", error))
        }
    }
}

impl DisplayClient for DiscordClient {
    fn name(&self) -> &'static str {
        "Discord"
    }

    async fn connect(&mut self) -> Result<(), DisplayError> {
        if self.app_id <= 0 {
            return Err(DisplayError::Unavailable(
                "Discord application id not configured".to_string(),
            ));
        }

        self.close().await;

        let (wheel, handler) = Wheel::new(Box::new(|err| {
            tracing::warn!("Discord error: {:?}", err);
        }));
        let mut user_spoke = wheel.user();

        let discord = Discord::new(self.app_id, Subscriptions::ACTIVITY, Box::new(handler))
            .map_err(|e| DisplayError::Unavailable(format!("{:?}", e)))?;

        tracing::debug!("Discord connecting...");

        let handshake = tokio::time::timeout(HANDSHAKE_TIMEOUT, async {
            if user_spoke.0.changed().await.is_err() {
                Err("Discord connection closed".to_string())
            } else {
                match &*user_spoke.0.borrow() {
                    UserState::Connected(user) => Ok(user.clone()),
                    UserState::Disconnected(err) => Err(format!("Discord disconnected: {:?}", err)),
                }
            }
        })
        .await;

        let user = match handshake {
            Ok(Ok(user)) => user,
            Ok(Err(e)) => {
                discord.disconnect().await;
                return Err(DisplayError::Unavailable(e));
            }
            Err(_) => {
                discord.disconnect().await;
                return Err(DisplayError::Unavailable(
                    "Discord handshake timed out".to_string(),
                ));
            }
        };

        tracing::info!(
            "Discord Rich Presence connected as {}#{}",
            user.username,
            user.discriminator.unwrap_or(0)
        );

        self.discord = Some(discord);
        self.user = Some(user_spoke);
        Ok(())
    }

    async fn update(&mut self, payload: &PresencePayload) -> Result<(), DisplayError> {
        let result = self.live()?.update_activity(activity_for(payload)).await;
        result.map(|_| ()).map_err(|e| self.classify(e))
    }

    async fn clear(&mut self) -> Result<(), DisplayError> {
        let result = self.live()?.clear_activity().await;
        result.map(|_| ()).map_err(|e| self.classify(e))
    }

    async fn close(&mut self) {
        self.user = None;
        if let Some(discord) = self.discord.take() {
            discord.disconnect().await;
            tracing::info!("Discord Rich Presence disconnected");
        }
    }
}
