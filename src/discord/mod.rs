mod presence;

pub use presence::{activity_for, DiscordClient};
