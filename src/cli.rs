use std::path::PathBuf;

use clap::Parser;

use crate::settings::AppSettings;

#[derive(Parser, Debug, Default)]
#[command(
    name = "deadlock-rpc",
    version,
    about = "Shows what you are doing in Deadlock as Discord Rich Presence"
)]
pub struct Cli {
    #[arg(long, value_name = "PATH", help = "Settings file (defaults to the user config dir)")]
    pub config: Option<PathBuf>,

    #[arg(long = "app-id", value_name = "ID", help = "Discord application id")]
    pub app_id: Option<i64>,

    #[arg(long, value_name = "PORT", help = "Port for the local game state listener")]
    pub port: Option<u16>,

    #[arg(long, value_name = "SECS", help = "Seconds between presence ticks")]
    pub interval: Option<u64>,

    #[arg(long = "game-dir", value_name = "PATH", help = "Deadlock install directory")]
    pub game_dir: Option<PathBuf>,

    #[arg(long = "no-install", help = "Do not write the game state integration config")]
    pub no_install: bool,

    #[arg(long, help = "Start Deadlock through Steam with -condebug first")]
    pub launch: bool,

    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,
}

impl Cli {
    /// Applies command-line overrides on top of file settings.
    pub fn apply(&self, settings: &mut AppSettings) {
        if let Some(app_id) = self.app_id {
            settings.application_id = app_id;
        }
        if let Some(port) = self.port {
            settings.gsi_port = port;
        }
        if let Some(interval) = self.interval {
            settings.poll_interval_secs = interval;
        }
        if let Some(game_dir) = &self.game_dir {
            settings.game_dir = Some(game_dir.clone());
        }
    }
}
