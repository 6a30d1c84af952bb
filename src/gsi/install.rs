//! Points the game's game-state-integration feed at the local listener

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ListenerError;

const CFG_FILE: &str = "gamestate_integration_deadlock_rpc.cfg";

pub fn cfg_path(game_dir: &Path) -> PathBuf {
    game_dir
        .join("game")
        .join("citadel")
        .join("cfg")
        .join("gamestate_integration")
        .join(CFG_FILE)
}

pub fn render_cfg(port: u16) -> String {
    format!(
        r#""Deadlock RPC"
{{
    "uri"       "http://127.0.0.1:{port}/"
    "timeout"   "5.0"
    "buffer"    "0.1"
    "throttle"  "0.5"
    "heartbeat" "5.0"
    "data"
    {{
        "provider"  "1"
        "map"       "1"
        "player"    "1"
        "hero"      "1"
    }}
}}
"#
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Written(PathBuf),
    AlreadyCurrent(PathBuf),
    Skipped,
}

/// Writes the integration cfg into the game install if it is missing or out of date.
pub fn install_gsi_config(
    game_dir: Option<&Path>,
    port: u16,
) -> Result<InstallOutcome, ListenerError> {
    let Some(game_dir) = game_dir.filter(|dir| dir.is_dir()) else {
        tracing::info!("Game directory not configured or missing, skipping GSI config install");
        return Ok(InstallOutcome::Skipped);
    };

    let path = cfg_path(game_dir);
    let contents = render_cfg(port);

    if fs::read_to_string(&path).is_ok_and(|existing| existing == contents) {
        tracing::debug!("GSI config already current at {}", path.display());
        return Ok(InstallOutcome::AlreadyCurrent(path));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    tracing::info!("Installed GSI config at {}", path.display());
    Ok(InstallOutcome::Written(path))
}
