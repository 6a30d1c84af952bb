//! Starting the game through Steam

/// Deadlock's Steam application id
pub const DEADLOCK_STEAM_APP_ID: u32 = 1422450;

/// Steam URL that starts the game with console logging enabled
pub fn condebug_launch_url() -> String {
    format!("steam://run/{}//-condebug/", DEADLOCK_STEAM_APP_ID)
}

pub fn launch_game() -> std::io::Result<()> {
    let url = condebug_launch_url();
    tracing::info!("Launching Deadlock via {}", url);
    open::that(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_url_passes_condebug() {
        assert_eq!(condebug_launch_url(), "steam://run/1422450//-condebug/");
    }
}
