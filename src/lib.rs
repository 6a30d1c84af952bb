pub mod cli;
pub mod discord;
pub mod error;
pub mod gsi;
pub mod launch;
pub mod logging;
pub mod presence;
pub mod process;
pub mod settings;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use cli::Cli;
use discord::DiscordClient;
use gsi::{install_gsi_config, GsiServer, SnapshotStore};
use presence::{spawn_asset_poller, HeroAssetCache, PhaseResolver, PresenceManager, StatusLine};
use process::{spawn_process_watcher, SysinfoProbe};
use settings::AppSettings;

fn load_settings(cli: &Cli) -> anyhow::Result<AppSettings> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => AppSettings::default_path()?,
    };

    let mut settings = AppSettings::load_or_default(&path);
    if !path.exists() {
        match settings.save(&path) {
            Ok(()) => tracing::info!("Wrote default settings to {}", path.display()),
            Err(e) => tracing::warn!("Failed to write default settings: {}", e),
        }
    }

    if !settings.has_application_id() && cli.app_id.is_none() {
        tracing::warn!(
            "No Discord application id configured, set application_id in {}",
            path.display()
        );
    }

    cli.apply(&mut settings);
    Ok(settings)
}

/// Runs the presence daemon until Ctrl-C.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(&cli)?;

    if cli.launch {
        if let Err(e) = launch::launch_game() {
            tracing::warn!("Failed to launch Deadlock: {}", e);
        }
    }

    if !cli.no_install {
        if let Err(e) = install_gsi_config(settings.game_dir.as_deref(), settings.gsi_port) {
            tracing::warn!("{}", e);
        }
    }

    let store = SnapshotStore::new(settings.staleness_threshold());
    let status = StatusLine::new();
    let listener = GsiServer::start(settings.gsi_port, store.clone(), status.clone())
        .context("game state listener")?;

    let cancel = CancellationToken::new();
    let assets = HeroAssetCache::new();
    let poller = spawn_asset_poller(
        assets.clone(),
        settings.hero_assets_url.clone(),
        settings.asset_refresh_interval(),
        cancel.clone(),
    );

    let (game_process, watcher) = spawn_process_watcher(
        SysinfoProbe::new(&settings.process_names),
        settings.poll_interval(),
        cancel.clone(),
    );

    let shutdown = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown requested");
                    cancel.cancel();
                }
                Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
            }
        })
    };

    let manager = PresenceManager::new(
        DiscordClient::new(settings.application_id),
        game_process,
        store,
        assets,
    )
    .with_resolver(PhaseResolver::new(settings.post_match))
    .with_min_push_interval(settings.min_push_interval())
    .with_status(status);

    tracing::info!("Ready, waiting for Deadlock to launch");
    manager.run(settings.poll_interval(), cancel.clone()).await;

    cancel.cancel();
    shutdown.abort();
    poller.await.ok();
    watcher.await.ok();
    listener.shutdown();
    Ok(())
}
