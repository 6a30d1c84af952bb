//! Detects whether the game executable is running

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub trait ProcessProbe {
    fn is_running(&mut self) -> bool;
}

impl<F: FnMut() -> bool> ProcessProbe for F {
    fn is_running(&mut self) -> bool {
        self()
    }
}

/// Scans the process table for any of the configured executable names.
pub struct SysinfoProbe {
    system: System,
    names: Vec<String>,
    last_running: Option<bool>,
}

impl SysinfoProbe {
    pub fn new(names: &[String]) -> Self {
        Self {
            system: System::new(),
            names: names.iter().map(|n| n.to_ascii_lowercase()).collect(),
            last_running: None,
        }
    }

    fn matches(&self, process: &sysinfo::Process) -> bool {
        let name = process.name().to_string_lossy().to_ascii_lowercase();
        let exe_name = process
            .exe()
            .and_then(|path| path.file_name())
            .map(|n| n.to_string_lossy().to_ascii_lowercase());

        self.names
            .iter()
            .any(|candidate| *candidate == name || exe_name.as_deref() == Some(candidate.as_str()))
    }
}

impl ProcessProbe for SysinfoProbe {
    fn is_running(&mut self) -> bool {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            ProcessRefreshKind::new().with_exe(UpdateKind::OnlyIfNotSet),
        );

        let running = self
            .system
            .processes()
            .values()
            .any(|process| self.matches(process));

        if self.last_running != Some(running) {
            tracing::info!(
                "Game process {}",
                if running { "detected" } else { "not running" }
            );
            self.last_running = Some(running);
        }

        running
    }
}

/// Last answer published by [`spawn_process_watcher`]. Reading it never scans.
#[derive(Debug, Clone, Default)]
pub struct WatchedProcess {
    running: Arc<AtomicBool>,
}

impl ProcessProbe for WatchedProcess {
    fn is_running(&mut self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

/// Runs `probe` on the blocking pool every `interval` until `cancel` fires, so process
/// table scans stay off the tick path. Reads `false` until the first scan finishes.
pub fn spawn_process_watcher<P>(
    mut probe: P,
    interval: Duration,
    cancel: CancellationToken,
) -> (WatchedProcess, JoinHandle<()>)
where
    P: ProcessProbe + Send + 'static,
{
    let watched = WatchedProcess::default();
    let running = watched.running.clone();

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let scan = tokio::task::spawn_blocking(move || {
                        let found = probe.is_running();
                        (probe, found)
                    });
                    match scan.await {
                        Ok((returned, found)) => {
                            probe = returned;
                            running.store(found, Ordering::Relaxed);
                        }
                        Err(e) => {
                            tracing::error!("Process scan failed: {}", e);
                            break;
                        }
                    }
                }
                _ = cancel.cancelled() => break,
            }
        }
    });

    (watched, handle)
}
