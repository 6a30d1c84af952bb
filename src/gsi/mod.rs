mod install;
mod server;
mod snapshot;
mod store;

pub use install::{install_gsi_config, InstallOutcome};
pub use server::GsiServer;
pub use snapshot::{GameSnapshot, GameState, Kda};
pub use store::{SnapshotRead, SnapshotStore};
