use clap::Parser;

use deadlock_rpc::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = deadlock_rpc::logging::init_logging(cli.verbose);

    deadlock_rpc::run(cli).await
}
