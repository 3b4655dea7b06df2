use clap::Parser;

use school_rs::cli::{
    Cli, execute_command, init_logger_from_settings, load_and_merge_config, starts_server,
};
use school_rs::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    execute_command(&cli, settings.clone()).await?;

    if starts_server(&cli) {
        Server::new(settings).run().await?;
    }

    Ok(())
}
