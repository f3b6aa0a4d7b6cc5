use clap::Parser;
use tracing::error;

use linkhub::cli::{Cli, Commands, generate_config};
use linkhub::config::{get_config, init_config_from};
use linkhub::runtime::modes::run_server;
use linkhub::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Some(Commands::GenerateConfig { output, force }) = cli.command {
        return generate_config(output, force);
    }

    init_config_from(&cli.config);
    let config = get_config();
    let _guard = init_logging(&config.logging);

    if let Err(e) = run_server().await {
        match e.downcast_ref::<linkhub::errors::LinkhubError>() {
            Some(err) => eprintln!("{}", err.format_colored()),
            None => error!("{:#}", e),
        }
        return Err(e);
    }

    Ok(())
}
