use mass_spec_server::config::{config_home, load_or_create_server_config};
use mass_spec_server::logging::init_logging;
use mass_spec_server::{CoreResult, Server};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("mass-spec-server: {error}");
        std::process::exit(1);
    }
}

async fn run() -> CoreResult<()> {
    let _ = dotenvy::dotenv();
    let config = load_or_create_server_config(&config_home())?;
    init_logging(&config.log_filter)?;

    let mut server = Server::new(config).await?;
    tracing::info!(addr = %server.addr(), "press ctrl-c to stop");

    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
    server.shutdown().await
}
