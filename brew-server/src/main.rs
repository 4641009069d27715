use brew_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. .env and logging
    setup_environment();

    // 2. Configuration
    let config = Config::from_env();
    tracing::info!(
        work_dir = %config.work_dir,
        database = %config.database_path,
        port = config.http_port,
        "Brew server starting..."
    );

    // 3. State (work dir, database, migrations)
    let state = ServerState::initialize(&config).await?;

    // 4. Serve until Ctrl-C
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
