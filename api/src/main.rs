use actix_web::{web, HttpServer};
use log::info;

use pimx_api::{create_app, AppState};
use pimx_shared::config::{AppConfig, Environment};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    dotenvy::from_filename(Environment::from_env().env_file()).ok();

    let config = AppConfig::from_env();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(config.logging.level.as_str()));

    info!(
        "Starting PIMXCHAT API Server ({} environment, {:?} storage)",
        config.environment, config.storage
    );

    let state = web::Data::new(AppState::from_config(&config).await?);
    let bind_address = config.server.bind_address();
    let max_payload_size = config.server.max_payload_size;
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone(), max_payload_size));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;
    Ok(())
}
