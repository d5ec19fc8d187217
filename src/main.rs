use livegen::{Config, GenerateClient, LivepeerClient};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    livegen::logger::init()?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    livegen::logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.host(),
        config.port(),
    );
    livegen::logger::log_config_info(&config);

    let client = match LivepeerClient::new(config.livepeer()) {
        Ok(client) => {
            log::info!("✅ Livepeer client initialized for {}", client.base_url());
            client
        }
        Err(e) => {
            log::error!("❌ Failed to initialize Livepeer client: {}", e);
            return Err(e.into());
        }
    };

    log::info!("🖼️  Available models:");
    for model in GenerateClient::supported_models() {
        log::info!("  {} ({:?})", model.id, model.category);
    }

    if let Err(e) = livegen::server::run(&config, Arc::new(client)).await {
        log::error!("❌ Server stopped: {}", e);
        return Err(e.into());
    }

    Ok(())
}
