use anyhow::Result;
use std::sync::Arc;

use plantvision::{Config, OpenRouterIdentifier, PerenualClient, PlantPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    log::info!("🚀 Starting PlantVision...");

    // Credentials come from the environment or .env; a missing one only fails its own calls
    let config = Config::from_env();

    let catalog = Arc::new(PerenualClient::new(&config)?);
    log::info!("✅ Perenual client initialized ({})", config.perenual_base_url);

    let identifier = Arc::new(OpenRouterIdentifier::new(&config)?);
    log::info!("✅ OpenRouter identifier initialized with model: {}", config.openrouter_model);

    let pipeline = Arc::new(PlantPipeline::new(catalog, identifier));

    #[cfg(feature = "http-server")]
    {
        let app = plantvision::server::create_router(pipeline);
        let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

        log::info!("🌐 Server listening on {}", config.bind_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                log::info!("🛑 Shutting down...");
            })
            .await?;
    }

    #[cfg(not(feature = "http-server"))]
    {
        let _ = pipeline;
        log::warn!("⚠️ Built without the http-server feature, nothing to serve");
    }

    Ok(())
}
