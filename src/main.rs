use std::sync::Arc;

use log::info;

use voice_broadcast_api::config::Config;
use voice_broadcast_api::gateway::TwilioClient;
use voice_broadcast_api::handlers::AppState;
use voice_broadcast_api::storage::UploadStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();

    let config = Config::from_env()?;

    info!("Upload dir: {}", config.upload_dir.display());
    info!("Calling from {}", config.twilio.from_number);

    let gateway = TwilioClient::new(&config.twilio)?;
    let uploads = UploadStore::open(&config.upload_dir).await?;

    let state = Arc::new(AppState {
        gateway: Arc::new(gateway),
        uploads,
        public_base_url: config.public_base_url.clone(),
    });

    let app = voice_broadcast_api::router(state, &config);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
