//! OpenSASE Tailor - made-to-measure garment configurator service

use std::time::Duration;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use opensase_tailor::api::{self, AppState};
use opensase_tailor::config::Config;
use opensase_tailor::domain::events::EventPublisher;
use opensase_tailor::store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env()?;
    let store = Store::from_config(&config).await?;
    let events = EventPublisher::connect(config.nats_url.as_deref()).await;
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let address = format!("0.0.0.0:{}", config.port);
    let max_idle = chrono::Duration::minutes(config.session_idle_minutes.into());
    let state = AppState::new(store, events, config);
    let sweep = state.sessions.spawn_idle_sweep(max_idle, Duration::from_secs(60));
    let app = api::router(state);

    let listener = TcpListener::bind(&address).await?;
    info!("🚀 OpenSASE Tailor listening on {address}");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    sweep.abort();
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
