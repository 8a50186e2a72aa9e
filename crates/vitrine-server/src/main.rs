mod api;
mod middleware;
mod pages;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use vitrine_gateway::{DimensionProber, OrientationClassifier, RestCatalog};

use crate::{
    api::{build_app, AppState},
    middleware::AdminAuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = vitrine_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let gateway = Arc::new(RestCatalog::new(&config)?);
    let prober = DimensionProber::new(config.probe_timeout_secs, &config.user_agent)?;
    let modal_prober = DimensionProber::new(config.probe_timeout_secs, &config.user_agent)?;

    let auth = AdminAuthState::from_env(matches!(
        config.env,
        vitrine_core::Environment::Development
    ))?;
    let state = AppState {
        gateway,
        prober: Arc::new(prober),
        classifier: Arc::new(OrientationClassifier::new(modal_prober)),
    };
    let app = build_app(state, auth);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "vitrine listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
