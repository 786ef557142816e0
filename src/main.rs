use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use friends_map::config::Config;
use friends_map::web::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::load().context("loading configuration")?;
    let state = AppState::from_config(&config).context("building upstream clients")?;
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("parsing HOST/PORT")?;

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback: SocketAddr = format!("{}:{}", config.host, config.port.saturating_add(1))
                .parse()
                .context("parsing fallback address")?;
            warn!("⚠️ Could not bind {}: {}. Trying {}", addr, e, fallback);
            tokio::net::TcpListener::bind(fallback)
                .await
                .with_context(|| format!("binding fallback {}", fallback))?
        }
    };

    let bound_addr = listener.local_addr()?;
    info!("🚀 Friends map running on http://{}", bound_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
