use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use carbonmarket::{config, routes, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("carbonmarket=info,tower_http=info")),
        )
        .init();

    let settings = config::load();

    let ip = match settings.host.parse::<std::net::IpAddr>() {
        Ok(ip) => ip,
        Err(e) => {
            tracing::error!("invalid HOST {:?}: {}", settings.host, e);
            std::process::exit(1);
        }
    };
    let addr = SocketAddr::from((ip, settings.port));

    tracing::info!("trading engine at {}", settings.engine_base_url);
    let state = AppState::new(settings);
    let app = routes::app(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", e);
    }
}
