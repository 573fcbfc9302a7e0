#![forbid(unsafe_code)]

use mixfolio_server::{build_router, build_state, ServerConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cfg = ServerConfig::from_env()?;
    init_tracing(cfg.log_json);
    info!(
        config = %serde_json::to_string(&cfg).unwrap_or_default(),
        "effective configuration"
    );

    let state = build_state(&cfg)?;
    let app = build_router(state);

    let listener = TcpListener::bind(cfg.bind)
        .await
        .map_err(|e| format!("bind {} failed: {e}", cfg.bind))?;
    info!("mixfolio-server listening on {}", cfg.bind);
    let drain = cfg.shutdown_drain;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            info!(
                drain_ms = drain.as_millis() as u64,
                "shutdown requested, draining"
            );
            tokio::time::sleep(drain).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
