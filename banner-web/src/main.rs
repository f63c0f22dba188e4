use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use banner::loader::{BannerSource, Cached, Directory};
use banner_web::{AppState, Routes, ServerConfig, router};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Serve a small web page that renders text as ASCII-art banners
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "BANNER_ADDR", default_value = "127.0.0.1:8080")]
    addr: SocketAddr,
    /// Directory containing `<banner>.txt` files
    #[arg(long, env = "BANNER_DIR", default_value = "banners")]
    banners: PathBuf,
    /// Directory served under /static
    #[arg(long, env = "BANNER_STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,
    /// Per-request timeout in seconds
    #[arg(long, env = "BANNER_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,
    /// Read banner files on every request instead of keeping them in memory
    #[arg(long, env = "BANNER_NO_CACHE")]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("banner_web=info,banner=info,tower_http=info")),
        )
        .init();

    let directory = Directory::new(&args.banners);
    match directory.names() {
        Ok(names) if names.is_empty() => {
            warn!(dir = %args.banners.display(), "no banners found");
        }
        Ok(names) => info!(?names, "available banners"),
        Err(error) => warn!(%error, "cannot list banners"),
    }
    let banners: Arc<dyn BannerSource> = if args.no_cache {
        Arc::new(directory)
    } else {
        Arc::new(Cached::new(directory))
    };

    let config = ServerConfig {
        routes: Routes::default(),
        static_dir: args.static_dir,
        request_timeout: Duration::from_secs(args.timeout_secs),
    };
    let app = router(AppState::new(banners), &config);

    let listener = TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("failed to bind {}", args.addr))?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "cannot listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
}
