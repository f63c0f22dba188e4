//! Minimal web interface for rendering ASCII-art banners.
//!
//! [`router`] builds the whole application from an [`AppState`] and a [`ServerConfig`]; nothing
//! is registered globally, so several independently configured routers can coexist (the
//! integration tests rely on this).

pub mod error;
mod page;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use banner::loader::BannerSource;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use error::AppError;

/// Where each part of the application is mounted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    /// The form page
    pub index: String,
    /// Form submissions (`POST` only)
    pub render: String,
    /// Prefix for files served from [`ServerConfig::static_dir`]
    pub static_prefix: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            index: "/".to_owned(),
            render: "/ascii-art".to_owned(),
            static_prefix: "/static".to_owned(),
        }
    }
}

/// Everything [`router`] needs besides the banner source
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The route table
    pub routes: Routes,
    /// Directory served under [`Routes::static_prefix`]
    pub static_dir: PathBuf,
    /// Requests taking longer than this get `408 Request Timeout`
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            routes: Routes::default(),
            static_dir: PathBuf::from("static"),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    banners: Arc<dyn BannerSource>,
}

impl AppState {
    /// State rendering banners from `banners`.
    pub fn new(banners: Arc<dyn BannerSource>) -> Self {
        Self { banners }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub(crate) struct Context {
    pub banners: Arc<dyn BannerSource>,
    pub routes: Arc<Routes>,
}

/// Builds the application.
///
/// The index and render routes answer any method they do not support with `405`; every other
/// path outside the static prefix gets `404`.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let routes = &config.routes;
    let context = Context {
        banners: state.banners,
        routes: Arc::new(routes.clone()),
    };
    Router::new()
        .route(
            &routes.index,
            get(routes::index).fallback(routes::method_not_allowed),
        )
        .route(
            &routes.render,
            post(routes::render).fallback(routes::method_not_allowed),
        )
        .nest_service(&routes.static_prefix, ServeDir::new(&config.static_dir))
        .fallback(routes::not_found)
        .with_state(context)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
