use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod calendar;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod services;

use config::Config;
use db::WinStore;

#[derive(Clone)]
pub struct AppState {
    pub store: WinStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: WinStore, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let wins_routes = Router::new()
        .route(
            "/api/wins",
            get(handlers::wins::list_wins).post(handlers::wins::create_win),
        )
        .route(
            "/api/wins/:id",
            patch(handlers::wins::update_win).delete(handlers::wins::delete_win),
        )
        .route("/api/wins/:id/star", patch(handlers::wins::toggle_star))
        .route("/api/wins/reorder", post(handlers::wins::reorder_wins))
        .route("/api/wins/search", get(handlers::wins::search_wins))
        // Derived views
        .route("/api/wins/stats", get(handlers::stats::get_stats))
        .route("/api/wins/activity", get(handlers::stats::get_activity))
        .route("/api/wins/monthly", get(handlers::stats::get_month_dates))
        // Backup
        .route("/api/wins/export", get(handlers::transfer::export_wins))
        .route("/api/wins/import", post(handlers::transfer::import_wins));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    Router::new()
        .merge(public_routes)
        .merge(wins_routes)
        .layer(cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!(origin = o, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
