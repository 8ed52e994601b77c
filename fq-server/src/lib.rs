//! fq-server library - FrameQuiz game service
//!
//! JSON API over `fq_common::GameService`, plus health, robots.txt and
//! static serving of the film stills.

use axum::Router;
use fq_common::GameService;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub game: Arc<GameService>,
}

impl AppState {
    pub fn new(game: GameService) -> Self {
        Self {
            game: Arc::new(game),
        }
    }
}

/// Build application router
///
/// `media` pairs the URL prefix with the folder holding uploaded stills.
pub fn build_router(state: AppState, media: Option<(String, PathBuf)>) -> Router {
    let mut router = Router::new()
        .merge(api::game_routes())
        .merge(api::health_routes())
        .merge(api::robots_routes())
        .with_state(state);

    if let Some((prefix, dir)) = media {
        let prefix = format!("/{}", prefix.trim_matches('/'));
        router = if prefix == "/" {
            router.fallback_service(ServeDir::new(dir))
        } else {
            router.nest_service(&prefix, ServeDir::new(dir))
        };
    }

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
