//! Game endpoints
//!
//! Thin JSON layer over `GameService`. The session id travels in the path;
//! film titles are only revealed after an answer is judged.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use fq_common::{AnswerOutcome, FrameMode, GameSummary, NextImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ApiError, ApiResult, AppState};

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub session_id: String,
    pub score: u32,
    pub time_remaining: u32,
    pub frame_mode: FrameMode,
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub current_image_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub image_id: i64,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct SkipRequest {
    pub image_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct HintQuery {
    #[serde(default)]
    pub hint_count: usize,
}

#[derive(Debug, Serialize)]
pub struct HintResponse {
    pub hint: String,
}

/// Either the next still or the end-of-game signal
#[derive(Debug, Serialize)]
pub struct NextImageResponse {
    pub end_game: bool,
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_remaining: Option<u32>,
}

impl From<NextImage> for NextImageResponse {
    fn from(next: NextImage) -> Self {
        match next {
            NextImage::Image(image) => Self {
                end_game: false,
                score: image.score,
                image_id: Some(image.id),
                image_url: Some(image.url),
                hint_count: Some(image.hint_count),
                time_remaining: Some(image.time_remaining),
            },
            NextImage::GameOver { score } => Self {
                end_game: true,
                score,
                image_id: None,
                image_url: None,
                hint_count: None,
                time_remaining: None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub correct: bool,
    pub message: String,
    pub movie_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(flatten)]
    pub next: NextImageResponse,
}

impl From<AnswerOutcome> for AnswerResponse {
    fn from(outcome: AnswerOutcome) -> Self {
        Self {
            correct: outcome.correct,
            message: outcome.message,
            movie_title: outcome.movie_title,
            quote: outcome.quote,
            next: outcome.next.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EndResponse {
    pub score: u32,
    pub performance_message: String,
    pub performance_image: String,
}

impl From<GameSummary> for EndResponse {
    fn from(summary: GameSummary) -> Self {
        Self {
            score: summary.score,
            performance_message: summary.message,
            performance_image: summary.image,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/game/start
///
/// A missing or unreadable body starts a `first` frame game.
pub async fn start_game(
    State(state): State<AppState>,
    body: Option<Json<StartRequest>>,
) -> ApiResult<Json<StartResponse>> {
    let request = body.map(|Json(req)| req).unwrap_or_default();
    let frame_mode = FrameMode::parse_or_default(request.mode.as_deref());

    let session = state.game.start(frame_mode).await?;

    Ok(Json(StartResponse {
        session_id: session.session_id,
        score: session.score,
        time_remaining: session.time_remaining,
        frame_mode: session.frame_mode,
    }))
}

/// GET /api/game/:session_id/next
pub async fn next_image(
    State(state): State<AppState>,
    session_id: Result<Path<String>, PathRejection>,
    query: Result<Query<NextQuery>, QueryRejection>,
) -> ApiResult<Json<NextImageResponse>> {
    let Path(session_id) = session_id.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let Query(query) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    let next = state.game.next(&session_id, query.current_image_id).await?;
    Ok(Json(next.into()))
}

/// POST /api/game/:session_id/answer
pub async fn submit_answer(
    State(state): State<AppState>,
    session_id: Result<Path<String>, PathRejection>,
    body: Result<Json<AnswerRequest>, JsonRejection>,
) -> ApiResult<Json<AnswerResponse>> {
    let Path(session_id) = session_id.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let Json(request) = body.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    debug!("Answer for image {} in session {}", request.image_id, session_id);
    let outcome = state
        .game
        .submit_answer(&session_id, request.image_id, &request.answer)
        .await?;

    Ok(Json(outcome.into()))
}

/// POST /api/game/:session_id/skip
pub async fn skip_image(
    State(state): State<AppState>,
    session_id: Result<Path<String>, PathRejection>,
    body: Result<Json<SkipRequest>, JsonRejection>,
) -> ApiResult<Json<NextImageResponse>> {
    let Path(session_id) = session_id.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let Json(request) = body.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    let next = state.game.skip(&session_id, request.image_id).await?;
    Ok(Json(next.into()))
}

/// GET /api/images/:image_id/hint
pub async fn get_hint(
    State(state): State<AppState>,
    image_id: Result<Path<i64>, PathRejection>,
    query: Result<Query<HintQuery>, QueryRejection>,
) -> ApiResult<Json<HintResponse>> {
    let Path(image_id) = image_id.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let Query(query) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    let hint = state.game.hint(image_id, query.hint_count).await?;
    Ok(Json(HintResponse { hint }))
}

/// GET /api/game/:session_id/end
pub async fn end_game(
    State(state): State<AppState>,
    session_id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<EndResponse>> {
    let Path(session_id) = session_id.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    let summary = state.game.end(&session_id).await?;
    Ok(Json(summary.into()))
}

pub fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/api/game/start", post(start_game))
        .route("/api/game/:session_id/next", get(next_image))
        .route("/api/game/:session_id/answer", post(submit_answer))
        .route("/api/game/:session_id/skip", post(skip_image))
        .route("/api/game/:session_id/end", get(end_game))
        .route("/api/images/:image_id/hint", get(get_hint))
}
