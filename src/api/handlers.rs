//! Axum request handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::*;
use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::core::session_manager::{SessionManager, SessionSummary};
use crate::models::exercise::{Exercise, FrameResponse};
use crate::models::pose::BodyPose;

pub async fn index() -> &'static str {
    "ProtoFit backend running."
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions: state.sessions().len().await,
    })
}

/// Analyze one frame of landmarks.
///
/// Analysis problems (no pose, unknown exercise, bad landmarks) come back as
/// a 200 with the problem in `feedback`; only session-level failures map to
/// an error status. Frames that cannot move a counter never create a session.
#[tracing::instrument(skip(state, request), fields(exercise = %request.exercise))]
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let session_id = SessionManager::resolve_id(request.session_id.as_deref());

    let exercise = match request.exercise.parse::<Exercise>() {
        Ok(exercise) => exercise,
        Err(e) => {
            tracing::debug!(session_id = %session_id, error = %e, "Frame skipped");
            return Ok(Json(AnalyzeResponse::new(
                FrameResponse::unknown_exercise(),
                session_id,
            )));
        }
    };

    let session = match request.landmarks {
        Some(_) => state.sessions().get_or_create(Some(session_id.as_str())).await?.1,
        None => match state.sessions().touch(&session_id).await {
            Some(session) => session,
            None => {
                tracing::debug!(session_id = %session_id, "No pose for unknown session");
                return Ok(Json(AnalyzeResponse::new(FrameResponse::no_pose(0), session_id)));
            }
        },
    };

    let pose = request.landmarks.map(BodyPose::new);
    let response = {
        let mut session = session.lock().await;
        state
            .analyzer()
            .analyze_frame(&mut session, pose.as_ref(), exercise.as_str())
    };

    Ok(Json(AnalyzeResponse::new(response, session_id)))
}

pub async fn create_session(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<CreateSessionResponse>)> {
    let session_id = state.sessions().create_session().await?;
    Ok((StatusCode::CREATED, Json(CreateSessionResponse { session_id })))
}

pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionSummary>> {
    Json(state.sessions().list_sessions().await)
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionSummary>> {
    state
        .sessions()
        .summary(&session_id)
        .await
        .map(Json)
        .ok_or(ApiError::SessionNotFound(session_id))
}

pub async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionSummary>> {
    let summary = state.sessions().reset_session(&session_id).await?;
    Ok(Json(summary))
}

pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionSummary>> {
    state
        .sessions()
        .end_session(&session_id)
        .await
        .map(Json)
        .ok_or(ApiError::SessionNotFound(session_id))
}
