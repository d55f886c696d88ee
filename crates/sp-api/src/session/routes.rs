use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use sp_cache::{Entity, QueryKey};
use sp_db::{
    models::{NewSession, SessionPatch, StudySession},
    repositories::{analytics, profile, session},
};
use sp_focus::schedule;

use crate::{ApiState, auth::AuthUser, error::ApiError, metrics, validation};

use super::model::{
    CreateSessionRequest, FocusScheduleQuery, UpdateSessionRequest, elapsed_whole_minutes,
    focus_config_from_profile,
};

/// Create the study-session routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/sessions", get(list_sessions).post(create_session))
        .route("/sessions/focus-schedule", get(focus_schedule))
        .route(
            "/sessions/{id}",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route("/sessions/{id}/complete", post(complete_session))
}

async fn list_sessions(
    user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<StudySession>>, ApiError> {
    let key = QueryKey::list(Entity::Session, user.user_id);
    if let Some(sessions) = state.cache.get_as::<Vec<StudySession>>(&key) {
        metrics::record_cache_lookup("session", true);
        return Ok(Json(sessions));
    }
    metrics::record_cache_lookup("session", false);

    let sessions = session::list_for_user(&state.pool, user.user_id).await?;
    state.cache.put(key, &sessions)?;

    Ok(Json(sessions))
}

/// Start a session: status `active`, start time now. The owner id comes
/// from the session token, never from the payload.
async fn create_session(
    user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<StudySession>), ApiError> {
    let new = NewSession {
        plan_id: payload.plan_id,
        notes: payload.notes,
        techniques: payload.techniques,
    };
    let created = session::insert(&state.pool, user.user_id, &new).await?;

    state.cache.invalidate(Entity::Session);

    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_session(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<StudySession>, ApiError> {
    let key = QueryKey::detail(Entity::Session, session_id);
    if let Some(cached) = state.cache.get_as::<StudySession>(&key) {
        metrics::record_cache_lookup("session", true);
        if cached.user_id != user.user_id {
            return Err(ApiError::NotFound);
        }
        return Ok(Json(cached));
    }
    metrics::record_cache_lookup("session", false);

    let found = session::get(&state.pool, session_id, user.user_id).await?;
    state.cache.put(key, &found)?;

    Ok(Json(found))
}

async fn update_session(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<UpdateSessionRequest>,
) -> Result<Json<StudySession>, ApiError> {
    for (name, rating) in [
        ("confidence", payload.confidence_rating),
        ("focus", payload.focus_rating),
        ("effectiveness", payload.effectiveness_rating),
    ] {
        if let Some(rating) = rating {
            validation::validate_rating(name, rating)?;
        }
    }

    let patch = SessionPatch {
        notes: payload.notes,
        confidence_rating: payload.confidence_rating,
        focus_rating: payload.focus_rating,
        effectiveness_rating: payload.effectiveness_rating,
        completed_objectives: payload.completed_objectives,
        techniques: payload.techniques,
    };
    let updated = session::update(&state.pool, session_id, user.user_id, &patch).await?;

    state.cache.invalidate(Entity::Session);

    Ok(Json(updated))
}

/// Complete a session. Duration is derived from the recorded start time as
/// whole minutes; a session that never recorded one completes with no
/// duration.
async fn complete_session(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<StudySession>, ApiError> {
    let found = session::get(&state.pool, session_id, user.user_id).await?;

    let end_time = Utc::now();
    let duration_minutes = found
        .start_time
        .map(|start| elapsed_whole_minutes(start, end_time));

    let completed =
        session::complete(&state.pool, session_id, user.user_id, end_time, duration_minutes)
            .await?;

    // A completed session counts as today's activity for the streak.
    analytics::update_user_streak(&state.pool, user.user_id).await?;

    state.cache.invalidate(Entity::Session);

    Ok(Json(completed))
}

async fn delete_session(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = session::delete(&state.pool, session_id, user.user_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }

    state.cache.invalidate(Entity::Session);

    Ok(StatusCode::NO_CONTENT)
}

/// Expand the caller's focus-timer cadence into an ordered phase schedule,
/// using profile preferences where set.
async fn focus_schedule(
    user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<FocusScheduleQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let found = profile::get_by_user(&state.pool, user.user_id).await?;
    let config = focus_config_from_profile(found.as_ref());

    let blocks = query
        .blocks
        .unwrap_or(config.sessions_before_long_break)
        .clamp(1, 12);

    Ok(Json(json!({
        "config": config,
        "blocks": schedule(config, blocks),
    })))
}
