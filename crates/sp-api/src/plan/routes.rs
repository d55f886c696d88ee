use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use sp_cache::{Entity, QueryKey};
use sp_db::{models::StudyPlan, repositories::plan};

use crate::{ApiState, auth::AuthUser, error::ApiError, metrics};

use super::model::{
    CreatePlanRequest, PlanWithSchedule, UpdatePlanRequest, WeekWithDays, progress_from_counts,
};

/// Create the study-plan routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/plans", get(list_plans).post(create_plan))
        .route(
            "/plans/{id}",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
        .route("/plans/{plan_id}/days/{day_id}/complete", post(complete_day))
}

async fn list_plans(
    user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<StudyPlan>>, ApiError> {
    let key = QueryKey::list(Entity::Plan, user.user_id);
    if let Some(plans) = state.cache.get_as::<Vec<StudyPlan>>(&key) {
        metrics::record_cache_lookup("plan", true);
        return Ok(Json(plans));
    }
    metrics::record_cache_lookup("plan", false);

    let plans = plan::list_for_user(&state.pool, user.user_id).await?;
    state.cache.put(key, &plans)?;

    Ok(Json(plans))
}

async fn create_plan(
    user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanWithSchedule>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let created = plan::insert(&state.pool, user.user_id, &payload.title, &payload.subject).await?;

    // Scaffold the schedule: weeks 1..=N, each with days 1..=M.
    let mut weeks = Vec::with_capacity(payload.duration_weeks as usize);
    for week_number in 1..=payload.duration_weeks {
        let week = plan::insert_week(&state.pool, created.id, week_number as i32).await?;
        let mut days = Vec::with_capacity(payload.days_per_week as usize);
        for day_number in 1..=payload.days_per_week {
            days.push(plan::insert_day(&state.pool, week.id, day_number as i32).await?);
        }
        weeks.push(WeekWithDays { week, days });
    }

    state.cache.invalidate(Entity::Plan);

    Ok((
        StatusCode::CREATED,
        Json(PlanWithSchedule {
            plan: created,
            weeks,
        }),
    ))
}

async fn get_plan(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<PlanWithSchedule>, ApiError> {
    let key = QueryKey::detail(Entity::Plan, plan_id);
    if let Some(cached) = state.cache.get_as::<PlanWithSchedule>(&key) {
        metrics::record_cache_lookup("plan", true);
        // The cache is shared across callers; a cached row belonging to
        // someone else behaves exactly like a missing row.
        if cached.plan.user_id != user.user_id {
            return Err(ApiError::NotFound);
        }
        return Ok(Json(cached));
    }
    metrics::record_cache_lookup("plan", false);

    let found = plan::get(&state.pool, plan_id, user.user_id).await?;
    let weeks = plan::weeks_for_plan(&state.pool, plan_id).await?;
    let days = plan::days_for_plan(&state.pool, plan_id).await?;

    let weeks = weeks
        .into_iter()
        .map(|week| {
            let days = days.iter().filter(|d| d.week_id == week.id).cloned().collect();
            WeekWithDays { week, days }
        })
        .collect();

    let detail = PlanWithSchedule { plan: found, weeks };
    state.cache.put(key, &detail)?;

    Ok(Json(detail))
}

async fn update_plan(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(plan_id): Path<Uuid>,
    Json(payload): Json<UpdatePlanRequest>,
) -> Result<Json<StudyPlan>, ApiError> {
    let updated = plan::update(
        &state.pool,
        plan_id,
        user.user_id,
        payload.title.as_deref(),
        payload.subject.as_deref(),
    )
    .await?;

    state.cache.invalidate(Entity::Plan);

    Ok(Json(updated))
}

async fn delete_plan(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(plan_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = plan::delete(&state.pool, plan_id, user.user_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }

    state.cache.invalidate(Entity::Plan);

    Ok(StatusCode::NO_CONTENT)
}

/// Mark a day complete and recompute the plan's progress percentage from
/// its completed/total day counts.
async fn complete_day(
    user: AuthUser,
    State(state): State<ApiState>,
    Path((plan_id, day_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let day = plan::set_day_completed(&state.pool, day_id, plan_id, user.user_id, true).await?;

    let (completed, total) = plan::day_completion_counts(&state.pool, plan_id).await?;
    let progress = progress_from_counts(completed, total);
    let updated = plan::set_progress(&state.pool, plan_id, user.user_id, progress).await?;

    state.cache.invalidate(Entity::PlanDay);

    Ok(Json(json!({ "day": day, "plan": updated })))
}
