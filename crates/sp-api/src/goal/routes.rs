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
use sp_db::{
    models::{Goal, GoalPatch, NewGoal, UserStreak},
    repositories::{analytics, goal},
};

use crate::{ApiState, auth::AuthUser, error::ApiError, metrics, plan::model::progress_from_counts, validation};

use super::model::{CreateGoalRequest, GoalWithItems, UpdateGoalRequest};

/// Create the goal routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route(
            "/goals/{id}",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
        .route("/goals/{id}/complete", post(complete_goal))
        .route("/goals/{goal_id}/items/{item_id}/toggle", post(toggle_item))
        .route("/streak", get(get_streak))
}

async fn list_goals(
    user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<Goal>>, ApiError> {
    let key = QueryKey::list(Entity::Goal, user.user_id);
    if let Some(goals) = state.cache.get_as::<Vec<Goal>>(&key) {
        metrics::record_cache_lookup("goal", true);
        return Ok(Json(goals));
    }
    metrics::record_cache_lookup("goal", false);

    let goals = goal::list_for_user(&state.pool, user.user_id).await?;
    state.cache.put(key, &goals)?;

    Ok(Json(goals))
}

/// Create a goal, then its action items: milestone N becomes the item with
/// `order_index` N. The inserts are sequential calls, not one transaction.
async fn create_goal(
    user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalWithItems>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    validation::validate_priority(&payload.priority)?;

    let new = NewGoal {
        title: payload.title,
        description: payload.description,
        category: payload.category,
        priority: payload.priority.to_lowercase(),
        target_date: payload.target_date,
        estimated_hours: payload.estimated_hours,
        success_metric: payload.success_metric,
    };
    let created = goal::insert(&state.pool, user.user_id, &new).await?;

    let mut action_items = Vec::with_capacity(payload.milestones.len());
    for (index, title) in payload.milestones.iter().enumerate() {
        action_items
            .push(goal::insert_action_item(&state.pool, created.id, title, index as i32).await?);
    }

    analytics::track_goal_event(&state.pool, user.user_id, Some(created.id), "goal_created")
        .await?;

    state.cache.invalidate(Entity::Goal);

    Ok((
        StatusCode::CREATED,
        Json(GoalWithItems {
            goal: created,
            action_items,
        }),
    ))
}

async fn get_goal(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<GoalWithItems>, ApiError> {
    let key = QueryKey::detail(Entity::Goal, goal_id);
    if let Some(cached) = state.cache.get_as::<GoalWithItems>(&key) {
        metrics::record_cache_lookup("goal", true);
        if cached.goal.user_id != user.user_id {
            return Err(ApiError::NotFound);
        }
        return Ok(Json(cached));
    }
    metrics::record_cache_lookup("goal", false);

    let found = goal::get(&state.pool, goal_id, user.user_id).await?;
    let action_items = goal::items_for_goal(&state.pool, goal_id).await?;

    let detail = GoalWithItems {
        goal: found,
        action_items,
    };
    state.cache.put(key, &detail)?;

    Ok(Json(detail))
}

async fn update_goal(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(goal_id): Path<Uuid>,
    Json(payload): Json<UpdateGoalRequest>,
) -> Result<Json<Goal>, ApiError> {
    if let Some(priority) = &payload.priority {
        validation::validate_priority(priority)?;
    }

    let patch = GoalPatch {
        title: payload.title,
        description: payload.description,
        category: payload.category,
        priority: payload.priority.map(|p| p.to_lowercase()),
        status: payload.status,
        target_date: payload.target_date,
        estimated_hours: payload.estimated_hours,
        invested_hours: payload.invested_hours,
        success_metric: payload.success_metric,
    };
    let updated = goal::update(&state.pool, goal_id, user.user_id, &patch).await?;

    state.cache.invalidate(Entity::Goal);

    Ok(Json(updated))
}

/// Delete the goal row. Action items go with it via the schema's cascade;
/// `goal_events` history is retained. Application code does not cascade.
async fn delete_goal(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(goal_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = goal::delete(&state.pool, goal_id, user.user_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }

    state.cache.invalidate(Entity::Goal);

    Ok(StatusCode::NO_CONTENT)
}

/// Flip an action item and recompute the goal's progress from its
/// completed/total item counts.
async fn toggle_item(
    user: AuthUser,
    State(state): State<ApiState>,
    Path((goal_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let item = goal::toggle_item_completed(&state.pool, item_id, goal_id, user.user_id).await?;

    let (completed, total) = goal::item_completion_counts(&state.pool, goal_id).await?;
    let progress = progress_from_counts(completed, total);
    let updated = goal::set_progress(&state.pool, goal_id, user.user_id, progress).await?;

    state.cache.invalidate(Entity::GoalItem);

    Ok(Json(json!({ "item": item, "goal": updated })))
}

/// Mark a goal completed and record the event and streak through the
/// stored procedures.
async fn complete_goal(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<Goal>, ApiError> {
    let patch = GoalPatch {
        status: Some("completed".to_string()),
        ..GoalPatch::default()
    };
    goal::update(&state.pool, goal_id, user.user_id, &patch).await?;
    let completed = goal::set_progress(&state.pool, goal_id, user.user_id, 100.0).await?;

    analytics::track_goal_event(&state.pool, user.user_id, Some(goal_id), "goal_completed")
        .await?;
    analytics::update_user_streak(&state.pool, user.user_id).await?;

    state.cache.invalidate(Entity::Goal);

    Ok(Json(completed))
}

/// The caller's activity streak; zeros when no streak row exists yet.
async fn get_streak(
    user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<UserStreak>, ApiError> {
    let streak = analytics::get_streak(&state.pool, user.user_id)
        .await?
        .unwrap_or(UserStreak {
            user_id: user.user_id,
            current_streak: 0,
            longest_streak: 0,
            last_activity_date: None,
        });

    Ok(Json(streak))
}
