use axum::{Json, Router, extract::State, routing::get};
use validator::Validate;

use sp_cache::{Entity, QueryKey};
use sp_db::{models::UserProfile, repositories::profile};

use crate::{ApiState, auth::AuthUser, error::ApiError, metrics};

use super::model::UpdateProfileRequest;

/// Create the profile routes
pub fn routes() -> Router<ApiState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

async fn get_profile(
    user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<UserProfile>, ApiError> {
    // Profiles are keyed by owner, so the detail key uses the user id.
    let key = QueryKey::detail(Entity::Profile, user.user_id);
    if let Some(cached) = state.cache.get_as::<UserProfile>(&key) {
        metrics::record_cache_lookup("profile", true);
        if cached.user_id != user.user_id {
            return Err(ApiError::NotFound);
        }
        return Ok(Json(cached));
    }
    metrics::record_cache_lookup("profile", false);

    let found = profile::get_by_user(&state.pool, user.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    state.cache.put(key, &found)?;

    Ok(Json(found))
}

async fn update_profile(
    user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let updated = profile::upsert(&state.pool, user.user_id, &payload.into()).await?;

    state.cache.invalidate(Entity::Profile);

    Ok(Json(updated))
}
