use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;
use validator::Validate;

use sp_cache::{Entity, QueryKey};
use sp_db::{
    models::{NewMaterial, StudyMaterial},
    repositories::material,
};

use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    metrics,
    storage::bucket_for_material_type,
};

use super::model::{CreateMaterialRequest, MaterialFilter};

/// Create the study-material routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/materials", get(list_materials).post(create_material))
        .route("/materials/{id}", axum::routing::delete(delete_material))
}

async fn list_materials(
    user: AuthUser,
    State(state): State<ApiState>,
    Query(filter): Query<MaterialFilter>,
) -> Result<Json<Vec<StudyMaterial>>, ApiError> {
    let key = match filter.cache_fragment() {
        Some(fragment) => QueryKey::filtered_list(Entity::Material, user.user_id, fragment),
        None => QueryKey::list(Entity::Material, user.user_id),
    };
    if let Some(materials) = state.cache.get_as::<Vec<StudyMaterial>>(&key) {
        metrics::record_cache_lookup("material", true);
        return Ok(Json(materials));
    }
    metrics::record_cache_lookup("material", false);

    let materials =
        material::list_for_user(&state.pool, user.user_id, filter.plan_id, filter.session_id)
            .await?;
    state.cache.put(key, &materials)?;

    Ok(Json(materials))
}

async fn create_material(
    user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<CreateMaterialRequest>,
) -> Result<(StatusCode, Json<StudyMaterial>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let new = NewMaterial {
        plan_id: payload.plan_id,
        session_id: payload.session_id,
        material_type: payload.material_type,
        file_path: payload.file_path,
        url: payload.url,
        order_index: payload.order_index,
    };
    let created = material::insert(&state.pool, user.user_id, &new).await?;

    state.cache.invalidate(Entity::Material);

    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a material. When the row carries an uploaded file, the object is
/// removed from storage first; a storage failure is logged and does not block
/// the row delete.
async fn delete_material(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(material_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let found = material::get(&state.pool, material_id, user.user_id).await?;

    if let Some(file_path) = found.file_path.as_deref() {
        match &state.storage {
            Some(storage) => {
                let bucket = bucket_for_material_type(&found.material_type);
                match storage.remove_object(bucket, file_path).await {
                    Ok(()) => metrics::record_storage_delete(true),
                    Err(e) => {
                        tracing::warn!(
                            material_id = %material_id,
                            bucket,
                            error = %e,
                            "failed to remove stored file, deleting row anyway"
                        );
                        metrics::record_storage_delete(false);
                    }
                }
            }
            None => {
                tracing::warn!(
                    material_id = %material_id,
                    "storage not configured, leaving file behind"
                );
            }
        }
    }

    let deleted = material::delete(&state.pool, material_id, user.user_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }

    state.cache.invalidate(Entity::Material);

    Ok(StatusCode::NO_CONTENT)
}
