use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};

use crate::{ai, goal, material, plan, profile, session, state::ApiState};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .merge(plan::routes())
        .merge(session::routes())
        .merge(goal::routes())
        .merge(material::routes())
        .merge(profile::routes())
        .merge(ai::routes())
        .fallback(handler_404)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
