use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    ApiState,
    error::ApiError,
    make_rate_limit_layer,
    metrics,
    middleware::rate_limit,
};

use super::parse::{self, GeneratedPlan};

/// AI proxy routes. Stateless, CORS-enabled at the app layer, rate-limited
/// per client, and unauthenticated like the serverless functions they
/// replace.
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/ai/ask", post(ask))
        .route("/ai/goal-suggestions", post(goal_suggestions))
        .route("/ai/study-plan", post(study_plan))
        .layer(make_rate_limit_layer!(
            rate_limit::AI_RATE_PER_SECOND,
            rate_limit::AI_BURST_SIZE
        ))
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    question: String,
    /// Free-form study context, forwarded into the prompt verbatim.
    #[serde(default)]
    context: Option<String>,
}

/// Free-form Q&A: returns the model's raw text answer.
async fn ask(
    State(state): State<ApiState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.question.trim().is_empty() {
        return Err(ApiError::Validation("question must not be empty".to_string()));
    }

    let system = "You are a study assistant. Answer the student's question \
                  concisely and concretely.";
    let user = match payload.context.as_deref() {
        Some(context) => format!("Context:\n{context}\n\nQuestion: {}", payload.question),
        None => payload.question.clone(),
    };

    let result = state.llm.chat(system, &user).await;
    metrics::record_ai_request("ask", result.is_ok());
    let answer = result?;

    Ok(Json(json!({ "answer": answer })))
}

#[derive(Debug, Deserialize)]
struct GoalSuggestionRequest {
    /// What the student is working on, forwarded verbatim.
    context: String,
    #[serde(default)]
    count: Option<u32>,
}

/// Structured goal suggestions. Model output is parsed and validated; a
/// response that is not the requested JSON shape is an error, not a result.
async fn goal_suggestions(
    State(state): State<ApiState>,
    Json(payload): Json<GoalSuggestionRequest>,
) -> Result<Json<Value>, ApiError> {
    let count = payload.count.unwrap_or(3).clamp(1, 10);
    let system = "You generate study goals. Respond with JSON only: \
                  {\"suggestions\": [{\"title\", \"description\", \"category\", \
                  \"priority\", \"milestones\": [..]}]}. No prose.";
    let user = format!(
        "Suggest {count} study goals for this student.\n\nContext:\n{}",
        payload.context
    );

    let result = state.llm.chat(system, &user).await;
    metrics::record_ai_request("goal_suggestions", result.is_ok());
    let suggestions = parse::parse_goal_suggestions(&result?)?;

    Ok(Json(json!({ "suggestions": suggestions })))
}

#[derive(Debug, Deserialize)]
struct StudyPlanRequest {
    subject: String,
    #[serde(default)]
    duration_weeks: Option<u32>,
    #[serde(default)]
    context: Option<String>,
}

/// Study-plan generation. The one endpoint with a defined parse fallback:
/// when the model's output is not valid plan JSON, answer 200 with the
/// static template instead of propagating the parse error.
async fn study_plan(
    State(state): State<ApiState>,
    Json(payload): Json<StudyPlanRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.subject.trim().is_empty() {
        return Err(ApiError::Validation("subject must not be empty".to_string()));
    }
    let duration_weeks = payload.duration_weeks.unwrap_or(4).clamp(1, 52);

    let system = "You design study plans. Respond with JSON only: \
                  {\"title\", \"subject\", \"weeks\": [{\"week_number\", \"focus\", \
                  \"days\": [{\"day_number\", \"topic\", \"tasks\": [..]}]}]}. No prose.";
    let user = format!(
        "Create a {duration_weeks}-week study plan for: {}.{}",
        payload.subject,
        payload
            .context
            .as_deref()
            .map(|c| format!("\n\nContext:\n{c}"))
            .unwrap_or_default()
    );

    let result = state.llm.chat(system, &user).await;
    metrics::record_ai_request("study_plan", result.is_ok());
    let output = result?;

    let (plan, fallback): (GeneratedPlan, bool) = match parse::parse_generated_plan(&output) {
        Ok(plan) => (plan, false),
        Err(err) => {
            tracing::warn!(error = %err, "unparseable plan output, serving fallback template");
            (parse::fallback_plan(&payload.subject, duration_weeks), true)
        }
    };

    Ok(Json(json!({ "plan": plan, "fallback": fallback })))
}
