use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined curriculum broken into weeks and days.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudyPlan {
    pub id: Uuid,
    /// Owner; every read and write is scoped by this column.
    pub user_id: Uuid,
    pub title: String,
    pub subject: String,
    /// Completed days over total days, as a plain percentage. Recomputed by
    /// the application on day completion; not clamped by the schema.
    pub progress_percentage: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One week of a study plan.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudyPlanWeek {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub week_number: i32,
    pub created_at: DateTime<Utc>,
}

/// One day of a study-plan week.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudyPlanDay {
    pub id: Uuid,
    pub week_id: Uuid,
    pub day_number: i32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// A timed, gradeable unit of study activity, optionally linked to a plan.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudySession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    /// `active`, `completed` or `abandoned`.
    pub status: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Whole minutes between start and completion; unset when the session
    /// was completed without a recorded start time.
    pub duration_minutes: Option<i32>,
    pub confidence_rating: Option<i32>,
    pub focus_rating: Option<i32>,
    pub effectiveness_rating: Option<i32>,
    pub notes: Option<String>,
    pub completed_objectives: Vec<String>,
    pub techniques: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A file or link attached to a plan or session. `file_path` is the
/// object-storage key inside the bucket selected by `material_type`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudyMaterial {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
    pub material_type: String,
    pub file_path: Option<String>,
    pub url: Option<String>,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

/// A tracked objective with milestones, priority and target date.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: String,
    pub status: String,
    pub progress_percentage: f64,
    pub target_date: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    pub invested_hours: Option<f64>,
    pub success_metric: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A milestone belonging to a goal, ordered by `order_index`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GoalActionItem {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub title: String,
    pub order_index: i32,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-user preference bag: display settings, study-style preferences and
/// focus-timer durations (minutes, nullable to fall back to defaults).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub timezone: Option<String>,
    pub study_style: Option<String>,
    pub difficulty_preference: Option<String>,
    pub focus_minutes: Option<i32>,
    pub short_break_minutes: Option<i32>,
    pub long_break_minutes: Option<i32>,
    pub sessions_before_long_break: Option<i32>,
    pub notifications_enabled: bool,
    pub email_notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a goal. The owner id is supplied separately by the
/// caller from the authenticated session, never from a request body.
#[derive(Debug, Clone, Default)]
pub struct NewGoal {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: String,
    pub target_date: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    pub success_metric: Option<String>,
}

/// Partial update for a goal; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    pub invested_hours: Option<f64>,
    pub success_metric: Option<String>,
}

/// Insert payload for a study session started now.
#[derive(Debug, Clone, Default)]
pub struct NewSession {
    pub plan_id: Option<Uuid>,
    pub notes: Option<String>,
    pub techniques: Vec<String>,
}

/// Partial update for a study session; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub notes: Option<String>,
    pub confidence_rating: Option<i32>,
    pub focus_rating: Option<i32>,
    pub effectiveness_rating: Option<i32>,
    pub completed_objectives: Option<Vec<String>>,
    pub techniques: Option<Vec<String>>,
}

/// Insert payload for a study material.
#[derive(Debug, Clone, Default)]
pub struct NewMaterial {
    pub plan_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
    pub material_type: String,
    pub file_path: Option<String>,
    pub url: Option<String>,
    pub order_index: i32,
}

/// Upsert payload for a user profile.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub timezone: Option<String>,
    pub study_style: Option<String>,
    pub difficulty_preference: Option<String>,
    pub focus_minutes: Option<i32>,
    pub short_break_minutes: Option<i32>,
    pub long_break_minutes: Option<i32>,
    pub sessions_before_long_break: Option<i32>,
    pub notifications_enabled: Option<bool>,
    pub email_notifications: Option<bool>,
}

/// Daily activity streak maintained by the `update_user_streak` procedure.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserStreak {
    pub user_id: Uuid,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_activity_date: Option<NaiveDate>,
}
