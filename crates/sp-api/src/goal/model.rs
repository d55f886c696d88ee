use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use sp_db::models::{Goal, GoalActionItem};

pub(crate) fn default_priority() -> String {
    "medium".to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub success_metric: Option<String>,
    /// Milestone titles; each becomes an action item with `order_index`
    /// matching its position here.
    #[serde(default)]
    #[validate(length(max = 20))]
    pub milestones: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateGoalRequest {
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

/// A goal together with its ordered action items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalWithItems {
    #[serde(flatten)]
    pub goal: Goal,
    pub action_items: Vec<GoalActionItem>,
}
