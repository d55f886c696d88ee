use serde::{Deserialize, Serialize};
use validator::Validate;

use sp_db::models::{StudyPlan, StudyPlanDay, StudyPlanWeek};

pub(crate) const fn default_duration_weeks() -> u32 {
    4
}

pub(crate) const fn default_days_per_week() -> u32 {
    5
}

/// Create a plan and scaffold its week/day schedule.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub subject: String,
    #[serde(default = "default_duration_weeks")]
    #[validate(range(min = 1, max = 52))]
    pub duration_weeks: u32,
    #[serde(default = "default_days_per_week")]
    #[validate(range(min = 1, max = 7))]
    pub days_per_week: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    pub title: Option<String>,
    pub subject: Option<String>,
}

/// A plan together with its full week/day schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanWithSchedule {
    #[serde(flatten)]
    pub plan: StudyPlan,
    pub weeks: Vec<WeekWithDays>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekWithDays {
    #[serde(flatten)]
    pub week: StudyPlanWeek,
    pub days: Vec<StudyPlanDay>,
}

/// Plan progress from day counts, as a plain percentage. Zero days means
/// zero progress.
pub fn progress_from_counts(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_from_counts() {
        assert_eq!(progress_from_counts(0, 0), 0.0);
        assert_eq!(progress_from_counts(0, 20), 0.0);
        assert_eq!(progress_from_counts(5, 20), 25.0);
        assert_eq!(progress_from_counts(20, 20), 100.0);
    }
}
