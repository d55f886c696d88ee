use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use sp_db::models::UserProfile;
use sp_focus::FocusConfig;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub plan_id: Option<Uuid>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub techniques: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateSessionRequest {
    pub notes: Option<String>,
    pub confidence_rating: Option<i32>,
    pub focus_rating: Option<i32>,
    pub effectiveness_rating: Option<i32>,
    pub completed_objectives: Option<Vec<String>>,
    pub techniques: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct FocusScheduleQuery {
    /// Number of focus blocks to expand; defaults to one long-break cycle.
    pub blocks: Option<u32>,
}

/// Whole minutes between a session's start and completion, rounded to the
/// nearest minute.
pub fn elapsed_whole_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i32 {
    let seconds = (end - start).num_seconds().max(0);
    ((seconds + 30) / 60) as i32
}

/// Focus-timer config from a profile's preferences, falling back to the
/// defaults for anything unset.
pub fn focus_config_from_profile(profile: Option<&UserProfile>) -> FocusConfig {
    let defaults = FocusConfig::default();
    let Some(profile) = profile else {
        return defaults;
    };

    let minutes = |value: Option<i32>, fallback_secs: u32| -> u32 {
        value
            .filter(|m| *m > 0)
            .map_or(fallback_secs, |m| m as u32 * 60)
    };

    FocusConfig {
        focus_secs: minutes(profile.focus_minutes, defaults.focus_secs),
        short_break_secs: minutes(profile.short_break_minutes, defaults.short_break_secs),
        long_break_secs: minutes(profile.long_break_minutes, defaults.long_break_secs),
        sessions_before_long_break: profile
            .sessions_before_long_break
            .filter(|n| *n > 0)
            .map_or(defaults.sessions_before_long_break, |n| n as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_elapsed_whole_minutes_rounds() {
        let start = Utc::now();
        assert_eq!(elapsed_whole_minutes(start, start + Duration::seconds(29)), 0);
        assert_eq!(elapsed_whole_minutes(start, start + Duration::seconds(30)), 1);
        assert_eq!(elapsed_whole_minutes(start, start + Duration::seconds(89)), 1);
        assert_eq!(elapsed_whole_minutes(start, start + Duration::seconds(90)), 2);
        assert_eq!(
            elapsed_whole_minutes(start, start + Duration::seconds(25 * 60)),
            25
        );
    }

    #[test]
    fn test_elapsed_whole_minutes_clamps_clock_skew() {
        let start = Utc::now();
        assert_eq!(elapsed_whole_minutes(start, start - Duration::seconds(10)), 0);
    }

    #[test]
    fn test_focus_config_defaults_without_profile() {
        assert_eq!(focus_config_from_profile(None), FocusConfig::default());
    }
}
