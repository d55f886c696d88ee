use serde::Deserialize;
use sp_db::models::ProfilePatch;
use validator::Validate;

/// Partial profile update. Every field is optional; omitted fields keep
/// their stored value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255))]
    pub display_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub timezone: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub study_style: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub difficulty_preference: Option<String>,
    #[validate(range(min = 1, max = 240))]
    pub focus_minutes: Option<i32>,
    #[validate(range(min = 1, max = 60))]
    pub short_break_minutes: Option<i32>,
    #[validate(range(min = 1, max = 120))]
    pub long_break_minutes: Option<i32>,
    #[validate(range(min = 1, max = 12))]
    pub sessions_before_long_break: Option<i32>,
    pub notifications_enabled: Option<bool>,
    pub email_notifications: Option<bool>,
}

impl From<UpdateProfileRequest> for ProfilePatch {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            display_name: request.display_name,
            timezone: request.timezone,
            study_style: request.study_style,
            difficulty_preference: request.difficulty_preference,
            focus_minutes: request.focus_minutes,
            short_break_minutes: request.short_break_minutes,
            long_break_minutes: request.long_break_minutes,
            sessions_before_long_break: request.sessions_before_long_break,
            notifications_enabled: request.notifications_enabled,
            email_notifications: request.email_notifications,
        }
    }
}
