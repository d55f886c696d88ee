use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{ProfilePatch, UserProfile};

pub async fn get_by_user<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Option<UserProfile>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM user_profiles
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Create or patch the caller's profile in one statement. Absent fields keep
/// their stored value on conflict.
pub async fn upsert<'e, E>(
    executor: E,
    user_id: Uuid,
    patch: &ProfilePatch,
) -> Result<UserProfile, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO user_profiles
                (user_id, display_name, timezone, study_style, difficulty_preference,
                 focus_minutes, short_break_minutes, long_break_minutes,
                 sessions_before_long_break, notifications_enabled, email_notifications)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9,
                    COALESCE($10, TRUE), COALESCE($11, FALSE))
            ON CONFLICT (user_id) DO UPDATE
            SET display_name = COALESCE($2, user_profiles.display_name),
                timezone = COALESCE($3, user_profiles.timezone),
                study_style = COALESCE($4, user_profiles.study_style),
                difficulty_preference = COALESCE($5, user_profiles.difficulty_preference),
                focus_minutes = COALESCE($6, user_profiles.focus_minutes),
                short_break_minutes = COALESCE($7, user_profiles.short_break_minutes),
                long_break_minutes = COALESCE($8, user_profiles.long_break_minutes),
                sessions_before_long_break =
                    COALESCE($9, user_profiles.sessions_before_long_break),
                notifications_enabled = COALESCE($10, user_profiles.notifications_enabled),
                email_notifications = COALESCE($11, user_profiles.email_notifications),
                updated_at = NOW()
            RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(patch.display_name.as_deref())
    .bind(patch.timezone.as_deref())
    .bind(patch.study_style.as_deref())
    .bind(patch.difficulty_preference.as_deref())
    .bind(patch.focus_minutes)
    .bind(patch.short_break_minutes)
    .bind(patch.long_break_minutes)
    .bind(patch.sessions_before_long_break)
    .bind(patch.notifications_enabled)
    .bind(patch.email_notifications)
    .fetch_one(executor)
    .await
}
