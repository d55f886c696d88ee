//! Opaque calls into the analytics stored procedures.

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::UserStreak;

pub async fn track_goal_event<'e, E>(
    executor: E,
    user_id: Uuid,
    goal_id: Option<Uuid>,
    event_type: &str,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"SELECT track_goal_event($1, $2, $3)"#,
    )
    .bind(user_id)
    .bind(goal_id)
    .bind(event_type)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn update_user_streak<'e, E>(executor: E, user_id: Uuid) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"SELECT update_user_streak($1)"#,
    )
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn get_streak<'e, E>(executor: E, user_id: Uuid) -> Result<Option<UserStreak>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM user_streaks
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}
