use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{NewSession, SessionPatch, StudySession};

pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<StudySession>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM study_sessions
            WHERE user_id = $1
            ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn get<'e, E>(
    executor: E,
    session_id: Uuid,
    user_id: Uuid,
) -> Result<StudySession, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM study_sessions
            WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

/// Start a new session: status `active`, start time now.
pub async fn insert<'e, E>(
    executor: E,
    user_id: Uuid,
    new: &NewSession,
) -> Result<StudySession, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO study_sessions (user_id, plan_id, status, start_time, notes, techniques)
            VALUES ($1, $2, 'active', NOW(), $3, $4)
            RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(new.plan_id)
    .bind(new.notes.as_deref())
    .bind(&new.techniques)
    .fetch_one(executor)
    .await
}

pub async fn update<'e, E>(
    executor: E,
    session_id: Uuid,
    user_id: Uuid,
    patch: &SessionPatch,
) -> Result<StudySession, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE study_sessions
            SET notes = COALESCE($3, notes),
                confidence_rating = COALESCE($4, confidence_rating),
                focus_rating = COALESCE($5, focus_rating),
                effectiveness_rating = COALESCE($6, effectiveness_rating),
                completed_objectives = COALESCE($7, completed_objectives),
                techniques = COALESCE($8, techniques),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .bind(patch.notes.as_deref())
    .bind(patch.confidence_rating)
    .bind(patch.focus_rating)
    .bind(patch.effectiveness_rating)
    .bind(patch.completed_objectives.as_deref())
    .bind(patch.techniques.as_deref())
    .fetch_one(executor)
    .await
}

/// Mark a session completed. `duration_minutes` is `NULL` when no start time
/// was ever recorded for the session.
pub async fn complete<'e, E>(
    executor: E,
    session_id: Uuid,
    user_id: Uuid,
    end_time: DateTime<Utc>,
    duration_minutes: Option<i32>,
) -> Result<StudySession, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE study_sessions
            SET status = 'completed',
                end_time = $3,
                duration_minutes = $4,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .bind(end_time)
    .bind(duration_minutes)
    .fetch_one(executor)
    .await
}

pub async fn delete<'e, E>(executor: E, session_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM study_sessions
            WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
