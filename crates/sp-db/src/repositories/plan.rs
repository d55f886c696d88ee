use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{StudyPlan, StudyPlanDay, StudyPlanWeek};

pub async fn list_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<StudyPlan>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM study_plans
            WHERE user_id = $1
            ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn get<'e, E>(executor: E, plan_id: Uuid, user_id: Uuid) -> Result<StudyPlan, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM study_plans
            WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(plan_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

pub async fn insert<'e, E>(
    executor: E,
    user_id: Uuid,
    title: &str,
    subject: &str,
) -> Result<StudyPlan, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO study_plans (user_id, title, subject)
            VALUES ($1, $2, $3)
            RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(subject)
    .fetch_one(executor)
    .await
}

pub async fn update<'e, E>(
    executor: E,
    plan_id: Uuid,
    user_id: Uuid,
    title: Option<&str>,
    subject: Option<&str>,
) -> Result<StudyPlan, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE study_plans
            SET title = COALESCE($3, title),
                subject = COALESCE($4, subject),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
        "#,
    )
    .bind(plan_id)
    .bind(user_id)
    .bind(title)
    .bind(subject)
    .fetch_one(executor)
    .await
}

pub async fn delete<'e, E>(executor: E, plan_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM study_plans
            WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(plan_id)
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn insert_week<'e, E>(
    executor: E,
    plan_id: Uuid,
    week_number: i32,
) -> Result<StudyPlanWeek, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO study_plan_weeks (plan_id, week_number)
            VALUES ($1, $2)
            RETURNING *
        "#,
    )
    .bind(plan_id)
    .bind(week_number)
    .fetch_one(executor)
    .await
}

pub async fn insert_day<'e, E>(
    executor: E,
    week_id: Uuid,
    day_number: i32,
) -> Result<StudyPlanDay, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO study_plan_days (week_id, day_number)
            VALUES ($1, $2)
            RETURNING *
        "#,
    )
    .bind(week_id)
    .bind(day_number)
    .fetch_one(executor)
    .await
}

pub async fn weeks_for_plan<'e, E>(
    executor: E,
    plan_id: Uuid,
) -> Result<Vec<StudyPlanWeek>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM study_plan_weeks
            WHERE plan_id = $1
            ORDER BY week_number
        "#,
    )
    .bind(plan_id)
    .fetch_all(executor)
    .await
}

pub async fn days_for_plan<'e, E>(
    executor: E,
    plan_id: Uuid,
) -> Result<Vec<StudyPlanDay>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT d.*
            FROM study_plan_days d
            JOIN study_plan_weeks w ON w.id = d.week_id
            WHERE w.plan_id = $1
            ORDER BY w.week_number, d.day_number
        "#,
    )
    .bind(plan_id)
    .fetch_all(executor)
    .await
}

/// Mark a day complete/incomplete, scoped through the week's plan to the
/// owning user.
pub async fn set_day_completed<'e, E>(
    executor: E,
    day_id: Uuid,
    plan_id: Uuid,
    user_id: Uuid,
    completed: bool,
) -> Result<StudyPlanDay, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE study_plan_days d
            SET completed = $4
            FROM study_plan_weeks w
            JOIN study_plans p ON p.id = w.plan_id
            WHERE d.id = $1
              AND d.week_id = w.id
              AND w.plan_id = $2
              AND p.user_id = $3
            RETURNING d.*
        "#,
    )
    .bind(day_id)
    .bind(plan_id)
    .bind(user_id)
    .bind(completed)
    .fetch_one(executor)
    .await
}

/// Completed and total day counts for a plan, used to derive its progress
/// percentage.
pub async fn day_completion_counts<'e, E>(
    executor: E,
    plan_id: Uuid,
) -> Result<(i64, i64), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                COUNT(*) FILTER (WHERE d.completed) AS completed,
                COUNT(*) AS total
            FROM study_plan_days d
            JOIN study_plan_weeks w ON w.id = d.week_id
            WHERE w.plan_id = $1
        "#,
    )
    .bind(plan_id)
    .fetch_one(executor)
    .await
}

pub async fn set_progress<'e, E>(
    executor: E,
    plan_id: Uuid,
    user_id: Uuid,
    progress_percentage: f64,
) -> Result<StudyPlan, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE study_plans
            SET progress_percentage = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
        "#,
    )
    .bind(plan_id)
    .bind(user_id)
    .bind(progress_percentage)
    .fetch_one(executor)
    .await
}
