use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{Goal, GoalActionItem, GoalPatch, NewGoal};

pub async fn list_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<Goal>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM goals
            WHERE user_id = $1
            ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn get<'e, E>(executor: E, goal_id: Uuid, user_id: Uuid) -> Result<Goal, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM goals
            WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(goal_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

pub async fn insert<'e, E>(executor: E, user_id: Uuid, new: &NewGoal) -> Result<Goal, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO goals
                (user_id, title, description, category, priority, target_date,
                 estimated_hours, success_metric)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&new.title)
    .bind(new.description.as_deref())
    .bind(new.category.as_deref())
    .bind(&new.priority)
    .bind(new.target_date)
    .bind(new.estimated_hours)
    .bind(new.success_metric.as_deref())
    .fetch_one(executor)
    .await
}

pub async fn update<'e, E>(
    executor: E,
    goal_id: Uuid,
    user_id: Uuid,
    patch: &GoalPatch,
) -> Result<Goal, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE goals
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                category = COALESCE($5, category),
                priority = COALESCE($6, priority),
                status = COALESCE($7, status),
                target_date = COALESCE($8, target_date),
                estimated_hours = COALESCE($9, estimated_hours),
                invested_hours = COALESCE($10, invested_hours),
                success_metric = COALESCE($11, success_metric),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
        "#,
    )
    .bind(goal_id)
    .bind(user_id)
    .bind(patch.title.as_deref())
    .bind(patch.description.as_deref())
    .bind(patch.category.as_deref())
    .bind(patch.priority.as_deref())
    .bind(patch.status.as_deref())
    .bind(patch.target_date)
    .bind(patch.estimated_hours)
    .bind(patch.invested_hours)
    .bind(patch.success_metric.as_deref())
    .fetch_one(executor)
    .await
}

/// Delete the goal row only. Action items are removed by the schema's
/// cascade; `goal_events` rows carry no foreign key and are retained as
/// history.
pub async fn delete<'e, E>(executor: E, goal_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM goals
            WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(goal_id)
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn insert_action_item<'e, E>(
    executor: E,
    goal_id: Uuid,
    title: &str,
    order_index: i32,
) -> Result<GoalActionItem, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO goal_action_items (goal_id, title, order_index)
            VALUES ($1, $2, $3)
            RETURNING *
        "#,
    )
    .bind(goal_id)
    .bind(title)
    .bind(order_index)
    .fetch_one(executor)
    .await
}

pub async fn items_for_goal<'e, E>(
    executor: E,
    goal_id: Uuid,
) -> Result<Vec<GoalActionItem>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM goal_action_items
            WHERE goal_id = $1
            ORDER BY order_index
        "#,
    )
    .bind(goal_id)
    .fetch_all(executor)
    .await
}

/// Flip an action item's completion flag, scoped through the goal to the
/// owning user.
pub async fn toggle_item_completed<'e, E>(
    executor: E,
    item_id: Uuid,
    goal_id: Uuid,
    user_id: Uuid,
) -> Result<GoalActionItem, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE goal_action_items i
            SET completed = NOT i.completed
            FROM goals g
            WHERE i.id = $1
              AND i.goal_id = $2
              AND g.id = i.goal_id
              AND g.user_id = $3
            RETURNING i.*
        "#,
    )
    .bind(item_id)
    .bind(goal_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

/// Completed and total action-item counts for a goal.
pub async fn item_completion_counts<'e, E>(
    executor: E,
    goal_id: Uuid,
) -> Result<(i64, i64), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                COUNT(*) FILTER (WHERE completed) AS completed,
                COUNT(*) AS total
            FROM goal_action_items
            WHERE goal_id = $1
        "#,
    )
    .bind(goal_id)
    .fetch_one(executor)
    .await
}

pub async fn set_progress<'e, E>(
    executor: E,
    goal_id: Uuid,
    user_id: Uuid,
    progress_percentage: f64,
) -> Result<Goal, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE goals
            SET progress_percentage = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
        "#,
    )
    .bind(goal_id)
    .bind(user_id)
    .bind(progress_percentage)
    .fetch_one(executor)
    .await
}
