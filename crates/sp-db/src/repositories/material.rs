use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{NewMaterial, StudyMaterial};

/// List materials for a user, optionally narrowed to a plan or session.
pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: Uuid,
    plan_id: Option<Uuid>,
    session_id: Option<Uuid>,
) -> Result<Vec<StudyMaterial>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM study_materials
            WHERE user_id = $1
              AND ($2::uuid IS NULL OR plan_id = $2)
              AND ($3::uuid IS NULL OR session_id = $3)
            ORDER BY order_index, created_at
        "#,
    )
    .bind(user_id)
    .bind(plan_id)
    .bind(session_id)
    .fetch_all(executor)
    .await
}

pub async fn get<'e, E>(
    executor: E,
    material_id: Uuid,
    user_id: Uuid,
) -> Result<StudyMaterial, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM study_materials
            WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(material_id)
    .bind(user_id)
    .fetch_one(executor)
    .await
}

pub async fn insert<'e, E>(
    executor: E,
    user_id: Uuid,
    new: &NewMaterial,
) -> Result<StudyMaterial, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO study_materials
                (user_id, plan_id, session_id, material_type, file_path, url, order_index)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(new.plan_id)
    .bind(new.session_id)
    .bind(&new.material_type)
    .bind(new.file_path.as_deref())
    .bind(new.url.as_deref())
    .bind(new.order_index)
    .fetch_one(executor)
    .await
}

pub async fn delete<'e, E>(
    executor: E,
    material_id: Uuid,
    user_id: Uuid,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM study_materials
            WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(material_id)
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
