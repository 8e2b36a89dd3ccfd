use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Category, CategorySummary};

/// All of the owner's categories with their todo counts, newest first.
pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<CategorySummary>, sqlx::Error> {
    sqlx::query_as::<_, CategorySummary>(
        "SELECT c.id, c.name, c.user_id, c.created_at, COUNT(t.id) AS todo_count
         FROM categories c
         LEFT JOIN todos t ON t.category_id = c.id
         WHERE c.user_id = $1
         GROUP BY c.id
         ORDER BY c.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn find(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "SELECT id, name, user_id, created_at FROM categories
         WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn exists(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let (exists,) = sqlx::query_as::<_, (bool,)>(
        "SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1 AND user_id = $2)",
    )
    .bind(id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn create(pool: &PgPool, user_id: Uuid, name: &str) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "INSERT INTO categories (id, name, user_id)
         VALUES ($1, $2, $3)
         RETURNING id, name, user_id, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn rename(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    name: &str,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $1
         WHERE id = $2 AND user_id = $3
         RETURNING id, name, user_id, created_at",
    )
    .bind(name)
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Deletes an owned category; its todos stay and lose their `category_id`
/// through the `ON DELETE SET NULL` reference. Returns whether a row was removed.
pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
