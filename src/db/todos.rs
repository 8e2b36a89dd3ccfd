use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Todo, TodoChanges, TodoRow};

/// Columns of a todo joined with its category name, for a query aliasing
/// `todos` as `t` and left-joining `categories` as `c`.
const TODO_COLUMNS: &str = "t.id, t.title, t.description, t.completed, t.priority, t.due_date, \
     t.user_id, t.category_id, c.name AS category_name, t.created_at, t.updated_at";

/// All of the owner's todos with their categories, newest first.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Todo>, sqlx::Error> {
    let sql = format!(
        "SELECT {TODO_COLUMNS} FROM todos t
         LEFT JOIN categories c ON c.id = t.category_id
         WHERE t.user_id = $1
         ORDER BY t.created_at DESC"
    );
    let rows = sqlx::query_as::<_, TodoRow>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Todo::from).collect())
}

pub async fn find(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<Todo>, sqlx::Error> {
    let sql = format!(
        "SELECT {TODO_COLUMNS} FROM todos t
         LEFT JOIN categories c ON c.id = t.category_id
         WHERE t.id = $1 AND t.user_id = $2"
    );
    let row = sqlx::query_as::<_, TodoRow>(&sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Todo::from))
}

/// Inserts a todo stamped with `user_id`; it starts out not completed.
pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    changes: &TodoChanges,
) -> Result<Todo, sqlx::Error> {
    let sql = format!(
        "WITH t AS (
             INSERT INTO todos (id, title, description, priority, due_date, category_id, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *
         )
         SELECT {TODO_COLUMNS} FROM t
         LEFT JOIN categories c ON c.id = t.category_id"
    );
    let row = sqlx::query_as::<_, TodoRow>(&sql)
        .bind(Uuid::new_v4())
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.priority)
        .bind(changes.due_date)
        .bind(changes.category_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(Todo::from(row))
}

/// Replaces every mutable field of an owned todo. `None` when no owned row matched.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    changes: &TodoChanges,
) -> Result<Option<Todo>, sqlx::Error> {
    let sql = format!(
        "WITH t AS (
             UPDATE todos
             SET title = $1, description = $2, priority = $3, due_date = $4,
                 category_id = $5, updated_at = NOW()
             WHERE id = $6 AND user_id = $7
             RETURNING *
         )
         SELECT {TODO_COLUMNS} FROM t
         LEFT JOIN categories c ON c.id = t.category_id"
    );
    let row = sqlx::query_as::<_, TodoRow>(&sql)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.priority)
        .bind(changes.due_date)
        .bind(changes.category_id)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Todo::from))
}

/// Sets only the `completed` flag of an owned todo.
pub async fn set_completed(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    completed: bool,
) -> Result<Option<Todo>, sqlx::Error> {
    let sql = format!(
        "WITH t AS (
             UPDATE todos SET completed = $1, updated_at = NOW()
             WHERE id = $2 AND user_id = $3
             RETURNING *
         )
         SELECT {TODO_COLUMNS} FROM t
         LEFT JOIN categories c ON c.id = t.category_id"
    );
    let row = sqlx::query_as::<_, TodoRow>(&sql)
        .bind(completed)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Todo::from))
}

pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
