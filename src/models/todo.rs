use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// Represents the priority of a todo.
/// Corresponds to the `todo_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "todo_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// The `{id, name}` of the category a todo is filed under.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
}

/// A todo as returned by the API, joined with its category.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub category: Option<CategoryRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A `todos` row left-joined with `categories.name`.
#[derive(Debug, FromRow)]
pub struct TodoRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        let category = match (row.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(CategoryRef { id, name }),
            _ => None,
        };
        Todo {
            id: row.id,
            title: row.title,
            description: row.description,
            completed: row.completed,
            priority: row.priority,
            due_date: row.due_date,
            user_id: row.user_id,
            category_id: category.as_ref().map(|c| c.id),
            category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Request body for creating or fully updating a todo.
///
/// `priority`, `dueDate` and `categoryId` arrive as strings so a bad value is reported
/// against its field instead of failing the whole body. A missing field defaults to
/// empty and fails its own rule.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TodoInput {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Title is required (max 200 characters)"))]
    pub title: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(custom = "validate_priority")]
    pub priority: String,

    #[serde(default)]
    #[validate(custom = "validate_due_date")]
    pub due_date: Option<String>,

    #[serde(default)]
    #[validate(custom = "validate_category_id")]
    pub category_id: Option<String>,
}

/// Validated, typed fields of a `TodoInput`, ready for the data layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoChanges {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
}

impl TodoInput {
    /// Runs the field rules and converts the input into typed `TodoChanges`.
    pub fn into_changes(self) -> Result<TodoChanges, AppError> {
        self.validate()?;

        let priority = Priority::parse(&self.priority)
            .ok_or_else(|| AppError::invalid_field("priority", PRIORITY_MESSAGE))?;
        let due_date = match present(self.due_date) {
            Some(raw) => Some(
                parse_due_date(&raw)
                    .ok_or_else(|| AppError::invalid_field("dueDate", DUE_DATE_MESSAGE))?,
            ),
            None => None,
        };
        let category_id = match present(self.category_id) {
            Some(raw) => Some(
                Uuid::parse_str(&raw)
                    .map_err(|_| AppError::invalid_field("categoryId", CATEGORY_MESSAGE))?,
            ),
            None => None,
        };

        Ok(TodoChanges {
            title: self.title,
            description: self.description,
            priority,
            due_date,
            category_id,
        })
    }
}

/// Request body for `PATCH /todos/{id}`: sets the completion flag.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleInput {
    pub completed: bool,
}

const PRIORITY_MESSAGE: &str = "Priority must be one of: low, medium, high";
const DUE_DATE_MESSAGE: &str = "Due date must be a date (YYYY-MM-DD) or an RFC 3339 timestamp";
const CATEGORY_MESSAGE: &str = "Category id is not valid";

/// Accepts `YYYY-MM-DD`, or an RFC 3339 timestamp taken as its UTC calendar date.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_priority(value: &str) -> Result<(), ValidationError> {
    match Priority::parse(value) {
        Some(_) => Ok(()),
        None => Err(field_error("priority", PRIORITY_MESSAGE)),
    }
}

fn validate_due_date(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || parse_due_date(value).is_some() {
        Ok(())
    } else {
        Err(field_error("due_date", DUE_DATE_MESSAGE))
    }
}

fn validate_category_id(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || Uuid::parse_str(value.trim()).is_ok() {
        Ok(())
    } else {
        Err(field_error("category_id", CATEGORY_MESSAGE))
    }
}
